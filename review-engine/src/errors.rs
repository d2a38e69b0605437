//! Crate-wide error hierarchy for review-engine.
//!
//! Goals:
//! - Single root `Error` for all public fallible functions.
//! - Parsing stays tolerant: `ParseError` is used internally and converted
//!   into "skip this hunk" at the public boundary.
//! - LLM response failures are plain values so callers can record them per unit.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type EngineResult<T> = Result<T, Error>;

/// Root error type for the review-engine crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration problems (bad numbers in env, bad glob rules).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unified diff / hunk header failure.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// LLM response could not be turned into review comments.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Reviewed-commit marker block could not be written back.
    #[error(transparent)]
    Watermark(#[from] WatermarkError),

    /// A fanned-out unit panicked or was aborted.
    #[error("join error: {0}")]
    Join(String),
}

/// Hunk header parser errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid hunk header: {0}")]
    InvalidHunkHeader(String),

    #[error("integer overflow in hunk header: {0}")]
    Overflow(String),
}

/// Failures while decoding a model reply.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// Reply was empty (or retries were exhausted upstream).
    #[error("empty response")]
    Empty,

    /// Reply was not valid JSON even after sanitizing.
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// JSON was valid but the `reviews` array was absent or not an array.
    #[error("missing `reviews` array")]
    MissingReviews,
}

/// Reviewed-commit marker write-back errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatermarkError {
    /// The freshly read body lost the marker block that existed when the run started.
    #[error("reviewed-commit block disappeared between read and write")]
    BlockVanished,
}

/// Environment / options errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid number in {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("invalid path filter `{rule}`: {reason}")]
    InvalidPathFilter { rule: String, reason: String },
}

// ===== Conversions for `?` ergonomics =====

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Join(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Response(ResponseError::InvalidJson(e))
    }
}

impl From<globset::Error> for ConfigError {
    fn from(e: globset::Error) -> Self {
        ConfigError::InvalidPathFilter {
            rule: e.glob().unwrap_or_default().to_string(),
            reason: e.kind().to_string(),
        }
    }
}

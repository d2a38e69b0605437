//! Environment-driven review options.
//!
//! ## Env vars
//! - `REVIEW_LIGHT_MODEL` / `REVIEW_HEAVY_MODEL`: model ids (select token limits)
//! - `REVIEW_MAX_FILES` (usize): 0 = unlimited (default: 0)
//! - `REVIEW_COMMENT_LGTM` (bool): post LGTM comments too (default: false)
//! - `REVIEW_SIMPLE_CHANGES` (bool): skip triage, review everything (default: false)
//! - `REVIEW_PATH_FILTERS`: comma/newline separated globs, `!` = exclude
//! - `REVIEW_LLM_CONCURRENCY` / `REVIEW_GITHUB_CONCURRENCY` (usize): default 6

use tracing::info;

use crate::budget::TokenLimits;
use crate::errors::ConfigError;
use crate::review::PathFilter;

pub const DEFAULT_LIGHT_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";
pub const DEFAULT_HEAVY_MODEL: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
const DEFAULT_CONCURRENCY: usize = 6;

/// Options of one review run.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub light_model: String,
    pub heavy_model: String,
    /// Limits of the summarization model.
    pub light_limits: TokenLimits,
    /// Limits of the review model.
    pub heavy_limits: TokenLimits,
    pub max_files: usize,
    pub review_comment_lgtm: bool,
    pub review_simple_changes: bool,
    pub path_filter: PathFilter,
    pub llm_concurrency: usize,
    pub github_concurrency: usize,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            light_model: DEFAULT_LIGHT_MODEL.to_string(),
            heavy_model: DEFAULT_HEAVY_MODEL.to_string(),
            light_limits: TokenLimits::for_model(DEFAULT_LIGHT_MODEL),
            heavy_limits: TokenLimits::for_model(DEFAULT_HEAVY_MODEL),
            max_files: 0,
            review_comment_lgtm: false,
            review_simple_changes: false,
            path_filter: PathFilter::allow_all(),
            llm_concurrency: DEFAULT_CONCURRENCY,
            github_concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ReviewOptions {
    /// Read options from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let light_model = lookup("REVIEW_LIGHT_MODEL").unwrap_or_else(|| DEFAULT_LIGHT_MODEL.into());
        let heavy_model = lookup("REVIEW_HEAVY_MODEL").unwrap_or_else(|| DEFAULT_HEAVY_MODEL.into());
        let path_filter = match lookup("REVIEW_PATH_FILTERS") {
            Some(raw) => PathFilter::parse(&raw)?,
            None => PathFilter::allow_all(),
        };

        let opts = Self {
            light_limits: TokenLimits::for_model(&light_model),
            heavy_limits: TokenLimits::for_model(&heavy_model),
            light_model,
            heavy_model,
            max_files: env_usize(&lookup, "REVIEW_MAX_FILES", 0)?,
            review_comment_lgtm: env_bool(&lookup, "REVIEW_COMMENT_LGTM", false),
            review_simple_changes: env_bool(&lookup, "REVIEW_SIMPLE_CHANGES", false),
            path_filter,
            llm_concurrency: env_usize(&lookup, "REVIEW_LLM_CONCURRENCY", DEFAULT_CONCURRENCY)?,
            github_concurrency: env_usize(
                &lookup,
                "REVIEW_GITHUB_CONCURRENCY",
                DEFAULT_CONCURRENCY,
            )?,
        };
        opts.log();
        Ok(opts)
    }

    fn log(&self) {
        info!("config: max_files: {}", self.max_files);
        info!("config: review_simple_changes: {}", self.review_simple_changes);
        info!("config: review_comment_lgtm: {}", self.review_comment_lgtm);
        info!("config: light_model: {} ({})", self.light_model, self.light_limits.describe());
        info!("config: heavy_model: {} ({})", self.heavy_model, self.heavy_limits.describe());
        info!(
            "config: concurrency: llm={} github={}",
            self.llm_concurrency, self.github_concurrency
        );
    }
}

/// Truthy values: "1", "true", "yes", "on" (case-insensitive).
pub fn env_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

/// Unset or blank means `default`; anything unparsable is an error.
pub fn env_usize<F>(lookup: &F, key: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => {
            v.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var: key, value: v })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let opts = ReviewOptions::from_lookup(env(&[])).unwrap();
        assert_eq!(opts.light_model, DEFAULT_LIGHT_MODEL);
        assert_eq!(opts.heavy_limits.max_tokens, 200_000);
        assert_eq!(opts.max_files, 0);
        assert_eq!(opts.llm_concurrency, 6);
        assert!(!opts.review_comment_lgtm);
        assert!(opts.path_filter.is_empty());
    }

    #[test]
    fn reads_values() {
        let opts = ReviewOptions::from_lookup(env(&[
            ("REVIEW_HEAVY_MODEL", "anthropic.claude-v2"),
            ("REVIEW_MAX_FILES", "25"),
            ("REVIEW_COMMENT_LGTM", "Yes"),
            ("REVIEW_PATH_FILTERS", "!**/*.lock,src/**"),
            ("REVIEW_GITHUB_CONCURRENCY", " 3 "),
        ]))
        .unwrap();
        assert_eq!(opts.heavy_limits.request_tokens, 95_800);
        assert_eq!(opts.max_files, 25);
        assert!(opts.review_comment_lgtm);
        assert_eq!(opts.github_concurrency, 3);
        assert!(opts.path_filter.check("src/main.rs"));
        assert!(!opts.path_filter.check("src/Cargo.lock"));
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = ReviewOptions::from_lookup(env(&[("REVIEW_MAX_FILES", "many")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber { var: "REVIEW_MAX_FILES", .. }
        ));
    }
}

//! Public entry for the review-engine.
//!
//! Core pieces of an LLM pull-request reviewer that need real algorithms:
//!
//! 1) **Parsing** (`parser`)
//!    - Unified / git-extended diff text → `FileDiff` / `Chunk` / `Change`
//!    - Tolerant: unknown lines are skipped, never an error
//!
//! 2) **Hunks** (`hunks`)
//!    - Split a file patch into hunks, compute old/new line spans
//!    - Annotate with absolute new-file line numbers for the prompt
//!
//! 3) **Budget** (`budget`)
//!    - Per-model token limits, token counting seam
//!    - Greedy prefix packing of hunks/files into one request
//!
//! 4) **Watermark** (`watermark`)
//!    - Reviewed commit ids stored as hidden markers in a PR comment
//!    - Resume point + optimistic re-read-and-merge on write
//!
//! `review` ties hunks, budget and comment threads into a per-file plan and
//! decodes model replies; `fanout` and `cache` support the async side.

pub mod budget;
pub mod cache;
pub mod config;
pub mod errors;
pub mod fanout;
pub mod hunks;
pub mod parser;
pub mod review;
pub mod telemetry;
pub mod watermark;

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument};

use budget::TokenCounter;
use config::ReviewOptions;
use review::{ReviewTally, plan_file_review};

pub use errors::{EngineResult, Error};
pub use parser::{Change, ChangeKind, Chunk, FileDiff, parse_unified_diff};

/// Per-file line of a [`DiffReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub is_new: bool,
    pub is_deleted: bool,
    pub additions: usize,
    pub deletions: usize,
    /// Hunks that fit into the review request.
    pub packed: usize,
    pub total: usize,
    pub tokens: usize,
}

/// What a review run over one diff would send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    pub files: Vec<FileReport>,
    /// Paths rejected by the path filter.
    pub ignored: Vec<String>,
    /// Paths beyond `max_files`.
    pub not_processed: Vec<String>,
    pub tally: ReviewTally,
}

/// Parse a diff and plan the review request of every selected file.
///
/// `base_prompt` is the review prompt without hunks; its token count is the
/// baseline every file starts from. No model is called.
///
/// # Logging
/// - `step1: parse (files=N)`
/// - `step2: filter (selected=K, ignored=M)`
/// - `step3: plan <file> packed=P/T`
///
/// Runs inside a `review_diff` span (`bytes` = diff length).
#[instrument(level = "debug", skip_all, fields(bytes = diff.len()))]
pub fn review_diff<C>(
    diff: &str,
    opts: &ReviewOptions,
    counter: &C,
    base_prompt: &str,
) -> DiffReport
where
    C: TokenCounter + ?Sized,
{
    let t0 = Instant::now();
    let files = parse_unified_diff(diff);
    debug!("step1: parse (files={})", files.len());

    let mut report = DiffReport::default();
    let mut selected = Vec::new();
    for f in &files {
        let path = f.display_path();
        if !opts.path_filter.check(path) {
            report.ignored.push(path.to_string());
        } else if f.is_binary {
            report.tally.skip(path, "binary");
        } else if !f.is_header_only() {
            selected.push(f);
        }
    }
    debug!(
        "step2: filter (selected={}, ignored={})",
        selected.len(),
        report.ignored.len()
    );

    let baseline = counter.count(base_prompt);
    for (idx, f) in selected.into_iter().enumerate() {
        let path = f.display_path();
        if opts.max_files > 0 && idx >= opts.max_files {
            report.not_processed.push(path.to_string());
            continue;
        }

        let patch = f.patch_text();
        let Some(plan) = plan_file_review(
            path,
            patch.as_deref(),
            baseline,
            opts.heavy_limits.request_tokens,
            counter,
            &[],
        ) else {
            continue;
        };
        debug!("step3: plan {} packed={}/{}", path, plan.packed, plan.total);

        if let Some(reason) = &plan.skipped_reason {
            report.tally.skipped.push(reason.clone());
        }
        report.files.push(FileReport {
            path: path.to_string(),
            is_new: f.is_new,
            is_deleted: f.is_deleted,
            additions: f.additions,
            deletions: f.deletions,
            packed: plan.packed,
            total: plan.total,
            tokens: plan.tokens,
        });
    }

    info!(
        "review_diff: files={} ignored={} skipped={} ({} ms)",
        report.files.len(),
        report.ignored.len(),
        report.tally.skipped.len(),
        t0.elapsed().as_millis()
    );
    report
}

//! Per-file review planning.
//!
//! Steps for one file:
//!   1) Render every hunk (`<new_hunk>`/`<old_hunk>` blocks);
//!   2) Pack the longest prefix of hunks that fits next to the base prompt;
//!   3) Attach each packed hunk's existing comment threads if they still fit;
//!   4) Assemble the `patches` section of the review prompt.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::threads::{COMMENT_REPLY_TAG, ThreadComment, comment_chains_within_range};
use crate::budget::{Packer, TokenCounter, pack_prefix};
use crate::hunks::render_file_patches;

/// One packed hunk with its optional thread context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPatch {
    pub start_line: u32,
    pub end_line: u32,
    pub text: String,
    /// Conversation chains on this range, when they fit the budget.
    pub comment_chain: Option<String>,
}

/// What goes into one file's review request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReviewPlan {
    pub path: String,
    /// Number of hunks sent (always a prefix of the file's hunks).
    pub packed: usize,
    pub total: usize,
    pub patches: Vec<PlannedPatch>,
    /// Ready-to-embed `patches` prompt section.
    pub prompt_patches: String,
    /// Tokens of base prompt + packed hunks + attached threads.
    pub tokens: usize,
    /// `"<file> (diff too large)"` when not a single hunk fits.
    pub skipped_reason: Option<String>,
}

impl FileReviewPlan {
    pub fn is_skipped(&self) -> bool {
        self.skipped_reason.is_some()
    }
}

/// Plan the review request for one file.
///
/// `baseline` is the token cost of the prompt without any hunks. Returns
/// `None` when the patch has no reviewable hunk at all.
#[instrument(level = "debug", skip_all, fields(file = path))]
pub fn plan_file_review<C>(
    path: &str,
    patch: Option<&str>,
    baseline: usize,
    ceiling: usize,
    counter: &C,
    threads: &[ThreadComment],
) -> Option<FileReviewPlan>
where
    C: TokenCounter + ?Sized,
{
    let rendered = render_file_patches(path, patch)?;

    let costs: Vec<usize> = rendered.iter().map(|p| counter.count(&p.text)).collect();
    let prefix = pack_prefix(&costs, baseline, ceiling);

    if prefix.len == 0 {
        info!("review: not a single hunk of {} fits, skipping", path);
        return Some(FileReviewPlan {
            path: path.to_string(),
            packed: 0,
            total: rendered.len(),
            patches: Vec::new(),
            prompt_patches: String::new(),
            tokens: baseline,
            skipped_reason: Some(format!("{path} (diff too large)")),
        });
    }

    // Threads are checked against the budget left after all packed hunks.
    let mut packer = Packer::new(prefix.used, ceiling);
    let mut patches = Vec::with_capacity(prefix.len);
    let mut prompt_patches = String::new();

    for p in rendered.into_iter().take(prefix.len) {
        let chains = comment_chains_within_range(
            threads,
            path,
            p.start_line,
            p.end_line,
            COMMENT_REPLY_TAG,
        );
        let comment_chain = if chains.is_empty() {
            None
        } else if packer.try_add_extra(counter.count(&chains)) {
            debug!("review: attach comment chains for {}:{}-{}", path, p.start_line, p.end_line);
            Some(chains)
        } else {
            debug!("review: drop comment chains for {}:{}-{} (budget)", path, p.start_line, p.end_line);
            None
        };

        prompt_patches.push_str(&format!("\n{}\n", p.text));
        if let Some(chain) = &comment_chain {
            prompt_patches.push_str(&format!(
                "\n<comment_chains>\n```\n{chain}\n```\n</comment_chains>\n"
            ));
        }

        patches.push(PlannedPatch {
            start_line: p.start_line,
            end_line: p.end_line,
            text: p.text,
            comment_chain,
        });
    }

    Some(FileReviewPlan {
        path: path.to_string(),
        packed: prefix.len,
        total: prefix.total,
        patches,
        prompt_patches,
        tokens: packer.used(),
        skipped_reason: None,
    })
}

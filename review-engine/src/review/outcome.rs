//! Per-run bookkeeping of what happened to each file.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::response::{ReviewComment, parse_review_response};
use crate::errors::ResponseError;

/// Counters and reason lists for one review run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTally {
    /// `"<file> (reason)"` for units whose model call or reply failed.
    pub failed: Vec<String>,
    /// `"<file> (reason)"` for units never sent to the model.
    pub skipped: Vec<String>,
    pub review_count: usize,
    pub lgtm_count: usize,
}

/// True when a comment only approves and should not be posted.
pub fn is_lgtm(comment: &ReviewComment) -> bool {
    comment.lgtm
        || comment.comment.contains("LGTM")
        || comment.comment.contains("looks good to me")
}

impl ReviewTally {
    pub fn skip(&mut self, file: &str, reason: &str) {
        self.skipped.push(format!("{file} ({reason})"));
    }

    pub fn fail(&mut self, file: &str, reason: impl std::fmt::Display) {
        self.failed.push(format!("{file} ({reason})"));
    }

    /// Decode one file's reply and keep the comments worth posting.
    ///
    /// Failures are recorded here and yield an empty list; they never stop
    /// the other files.
    pub fn record_reply(
        &mut self,
        file: &str,
        reply: &str,
        comment_lgtm: bool,
    ) -> Vec<ReviewComment> {
        let comments = match parse_review_response(reply) {
            Ok(c) => c,
            Err(ResponseError::Empty) => {
                debug!("review: nothing obtained for {}", file);
                self.fail(file, "no response");
                return Vec::new();
            }
            Err(e) => {
                warn!("review: failed to parse reply for {}: {}", file, e);
                self.fail(file, e);
                return Vec::new();
            }
        };

        let mut kept = Vec::with_capacity(comments.len());
        for c in comments {
            if !comment_lgtm && is_lgtm(&c) {
                self.lgtm_count += 1;
                continue;
            }
            self.review_count += 1;
            kept.push(c);
        }
        kept
    }

    /// Fold another tally (e.g. from a parallel unit) into this one.
    pub fn merge(&mut self, other: ReviewTally) {
        self.failed.extend(other.failed);
        self.skipped.extend(other.skipped);
        self.review_count += other.review_count;
        self.lgtm_count += other.lgtm_count;
    }
}

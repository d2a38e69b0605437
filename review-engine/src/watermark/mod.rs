//! Reviewed-commit watermark.
//!
//! Review progress lives only as marker text inside one PR comment (see
//! [`markers`]). This module derives the resume point from that text and
//! writes new ids back with an optimistic re-read-and-merge step.

pub mod markers;

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::errors::WatermarkError;

pub use markers::{add_reviewed_id, reviewed_ids, reviewed_ids_block};

/// Last id of `all_commit_ids` (PR order) that appears in `reviewed`, or `""`.
///
/// Walks the real commit order, not the marker order, so commits dropped by
/// a force-push simply stop counting.
pub fn highest_reviewed<'a>(all_commit_ids: &'a [String], reviewed: &[String]) -> &'a str {
    let reviewed: HashSet<&str> = reviewed.iter().map(String::as_str).collect();
    all_commit_ids
        .iter()
        .rev()
        .find(|id| reviewed.contains(id.as_str()))
        .map_or("", String::as_str)
}

/// Commit the incremental diff should start from.
///
/// No watermark, or a watermark equal to head, restarts from the PR base.
// TODO: head == watermark re-reviews the whole PR; decide whether that
// should instead short-circuit to "nothing to review".
pub fn resume_point<'a>(watermark: &'a str, head_sha: &str, base_sha: &'a str) -> &'a str {
    if watermark.is_empty() || watermark == head_sha {
        debug!(
            "watermark: restart from base (watermark={:?}, head={})",
            watermark, head_sha
        );
        base_sha
    } else {
        watermark
    }
}

/// Body after a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedBody {
    pub body: String,
    /// Ids actually appended by this merge.
    pub added: Vec<String>,
    /// The stored body changed since the run read it.
    pub rebased: bool,
}

/// Pending write of the ids reviewed during one run.
///
/// Holds the body as read at run start. `apply` replays the new ids on top
/// of a freshly read body instead of overwriting it.
#[derive(Debug, Clone)]
pub struct WatermarkUpdate {
    read_body: String,
    reviewed: Vec<String>,
}

impl WatermarkUpdate {
    pub fn begin(read_body: impl Into<String>) -> Self {
        Self {
            read_body: read_body.into(),
            reviewed: Vec::new(),
        }
    }

    /// Ids present when the run started.
    pub fn reviewed_at_start(&self) -> Vec<String> {
        reviewed_ids(&self.read_body)
    }

    pub fn record(&mut self, commit_id: impl Into<String>) {
        self.reviewed.push(commit_id.into());
    }

    pub fn pending(&self) -> &[String] {
        &self.reviewed
    }

    /// Merge the recorded ids into `fresh_body`.
    ///
    /// Ids already in `fresh_body` are skipped. Fails only if the block that
    /// existed at read time is gone from the fresh body.
    pub fn apply(&self, fresh_body: &str) -> Result<MergedBody, WatermarkError> {
        let rebased = fresh_body != self.read_body;
        if rebased {
            warn!("watermark: comment body changed since it was read, merging onto the fresh copy");
            if !reviewed_ids_block(&self.read_body).is_empty()
                && reviewed_ids_block(fresh_body).is_empty()
            {
                return Err(WatermarkError::BlockVanished);
            }
        }

        let mut body = fresh_body.to_string();
        let mut added = Vec::new();
        for id in &self.reviewed {
            if reviewed_ids(&body).iter().any(|known| known == id) {
                continue;
            }
            body = add_reviewed_id(&body, id);
            added.push(id.clone());
        }

        info!(
            "watermark: merged {} new id(s), rebased={}",
            added.len(),
            rebased
        );
        Ok(MergedBody {
            body,
            added,
            rebased,
        })
    }
}

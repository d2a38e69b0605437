//! Greedy prefix packing into a token ceiling.
//!
//! Units are never reordered and packing stops at the first unit that does
//! not fit: callers address packed units by position, so the packed set must
//! always be a prefix of the input.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::limits::TokenLimits;

/// Result of packing a cost sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedPrefix {
    /// Number of leading units taken.
    pub len: usize,
    /// Baseline plus the cost of the taken units.
    pub used: usize,
    pub total: usize,
}

impl PackedPrefix {
    pub fn is_complete(&self) -> bool {
        self.len == self.total
    }
}

/// Running token account of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packer {
    used: usize,
    ceiling: usize,
    closed: bool,
}

impl Packer {
    /// Start an account with `baseline` tokens already spent.
    pub fn new(baseline: usize, ceiling: usize) -> Self {
        Self {
            used: baseline,
            ceiling,
            closed: false,
        }
    }

    fn fits(&self, cost: usize) -> bool {
        self.used
            .checked_add(cost)
            .is_some_and(|total| total <= self.ceiling)
    }

    /// Take the next unit. The first refusal closes the packer for good.
    pub fn try_add(&mut self, cost: usize) -> bool {
        if self.closed || !self.fits(cost) {
            self.closed = true;
            return false;
        }
        self.used += cost;
        true
    }

    /// Attach an optional extra to the last unit; dropped if it does not fit.
    ///
    /// A refused extra does not close the packer.
    pub fn try_add_extra(&mut self, cost: usize) -> bool {
        if !self.fits(cost) {
            return false;
        }
        self.used += cost;
        true
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.ceiling.saturating_sub(self.used)
    }
}

/// Longest prefix `K` with `baseline + sum(costs[..K]) <= ceiling`.
pub fn pack_prefix(costs: &[usize], baseline: usize, ceiling: usize) -> PackedPrefix {
    let mut packer = Packer::new(baseline, ceiling);
    let len = costs.iter().take_while(|&&c| packer.try_add(c)).count();
    if len < costs.len() {
        info!(
            "packer: only packing {} / {} units, tokens: {} / {}",
            len,
            costs.len(),
            packer.used(),
            ceiling
        );
    }
    PackedPrefix {
        len,
        used: packer.used(),
        total: costs.len(),
    }
}

/// One file offered for summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCandidate {
    pub path: String,
    /// Tokens of the rendered per-file summarize prompt.
    pub prompt_tokens: usize,
    pub diff_is_empty: bool,
}

/// Which files go to the light model for summarization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySelection {
    /// Indices into the candidate list, in input order.
    pub selected: Vec<usize>,
    /// Paths beyond `max_files`.
    pub skipped: Vec<String>,
    /// `"<file> (reason)"` entries for files that took a slot but cannot be sent.
    pub failed: Vec<String>,
    /// How many selected files fit together into one request.
    pub combined: PackedPrefix,
}

/// Apply `max_files` (0 = unlimited) and the light-model ceiling.
///
/// Every file inside the `max_files` window uses a slot, even when it is
/// later rejected for size.
pub fn select_for_summary(
    candidates: &[SummaryCandidate],
    max_files: usize,
    light: &TokenLimits,
) -> SummarySelection {
    let mut out = SummarySelection::default();
    let mut slots = 0usize;

    for (idx, c) in candidates.iter().enumerate() {
        if max_files > 0 && slots >= max_files {
            out.skipped.push(c.path.clone());
            continue;
        }
        slots += 1;

        if c.diff_is_empty {
            debug!("summarize: file_diff is empty, skip {}", c.path);
            out.failed.push(format!("{} (empty diff)", c.path));
            continue;
        }
        if c.prompt_tokens > light.request_tokens {
            info!("summarize: diff tokens exceeds limit, skip {}", c.path);
            out.failed.push(format!("{} (diff tokens exceeds limit)", c.path));
            continue;
        }
        out.selected.push(idx);
    }

    let costs: Vec<usize> = out
        .selected
        .iter()
        .map(|&i| candidates[i].prompt_tokens)
        .collect();
    out.combined = pack_prefix(&costs, 0, light.request_tokens);
    out
}

//! Token budgeting: per-model limits, token counting and prefix packing.

pub mod limits;
pub mod packer;
pub mod tokens;

pub use limits::{TokenBudget, TokenLimits};
pub use packer::{
    PackedPrefix, Packer, SummaryCandidate, SummarySelection, pack_prefix, select_for_summary,
};
pub use tokens::{ApproxTokenCounter, TokenCounter};

//! Review-side helpers around the core engine.
//!
//! Flow per file:
//!   1) `filter` decides whether the path is reviewed at all;
//!   2) `plan` renders and packs hunks, attaching comment `threads`;
//!   3) the model reply is decoded by `response`;
//!   4) `outcome` keeps counters and failure reasons;
//!   5) `status` renders them for the summary comment.

pub mod filter;
pub mod outcome;
pub mod plan;
pub mod response;
pub mod status;
pub mod threads;

pub use filter::PathFilter;
pub use outcome::{ReviewTally, is_lgtm};
pub use plan::{FileReviewPlan, PlannedPatch, plan_file_review};
pub use response::{ReviewComment, parse_review_response, parse_triage};
pub use threads::{ThreadComment, comment_chains_within_range};

//! Per-hunk views of a file patch: splitting, line-number annotation and
//! prompt rendering.

pub mod annotate;
pub mod render;
pub mod split;

pub use annotate::{AnnotatedHunk, annotate};
pub use render::{RenderedPatch, render_file_patches};
pub use split::{HunkHeader, HunkRange, LineSpan, hunk_range, split_patch};

//! Prompt rendering of annotated hunks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::annotate::annotate;
use super::split::{hunk_range, split_patch};

/// One hunk ready for the review prompt, addressed by its new-side span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPatch {
    pub start_line: u32,
    pub end_line: u32,
    /// `<new_hunk>` / `<old_hunk>` fenced block pair.
    pub text: String,
}

/// Wrap an annotated hunk into the fenced block pair the prompt expects.
pub fn render_hunk_blocks(new_hunk: &str, old_hunk: &str) -> String {
    format!(
        "\n<new_hunk>\n```\n{new_hunk}\n```\n</new_hunk>\n\n<old_hunk>\n```\n{old_hunk}\n```\n</old_hunk>\n"
    )
}

/// Render every hunk of one file's patch.
///
/// Hunks whose header does not parse are dropped. `None` when nothing
/// survives (no patch, binary file, or only malformed hunks).
pub fn render_file_patches(path: &str, patch: Option<&str>) -> Option<Vec<RenderedPatch>> {
    let hunks = split_patch(patch);
    let mut out = Vec::with_capacity(hunks.len());

    for hunk in hunks {
        let Some(range) = hunk_range(hunk) else {
            continue;
        };
        let Some(annotated) = annotate(hunk) else {
            continue;
        };
        out.push(RenderedPatch {
            start_line: range.new.start_line,
            end_line: range.new.end_line,
            text: render_hunk_blocks(&annotated.new_hunk, &annotated.old_hunk),
        });
    }

    if out.is_empty() {
        debug!("render: no reviewable hunks in {}", path);
        return None;
    }
    Some(out)
}

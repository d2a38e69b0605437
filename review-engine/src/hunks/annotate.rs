//! Hunk annotation with absolute new-file line numbers.
//!
//! The LLM answers with `line_start`/`line_end` in new-file coordinates, so
//! the numbers written here are the ones comments get anchored to.

use serde::{Deserialize, Serialize};

use super::split::HunkHeader;
use crate::parser::classify::NO_NEWLINE_MARKER;

/// Context lines at each edge of a hunk that stay unnumbered.
const EDGE_WINDOW: usize = 3;

/// Old/new text of one hunk as shown to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedHunk {
    /// Context and removed lines, verbatim.
    pub old_hunk: String,
    /// Context and added lines; added lines always carry `"<n>: "`.
    pub new_hunk: String,
}

/// Annotate a single hunk (header line included).
///
/// Returns `None` when the header does not parse.
pub fn annotate(hunk: &str) -> Option<AnnotatedHunk> {
    let mut lines = hunk.split('\n');
    let header = HunkHeader::parse(lines.next()?).ok()?;

    let mut body: Vec<&str> = lines.filter(|l| *l != NO_NEWLINE_MARKER).collect();
    if body.last() == Some(&"") {
        body.pop();
    }

    let removal_only = !body.iter().any(|l| l.starts_with('+'));
    let numbered_upto = body.len().saturating_sub(EDGE_WINDOW);

    let mut old_lines = Vec::with_capacity(body.len());
    let mut new_lines = Vec::with_capacity(body.len());
    let mut new_line = header.new_start;

    for (idx, line) in body.iter().enumerate() {
        let position = idx + 1;
        if let Some(rest) = line.strip_prefix('-') {
            old_lines.push(rest.to_string());
        } else if let Some(rest) = line.strip_prefix('+') {
            new_lines.push(format!("{new_line}: {rest}"));
            new_line = new_line.saturating_add(1);
        } else {
            old_lines.push(line.to_string());
            if removal_only || (position > EDGE_WINDOW && position <= numbered_upto) {
                new_lines.push(format!("{new_line}: {line}"));
            } else {
                new_lines.push(line.to_string());
            }
            new_line = new_line.saturating_add(1);
        }
    }

    Some(AnnotatedHunk {
        old_hunk: old_lines.join("\n"),
        new_hunk: new_lines.join("\n"),
    })
}

//! Structured model of a parsed unified diff.
//!
//! Built once per parse call and consumed by hunk extraction; nothing here
//! outlives a single review invocation.

use serde::{Deserialize, Serialize};

/// Kind of a single content line inside a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Normal,
    Add,
    Del,
}

/// One content line of a chunk with its absolute line numbers.
///
/// `old_line` is set for `Normal`/`Del`, `new_line` for `Normal`/`Add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    /// Line text without its `+`/`-`/` ` prefix.
    pub content: String,
    /// True for the synthetic `\ No newline at end of file` entry.
    pub no_newline_marker: bool,
}

impl Change {
    pub fn normal(old_line: u32, new_line: u32, content: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Normal,
            old_line: Some(old_line),
            new_line: Some(new_line),
            content: content.into(),
            no_newline_marker: false,
        }
    }

    pub fn add(new_line: u32, content: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Add,
            old_line: None,
            new_line: Some(new_line),
            content: content.into(),
            no_newline_marker: false,
        }
    }

    pub fn del(old_line: u32, content: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Del,
            old_line: Some(old_line),
            new_line: None,
            content: content.into(),
            no_newline_marker: false,
        }
    }
}

/// A diff hunk (`@@ -a,b +c,d @@`) and its changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Full header line, including any trailing section text.
    pub header: String,
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub changes: Vec<Change>,
}

impl Chunk {
    /// Number of changes that consume an old-file line (marker excluded).
    pub fn old_side_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| !c.no_newline_marker && c.kind != ChangeKind::Add)
            .count()
    }

    /// Number of changes that consume a new-file line (marker excluded).
    pub fn new_side_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| !c.no_newline_marker && c.kind != ChangeKind::Del)
            .count()
    }
}

/// File-level diff record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Old path (`/dev/null` for created files), empty when unknown.
    pub from: String,
    /// New path (`/dev/null` for deleted files), empty when unknown.
    pub to: String,
    pub is_new: bool,
    pub is_deleted: bool,
    pub old_mode: Option<String>,
    pub new_mode: Option<String>,
    /// Tokens after `index` (e.g. `["abc..def", "100644"]`).
    pub index: Vec<String>,
    pub chunks: Vec<Chunk>,
    pub additions: usize,
    pub deletions: usize,
    /// Set when git reported the change as binary instead of writing hunks.
    pub is_binary: bool,
}

impl FileDiff {
    /// Best display path: new path unless the file was deleted.
    pub fn display_path(&self) -> &str {
        if self.to.is_empty() || self.to == "/dev/null" {
            &self.from
        } else {
            &self.to
        }
    }

    /// True when the record carries no hunks (binary or mode-only change).
    pub fn is_header_only(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Hunks only, re-serialized in provider `patch` form (no file headers).
    ///
    /// `None` for header-only records.
    pub fn patch_text(&self) -> Option<String> {
        if self.chunks.is_empty() {
            return None;
        }
        let mut out = String::new();
        for chunk in &self.chunks {
            out.push_str(&chunk.header);
            out.push('\n');
            for c in &chunk.changes {
                if !c.no_newline_marker {
                    out.push(match c.kind {
                        ChangeKind::Normal => ' ',
                        ChangeKind::Add => '+',
                        ChangeKind::Del => '-',
                    });
                }
                out.push_str(&c.content);
                out.push('\n');
            }
        }
        Some(out)
    }
}

//! Hunk splitting and `@@` header parsing.
//!
//! A file patch as returned by the provider (GitHub `patch` field, GitLab
//! `diff`) is a sequence of hunks without file headers. We cut it into
//! per-hunk slices, each slice starting with its own `@@` header line.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

lazy_static! {
    /// `@@ -a[,b] +c[,d] @@[section]`; missing lengths mean 1.
    static ref HUNK_HEADER_RE: Regex =
        Regex::new(r"^@@\s+-(\d+),?(\d+)?\s+\+(\d+),?(\d+)?\s@@").unwrap();
    /// Same shape, anchored on every line, used to find split points.
    static ref HUNK_BOUNDARY_RE: Regex =
        Regex::new(r"(?m)^@@\s+-\d+(?:,\d+)?\s+\+\d+(?:,\d+)?\s@@").unwrap();
}

/// Parsed `@@ -old_start,old_lines +new_start,new_lines @@` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
}

impl HunkHeader {
    /// Parse a header line. Trailing section text after the closing `@@` is ignored.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let caps = HUNK_HEADER_RE
            .captures(line)
            .ok_or_else(|| ParseError::InvalidHunkHeader(line.to_string()))?;
        let num = |idx: usize| -> Result<u32, ParseError> {
            match caps.get(idx) {
                Some(m) => m
                    .as_str()
                    .parse::<u32>()
                    .map_err(|_| ParseError::Overflow(m.as_str().to_string())),
                None => Ok(1),
            }
        };
        let header = Self {
            old_start: num(1)?,
            old_lines: num(2)?,
            new_start: num(3)?,
            new_lines: num(4)?,
        };
        // Both sides must end inside the u32 line space.
        if header.old_start.checked_add(header.old_lines).is_none()
            || header.new_start.checked_add(header.new_lines).is_none()
        {
            return Err(ParseError::Overflow(line.to_string()));
        }
        Ok(header)
    }

    /// Inclusive line span on the old side.
    pub fn old_span(&self) -> LineSpan {
        LineSpan::from_start_len(self.old_start, self.old_lines)
    }

    /// Inclusive line span on the new side.
    pub fn new_span(&self) -> LineSpan {
        LineSpan::from_start_len(self.new_start, self.new_lines)
    }
}

/// Inclusive 1-based line span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start_line: u32,
    pub end_line: u32,
}

impl LineSpan {
    /// `end = start + len - 1`; an empty side yields `end = start - 1`.
    fn from_start_len(start: u32, len: u32) -> Self {
        Self {
            start_line: start,
            end_line: start.saturating_add(len).saturating_sub(1),
        }
    }
}

/// Old/new spans of one hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkRange {
    pub old: LineSpan,
    pub new: LineSpan,
}

/// Split a file patch into hunks, each retaining its header line.
///
/// Text before the first header is dropped. `None` (no patch, e.g. binary
/// files) yields an empty list.
pub fn split_patch(patch: Option<&str>) -> Vec<&str> {
    let Some(patch) = patch else {
        return Vec::new();
    };

    let starts: Vec<usize> = HUNK_BOUNDARY_RE.find_iter(patch).map(|m| m.start()).collect();
    let mut out = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(patch.len());
        out.push(&patch[start..end]);
    }
    out
}

/// Old/new line spans of a hunk, read from its first line.
///
/// Returns `None` when the header is malformed.
pub fn hunk_range(hunk: &str) -> Option<HunkRange> {
    let header_line = hunk.lines().next()?;
    match HunkHeader::parse(header_line) {
        Ok(h) => Some(HunkRange {
            old: h.old_span(),
            new: h.new_span(),
        }),
        Err(e) => {
            tracing::debug!("hunks: skip hunk with bad header: {}", e);
            None
        }
    }
}

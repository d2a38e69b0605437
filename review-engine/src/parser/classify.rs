//! Diff line classifier.
//!
//! Two independent tables, one per parser mode:
//! - header lines (`diff --git`, modes, `index`, `---`/`+++`, `@@`),
//! - content lines (`+`, `-`, leading whitespace, no-newline marker).
//!
//! The first matching pattern wins; anything else is `Unrecognized` and the
//! parser skips it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::hunks::split::HunkHeader;

/// Marker git emits after a line lacking a trailing newline.
pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

lazy_static! {
    static ref DIFF_START_RE: Regex = Regex::new(r"^diff\s").unwrap();
    static ref NEW_FILE_RE: Regex = Regex::new(r"^new file mode (\d+)$").unwrap();
    static ref DELETED_FILE_RE: Regex = Regex::new(r"^deleted file mode (\d+)$").unwrap();
    static ref OLD_MODE_RE: Regex = Regex::new(r"^old mode (\d+)$").unwrap();
    static ref NEW_MODE_RE: Regex = Regex::new(r"^new mode (\d+)$").unwrap();
    static ref INDEX_RE: Regex =
        Regex::new(r"^index\s[\da-zA-Z]+\.\.[\da-zA-Z]+(\s(\d+))?$").unwrap();
    static ref FROM_FILE_RE: Regex = Regex::new(r"^---\s").unwrap();
    static ref TO_FILE_RE: Regex = Regex::new(r"^\+\+\+\s").unwrap();
    static ref CONTENT_NORMAL_RE: Regex = Regex::new(r"^\s+").unwrap();
}

/// Classification of a line seen while no chunk is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLine<'a> {
    /// `diff --git a/x b/y` (the whole line, for path extraction).
    DiffStart(&'a str),
    NewFileMode(&'a str),
    DeletedFileMode(&'a str),
    OldMode(&'a str),
    NewMode(&'a str),
    /// `index abc..def [mode]`: tokens after `index`, optional mode.
    Index {
        tokens: Vec<&'a str>,
        mode: Option<&'a str>,
    },
    /// `--- path` (the whole line).
    FromFile(&'a str),
    /// `+++ path` (the whole line).
    ToFile(&'a str),
    ChunkHeader(HunkHeader),
    NoNewline,
    Unrecognized,
}

/// Classification of a line seen while a chunk is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentLine<'a> {
    Add(&'a str),
    Del(&'a str),
    Normal(&'a str),
    NoNewline,
    Unrecognized,
}

/// Classify a line in header mode.
pub fn classify_header(line: &str) -> HeaderLine<'_> {
    if DIFF_START_RE.is_match(line) {
        return HeaderLine::DiffStart(line);
    }
    if let Some(c) = NEW_FILE_RE.captures(line) {
        return HeaderLine::NewFileMode(c.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(c) = DELETED_FILE_RE.captures(line) {
        return HeaderLine::DeletedFileMode(c.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(c) = OLD_MODE_RE.captures(line) {
        return HeaderLine::OldMode(c.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(c) = NEW_MODE_RE.captures(line) {
        return HeaderLine::NewMode(c.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(c) = INDEX_RE.captures(line) {
        return HeaderLine::Index {
            tokens: line.split(' ').skip(1).collect(),
            mode: c.get(2).map(|m| m.as_str()),
        };
    }
    if FROM_FILE_RE.is_match(line) {
        return HeaderLine::FromFile(line);
    }
    if TO_FILE_RE.is_match(line) {
        return HeaderLine::ToFile(line);
    }
    if line.starts_with("@@") {
        // A header that fails to parse is just an unknown line here.
        return match HunkHeader::parse(line) {
            Ok(h) => HeaderLine::ChunkHeader(h),
            Err(_) => HeaderLine::Unrecognized,
        };
    }
    if line == NO_NEWLINE_MARKER {
        return HeaderLine::NoNewline;
    }
    HeaderLine::Unrecognized
}

/// Classify a line in content mode.
pub fn classify_content(line: &str) -> ContentLine<'_> {
    if line == NO_NEWLINE_MARKER {
        return ContentLine::NoNewline;
    }
    if let Some(rest) = line.strip_prefix('-') {
        return ContentLine::Del(rest);
    }
    if let Some(rest) = line.strip_prefix('+') {
        return ContentLine::Add(rest);
    }
    if CONTENT_NORMAL_RE.is_match(line) {
        // Drop exactly one prefix character; the rest is the source text.
        let mut chars = line.chars();
        chars.next();
        return ContentLine::Normal(chars.as_str());
    }
    ContentLine::Unrecognized
}

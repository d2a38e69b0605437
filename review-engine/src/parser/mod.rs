//! Extended unified-diff parser.
//!
//! Features:
//! - Git extended headers (`diff --git`, file modes, `index`, `---`/`+++`).
//! - Works even if file headers are missing (hunks-only input, e.g. GitHub
//!   comparison output): a chunk header with no open file starts one.
//! - Keeps `\ No newline at end of file` as a synthetic change on the last line.
//! - Binary / mode-only diffs produce a file with no chunks; binary notices
//!   set `is_binary`.
//!
//! The parser is an explicit two-state machine. In `Header` mode it reads
//! file headers until a `@@` line switches it to `Content`, seeded with the
//! hunk's remaining old/new line counts. It goes back to `Header` once both
//! counts reach zero. Unknown lines are skipped; it never fails.

pub mod classify;
pub mod paths;
pub mod types;

pub use types::{Change, ChangeKind, Chunk, FileDiff};

use classify::{ContentLine, HeaderLine, NO_NEWLINE_MARKER, classify_content, classify_header};
use paths::{parse_git_header_paths, parse_old_or_new_path};
use tracing::debug;

use crate::hunks::split::HunkHeader;

/// Parser mode. `Content` carries the lines still owed by the open hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Header,
    Content { remaining_old: u32, remaining_new: u32 },
}

impl Mode {
    /// Transition taken on a chunk header.
    fn enter_content(header: &HunkHeader) -> Mode {
        Mode::Content {
            remaining_old: header.old_lines,
            remaining_new: header.new_lines,
        }
        .settle()
    }

    /// Transition taken after a content line was consumed.
    fn consume(self, old: bool, new: bool) -> Mode {
        match self {
            Mode::Content {
                remaining_old,
                remaining_new,
            } => Mode::Content {
                remaining_old: if old { remaining_old.saturating_sub(1) } else { remaining_old },
                remaining_new: if new { remaining_new.saturating_sub(1) } else { remaining_new },
            }
            .settle(),
            Mode::Header => Mode::Header,
        }
    }

    /// A hunk with nothing left to read hands control back to headers.
    fn settle(self) -> Mode {
        match self {
            Mode::Content {
                remaining_old: 0,
                remaining_new: 0,
            } => Mode::Header,
            m => m,
        }
    }
}

/// Mutable parse state for a single `parse_unified_diff` call.
struct DiffParser {
    files: Vec<FileDiff>,
    mode: Mode,
    old_cursor: u32,
    new_cursor: u32,
}

impl DiffParser {
    fn new() -> Self {
        Self {
            files: Vec::new(),
            mode: Mode::Header,
            old_cursor: 0,
            new_cursor: 0,
        }
    }

    fn feed(&mut self, line: &str) {
        match self.mode {
            Mode::Header => self.header_line(line),
            Mode::Content { .. } => self.content_line(line),
        }
    }

    fn header_line(&mut self, line: &str) {
        match classify_header(line) {
            HeaderLine::DiffStart(l) => {
                self.start(l);
            }
            HeaderLine::NewFileMode(mode) => {
                let f = self.restart();
                f.is_new = true;
                f.new_mode = Some(mode.to_string());
                f.from = "/dev/null".to_string();
            }
            HeaderLine::DeletedFileMode(mode) => {
                let f = self.restart();
                f.is_deleted = true;
                f.old_mode = Some(mode.to_string());
                f.to = "/dev/null".to_string();
            }
            HeaderLine::OldMode(mode) => self.restart().old_mode = Some(mode.to_string()),
            HeaderLine::NewMode(mode) => self.restart().new_mode = Some(mode.to_string()),
            HeaderLine::Index { tokens, mode } => {
                let f = self.restart();
                f.index = tokens.into_iter().map(str::to_string).collect();
                if let Some(mode) = mode {
                    f.old_mode = Some(mode.trim().to_string());
                    f.new_mode = Some(mode.trim().to_string());
                }
            }
            HeaderLine::FromFile(l) => self.restart().from = parse_old_or_new_path(l),
            HeaderLine::ToFile(l) => self.restart().to = parse_old_or_new_path(l),
            HeaderLine::ChunkHeader(h) => self.open_chunk(line, h),
            // The marker right after a hunk that just closed belongs to it.
            HeaderLine::NoNewline => self.no_newline(),
            HeaderLine::Unrecognized if is_binary_notice(line) => {
                if let Some(f) = self.files.last_mut() {
                    f.is_binary = true;
                }
            }
            HeaderLine::Unrecognized => {}
        }
    }

    fn content_line(&mut self, line: &str) {
        let (old, new) = match classify_content(line) {
            ContentLine::Del(rest) => {
                let ln = self.old_cursor;
                self.old_cursor = self.old_cursor.saturating_add(1);
                self.push_change(Change::del(ln, rest));
                if let Some(f) = self.files.last_mut() {
                    f.deletions += 1;
                }
                (true, false)
            }
            ContentLine::Add(rest) => {
                let ln = self.new_cursor;
                self.new_cursor = self.new_cursor.saturating_add(1);
                self.push_change(Change::add(ln, rest));
                if let Some(f) = self.files.last_mut() {
                    f.additions += 1;
                }
                (false, true)
            }
            ContentLine::Normal(rest) => {
                let (o, n) = (self.old_cursor, self.new_cursor);
                self.old_cursor = self.old_cursor.saturating_add(1);
                self.new_cursor = self.new_cursor.saturating_add(1);
                self.push_change(Change::normal(o, n, rest));
                (true, true)
            }
            ContentLine::NoNewline => {
                self.no_newline();
                (false, false)
            }
            ContentLine::Unrecognized => (false, false),
        };
        self.mode = self.mode.consume(old, new);
    }

    /// Open a new file record from a `diff` line.
    fn start(&mut self, line: &str) -> &mut FileDiff {
        let (from, to) = parse_git_header_paths(line);
        self.files.push(FileDiff {
            from,
            to,
            ..FileDiff::default()
        });
        let last = self.files.len() - 1;
        &mut self.files[last]
    }

    /// Reuse the open file unless it already has hunks.
    fn restart(&mut self) -> &mut FileDiff {
        let needs_new = self.files.last().is_none_or(|f| !f.chunks.is_empty());
        if needs_new {
            return self.start("");
        }
        let last = self.files.len() - 1;
        &mut self.files[last]
    }

    fn open_chunk(&mut self, line: &str, h: HunkHeader) {
        if self.files.is_empty() {
            self.start("");
        }
        self.old_cursor = h.old_start;
        self.new_cursor = h.new_start;
        let chunk = Chunk {
            header: line.to_string(),
            old_start: h.old_start,
            old_lines: h.old_lines,
            new_start: h.new_start,
            new_lines: h.new_lines,
            changes: Vec::new(),
        };
        if let Some(f) = self.files.last_mut() {
            f.chunks.push(chunk);
        }
        self.mode = Mode::enter_content(&h);
    }

    fn push_change(&mut self, change: Change) {
        if let Some(chunk) = self.files.last_mut().and_then(|f| f.chunks.last_mut()) {
            chunk.changes.push(change);
        }
    }

    /// Duplicate the last change's kind and numbers as a marker entry.
    fn no_newline(&mut self) {
        let Some(chunk) = self.files.last_mut().and_then(|f| f.chunks.last_mut()) else {
            return;
        };
        let Some(last) = chunk.changes.last() else {
            return;
        };
        let marker = Change {
            kind: last.kind,
            old_line: last.old_line,
            new_line: last.new_line,
            content: NO_NEWLINE_MARKER.to_string(),
            no_newline_marker: true,
        };
        chunk.changes.push(marker);
    }
}

/// Parse unified / git-extended diff text into per-file records.
///
/// Empty or whitespace-only input yields an empty list. Never fails:
/// unmatched lines are skipped.
pub fn parse_unified_diff(input: &str) -> Vec<FileDiff> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    let mut parser = DiffParser::new();
    for line in input.split('\n') {
        parser.feed(line.strip_suffix('\r').unwrap_or(line));
    }

    debug!(
        "parser: files={} chunks={}",
        parser.files.len(),
        parser.files.iter().map(|f| f.chunks.len()).sum::<usize>()
    );
    parser.files
}

/// `Binary files x and y differ`, `Files x and y differ` or the start of a
/// `GIT binary patch` payload.
fn is_binary_notice(line: &str) -> bool {
    line == "GIT binary patch"
        || ((line.starts_with("Binary files ") || line.starts_with("Files "))
            && line.ends_with(" differ"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_counts_consistent(files: &[FileDiff]) {
        for f in files {
            let adds = f
                .chunks
                .iter()
                .flat_map(|c| &c.changes)
                .filter(|c| c.kind == ChangeKind::Add && !c.no_newline_marker)
                .count();
            let dels = f
                .chunks
                .iter()
                .flat_map(|c| &c.changes)
                .filter(|c| c.kind == ChangeKind::Del && !c.no_newline_marker)
                .count();
            assert_eq!(f.additions, adds, "additions for {}", f.display_path());
            assert_eq!(f.deletions, dels, "deletions for {}", f.display_path());
        }
    }

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        assert!(parse_unified_diff("").is_empty());
        assert!(parse_unified_diff("  \n\t\n").is_empty());
    }

    #[test]
    fn hunk_without_file_header_restarts_a_file() {
        let files = parse_unified_diff("@@ -1,2 +1,3 @@\n line1\n+line2\n line3\n");
        assert_eq!(files.len(), 1);
        let f = &files[0];
        assert_eq!(f.chunks.len(), 1);
        let c = &f.chunks[0];
        assert_eq!((c.old_lines, c.new_lines), (2, 3));
        assert_eq!(
            c.changes,
            vec![
                Change::normal(1, 1, "line1"),
                Change::add(2, "line2"),
                Change::normal(2, 3, "line3"),
            ]
        );
        assert_eq!((f.additions, f.deletions), (1, 0));
    }

    #[test]
    fn git_diff_with_two_files_and_modes() {
        let diff = "\
diff --git a/src/a.rs b/src/a.rs
index 83db48f..bf269f4 100644
--- a/src/a.rs
+++ b/src/a.rs
@@ -1,3 +1,3 @@ fn a()
 keep
-old
+new
 tail
diff --git a/new.txt b/new.txt
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/new.txt
@@ -0,0 +1,2 @@
+hello
+world
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);

        let a = &files[0];
        assert_eq!((a.from.as_str(), a.to.as_str()), ("src/a.rs", "src/a.rs"));
        assert_eq!(a.index, vec!["83db48f..bf269f4".to_string(), "100644".to_string()]);
        assert_eq!(a.old_mode.as_deref(), Some("100644"));
        assert_eq!(a.chunks[0].header, "@@ -1,3 +1,3 @@ fn a()");
        assert_eq!(
            a.chunks[0].changes,
            vec![
                Change::normal(1, 1, "keep"),
                Change::del(2, "old"),
                Change::add(2, "new"),
                Change::normal(3, 3, "tail"),
            ]
        );

        let n = &files[1];
        assert!(n.is_new);
        assert_eq!(n.from, "/dev/null");
        assert_eq!(n.to, "new.txt");
        assert_eq!(n.new_mode.as_deref(), Some("100644"));
        assert_eq!(n.additions, 2);
        assert_eq!(n.chunks[0].changes[1], Change::add(2, "world"));
        assert_counts_consistent(&files);
    }

    #[test]
    fn deleted_and_mode_only_files_have_no_chunks() {
        let diff = "\
diff --git a/gone.bin b/gone.bin
deleted file mode 100644
index e69de29..0000000
Binary files a/gone.bin and /dev/null differ
diff --git a/run.sh b/run.sh
old mode 100644
new mode 100755
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert!(files[0].is_deleted);
        assert_eq!(files[0].to, "/dev/null");
        assert!(files[0].is_header_only());
        assert!(files[0].is_binary);
        assert!(!files[1].is_binary);
        assert_eq!(files[1].old_mode.as_deref(), Some("100644"));
        assert_eq!(files[1].new_mode.as_deref(), Some("100755"));
        assert!(files[1].chunks.is_empty());
    }

    #[test]
    fn no_newline_marker_copies_last_change() {
        let diff = "--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n\\ No newline at end of file\n+b\n\\ No newline at end of file\n";
        let files = parse_unified_diff(diff);
        let changes = &files[0].chunks[0].changes;
        assert_eq!(changes.len(), 4);
        assert!(changes[1].no_newline_marker);
        assert_eq!(changes[1].kind, ChangeKind::Del);
        assert_eq!(changes[1].old_line, Some(1));
        assert!(changes[3].no_newline_marker);
        assert_eq!(changes[3].kind, ChangeKind::Add);
        assert_eq!(changes[3].new_line, Some(1));
        let chunk = &files[0].chunks[0];
        assert_eq!(chunk.old_side_count(), chunk.old_lines as usize);
        assert_eq!(chunk.new_side_count(), chunk.new_lines as usize);
        assert_counts_consistent(&files);
    }

    #[test]
    fn concatenated_patches_without_diff_line_split_into_files() {
        let diff = "--- a/x\n+++ b/x\n@@ -1,1 +1,1 @@\n-1\n+2\n--- a/y\n+++ b/y\n@@ -5,1 +5,2 @@\n z\n+w\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].to, "y");
        assert_eq!(files[1].chunks[0].changes[1], Change::add(6, "w"));
        assert_counts_consistent(&files);
    }

    #[test]
    fn garbage_is_skipped_without_panicking() {
        let files = parse_unified_diff("hello\nworld\n@@ broken @@\n");
        assert!(files.is_empty());
    }

    #[test]
    fn crlf_lines_are_cleaned_before_classification() {
        let diff = "diff --git a/w.txt b/w.txt\r\n--- a/w.txt\r\n+++ b/w.txt\r\n@@ -1,2 +1,2 @@\r\n keep\r\n-old\r\n+new\r\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].to, "w.txt");
        assert_eq!(
            files[0].chunks[0].changes,
            vec![
                Change::normal(1, 1, "keep"),
                Change::del(2, "old"),
                Change::add(2, "new"),
            ]
        );
        assert_eq!((files[0].additions, files[0].deletions), (1, 1));
    }

    #[test]
    fn zero_length_hunk_hands_back_to_headers() {
        let diff = "\
diff --git a/empty.txt b/empty.txt
@@ -0,0 +0,0 @@
diff --git a/next.rs b/next.rs
--- a/next.rs
+++ b/next.rs
@@ -1 +1 @@
-a
+b
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].to, "empty.txt");
        assert_eq!(files[0].chunks.len(), 1);
        assert!(files[0].chunks[0].changes.is_empty());
        assert_eq!(files[1].to, "next.rs");
        assert_eq!((files[1].additions, files[1].deletions), (1, 1));
    }

    #[test]
    fn hunk_past_line_space_is_dropped() {
        let files = parse_unified_diff("@@ -1,1 +4294967295,2 @@\n x\n+y\n");
        assert!(files.iter().all(|f| f.chunks.is_empty()));
        assert_counts_consistent(&files);

        let files = parse_unified_diff("--- a/x\n+++ b/x\n@@ -1,1 +4294967294,1 @@\n-a\n+b\n");
        let changes = &files[0].chunks[0].changes;
        assert_eq!(changes[1], Change::add(4294967294, "b"));
    }

    #[test]
    fn git_binary_patch_payload_marks_file() {
        let diff = "\
diff --git a/logo.png b/logo.png
index 1111111..2222222 100644
GIT binary patch
literal 12
Tcmd;JWMXCLVPRlmU|;|M
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert!(files[0].is_binary);
        assert!(files[0].chunks.is_empty());
        assert!(!is_binary_notice("+Binary files a and b differ"));
        assert!(is_binary_notice("Files a/x and b/x differ"));
    }
}

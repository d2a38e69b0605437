//! Path extraction from diff header lines.
//!
//! Git writes `a/`/`b/` prefixes by default, `i/`, `w/`, `c/`, `o/`, `1/`,
//! `2/` under `diff.mnemonicPrefix` and friends. Paths may contain spaces,
//! so the combined `diff --git` line is split on the second prefix marker,
//! never on whitespace.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref GIT_PREFIX_RE: Regex = Regex::new(r"^[abiwco12]/").unwrap();
    static ref FIRST_PATH_RE: Regex = Regex::new(r"[aiwco12]/").unwrap();
    static ref SECOND_PATH_RE: Regex = Regex::new(r#" ["']?[biwco12]/"#).unwrap();
    static ref LONE_PATH_RE: Regex = Regex::new(r"[biwco12]/").unwrap();
    static ref EDGE_QUOTE_RE: Regex = Regex::new(r#"^\\?['"]|\\?['"]$"#).unwrap();
    static ref TIMESTAMP_RE: Regex =
        Regex::new(r"\t.*|\d{4}-\d\d-\d\d\s\d\d:\d\d:\d\d(.\d+)?\s(\+|-)\d\d\d\d").unwrap();
}

/// Extract `(from, to)` from a `diff --git a/x b/y` line.
///
/// Missing sides come back as empty strings.
pub fn parse_git_header_paths(line: &str) -> (String, String) {
    let Some(first) = FIRST_PATH_RE.find(line) else {
        return match LONE_PATH_RE.find(line) {
            Some(m) => (clean_git_path(&line[m.start()..]), String::new()),
            None => (String::new(), String::new()),
        };
    };

    let tail = &line[first.start()..];
    // Greedy: the last marker wins so `a/x b/y b/z` keeps `x b/y` together.
    match SECOND_PATH_RE.find_iter(&tail[2..]).last() {
        Some(m) => {
            let split = 2 + m.start();
            let second_start = 2 + m.end() - 2;
            (
                clean_git_path(&tail[..split]),
                clean_git_path(&tail[second_start..]),
            )
        }
        None => match LONE_PATH_RE.find(line) {
            Some(m) => (clean_git_path(&line[m.start()..]), String::new()),
            None => (String::new(), String::new()),
        },
    }
}

/// Extract the path from a `--- path` or `+++ path` line.
///
/// Strips the marker, trailing timestamps, surrounding quotes and the git
/// prefix. `/dev/null` is returned as is.
pub fn parse_old_or_new_path(line: &str) -> String {
    let name = line.trim_start_matches(['-', '+']).trim();
    let name = remove_timestamp(name);
    let name = EDGE_QUOTE_RE.replace_all(name, "");
    GIT_PREFIX_RE.replace(&name, "").into_owned()
}

fn remove_timestamp(s: &str) -> &str {
    match TIMESTAMP_RE.find(s) {
        Some(m) => s[..m.start()].trim(),
        None => s,
    }
}

fn clean_git_path(s: &str) -> String {
    let s = s.strip_suffix(['"', '\'']).unwrap_or(s);
    GIT_PREFIX_RE.replace(s, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_git_header_on_prefix_markers() {
        assert_eq!(
            parse_git_header_paths("diff --git a/src/lib.rs b/src/lib.rs"),
            ("src/lib.rs".to_string(), "src/lib.rs".to_string())
        );
        assert_eq!(
            parse_git_header_paths("diff --git a/docs/my file.md b/docs/my file.md"),
            ("docs/my file.md".to_string(), "docs/my file.md".to_string())
        );
        assert_eq!(
            parse_git_header_paths("diff --git i/old.txt w/new.txt"),
            ("old.txt".to_string(), "new.txt".to_string())
        );
    }

    #[test]
    fn handles_quoted_git_header() {
        assert_eq!(
            parse_git_header_paths(r#"diff --git "a/with space.txt" "b/with space.txt""#),
            ("with space.txt".to_string(), "with space.txt".to_string())
        );
    }

    #[test]
    fn header_without_paths_is_empty() {
        assert_eq!(parse_git_header_paths(""), (String::new(), String::new()));
    }

    #[test]
    fn old_new_lines_drop_prefix_and_timestamp() {
        assert_eq!(parse_old_or_new_path("--- a/src/main.rs"), "src/main.rs");
        assert_eq!(parse_old_or_new_path("+++ b/src/main.rs"), "src/main.rs");
        assert_eq!(parse_old_or_new_path("--- /dev/null"), "/dev/null");
        assert_eq!(
            parse_old_or_new_path("--- file.txt\t2024-01-01 10:00:00.000000000 +0100"),
            "file.txt"
        );
        assert_eq!(
            parse_old_or_new_path("+++ file.txt 2002-02-21 23:30:39.942229878 -0800"),
            "file.txt"
        );
        assert_eq!(parse_old_or_new_path(r#"+++ "b/quoted name.txt""#), "quoted name.txt");
    }
}

//! Decoding model replies.
//!
//! Review replies are expected as
//! `{"reviews":[{"line_start":int,"line_end":int,"comment":string,"lgtm":bool}]}`,
//! optionally wrapped in a ```` ```json ```` fence. Models routinely emit raw
//! newlines or tabs inside string literals, so those are escaped first.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::ResponseError;

lazy_static! {
    static ref TRIAGE_RE: Regex = Regex::new(r"\[TRIAGE\]:\s*(NEEDS_REVIEW|APPROVED)").unwrap();
}

/// One review comment, in absolute new-file line numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub start_line: u32,
    pub end_line: u32,
    pub comment: String,
    pub lgtm: bool,
}

/// Escape raw control characters found inside JSON string literals.
///
/// Existing escape sequences and everything outside strings are kept as is.
pub fn sanitize_json_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in input.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Body of a ```` ```json ```` fence if present, the trimmed input otherwise.
fn strip_json_fence(raw: &str) -> &str {
    match (raw.find("```json"), raw.rfind("```")) {
        (Some(start), Some(end)) if end > start + 7 => raw[start + 7..end].trim(),
        _ => raw.trim(),
    }
}

/// Parse a review reply.
///
/// Entries without a comment are skipped; missing line numbers become 0.
pub fn parse_review_response(raw: &str) -> Result<Vec<ReviewComment>, ResponseError> {
    if raw.trim().is_empty() {
        return Err(ResponseError::Empty);
    }

    let json = sanitize_json_string(strip_json_fence(raw));
    let value: Value = serde_json::from_str(&json)?;
    let Some(entries) = value.get("reviews").and_then(Value::as_array) else {
        return Err(ResponseError::MissingReviews);
    };

    let line = |v: &Value, key: &str| -> u32 {
        v.get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    };

    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let comment = match entry.get("comment").and_then(Value::as_str) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => continue,
        };
        out.push(ReviewComment {
            start_line: line(entry, "line_start"),
            end_line: line(entry, "line_end"),
            comment,
            lgtm: entry.get("lgtm").and_then(Value::as_bool).unwrap_or(false),
        });
    }

    debug!("response: {} review entries", out.len());
    Ok(out)
}

/// Split a summary reply into `(summary, needs_review)`.
///
/// The `[TRIAGE]: NEEDS_REVIEW|APPROVED` tag is removed from the summary.
/// Without a tag the file needs review and the reply is returned untouched.
pub fn parse_triage(raw: &str) -> (String, bool) {
    match TRIAGE_RE.captures(raw) {
        Some(caps) => {
            let needs_review = caps.get(1).is_some_and(|m| m.as_str() == "NEEDS_REVIEW");
            let summary = TRIAGE_RE.replace(raw, "").trim().to_string();
            (summary, needs_review)
        }
        None => (raw.to_string(), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_reviews_with_defaults() {
        let raw = r#"{"reviews":[
            {"line_start": 3, "line_end": 5, "comment": "Off by one", "lgtm": false},
            {"line_end": 9, "comment": "LGTM", "lgtm": true},
            {"line_start": 1, "line_end": 1, "comment": ""},
            {"line_start": 2}
        ]}"#;
        let got = parse_review_response(raw).unwrap();
        assert_eq!(
            got,
            vec![
                ReviewComment {
                    start_line: 3,
                    end_line: 5,
                    comment: "Off by one".into(),
                    lgtm: false,
                },
                ReviewComment {
                    start_line: 0,
                    end_line: 9,
                    comment: "LGTM".into(),
                    lgtm: true,
                },
            ]
        );
    }

    #[test]
    fn accepts_fenced_reply_with_raw_newlines() {
        let raw = "Here you go:\n```json\n{\"reviews\":[{\"line_start\":1,\"line_end\":2,\"comment\":\"line one\nline two\"}]}\n```\n";
        let got = parse_review_response(raw).unwrap();
        assert_eq!(got[0].comment, "line one\nline two");
    }

    #[test]
    fn failures_are_values() {
        assert!(matches!(parse_review_response("  "), Err(ResponseError::Empty)));
        assert!(matches!(
            parse_review_response("{not json"),
            Err(ResponseError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_review_response(r#"{"comments":[]}"#),
            Err(ResponseError::MissingReviews)
        ));
        assert!(matches!(
            parse_review_response(r#"{"reviews":{}}"#),
            Err(ResponseError::MissingReviews)
        ));
    }

    #[test]
    fn sanitize_keeps_escapes_and_structure() {
        assert_eq!(sanitize_json_string("{\"a\":\"x\\\"y\"}\n"), "{\"a\":\"x\\\"y\"}\n");
        assert_eq!(sanitize_json_string("\"tab\there\""), "\"tab\\there\"");
        assert_eq!(sanitize_json_string("\"\u{01}\""), "\"\\u0001\"");
    }

    #[test]
    fn triage_tag_is_extracted() {
        assert_eq!(
            parse_triage("Renames a field.\n[TRIAGE]: APPROVED"),
            ("Renames a field.".to_string(), false)
        );
        assert_eq!(
            parse_triage("[TRIAGE]:NEEDS_REVIEW\nNew locking scheme."),
            ("New locking scheme.".to_string(), true)
        );
        assert_eq!(parse_triage("no tag "), ("no tag ".to_string(), true));
    }
}

//! Hidden HTML-comment markers carried inside PR comment bodies.
//!
//! The reviewed-commit block looks like:
//!
//! ```text
//! <!-- commit_ids_reviewed_start -->
//! <!-- 22c58c3c379401b52641c7d75b008325a4471d3e -->
//! <!-- 9f1d0e... -->
//! <!-- commit_ids_reviewed_end -->
//! ```
//!
//! Only the first start tag counts; its end tag is the first one after it.

pub const COMMIT_ID_START_TAG: &str = "<!-- commit_ids_reviewed_start -->";
pub const COMMIT_ID_END_TAG: &str = "<!-- commit_ids_reviewed_end -->";

pub const IN_PROGRESS_START_TAG: &str =
    "<!-- This is an auto-generated comment: summarize review in progress by AI reviewer -->";
pub const IN_PROGRESS_END_TAG: &str =
    "<!-- end of auto-generated comment: summarize review in progress by AI reviewer -->";

/// Byte offsets of `start_tag` and of the first `end_tag` after it.
fn locate(body: &str, start_tag: &str, end_tag: &str) -> Option<(usize, usize)> {
    let start = body.find(start_tag)?;
    let after = start + start_tag.len();
    let end = after + body[after..].find(end_tag)?;
    Some((start, end))
}

/// Text strictly between the two tags, or `""` when either is missing.
pub fn content_within_tags<'a>(body: &'a str, start_tag: &str, end_tag: &str) -> &'a str {
    match locate(body, start_tag, end_tag) {
        Some((start, end)) => &body[start + start_tag.len()..end],
        None => "",
    }
}

/// Drop everything from the first start tag through the last end tag.
pub fn remove_content_within_tags(body: &str, start_tag: &str, end_tag: &str) -> String {
    let (Some(start), Some(end)) = (body.find(start_tag), body.rfind(end_tag)) else {
        return body.to_string();
    };
    if end < start {
        return body.to_string();
    }
    format!("{}{}", &body[..start], &body[end + end_tag.len()..])
}

/// Reviewed commit ids in block order; `[]` without a block.
pub fn reviewed_ids(body: &str) -> Vec<String> {
    content_within_tags(body, COMMIT_ID_START_TAG, COMMIT_ID_END_TAG)
        .split("<!--")
        .map(|id| id.replacen("-->", "", 1).trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

/// The whole block, delimiters included, or `""`.
pub fn reviewed_ids_block(body: &str) -> &str {
    match locate(body, COMMIT_ID_START_TAG, COMMIT_ID_END_TAG) {
        Some((start, end)) => &body[start..end + COMMIT_ID_END_TAG.len()],
        None => "",
    }
}

/// Append `<!-- id -->` right before the end tag, creating the block if needed.
///
/// Not idempotent: adding an id twice records it twice.
pub fn add_reviewed_id(body: &str, commit_id: &str) -> String {
    match locate(body, COMMIT_ID_START_TAG, COMMIT_ID_END_TAG) {
        Some((_, end)) => format!("{}<!-- {} -->\n{}", &body[..end], commit_id, &body[end..]),
        None => format!(
            "{}\n{}\n<!-- {} -->\n{}",
            body, COMMIT_ID_START_TAG, commit_id, COMMIT_ID_END_TAG
        ),
    }
}

/// Prefix the body with an "in progress" banner unless one is already there.
pub fn add_in_progress_status(body: &str, status_msg: &str) -> String {
    if locate(body, IN_PROGRESS_START_TAG, IN_PROGRESS_END_TAG).is_some() {
        return body.to_string();
    }
    format!(
        "{IN_PROGRESS_START_TAG}\n\nCurrently reviewing new changes in this PR...\n\n{status_msg}\n\n{IN_PROGRESS_END_TAG}\n\n---\n\n{body}"
    )
}

/// Remove the "in progress" banner, tags included.
pub fn remove_in_progress_status(body: &str) -> String {
    match locate(body, IN_PROGRESS_START_TAG, IN_PROGRESS_END_TAG) {
        Some((start, end)) => format!(
            "{}{}",
            &body[..start],
            &body[end + IN_PROGRESS_END_TAG.len()..]
        ),
        None => body.to_string(),
    }
}

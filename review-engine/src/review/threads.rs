//! Existing review-comment threads attached to a hunk's line range.

use serde::{Deserialize, Serialize};

/// Login the bot posts under; its messages are rendered as the assistant.
pub const SELF_LOGIN: &str = "github-actions[bot]";

/// Tag the bot puts into its own replies.
pub const COMMENT_REPLY_TAG: &str = "<!-- This is an auto-generated reply by AI reviewer -->";

/// Review comment as listed by the provider (only the fields we read).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadComment {
    pub id: u64,
    #[serde(default)]
    pub in_reply_to_id: Option<u64>,
    pub path: String,
    /// Last line the comment covers.
    #[serde(default)]
    pub line: Option<u32>,
    /// First line of a multi-line comment.
    #[serde(default)]
    pub start_line: Option<u32>,
    pub body: String,
    pub author: String,
}

/// Comments on `path` lying within `[start, end]`.
///
/// Multi-line comments must be fully inside the range. Single-line comments
/// match when their line is anywhere inside it, not only when the range is
/// that single line.
pub fn comments_within_range<'a>(
    comments: &'a [ThreadComment],
    path: &str,
    start: u32,
    end: u32,
) -> Vec<&'a ThreadComment> {
    comments
        .iter()
        .filter(|c| c.path == path && !c.body.is_empty())
        .filter(|c| match (c.start_line, c.line) {
            (Some(first), Some(last)) => first >= start && last <= end,
            (None, Some(line)) => (start..=end).contains(&line),
            _ => false,
        })
        .collect()
}

fn role(login: &str) -> String {
    if login == SELF_LOGIN {
        "\nA (You): ".to_string()
    } else {
        format!("\nH (@{login}):")
    }
}

/// Render a top-level comment followed by its direct replies.
pub fn compose_chain(comments: &[&ThreadComment], top: &ThreadComment) -> String {
    let mut chain = vec![format!("{} {}", role(&top.author), top.body)];
    chain.extend(
        comments
            .iter()
            .filter(|c| c.in_reply_to_id == Some(top.id))
            .map(|c| format!("{} {}", role(&c.author), c.body)),
    );
    chain.join("\n")
}

/// All conversation chains in range whose text contains `tag`.
///
/// Returns `""` when none qualify.
pub fn comment_chains_within_range(
    comments: &[ThreadComment],
    path: &str,
    start: u32,
    end: u32,
    tag: &str,
) -> String {
    let in_range = comments_within_range(comments, path, start, end);
    let mut out = String::new();
    let mut n = 0usize;
    for top in in_range.iter().filter(|c| c.in_reply_to_id.is_none()) {
        let chain = compose_chain(&in_range, top);
        if chain.contains(tag) {
            n += 1;
            out.push_str(&format!("Conversation Chain {n}:\n{chain}\n---\n"));
        }
    }
    out
}

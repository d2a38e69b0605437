//! Markdown status blocks shown in the summary comment.

use super::outcome::ReviewTally;

/// `<details>` block with a bullet list, or `""` for an empty list.
fn details_list(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    format!(
        "\n<details>\n<summary>{} ({})</summary>\n\n* {}\n\n</details>\n",
        title,
        items.len(),
        items.join("\n* ")
    )
}

/// Status shown while a run is in progress.
///
/// `selected` pairs each file with its hunk count.
pub fn status_message(
    watermark: &str,
    head_sha: &str,
    selected: &[(String, usize)],
    ignored: &[String],
) -> String {
    let mut msg = format!(
        "<details>\n<summary>Commits</summary>\nFiles that changed from the base of the PR and between {watermark} and {head_sha} commits. (Focusing on incremental changes)\n</details>\n"
    );
    if !selected.is_empty() {
        let files: Vec<String> = selected
            .iter()
            .map(|(name, hunks)| format!("{name} ({hunks})"))
            .collect();
        msg.push_str(&format!(
            "\n<details>\n<summary>Files selected ({})</summary>\n\n* {}\n</details>\n",
            files.len(),
            files.join("\n* ")
        ));
    }
    msg.push_str(&details_list("Files ignored due to filter", ignored));
    msg
}

/// Sections appended once summarization is done.
pub fn summary_sections(not_processed: &[String], summaries_failed: &[String]) -> String {
    format!(
        "{}{}",
        details_list("Files not processed due to max files limit", not_processed),
        details_list("Files not summarized due to errors", summaries_failed)
    )
}

/// Sections appended once reviews are done.
pub fn review_sections(tally: &ReviewTally) -> String {
    format!(
        "{}{}\n<details>\n<summary>Review comments generated ({})</summary>\n\n* Review: {}\n* LGTM: {}\n\n</details>\n",
        details_list("Files not reviewed due to errors", &tally.failed),
        details_list("Files skipped from review due to trivial changes", &tally.skipped),
        tally.review_count + tally.lgtm_count,
        tally.review_count,
        tally.lgtm_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_lists_selected_and_ignored() {
        let msg = status_message(
            "abc",
            "def",
            &[("src/a.rs".to_string(), 2), ("src/b.rs".to_string(), 1)],
            &["Cargo.lock".to_string()],
        );
        assert!(msg.contains("between abc and def commits"));
        assert!(msg.contains("<summary>Files selected (2)</summary>\n\n* src/a.rs (2)\n* src/b.rs (1)\n"));
        assert!(msg.contains("<summary>Files ignored due to filter (1)</summary>\n\n* Cargo.lock\n"));
    }

    #[test]
    fn empty_lists_render_nothing() {
        let msg = status_message("", "h", &[], &[]);
        assert!(!msg.contains("Files selected"));
        assert!(!msg.contains("Files ignored"));
        assert_eq!(summary_sections(&[], &[]), "");
    }

    #[test]
    fn review_sections_count_comments() {
        let tally = ReviewTally {
            failed: vec![],
            skipped: vec!["big.rs (diff too large)".into()],
            review_count: 3,
            lgtm_count: 2,
        };
        let out = review_sections(&tally);
        assert!(out.contains("Files skipped from review due to trivial changes (1)"));
        assert!(out.contains("Review comments generated (5)"));
        assert!(out.contains("* Review: 3\n* LGTM: 2"));
        assert!(!out.contains("not reviewed due to errors"));
    }
}

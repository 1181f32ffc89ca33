//! Review text cleaning.

use std::sync::LazyLock;

use regex::Regex;

static EXPANDER_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)read more|read less").expect("valid regex"));

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Clean raw review text: strip "read more"/"read less" expander tokens
/// (case-insensitive), collapse whitespace runs to a single space, trim.
pub fn clean_review_text(text: &str) -> String {
    let stripped = EXPANDER_TOKENS.replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the first `keep` sentence-like segments of `text`, rejoined with
/// a period. Applied to fallback text that exceeds the truncation
/// threshold, where the candidate's full text tends to swallow sibling
/// boilerplate.
pub fn truncate_to_sentences(text: &str, keep: usize) -> String {
    let sentences: Vec<&str> = SENTENCE_BREAK.split(text).take(keep).collect();
    format!("{}.", sentences.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_expander_tokens() {
        let cleaned = clean_review_text("Great product Read More");
        assert_eq!(cleaned, "Great product");

        let cleaned = clean_review_text("Loved it read less honestly");
        assert_eq!(cleaned, "Loved it honestly");
    }

    #[test]
    fn test_collapses_whitespace() {
        let cleaned = clean_review_text("  too \n\n many\t\tspaces  ");
        assert_eq!(cleaned, "too many spaces");
    }

    #[test]
    fn test_truncate_keeps_leading_sentences() {
        let text = "First one. Second one! Third one? Fourth one. Fifth one.";
        let truncated = truncate_to_sentences(text, 3);
        assert_eq!(truncated, "First one.  Second one.  Third one.");
    }

    #[test]
    fn test_truncate_short_text_unharmed() {
        let truncated = truncate_to_sentences("Only sentence", 3);
        assert_eq!(truncated, "Only sentence.");
    }
}

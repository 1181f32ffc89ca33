//! Heuristic code-vs-prose classification.
//!
//! The broad fallback scan can capture inline script text that
//! superficially resembles prose; candidates matching enough
//! script/markup indicator patterns are rejected outright.

use std::sync::LazyLock;

use regex::RegexSet;

/// Indicator patterns for script and markup artifacts: function
/// declarations, event-handler registration, DOM-API identifiers, and
/// framework-internal call shapes.
static CODE_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"function\s*\(",
        r"p\.when\(",
        r"\.execute\(",
        r"toggleexpanderarialabel",
        r"typeof\s+",
        r"chrome\.runtime",
        r"addeventlistener",
        r"queryselector",
        r"innerhtml",
        r"textcontent",
    ])
    .expect("valid code patterns")
});

/// Number of distinct indicator patterns matching `text`.
pub fn code_pattern_matches(text: &str) -> usize {
    CODE_PATTERNS.matches(text).iter().count()
}

/// Whether `text` is classified as non-review code-like content:
/// at least `threshold` distinct indicator patterns match.
pub fn is_code_like(text: &str, threshold: usize) -> bool {
    code_pattern_matches(text) >= threshold
}

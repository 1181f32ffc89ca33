//! Star rating parsing.

use std::sync::LazyLock;

use regex::Regex;

static OUT_OF_FIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*out\s*of\s*5").expect("valid regex"));

static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("valid regex"));

/// Parse a star rating from a rating element's text.
///
/// An "N out of 5" pattern is accepted as-is; otherwise a bare decimal is
/// accepted only when it falls in `[1, 5]` - a bare "2023" in the text
/// must not become a rating. Returns `None` when nothing parses.
pub fn parse_rating(text: &str) -> Option<f32> {
    if let Some(captures) = OUT_OF_FIVE.captures(text) {
        if let Ok(value) = captures[1].parse::<f32>() {
            return Some(value);
        }
    }

    if let Some(captures) = BARE_NUMBER.captures(text) {
        if let Ok(value) = captures[1].parse::<f32>() {
            if (1.0..=5.0).contains(&value) {
                return Some(value);
            }
        }
    }

    None
}

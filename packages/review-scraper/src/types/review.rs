//! Review records and per-page extraction results.

use serde::{Deserialize, Serialize};

/// A single scraped review.
///
/// Immutable once produced by the extractor. `rating` is `0.0` when no
/// rating could be parsed, otherwise the parsed star value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Cleaned review text.
    pub text: String,

    /// Star rating, 0.0 when unknown.
    pub rating: f32,
}

impl ReviewRecord {
    /// Create a new review record.
    pub fn new(text: impl Into<String>, rating: f32) -> Self {
        Self {
            text: text.into(),
            rating,
        }
    }

    /// Create a record with no rating information.
    pub fn unrated(text: impl Into<String>) -> Self {
        Self::new(text, 0.0)
    }

    /// Whether a rating was successfully parsed for this review.
    pub fn has_rating(&self) -> bool {
        self.rating > 0.0
    }

    /// De-duplication fingerprint of this review's text.
    pub fn fingerprint(&self, prefix_len: usize) -> String {
        fingerprint(&self.text, prefix_len)
    }
}

/// Normalized fingerprint used to detect duplicates within one extraction
/// pass: lowercased, whitespace runs collapsed to a single space, trimmed,
/// truncated to `prefix_len` characters.
pub fn fingerprint(text: &str, prefix_len: usize) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(prefix_len)
        .collect()
}

/// The result of one extraction pass against one document state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Reviews in first-seen document order.
    pub reviews: Vec<ReviewRecord>,

    /// Resolved product title, or the sentinel `"unknown product"`.
    pub product_title: String,
}

impl ExtractionResult {
    /// Create a result from parts.
    pub fn new(reviews: Vec<ReviewRecord>, product_title: impl Into<String>) -> Self {
        Self {
            reviews,
            product_title: product_title.into(),
        }
    }

    /// A result with no reviews and the sentinel title.
    pub fn empty() -> Self {
        Self::new(Vec::new(), crate::extract::selectors::UNKNOWN_PRODUCT_TITLE)
    }

    /// Number of reviews found.
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// Whether this pass found zero reviews.
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

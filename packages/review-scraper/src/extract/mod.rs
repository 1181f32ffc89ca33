//! The extractor - selector fallbacks, text cleaning, classification,
//! and duplicate suppression for one document.

pub mod classify;
pub mod clean;
pub mod extractor;
pub mod rating;
pub mod selectors;

pub use classify::{code_pattern_matches, is_code_like};
pub use clean::{clean_review_text, truncate_to_sentences};
pub use extractor::Extractor;
pub use rating::parse_rating;

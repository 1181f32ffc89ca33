//! The review extractor - selector fallbacks, cleaning, de-duplication.
//!
//! Stateless and reentrant: one extraction pass owns its own "seen" set,
//! so concurrent documents never interfere. The extractor has no failure
//! mode beyond finding zero reviews; absence is an empty vector and the
//! caller decides whether that is an error.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::extract::clean::{clean_review_text, truncate_to_sentences};
use crate::extract::classify::is_code_like;
use crate::extract::rating::parse_rating;
use crate::extract::selectors::{
    element_text, first_match, first_matching_set, RATING_HINT_TERMS, RATING_SELECTORS,
    REVIEW_BODY_SELECTORS, REVIEW_CONTAINER_SELECTORS, SENTIMENT_TERMS, TITLE_SELECTORS,
    UNKNOWN_PRODUCT_TITLE,
};
use crate::types::config::HeuristicConfig;
use crate::types::review::{fingerprint, ExtractionResult, ReviewRecord};

/// Extracts candidate reviews and a product title from one parsed
/// document.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: HeuristicConfig,
}

impl Extractor {
    /// Create an extractor with default heuristics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom heuristics.
    pub fn with_config(config: HeuristicConfig) -> Self {
        Self { config }
    }

    /// Run one extraction pass against a parsed document.
    pub fn extract(&self, document: &Html) -> ExtractionResult {
        let product_title = self.resolve_title(document);
        debug!(title = %product_title, "resolved product title");

        let candidates = self.discover_candidates(document);
        debug!(count = candidates.len(), "discovered candidate elements");

        let mut reviews = Vec::new();
        let mut seen = HashSet::new();

        for candidate in candidates.into_iter().take(self.config.candidate_cap) {
            if is_script_element(candidate) {
                continue;
            }

            let text = self.candidate_text(candidate);
            if text.is_empty() || text.chars().count() <= self.config.min_review_len {
                continue;
            }
            if is_code_like(&text, self.config.code_pattern_threshold) {
                debug!(
                    snippet = %text.chars().take(50).collect::<String>(),
                    "rejected code-like candidate"
                );
                continue;
            }

            let hash = fingerprint(&text, self.config.fingerprint_prefix_len);
            if !seen.insert(hash) {
                debug!(
                    snippet = %text.chars().take(50).collect::<String>(),
                    "skipping duplicate review"
                );
                continue;
            }

            let rating = self.candidate_rating(candidate);
            reviews.push(ReviewRecord::new(text, rating));
        }

        debug!(reviews = reviews.len(), "extraction pass complete");
        ExtractionResult::new(reviews, product_title)
    }

    /// Convenience: parse raw HTML and extract.
    pub fn extract_html(&self, html: &str) -> ExtractionResult {
        let document = Html::parse_document(html);
        self.extract(&document)
    }

    /// Trimmed text of the first matching title selector, or the sentinel.
    fn resolve_title(&self, document: &Html) -> String {
        first_match(document, TITLE_SELECTORS)
            .map(|element| element_text(element).trim().to_string())
            .unwrap_or_else(|| UNKNOWN_PRODUCT_TITLE.to_string())
    }

    /// Candidate discovery: the first container selector that yields at
    /// least one match wins; otherwise a broad scan over every element.
    fn discover_candidates<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let specific = first_matching_set(document, REVIEW_CONTAINER_SELECTORS);
        if !specific.is_empty() {
            return specific;
        }

        debug!("no container selector matched, falling back to broad scan");
        let everything = Selector::parse("*").expect("valid selector");
        document
            .select(&everything)
            .filter(|element| self.broad_scan_keeps(*element))
            .collect()
    }

    /// Broad-scan predicate: the element's text mentions a rating term,
    /// or sits in the plausible-review length window and carries at
    /// least one strong-sentiment term.
    fn broad_scan_keeps(&self, element: ElementRef<'_>) -> bool {
        let text = element_text(element);
        if RATING_HINT_TERMS.iter().any(|term| text.contains(term)) {
            return true;
        }

        let len = text.chars().count();
        len > self.config.broad_scan_min_len
            && len < self.config.broad_scan_max_len
            && SENTIMENT_TERMS.iter().any(|term| text.contains(term))
    }

    /// Scoped text extraction with full-text fallback and sentence
    /// truncation for oversized fallbacks.
    fn candidate_text(&self, candidate: ElementRef<'_>) -> String {
        for pattern in REVIEW_BODY_SELECTORS {
            if let Ok(selector) = Selector::parse(pattern) {
                if let Some(body) = candidate.select(&selector).next() {
                    let text = clean_review_text(&element_text(body));
                    if text.chars().count() > self.config.min_review_len {
                        return text;
                    }
                }
            }
        }

        let mut text = clean_review_text(&element_text(candidate));
        if text.chars().count() > self.config.truncate_threshold {
            text = truncate_to_sentences(&text, self.config.truncate_sentences);
        }
        text
    }

    /// Rating extraction over the scoped selector chain. Each selector's
    /// first match gets one parse attempt before falling through.
    fn candidate_rating(&self, candidate: ElementRef<'_>) -> f32 {
        for pattern in RATING_SELECTORS {
            if let Ok(selector) = Selector::parse(pattern) {
                if let Some(element) = candidate.select(&selector).next() {
                    if let Some(rating) = parse_rating(&element_text(element)) {
                        return rating;
                    }
                }
            }
        }
        0.0
    }
}

/// Guard against the fallback scan picking up inline scripts.
fn is_script_element(element: ElementRef<'_>) -> bool {
    element.value().name().eq_ignore_ascii_case("script")
        || element.value().attr("type") == Some("text/javascript")
}

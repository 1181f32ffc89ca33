//! Ordered selector-fallback chains for review extraction.
//!
//! Each list is tried in priority order; the first pattern that matches
//! wins. The lists mirror the markup of the supported marketplaces.

use scraper::{ElementRef, Html, Selector};

/// Sentinel title when no title selector matches.
pub const UNKNOWN_PRODUCT_TITLE: &str = "unknown product";

/// Product title selectors, most specific first.
pub const TITLE_SELECTORS: &[&str] = &[
    "#productTitle",
    ".product-title",
    "h1[data-automation-id=\"product-title\"]",
    ".a-size-large.product-title-word-break",
];

/// Review container selectors.
pub const REVIEW_CONTAINER_SELECTORS: &[&str] = &[
    "[data-hook=\"review\"]",
    ".review",
    ".a-section.review",
    "[data-csa-c-type=\"review\"]",
    ".a-section[data-hook=\"review\"]",
];

/// Review body selectors, scoped to one candidate element.
pub const REVIEW_BODY_SELECTORS: &[&str] = &[
    "[data-hook=\"review-body\"]",
    ".review-text",
    ".a-expander-content",
    ".a-size-base.review-text",
    "span[data-hook=\"review-body\"]",
    ".a-expander-content span",
    ".review-text-content",
];

/// Rating selectors, scoped to one candidate element.
pub const RATING_SELECTORS: &[&str] = &[
    "[data-hook=\"review-star-rating\"]",
    ".a-icon-alt",
    ".review-rating",
    "i[class*=\"star\"]",
];

/// Terms that mark an element as rating-bearing during the broad scan.
pub const RATING_HINT_TERMS: &[&str] = &["stars", "rating"];

/// Strong-sentiment vocabulary for the broad fallback scan.
pub const SENTIMENT_TERMS: &[&str] = &["good", "bad", "great", "terrible"];

/// First element matching any selector in the list, in list order.
pub fn first_match<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for pattern in selectors {
        if let Ok(selector) = Selector::parse(pattern) {
            if let Some(element) = document.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

/// All elements matching the first selector in the list that matches
/// anything, stopping at that selector.
pub fn first_matching_set<'a>(document: &'a Html, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    for pattern in selectors {
        if let Ok(selector) = Selector::parse(pattern) {
            let matches: Vec<_> = document.select(&selector).collect();
            tracing::debug!(selector = pattern, count = matches.len(), "tried selector");
            if !matches.is_empty() {
                return matches;
            }
        }
    }
    Vec::new()
}

/// Full text content of an element, descendants included.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selector_lists_parse() {
        for pattern in TITLE_SELECTORS
            .iter()
            .chain(REVIEW_CONTAINER_SELECTORS)
            .chain(REVIEW_BODY_SELECTORS)
            .chain(RATING_SELECTORS)
        {
            assert!(
                Selector::parse(pattern).is_ok(),
                "selector failed to parse: {pattern}"
            );
        }
    }

    #[test]
    fn test_first_matching_set_stops_at_first_hit() {
        let html = r#"
            <div class="review">one</div>
            <div class="a-section review">two</div>
            <div data-hook="review">primary</div>
        "#;
        let document = Html::parse_document(html);
        let matches = first_matching_set(&document, REVIEW_CONTAINER_SELECTORS);

        // [data-hook="review"] is first in the chain, so only it matches.
        assert_eq!(matches.len(), 1);
        assert_eq!(element_text(matches[0]).trim(), "primary");
    }

    #[test]
    fn test_first_match_falls_through_to_later_selectors() {
        let html = r#"<h1 class="product-title">Widget</h1>"#;
        let document = Html::parse_document(html);
        let element = first_match(&document, TITLE_SELECTORS).unwrap();
        assert_eq!(element_text(element), "Widget");
    }
}

//! Link finding for "jump to reviews section" and "next page"
//! navigation.
//!
//! Two-tier strategy in both cases: an ordered list of link selectors is
//! tried first (each selector's first match is considered, invisible
//! matches fall through to the next selector), then a document-order
//! scan of links with a substring test. Both return the href that would
//! be activated; actually following it is the page agent's job.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Reviews-section link selectors, most specific first.
pub const REVIEWS_LINK_SELECTORS: &[&str] = &[
    "a[href*=\"reviews\"]",
    "a[href*=\"review\"]",
    "[data-hook=\"reviews-medley\"] a",
    ".reviews-medley a",
];

/// Next-page link selectors.
pub const NEXT_PAGE_SELECTORS: &[&str] = &[
    "a[aria-label*=\"next\"]",
    ".a-pagination .a-last a",
    "[data-hook=\"pagination-next\"]",
];

/// Pagination area scanned by the next-page fallback.
const PAGINATION_LINKS: &str = ".a-pagination a";

/// Find the reviews-section link to activate, returning its href.
pub fn find_reviews_link(document: &Html) -> Option<String> {
    if let Some(href) = first_visible_href(document, REVIEWS_LINK_SELECTORS) {
        return Some(href);
    }

    // Fallback: scan every link in document order.
    let all_links = Selector::parse("a").expect("valid selector");
    for link in document.select(&all_links) {
        let text = link_text(link).to_lowercase();
        let href = link.value().attr("href").unwrap_or("");
        if (text.contains("review") || href.contains("review")) && is_visible(link) {
            if !href.is_empty() {
                debug!(href, "reviews link found by fallback scan");
                return Some(href.to_string());
            }
        }
    }

    None
}

/// Find the next-page link to activate, returning its href.
pub fn find_next_page_link(document: &Html) -> Option<String> {
    if let Some(href) = first_visible_href(document, NEXT_PAGE_SELECTORS) {
        return Some(href);
    }

    // Fallback: pagination-area links whose text says "next" or is a
    // page number, pointing back into the reviews section.
    if let Ok(selector) = Selector::parse(PAGINATION_LINKS) {
        for link in document.select(&selector) {
            let text = link_text(link);
            let href = link.value().attr("href").unwrap_or("");
            let looks_like_pagination =
                text.to_lowercase().contains("next") || text.chars().any(|c| c.is_ascii_digit());
            if looks_like_pagination && href.contains("reviews") {
                debug!(href, "next-page link found by pagination scan");
                return Some(href.to_string());
            }
        }
    }

    None
}

/// First tier: each selector's first match is checked for visibility and
/// an href; otherwise the next selector is tried.
fn first_visible_href(document: &Html, selectors: &[&str]) -> Option<String> {
    for pattern in selectors {
        if let Ok(selector) = Selector::parse(pattern) {
            if let Some(link) = document.select(&selector).next() {
                if is_visible(link) {
                    if let Some(href) = link.value().attr("href") {
                        debug!(selector = pattern, href, "navigation link found");
                        return Some(href.to_string());
                    }
                }
            }
        }
    }
    None
}

fn link_text(link: ElementRef<'_>) -> String {
    link.text().collect::<String>()
}

/// Static approximation of "zero rendered width or height": the element
/// and its ancestors must not be hidden by attribute or inline style,
/// and the element itself must not be collapsed to zero size.
fn is_visible(element: ElementRef<'_>) -> bool {
    if has_zero_size(element) {
        return false;
    }

    let mut current = Some(element);
    while let Some(el) = current {
        if is_hidden(el) {
            return false;
        }
        current = el
            .parent()
            .and_then(ElementRef::wrap);
    }
    true
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() || value.attr("aria-hidden") == Some("true") {
        return true;
    }
    match value.attr("style") {
        Some(style) => {
            let style = style.to_lowercase().replace(' ', "");
            style.contains("display:none") || style.contains("visibility:hidden")
        }
        None => false,
    }
}

/// Inline `width`/`height` declarations that collapse the element to
/// zero. Declarations are parsed property by property so `max-width: 0`
/// or `width: 0.5px` are not misread as zero-size.
fn has_zero_size(element: ElementRef<'_>) -> bool {
    let Some(style) = element.value().attr("style") else {
        return false;
    };

    style.split(';').any(|declaration| {
        let mut parts = declaration.splitn(2, ':');
        let property = parts.next().unwrap_or("").trim().to_lowercase();
        if property != "width" && property != "height" {
            return false;
        }

        let value = parts.next().unwrap_or("").trim().to_lowercase();
        let number = value.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
        matches!(number.parse::<f32>(), Ok(n) if n == 0.0)
    })
}

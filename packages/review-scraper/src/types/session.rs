//! Scraping sessions - multi-page aggregation of extraction results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::review::{ExtractionResult, ReviewRecord};

/// Aggregated results of one multi-page scraping session.
///
/// Owned exclusively by the orchestrator while the loop runs, then
/// finalized and handed to downstream reporting. Reviews are concatenated
/// across pages; duplicates are only suppressed within a single page's
/// extraction pass, not across pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSession {
    /// All reviews collected, in page order then document order.
    pub all_reviews: Vec<ReviewRecord>,

    /// Product title taken from page 1 only.
    pub product_title: String,

    /// Number of pages the caller asked for.
    pub pages_requested: usize,

    /// Number of pages actually attempted. Always <= `pages_requested`;
    /// stops short when next-page navigation fails.
    pub pages_completed: usize,

    /// When the session started.
    pub started_at: DateTime<Utc>,

    /// When the session was finalized, if it has been.
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScrapeSession {
    /// Start a new session for the requested page count.
    pub fn new(pages_requested: usize) -> Self {
        Self {
            all_reviews: Vec::new(),
            product_title: String::new(),
            pages_requested,
            pages_completed: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Merge one page's extraction result into the session.
    ///
    /// The product title is only captured from the first page that
    /// provides one; later pages never overwrite it.
    pub fn absorb(&mut self, result: ExtractionResult) {
        if self.product_title.is_empty() {
            self.product_title = result.product_title;
        }
        self.all_reviews.extend(result.reviews);
    }

    /// Record that a page's extraction phase has concluded.
    pub fn complete_page(&mut self, page: usize) {
        debug_assert!(page <= self.pages_requested);
        self.pages_completed = page;
    }

    /// Mark the session finalized. Read-only from here on.
    pub fn finalize(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total number of reviews collected across all pages.
    pub fn review_count(&self) -> usize {
        self.all_reviews.len()
    }

    /// Whether the session collected zero reviews.
    pub fn is_empty(&self) -> bool {
        self.all_reviews.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_keeps_first_title() {
        let mut session = ScrapeSession::new(2);
        session.absorb(ExtractionResult::new(
            vec![ReviewRecord::unrated("first page review text")],
            "Widget Deluxe",
        ));
        session.absorb(ExtractionResult::new(
            vec![ReviewRecord::unrated("second page review text")],
            "Some Other Title",
        ));

        assert_eq!(session.product_title, "Widget Deluxe");
        assert_eq!(session.review_count(), 2);
    }

    #[test]
    fn test_duplicates_across_pages_are_kept() {
        let mut session = ScrapeSession::new(2);
        let record = ReviewRecord::unrated("same review appears twice");
        session.absorb(ExtractionResult::new(vec![record.clone()], "Widget"));
        session.absorb(ExtractionResult::new(vec![record], "Widget"));

        assert_eq!(session.review_count(), 2);
    }

    #[test]
    fn test_complete_page_tracks_progress() {
        let mut session = ScrapeSession::new(3);
        session.complete_page(1);
        session.complete_page(2);
        assert_eq!(session.pages_completed, 2);
        assert!(session.pages_completed <= session.pages_requested);
    }

    #[test]
    fn test_session_serializes_for_export() {
        let mut session = ScrapeSession::new(1);
        session.absorb(ExtractionResult::new(
            vec![ReviewRecord::new("solid little gadget, no regrets", 4.0)],
            "Widget",
        ));
        session.complete_page(1);
        session.finalize();

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["product_title"], "Widget");
        assert_eq!(json["pages_completed"], 1);
        assert_eq!(json["all_reviews"][0]["rating"], 4.0);
        assert!(json["finished_at"].is_string());
    }

    #[test]
    fn test_finalize_sets_timestamp() {
        let mut session = ScrapeSession::new(1);
        assert!(session.finished_at.is_none());
        session.finalize();
        assert!(session.finished_at.is_some());
    }
}

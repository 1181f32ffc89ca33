//! The orchestrator: drives extraction across a bounded number of pages.
//!
//! The loop is strictly sequential - one page at a time, never two agent
//! requests in flight for a session. Sequencing is a correctness
//! requirement: extracting against a document that has not finished a
//! just-triggered navigation yields stale or empty results. Every
//! cross-context request carries an explicit deadline from
//! [`SessionConfig`].

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::agent::{ExtractRequest, PageAgent, TabProvider};
use crate::error::{AgentResult, Result, ScrapeError};
use crate::types::config::{normalize_url, SessionConfig};
use crate::types::review::ExtractionResult;
use crate::types::session::ScrapeSession;

/// Multi-page review scraper over a tab provider.
pub struct Scraper<P: TabProvider> {
    provider: P,
    config: SessionConfig,
}

impl<P: TabProvider> Scraper<P> {
    /// Create a scraper with default session bounds.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, SessionConfig::default())
    }

    /// Create a scraper with custom session bounds.
    pub fn with_config(provider: P, config: SessionConfig) -> Self {
        Self { provider, config }
    }

    /// Scrape up to `page_count` pages of reviews starting at `location`.
    ///
    /// Fails with `InvalidInput` before any navigation for unrecognized
    /// locations or out-of-range page counts, and with `NoReviewsFound`
    /// when every page (including the single recovery attempt) came back
    /// empty. Early next-page navigation failure is not fatal: the
    /// session simply stops short, with `pages_completed` below
    /// `pages_requested`.
    pub async fn scrape(&self, location: &str, page_count: usize) -> Result<ScrapeSession> {
        self.config.validate_request(location, page_count)?;
        let url = normalize_url(location);

        info!(url = %url, pages = page_count, "starting scrape session");

        let agent = self
            .bounded("page load", self.config.load_timeout, self.provider.open(&url))
            .await?;

        let mut session = ScrapeSession::new(page_count);

        for page in 1..=page_count {
            info!(
                page,
                total = page_count,
                collected = session.review_count(),
                "scraping page"
            );

            match self.extract_page(&agent, page, page_count).await {
                Ok(result) => {
                    let found = result.review_count();
                    debug!(page, found, "extraction returned");
                    let empty = result.is_empty();
                    session.absorb(result);

                    // Single recovery attempt: first page only, zero
                    // reviews - jump to the reviews section and retry
                    // one extraction.
                    if empty && page == 1 {
                        if let Some(recovered) = self.recover(&agent, page, page_count).await {
                            info!(
                                recovered = recovered.review_count(),
                                "recovery extraction merged"
                            );
                            session.absorb(recovered);
                        }
                    }
                }
                Err(ScrapeError::Timeout { step }) if page == 1 => {
                    // A first-page timeout is not fatal by itself; the
                    // zero-reviews check at the end decides.
                    warn!(step, "first-page extraction timed out, attempting recovery");
                    if let Some(recovered) = self.recover(&agent, page, page_count).await {
                        session.absorb(recovered);
                    }
                }
                Err(e) => return Err(e),
            }

            session.complete_page(page);

            if page < page_count {
                match self.next_page(&agent).await {
                    Ok(()) => {}
                    Err(e) => {
                        // Pagination ends early; the session keeps what
                        // it has collected so far.
                        warn!(page, error = %e, "stopping pagination early");
                        break;
                    }
                }
            }
        }

        if session.is_empty() {
            return Err(ScrapeError::NoReviewsFound);
        }

        session.finalize();
        info!(
            reviews = session.review_count(),
            pages_completed = session.pages_completed,
            pages_requested = session.pages_requested,
            "scrape session finished"
        );
        Ok(session)
    }

    /// One deadline-bounded extraction request.
    async fn extract_page(
        &self,
        agent: &P::Agent,
        page: usize,
        total_pages: usize,
    ) -> Result<ExtractionResult> {
        let request = ExtractRequest::new(page, total_pages);
        self.bounded(
            "review extraction",
            self.config.extract_timeout,
            agent.extract(&request),
        )
        .await
    }

    /// The single recovery attempt: navigate to the reviews section,
    /// settle, re-extract once. Any failure inside recovery is folded
    /// into "no reviews recovered" - the terminal zero-reviews check
    /// decides whether the session fails.
    async fn recover(
        &self,
        agent: &P::Agent,
        page: usize,
        total_pages: usize,
    ) -> Option<ExtractionResult> {
        info!("no reviews found, attempting to navigate to reviews section");

        let activated = self
            .bounded(
                "reviews-section navigation",
                self.config.navigate_timeout,
                agent.navigate_to_reviews_section(),
            )
            .await;

        match activated {
            Ok(true) => {}
            Ok(false) => {
                warn!("no reviews-section link found");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "reviews-section navigation failed");
                return None;
            }
        }

        self.settle(agent, self.config.reviews_settle).await;

        match self.extract_page(agent, page, total_pages).await {
            Ok(result) if !result.is_empty() => Some(result),
            Ok(_) => {
                debug!("recovery extraction found nothing");
                None
            }
            Err(e) => {
                warn!(error = %e, "recovery extraction failed");
                None
            }
        }
    }

    /// Advance to the next page, or error to end pagination early.
    async fn next_page(&self, agent: &P::Agent) -> Result<()> {
        let activated = self
            .bounded(
                "next-page navigation",
                self.config.navigate_timeout,
                agent.navigate_to_next_page(),
            )
            .await?;

        if !activated {
            return Err(ScrapeError::Navigation {
                reason: "no next-page link found".to_string(),
            });
        }

        self.settle(agent, self.config.next_page_settle).await;
        Ok(())
    }

    /// Readiness poll after a navigation, bounded by `bound`. Replaces
    /// the fixed settle sleeps of the reference behavior: returns as
    /// soon as the agent reports settled, and gives up (proceeding
    /// anyway) once the bound elapses.
    async fn settle(&self, agent: &P::Agent, bound: Duration) {
        let deadline = Instant::now() + bound;
        loop {
            match agent.is_settled().await {
                Ok(true) => return,
                Ok(false) => {}
                Err(e) => {
                    warn!(error = %e, "readiness probe failed while settling");
                }
            }
            if Instant::now() >= deadline {
                warn!(bound_ms = bound.as_millis() as u64, "settle bound elapsed");
                return;
            }
            sleep(self.config.settle_poll_interval).await;
        }
    }

    /// Race a cross-context request against its deadline.
    async fn bounded<T>(
        &self,
        step: &str,
        deadline: Duration,
        request: impl Future<Output = AgentResult<T>>,
    ) -> Result<T> {
        match timeout(deadline, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ScrapeError::Agent(e)),
            Err(_) => Err(ScrapeError::Timeout {
                step: step.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::dom::{DomSite, DomTabProvider};
    use crate::error::AgentError;
    use crate::testing::{extraction, MockAgent, MockTabProvider};

    const PRODUCT_URL: &str = "https://www.amazon.com/dp/B000";

    fn scraper(agent: MockAgent) -> Scraper<MockTabProvider> {
        Scraper::new(MockTabProvider::new(agent))
    }

    #[tokio::test]
    async fn test_invalid_location_rejected_before_navigation() {
        let provider = MockTabProvider::new(MockAgent::new());
        let scraper = Scraper::new(provider.clone());

        let err = scraper
            .scrape("https://example.com/product", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidInput { .. }));
        // Nothing was opened.
        assert!(provider.opened().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_page_count_rejected() {
        let scraper = scraper(MockAgent::new());
        assert!(matches!(
            scraper.scrape(PRODUCT_URL, 0).await.unwrap_err(),
            ScrapeError::InvalidInput { .. }
        ));
        assert!(matches!(
            scraper.scrape(PRODUCT_URL, 11).await.unwrap_err(),
            ScrapeError::InvalidInput { .. }
        ));
    }

    #[tokio::test]
    async fn test_single_page_session() {
        let agent = MockAgent::new().with_extraction(extraction(
            "Widget",
            &[("solid construction, no complaints", 5.0)],
        ));
        let session = scraper(agent.clone()).scrape(PRODUCT_URL, 1).await.unwrap();

        assert_eq!(session.review_count(), 1);
        assert_eq!(session.product_title, "Widget");
        assert_eq!(session.pages_completed, 1);
        assert!(session.finished_at.is_some());
        // No navigation of any kind for a one-page session.
        assert_eq!(agent.next_nav_call_count(), 0);
        assert_eq!(agent.reviews_nav_call_count(), 0);
    }

    // Scenario: page count 3, next-page navigation succeeds for 1→2 but
    // fails for 2→3. The session stops at 2 pages without failing.
    #[tokio::test]
    async fn test_navigation_failure_stops_short_without_failing() {
        let agent = MockAgent::new()
            .with_extraction(extraction("Widget", &[("page one review text", 4.0)]))
            .with_extraction(extraction("Widget", &[("page two review text", 3.0)]))
            .with_next_nav(true)
            .with_next_nav(false);

        let session = scraper(agent.clone()).scrape(PRODUCT_URL, 3).await.unwrap();

        assert_eq!(session.pages_requested, 3);
        assert_eq!(session.pages_completed, 2);
        assert_eq!(session.review_count(), 2);
        assert_eq!(agent.extract_call_count(), 2);
        assert_eq!(agent.next_nav_call_count(), 2);
    }

    #[tokio::test]
    async fn test_recovery_on_empty_first_page() {
        let agent = MockAgent::new()
            .with_extraction(extraction("Widget", &[]))
            .with_reviews_nav(true)
            .with_extraction(extraction(
                "Widget",
                &[("found after jumping to reviews section", 4.0)],
            ));

        let session = scraper(agent.clone()).scrape(PRODUCT_URL, 1).await.unwrap();

        assert_eq!(session.review_count(), 1);
        assert_eq!(agent.reviews_nav_call_count(), 1);
        assert_eq!(agent.extract_call_count(), 2);
    }

    #[tokio::test]
    async fn test_recovery_never_attempted_on_later_pages() {
        let agent = MockAgent::new()
            .with_extraction(extraction("Widget", &[("page one review text", 4.0)]))
            .with_extraction(extraction("Widget", &[])) // page 2 empty
            .with_next_nav(true)
            .with_next_nav(true);

        let session = scraper(agent.clone()).scrape(PRODUCT_URL, 3).await.unwrap();

        // Page 2 was empty but no reviews-section navigation happened.
        assert_eq!(agent.reviews_nav_call_count(), 0);
        assert_eq!(session.pages_completed, 3);
        assert_eq!(session.review_count(), 1);
    }

    #[tokio::test]
    async fn test_recovery_attempted_at_most_once() {
        // Both the initial and the recovery extraction come back empty;
        // the reviews-section jump must not be retried.
        let agent = MockAgent::new()
            .with_extraction(extraction("Widget", &[]))
            .with_reviews_nav(true)
            .with_extraction(extraction("Widget", &[]));

        let err = scraper(agent.clone()).scrape(PRODUCT_URL, 1).await.unwrap_err();

        assert!(matches!(err, ScrapeError::NoReviewsFound));
        assert_eq!(agent.reviews_nav_call_count(), 1);
        assert_eq!(agent.extract_call_count(), 2);
    }

    #[tokio::test]
    async fn test_zero_reviews_is_fatal_after_recovery() {
        let agent = MockAgent::new()
            .with_extraction(extraction("Widget", &[]))
            .with_reviews_nav(false);

        let err = scraper(agent).scrape(PRODUCT_URL, 2).await.unwrap_err();
        assert!(matches!(err, ScrapeError::NoReviewsFound));
    }

    #[tokio::test]
    async fn test_rejected_extraction_fails_session() {
        let agent = MockAgent::new()
            .with_extraction(extraction("Widget", &[("page one review text", 4.0)]))
            .with_next_nav(true)
            .with_extract_error(AgentError::rejected("content script gone"));

        let err = scraper(agent).scrape(PRODUCT_URL, 2).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Agent(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_fails_session() {
        // A broken channel to the page agent is fatal, same as an
        // explicit rejection.
        let agent = MockAgent::new()
            .with_extract_error(AgentError::Channel("connection reset by peer".into()));

        let err = scraper(agent).scrape(PRODUCT_URL, 1).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::Agent(AgentError::Channel(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_extraction_timeout_on_later_page_is_fatal() {
        let agent = MockAgent::new()
            .with_extraction(extraction("Widget", &[("page one review text", 4.0)]))
            .with_next_nav(true)
            .with_delayed_extraction(
                Duration::from_secs(60),
                extraction("Widget", &[("never arrives", 0.0)]),
            );

        let err = scraper(agent).scrape(PRODUCT_URL, 2).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Timeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_page_timeout_enters_recovery() {
        let agent = MockAgent::new()
            .with_delayed_extraction(Duration::from_secs(60), extraction("Widget", &[]))
            .with_reviews_nav(true)
            .with_extraction(extraction(
                "Widget",
                &[("recovered after slow first extraction", 3.0)],
            ));

        let session = scraper(agent.clone()).scrape(PRODUCT_URL, 1).await.unwrap();

        assert_eq!(session.review_count(), 1);
        assert_eq!(agent.reviews_nav_call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_timeout_stops_pagination_early() {
        let agent = MockAgent::new()
            .with_extraction(extraction("Widget", &[("page one review text", 4.0)]))
            .with_delayed_next_nav(Duration::from_secs(60), true);

        let session = scraper(agent).scrape(PRODUCT_URL, 3).await.unwrap();

        assert_eq!(session.pages_completed, 1);
        assert_eq!(session.review_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_open_surfaces_agent_error() {
        let provider = MockTabProvider::new(MockAgent::new()).failing_open();
        let err = Scraper::new(provider)
            .scrape(PRODUCT_URL, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Agent(_)));
    }

    // End-to-end against fixture documents: product page without
    // reviews, recovery jump into the reviews section, then pagination
    // across two review pages.
    #[tokio::test]
    async fn test_end_to_end_over_dom_fixtures() {
        let site = DomSite::new()
            .with_page(
                "https://www.amazon.com/dp/B000",
                r#"
                <h1 id="productTitle">Widget Deluxe</h1>
                <p>Product description without any reviews on it.</p>
                <a href="/dp/B000/product-reviews">See all 128 reviews</a>
                "#,
            )
            .with_page(
                "https://www.amazon.com/dp/B000/product-reviews",
                r#"
                <h1 id="productTitle">Widget Deluxe</h1>
                <div data-hook="review">
                    <i data-hook="review-star-rating"><span class="a-icon-alt">5.0 out of 5 stars</span></i>
                    <span data-hook="review-body">Excellent widget, sturdy and well made.</span>
                </div>
                <div data-hook="review">
                    <span data-hook="review-body">Decent value for the price, some rough edges.</span>
                </div>
                <ul class="a-pagination">
                    <li class="a-last"><a href="/dp/B000/product-reviews?page=2">Next</a></li>
                </ul>
                "#,
            )
            .with_page(
                "https://www.amazon.com/dp/B000/product-reviews?page=2",
                r#"
                <div data-hook="review">
                    <span data-hook="review-body">Stopped working after two weeks, disappointed.</span>
                </div>
                "#,
            );

        let scraper = Scraper::new(DomTabProvider::new(site));
        let session = scraper
            .scrape("https://www.amazon.com/dp/B000", 3)
            .await
            .unwrap();

        // Page 1 (product page) was empty; recovery jumped into the
        // reviews section and found two. Page 2 added one more. Page 3
        // had no next link, so pagination stopped short.
        assert_eq!(session.review_count(), 3);
        assert_eq!(session.product_title, "Widget Deluxe");
        assert_eq!(session.pages_requested, 3);
        assert_eq!(session.pages_completed, 2);
        assert_eq!(session.all_reviews[0].rating, 5.0);
        assert!(session.all_reviews[2].text.contains("Stopped working"));
    }
}

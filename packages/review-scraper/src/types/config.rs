//! Configuration for extraction heuristics and scraping sessions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Tunable thresholds for the extraction heuristics.
///
/// Every magic number in the selector-fallback pipeline lives here so the
/// de-duplication and classification behavior is independently testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Minimum cleaned text length for a candidate to become a review.
    pub min_review_len: usize,

    /// Lower length bound for the broad fallback element scan.
    pub broad_scan_min_len: usize,

    /// Upper length bound for the broad fallback element scan.
    pub broad_scan_max_len: usize,

    /// Maximum candidates processed per extraction pass.
    pub candidate_cap: usize,

    /// Number of code-indicator pattern matches that rejects a candidate.
    pub code_pattern_threshold: usize,

    /// Character prefix length of the de-duplication fingerprint.
    pub fingerprint_prefix_len: usize,

    /// Fallback text longer than this is truncated to leading sentences.
    pub truncate_threshold: usize,

    /// How many sentence-like segments survive truncation.
    pub truncate_sentences: usize,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            min_review_len: 10,
            broad_scan_min_len: 50,
            broad_scan_max_len: 1000,
            candidate_cap: 10,
            code_pattern_threshold: 2,
            fingerprint_prefix_len: 100,
            truncate_threshold: 500,
            truncate_sentences: 3,
        }
    }
}

impl HeuristicConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate cap.
    pub fn with_candidate_cap(mut self, cap: usize) -> Self {
        self.candidate_cap = cap;
        self
    }

    /// Set the minimum review length.
    pub fn with_min_review_len(mut self, len: usize) -> Self {
        self.min_review_len = len;
        self
    }

    /// Set the code-indicator rejection threshold.
    pub fn with_code_pattern_threshold(mut self, threshold: usize) -> Self {
        self.code_pattern_threshold = threshold;
        self
    }

    /// Set the fingerprint prefix length.
    pub fn with_fingerprint_prefix_len(mut self, len: usize) -> Self {
        self.fingerprint_prefix_len = len;
        self
    }
}

/// Timeouts, settle bounds, and input limits for a scraping session.
///
/// Every cross-context request the orchestrator issues is bounded by one
/// of these deadlines; the timeout is part of the call contract rather
/// than an ambient race.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Deadline for one extraction request.
    pub extract_timeout: Duration,

    /// Deadline for one navigation request.
    pub navigate_timeout: Duration,

    /// Deadline for the initial document load.
    pub load_timeout: Duration,

    /// Settle bound after navigating to the reviews section.
    pub reviews_settle: Duration,

    /// Settle bound after navigating to the next page.
    pub next_page_settle: Duration,

    /// Poll interval for the readiness probe while settling.
    pub settle_poll_interval: Duration,

    /// Upper bound on the requested page count.
    pub max_pages: usize,

    /// Marketplace domains accepted as scrape targets.
    pub allowed_domains: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            extract_timeout: Duration::from_secs(15),
            navigate_timeout: Duration::from_secs(10),
            load_timeout: Duration::from_secs(30),
            reviews_settle: Duration::from_secs(3),
            next_page_settle: Duration::from_secs(2),
            settle_poll_interval: Duration::from_millis(100),
            max_pages: 10,
            allowed_domains: vec![
                "amazon.com".to_string(),
                "amazon.in".to_string(),
                "flipkart.com".to_string(),
            ],
        }
    }
}

impl SessionConfig {
    /// Create a config with default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extraction deadline.
    pub fn with_extract_timeout(mut self, timeout: Duration) -> Self {
        self.extract_timeout = timeout;
        self
    }

    /// Set the navigation deadline.
    pub fn with_navigate_timeout(mut self, timeout: Duration) -> Self {
        self.navigate_timeout = timeout;
        self
    }

    /// Set the maximum requested page count.
    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = max;
        self
    }

    /// Replace the accepted marketplace domains.
    pub fn with_allowed_domains(
        mut self,
        domains: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_domains = domains.into_iter().map(|d| d.into()).collect();
        self
    }

    /// Validate a scrape request before any navigation happens.
    ///
    /// Rejects locations outside the allowed marketplace domains and page
    /// counts outside `1..=max_pages`.
    pub fn validate_request(&self, location: &str, page_count: usize) -> Result<(), ScrapeError> {
        if page_count == 0 || page_count > self.max_pages {
            return Err(ScrapeError::InvalidInput {
                reason: format!(
                    "page count must be between 1 and {}, got {}",
                    self.max_pages, page_count
                ),
            });
        }

        let normalized = normalize_url(location);
        let parsed = url::Url::parse(&normalized).map_err(|e| ScrapeError::InvalidInput {
            reason: format!("unparseable location {location:?}: {e}"),
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ScrapeError::InvalidInput {
                reason: format!("location {location:?} has no host"),
            })?;

        let allowed = self
            .allowed_domains
            .iter()
            .any(|d| host == d || host.ends_with(&format!(".{d}")));

        if !allowed {
            return Err(ScrapeError::InvalidInput {
                reason: format!("host {host:?} is not a recognized marketplace domain"),
            });
        }

        Ok(())
    }
}

/// Normalize a location by adding https:// if no scheme is present.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

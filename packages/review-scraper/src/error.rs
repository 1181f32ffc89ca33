//! Typed errors for the review scraping library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can terminate a scraping session.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Rejected before any navigation: bad location or page count.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A cross-context request exceeded its deadline.
    #[error("timed out waiting for {step}")]
    Timeout { step: String },

    /// Next-page or reviews-section activation did not find a target.
    #[error("navigation failed: {reason}")]
    Navigation { reason: String },

    /// No reviews were found on any page, including the recovery attempt.
    #[error("no reviews found on any page")]
    NoReviewsFound,

    /// The page agent rejected or failed a request.
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),
}

/// Errors crossing the orchestrator/agent message boundary.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent explicitly rejected the request.
    #[error("request rejected: {reason}")]
    Rejected { reason: String },

    /// No document is available at the requested location.
    #[error("page not found: {url}")]
    PageNotFound { url: String },

    /// The underlying transport failed.
    #[error("channel error: {0}")]
    Channel(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AgentError {
    /// Build a rejection with a human-readable cause.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Result type alias for session-level operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for agent requests.
pub type AgentResult<T> = std::result::Result<T, AgentError>;

//! Browser-Independent Review Scraping Library
//!
//! A best-effort extraction pipeline for consumer product reviews:
//! ordered selector fallbacks, text cleaning, duplicate suppression, and
//! heuristic code-vs-prose classification, driven across a paginated
//! review listing by a deadline-aware orchestration loop.
//!
//! # Design Philosophy
//!
//! - Heuristics over guarantees: absence of reviews is data, not an error
//! - Every threshold is named configuration, not a hardcoded literal
//! - The extractor is stateless and reentrant per document
//! - Timeouts are part of the call contract, not an ambient race
//! - Navigation settles by readiness polling, never by blind sleeps
//!
//! # Usage
//!
//! ```rust,ignore
//! use review_scraper::{DomSite, DomTabProvider, Scraper};
//!
//! let site = DomSite::new().with_page("https://www.amazon.com/dp/B000", html);
//! let scraper = Scraper::new(DomTabProvider::new(site));
//!
//! let session = scraper.scrape("https://www.amazon.com/dp/B000", 3).await?;
//! println!("{}", review_scraper::report::format_report(&session));
//! ```
//!
//! # Modules
//!
//! - [`extract`] - Selector fallbacks, cleaning, classification, de-dup
//! - [`navigate`] - Reviews-section and next-page link finding
//! - [`agent`] - The orchestrator/agent message boundary
//! - [`pipeline`] - The multi-page orchestration loop
//! - [`types`] - Review records, sessions, configuration
//! - [`report`] - Plain-text rendering of finalized sessions
//! - [`testing`] - Scripted mocks for orchestration tests

pub mod agent;
pub mod error;
pub mod extract;
pub mod navigate;
pub mod pipeline;
pub mod report;
pub mod testing;
pub mod types;

// Re-export core types at crate root
pub use error::{AgentError, AgentResult, Result, ScrapeError};
pub use types::{
    config::{normalize_url, HeuristicConfig, SessionConfig},
    review::{fingerprint, ExtractionResult, ReviewRecord},
    session::ScrapeSession,
};

// Re-export the extractor and orchestrator
pub use extract::Extractor;
pub use pipeline::Scraper;

// Re-export the agent boundary
pub use agent::{
    dom::{DomAgent, DomSite, DomTabProvider},
    ExtractRequest, PageAgent, TabProvider,
};

// Re-export navigation link finding
pub use navigate::{find_next_page_link, find_reviews_link};

// Re-export report rendering
pub use report::{format_assistant_prompt, format_report};

//! The orchestrator/agent message boundary.
//!
//! A page agent lives with one loaded document and answers three
//! requests: extract, navigate to the reviews section, navigate to the
//! next page. The orchestrator talks to it through `PageAgent` so any
//! RPC-like channel (or an in-memory document, see [`dom`]) can sit on
//! the other side. Deadlines are enforced by the caller, not here.

pub mod dom;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentResult;
use crate::types::review::ExtractionResult;

/// Payload of an extraction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// 1-based page number within the session.
    pub page: usize,

    /// Total pages the session asked for.
    pub total_pages: usize,
}

impl ExtractRequest {
    /// Build a request for one page of a session.
    pub fn new(page: usize, total_pages: usize) -> Self {
        Self { page, total_pages }
    }
}

/// A page-resident extraction agent.
///
/// Implementations must be reentrant per document; the orchestrator
/// guarantees it never has two requests in flight for one session.
#[async_trait]
pub trait PageAgent: Send + Sync {
    /// Run one extraction pass against the current document state.
    async fn extract(&self, request: &ExtractRequest) -> AgentResult<ExtractionResult>;

    /// Try to activate a link into the reviews section. Returns whether
    /// any activation occurred.
    async fn navigate_to_reviews_section(&self) -> AgentResult<bool>;

    /// Try to activate the next-page pagination link. Returns whether
    /// any activation occurred.
    async fn navigate_to_next_page(&self) -> AgentResult<bool>;

    /// Readiness probe polled after a navigation, replacing fixed settle
    /// sleeps. Agents whose documents mutate asynchronously report
    /// `false` until the mutation has landed.
    async fn is_settled(&self) -> AgentResult<bool> {
        Ok(true)
    }

    /// Agent name for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Opens a target location and hands back the agent for the loaded
/// document. `open` resolves once the document reports load-complete;
/// the orchestrator bounds the wait.
#[async_trait]
pub trait TabProvider: Send + Sync {
    /// The agent type this provider yields.
    type Agent: PageAgent;

    /// Open the location and wait for load-complete.
    async fn open(&self, url: &str) -> AgentResult<Self::Agent>;
}

//! Mock implementations for testing the orchestration loop.
//!
//! `MockAgent` answers requests from scripted queues and records every
//! call, so tests can assert on ordering, recovery behavior, and
//! deadline handling without any documents involved. Deadline tests
//! pair scripted delays with `#[tokio::test(start_paused = true)]`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::agent::{ExtractRequest, PageAgent, TabProvider};
use crate::error::{AgentError, AgentResult};
use crate::types::review::{ExtractionResult, ReviewRecord};

struct Scripted<T> {
    delay: Option<Duration>,
    response: AgentResult<T>,
}

impl<T> Scripted<T> {
    fn immediate(response: AgentResult<T>) -> Self {
        Self {
            delay: None,
            response,
        }
    }
}

/// Build an extraction result from `(text, rating)` pairs.
pub fn extraction(title: &str, reviews: &[(&str, f32)]) -> ExtractionResult {
    ExtractionResult::new(
        reviews
            .iter()
            .map(|(text, rating)| ReviewRecord::new(*text, *rating))
            .collect(),
        title,
    )
}

/// Scripted page agent with call tracking.
///
/// Each request pops the next scripted response from its queue; an empty
/// queue yields the neutral default (empty extraction, `false`
/// navigation).
#[derive(Clone, Default)]
pub struct MockAgent {
    extract_script: Arc<Mutex<VecDeque<Scripted<ExtractionResult>>>>,
    reviews_nav_script: Arc<Mutex<VecDeque<Scripted<bool>>>>,
    next_nav_script: Arc<Mutex<VecDeque<Scripted<bool>>>>,
    extract_calls: Arc<Mutex<Vec<ExtractRequest>>>,
    reviews_nav_calls: Arc<Mutex<usize>>,
    next_nav_calls: Arc<Mutex<usize>>,
}

impl MockAgent {
    /// Create an agent with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful extraction response.
    pub fn with_extraction(self, result: ExtractionResult) -> Self {
        self.extract_script
            .lock()
            .unwrap()
            .push_back(Scripted::immediate(Ok(result)));
        self
    }

    /// Queue an extraction response that arrives after `delay`.
    pub fn with_delayed_extraction(self, delay: Duration, result: ExtractionResult) -> Self {
        self.extract_script.lock().unwrap().push_back(Scripted {
            delay: Some(delay),
            response: Ok(result),
        });
        self
    }

    /// Queue an extraction failure.
    pub fn with_extract_error(self, error: AgentError) -> Self {
        self.extract_script
            .lock()
            .unwrap()
            .push_back(Scripted::immediate(Err(error)));
        self
    }

    /// Queue a reviews-section navigation outcome.
    pub fn with_reviews_nav(self, activated: bool) -> Self {
        self.reviews_nav_script
            .lock()
            .unwrap()
            .push_back(Scripted::immediate(Ok(activated)));
        self
    }

    /// Queue a next-page navigation outcome.
    pub fn with_next_nav(self, activated: bool) -> Self {
        self.next_nav_script
            .lock()
            .unwrap()
            .push_back(Scripted::immediate(Ok(activated)));
        self
    }

    /// Queue a next-page navigation response that arrives after `delay`.
    pub fn with_delayed_next_nav(self, delay: Duration, activated: bool) -> Self {
        self.next_nav_script.lock().unwrap().push_back(Scripted {
            delay: Some(delay),
            response: Ok(activated),
        });
        self
    }

    /// Extraction requests received, in order.
    pub fn extract_calls(&self) -> Vec<ExtractRequest> {
        self.extract_calls.lock().unwrap().clone()
    }

    /// Number of extraction requests received.
    pub fn extract_call_count(&self) -> usize {
        self.extract_calls.lock().unwrap().len()
    }

    /// Number of reviews-section navigation requests received.
    pub fn reviews_nav_call_count(&self) -> usize {
        *self.reviews_nav_calls.lock().unwrap()
    }

    /// Number of next-page navigation requests received.
    pub fn next_nav_call_count(&self) -> usize {
        *self.next_nav_calls.lock().unwrap()
    }

    async fn play<T>(script: &Mutex<VecDeque<Scripted<T>>>, default: AgentResult<T>) -> AgentResult<T> {
        let next = script.lock().unwrap().pop_front();
        match next {
            Some(scripted) => {
                if let Some(delay) = scripted.delay {
                    tokio::time::sleep(delay).await;
                }
                scripted.response
            }
            None => default,
        }
    }
}

#[async_trait]
impl PageAgent for MockAgent {
    async fn extract(&self, request: &ExtractRequest) -> AgentResult<ExtractionResult> {
        self.extract_calls.lock().unwrap().push(request.clone());
        Self::play(&self.extract_script, Ok(ExtractionResult::empty())).await
    }

    async fn navigate_to_reviews_section(&self) -> AgentResult<bool> {
        *self.reviews_nav_calls.lock().unwrap() += 1;
        Self::play(&self.reviews_nav_script, Ok(false)).await
    }

    async fn navigate_to_next_page(&self) -> AgentResult<bool> {
        *self.next_nav_calls.lock().unwrap() += 1;
        Self::play(&self.next_nav_script, Ok(false)).await
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Tab provider handing out clones of one [`MockAgent`].
#[derive(Clone, Default)]
pub struct MockTabProvider {
    agent: MockAgent,
    opened: Arc<Mutex<Vec<String>>>,
    fail_open: Arc<Mutex<bool>>,
}

impl MockTabProvider {
    /// Create a provider around a scripted agent.
    pub fn new(agent: MockAgent) -> Self {
        Self {
            agent,
            opened: Arc::new(Mutex::new(Vec::new())),
            fail_open: Arc::new(Mutex::new(false)),
        }
    }

    /// Make `open` fail with a page-not-found error.
    pub fn failing_open(self) -> Self {
        *self.fail_open.lock().unwrap() = true;
        self
    }

    /// URLs that were opened, in order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl TabProvider for MockTabProvider {
    type Agent = MockAgent;

    async fn open(&self, url: &str) -> AgentResult<Self::Agent> {
        self.opened.lock().unwrap().push(url.to_string());
        if *self.fail_open.lock().unwrap() {
            return Err(AgentError::PageNotFound {
                url: url.to_string(),
            });
        }
        Ok(self.agent.clone())
    }
}

//! In-memory DOM agent.
//!
//! Backs the agent traits with a map of URL to HTML, so the whole
//! multi-page loop runs against fixture documents: extraction uses the
//! real extractor, navigation runs the real link finding and follows the
//! activated href. Useful for tests and for embedders that can supply
//! HTML snapshots instead of a live browser.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

use crate::agent::{ExtractRequest, PageAgent, TabProvider};
use crate::error::{AgentError, AgentResult};
use crate::extract::Extractor;
use crate::navigate::{find_next_page_link, find_reviews_link};
use crate::types::config::normalize_url;
use crate::types::review::ExtractionResult;

/// A fixture site: URL → HTML document.
#[derive(Debug, Clone, Default)]
pub struct DomSite {
    pages: HashMap<String, String>,
}

impl DomSite {
    /// Create an empty site.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document at a URL (builder pattern).
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Look up a document by URL.
    pub fn get(&self, url: &str) -> Option<&str> {
        self.pages.get(url).map(String::as_str)
    }

    /// Whether the site has a document at this URL.
    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }
}

/// Page agent over one [`DomSite`], tracking the "current" document the
/// way a tab tracks its location.
pub struct DomAgent {
    site: Arc<DomSite>,
    current_url: RwLock<String>,
    extractor: Extractor,
}

impl DomAgent {
    /// Create an agent positioned at `url`.
    pub fn new(site: Arc<DomSite>, url: impl Into<String>) -> Self {
        Self {
            site,
            current_url: RwLock::new(url.into()),
            extractor: Extractor::new(),
        }
    }

    /// Use a custom extractor (non-default heuristics).
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// The URL the agent currently points at.
    pub fn current_url(&self) -> String {
        self.current_url.read().unwrap().clone()
    }

    fn current_html(&self) -> AgentResult<String> {
        let url = self.current_url();
        self.site
            .get(&url)
            .map(str::to_string)
            .ok_or(AgentError::PageNotFound { url })
    }

    /// Resolve an activated href against the current location.
    fn resolve(&self, href: &str) -> String {
        let current = self.current_url();
        match url::Url::parse(&current).and_then(|base| base.join(href)) {
            Ok(resolved) => resolved.to_string(),
            // Relative resolution failed; treat the href as absolute.
            Err(_) => href.to_string(),
        }
    }

    fn follow(&self, href: &str) -> bool {
        let target = self.resolve(href);
        debug!(href, target = %target, "following activated link");
        *self.current_url.write().unwrap() = target;
        true
    }
}

#[async_trait]
impl PageAgent for DomAgent {
    async fn extract(&self, request: &ExtractRequest) -> AgentResult<ExtractionResult> {
        let html = self.current_html()?;
        debug!(
            page = request.page,
            total_pages = request.total_pages,
            url = %self.current_url(),
            "extracting from document"
        );
        Ok(self.extractor.extract_html(&html))
    }

    async fn navigate_to_reviews_section(&self) -> AgentResult<bool> {
        let html = self.current_html()?;
        let href = {
            let document = Html::parse_document(&html);
            find_reviews_link(&document)
        };
        Ok(match href {
            Some(href) => self.follow(&href),
            None => false,
        })
    }

    async fn navigate_to_next_page(&self) -> AgentResult<bool> {
        let html = self.current_html()?;
        let href = {
            let document = Html::parse_document(&html);
            find_next_page_link(&document)
        };
        Ok(match href {
            Some(href) => self.follow(&href),
            None => false,
        })
    }

    fn name(&self) -> &str {
        "dom"
    }
}

/// Tab provider over a [`DomSite`]: "opening" a URL positions a fresh
/// agent at it, load-complete is immediate.
#[derive(Clone)]
pub struct DomTabProvider {
    site: Arc<DomSite>,
}

impl DomTabProvider {
    /// Create a provider for a fixture site.
    pub fn new(site: DomSite) -> Self {
        Self {
            site: Arc::new(site),
        }
    }
}

#[async_trait]
impl TabProvider for DomTabProvider {
    type Agent = DomAgent;

    async fn open(&self, url: &str) -> AgentResult<Self::Agent> {
        let url = normalize_url(url);
        if !self.site.contains(&url) {
            return Err(AgentError::PageNotFound { url });
        }
        Ok(DomAgent::new(Arc::clone(&self.site), url))
    }
}

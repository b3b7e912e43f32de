use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{ScrapeError, ScrapeResult};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Anything that can hand back the raw document behind a URL.
pub trait PageSource {
    fn get(&self, url: &str) -> ScrapeResult<String>;
}

/// Blocking HTTP page source. One request in flight at a time.
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ScrapeResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScrapeError::network("<client setup>", e.to_string()))?;
        Ok(Self { client })
    }
}

impl PageSource for HttpClient {
    fn get(&self, url: &str) -> ScrapeResult<String> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ScrapeError::network(url, e.to_string()))?;
        response
            .text()
            .map_err(|e| ScrapeError::network(url, format!("reading body: {e}")))
    }
}

/// In-memory page source keyed by exact URL. Records every request in order.
///
/// Fixture source for the unit and integration tests; not meant for runs.
#[doc(hidden)]
#[derive(Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.pages.insert(url.into(), body.into());
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl PageSource for StaticPages {
    fn get(&self, url: &str) -> ScrapeResult<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::network(url, "404 Not Found"))
    }
}

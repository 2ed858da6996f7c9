//! Testing utilities including mock implementations.
//!
//! Useful for testing applications that use the harvest library without
//! making real model or network calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult, HarvestError, Result};
use crate::traits::{fetcher::PageFetcher, model::TextModel};
use crate::types::page::FetchedPage;

/// A mock text model returning canned completions.
///
/// Responses are matched by prompt substring first, then served from a
/// queue in order, then fall back to an empty JSON array.
#[derive(Default)]
pub struct MockModel {
    by_substring: Arc<RwLock<Vec<(String, String)>>>,
    queued: Arc<RwLock<VecDeque<String>>>,
    fail_always: bool,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockModel {
    /// Create a mock model that answers `[]` to everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock model whose calls always fail.
    pub fn failing() -> Self {
        Self {
            fail_always: true,
            ..Default::default()
        }
    }

    /// Queue a response, served in FIFO order.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.queued.write().unwrap().push_back(response.into());
        self
    }

    /// Answer with `response` whenever the prompt contains `substring`.
    pub fn with_response_for(
        self,
        substring: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.by_substring
            .write()
            .unwrap()
            .push((substring.into(), response.into()));
        self
    }

    /// Prompts this mock has been called with.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.write().unwrap().push(prompt.to_string());

        if self.fail_always {
            return Err(HarvestError::Model("mock model failure".into()));
        }

        let by_substring = self.by_substring.read().unwrap();
        if let Some((_, response)) = by_substring.iter().find(|(key, _)| prompt.contains(key)) {
            return Ok(response.clone());
        }
        drop(by_substring);

        if let Some(response) = self.queued.write().unwrap().pop_front() {
            return Ok(response);
        }

        Ok("[]".to_string())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock page fetcher serving predefined pages.
#[derive(Default)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, FetchedPage>>>,
    failures: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create an empty mock fetcher. Unknown URLs return a 404 error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a page, keyed by its URL.
    pub fn with_page(self, page: FetchedPage) -> Self {
        self.pages.write().unwrap().insert(page.url.clone(), page);
        self
    }

    /// Make fetches of `url` fail.
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.failures.write().unwrap().insert(url.into());
        self
    }

    /// URLs this mock has been asked to fetch.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.calls.write().unwrap().push(url.to_string());

        if self.failures.read().unwrap().contains(url) {
            return Err(FetchError::Status {
                status: 503,
                url: url.to_string(),
            });
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

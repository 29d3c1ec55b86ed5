//! Mock search backend for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{LookupError, SearchBackend, SearchHit};

/// A configurable mock response for [`MockDb`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate a match, with or without a link.
    Found { url: Option<String> },
    /// Simulate an empty result list.
    NotFound,
    /// Simulate a failed lookup.
    Error(LookupError),
}

/// A hand-rolled mock implementing [`SearchBackend`] for tests.
///
/// Supports:
/// - A fixed response (used for every call), **or**
/// - A sequence of responses (one per call, repeating the last if exhausted).
/// - Optional per-call latency.
/// - Call counting via [`call_count()`](MockDb::call_count) and a log of the
///   queried references via [`queries()`](MockDb::queries).
pub struct MockDb {
    name: &'static str,
    /// Pending responses, stored reversed so `pop()` yields the next one.
    responses: Mutex<Vec<MockResponse>>,
    /// Used when the sequence is empty (or single-response mode).
    fallback: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockDb {
    /// Create a mock that always returns `response`.
    pub fn new(name: &'static str, response: MockResponse) -> Self {
        Self {
            name,
            responses: Mutex::new(Vec::new()),
            fallback: response,
            delay: None,
            call_count: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(name: &'static str, mut responses: Vec<MockResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        responses.reverse();
        let fallback = responses[0].clone();
        Self {
            name,
            responses: Mutex::new(responses),
            fallback,
            delay: None,
            call_count: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `search()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// References passed to `search()`, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = match self.responses.lock() {
            Ok(seq) => seq,
            Err(poisoned) => poisoned.into_inner(),
        };
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl SearchBackend for MockDb {
    fn name(&self) -> &str {
        self.name
    }

    fn search<'a>(
        &'a self,
        reference: &'a str,
        _client: &'a reqwest::Client,
        _timeout: Option<Duration>,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SearchHit>, LookupError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut q) = self.queries.lock() {
            q.push(reference.to_string());
        }
        let response = self.next_response();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match response {
                MockResponse::Found { url } => Ok(Some(SearchHit { url })),
                MockResponse::NotFound => Ok(None),
                MockResponse::Error(e) => Err(e),
            }
        })
    }
}

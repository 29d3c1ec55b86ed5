//! Per-candidate verification: online match plus synthetic-text flag.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};

use crate::db::SearchBackend;
use crate::db::crossref::CrossRef;
use crate::{
    Config, CoreError, MatchOutcome, ProgressEvent, VerificationVerdict, detector, splitter,
};

/// Checks candidate references against a search backend.
///
/// Lookups for one document run through an order-preserving buffered stream,
/// so at most `max_concurrent` requests are in flight and verdicts always come
/// back in candidate order. A failed lookup only affects its own verdict.
pub struct Verifier {
    backend: Arc<dyn SearchBackend>,
    client: reqwest::Client,
    timeout: Option<Duration>,
    max_concurrent: usize,
}

impl Verifier {
    /// Build a verifier that queries CrossRef as configured.
    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        if config.search_endpoint.trim().is_empty() {
            return Err(CoreError::Config("search endpoint is empty".into()));
        }
        let backend = CrossRef {
            endpoint: config.search_endpoint.clone(),
            mailto: config.mailto.clone(),
        };
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            backend: Arc::new(backend),
            client,
            timeout: config.lookup_timeout(),
            max_concurrent: config.max_concurrent_lookups.max(1),
        })
    }

    /// Build a verifier around an arbitrary backend (used with `MockDb`).
    pub fn with_backend(backend: Arc<dyn SearchBackend>, config: &Config) -> Self {
        Self {
            backend,
            client: reqwest::Client::new(),
            timeout: config.lookup_timeout(),
            max_concurrent: config.max_concurrent_lookups.max(1),
        }
    }

    /// Display name of the search backend, for logs and reports.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Look one reference up. Never fails: errors are folded into the outcome.
    pub async fn match_reference(&self, reference: &str) -> MatchOutcome {
        let result = self
            .backend
            .search(reference, &self.client, self.timeout)
            .await;
        if let Err(ref e) = result {
            tracing::warn!(db = self.backend.name(), error = %e, "lookup failed");
        }
        MatchOutcome::from_search(result)
    }

    /// Verify candidates, returning exactly one verdict per candidate in the
    /// same order.
    pub async fn verify_candidates<F>(
        &self,
        candidates: Vec<String>,
        progress: F,
    ) -> Vec<VerificationVerdict>
    where
        F: Fn(ProgressEvent) + Send + Sync,
    {
        let total = candidates.len();
        let progress = &progress;

        let verdicts: Vec<VerificationVerdict> = stream::iter(candidates.into_iter().enumerate())
            .map(|(index, reference)| async move {
                progress(ProgressEvent::Checking {
                    index,
                    total,
                    reference: reference.clone(),
                });

                let outcome = self.match_reference(&reference).await;
                let is_likely_synthetic = detector::is_likely_synthetic(&reference);
                let verdict = VerificationVerdict {
                    reference,
                    outcome,
                    is_likely_synthetic,
                };

                progress(ProgressEvent::Result {
                    index,
                    total,
                    verdict: Box::new(verdict.clone()),
                });
                verdict
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        tracing::debug!(total, db = self.backend.name(), "verification complete");
        verdicts
    }

    /// Split `text` into candidates and verify them.
    pub async fn verify_text<F>(&self, text: &str, progress: F) -> Vec<VerificationVerdict>
    where
        F: Fn(ProgressEvent) + Send + Sync,
    {
        self.verify_candidates(splitter::split_references(text), progress)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LookupError;
    use crate::db::mock::{MockDb, MockResponse};
    use std::sync::Mutex;

    fn config(max_concurrent_lookups: usize) -> Config {
        Config {
            max_concurrent_lookups,
            ..Config::default()
        }
    }

    fn candidates(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("[{i}] Author {i}. A reasonably long reference title number {i}."))
            .collect()
    }

    #[tokio::test]
    async fn one_verdict_per_candidate_in_order() {
        let mock = Arc::new(
            MockDb::new(
                "Mock",
                MockResponse::Found {
                    url: Some("http://example.org/doi/1".into()),
                },
            )
            .with_delay(Duration::from_millis(5)),
        );
        let verifier = Verifier::with_backend(mock.clone(), &config(4));

        let input = candidates(10);
        let verdicts = verifier.verify_candidates(input.clone(), |_| {}).await;

        assert_eq!(verdicts.len(), input.len());
        let refs: Vec<_> = verdicts.iter().map(|v| v.reference.clone()).collect();
        assert_eq!(refs, input);
        assert_eq!(mock.call_count(), 10);
    }

    #[tokio::test]
    async fn lookup_error_is_isolated_to_its_candidate() {
        let mock = Arc::new(MockDb::with_sequence(
            "Mock",
            vec![
                MockResponse::NotFound,
                MockResponse::Error(LookupError::Transport("connection reset".into())),
                MockResponse::Found { url: None },
            ],
        ));
        let verifier = Verifier::with_backend(mock, &config(1));

        let verdicts = verifier.verify_candidates(candidates(3), |_| {}).await;

        assert_eq!(verdicts[0].outcome, MatchOutcome::NotFound);
        assert_eq!(verdicts[1].source_found(), "Error: connection reset");
        assert!(!verdicts[1].found());
        assert_eq!(verdicts[2].outcome, MatchOutcome::FoundWithoutLink);
    }

    #[tokio::test]
    async fn sequential_mode_queries_in_order() {
        let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
        let verifier = Verifier::with_backend(mock.clone(), &config(1));

        let input = candidates(5);
        verifier.verify_candidates(input.clone(), |_| {}).await;

        assert_eq!(mock.queries(), input);
    }

    #[tokio::test]
    async fn synthetic_flag_is_independent_of_match() {
        let mock = Arc::new(MockDb::new(
            "Mock",
            MockResponse::Found {
                url: Some("http://x".into()),
            },
        ));
        let verifier = Verifier::with_backend(mock, &config(2));

        let verdicts = verifier
            .verify_candidates(
                vec![
                    "this paper presents a method for X".into(),
                    "A. Smith, B. Jones (2020), Deep Learning Methods for X, Journal of Y".into(),
                ],
                |_| {},
            )
            .await;

        assert!(verdicts[0].is_likely_synthetic);
        assert!(verdicts[0].found());
        assert!(!verdicts[1].is_likely_synthetic);
    }

    #[tokio::test]
    async fn progress_reports_each_candidate_twice() {
        let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
        let verifier = Verifier::with_backend(mock, &config(3));

        let events = Mutex::new(Vec::new());
        verifier
            .verify_candidates(candidates(4), |e| {
                let tag = match e {
                    ProgressEvent::Checking { index, total, .. } => ("checking", index, total),
                    ProgressEvent::Result { index, total, .. } => ("result", index, total),
                };
                events.lock().unwrap().push(tag);
            })
            .await;

        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 8);
        assert!(events.iter().all(|(_, _, total)| *total == 4));
        for i in 0..4 {
            assert!(events.contains(&("checking", i, 4)));
            assert!(events.contains(&("result", i, 4)));
        }
    }

    #[tokio::test]
    async fn verify_text_splits_first() {
        let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
        let verifier = Verifier::with_backend(mock.clone(), &config(1));

        let text = "References\n\n[1] First reference, long enough to keep.\n3\n[2] Second reference, also long enough.";
        let verdicts = verifier.verify_text(text, |_| {}).await;

        assert_eq!(verdicts.len(), 2);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
        let verifier = Verifier::with_backend(mock.clone(), &config(4));

        assert!(verifier.verify_candidates(vec![], |_| {}).await.is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let config = Config {
            search_endpoint: "  ".into(),
            ..Config::default()
        };
        assert!(matches!(
            Verifier::from_config(&config),
            Err(CoreError::Config(_))
        ));
    }

    #[tokio::test]
    async fn backend_name_follows_the_backend() {
        let crossref = Verifier::from_config(&Config::default()).unwrap();
        assert_eq!(crossref.backend_name(), "CrossRef");

        let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
        assert_eq!(Verifier::with_backend(mock, &config(1)).backend_name(), "Mock");
    }
}

//! Search backend trait and implementations for looking references up online.

pub mod crossref;
pub mod mock;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

/// The top-ranked record returned by a search backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Canonical link of the record, when the service provides one.
    pub url: Option<String>,
}

/// Why a lookup could not produce an answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Connection, TLS, timeout or other transport failure.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),
    /// The body was not the JSON shape we expect.
    #[error("{0}")]
    Malformed(String),
}

/// A bibliographic search service that can be asked for the best match of a
/// free-text reference.
pub trait SearchBackend: Send + Sync {
    /// The canonical name of this service (e.g., "CrossRef").
    fn name(&self) -> &str;

    /// Return the top-ranked record for `reference`, or `None` when the
    /// service has no results.
    fn search<'a>(
        &'a self,
        reference: &'a str,
        client: &'a reqwest::Client,
        timeout: Option<Duration>,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SearchHit>, LookupError>> + Send + 'a>>;
}

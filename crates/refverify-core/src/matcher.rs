//! Explicit result type for an online reference lookup.

use crate::db::{LookupError, SearchHit};

/// Shown when the service found a record but gave no link for it.
pub const FOUND_WITHOUT_URL: &str = "Found but URL not available";

/// Shown when the service returned no results.
pub const NOT_FOUND: &str = "Not found";

/// What the online lookup concluded about one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Top result has a canonical URL.
    FoundWithLink(String),
    /// Top result exists but carries no URL.
    FoundWithoutLink,
    /// Result list was empty.
    NotFound,
    /// The lookup itself failed; the message says why.
    LookupError(String),
}

impl MatchOutcome {
    /// Collapse a backend result into an outcome. Errors become data here and
    /// never propagate further.
    pub fn from_search(result: Result<Option<SearchHit>, LookupError>) -> Self {
        match result {
            Ok(Some(SearchHit { url: Some(url) })) => MatchOutcome::FoundWithLink(url),
            Ok(Some(SearchHit { url: None })) => MatchOutcome::FoundWithoutLink,
            Ok(None) => MatchOutcome::NotFound,
            Err(e) => MatchOutcome::LookupError(e.to_string()),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(
            self,
            MatchOutcome::FoundWithLink(_) | MatchOutcome::FoundWithoutLink
        )
    }

    /// The source descriptor reported to users.
    pub fn descriptor(&self) -> String {
        match self {
            MatchOutcome::FoundWithLink(url) => url.clone(),
            MatchOutcome::FoundWithoutLink => FOUND_WITHOUT_URL.to_string(),
            MatchOutcome::NotFound => NOT_FOUND.to_string(),
            MatchOutcome::LookupError(msg) => format!("Error: {}", msg),
        }
    }
}

use super::{LookupError, SearchBackend, SearchHit};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::DEFAULT_SEARCH_ENDPOINT;

/// CrossRef `/works` title search, asking only for the top-ranked record.
pub struct CrossRef {
    pub endpoint: String,
    pub mailto: Option<String>,
}

impl Default for CrossRef {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            mailto: None,
        }
    }
}

impl CrossRef {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            mailto: None,
        }
    }

    /// Full request URL for a reference: every whitespace-delimited token is
    /// percent-encoded and the tokens are joined with `+`.
    pub fn search_url(&self, reference: &str) -> String {
        let query = reference
            .split_whitespace()
            .map(|word| urlencoding::encode(word).into_owned())
            .collect::<Vec<_>>()
            .join("+");
        let mut url = format!("{}?query.title={}&rows=1", self.endpoint, query);
        if let Some(ref email) = self.mailto {
            url.push_str(&format!("&mailto={}", urlencoding::encode(email)));
        }
        url
    }

    fn user_agent(&self) -> String {
        match self.mailto {
            Some(ref email) => format!("ReferenceVerifier/0.1 (mailto:{})", email),
            None => "ReferenceVerifier/0.1".to_string(),
        }
    }
}

/// Pull the first record out of a `{message: {items: [...]}}` body.
pub(crate) fn first_hit(data: &serde_json::Value) -> Result<Option<SearchHit>, LookupError> {
    let items = data
        .get("message")
        .and_then(|m| m.get("items"))
        .ok_or_else(|| LookupError::Malformed("response has no message.items".into()))?;

    match items {
        serde_json::Value::Array(items) => Ok(items.first().map(|item| SearchHit {
            url: item["URL"].as_str().map(str::to_string),
        })),
        serde_json::Value::Null => Ok(None),
        _ => Err(LookupError::Malformed("message.items is not a list".into())),
    }
}

impl SearchBackend for CrossRef {
    fn name(&self) -> &str {
        "CrossRef"
    }

    fn search<'a>(
        &'a self,
        reference: &'a str,
        client: &'a reqwest::Client,
        timeout: Option<Duration>,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SearchHit>, LookupError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.search_url(reference);
            tracing::debug!(db = self.name(), %url, "querying");

            let mut request = client.get(&url).header("User-Agent", self.user_agent());
            if let Some(timeout) = timeout {
                request = request.timeout(timeout);
            }

            let resp = request
                .send()
                .await
                .map_err(|e| LookupError::Transport(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(LookupError::Status(status.as_u16()));
            }

            let data: serde_json::Value = resp
                .json()
                .await
                .map_err(|e| LookupError::Malformed(e.to_string()))?;

            first_hit(&data)
        })
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod db;
pub mod detector;
pub mod matcher;
pub mod splitter;
pub mod text_utils;
pub mod verifier;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use config_file::ConfigFile;
pub use db::{LookupError, SearchBackend, SearchHit};
pub use detector::is_likely_synthetic;
pub use matcher::MatchOutcome;
pub use splitter::split_references;
pub use text_utils::{TAIL_FALLBACK_CHARS, tail_chars};
pub use verifier::Verifier;

/// CrossRef works search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.crossref.org/works";

/// The document formats the extractor understands, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Word,
    Latex,
    Bibtex,
}

impl DocumentFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Word),
            "tex" => Some(Self::Latex),
            "bib" => Some(Self::Bibtex),
            _ => None,
        }
    }

    /// Format of a path, judged only by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Word => "Word",
            Self::Latex => "LaTeX",
            Self::Bibtex => "BibTeX",
        }
    }
}

/// A file queued for verification.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub format: DocumentFormat,
}

impl Document {
    /// `None` when the extension is not a supported format.
    pub fn from_path(path: &Path) -> Option<Self> {
        DocumentFormat::from_path(path).map(|format| Self {
            path: path.to_path_buf(),
            format,
        })
    }
}

/// The outcome of checking a single candidate reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationVerdict {
    pub reference: String,
    pub outcome: MatchOutcome,
    pub is_likely_synthetic: bool,
}

impl VerificationVerdict {
    /// Human-readable source: URL, placeholder, "Not found" or "Error: ...".
    pub fn source_found(&self) -> String {
        self.outcome.descriptor()
    }

    pub fn found(&self) -> bool {
        self.outcome.is_found()
    }
}

/// Everything produced for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// One verdict per candidate reference, in extraction order.
    Verdicts(Vec<VerificationVerdict>),
    /// The file extension is not one we can extract from.
    Unsupported { extension: String },
}

impl Report {
    pub fn verdicts(&self) -> &[VerificationVerdict] {
        match self {
            Report::Verdicts(v) => v,
            Report::Unsupported { .. } => &[],
        }
    }
}

/// Progress events emitted during verification.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Checking {
        index: usize,
        total: usize,
        reference: String,
    },
    Result {
        index: usize,
        total: usize,
        verdict: Box<VerificationVerdict>,
    },
}

/// Summary statistics for a verified document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckStats {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub errors: usize,
    pub likely_synthetic: usize,
}

impl CheckStats {
    pub fn from_verdicts(verdicts: &[VerificationVerdict]) -> Self {
        let mut stats = CheckStats {
            total: verdicts.len(),
            ..Default::default()
        };
        for v in verdicts {
            match v.outcome {
                MatchOutcome::FoundWithLink(_) | MatchOutcome::FoundWithoutLink => {
                    stats.found += 1
                }
                MatchOutcome::NotFound => stats.not_found += 1,
                MatchOutcome::LookupError(_) => stats.errors += 1,
            }
            if v.is_likely_synthetic {
                stats.likely_synthetic += 1;
            }
        }
        stats
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Runtime configuration shared by the CLI and the web server.
#[derive(Clone)]
pub struct Config {
    pub search_endpoint: String,
    /// Contact address for CrossRef's polite pool.
    pub mailto: Option<String>,
    /// Per-lookup timeout. `None` leaves the HTTP client default in place.
    pub lookup_timeout_secs: Option<u64>,
    /// Lookups in flight per document. 1 means strictly sequential.
    pub max_concurrent_lookups: usize,
    pub bind_addr: String,
    pub max_upload_mb: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("search_endpoint", &self.search_endpoint)
            .field("mailto", &self.mailto.as_ref().map(|_| "***"))
            .field("lookup_timeout_secs", &self.lookup_timeout_secs)
            .field("max_concurrent_lookups", &self.max_concurrent_lookups)
            .field("bind_addr", &self.bind_addr)
            .field("max_upload_mb", &self.max_upload_mb)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            mailto: None,
            lookup_timeout_secs: None,
            max_concurrent_lookups: 4,
            bind_addr: "0.0.0.0:5002".to_string(),
            max_upload_mb: 50,
        }
    }
}

impl Config {
    /// Defaults overlaid with whatever the config file sets.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut config = Self::default();
        if let Some(search) = &file.search {
            if let Some(endpoint) = &search.endpoint {
                config.search_endpoint = endpoint.clone();
            }
            if search.mailto.is_some() {
                config.mailto = search.mailto.clone();
            }
            if search.timeout_secs.is_some() {
                config.lookup_timeout_secs = search.timeout_secs;
            }
        }
        if let Some(n) = file
            .concurrency
            .as_ref()
            .and_then(|c| c.max_concurrent_lookups)
        {
            config.max_concurrent_lookups = n;
        }
        if let Some(server) = &file.server {
            if let Some(addr) = &server.bind_addr {
                config.bind_addr = addr.clone();
            }
            if let Some(mb) = server.max_upload_mb {
                config.max_upload_mb = mb;
            }
        }
        config
    }

    /// Apply `REFVERIFY_*` / `CROSSREF_MAILTO` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_with(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = get("REFVERIFY_ENDPOINT").filter(|v| !v.is_empty()) {
            self.search_endpoint = endpoint;
        }
        if let Some(mailto) = get("CROSSREF_MAILTO").filter(|v| !v.is_empty()) {
            self.mailto = Some(mailto);
        }
        if let Some(secs) = get("REFVERIFY_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.lookup_timeout_secs = Some(secs);
        }
        if let Some(n) = get("REFVERIFY_CONCURRENCY").and_then(|v| v.parse().ok()) {
            self.max_concurrent_lookups = n;
        }
        if let Some(addr) = get("REFVERIFY_BIND").filter(|v| !v.is_empty()) {
            self.bind_addr = addr;
        }
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_secs.map(Duration::from_secs)
    }
}

use serde::Serialize;

use refverify_core::VerificationVerdict;

/// Message returned in place of verdicts for unknown file extensions.
pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type";

/// One entry of the `/verify` response array.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictJson {
    pub reference: String,
    pub source_found: String,
    pub is_llm_generated: bool,
}

impl From<&VerificationVerdict> for VerdictJson {
    fn from(v: &VerificationVerdict) -> Self {
        Self {
            reference: v.reference.clone(),
            source_found: v.source_found(),
            is_llm_generated: v.is_likely_synthetic,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorJson {
    pub error: String,
}

impl ErrorJson {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
}

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use refverify_core::Report;

use crate::models::{ErrorJson, UNSUPPORTED_FILE_TYPE, VerdictJson};
use crate::state::AppState;
use crate::upload;

/// Verify the references of an uploaded document.
///
/// The upload is written into a temp directory that lives only for this
/// request; the response is a JSON array of verdicts in extraction order.
pub async fn verify(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let file = match upload::parse_multipart(multipart).await {
        Ok(file) => file,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let temp_dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create temp directory: {}", e),
            );
        }
    };

    let path = temp_dir.path().join(&file.filename);
    if let Err(e) = tokio::fs::write(&path, &file.data).await {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to write temp file: {}", e),
        );
    }

    let report = match refverify_ingest::verify(&path, &state.verifier, |_| {}).await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(filename = %file.filename, error = %e, "extraction failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{}: {}", file.filename, e),
            );
        }
    };

    match report {
        Report::Unsupported { extension } => {
            tracing::info!(filename = %file.filename, extension, "rejected upload");
            Json(vec![ErrorJson::new(UNSUPPORTED_FILE_TYPE)]).into_response()
        }
        Report::Verdicts(verdicts) => {
            tracing::info!(
                filename = %file.filename,
                bytes = file.data.len(),
                references = verdicts.len(),
                "verification complete"
            );
            let body: Vec<VerdictJson> = verdicts.iter().map(VerdictJson::from).collect();
            Json(body).into_response()
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorJson::new(message))).into_response()
}

use axum::extract::Multipart;
use unicode_normalization::UnicodeNormalization;

/// Name of the multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// Filename used when sanitizing leaves nothing behind.
const FALLBACK_FILENAME: &str = "upload";

/// An uploaded file with its (sanitized) name and contents.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Pull the `file` field out of a multipart upload. Other fields are drained
/// and ignored; when several `file` fields are sent the last one wins.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, String> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            let _ = field.bytes().await;
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or(""));
        let data = field
            .bytes()
            .await
            .map_err(|e| format!("Failed to read file data: {}", e))?
            .to_vec();

        file = Some(UploadedFile { filename, data });
    }

    file.ok_or_else(|| "No file uploaded".to_string())
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Directory components are dropped and whitespace runs become `_`. Accented
/// letters decompose to their ASCII base; anything else outside ASCII letters,
/// digits, `.`, `_` and `-` is removed. Dots and underscores are trimmed from
/// both ends.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = kept.trim_matches(['.', '_']);

    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

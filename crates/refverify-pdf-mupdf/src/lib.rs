use std::path::Path;

use mupdf::{Document, TextPageFlags};

use refverify_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate isolates the mupdf dependency (AGPL-3.0) so that the non-PDF
/// code paths do not transitively depend on it.
///
/// Pages are concatenated in page order without separators; every text line
/// ends with a newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut text = String::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            for block in text_page.blocks() {
                for line in block.lines() {
                    text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                    text.push('\n');
                }
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn two_page_fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-data/two_page_references.pdf")
    }

    #[test]
    fn pages_are_concatenated_in_order() {
        let text = MupdfBackend::new().extract_text(&two_page_fixture()).unwrap();

        let intro = text.find("Introduction").unwrap();
        let header = text.find("References").unwrap();
        let entry = text.find("[1] A. Smith and B. Jones").unwrap();
        assert!(intro < header && header < entry);
        assert!(text.lines().any(|line| line.trim() == "References"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = MupdfBackend::new()
            .extract_text(Path::new("/nonexistent/paper.pdf"))
            .unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)));
    }
}

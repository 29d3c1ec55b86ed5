use std::path::Path;

use thiserror::Error;

use refverify_core::{Document, DocumentFormat, ProgressEvent, Report, Verifier, split_references};

pub mod docx;
pub mod section;

pub use section::find_references_section;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("PDF extraction error: {0}")]
    Pdf(#[from] refverify_core::BackendError),
    #[error("Word document error: {0}")]
    Docx(String),
    #[error("LaTeX/BibTeX extraction error: {0}")]
    Latex(#[from] refverify_latex::LatexError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("extraction task failed: {0}")]
    Task(String),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of refverify-ingest)")]
    NoPdfSupport,
}

/// Extract the reference-bearing text of a file.
///
/// - PDF and Word: full text, narrowed to the references section
/// - LaTeX: the `thebibliography` environment (or the source tail)
/// - BibTeX: entry titles, one per line
pub fn extract_text(path: &Path, format: DocumentFormat) -> Result<String, IngestError> {
    match format {
        DocumentFormat::Pdf => {
            let text = extract_pdf(path)?;
            Ok(find_references_section(&text).to_string())
        }
        DocumentFormat::Word => {
            let text = docx::extract_paragraph_text(path)?;
            Ok(find_references_section(&text).to_string())
        }
        DocumentFormat::Latex => Ok(refverify_latex::extract_bibliography_from_tex(path)?),
        DocumentFormat::Bibtex => Ok(refverify_latex::extract_titles_from_bib(path)?),
    }
}

/// Extracted text split into candidate references.
pub fn extract_candidates(document: &Document) -> Result<Vec<String>, IngestError> {
    let text = extract_text(&document.path, document.format)?;
    Ok(split_references(&text))
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<String, IngestError> {
    use refverify_core::PdfBackend;
    let backend = refverify_pdf_mupdf::MupdfBackend;
    Ok(backend.extract_text(path)?)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path) -> Result<String, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Verify every candidate reference in the file at `path`.
///
/// Files whose extension is not a supported format yield
/// [`Report::Unsupported`] without being read. Extraction runs on the
/// blocking pool; lookups go through `verifier`.
pub async fn verify<F>(path: &Path, verifier: &Verifier, progress: F) -> Result<Report, IngestError>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    let Some(document) = Document::from_path(path) else {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!(path = %path.display(), extension, "unsupported file type");
        return Ok(Report::Unsupported { extension });
    };

    let format = document.format;
    let candidates = tokio::task::spawn_blocking(move || extract_candidates(&document))
        .await
        .map_err(|e| IngestError::Task(e.to_string()))??;

    tracing::info!(
        path = %path.display(),
        format = format.name(),
        candidates = candidates.len(),
        "extracted candidate references"
    );

    let verdicts = verifier.verify_candidates(candidates, progress).await;
    Ok(Report::Verdicts(verdicts))
}

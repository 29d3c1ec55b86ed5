use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use refverify_core::text_utils::{TAIL_FALLBACK_CHARS, tail_chars};

use crate::LatexError;

/// First `\begin{thebibliography}` through the nearest
/// `\end{thebibliography}`, markers included.
static BIBLIOGRAPHY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\begin\{thebibliography\}[\s\S]*?\\end\{thebibliography\}").unwrap()
});

/// Read a `.tex` file and return its bibliography environment.
pub fn extract_bibliography_from_tex(path: &Path) -> Result<String, LatexError> {
    let content = std::fs::read_to_string(path)?;
    Ok(extract_bibliography_from_tex_str(&content).to_string())
}

/// The `thebibliography` environment of `content`, or its last 2000
/// characters when there is none.
pub fn extract_bibliography_from_tex_str(content: &str) -> &str {
    match BIBLIOGRAPHY_RE.find(content) {
        Some(m) => m.as_str(),
        None => {
            tracing::debug!("no thebibliography environment, using document tail");
            tail_chars(content, TAIL_FALLBACK_CHARS)
        }
    }
}

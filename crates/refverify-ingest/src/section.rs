use once_cell::sync::Lazy;
use regex::Regex;

use refverify_core::text_utils::{TAIL_FALLBACK_CHARS, tail_chars};

/// Locate the references section in running document text.
///
/// Returns everything from the first case-insensitive occurrence of
/// "references" or "bibliography" through the end of the text. The word is
/// not required to stand on its own line, so an early mention in body text
/// wins. Without any occurrence, the last 2000 characters are returned.
pub fn find_references_section(text: &str) -> &str {
    static HEADER_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)references|bibliography").unwrap());

    match HEADER_RE.find(text) {
        Some(m) => &text[m.start()..],
        None => {
            tracing::debug!("no references header, using document tail");
            tail_chars(text, TAIL_FALLBACK_CHARS)
        }
    }
}

//! Turning an extracted references section into candidate reference lines.

/// Lines must be strictly longer than this (after trimming, in characters)
/// to count as a candidate. Drops blank lines, page numbers and headers.
pub const MIN_REFERENCE_CHARS: usize = 20;

/// Split extracted text into candidate references, one per line.
///
/// Each line is trimmed; order is preserved. A reference wrapped across
/// several physical lines yields several candidates.
pub fn split_references(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_REFERENCE_CHARS)
        .map(str::to_string)
        .collect()
}

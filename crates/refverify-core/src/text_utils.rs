/// Characters kept from the end of a document when no references section is
/// found.
pub const TAIL_FALLBACK_CHARS: usize = 2000;

/// The last `n` characters of `text` (all of it when shorter).
pub fn tail_chars(text: &str, n: usize) -> &str {
    let count = text.chars().count();
    if count <= n {
        return text;
    }
    let start = text
        .char_indices()
        .nth(count - n)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_of_short_text_is_whole_text() {
        assert_eq!(tail_chars("abc", 10), "abc");
    }

    #[test]
    fn tail_counts_characters() {
        assert_eq!(tail_chars("héllo wörld", 5), "wörld");
        assert_eq!(tail_chars("abcdef", 6), "abcdef");
        assert_eq!(tail_chars("abcdef", 0), "");
    }

    #[test]
    fn tail_fallback_size() {
        let text = "x".repeat(TAIL_FALLBACK_CHARS + 500);
        assert_eq!(tail_chars(&text, TAIL_FALLBACK_CHARS).len(), 2000);
    }
}

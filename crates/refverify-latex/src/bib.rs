use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::LatexError;

/// Read a `.bib` database and return its titles, one per line.
pub fn extract_titles_from_bib(path: &Path) -> Result<String, LatexError> {
    let content = std::fs::read_to_string(path)?;
    Ok(extract_titles_from_bib_str(&content)?.join("\n"))
}

/// Titles of every entry that has a `title` field, in file order.
///
/// Uses the `biblatex` crate, so braces and LaTeX accents are decoded.
/// Entries are resolved one at a time, so a repeated citation key keeps both
/// titles. Input that does not parse at all is an error.
pub fn extract_titles_from_bib_str(content: &str) -> Result<Vec<String>, LatexError> {
    let raw =
        biblatex::RawBibliography::parse(content).map_err(|e| LatexError::Bib(e.to_string()))?;
    let total = raw.entries.len();

    let mut titles = Vec::new();
    for entry in raw.entries {
        let single = biblatex::RawBibliography {
            preamble: String::new(),
            entries: vec![entry],
            abbreviations: raw.abbreviations.clone(),
        };
        let resolved =
            biblatex::Bibliography::from_raw(single).map_err(|e| LatexError::Bib(e.to_string()))?;
        titles.extend(
            resolved
                .iter()
                .filter_map(|entry| entry.get("title").map(chunks_to_string)),
        );
    }

    tracing::debug!(entries = total, titles = titles.len(), "parsed BibTeX");
    Ok(titles)
}

/// Convert biblatex chunks to a single-line plain string.
fn chunks_to_string(chunks: &[biblatex::Spanned<biblatex::Chunk>]) -> String {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let raw = chunks
        .iter()
        .map(|c| match &c.v {
            biblatex::Chunk::Normal(s) => s.as_str(),
            biblatex::Chunk::Verbatim(s) => s.as_str(),
            biblatex::Chunk::Math(s) => s.as_str(),
        })
        .collect::<Vec<_>>()
        .join("");
    WS_RE.replace_all(raw.trim(), " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_entries_with_titles() {
        let bib = r#"
@article{smith2020,
  author = {Smith, Alice and Jones, Bob},
  title = {Deep Learning Methods for Reference Checking},
  journal = {Journal of Y},
  year = {2020}
}

@misc{notitle,
  author = {Nobody, Some},
  year = {2019}
}
"#;
        let titles = extract_titles_from_bib_str(bib).unwrap();
        assert_eq!(titles, vec!["Deep Learning Methods for Reference Checking"]);
    }

    #[test]
    fn multiline_title_is_collapsed() {
        let bib = "@book{k,\n  title = {A Title Spread\n           Over Two Lines},\n}\n";
        let titles = extract_titles_from_bib_str(bib).unwrap();
        assert_eq!(titles, vec!["A Title Spread Over Two Lines"]);
    }

    #[test]
    fn titles_keep_file_order() {
        let bib = "@misc{b, title = {Second Listed Title Here}}\n@misc{a, title = {Third Listed Title Here}}\n";
        let titles = extract_titles_from_bib_str(bib).unwrap();
        assert_eq!(
            titles,
            vec!["Second Listed Title Here", "Third Listed Title Here"]
        );
    }

    #[test]
    fn repeated_keys_keep_every_title() {
        let bib = "@article{a, title = {Known Title Of A Real Paper}}\n@article{a, title = {Duplicate Key Title Here}}\n";
        let titles = extract_titles_from_bib_str(bib).unwrap();
        assert_eq!(
            titles,
            vec!["Known Title Of A Real Paper", "Duplicate Key Title Here"]
        );
    }

    #[test]
    fn empty_database_has_no_titles() {
        assert!(extract_titles_from_bib_str("").unwrap().is_empty());
    }

    #[test]
    fn malformed_input_is_an_error() {
        let bib = "@article{broken,\n  title = {Unclosed brace\n";
        assert!(matches!(
            extract_titles_from_bib_str(bib),
            Err(LatexError::Bib(_))
        ));
    }

    #[test]
    fn file_titles_are_newline_joined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refs.bib");
        std::fs::write(
            &path,
            "@misc{a, title = {First Title In The File}}\n@misc{b, title = {Second Title In The File}}\n",
        )
        .unwrap();
        assert_eq!(
            extract_titles_from_bib(&path).unwrap(),
            "First Title In The File\nSecond Title In The File"
        );
    }
}

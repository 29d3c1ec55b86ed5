use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use refverify_core::db::mock::{MockDb, MockResponse};
use refverify_core::{Config, MatchOutcome, ProgressEvent, Report, Verifier};

fn verifier(mock: Arc<MockDb>) -> Verifier {
    let config = Config {
        max_concurrent_lookups: 2,
        ..Config::default()
    };
    Verifier::with_backend(mock, &config)
}

#[tokio::test]
async fn unsupported_extension_is_reported_without_lookups() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "References\n[1] Something that looks like a reference.").unwrap();

    let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
    let report = refverify_ingest::verify(&path, &verifier(mock.clone()), |_| {})
        .await
        .unwrap();

    assert_eq!(
        report,
        Report::Unsupported {
            extension: "txt".into()
        }
    );
    assert!(report.verdicts().is_empty());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn file_without_extension_is_unsupported() {
    let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
    let report = refverify_ingest::verify(Path::new("README"), &verifier(mock), |_| {})
        .await
        .unwrap();

    assert_eq!(
        report,
        Report::Unsupported {
            extension: String::new()
        }
    );
}

#[tokio::test]
async fn bibtex_titles_are_verified_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("refs.bib");
    std::fs::write(
        &path,
        r#"
@article{one,
  title = {Attention Is All You Need For Everything},
  year = {2017}
}
@inproceedings{two,
  author = {Nobody, N.},
  year = {2019}
}
@book{three,
  title = {The Art of Computer Programming},
  year = {1968}
}
"#,
    )
    .unwrap();

    let mock = Arc::new(MockDb::with_sequence(
        "Mock",
        vec![
            MockResponse::Found {
                url: Some("http://dx.doi.org/10.1/attention".into()),
            },
            MockResponse::NotFound,
        ],
    ));
    let events = Mutex::new(0usize);
    let report = refverify_ingest::verify(&path, &verifier(mock.clone()), |e| {
        if let ProgressEvent::Result { .. } = e {
            *events.lock().unwrap() += 1;
        }
    })
    .await
    .unwrap();

    let verdicts = report.verdicts();
    assert_eq!(verdicts.len(), 2);
    assert_eq!(verdicts[0].reference, "Attention Is All You Need For Everything");
    assert_eq!(verdicts[1].reference, "The Art of Computer Programming");
    assert_eq!(*events.lock().unwrap(), 2);
    assert_eq!(mock.call_count(), 2);
    assert!(
        verdicts
            .iter()
            .all(|v| matches!(v.outcome, MatchOutcome::FoundWithLink(_) | MatchOutcome::NotFound))
    );
}

#[tokio::test]
async fn short_lines_in_tex_bibliography_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.tex");
    std::fs::write(
        &path,
        "\\begin{document}\nText.\n\\begin{thebibliography}{99}\n\\bibitem{k} D. Knuth, The Art of Computer Programming, 1968.\n\\bibitem{x} Short.\n\\end{thebibliography}\n\\end{document}\n",
    )
    .unwrap();

    let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
    let report = refverify_ingest::verify(&path, &verifier(mock.clone()), |_| {})
        .await
        .unwrap();

    let refs: Vec<&str> = report
        .verdicts()
        .iter()
        .map(|v| v.reference.as_str())
        .collect();
    assert_eq!(
        refs,
        vec![
            "\\begin{thebibliography}{99}",
            "\\bibitem{k} D. Knuth, The Art of Computer Programming, 1968.",
            "\\end{thebibliography}",
        ]
    );
    let mut queries = mock.queries();
    queries.sort();
    let mut expected = refs.clone();
    expected.sort();
    assert_eq!(queries, expected);
}

#[tokio::test]
async fn unreadable_document_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.docx");
    std::fs::write(&path, "not a zip archive").unwrap();

    let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
    let result = refverify_ingest::verify(&path, &verifier(mock.clone()), |_| {}).await;

    assert!(result.is_err());
    assert_eq!(mock.call_count(), 0);
}

#[cfg(feature = "pdf")]
fn two_page_pdf() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-data/two_page_references.pdf")
}

#[cfg(feature = "pdf")]
#[test]
fn pdf_text_starts_at_references_header() {
    let text =
        refverify_ingest::extract_text(&two_page_pdf(), refverify_core::DocumentFormat::Pdf)
            .unwrap();

    assert!(text.starts_with("References"));
    assert!(!text.contains("Introduction"));
    let first = text.find("[1] A. Smith and B. Jones").unwrap();
    let second = text.find("[2] D. Knuth").unwrap();
    assert!(first < second);
}

#[cfg(feature = "pdf")]
#[tokio::test]
async fn pdf_entries_from_second_page_are_verified() {
    let mock = Arc::new(MockDb::new("Mock", MockResponse::NotFound));
    let report = refverify_ingest::verify(&two_page_pdf(), &verifier(mock.clone()), |_| {})
        .await
        .unwrap();

    let refs: Vec<&str> = report
        .verdicts()
        .iter()
        .map(|v| v.reference.as_str())
        .collect();
    assert_eq!(refs.len(), 2);
    assert!(refs[0].starts_with("[1] A. Smith and B. Jones"));
    assert!(refs[1].starts_with("[2] D. Knuth"));
    assert_eq!(mock.call_count(), 2);
}

//! Paragraph text from Word (`.docx`) documents.
//!
//! A `.docx` file is a zip container; the body lives in `word/document.xml`:
//! ```xml
//! <w:document>
//!   <w:body>
//!     <w:p><w:r><w:t>References</w:t></w:r></w:p>
//!     <w:p><w:r><w:t xml:space="preserve">[1] A. Smith. </w:t></w:r>
//!          <w:r><w:t>Title.</w:t></w:r></w:p>
//!     <w:tbl>...</w:tbl>
//!   </w:body>
//! </w:document>
//! ```

use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::IngestError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Text of every top-level body paragraph, joined with `\n`.
pub fn extract_paragraph_text(path: &Path) -> Result<String, IngestError> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| IngestError::Docx(format!("not a Word document: {}", e)))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| IngestError::Docx(format!("{}: {}", DOCUMENT_PART, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;

    Ok(paragraphs_from_xml(&xml)?.join("\n"))
}

/// Collect paragraph texts from a `document.xml` body, in document order.
///
/// Runs' `w:t` text is concatenated; `w:tab` becomes a tab and `w:br`/`w:cr`
/// a newline. Paragraphs inside tables, and paragraphs nested in another
/// paragraph (text boxes), are not top-level and are skipped.
pub fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, IngestError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut table_depth: u32 = 0;
    let mut para_depth: u32 = 0;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| IngestError::Docx(format!("malformed {}: {}", DOCUMENT_PART, e)))?;

        match event {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" => {
                    para_depth += 1;
                    if para_depth == 1 {
                        current.clear();
                    }
                }
                b"w:t" => in_text = para_depth == 1 && table_depth == 0,
                _ => {}
            },
            Event::Empty(ref e) => {
                let top_level = para_depth == 1 && table_depth == 0;
                match e.name().as_ref() {
                    b"w:p" if para_depth == 0 && table_depth == 0 => {
                        paragraphs.push(String::new())
                    }
                    b"w:tab" if top_level => current.push('\t'),
                    b"w:br" | b"w:cr" if top_level => current.push('\n'),
                    _ => {}
                }
            }
            Event::Text(ref t) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| IngestError::Docx(format!("bad text run: {}", e)))?;
                current.push_str(&text);
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" => {
                    if para_depth == 1 && table_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    para_depth = para_depth.saturating_sub(1);
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

//! Reference text from LaTeX-family sources: the `thebibliography`
//! environment of a `.tex` file and the titles of a `.bib` database.

use thiserror::Error;

pub mod bib;
pub mod tex;

pub use bib::{extract_titles_from_bib, extract_titles_from_bib_str};
pub use tex::{extract_bibliography_from_tex, extract_bibliography_from_tex_str};

#[derive(Error, Debug)]
pub enum LatexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("BibTeX parse error: {0}")]
    Bib(String),
}

//! Cheap heuristic for references that look machine-written rather than copied
//! from a real bibliography.

use difflib::sequencematcher::SequenceMatcher;

/// Boilerplate phrase typical of generated abstracts posing as citations.
pub const TEMPLATE_PHRASE: &str = "this paper presents a method";

/// A real citation has at least this many whitespace-separated tokens.
pub const MIN_TOKENS: usize = 6;

/// Similarity to [`TEMPLATE_PHRASE`] above which a reference is flagged.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Ratcliff/Obershelp similarity (0.0 to 1.0) between the lowercased
/// reference and [`TEMPLATE_PHRASE`], compared character by character.
pub fn template_similarity(reference: &str) -> f64 {
    let lowered: Vec<char> = reference.to_lowercase().chars().collect();
    let template: Vec<char> = TEMPLATE_PHRASE.chars().collect();
    let mut matcher = SequenceMatcher::new(&lowered, &template);
    f64::from(matcher.ratio())
}

/// Flag a reference that is too short to be a full citation or that reads
/// like the template phrase.
pub fn is_likely_synthetic(reference: &str) -> bool {
    reference.split_whitespace().count() < MIN_TOKENS
        || template_similarity(reference) > SIMILARITY_THRESHOLD
}

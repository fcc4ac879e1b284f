//! Keyword extraction and overlap scoring — the ATS-style match primitives.
//!
//! Extraction lowercases, splits on non-alphanumeric boundaries, drops
//! stopwords and tokens shorter than two characters, and dedupes. The overlap
//! score is the fraction of JD keywords already present in the résumé —
//! a proxy for automated keyword screening.

use std::collections::HashSet;

/// Tokens shorter than this are discarded during extraction.
const MIN_TOKEN_LEN: usize = 2;

/// Common English words that carry no matching signal.
const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can",
    "do", "for", "from", "has", "have", "in", "into", "is", "it", "its",
    "of", "on", "or", "our", "that", "the", "their", "this", "to", "was",
    "we", "were", "will", "with", "you", "your",
];

/// Returns the default stopword set. Callers may extend or replace it.
pub fn default_stopwords() -> HashSet<String> {
    DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect()
}

/// Extracts the normalized keyword set from free text.
///
/// Deterministic for identical input and stopword configuration. Empty input
/// yields an empty set.
pub fn extract(text: &str, stopwords: &HashSet<String>) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .filter(|token| !stopwords.contains(*token))
        .map(str::to_string)
        .collect()
}

/// Overlap score: `|resume ∩ jd| / |jd|`, in [0, 1].
///
/// An empty JD keyword set scores 0.0 by convention — the denominator choice
/// and the zero convention are deliberate and load-bearing; see the ranker
/// for the project-side variant.
pub fn overlap_score(resume_keywords: &HashSet<String>, jd_keywords: &HashSet<String>) -> f64 {
    if jd_keywords.is_empty() {
        return 0.0;
    }
    let shared = resume_keywords.intersection(jd_keywords).count();
    shared as f64 / jd_keywords.len() as f64
}

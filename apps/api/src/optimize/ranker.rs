//! Project Ranker — scores library entries against a job description and
//! selects the top N.
//!
//! The score denominator is the *project's* keyword count, not the JD's, so
//! short focused projects are not penalized against verbose ones. Sorting is
//! stable: equal scores keep library order.

use std::collections::HashSet;

use crate::models::project::{ProjectEntry, RankedProject};
use crate::optimize::keywords;

/// Default number of projects selected for rewriting.
pub const DEFAULT_TOP_N: usize = 3;

/// Ranks `projects` against `jd_text` and returns the top `top_n` by score.
///
/// Score per entry: `|jd_keywords ∩ project_keywords| / max(1, |project_keywords|)`.
/// Output length is `min(top_n, |projects|)`; an empty library yields an
/// empty vec, not an error.
pub fn rank(
    projects: &[ProjectEntry],
    jd_text: &str,
    top_n: usize,
    stopwords: &HashSet<String>,
) -> Vec<RankedProject> {
    let jd_keywords = keywords::extract(jd_text, stopwords);

    let mut ranked: Vec<RankedProject> = projects
        .iter()
        .enumerate()
        .map(|(library_index, entry)| {
            let project_keywords = keywords::extract(&entry.combined_text(), stopwords);
            let shared = jd_keywords.intersection(&project_keywords).count();
            let score = shared as f64 / project_keywords.len().max(1) as f64;
            RankedProject {
                entry: entry.clone(),
                library_index,
                score,
            }
        })
        .collect();

    // Stable sort: ties keep original library order.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::keywords::default_stopwords;

    fn make_project(title: &str, description: &str) -> ProjectEntry {
        ProjectEntry {
            title: title.to_string(),
            description: description.to_string(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_output_length_capped_at_top_n() {
        let projects = vec![
            make_project("One", "rust"),
            make_project("Two", "rust"),
            make_project("Three", "rust"),
            make_project("Four", "rust"),
        ];
        let ranked = rank(&projects, "rust", 3, &default_stopwords());
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_output_length_capped_at_library_size() {
        let projects = vec![make_project("Only", "rust")];
        let ranked = rank(&projects, "rust", 5, &default_stopwords());
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_empty_library_yields_empty_result() {
        let ranked = rank(&[], "rust engineer", 3, &default_stopwords());
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_scores_sorted_non_increasing() {
        let projects = vec![
            make_project("Unrelated", "gardening watercolor painting"),
            make_project("Relevant", "rust tokio axum services"),
            make_project("Partial", "rust scripting"),
        ];
        let ranked = rank(&projects, "rust tokio axum", 3, &default_stopwords());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(ranked[0].entry.title, "Relevant");
    }

    #[test]
    fn test_ties_preserve_library_order() {
        // Identical text → identical scores; library order must survive.
        let projects = vec![
            make_project("First", "rust pipelines"),
            make_project("Second", "rust pipelines"),
            make_project("Weaker", "gardening"),
        ];
        let ranked = rank(&projects, "rust", 3, &default_stopwords());
        assert_eq!(ranked[0].library_index, 0);
        assert_eq!(ranked[1].library_index, 1);
        assert_eq!(ranked[0].entry.title, "First");
        assert_eq!(ranked[1].entry.title, "Second");
    }

    #[test]
    fn test_score_uses_project_side_denominator() {
        // Project keywords: {etl, spark} — both in the JD → 2/2 = 1.0,
        // regardless of how many other keywords the JD carries.
        let projects = vec![make_project("ETL", "spark")];
        let ranked = rank(
            &projects,
            "etl spark python sql tableau airflow kafka",
            1,
            &default_stopwords(),
        );
        assert!((ranked[0].score - 1.0).abs() < f64::EPSILON, "got {}", ranked[0].score);
    }

    #[test]
    fn test_project_with_no_keywords_scores_zero() {
        // Single-letter title tokens are dropped by extraction; the max(1, ·)
        // guard keeps the division defined.
        let projects = vec![make_project("A", "")];
        let ranked = rank(&projects, "rust", 1, &default_stopwords());
        assert_eq!(ranked[0].score, 0.0);
    }

    #[test]
    fn test_tags_contribute_to_score() {
        let with_tags = ProjectEntry {
            title: "Dashboard".to_string(),
            description: "store metrics".to_string(),
            tags: vec!["tableau".to_string()],
        };
        let ranked = rank(&[with_tags], "tableau reporting", 1, &default_stopwords());
        assert!(ranked[0].score > 0.0);
    }
}

//! Section Locator — partitions a document's paragraph stream into named
//! sections by heading detection.
//!
//! A paragraph is a heading when its whitespace-normalized, case-insensitive
//! text matches a configured alias for a target section kind, or a known
//! non-target heading (Work Experience, Education, ...). Non-target headings
//! open `Other` sections so a rewrite can never bleed into them. First alias
//! match per kind wins; later duplicates open `Other` sections. Every
//! paragraph belongs to exactly one section: the result is a contiguous
//! partition of the whole paragraph range.

use serde::{Deserialize, Serialize};

use crate::models::document::Document;

/// The closed set of section names the pipeline addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Summary,
    Skills,
    ProjectExperience,
    Other,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Skills => "skills",
            SectionKind::ProjectExperience => "project_experience",
            SectionKind::Other => "other",
        }
    }
}

/// Heading aliases per target kind, matched whitespace-normalized and
/// case-insensitively.
const SUMMARY_ALIASES: &[&str] = &["summary", "professional summary", "profile"];
const SKILLS_ALIASES: &[&str] = &["skills", "technical skills", "core skills"];
const PROJECT_ALIASES: &[&str] = &[
    "project experience",
    "projects",
    "personal projects",
    "academic projects",
];

/// Non-target headings that still bound sections. Rewrites must never cross
/// into these spans.
const BOUNDARY_HEADINGS: &[&str] = &[
    "work experience",
    "experience",
    "employment history",
    "education",
    "achievements",
    "awards",
    "certifications",
    "publications",
    "potential publications",
    "extra & co-curricular activities",
    "volunteering",
];

/// A named, contiguous span of paragraphs within a document.
///
/// `start` is the index of the heading paragraph (or the first paragraph for
/// headingless spans); `end` is exclusive. `raw_text` is the concatenated
/// body text — the heading line is addressable via `heading_index`. Sections
/// are derived snapshots: stale as soon as the document is mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub start: usize,
    pub end: usize,
    /// Index of the heading paragraph, when one was detected.
    pub heading_index: Option<usize>,
    /// Index of the first non-blank body paragraph — the formatting template
    /// the reconstructor clones when emitting new content.
    pub template_index: Option<usize>,
    pub raw_text: String,
}

impl Section {
    /// Paragraph indices of the section body (everything after the heading).
    pub fn body_range(&self) -> std::ops::Range<usize> {
        match self.heading_index {
            Some(h) => (h + 1)..self.end,
            None => self.start..self.end,
        }
    }
}

/// The locator's output: a covering partition plus a confidence signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatedSections {
    pub sections: Vec<Section>,
    /// True when no recognizable heading was found anywhere — downstream
    /// stages should skip rewriting rather than guess.
    pub low_confidence: bool,
}

impl LocatedSections {
    /// The first (and only, by first-match-wins) section of the given kind.
    pub fn find(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Paragraph index where a missing target section should be synthesized:
    /// immediately after the Summary section, or at document end when Summary
    /// is also absent.
    pub fn insertion_index(&self, document_len: usize) -> usize {
        self.find(SectionKind::Summary)
            .map(|s| s.end)
            .unwrap_or(document_len)
    }
}

/// What a heading paragraph resolves to.
enum Heading {
    Target(SectionKind),
    Boundary,
}

/// Splits the document into sections. The result covers the entire paragraph
/// range exactly once. A document with no recognizable headings yields a
/// single `Other` section and `low_confidence = true`.
pub fn locate(document: &Document) -> LocatedSections {
    let mut sections: Vec<Section> = Vec::new();
    let mut seen: Vec<SectionKind> = Vec::new();
    // Start of the currently-open span and its heading, if any.
    let mut open_start = 0usize;
    let mut open: Option<(SectionKind, usize)> = None;

    for (index, paragraph) in document.paragraphs.iter().enumerate() {
        let Some(heading) = classify_heading(&paragraph.text(), &seen) else {
            continue;
        };

        // Close whatever span precedes this heading.
        if index > open_start || open.is_some() {
            sections.push(build_section(document, open, open_start, index));
        }

        let kind = match heading {
            Heading::Target(kind) => {
                seen.push(kind);
                kind
            }
            Heading::Boundary => SectionKind::Other,
        };
        open = Some((kind, index));
        open_start = index;
    }

    // Close the trailing span.
    if open.is_some() || open_start < document.paragraphs.len() {
        sections.push(build_section(
            document,
            open,
            open_start,
            document.paragraphs.len(),
        ));
    }

    let low_confidence = sections.iter().all(|s| s.heading_index.is_none());

    LocatedSections {
        sections,
        low_confidence,
    }
}

fn build_section(
    document: &Document,
    open: Option<(SectionKind, usize)>,
    start: usize,
    end: usize,
) -> Section {
    let (kind, heading_index) = match open {
        Some((kind, heading)) => (kind, Some(heading)),
        None => (SectionKind::Other, None),
    };

    let body_start = heading_index.map(|h| h + 1).unwrap_or(start);
    let template_index = (body_start..end).find(|&i| !document.paragraphs[i].is_blank());
    let raw_text = document.paragraphs[body_start..end]
        .iter()
        .map(|p| p.text())
        .collect::<Vec<_>>()
        .join("\n");

    Section {
        kind,
        start,
        end,
        heading_index,
        template_index,
        raw_text,
    }
}

fn classify_heading(text: &str, seen: &[SectionKind]) -> Option<Heading> {
    let normalized = normalize_heading(text);
    if normalized.is_empty() {
        return None;
    }

    let target = if SUMMARY_ALIASES.contains(&normalized.as_str()) {
        Some(SectionKind::Summary)
    } else if SKILLS_ALIASES.contains(&normalized.as_str()) {
        Some(SectionKind::Skills)
    } else if PROJECT_ALIASES.contains(&normalized.as_str()) {
        Some(SectionKind::ProjectExperience)
    } else {
        None
    };

    if let Some(kind) = target {
        // First match wins; a repeated heading bounds an Other section.
        return if seen.contains(&kind) {
            Some(Heading::Boundary)
        } else {
            Some(Heading::Target(kind))
        };
    }

    if BOUNDARY_HEADINGS.contains(&normalized.as_str()) {
        return Some(Heading::Boundary);
    }

    None
}

/// Trims, collapses inner whitespace, and lowercases heading text.
fn normalize_heading(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Paragraph, ParagraphFormat, RunFormat};

    fn make_document(lines: &[&str]) -> Document {
        Document {
            paragraphs: lines
                .iter()
                .map(|l| {
                    Paragraph::from_text(*l, RunFormat::default(), ParagraphFormat::default())
                })
                .collect(),
        }
    }

    #[test]
    fn test_three_headings_yield_three_sections_in_order() {
        let doc = make_document(&[
            "Summary",
            "A data engineer.",
            "Skills",
            "Python, SQL",
            "Project Experience",
            "Claims pipeline project.",
        ]);
        let located = locate(&doc);

        assert_eq!(located.sections.len(), 3);
        assert_eq!(located.sections[0].kind, SectionKind::Summary);
        assert_eq!(located.sections[1].kind, SectionKind::Skills);
        assert_eq!(located.sections[2].kind, SectionKind::ProjectExperience);
        assert!(!located.low_confidence);
    }

    #[test]
    fn test_sections_partition_the_whole_document() {
        let doc = make_document(&[
            "Summary",
            "Text.",
            "Skills",
            "SQL",
            "Project Experience",
            "A project.",
        ]);
        let located = locate(&doc);

        assert_eq!(located.sections[0].start, 0);
        for pair in located.sections.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "sections must be contiguous");
        }
        assert_eq!(located.sections.last().unwrap().end, doc.paragraphs.len());
    }

    #[test]
    fn test_heading_match_is_case_insensitive_and_whitespace_normalized() {
        let doc = make_document(&["  TECHNICAL   SKILLS  ", "Rust"]);
        let located = locate(&doc);
        assert_eq!(located.sections[0].kind, SectionKind::Skills);
    }

    #[test]
    fn test_preamble_before_first_heading_is_other() {
        let doc = make_document(&["Jane Doe", "jane@example.com", "Skills", "SQL"]);
        let located = locate(&doc);

        assert_eq!(located.sections.len(), 2);
        assert_eq!(located.sections[0].kind, SectionKind::Other);
        assert_eq!(located.sections[0].heading_index, None);
        assert_eq!(located.sections[0].start, 0);
        assert_eq!(located.sections[0].end, 2);
        assert_eq!(located.sections[1].kind, SectionKind::Skills);
    }

    #[test]
    fn test_no_headings_yields_single_other_low_confidence() {
        let doc = make_document(&["Jane Doe", "Some unstructured text."]);
        let located = locate(&doc);

        assert_eq!(located.sections.len(), 1);
        assert_eq!(located.sections[0].kind, SectionKind::Other);
        assert_eq!(located.sections[0].start, 0);
        assert_eq!(located.sections[0].end, 2);
        assert!(located.low_confidence);
    }

    #[test]
    fn test_boundary_heading_closes_target_section() {
        let doc = make_document(&[
            "Project Experience",
            "A project.",
            "Work Experience",
            "Employer, 2020-2023",
        ]);
        let located = locate(&doc);

        let projects = located.find(SectionKind::ProjectExperience).unwrap();
        assert_eq!(projects.end, 2, "work experience must bound the span");
        assert_eq!(located.sections[1].kind, SectionKind::Other);
        assert_eq!(located.sections[1].heading_index, Some(2));
    }

    #[test]
    fn test_duplicate_heading_first_match_wins() {
        let doc = make_document(&["Skills", "SQL", "Skills", "Rust"]);
        let located = locate(&doc);

        assert_eq!(located.sections[0].kind, SectionKind::Skills);
        assert_eq!(located.sections[1].kind, SectionKind::Other);
        assert_eq!(located.find(SectionKind::Skills).unwrap().start, 0);
    }

    #[test]
    fn test_raw_text_is_body_only() {
        let doc = make_document(&["Skills", "Python", "SQL"]);
        let located = locate(&doc);
        assert_eq!(located.sections[0].raw_text, "Python\nSQL");
    }

    #[test]
    fn test_template_index_skips_blank_paragraphs() {
        let doc = make_document(&["Skills", "", "Python"]);
        let located = locate(&doc);
        assert_eq!(located.sections[0].template_index, Some(2));
    }

    #[test]
    fn test_template_index_none_for_empty_body() {
        let doc = make_document(&["Skills"]);
        let located = locate(&doc);
        assert_eq!(located.sections[0].template_index, None);
    }

    #[test]
    fn test_insertion_index_after_summary() {
        let doc = make_document(&["Summary", "Text.", "Education", "BSc"]);
        let located = locate(&doc);
        // Summary spans [0, 2) — missing targets insert at 2.
        assert_eq!(located.insertion_index(doc.paragraphs.len()), 2);
    }

    #[test]
    fn test_insertion_index_document_end_without_summary() {
        let doc = make_document(&["Education", "BSc"]);
        let located = locate(&doc);
        assert_eq!(located.insertion_index(doc.paragraphs.len()), 2);
    }

    #[test]
    fn test_missing_section_absent_from_result() {
        let doc = make_document(&["Summary", "Text."]);
        let located = locate(&doc);
        assert!(located.find(SectionKind::Skills).is_none());
        assert!(located.find(SectionKind::ProjectExperience).is_none());
    }

    #[test]
    fn test_body_range_excludes_heading() {
        let doc = make_document(&["Skills", "SQL", "Rust"]);
        let located = locate(&doc);
        assert_eq!(located.sections[0].body_range(), 1..3);
    }
}

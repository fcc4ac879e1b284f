//! Document Reconstructor — writes resolved section text back into the
//! paragraph/run structure, preserving the original formatting.
//!
//! For each section whose text was generated (or user-overridden), the
//! section's body paragraphs are replaced: every logical output unit — a
//! skills category line, a project title, a bullet — becomes a new paragraph
//! cloned from the section's template paragraphs. Sections that kept their
//! original text, and everything outside the target sections, are copied
//! through untouched, so their serialized form is identical to the input.
//!
//! A target section absent from the document is synthesized: a minimal
//! heading with a default formatting profile, inserted after Summary or at
//! document end. A template paragraph that cannot be found (empty section
//! body) also degrades to the default profile — never a hard failure.

use crate::models::document::{Document, Paragraph, ParagraphFormat, Run, RunFormat};
use crate::optimize::rewriter::{RewriteOutcome, RewriteSource, RewriteTarget, SectionRewrite};
use crate::optimize::sections::{LocatedSections, Section, SectionKind};

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Rebuilds the document with the fully-resolved section texts.
///
/// Requires a complete `RewriteOutcome` — the rewriter joins all generation
/// results before this runs, so no partial write can happen. The input
/// document is not mutated; sections derived from it are stale afterwards.
pub fn rebuild(
    document: &Document,
    located: &LocatedSections,
    outcome: &RewriteOutcome,
) -> Document {
    let mut paragraphs: Vec<Paragraph> = Vec::with_capacity(document.paragraphs.len());
    let insertion_index = located.insertion_index(document.paragraphs.len());
    let mut inserted_missing = false;

    // Sections are a contiguous, ordered partition — walk them in order.
    for section in &located.sections {
        if !inserted_missing && section.start >= insertion_index {
            append_missing_sections(&mut paragraphs, located, outcome);
            inserted_missing = true;
        }

        match rewrite_for(section.kind, outcome) {
            Some(rewrite) if should_reemit(rewrite) => {
                // Keep the original heading paragraph, replace the body.
                if let Some(heading) = section.heading_index {
                    paragraphs.push(document.paragraphs[heading].clone());
                }
                paragraphs.extend(render_section(rewrite.target, &rewrite.text, document, section));
            }
            _ => {
                // Untouched span — byte-identical copy.
                paragraphs.extend(document.paragraphs[section.start..section.end].iter().cloned());
            }
        }

        if !inserted_missing && section.end >= insertion_index {
            append_missing_sections(&mut paragraphs, located, outcome);
            inserted_missing = true;
        }
    }

    if !inserted_missing {
        append_missing_sections(&mut paragraphs, located, outcome);
    }

    Document { paragraphs }
}

fn rewrite_for(kind: SectionKind, outcome: &RewriteOutcome) -> Option<&SectionRewrite> {
    match kind {
        SectionKind::Summary => Some(&outcome.summary),
        SectionKind::Skills => Some(&outcome.skills),
        SectionKind::ProjectExperience => Some(&outcome.projects),
        SectionKind::Other => None,
    }
}

/// Only generated or overridden text is re-emitted; original text means the
/// section's paragraphs pass through untouched (fallback included).
fn should_reemit(rewrite: &SectionRewrite) -> bool {
    rewrite.source != RewriteSource::Original
}

/// Synthesizes target sections that have new text but no span in the document.
fn append_missing_sections(
    paragraphs: &mut Vec<Paragraph>,
    located: &LocatedSections,
    outcome: &RewriteOutcome,
) {
    for (kind, rewrite) in [
        (SectionKind::Skills, &outcome.skills),
        (SectionKind::ProjectExperience, &outcome.projects),
    ] {
        if located.find(kind).is_some() || !should_reemit(rewrite) {
            continue;
        }
        paragraphs.push(synthesize_heading(rewrite.target));
        paragraphs.extend(render_with_templates(
            rewrite.target,
            &rewrite.text,
            &Templates::default(),
        ));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template discovery
// ────────────────────────────────────────────────────────────────────────────

/// Formatting templates discovered in a section before its body is replaced.
#[derive(Debug, Clone, Default)]
struct Templates {
    /// First non-blank, non-bulleted body paragraph — general text and titles.
    text: Option<Paragraph>,
    /// First bulleted body paragraph — bullet lines.
    bullet: Option<Paragraph>,
}

impl Templates {
    fn discover(document: &Document, section: &Section) -> Self {
        let mut text = None;
        let mut bullet = None;
        for index in section.body_range() {
            let paragraph = &document.paragraphs[index];
            if paragraph.is_blank() {
                continue;
            }
            if paragraph.format.bullet {
                bullet.get_or_insert_with(|| paragraph.clone());
            } else {
                text.get_or_insert_with(|| paragraph.clone());
            }
            if text.is_some() && bullet.is_some() {
                break;
            }
        }
        Self { text, bullet }
    }

    /// Template for plain text lines and project titles.
    fn text_formats(&self) -> (RunFormat, ParagraphFormat) {
        self.text
            .as_ref()
            .or(self.bullet.as_ref())
            .map(|p| (p.lead_run_format(), p.format.clone()))
            .unwrap_or_else(default_body_formats)
    }

    /// Template for bullet lines. Falls back to the text template with the
    /// bullet marker forced on, then to the default profile.
    fn bullet_formats(&self) -> (RunFormat, ParagraphFormat) {
        if let Some(p) = &self.bullet {
            return (p.lead_run_format(), p.format.clone());
        }
        let (run, mut format) = self.text_formats();
        format.bullet = true;
        if format.indent_level == 0 {
            format.indent_level = 1;
        }
        (run, format)
    }
}

/// Default formatting profile used when a section has no template paragraph
/// to clone.
fn default_body_formats() -> (RunFormat, ParagraphFormat) {
    (RunFormat::default(), ParagraphFormat::default())
}

/// Minimal heading paragraph for a synthesized section.
fn synthesize_heading(target: RewriteTarget) -> Paragraph {
    let text = match target {
        RewriteTarget::Summary => "Summary",
        RewriteTarget::Skills => "Skills",
        RewriteTarget::ProjectExperience => "Project Experience",
    };
    Paragraph::from_text(
        text,
        RunFormat {
            bold: true,
            ..Default::default()
        },
        ParagraphFormat::default(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Section rendering
// ────────────────────────────────────────────────────────────────────────────

fn render_section(
    target: RewriteTarget,
    text: &str,
    document: &Document,
    section: &Section,
) -> Vec<Paragraph> {
    let templates = Templates::discover(document, section);
    render_with_templates(target, text, &templates)
}

fn render_with_templates(target: RewriteTarget, text: &str, templates: &Templates) -> Vec<Paragraph> {
    match target {
        RewriteTarget::Summary => render_summary(text, templates),
        RewriteTarget::Skills => render_skills(text, templates),
        RewriteTarget::ProjectExperience => render_projects(text, templates),
    }
}

/// Summary: one paragraph per non-empty line, cloned from the text template.
fn render_summary(text: &str, templates: &Templates) -> Vec<Paragraph> {
    let (run_format, para_format) = templates.text_formats();
    non_empty_lines(text)
        .map(|line| {
            Paragraph::from_text(
                clean_leading_bullet(line),
                run_format.clone(),
                para_format.clone(),
            )
        })
        .collect()
}

/// Skills: one bulleted paragraph per category line. A `Category: items`
/// split emits the label as a bold run and the item list as a regular run.
fn render_skills(text: &str, templates: &Templates) -> Vec<Paragraph> {
    let (run_format, para_format) = templates.bullet_formats();
    non_empty_lines(text)
        .map(|line| {
            let line = clean_leading_bullet(line);
            let runs = match line.split_once(':') {
                Some((category, items)) if !items.trim().is_empty() => vec![
                    Run::new(
                        format!("{}: ", category.trim()),
                        RunFormat {
                            bold: true,
                            ..run_format.clone()
                        },
                    ),
                    Run::new(items.trim(), run_format.clone()),
                ],
                _ => vec![Run::new(line, run_format.clone())],
            };
            Paragraph {
                runs,
                format: para_format.clone(),
            }
        })
        .collect()
}

/// Project Experience: blank-line-separated blocks, first line a bold title,
/// remaining lines bulleted.
fn render_projects(text: &str, templates: &Templates) -> Vec<Paragraph> {
    let (title_run, title_para) = templates.text_formats();
    let (bullet_run, bullet_para) = templates.bullet_formats();

    let mut paragraphs = Vec::new();
    for block in text.split("\n\n") {
        let mut lines = non_empty_lines(block);
        let Some(title) = lines.next() else {
            continue;
        };
        paragraphs.push(Paragraph::from_text(
            clean_leading_bullet(title),
            RunFormat {
                bold: true,
                ..title_run.clone()
            },
            title_para.clone(),
        ));
        for line in lines {
            paragraphs.push(Paragraph::from_text(
                clean_leading_bullet(line),
                bullet_run.clone(),
                bullet_para.clone(),
            ));
        }
    }
    paragraphs
}

fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Strips a leading bullet glyph — bullet rendering belongs to paragraph
/// formatting, not text.
fn clean_leading_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    for glyph in ["• ", "- ", "– ", "* "] {
        if let Some(rest) = trimmed.strip_prefix(glyph) {
            return rest.trim_start();
        }
    }
    trimmed
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Optimization pipeline — the full directed flow from raw inputs to the
//! reconstructed document.
//!
//! Flow: extract keywords → baseline score → locate sections → rank projects
//! → rewrite target sections (concurrent generative calls) → reconstruct →
//! post score. Every stage before and after the rewriter is a pure
//! synchronous transform; the rewriter joins all generation results before
//! reconstruction, so a cancelled or failed call can never produce a partial
//! document.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::Document;
use crate::models::project::parse_project_library;
use crate::optimize::keywords::{self, default_stopwords};
use crate::optimize::ranker;
use crate::optimize::reconstructor::rebuild;
use crate::optimize::rewriter::{
    rewrite_sections, Generative, RewriteInput, RewriteOutcome, SectionInput,
};
use crate::optimize::sections::{locate, LocatedSections, SectionKind};

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

/// User-edited section texts, honored verbatim and skipped by the rewriter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionOverrides {
    pub summary: Option<String>,
    pub skills: Option<String>,
    pub project_experience: Option<String>,
}

/// The unit of work: one document, one job description, one project library.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizationRequest {
    pub document: Document,
    pub jd_text: String,
    /// Flat project library text; see `models::project` for the wire format.
    #[serde(default)]
    pub project_library: String,
    #[serde(default)]
    pub overrides: SectionOverrides,
    /// Overrides the configured number of projects to select.
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Title + score of a selected project, as reported to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSelection {
    pub title: String,
    pub score: f64,
}

/// A non-fatal, per-section degradation surfaced to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationWarning {
    pub section: String,
    pub reason: String,
}

/// Pipeline output: the rebuilt document plus scores, selections, warnings.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub request_id: Uuid,
    pub document: Document,
    /// JD keyword overlap of the input document, in [0, 1].
    pub baseline_score: f64,
    /// Overlap of the rebuilt document; absent when rewriting was skipped.
    pub optimized_score: Option<f64>,
    pub selected_projects: Vec<ProjectSelection>,
    pub warnings: Vec<OptimizationWarning>,
    /// True when no recognizable section heading was found and rewriting was
    /// skipped entirely.
    pub low_confidence: bool,
}

/// Knobs the shell resolves from configuration before invoking the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineDefaults {
    pub top_n: usize,
    pub generation_timeout: Duration,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full optimization pipeline.
///
/// Fatal only on a document with no paragraph structure. Everything else —
/// missing sections, empty project library, generative failures — degrades
/// into warnings while still producing a valid document.
pub async fn optimize(
    generator: Arc<dyn Generative>,
    request: OptimizationRequest,
    defaults: PipelineDefaults,
) -> Result<OptimizationResult, AppError> {
    let request_id = Uuid::new_v4();

    if request.document.is_structureless() {
        return Err(AppError::InputFormat(
            "document has no paragraph structure".to_string(),
        ));
    }

    // Keyword baseline
    let stopwords = default_stopwords();
    let jd_keywords = keywords::extract(&request.jd_text, &stopwords);
    let resume_keywords = keywords::extract(&request.document.full_text(), &stopwords);
    let baseline_score = keywords::overlap_score(&resume_keywords, &jd_keywords);
    info!(
        "request {request_id}: baseline overlap {:.2} ({} JD keywords)",
        baseline_score,
        jd_keywords.len()
    );

    // Section split
    let located = locate(&request.document);
    if located.low_confidence {
        info!("request {request_id}: no recognizable headings — skipping rewrite");
        return Ok(OptimizationResult {
            request_id,
            document: request.document,
            baseline_score,
            optimized_score: None,
            selected_projects: Vec::new(),
            warnings: vec![OptimizationWarning {
                section: "document".to_string(),
                reason: "no recognizable section headings; rewriting skipped".to_string(),
            }],
            low_confidence: true,
        });
    }

    // Project ranking
    let top_n = request.top_n.unwrap_or(defaults.top_n);
    let projects = parse_project_library(&request.project_library);
    let ranked = ranker::rank(&projects, &request.jd_text, top_n, &stopwords);
    let selected_projects: Vec<ProjectSelection> = ranked
        .iter()
        .map(|r| ProjectSelection {
            title: r.entry.title.clone(),
            score: r.score,
        })
        .collect();
    info!(
        "request {request_id}: selected {}/{} projects",
        ranked.len(),
        projects.len()
    );

    // Content rewriting — all generative calls resolve here.
    let mut keyword_list: Vec<String> = jd_keywords.iter().cloned().collect();
    keyword_list.sort();
    let input = RewriteInput {
        jd_text: request.jd_text.clone(),
        keywords: keyword_list,
        summary: section_input(&located, SectionKind::Summary, request.overrides.summary, true),
        skills: section_input(&located, SectionKind::Skills, request.overrides.skills, false),
        projects: section_input(
            &located,
            SectionKind::ProjectExperience,
            request.overrides.project_experience,
            false,
        ),
        selected_projects: ranked,
    };
    let outcome = rewrite_sections(generator, input, defaults.generation_timeout).await;
    let warnings = collect_warnings(&outcome);

    // Reconstruction + post score
    let rebuilt = rebuild(&request.document, &located, &outcome);
    let optimized_keywords = keywords::extract(&rebuilt.full_text(), &stopwords);
    let optimized_score = keywords::overlap_score(&optimized_keywords, &jd_keywords);
    info!(
        "request {request_id}: optimized overlap {:.2} ({} warnings)",
        optimized_score,
        warnings.len()
    );

    Ok(OptimizationResult {
        request_id,
        document: rebuilt,
        baseline_score,
        optimized_score: Some(optimized_score),
        selected_projects,
        warnings,
        low_confidence: false,
    })
}

/// Builds the rewriter input for one target section.
///
/// `skip_when_missing` applies to Summary: an absent Summary section is not
/// synthesized, so there is nothing to rewrite. Skills and ProjectExperience
/// are insertable and still generate from an empty original.
fn section_input(
    located: &LocatedSections,
    kind: SectionKind,
    override_text: Option<String>,
    skip_when_missing: bool,
) -> SectionInput {
    let section = located.find(kind);
    SectionInput {
        original_text: section.map(|s| s.raw_text.clone()).unwrap_or_default(),
        override_text,
        skip: skip_when_missing && section.is_none(),
    }
}

fn collect_warnings(outcome: &RewriteOutcome) -> Vec<OptimizationWarning> {
    [&outcome.summary, &outcome.skills, &outcome.projects]
        .into_iter()
        .filter_map(|rewrite| {
            rewrite.failure.as_ref().map(|reason| OptimizationWarning {
                section: rewrite.target.as_str().to_string(),
                reason: reason.clone(),
            })
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

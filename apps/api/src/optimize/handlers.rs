//! Axum route handlers for the optimization API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::document::Document;
use crate::models::project::{parse_project_library, RankedProject};
use crate::optimize::keywords::{self, default_stopwords};
use crate::optimize::pipeline::{optimize, OptimizationRequest, OptimizationResult};
use crate::optimize::ranker;
use crate::optimize::sections::{locate, LocatedSections};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub document: Document,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    /// JD keyword overlap in [0, 1].
    pub score: f64,
    pub resume_keyword_count: usize,
    pub jd_keyword_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct LocateRequest {
    pub document: Document,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub project_library: String,
    pub jd_text: String,
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub ranked: Vec<RankedProject>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/optimize
///
/// Full pipeline: keyword baseline → section split → project ranking →
/// rewrite → reconstruction. Always returns a structurally valid document;
/// generative failures surface as per-section warnings.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizationRequest>,
) -> Result<Json<OptimizationResult>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let result = optimize(
        state.generator.clone(),
        request,
        state.pipeline_defaults(),
    )
    .await?;

    Ok(Json(result))
}

/// POST /api/v1/optimize/score
///
/// Baseline overlap preview — no sectioning, no generation.
pub async fn handle_score(
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }
    if request.document.is_structureless() {
        return Err(AppError::InputFormat(
            "document has no paragraph structure".to_string(),
        ));
    }

    let stopwords = default_stopwords();
    let jd_keywords = keywords::extract(&request.jd_text, &stopwords);
    let resume_keywords = keywords::extract(&request.document.full_text(), &stopwords);

    Ok(Json(ScoreResponse {
        score: keywords::overlap_score(&resume_keywords, &jd_keywords),
        resume_keyword_count: resume_keywords.len(),
        jd_keyword_count: jd_keywords.len(),
    }))
}

/// POST /api/v1/sections/locate
///
/// Section split preview. Useful for inspecting heading detection before
/// optimizing.
pub async fn handle_locate(
    Json(request): Json<LocateRequest>,
) -> Result<Json<LocatedSections>, AppError> {
    if request.document.is_structureless() {
        return Err(AppError::InputFormat(
            "document has no paragraph structure".to_string(),
        ));
    }

    Ok(Json(locate(&request.document)))
}

/// POST /api/v1/projects/rank
///
/// Ranking preview over a project library.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let top_n = request.top_n.unwrap_or(state.config.top_n_projects);
    let projects = parse_project_library(&request.project_library);
    let ranked = ranker::rank(&projects, &request.jd_text, top_n, &default_stopwords());

    Ok(Json(RankResponse { ranked }))
}

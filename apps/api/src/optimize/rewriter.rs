//! Content Rewriter — orchestrates generative calls for the target sections.
//!
//! The generative capability sits behind the `Generative` trait so the
//! orchestration is fully unit-testable with a stub. `LlmGenerator` (Claude
//! via `llm_client`) is the production implementation, carried in `AppState`
//! as `Arc<dyn Generative>`.
//!
//! Failure policy: a failed, empty, malformed, or timed-out response for one
//! section never aborts the others. The section falls back to its original
//! text and the outcome carries a per-section failure reason — content is
//! never silently dropped. User-edited overrides are honored verbatim and
//! skip generation entirely.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::{NO_FABRICATION_INSTRUCTION, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::project::RankedProject;
use crate::optimize::prompts::{
    PROJECT_BULLET_COUNT, PROJECT_PROMPT_TEMPLATE, SKILLS_PROMPT_TEMPLATE,
    SUMMARY_PROMPT_TEMPLATE,
};

// ────────────────────────────────────────────────────────────────────────────
// Generative capability boundary
// ────────────────────────────────────────────────────────────────────────────

/// The sections the rewriter can regenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewriteTarget {
    Summary,
    Skills,
    ProjectExperience,
}

impl RewriteTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteTarget::Summary => "summary",
            RewriteTarget::Skills => "skills",
            RewriteTarget::ProjectExperience => "project_experience",
        }
    }
}

/// Structured request across the generative boundary.
///
/// For `ProjectExperience` the rewriter issues one request per selected
/// project; `selected_projects` then carries exactly the project being
/// rewritten.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub target: RewriteTarget,
    pub jd_text: String,
    /// Sorted for prompt determinism.
    pub keywords: Vec<String>,
    pub original_text: String,
    pub selected_projects: Vec<RankedProject>,
}

/// The opaque text-rewriting capability.
///
/// Implementations must tolerate being called concurrently. The response is
/// plain text following the section's output convention; the rewriter
/// validates shape and falls back on violations.
#[async_trait]
pub trait Generative: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmGenerator — production implementation over the Claude client
// ────────────────────────────────────────────────────────────────────────────

/// Generative implementation backed by the Claude client.
pub struct LlmGenerator(pub LlmClient);

#[async_trait]
impl Generative for LlmGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let prompt = build_prompt(request)?;
        self.0.call_text(&prompt, PLAIN_TEXT_SYSTEM).await
    }
}

fn build_prompt(request: &GenerationRequest) -> Result<String, LlmError> {
    let keywords = request.keywords.join(", ");
    let prompt = match request.target {
        RewriteTarget::Summary => SUMMARY_PROMPT_TEMPLATE
            .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
            .replace("{jd_text}", &request.jd_text)
            .replace("{keywords}", &keywords)
            .replace("{original_text}", &request.original_text),
        RewriteTarget::Skills => SKILLS_PROMPT_TEMPLATE
            .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
            .replace("{jd_text}", &request.jd_text)
            .replace("{keywords}", &keywords)
            .replace("{original_text}", &request.original_text),
        RewriteTarget::ProjectExperience => {
            let project = request
                .selected_projects
                .first()
                .ok_or(LlmError::EmptyContent)?;
            PROJECT_PROMPT_TEMPLATE
                .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
                .replace("{bullet_count}", &PROJECT_BULLET_COUNT.to_string())
                .replace("{project_title}", &project.entry.title)
                .replace("{project_description}", &project.entry.description)
                .replace("{jd_text}", &request.jd_text)
                .replace("{keywords}", &keywords)
                .replace("{original_text}", &request.original_text)
        }
    };
    Ok(prompt)
}

// ────────────────────────────────────────────────────────────────────────────
// Rewrite orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Per-section input: the located original text plus an optional user edit.
#[derive(Debug, Clone, Default)]
pub struct SectionInput {
    /// Original section body text; empty when the section is missing.
    pub original_text: String,
    /// User-edited replacement — honored verbatim, skips generation.
    pub override_text: Option<String>,
    /// Leave the section untouched without calling the generator. An
    /// override still wins over a skip.
    pub skip: bool,
}

/// Where a section's final text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewriteSource {
    Generated,
    Override,
    /// Original text kept — either nothing to generate, or a recovered failure.
    Original,
}

/// Final text for one target section plus provenance and failure flag.
#[derive(Debug, Clone)]
pub struct SectionRewrite {
    pub target: RewriteTarget,
    pub text: String,
    pub source: RewriteSource,
    /// Set when generation failed and the original text was kept.
    pub failure: Option<String>,
}

/// Rewriter output — one entry per target section, fully resolved.
/// The reconstructor requires all three before it runs.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub summary: SectionRewrite,
    pub skills: SectionRewrite,
    pub projects: SectionRewrite,
}

/// All inputs the rewriter needs for one optimization run.
#[derive(Debug, Clone)]
pub struct RewriteInput {
    pub jd_text: String,
    pub keywords: Vec<String>,
    pub summary: SectionInput,
    pub skills: SectionInput,
    pub projects: SectionInput,
    pub selected_projects: Vec<RankedProject>,
}

/// Rewrites all target sections, issuing the generative calls concurrently.
///
/// Summary, Skills, and each selected project get their own spawned task;
/// every call is bounded by `timeout`. All results are joined before
/// returning — the caller never sees a partially-resolved outcome.
pub async fn rewrite_sections(
    generator: Arc<dyn Generative>,
    input: RewriteInput,
    timeout: Duration,
) -> RewriteOutcome {
    let summary_task = rewrite_single(
        generator.clone(),
        RewriteTarget::Summary,
        &input,
        input.summary.clone(),
        timeout,
    );
    let skills_task = rewrite_single(
        generator.clone(),
        RewriteTarget::Skills,
        &input,
        input.skills.clone(),
        timeout,
    );
    let projects_task = rewrite_projects(generator, &input, timeout);

    let (summary, skills, projects) = tokio::join!(summary_task, skills_task, projects_task);

    RewriteOutcome {
        summary,
        skills,
        projects,
    }
}

/// Runs one single-call section (Summary or Skills) on its own task.
async fn rewrite_single(
    generator: Arc<dyn Generative>,
    target: RewriteTarget,
    input: &RewriteInput,
    section: SectionInput,
    timeout: Duration,
) -> SectionRewrite {
    if let Some(text) = section.override_text {
        return SectionRewrite {
            target,
            text,
            source: RewriteSource::Override,
            failure: None,
        };
    }

    if section.skip {
        return SectionRewrite {
            target,
            text: section.original_text,
            source: RewriteSource::Original,
            failure: None,
        };
    }

    let request = GenerationRequest {
        target,
        jd_text: input.jd_text.clone(),
        keywords: input.keywords.clone(),
        original_text: section.original_text.clone(),
        selected_projects: Vec::new(),
    };

    let handle =
        tokio::spawn(async move { generate_bounded(generator, request, timeout).await });

    match handle.await {
        Ok(Ok(text)) if !text.trim().is_empty() => SectionRewrite {
            target,
            text,
            source: RewriteSource::Generated,
            failure: None,
        },
        Ok(Ok(_)) => fallback(target, section.original_text, "empty generated text"),
        Ok(Err(e)) => fallback(target, section.original_text, &e.to_string()),
        Err(e) => fallback(target, section.original_text, &format!("task failed: {e}")),
    }
}

/// Rewrites the ProjectExperience section: one concurrent call per selected
/// project. Any failed or malformed block fails the whole section into
/// fallback — emitting a partial project list would silently drop selected
/// content.
async fn rewrite_projects(
    generator: Arc<dyn Generative>,
    input: &RewriteInput,
    timeout: Duration,
) -> SectionRewrite {
    let target = RewriteTarget::ProjectExperience;
    let section = input.projects.clone();

    if let Some(text) = section.override_text {
        return SectionRewrite {
            target,
            text,
            source: RewriteSource::Override,
            failure: None,
        };
    }

    if section.skip || input.selected_projects.is_empty() {
        // Nothing to generate — keep the section as-is, no warning.
        return SectionRewrite {
            target,
            text: section.original_text,
            source: RewriteSource::Original,
            failure: None,
        };
    }

    let handles: Vec<_> = input
        .selected_projects
        .iter()
        .map(|project| {
            let request = GenerationRequest {
                target,
                jd_text: input.jd_text.clone(),
                keywords: input.keywords.clone(),
                original_text: section.original_text.clone(),
                selected_projects: vec![project.clone()],
            };
            let generator = generator.clone();
            tokio::spawn(async move { generate_bounded(generator, request, timeout).await })
        })
        .collect();

    let mut blocks = Vec::with_capacity(handles.len());
    let mut first_failure: Option<String> = None;
    for handle in handles {
        match handle.await {
            Ok(Ok(text)) => match validate_project_block(&text) {
                Ok(block) => blocks.push(block),
                Err(reason) => {
                    first_failure.get_or_insert(reason);
                }
            },
            Ok(Err(e)) => {
                first_failure.get_or_insert(e.to_string());
            }
            Err(e) => {
                first_failure.get_or_insert(format!("task failed: {e}"));
            }
        }
    }

    match first_failure {
        None => SectionRewrite {
            target,
            text: blocks.join("\n\n"),
            source: RewriteSource::Generated,
            failure: None,
        },
        Some(reason) => fallback(target, section.original_text, &reason),
    }
}

async fn generate_bounded(
    generator: Arc<dyn Generative>,
    request: GenerationRequest,
    timeout: Duration,
) -> Result<String, LlmError> {
    match tokio::time::timeout(timeout, generator.generate(&request)).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::Timeout {
            seconds: timeout.as_secs(),
        }),
    }
}

fn fallback(target: RewriteTarget, original_text: String, reason: &str) -> SectionRewrite {
    warn!(
        "{} generation failed ({reason}) — falling back to original text",
        target.as_str()
    );
    SectionRewrite {
        target,
        text: original_text,
        source: RewriteSource::Original,
        failure: Some(reason.to_string()),
    }
}

/// A project block must carry a title line and at least one line under it.
fn validate_project_block(text: &str) -> Result<String, String> {
    let trimmed = text.trim();
    let lines: Vec<&str> = trimmed.lines().filter(|l| !l.trim().is_empty()).collect();
    match lines.len() {
        0 => Err("empty project block".to_string()),
        1 => Err(format!("project block has no bullets: {}", lines[0])),
        _ => Ok(trimmed.to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::project::ProjectEntry;

    /// Stub that returns a canned block per target and counts calls.
    struct StubGenerator {
        calls: AtomicUsize,
    }

    impl StubGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Generative for StubGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(match request.target {
                RewriteTarget::Summary => "A data engineer focused on cloud pipelines.".to_string(),
                RewriteTarget::Skills => "Programming: Rust, SQL\nCloud: Azure".to_string(),
                RewriteTarget::ProjectExperience => {
                    let title = &request.selected_projects[0].entry.title;
                    format!("{title}\n- Built the thing\n- Reduced costs by 20%")
                }
            })
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generative for FailingGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    /// Returns Ok with an empty payload — malformed, not an error.
    struct BlankGenerator;

    #[async_trait]
    impl Generative for BlankGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, LlmError> {
            Ok("   ".to_string())
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl Generative for SlowGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn make_ranked(title: &str) -> RankedProject {
        RankedProject {
            entry: ProjectEntry {
                title: title.to_string(),
                description: "description".to_string(),
                tags: Vec::new(),
            },
            library_index: 0,
            score: 0.5,
        }
    }

    fn make_input(selected: Vec<RankedProject>) -> RewriteInput {
        RewriteInput {
            jd_text: "Rust engineer".to_string(),
            keywords: vec!["rust".to_string(), "sql".to_string()],
            summary: SectionInput {
                original_text: "Old summary.".to_string(),
                ..Default::default()
            },
            skills: SectionInput {
                original_text: "Old skills.".to_string(),
                ..Default::default()
            },
            projects: SectionInput {
                original_text: "Old projects.".to_string(),
                ..Default::default()
            },
            selected_projects: selected,
        }
    }

    #[tokio::test]
    async fn test_all_sections_generated_on_success() {
        let outcome = rewrite_sections(
            Arc::new(StubGenerator::new()),
            make_input(vec![make_ranked("Pipeline")]),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcome.summary.source, RewriteSource::Generated);
        assert_eq!(outcome.skills.source, RewriteSource::Generated);
        assert_eq!(outcome.projects.source, RewriteSource::Generated);
        assert!(outcome.skills.failure.is_none());
        assert!(outcome.projects.text.contains("Pipeline"));
    }

    #[tokio::test]
    async fn test_one_call_per_selected_project() {
        let stub = Arc::new(StubGenerator::new());
        let outcome = rewrite_sections(
            stub.clone(),
            make_input(vec![make_ranked("One"), make_ranked("Two"), make_ranked("Three")]),
            Duration::from_secs(5),
        )
        .await;

        // summary + skills + 3 projects
        assert_eq!(stub.calls.load(Ordering::SeqCst), 5);
        let blocks: Vec<&str> = outcome.projects.text.split("\n\n").collect();
        assert_eq!(blocks.len(), 3);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_original_with_flag() {
        let outcome = rewrite_sections(
            Arc::new(FailingGenerator),
            make_input(vec![make_ranked("Pipeline")]),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcome.skills.source, RewriteSource::Original);
        assert_eq!(outcome.skills.text, "Old skills.");
        assert!(outcome.skills.failure.is_some(), "failure flag must be set");
        assert_eq!(outcome.projects.text, "Old projects.");
        assert!(outcome.projects.failure.is_some());
    }

    #[tokio::test]
    async fn test_empty_string_response_falls_back_with_flag() {
        let outcome = rewrite_sections(
            Arc::new(BlankGenerator),
            make_input(vec![]),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcome.skills.text, "Old skills.");
        assert_eq!(outcome.skills.source, RewriteSource::Original);
        assert!(outcome.skills.failure.is_some());
    }

    #[tokio::test]
    async fn test_override_honored_verbatim_and_skips_generation() {
        let stub = Arc::new(StubGenerator::new());
        let mut input = make_input(vec![]);
        input.skills.override_text = Some("My hand-edited skills".to_string());
        input.summary.override_text = Some("My hand-edited summary".to_string());
        input.projects.override_text = Some("My hand-edited projects".to_string());

        let outcome = rewrite_sections(stub.clone(), input, Duration::from_secs(5)).await;

        assert_eq!(stub.calls.load(Ordering::SeqCst), 0, "no generation calls");
        assert_eq!(outcome.skills.source, RewriteSource::Override);
        assert_eq!(outcome.skills.text, "My hand-edited skills");
        assert_eq!(outcome.summary.text, "My hand-edited summary");
        assert_eq!(outcome.projects.text, "My hand-edited projects");
    }

    #[tokio::test]
    async fn test_no_selected_projects_keeps_section_without_warning() {
        let outcome = rewrite_sections(
            Arc::new(StubGenerator::new()),
            make_input(vec![]),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcome.projects.source, RewriteSource::Original);
        assert_eq!(outcome.projects.text, "Old projects.");
        assert!(outcome.projects.failure.is_none());
    }

    #[tokio::test]
    async fn test_timeout_falls_back_per_section() {
        let outcome = rewrite_sections(
            Arc::new(SlowGenerator),
            make_input(vec![make_ranked("Pipeline")]),
            Duration::from_millis(10),
        )
        .await;

        assert_eq!(outcome.summary.source, RewriteSource::Original);
        assert!(outcome
            .summary
            .failure
            .as_deref()
            .unwrap()
            .contains("timed out"));
    }

    #[tokio::test]
    async fn test_skipped_section_keeps_original_without_calls() {
        let stub = Arc::new(StubGenerator::new());
        let mut input = make_input(vec![]);
        input.summary.skip = true;
        input.skills.skip = true;

        let outcome = rewrite_sections(stub.clone(), input, Duration::from_secs(5)).await;

        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.summary.source, RewriteSource::Original);
        assert_eq!(outcome.summary.text, "Old summary.");
        assert!(outcome.summary.failure.is_none());
    }

    #[test]
    fn test_validate_project_block_requires_bullets() {
        assert!(validate_project_block("Title\n- bullet").is_ok());
        assert!(validate_project_block("Title only").is_err());
        assert!(validate_project_block("   \n  ").is_err());
    }

    #[test]
    fn test_build_prompt_fills_placeholders() {
        let request = GenerationRequest {
            target: RewriteTarget::Skills,
            jd_text: "Needs Rust".to_string(),
            keywords: vec!["rust".to_string()],
            original_text: "Skills: C".to_string(),
            selected_projects: Vec::new(),
        };
        let prompt = build_prompt(&request).unwrap();
        assert!(prompt.contains("Needs Rust"));
        assert!(prompt.contains("rust"));
        assert!(prompt.contains("Skills: C"));
        assert!(!prompt.contains("{jd_text}"));
        assert!(!prompt.contains("{keywords}"));
    }

    #[test]
    fn test_project_prompt_requires_a_selected_project() {
        let request = GenerationRequest {
            target: RewriteTarget::ProjectExperience,
            jd_text: String::new(),
            keywords: Vec::new(),
            original_text: String::new(),
            selected_projects: Vec::new(),
        };
        assert!(build_prompt(&request).is_err());
    }
}

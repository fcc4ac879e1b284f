// All LLM prompt constants for the optimize module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Number of bullet lines requested per rewritten project block.
pub const PROJECT_BULLET_COUNT: usize = 3;

/// Skills rewrite prompt template.
/// Replace: {no_fabrication}, {jd_text}, {keywords}, {original_text}
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Rewrite the SKILLS section of a resume so it aligns with the job description below.

OUTPUT FORMAT (strict):
- One category per line, formatted exactly as `Category: item, item, item`
- 3 to 8 category lines, e.g. Programming, Data & Analytics, Cloud, Tools
- Group every skill under the best-fitting category; create a new category when none fits
- Do NOT put each individual tool on its own line
- No bullets, no numbering, no text before or after the category lines

Weave in the job-description keywords below wherever the original skills
plausibly support them, keeping exact technical spellings (e.g. SQL, Tableau,
Azure Databricks).

JOB DESCRIPTION:
{jd_text}

JOB DESCRIPTION KEYWORDS:
{keywords}

ORIGINAL SKILLS SECTION:
{original_text}"#;

/// Summary rewrite prompt template.
/// Replace: {no_fabrication}, {jd_text}, {keywords}, {original_text}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Rewrite the SUMMARY section of a resume so it speaks directly to the job
description below.

OUTPUT FORMAT (strict):
- 2 to 3 sentences of plain prose, no bullets, no headings
- Keep the candidate's actual seniority and field; sharpen the framing, do not inflate it

JOB DESCRIPTION:
{jd_text}

JOB DESCRIPTION KEYWORDS:
{keywords}

ORIGINAL SUMMARY:
{original_text}"#;

/// Per-project rewrite prompt template — one call per selected project.
/// Replace: {no_fabrication}, {jd_text}, {keywords}, {bullet_count},
///          {project_title}, {project_description}, {original_text}
pub const PROJECT_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Rewrite one project from a resume's PROJECT EXPERIENCE section so it aligns
with the job description below.

OUTPUT FORMAT (strict):
- Line 1: the project title in Title Case, nothing else
- Then exactly {bullet_count} bullet lines, each starting with "- "
- Every bullet starts with a strong action verb (Built, Designed, Automated,
  Reduced, ...) and states a measurable outcome where the project description
  supports one
- No text before the title or after the last bullet

PROJECT TITLE:
{project_title}

PROJECT DESCRIPTION:
{project_description}

JOB DESCRIPTION:
{jd_text}

JOB DESCRIPTION KEYWORDS:
{keywords}

ORIGINAL PROJECT EXPERIENCE SECTION (for phrasing context only):
{original_text}"#;

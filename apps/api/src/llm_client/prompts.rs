// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces plain-text output.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a precise resume-writing assistant. \
    You MUST respond with plain text only. \
    Do NOT use markdown formatting, code fences, or headers. \
    Do NOT include explanations, preambles, or apologies.";

/// Common instruction appended to all rewrite prompts.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Enhance and rephrase only what the provided resume content and \
    project descriptions already support. Do NOT invent employers, degrees, \
    projects, or outcomes. Integrating a job-description keyword is allowed \
    only where the existing content makes it plausible.";

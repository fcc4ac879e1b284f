//! Project library model — parsing the flat project library text into entries.
//!
//! Wire format: blank-line-separated blocks. First line of a block is the
//! project title; an optional `Tags:` line carries comma-separated tags; all
//! remaining lines are the free-text description. Entry identity is the
//! position in the library — no ids.

use serde::{Deserialize, Serialize};

/// One item from the user's project library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProjectEntry {
    /// Title + description + tags as one text blob, for keyword extraction.
    pub fn combined_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.description);
        if !self.tags.is_empty() {
            text.push(' ');
            text.push_str(&self.tags.join(" "));
        }
        text
    }
}

/// A project entry plus its relevance score against a job description.
/// Ordering is total: score descending, library order on ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedProject {
    pub entry: ProjectEntry,
    /// Index of the entry in the original library (tie-break key).
    pub library_index: usize,
    /// Relevance score in [0, 1].
    pub score: f64,
}

/// Parses the flat project library text into entries.
///
/// An empty or whitespace-only library yields an empty vec — not an error.
/// Blocks whose first line is blank after trimming are skipped.
pub fn parse_project_library(text: &str) -> Vec<ProjectEntry> {
    text.split("\n\n")
        .filter_map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Option<ProjectEntry> {
    let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
    let title = lines.next()?.to_string();

    let mut tags = Vec::new();
    let mut description_lines = Vec::new();
    for line in lines {
        if let Some(rest) = strip_tags_prefix(line) {
            tags.extend(
                rest.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty()),
            );
        } else {
            description_lines.push(line);
        }
    }

    Some(ProjectEntry {
        title,
        description: description_lines.join(" "),
        tags,
    })
}

fn strip_tags_prefix(line: &str) -> Option<&str> {
    let lower = line.to_lowercase();
    if lower.starts_with("tags:") {
        Some(line["tags:".len()..].trim())
    } else {
        None
    }
}

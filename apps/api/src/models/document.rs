//! Paragraph/run document model — the formatted-document structure the
//! optimizer reads and rewrites.
//!
//! Documents travel as JSON trees: an ordered paragraph list, each paragraph
//! an ordered run list plus paragraph-level formatting (indent, bullet,
//! spacing). Run-level formatting carries font name, size, bold, italic.
//! Paragraphs outside rewritten sections must survive the pipeline
//! byte-identical, so every formatting field round-trips through serde.

use serde::{Deserialize, Serialize};

/// Character-level formatting attached to a single run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFormat {
    /// Font family name, e.g. "Times New Roman". None inherits the document default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Font size in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_pt: Option<f32>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

/// A contiguous span of identically-formatted text within a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub format: RunFormat,
}

impl Run {
    pub fn new(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }
}

/// Paragraph-level formatting: indentation, bullet marker, spacing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    /// Indentation level, 0 = flush left.
    #[serde(default)]
    pub indent_level: u8,
    /// True when the paragraph carries a bullet/list marker.
    #[serde(default)]
    pub bullet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_before_pt: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_after_pt: Option<f32>,
}

/// One paragraph: an ordered run list plus paragraph formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default)]
    pub format: ParagraphFormat,
}

impl Paragraph {
    /// Builds a single-run paragraph with the given formats.
    pub fn from_text(
        text: impl Into<String>,
        run_format: RunFormat,
        format: ParagraphFormat,
    ) -> Self {
        Self {
            runs: vec![Run::new(text, run_format)],
            format,
        }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True when the paragraph contains no non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }

    /// Formatting of the first run, or the default when the paragraph is empty.
    /// Used when cloning a template paragraph onto new content.
    pub fn lead_run_format(&self) -> RunFormat {
        self.runs
            .first()
            .map(|r| r.format.clone())
            .unwrap_or_default()
    }
}

/// An ordered sequence of paragraphs. The unit the whole pipeline operates on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Plain text of the whole document, one line per paragraph.
    pub fn full_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True when there is no paragraph structure to work with.
    /// An empty paragraph list cannot be sectioned or reconstructed.
    pub fn is_structureless(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

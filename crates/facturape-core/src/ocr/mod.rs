//! OCR line input and image preprocessing.
//!
//! Recognition itself happens upstream (PaddleOCR or similar); this module
//! only decodes its output into [`OcrLine`]s and offers the contrast
//! enhancement step that may run before recognition.

mod preprocessing;

pub use preprocessing::ContrastEnhancer;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A recognized text line with its confidence and geometry.
///
/// Line order is the only layout signal the extraction engine uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLine")]
pub struct OcrLine {
    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,

    /// Bounding polygon points `[x, y]`, usually four corners.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub polygon: Vec<[f32; 2]>,
}

impl OcrLine {
    /// Create a line from text alone, with full confidence and no geometry.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: 1.0,
            polygon: Vec::new(),
        }
    }

    /// Attach recognition confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Line shapes accepted on input.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLine {
    /// PaddleOCR: `[[[x, y], ...], ["text", score]]`.
    Paddle(Vec<[f32; 2]>, (String, f32)),
    /// Structured object, as produced by `OcrLine`'s own serializer.
    Detailed {
        text: String,
        #[serde(default = "full_confidence")]
        confidence: f32,
        #[serde(default)]
        polygon: Vec<[f32; 2]>,
    },
    /// Bare string.
    Text(String),
}

fn full_confidence() -> f32 {
    1.0
}

impl From<RawLine> for OcrLine {
    fn from(raw: RawLine) -> Self {
        match raw {
            RawLine::Paddle(polygon, (text, confidence)) => Self {
                text,
                confidence,
                polygon,
            },
            RawLine::Detailed {
                text,
                confidence,
                polygon,
            } => Self {
                text,
                confidence,
                polygon,
            },
            RawLine::Text(text) => Self::from_text(text),
        }
    }
}

/// Whole OCR dumps: a flat line list, per-page lists, or `{"lines": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Lines(Vec<OcrLine>),
    Pages(Vec<Option<Vec<OcrLine>>>),
    Wrapped { lines: Vec<OcrLine> },
}

/// Decode an OCR dump from JSON.
///
/// Multi-page dumps contribute only their first page; a `null` first page
/// (PaddleOCR's "nothing recognized") yields no lines.
pub fn lines_from_json(json: &str) -> Result<Vec<OcrLine>, OcrError> {
    let document: RawDocument =
        serde_json::from_str(json).map_err(|e| OcrError::InvalidInput(e.to_string()))?;

    Ok(match document {
        RawDocument::Lines(lines) | RawDocument::Wrapped { lines } => lines,
        RawDocument::Pages(pages) => pages.into_iter().next().flatten().unwrap_or_default(),
    })
}

/// Split plain text into lines, dropping blank ones.
pub fn lines_from_text(text: &str) -> Vec<OcrLine> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(OcrLine::from_text)
        .collect()
}

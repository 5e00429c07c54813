//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{CascadeInvoiceParser, ExtractionReport, RucStrategy};
pub use rules::{TotalSource, TotalTier};

use crate::models::invoice::ExtractionResult;
use crate::ocr::OcrLine;

/// Trait for invoice field extractors.
///
/// Extraction never fails: fields that cannot be resolved stay unset.
pub trait InvoiceExtractor {
    /// Extract invoice fields from ordered OCR lines.
    fn extract(&self, lines: &[OcrLine]) -> ExtractionResult;

    /// Extract invoice fields from plain text, one OCR line per text line.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;
}

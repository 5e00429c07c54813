//! Emission date extraction.

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::DATE_PATTERN;

/// Date field extractor for `DD/MM/YYYY` and `YYYY-MM-DD` style dates.
///
/// Dates are returned verbatim; day/month order is not disambiguated.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let m = DATE_PATTERN.find(text)?;
        Some(ExtractionMatch::new(m.as_str().to_string(), m.as_str()).with_position(m.start(), m.end()))
    }
}

/// First date in the text.
pub fn extract_date(text: &str) -> Option<String> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

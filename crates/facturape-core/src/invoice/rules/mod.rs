//! Rule-based field extractors for Peruvian invoices.

pub mod amounts;
pub mod currency;
pub mod dates;
pub mod merchants;
pub mod patterns;
pub mod ruc;
pub mod similarity;

pub use amounts::{extract_amount, parse_amount, AmountExtractor, TotalLocator, TotalSource, TotalTier};
pub use currency::detect_currency;
pub use dates::{extract_date, DateExtractor};
pub use merchants::{Merchant, MerchantDirectory};
pub use ruc::{extract_labeled_ruc, extract_unlabeled_ruc, validate_ruc, RucExtractor, TaxpayerKind};
pub use similarity::similarity;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A matched value together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span in the text the extractor searched. For labeled RUCs that
    /// is the uppercased, whitespace-free text, not the caller's input.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

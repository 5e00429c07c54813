//! Core library for Peruvian invoice OCR processing.
//!
//! This crate provides:
//! - OCR line decoding (PaddleOCR dumps, structured lines, plain text)
//! - Contrast enhancement for photographed receipts
//! - Peruvian invoice field extraction (RUC, emission date, currency, total)
//! - SUNAT modulo-11 RUC validation and a seed merchant directory

pub mod error;
pub mod models;
pub mod ocr;
pub mod invoice;

pub use error::{FacturaError, Result};
pub use models::config::FacturaConfig;
pub use models::invoice::{Currency, ExtractionResult};
pub use ocr::{ContrastEnhancer, OcrLine};
pub use invoice::{
    CascadeInvoiceParser, ExtractionReport, InvoiceExtractor, RucStrategy, TotalSource,
};
pub use invoice::rules::{MerchantDirectory, validate_ruc};

//! Error types for the facturape-core library.

use thiserror::Error;

/// Main error type for the facturape library.
#[derive(Error, Debug)]
pub enum FacturaError {
    /// Invoice extraction setup error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// OCR input or image preprocessing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR input and image preprocessing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR dump could not be decoded into lines.
    #[error("invalid OCR input: {0}")]
    InvalidInput(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),
}

/// Errors raised while building extraction components.
///
/// The extraction cascade itself never fails; a miss leaves the field unset.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A merchant directory entry carries a RUC that fails the checksum.
    #[error("merchant {name} has invalid RUC {ruc}")]
    InvalidMerchant { name: String, ruc: String },

    /// The same merchant name appears twice in a directory.
    #[error("duplicate merchant entry: {0}")]
    DuplicateMerchant(String),
}

/// Result type for the facturape library.
pub type Result<T> = std::result::Result<T, FacturaError>;

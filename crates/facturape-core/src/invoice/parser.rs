//! Cascade invoice parser: merchant directory, labeled and unlabeled RUC
//! strategies, keyword-anchored totals.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::ExtractionResult;
use crate::ocr::{lines_from_text, OcrLine};

use super::rules::{
    currency::detect_currency,
    dates::extract_date,
    merchants::MerchantDirectory,
    ruc::{extract_labeled_ruc, extract_unlabeled_ruc, TaxpayerKind},
    TotalLocator, TotalSource,
};
use super::InvoiceExtractor;

/// One way of resolving the issuer RUC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RucStrategy {
    /// Known merchant named in the header zone.
    MerchantDirectory,
    /// 11-digit run after an explicit "RUC" label.
    Labeled,
    /// Standalone run starting with "20" (business).
    UnlabeledBusiness,
    /// Standalone run starting with "10" (individual).
    UnlabeledIndividual,
}

impl RucStrategy {
    /// Resolution order used unless overridden.
    pub const DEFAULT_ORDER: [RucStrategy; 4] = [
        RucStrategy::MerchantDirectory,
        RucStrategy::Labeled,
        RucStrategy::UnlabeledBusiness,
        RucStrategy::UnlabeledIndividual,
    ];
}

/// Extraction result with provenance and warnings.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Extracted fields.
    pub result: ExtractionResult,
    /// Strategy that produced the RUC.
    pub ruc_source: Option<RucStrategy>,
    /// Lines that produced the total.
    pub total_source: Option<TotalSource>,
    /// One entry per key field left unset.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Invoice parser running a fixed-order cascade per field.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// extractions.
#[derive(Debug, Clone)]
pub struct CascadeInvoiceParser {
    directory: MerchantDirectory,
    similarity_threshold: f64,
    header_lines: usize,
    ruc_strategies: Vec<RucStrategy>,
}

impl CascadeInvoiceParser {
    /// Create a parser with the seed merchant directory and default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            directory: MerchantDirectory::seed(),
            similarity_threshold: config.similarity_threshold,
            header_lines: config.header_lines,
            ruc_strategies: RucStrategy::DEFAULT_ORDER.to_vec(),
        }
    }

    /// Replace the merchant directory.
    pub fn with_directory(mut self, directory: MerchantDirectory) -> Self {
        self.directory = directory;
        self
    }

    /// Set the merchant name similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the header zone size.
    pub fn with_header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = header_lines;
        self
    }

    /// Replace the RUC strategy order.
    pub fn with_ruc_strategies(mut self, strategies: impl IntoIterator<Item = RucStrategy>) -> Self {
        self.ruc_strategies = strategies.into_iter().collect();
        self
    }

    /// The merchant directory in use.
    pub fn directory(&self) -> &MerchantDirectory {
        &self.directory
    }

    /// Run a single RUC strategy.
    pub fn run_strategy(&self, strategy: RucStrategy, header: &[String], text: &str) -> Option<String> {
        match strategy {
            RucStrategy::MerchantDirectory => self
                .directory
                .resolve(header, self.similarity_threshold)
                .map(|m| m.ruc.clone()),
            RucStrategy::Labeled => extract_labeled_ruc(text),
            RucStrategy::UnlabeledBusiness => extract_unlabeled_ruc(text, TaxpayerKind::Business),
            RucStrategy::UnlabeledIndividual => extract_unlabeled_ruc(text, TaxpayerKind::Individual),
        }
    }

    fn resolve_ruc(&self, header: &[String], text: &str) -> Option<(String, RucStrategy)> {
        self.ruc_strategies.iter().find_map(|&strategy| {
            let ruc = self.run_strategy(strategy, header, text)?;
            debug!("RUC {} resolved by {:?}", ruc, strategy);
            Some((ruc, strategy))
        })
    }

    /// Extract fields along with the strategies and lines that produced them.
    pub fn extract_detailed(&self, lines: &[OcrLine]) -> ExtractionReport {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Extracting invoice fields from {} OCR lines", lines.len());

        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        let full_text = texts.join(" ");
        let header: Vec<String> = texts
            .iter()
            .take(self.header_lines)
            .map(|t| t.to_uppercase())
            .collect();

        let mut result = ExtractionResult::default();

        let ruc_source = match self.resolve_ruc(&header, &full_text) {
            Some((ruc, strategy)) => {
                result.issuer_ruc = Some(ruc);
                Some(strategy)
            }
            None => {
                warnings.push("Could not extract issuer RUC".to_string());
                None
            }
        };

        result.issue_date = extract_date(&full_text);
        if result.issue_date.is_none() {
            warnings.push("Could not extract emission date".to_string());
        }

        result.currency = detect_currency(&full_text);

        let total_source = match TotalLocator::new().locate(&texts) {
            Some((amount, source)) => {
                result.total = amount.max(Decimal::ZERO);
                Some(source)
            }
            None => {
                warnings.push("Could not locate total amount".to_string());
                None
            }
        };

        debug!(
            "Extracted ruc={:?} date={:?} currency={} total={}",
            result.issuer_ruc, result.issue_date, result.currency, result.total
        );

        ExtractionReport {
            result,
            ruc_source,
            total_source,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for CascadeInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for CascadeInvoiceParser {
    fn extract(&self, lines: &[OcrLine]) -> ExtractionResult {
        self.extract_detailed(lines).result
    }

    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.extract(&lines_from_text(text))
    }
}

//! Extraction result model handed to UI and storage collaborators.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice currency. Only soles and US dollars are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    /// Peruvian sol.
    #[default]
    #[serde(rename = "PEN")]
    Pen,
    /// US dollar.
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pen => "PEN",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured fields extracted from one invoice image.
///
/// Serializes to a flat object with the keys `ruc_emisor`, `fecha_emision`,
/// `moneda` and `total`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Issuer taxpayer number: 11 digits, checksum-valid or from the merchant directory.
    #[serde(rename = "ruc_emisor")]
    pub issuer_ruc: Option<String>,

    /// Emission date exactly as printed (`DD/MM/YYYY`, `YYYY-MM-DD`, ...).
    #[serde(rename = "fecha_emision")]
    pub issue_date: Option<String>,

    /// Invoice currency.
    #[serde(rename = "moneda")]
    pub currency: Currency,

    /// Total amount, never negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl ExtractionResult {
    /// Parse the printed emission date into a calendar date.
    ///
    /// Returns `None` when no date was found or it is not a real calendar day.
    pub fn emission_date(&self) -> Option<NaiveDate> {
        let raw = self.issue_date.as_deref()?.replace('-', "/");
        NaiveDate::parse_from_str(&raw, "%d/%m/%Y")
            .or_else(|_| NaiveDate::parse_from_str(&raw, "%Y/%m/%d"))
            .ok()
    }

    /// Names of the key fields that remain unset.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.issuer_ruc.is_none() {
            missing.push("ruc_emisor");
        }
        if self.issue_date.is_none() {
            missing.push("fecha_emision");
        }
        if self.total.is_zero() {
            missing.push("total");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_default_is_fully_unset() {
        let result = ExtractionResult::default();
        assert_eq!(result.issuer_ruc, None);
        assert_eq!(result.issue_date, None);
        assert_eq!(result.currency, Currency::Pen);
        assert_eq!(result.total, Decimal::ZERO);
        assert_eq!(
            result.missing_fields(),
            vec!["ruc_emisor", "fecha_emision", "total"]
        );
    }

    #[test]
    fn test_serializes_to_flat_record() {
        let result = ExtractionResult {
            issuer_ruc: Some("20100070970".to_string()),
            issue_date: Some("15/03/2024".to_string()),
            currency: Currency::Usd,
            total: Decimal::new(5050, 2),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "ruc_emisor": "20100070970",
                "fecha_emision": "15/03/2024",
                "moneda": "USD",
                "total": 50.5
            })
        );

        let back: ExtractionResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_emission_date_formats() {
        let mut result = ExtractionResult {
            issue_date: Some("15/03/2024".to_string()),
            ..Default::default()
        };
        assert_eq!(result.emission_date(), NaiveDate::from_ymd_opt(2024, 3, 15));

        result.issue_date = Some("2024-03-15".to_string());
        assert_eq!(result.emission_date(), NaiveDate::from_ymd_opt(2024, 3, 15));

        result.issue_date = Some("31/02/2024".to_string());
        assert_eq!(result.emission_date(), None);
    }
}

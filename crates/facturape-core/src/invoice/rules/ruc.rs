//! RUC (Peruvian taxpayer registration number) extraction and validation.

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::{DIGIT_RUN, RUC_LABELED};

/// Prefixes accepted after an explicit "RUC" label.
const LABELED_PREFIXES: [&str; 4] = ["10", "15", "17", "20"];

/// Prefixes that make a bare 11-digit run a RUC candidate.
const UNLABELED_PREFIXES: [&str; 5] = ["10", "15", "16", "17", "20"];

/// SUNAT check-digit weights for digits 0..9.
const WEIGHTS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

/// Taxpayer class encoded in the first two RUC digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxpayerKind {
    /// "20": registered business (persona jurídica).
    Business,
    /// "10": individual taxpayer (persona natural).
    Individual,
}

impl TaxpayerKind {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Business => "20",
            Self::Individual => "10",
        }
    }
}

/// Contextual RUC extractor over concatenated invoice text.
///
/// `extract` runs the labeled pass first and falls back to bare digit runs,
/// preferring businesses over individuals.
pub struct RucExtractor;

impl RucExtractor {
    pub fn new() -> Self {
        Self
    }

    /// All checksum-valid labeled candidates, in text order.
    ///
    /// Positions index into the compacted text (uppercased, no whitespace).
    pub fn labeled(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        let compact = compact_upper(text);

        RUC_LABELED
            .captures_iter(&compact)
            .filter_map(|caps| {
                let ruc = caps.get(1)?;
                let candidate = ruc.as_str();
                let accepted = LABELED_PREFIXES.iter().any(|p| candidate.starts_with(p))
                    && validate_ruc(candidate);
                accepted.then(|| {
                    ExtractionMatch::new(candidate.to_string(), &caps[0])
                        .with_position(ruc.start(), ruc.end())
                })
            })
            .collect()
    }

    /// Standalone 11-digit runs with a known prefix, unvalidated, in text order.
    pub fn unlabeled_candidates(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        DIGIT_RUN
            .find_iter(text)
            .filter(|m| m.as_str().len() == 11)
            .filter(|m| UNLABELED_PREFIXES.iter().any(|p| m.as_str().starts_with(p)))
            .map(|m| ExtractionMatch::new(m.as_str().to_string(), m.as_str()).with_position(m.start(), m.end()))
            .collect()
    }

    /// First checksum-valid standalone run of the given taxpayer kind.
    pub fn unlabeled(&self, text: &str, kind: TaxpayerKind) -> Option<ExtractionMatch<String>> {
        self.unlabeled_candidates(text)
            .into_iter()
            .filter(|m| m.value.starts_with(kind.prefix()))
            .find(|m| validate_ruc(&m.value))
    }
}

impl Default for RucExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for RucExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.labeled(text)
            .into_iter()
            .next()
            .or_else(|| self.unlabeled(text, TaxpayerKind::Business))
            .or_else(|| self.unlabeled(text, TaxpayerKind::Individual))
    }
}

/// First RUC introduced by an explicit "RUC" label.
pub fn extract_labeled_ruc(text: &str) -> Option<String> {
    RucExtractor::new().labeled(text).into_iter().next().map(|m| m.value)
}

/// First valid unlabeled RUC of the given taxpayer kind.
pub fn extract_unlabeled_ruc(text: &str, kind: TaxpayerKind) -> Option<String> {
    RucExtractor::new().unlabeled(text, kind).map(|m| m.value)
}

/// Validate a RUC with the SUNAT modulo-11 check digit.
///
/// Weights 5,4,3,2,7,6,5,4,3,2 over the first ten digits; the check digit
/// is `11 - (sum mod 11)`, with 10 mapped to 0 and 11 mapped to 1.
pub fn validate_ruc(ruc: &str) -> bool {
    if ruc.len() != 11 || !ruc.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = ruc.bytes().map(|b| u32::from(b - b'0')).collect();

    let sum: u32 = digits
        .iter()
        .zip(WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();

    let check = match 11 - sum % 11 {
        10 => 0,
        11 => 1,
        c => c,
    };

    check == digits[10]
}

/// Uppercase and drop every whitespace character.
fn compact_upper(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Check digit computed independently of `validate_ruc`.
    fn reference_check_digit(first_ten: &str) -> u32 {
        let sum: u32 = first_ten
            .chars()
            .zip([5, 4, 3, 2, 7, 6, 5, 4, 3, 2])
            .map(|(c, w)| c.to_digit(10).unwrap() * w)
            .sum();
        let r = 11 - (sum % 11);
        if r == 10 { 0 } else if r == 11 { 1 } else { r }
    }

    #[test]
    fn test_validate_ruc_known_values() {
        assert!(validate_ruc("20100070970"));
        assert!(validate_ruc("20606109343"));
        assert!(validate_ruc("10456789019"));
        assert!(!validate_ruc("20100070971"));
    }

    #[test]
    fn test_validate_ruc_rejects_malformed() {
        assert!(!validate_ruc(""));
        assert!(!validate_ruc("2010007097"));
        assert!(!validate_ruc("201000709700"));
        assert!(!validate_ruc("2010007097O"));
        assert!(!validate_ruc("20-10007097"));
        assert!(!validate_ruc("２0100070970"));
    }

    #[test]
    fn test_validate_ruc_agrees_with_formula() {
        for base in ["2010007097", "2060610934", "1045678901", "1712345678", "0000000000", "9999999999"] {
            let expected = reference_check_digit(base);
            for last in 0..10u32 {
                let candidate = format!("{}{}", base, last);
                assert_eq!(validate_ruc(&candidate), last == expected, "{}", candidate);
            }
        }
    }

    #[test]
    fn test_check_digit_remaps_ten_and_eleven() {
        assert_eq!(reference_check_digit("1000000000"), 6);
        assert!(validate_ruc("10000000006"));
        // sum of 0 -> 11 - 0 = 11 -> 1
        assert!(validate_ruc("00000000001"));
        // 2010007097: sum 89, 89 mod 11 = 1 -> check 10 -> 0
        assert!(validate_ruc("20100070970"));
    }

    #[test]
    fn test_labeled_ruc() {
        assert_eq!(extract_labeled_ruc("RUC20606109343"), Some("20606109343".to_string()));
        assert_eq!(
            extract_labeled_ruc("ruc: 206 0610 9343 boleta"),
            Some("20606109343".to_string())
        );
    }

    #[test]
    fn test_labeled_ruc_rejects_bad_checksum_and_prefix() {
        assert_eq!(extract_labeled_ruc("RUC 20100070971"), None);
        // Valid checksum but prefix 16 is not accepted after a label
        assert_eq!(extract_labeled_ruc("RUC 16123456789"), None);
    }

    #[test]
    fn test_labeled_ruc_first_valid_wins() {
        let text = "RUC 20100070971 CLIENTE RUC 20606109343";
        assert_eq!(extract_labeled_ruc(text), Some("20606109343".to_string()));
    }

    #[test]
    fn test_unlabeled_prefers_business() {
        let text = "CLIENTE 10456789019 EMISOR 20100070970";
        let extractor = RucExtractor::new();
        assert_eq!(
            extractor.extract(text).map(|m| m.value),
            Some("20100070970".to_string())
        );
        assert_eq!(
            extract_unlabeled_ruc(text, TaxpayerKind::Individual),
            Some("10456789019".to_string())
        );
    }

    #[test]
    fn test_unlabeled_falls_back_to_individual() {
        let text = "EMISOR 20100070971 CLIENTE 10456789019";
        assert_eq!(
            RucExtractor::new().extract(text).map(|m| m.value),
            Some("10456789019".to_string())
        );
    }

    #[test]
    fn test_unlabeled_ignores_longer_runs() {
        assert_eq!(extract_unlabeled_ruc("9920100070970", TaxpayerKind::Business), None);
        assert_eq!(extract_unlabeled_ruc("201000709701", TaxpayerKind::Business), None);
        assert_eq!(
            extract_unlabeled_ruc("NRO:20100070970/A", TaxpayerKind::Business),
            Some("20100070970".to_string())
        );
    }

    #[test]
    fn test_unlabeled_candidates_include_other_prefixes() {
        let candidates = RucExtractor::new().unlabeled_candidates("15123456782 16123456789 30123456789");
        let values: Vec<_> = candidates.into_iter().map(|m| m.value).collect();
        assert_eq!(values, vec!["15123456782", "16123456789"]);
        // Neither is a business or individual RUC
        assert_eq!(RucExtractor::new().extract("15123456782 16123456789"), None);
    }

    #[test]
    fn test_labeled_accepts_special_prefixes() {
        assert_eq!(extract_labeled_ruc("RUC 15123456782"), Some("15123456782".to_string()));
        assert_eq!(extract_labeled_ruc("RUC N° 17123456785"), Some("17123456785".to_string()));
    }

    #[test]
    fn test_labeled_ignores_non_ascii_digits() {
        assert_eq!(
            extract_labeled_ruc("RUC \u{0661}\u{0662}\u{0663} 20100070970"),
            Some("20100070970".to_string())
        );
        assert_eq!(
            RucExtractor::new().unlabeled_candidates("\u{0661}20100070970\u{0662}").len(),
            1
        );
    }

    #[test]
    fn test_labeled_position_is_in_compacted_text() {
        let found = RucExtractor::new().labeled("ruc : 20606109343");
        assert_eq!(found[0].position, Some((4, 15)));
    }
}

//! Amount extraction and total location for Peruvian invoices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::AMOUNT_PATTERN;

/// Money amount extractor (`1,500.50`, `120.00`).
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Pattern matches whose surroundings make them standalone amounts.
    fn candidates<'t>(&self, text: &'t str) -> impl Iterator<Item = regex::Match<'t>> + 't {
        let bytes = text.as_bytes();
        AMOUNT_PATTERN.find_iter(text).filter(move |m| {
            let followed_by_digit = bytes.get(m.end()).is_some_and(u8::is_ascii_digit);
            !followed_by_digit && !continues_number(&bytes[..m.start()])
        })
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    /// First amount on the text; an unparsable first match counts as a miss.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let m = self.candidates(text).next()?;
        let amount = parse_amount(m.as_str())?;
        Some(ExtractionMatch::new(amount, m.as_str()).with_position(m.start(), m.end()))
    }
}

/// Whether the text right before a match belongs to the same number:
/// a digit, or a comma/dot that itself follows a digit.
fn continues_number(before: &[u8]) -> bool {
    match before {
        [.., b] if b.is_ascii_digit() => true,
        [.., d, b',' | b'.'] => d.is_ascii_digit(),
        _ => false,
    }
}

/// Extract the first money amount from a line.
pub fn extract_amount(text: &str) -> Option<Decimal> {
    AmountExtractor::new().extract(text).map(|m| m.value)
}

/// Parse an amount such as "1,234.56", dropping grouping commas.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    Decimal::from_str(&cleaned).ok()
}

/// Which keyword family located the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalTier {
    /// A "TOTAL" line that is not a subtotal.
    Total,
    /// An "IMPORTE" or "A PAGAR" line.
    AmountDue,
}

impl TotalTier {
    fn matches(&self, upper: &str) -> bool {
        match self {
            Self::Total => upper.contains("TOTAL") && !upper.contains("SUB"),
            Self::AmountDue => upper.contains("IMPORTE") || upper.contains("A PAGAR"),
        }
    }
}

/// Where the total amount was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalSource {
    /// Index of the keyword line.
    pub keyword_line: usize,
    /// Index of the line the amount was read from (keyword line or the next one).
    pub amount_line: usize,
    /// Keyword family that matched.
    pub tier: TotalTier,
}

/// Keyword-anchored total finder over ordered OCR lines.
///
/// Totals are printed either inline ("TOTAL S/ 45.00") or as a label with
/// the value on the following line, so each keyword line is tried first and
/// its successor second.
pub struct TotalLocator {
    tiers: Vec<TotalTier>,
}

impl TotalLocator {
    pub fn new() -> Self {
        Self {
            tiers: vec![TotalTier::Total, TotalTier::AmountDue],
        }
    }

    /// Locate the total. Later tiers are consulted only when earlier ones
    /// find nothing on any of their keyword lines.
    pub fn locate<S: AsRef<str>>(&self, lines: &[S]) -> Option<(Decimal, TotalSource)> {
        let upper: Vec<String> = lines.iter().map(|l| l.as_ref().to_uppercase()).collect();

        for tier in &self.tiers {
            for (index, line) in upper.iter().enumerate() {
                if !tier.matches(line) {
                    continue;
                }

                let found = extract_amount(line)
                    .map(|amount| (amount, index))
                    .or_else(|| {
                        let next = upper.get(index + 1)?;
                        extract_amount(next).map(|amount| (amount, index + 1))
                    });

                if let Some((amount, amount_line)) = found {
                    debug!(
                        "Total {} found on line {} via {:?} keyword on line {}",
                        amount, amount_line, tier, index
                    );
                    let source = TotalSource {
                        keyword_line: index,
                        amount_line,
                        tier: *tier,
                    };
                    return Some((amount.max(Decimal::ZERO), source));
                }
            }
        }

        None
    }
}

impl Default for TotalLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_extract_amount() {
        assert_eq!(extract_amount("Total S/ 1,234.56 soles"), Some(dec("1234.56")));
        assert_eq!(extract_amount("120.00"), Some(dec("120.00")));
        assert_eq!(extract_amount("1,500.50"), Some(dec("1500.50")));
        assert_eq!(extract_amount("12,345,678.90"), Some(dec("12345678.90")));
    }

    #[test]
    fn test_extract_amount_requires_two_decimals() {
        assert_eq!(extract_amount("12.5"), None);
        assert_eq!(extract_amount("100.000"), None);
        assert_eq!(extract_amount("12"), None);
        assert_eq!(extract_amount("TOTAL"), None);
    }

    #[test]
    fn test_extract_amount_malformed_grouping() {
        assert_eq!(extract_amount("1,23.45"), None);
        assert_eq!(extract_amount("1.234.56"), None);
    }

    #[test]
    fn test_extract_amount_currency_prefixes() {
        assert_eq!(extract_amount("S/.45.00"), Some(dec("45.00")));
        assert_eq!(extract_amount("TOTAL:S/45.00SOLES"), Some(dec("45.00")));
        assert_eq!(extract_amount("US$ 19.90"), Some(dec("19.90")));
    }

    #[test]
    fn test_first_amount_wins() {
        assert_eq!(extract_amount("OP. GRAVADA 42.37 IGV 7.63"), Some(dec("42.37")));
        let first = AmountExtractor::new().extract("OP. GRAVADA 42.37 IGV 7.63").unwrap();
        assert_eq!(first.position, Some((12, 17)));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount(" 45.00 "), Some(dec("45.00")));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_unparsable_amount_is_a_miss() {
        let huge = "TOTAL 99999999999999999999999999999999.00";
        assert_eq!(extract_amount(huge), None);

        let (amount, source) = TotalLocator::new().locate(&[huge, "45.00"]).unwrap();
        assert_eq!(amount, dec("45.00"));
        assert_eq!(source.keyword_line, 0);
        assert_eq!(source.amount_line, 1);
    }

    #[test]
    fn test_total_on_next_line_skips_subtotal() {
        let lines = ["TIENDA", "SUBTOTAL 100.00", "TOTAL", "120.00", "GRACIAS"];
        let (amount, source) = TotalLocator::new().locate(&lines).unwrap();
        assert_eq!(amount, dec("120.00"));
        assert_eq!(source, TotalSource {
            keyword_line: 2,
            amount_line: 3,
            tier: TotalTier::Total,
        });
    }

    #[test]
    fn test_total_inline_preferred_over_next_line() {
        let lines = ["total s/ 45.00", "99.99"];
        let (amount, source) = TotalLocator::new().locate(&lines).unwrap();
        assert_eq!(amount, dec("45.00"));
        assert_eq!(source.amount_line, 0);
    }

    #[test]
    fn test_total_scan_continues_after_empty_keyword_line() {
        let lines = ["TOTAL ITEMS: 3", "EFECTIVO", "IMPORTE TOTAL 88.10"];
        let (amount, source) = TotalLocator::new().locate(&lines).unwrap();
        assert_eq!(amount, dec("88.10"));
        assert_eq!(source.keyword_line, 2);
        assert_eq!(source.tier, TotalTier::Total);
    }

    #[test]
    fn test_amount_due_tier() {
        let lines = ["SUBTOTAL 10.00", "IMPORTE A PAGAR", "S/ 11.80"];
        let (amount, source) = TotalLocator::new().locate(&lines).unwrap();
        assert_eq!(amount, dec("11.80"));
        assert_eq!(source.tier, TotalTier::AmountDue);
    }

    #[test]
    fn test_total_tier_beats_earlier_amount_due() {
        let lines = ["A PAGAR 5.00", "TOTAL 7.00"];
        let (amount, _) = TotalLocator::new().locate(&lines).unwrap();
        assert_eq!(amount, dec("7.00"));
    }

    #[test]
    fn test_no_total() {
        assert_eq!(TotalLocator::new().locate(&["SUBTOTAL 10.00", "IGV 1.80"]), None);
        assert_eq!(TotalLocator::new().locate(&["TOTAL"]), None);
        assert_eq!(TotalLocator::new().locate::<&str>(&[]), None);
    }
}

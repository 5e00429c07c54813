//! Currency detection.

use crate::models::invoice::Currency;

/// Detect the invoice currency from its text.
///
/// "SOLES" wins over "USD"; with neither marker the currency is PEN. A bare
/// "$" is not treated as a dollar marker.
pub fn detect_currency(text: &str) -> Currency {
    let upper = text.to_uppercase();

    if upper.contains("SOLES") {
        Currency::Pen
    } else if upper.contains("USD") {
        Currency::Usd
    } else {
        Currency::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_currency() {
        assert_eq!(detect_currency("TOTAL 50.00 SOLES"), Currency::Pen);
        assert_eq!(detect_currency("total usd 19.90"), Currency::Usd);
        assert_eq!(detect_currency("CIENTO VEINTE Y 00/100 SOLES / USD"), Currency::Pen);
        assert_eq!(detect_currency("TOTAL 50.00"), Currency::Pen);
    }

    #[test]
    fn test_dollar_sign_alone_is_default() {
        assert_eq!(detect_currency("TOTAL $ 19.90"), Currency::Pen);
    }
}

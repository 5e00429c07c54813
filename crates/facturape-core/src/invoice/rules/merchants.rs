//! Known-merchant directory and header-zone merchant resolution.

use std::collections::HashSet;

use lazy_static::lazy_static;
use tracing::debug;

use super::ruc::validate_ruc;
use super::similarity::similarity;
use crate::error::ExtractionError;

/// Merchants recognized out of the box, in resolution order.
const SEED_MERCHANTS: [(&str, &str); 6] = [
    ("DOLLARCITY", "20606109343"),
    ("PLAZA VEA", "20100070970"),
    ("SAGA FALABELLA", "20100128056"),
    ("SODIMAC", "20112273922"),
    ("CENCOSUD", "20109072177"),
    ("INKAFARMA", "20331061655"),
];

lazy_static! {
    static ref SEED_DIRECTORY: MerchantDirectory =
        MerchantDirectory::new(SEED_MERCHANTS).unwrap();
}

/// A merchant with its registered RUC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merchant {
    /// Canonical name, uppercase.
    pub name: String,
    /// Checksum-valid RUC.
    pub ruc: String,
}

/// Immutable, ordered set of trusted merchants.
///
/// Every RUC is checksum-validated when the directory is built, so matches
/// are returned without re-validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantDirectory {
    entries: Vec<Merchant>,
}

impl MerchantDirectory {
    /// Build a directory from `(name, ruc)` pairs, keeping their order.
    ///
    /// Names are trimmed and uppercased. Fails on an empty name, a RUC that
    /// does not pass the checksum, or a repeated name.
    pub fn new<I, N, R>(entries: I) -> Result<Self, ExtractionError>
    where
        I: IntoIterator<Item = (N, R)>,
        N: AsRef<str>,
        R: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut merchants = Vec::new();

        for (name, ruc) in entries {
            let name = name.as_ref().trim().to_uppercase();
            let ruc = ruc.as_ref().trim().to_string();

            if name.is_empty() || !validate_ruc(&ruc) {
                return Err(ExtractionError::InvalidMerchant { name, ruc });
            }
            if !seen.insert(name.clone()) {
                return Err(ExtractionError::DuplicateMerchant(name));
            }

            merchants.push(Merchant { name, ruc });
        }

        Ok(Self { entries: merchants })
    }

    /// The built-in seed directory.
    pub fn seed() -> Self {
        SEED_DIRECTORY.clone()
    }

    /// A directory that never matches.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Entries in resolution order.
    pub fn entries(&self) -> &[Merchant] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the first merchant named in the given header lines.
    ///
    /// Lines are scanned in order and, for each line, entries in directory
    /// order. An entry matches when the uppercased line contains its name or
    /// their similarity exceeds `threshold`.
    pub fn resolve<S: AsRef<str>>(&self, header: &[S], threshold: f64) -> Option<&Merchant> {
        for line in header {
            let line = line.as_ref().to_uppercase();

            for merchant in &self.entries {
                if line.contains(&merchant.name) || similarity(&line, &merchant.name) > threshold {
                    debug!("Header line {:?} matched merchant {}", line, merchant.name);
                    return Some(merchant);
                }
            }
        }

        None
    }
}

impl Default for MerchantDirectory {
    fn default() -> Self {
        Self::seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_directory_is_valid() {
        let directory = MerchantDirectory::seed();
        assert_eq!(directory.len(), SEED_MERCHANTS.len());
        assert!(directory.entries().iter().all(|m| validate_ruc(&m.ruc)));
    }

    #[test]
    fn test_exact_header_line() {
        let directory = MerchantDirectory::seed();
        let merchant = directory.resolve(&["DOLLARCITY"], 0.6).unwrap();
        assert_eq!(merchant.ruc, "20606109343");
    }

    #[test]
    fn test_corrupted_header_line() {
        let directory = MerchantDirectory::seed();
        let merchant = directory.resolve(&["D0LLARC1TY"], 0.6).unwrap();
        assert_eq!(merchant.ruc, "20606109343");
    }

    #[test]
    fn test_contained_name_and_lowercase_line() {
        let directory = MerchantDirectory::seed();
        let merchant = directory
            .resolve(&["Boleta electronica", "tienda plaza vea san miguel"], 0.6)
            .unwrap();
        assert_eq!(merchant.name, "PLAZA VEA");
    }

    #[test]
    fn test_no_merchant_like_text() {
        let directory = MerchantDirectory::seed();
        let header = ["BOLETA DE VENTA ELECTRONICA", "AV. JAVIER PRADO 123", "TOTAL", "SOLES"];
        assert_eq!(directory.resolve(&header, 0.6), None);
    }

    #[test]
    fn test_line_major_order() {
        let directory = MerchantDirectory::new([("ALPHA", "20100070970"), ("BETA", "20606109343")]).unwrap();
        // BETA appears on an earlier line than ALPHA
        let merchant = directory.resolve(&["BETA STORE", "ALPHA STORE"], 0.6).unwrap();
        assert_eq!(merchant.name, "BETA");
    }

    #[test]
    fn test_entry_order_breaks_ties() {
        let directory = MerchantDirectory::new([("ALPHA", "20100070970"), ("BETA", "20606109343")]).unwrap();
        let merchant = directory.resolve(&["ALPHA BETA"], 0.6).unwrap();
        assert_eq!(merchant.name, "ALPHA");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let directory = MerchantDirectory::new([("ABCDE", "20100070970")]).unwrap();
        // similarity("XBCDF", "ABCDE") == 0.6
        assert_eq!(directory.resolve(&["XBCDF"], 0.6), None);
        assert!(directory.resolve(&["XBCDF"], 0.5).is_some());
    }

    #[test]
    fn test_rejects_invalid_entries() {
        assert!(matches!(
            MerchantDirectory::new([("SHOP", "20100070971")]),
            Err(ExtractionError::InvalidMerchant { .. })
        ));
        assert!(matches!(
            MerchantDirectory::new([("  ", "20100070970")]),
            Err(ExtractionError::InvalidMerchant { .. })
        ));
        assert!(matches!(
            MerchantDirectory::new([("shop", "20100070970"), ("SHOP ", "20606109343")]),
            Err(ExtractionError::DuplicateMerchant(_))
        ));
    }

    #[test]
    fn test_empty_directory_never_matches() {
        assert_eq!(MerchantDirectory::empty().resolve(&["DOLLARCITY"], 0.0), None);
    }
}

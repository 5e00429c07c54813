//! Common regex patterns for Peruvian invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

// `[0-9]` rather than `\d`: the latter also matches non-ASCII digits.
lazy_static! {
    // RUC label followed, anywhere later, by an 11-digit run.
    // Applied to uppercased text with all whitespace removed.
    pub static ref RUC_LABELED: Regex = Regex::new(
        r"RUC.*?([0-9]{11})"
    ).unwrap();

    // Maximal digit runs; length and prefix are checked by the caller so
    // runs longer than 11 digits are never split.
    pub static ref DIGIT_RUN: Regex = Regex::new(
        r"[0-9]+"
    ).unwrap();

    // Money token: comma-grouped or plain integer part, dot, two decimals.
    // Boundaries are checked by the caller (the regex crate has no lookaround).
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)\.([0-9]{2})"
    ).unwrap();

    // DD-MM-YYYY / DD/MM/YYYY or YYYY-MM-DD / YYYY/MM/DD
    pub static ref DATE_PATTERN: Regex = Regex::new(
        r"[0-9]{2}[-/][0-9]{2}[-/][0-9]{4}|[0-9]{4}[-/][0-9]{2}[-/][0-9]{2}"
    ).unwrap();
}

//! Common regex patterns for receipt text extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Decimal amount token (1,234.56 style, cents required)
    pub static ref AMOUNT: Regex = Regex::new(
        r"\d{1,3}(?:,\d{3})*\.\d{2}"
    ).unwrap();

    // Amount anchored at end of line, optionally $-prefixed
    pub static ref TRAILING_AMOUNT: Regex = Regex::new(
        r"\$?(\d{1,3}(?:,\d{3})*\.\d{2})\s*$"
    ).unwrap();

    // Integer quantity at line start
    pub static ref LEADING_QTY: Regex = Regex::new(
        r"^\s*(\d+)\s+"
    ).unwrap();

    // "2 @ $5.99" at-sign notation
    pub static ref AT_NOTATION: Regex = Regex::new(
        r"(\d+)\s*@\s*\$?(\d{1,3}(?:,\d{3})*\.\d{2})"
    ).unwrap();

    // "4x Burger 23.96" / "4 x Burger 23.96" multiplier notation
    pub static ref X_NOTATION: Regex = Regex::new(
        r"^\s*(\d+)\s*[xX]\s+(.+?)\s+\$?(\d{1,3}(?:,\d{3})*\.\d{2})\s*$"
    ).unwrap();

    // "Burger...........$5.99" leader-dot/tabular lines
    pub static ref LEADER_FILL: Regex = Regex::new(
        r"^(.+?)[.\-\s]{3,}\$?(\d{1,3}(?:,\d{3})*\.\d{2})\s*$"
    ).unwrap();

    // Leading "N " or "N x " quantity prefix inside a name portion
    pub static ref QTY_NAME_PREFIX: Regex = Regex::new(
        r"^(\d+)\s*[xX]?\s+(.+)"
    ).unwrap();

    // Leading bare digits (stripped from at-notation names)
    pub static ref LEADING_DIGITS: Regex = Regex::new(
        r"^\d+\s*"
    ).unwrap();

    // A run of letters; item names must contain at least one
    pub static ref LETTER_RUN: Regex = Regex::new(
        r"[A-Za-z]{2,}"
    ).unwrap();

    // Two-or-more-digit amount that marks a total line
    pub static ref TOTAL_MARKER_AMOUNT: Regex = Regex::new(
        r"\d{2,}\.\d{2}"
    ).unwrap();

    // Date patterns, one per supported format
    pub static ref DATE_ISO: Regex = Regex::new(
        r"(\d{4}-\d{2}-\d{2})"
    ).unwrap();

    pub static ref DATE_US_SLASH: Regex = Regex::new(
        r"(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref DATE_US_DASH: Regex = Regex::new(
        r"(\d{2}-\d{2}-\d{4})"
    ).unwrap();

    pub static ref DATE_SHORT_YEAR: Regex = Regex::new(
        r"(\d{1,2}/\d{1,2}/\d{2})"
    ).unwrap();

    pub static ref DATE_EU_DOT: Regex = Regex::new(
        r"(\d{2}\.\d{2}\.\d{4})"
    ).unwrap();

    pub static ref DATE_DAY_MONTH_NAME: Regex = Regex::new(
        r"(\d{1,2}\s+[A-Za-z]{3}\s+\d{4})"
    ).unwrap();
}

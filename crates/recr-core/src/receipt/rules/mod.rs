//! Rule-based extractors for receipt text.

pub mod category;
pub mod dates;
pub mod items;
pub mod merchant;
pub mod patterns;
pub mod policy;
pub mod totals;

use std::str::FromStr;

use rust_decimal::Decimal;

pub use category::Categorizer;
pub use dates::DateExtractor;
pub use items::{ItemCandidate, ItemCascade, LineMatcher};
pub use merchant::MerchantMatcher;
pub use policy::PolicyResolver;
pub use totals::{extract_totals, reconcile, RawTotals};

use patterns::{AMOUNT, LETTER_RUN};

/// Parse a decimal amount token, tolerating thousands separators.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', "")).ok()
}

/// All decimal amounts on a line, left to right.
pub fn amounts_on_line(line: &str) -> Vec<Decimal> {
    AMOUNT
        .find_iter(line)
        .filter_map(|m| parse_amount(m.as_str()))
        .collect()
}

/// The last decimal amount on a line, if any.
pub fn last_amount(line: &str) -> Option<Decimal> {
    AMOUNT
        .find_iter(line)
        .last()
        .and_then(|m| parse_amount(m.as_str()))
}

/// Collapse whitespace and strip currency symbols from a raw item name.
pub fn normalize_name(raw: &str) -> String {
    raw.replace('$', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// An item name must be at least 2 characters and contain a run of letters.
pub fn valid_item_name(name: &str) -> bool {
    name.chars().count() >= 2 && LETTER_RUN.is_match(name)
}

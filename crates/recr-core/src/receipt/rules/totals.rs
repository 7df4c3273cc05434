//! Financial totals extraction and reconciliation.

use rust_decimal::Decimal;

use crate::models::receipt::{FinancialTotals, LineItem};

use super::last_amount;

const SUBTOTAL_WORDS: [&str; 3] = ["subtotal", "sub-total", "sub total"];

const TAX_WORDS: [&str; 6] = ["tax", "gst", "pst", "hst", "qst", "vat"];

/// Words that disqualify a line from being a tax line ("total tax" style
/// ambiguity).
const TAX_EXCLUDE_WORDS: [&str; 3] = ["total", "subtotal", "amount"];

/// High-priority total phrasings, matched before a bare leading "total".
const TOTAL_PRIORITY_WORDS: [&str; 5] = [
    "total to pay",
    "grand total",
    "total amount",
    "amount due",
    "balance due",
];

/// Subtotal/tax/total candidates as found in the text, before any derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTotals {
    pub subtotal: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
}

/// Scan every line for labeled financial values. A line may contribute here
/// and to the item cascade independently; for each field the first line that
/// carries an amount wins.
pub fn extract_totals(text: &str) -> RawTotals {
    let mut raw = RawTotals::default();

    for line in text.lines() {
        let lower = line.to_lowercase();

        if raw.subtotal.is_none() && SUBTOTAL_WORDS.iter().any(|w| lower.contains(w)) {
            if let Some(amount) = last_amount(line) {
                raw.subtotal = Some(amount);
            }
        }

        if raw.tax.is_none()
            && TAX_WORDS.iter().any(|w| lower.contains(w))
            && !TAX_EXCLUDE_WORDS.iter().any(|w| lower.contains(w))
        {
            if let Some(amount) = last_amount(line) {
                raw.tax = Some(amount);
            }
        }
    }

    raw.total = extract_total(text);
    raw
}

/// Prioritized total search: explicit phrasings like "grand total" anywhere
/// beat the first line that merely starts with "total".
fn extract_total(text: &str) -> Option<Decimal> {
    for line in text.lines() {
        let lower = line.to_lowercase();
        if TOTAL_PRIORITY_WORDS.iter().any(|w| lower.contains(w)) {
            if let Some(amount) = last_amount(line) {
                return Some(amount);
            }
        }
    }

    for line in text.lines() {
        let lower = line.to_lowercase();
        if lower.trim_start().starts_with("total") && !lower.contains("subtotal") {
            if let Some(amount) = last_amount(line) {
                return Some(amount);
            }
        }
    }

    None
}

/// Fill in missing financial values from the ones that were found, assuming
/// the configured flat tax rate as a last resort. Every derived value is
/// rounded to 2 decimal places at the step that produces it.
pub fn reconcile(raw: &RawTotals, items: &[LineItem], tax_rate: Decimal) -> FinancialTotals {
    let mut subtotal = raw.subtotal;
    let mut tax = raw.tax;
    let mut total = raw.total;

    match (total, subtotal) {
        (Some(t), None) => match tax {
            Some(x) => subtotal = Some((t - x).round_dp(2)),
            None => {
                let s = (t / (Decimal::ONE + tax_rate)).round_dp(2);
                subtotal = Some(s);
                tax = Some((t - s).round_dp(2));
            }
        },
        (None, Some(s)) => match tax {
            Some(x) => total = Some((s + x).round_dp(2)),
            None => {
                let x = (s * tax_rate).round_dp(2);
                tax = Some(x);
                total = Some((s + x).round_dp(2));
            }
        },
        _ => {}
    }

    if total.is_none() && !items.is_empty() {
        let t: Decimal = items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        let s = (t / (Decimal::ONE + tax_rate)).round_dp(2);
        subtotal = Some(s);
        tax = Some((t - s).round_dp(2));
        total = Some(t);
    }

    FinancialTotals {
        subtotal: subtotal.unwrap_or_default(),
        tax: tax.unwrap_or_default(),
        total: total.unwrap_or_default(),
    }
}

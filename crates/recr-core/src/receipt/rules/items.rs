//! Line-item extraction cascade.
//!
//! Each surviving line of the receipt is run through an ordered sequence of
//! structural matchers; the first one that yields a validated candidate wins
//! and the rest are skipped. A matcher either produces a candidate or signals
//! "no match" - malformed input is indistinguishable from "does not match
//! this pattern", which is what keeps the overall parse total.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::ParserConfig;

use super::patterns::{
    AMOUNT, AT_NOTATION, LEADER_FILL, LEADING_DIGITS, LEADING_QTY, QTY_NAME_PREFIX,
    TOTAL_MARKER_AMOUNT, TRAILING_AMOUNT, X_NOTATION,
};
use super::{normalize_name, parse_amount, valid_item_name};

/// Characters counted as OCR garble; lines with more than
/// [`MAX_NOISE_CHARS`] of them are discarded before matching.
const NOISE_CHARS: &str = "—=*~@#$%^&()[]{}|\\<>";

const MAX_NOISE_CHARS: usize = 3;

/// Item names are truncated to this many characters.
const MAX_NAME_CHARS: usize = 50;

/// A line item recovered from one text line, before categorization.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCandidate {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl ItemCandidate {
    fn new(name: String, quantity: u32, price: Decimal) -> Self {
        Self {
            name: name.chars().take(MAX_NAME_CHARS).collect(),
            quantity,
            price,
        }
    }
}

/// A structural pattern tried against a single receipt line.
pub trait LineMatcher {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Attempt to recover an item from the line.
    fn attempt(&self, line: &str) -> Option<ItemCandidate>;
}

/// Pattern 1: quantity-prefixed line with unit price and line total as the
/// last two amounts, e.g. `"4 Cheese Burger 5.99 23.96"`.
///
/// Accepted only when `quantity x unit_price` lands within 1.00 of the line
/// total; OCR rounding noise passes, misreads fall through to the next
/// matcher.
pub struct QtyUnitTotalMatcher;

impl LineMatcher for QtyUnitTotalMatcher {
    fn name(&self) -> &'static str {
        "qty-unit-total"
    }

    fn attempt(&self, line: &str) -> Option<ItemCandidate> {
        let amounts: Vec<_> = AMOUNT.find_iter(line).collect();
        if amounts.len() < 2 {
            return None;
        }

        let qty_caps = LEADING_QTY.captures(line)?;
        let quantity: u32 = qty_caps[1].parse().ok().filter(|&q| q >= 1)?;

        let qty_end = qty_caps.get(0).unwrap().end();
        let first_amount_start = amounts[0].start();
        if first_amount_start < qty_end {
            return None;
        }

        let name = normalize_name(&line[qty_end..first_amount_start]);
        if !valid_item_name(&name) {
            return None;
        }

        let unit_price = parse_amount(amounts[amounts.len() - 2].as_str())?;
        let line_total = parse_amount(amounts[amounts.len() - 1].as_str())?;

        let expected = Decimal::from(quantity) * unit_price;
        if (expected - line_total).abs() >= Decimal::ONE {
            return None;
        }

        Some(ItemCandidate::new(name, quantity, line_total))
    }
}

/// Pattern 2: at-sign notation, e.g. `"Bagel 2 @ 1.50 = 3.00"`.
///
/// A trailing amount on the line is taken as the line total; without one the
/// total is `quantity x unit_price`.
pub struct AtNotationMatcher;

impl LineMatcher for AtNotationMatcher {
    fn name(&self) -> &'static str {
        "at-notation"
    }

    fn attempt(&self, line: &str) -> Option<ItemCandidate> {
        let caps = AT_NOTATION.captures(line)?;
        let quantity: u32 = caps[1].parse().ok().filter(|&q| q >= 1)?;
        let unit_price = parse_amount(&caps[2])?;

        let line_total = TRAILING_AMOUNT
            .captures(line)
            .and_then(|t| parse_amount(&t[1]))
            .unwrap_or(Decimal::from(quantity) * unit_price);

        let head = &line[..caps.get(0).unwrap().start()];
        let name = normalize_name(&LEADING_DIGITS.replace(head.trim(), ""));
        if !valid_item_name(&name) {
            return None;
        }

        Some(ItemCandidate::new(name, quantity, line_total))
    }
}

/// Pattern 3: multiplier notation anchored at line start, e.g.
/// `"4x Burger 23.96"`.
pub struct MultiplierMatcher;

impl LineMatcher for MultiplierMatcher {
    fn name(&self) -> &'static str {
        "multiplier"
    }

    fn attempt(&self, line: &str) -> Option<ItemCandidate> {
        let caps = X_NOTATION.captures(line)?;
        let quantity: u32 = caps[1].parse().ok().filter(|&q| q >= 1)?;
        let name = normalize_name(&caps[2]);
        if !valid_item_name(&name) {
            return None;
        }
        let line_total = parse_amount(&caps[3])?;

        Some(ItemCandidate::new(name, quantity, line_total))
    }
}

/// Pattern 4: tabular leader-dot receipts, e.g. `"Burger.........$5.99"`.
/// A leading `"N "` or `"N x "` prefix in the name portion re-parses as the
/// quantity.
pub struct LeaderFillMatcher;

impl LineMatcher for LeaderFillMatcher {
    fn name(&self) -> &'static str {
        "leader-fill"
    }

    fn attempt(&self, line: &str) -> Option<ItemCandidate> {
        let caps = LEADER_FILL.captures(line)?;
        let raw_name = caps[1].trim();
        let price = parse_amount(&caps[2])?;

        let (quantity, name_part) = split_quantity_prefix(raw_name);
        let name = normalize_name(name_part);
        if !valid_item_name(&name) {
            return None;
        }

        Some(ItemCandidate::new(name, quantity, price))
    }
}

/// Pattern 5: fallback for any line ending in a plausible price, e.g.
/// `"Cheese Burger 5.99"`.
pub struct TrailingPriceMatcher {
    min_price: Decimal,
    max_price: Decimal,
}

impl TrailingPriceMatcher {
    pub fn new(min_price: Decimal, max_price: Decimal) -> Self {
        Self {
            min_price,
            max_price,
        }
    }
}

impl LineMatcher for TrailingPriceMatcher {
    fn name(&self) -> &'static str {
        "trailing-price"
    }

    fn attempt(&self, line: &str) -> Option<ItemCandidate> {
        let caps = TRAILING_AMOUNT.captures(line)?;
        let price = parse_amount(&caps[1])?;
        if price < self.min_price || price > self.max_price {
            return None;
        }

        let head = line[..caps.get(0).unwrap().start()].trim();
        let (quantity, name_part) = split_quantity_prefix(head);
        let name = normalize_name(name_part);
        if !valid_item_name(&name) {
            return None;
        }

        Some(ItemCandidate::new(name, quantity, price))
    }
}

/// Re-parse a leading `"N "` / `"N x "` prefix as a quantity. A prefix that
/// is absent, zero, or does not fit a `u32` leaves the name untouched with
/// quantity 1.
fn split_quantity_prefix(raw: &str) -> (u32, &str) {
    if let Some(caps) = QTY_NAME_PREFIX.captures(raw) {
        if let Ok(quantity) = caps[1].parse::<u32>() {
            if quantity >= 1 {
                let rest = caps.get(2).unwrap();
                return (quantity, &raw[rest.start()..rest.end()]);
            }
        }
    }
    (1, raw)
}

/// The ordered cascade plus the per-line filters that run before it.
pub struct ItemCascade {
    matchers: Vec<Box<dyn LineMatcher + Send + Sync>>,
    stop_words: Vec<String>,
    max_items: usize,
}

impl ItemCascade {
    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            matchers: vec![
                Box::new(QtyUnitTotalMatcher),
                Box::new(AtNotationMatcher),
                Box::new(MultiplierMatcher),
                Box::new(LeaderFillMatcher),
                Box::new(TrailingPriceMatcher::new(
                    config.min_item_price,
                    config.max_item_price,
                )),
            ],
            stop_words: config.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            max_items: config.max_items,
        }
    }

    /// Run every line of the text through the filters and the cascade.
    /// At most `max_items` candidates are kept, earliest lines first.
    pub fn extract(&self, text: &str) -> Vec<ItemCandidate> {
        let mut items = Vec::new();
        let mut seen_total = false;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.chars().count() < 3 {
                continue;
            }

            let lower = line.to_lowercase();

            // A total line ends the itemized section; trailing promotional
            // text must never become an item.
            if lower.contains("total")
                && (lower.contains("pay")
                    || lower.contains("grand")
                    || TOTAL_MARKER_AMOUNT.is_match(line))
            {
                seen_total = true;
                continue;
            }
            if seen_total {
                continue;
            }

            if self.stop_words.iter().any(|w| lower.contains(w.as_str())) {
                continue;
            }

            let noise = line.chars().filter(|c| NOISE_CHARS.contains(*c)).count();
            if noise > MAX_NOISE_CHARS {
                continue;
            }

            for matcher in &self.matchers {
                if let Some(item) = matcher.attempt(line) {
                    debug!(matcher = matcher.name(), line = trimmed, "line matched");
                    items.push(item);
                    break;
                }
            }
        }

        items.truncate(self.max_items);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn cascade() -> ItemCascade {
        ItemCascade::from_config(&ParserConfig::default())
    }

    #[test]
    fn test_qty_unit_total_match() {
        let item = QtyUnitTotalMatcher.attempt("2 Burger 5.99 11.98").unwrap();

        assert_eq!(item.name, "Burger");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, dec(1198));
    }

    #[test]
    fn test_qty_unit_total_tolerates_rounding_noise() {
        // 3 x 2.33 = 6.99, printed total 7.00
        let item = QtyUnitTotalMatcher.attempt("3 Donut 2.33 7.00").unwrap();

        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, dec(700));
    }

    #[test]
    fn test_qty_unit_total_rejects_inconsistent_math() {
        assert!(QtyUnitTotalMatcher.attempt("2 Burger 5.99 20.00").is_none());
    }

    #[test]
    fn test_qty_unit_total_requires_quantity_prefix() {
        assert!(QtyUnitTotalMatcher.attempt("Burger 5.99 11.98").is_none());
    }

    #[test]
    fn test_at_notation_with_explicit_total() {
        let item = AtNotationMatcher.attempt("Bagel 2 @ 1.50 = 3.00").unwrap();

        assert_eq!(item.name, "Bagel");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, dec(300));
    }

    #[test]
    fn test_at_notation_computes_missing_total() {
        // No trailing amount after the unit price - total is qty x unit.
        let item = AtNotationMatcher.attempt("Bagel 2 @ 1.50 ea").unwrap();

        assert_eq!(item.price, dec(300));
    }

    #[test]
    fn test_at_notation_requires_name() {
        assert!(AtNotationMatcher.attempt("2 @ 1.50").is_none());
    }

    #[test]
    fn test_multiplier_notation() {
        let item = MultiplierMatcher.attempt("4x Burger 23.96").unwrap();

        assert_eq!(item.name, "Burger");
        assert_eq!(item.quantity, 4);
        assert_eq!(item.price, dec(2396));

        let spaced = MultiplierMatcher.attempt("4 x Burger 23.96").unwrap();
        assert_eq!(spaced.quantity, 4);
    }

    #[test]
    fn test_leader_fill() {
        let item = LeaderFillMatcher.attempt("Burger...........5.99").unwrap();

        assert_eq!(item.name, "Burger");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, dec(599));
    }

    #[test]
    fn test_leader_fill_with_quantity_prefix() {
        let item = LeaderFillMatcher
            .attempt("2 x Burger...........5.99")
            .unwrap();

        assert_eq!(item.name, "Burger");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_trailing_price_fallback() {
        let item = cascade_last().attempt("Cheese Burger 5.99").unwrap();

        assert_eq!(item.name, "Cheese Burger");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, dec(599));
    }

    #[test]
    fn test_trailing_price_reparses_quantity() {
        let item = cascade_last().attempt("3 Cookie 1.50").unwrap();

        assert_eq!(item.name, "Cookie");
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_trailing_price_bounds() {
        let matcher = cascade_last();

        assert!(matcher.attempt("Gift Card 999.99").is_none());
        assert!(matcher.attempt("Penny Candy 0.05").is_none());
        assert!(matcher.attempt("Edge Low 0.10").is_some());
        assert!(matcher.attempt("Edge High 500.00").is_some());
    }

    #[test]
    fn test_name_must_contain_letters() {
        assert!(cascade_last().attempt("1234 5.99").is_none());
    }

    fn cascade_last() -> TrailingPriceMatcher {
        TrailingPriceMatcher::new(dec(10), dec(50000))
    }

    #[test]
    fn test_cascade_priority_order() {
        // Pattern 1 must win over the trailing-price fallback.
        let items = cascade().extract("2 Burger 5.99 11.98");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price, dec(1198));
    }

    #[test]
    fn test_failed_validation_falls_through() {
        // Pattern 1 rejects the math; the line still reaches the fallback,
        // which re-parses the leading 2 as a quantity.
        let items = cascade().extract("2 Burger 5.99 20.00");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Burger 5.99");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price, dec(2000));
    }

    #[test]
    fn test_stop_on_total_marker() {
        let text = "2 Coffee 4.00 8.00\nTotal to Pay 8.00\nThank you for shopping";
        let items = cascade().extract(text);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Coffee");
    }

    #[test]
    fn test_stop_words_filter_known_non_items() {
        let text = "Cashier #4\nVISA ****1234\n1 Latte 4.50 4.50";
        let items = cascade().extract(text);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Latte");
    }

    #[test]
    fn test_noisy_lines_discarded() {
        let items = cascade().extract("**==~~ Burger #@! 5.99");

        assert!(items.is_empty());
    }

    #[test]
    fn test_short_lines_discarded() {
        assert!(cascade().extract("ab\nz\n").is_empty());
    }

    #[test]
    fn test_item_cap() {
        let text: String = (1..=30)
            .map(|i| format!("Widget {} 1.50\n", i))
            .collect();
        let items = cascade().extract(&text);

        assert_eq!(items.len(), 20);
        assert_eq!(items[0].name, "Widget 1");
        assert_eq!(items[19].name, "Widget 20");
    }

    #[test]
    fn test_name_truncated_to_fifty_chars() {
        let long_name = "Extremely Verbose Product Description That Never Seems To End";
        let items = cascade().extract(&format!("{} 4.99", long_name));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name.chars().count(), 50);
    }
}

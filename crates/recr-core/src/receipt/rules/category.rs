//! Item categorization.

use crate::models::config::CategoryKeywords;
use crate::models::receipt::Category;

/// Classifies an item name into a spending category.
///
/// The merchant signal outranks the item-name signal: a pharmacy-branded
/// receipt categorizes a "hamburger" as pharmacy, not restaurant.
pub struct Categorizer {
    merchant_rules: Vec<(Category, Vec<String>)>,
    item_rules: Vec<(Category, Vec<String>)>,
}

impl Categorizer {
    pub fn from_config(
        merchant_categories: &[CategoryKeywords],
        item_categories: &[CategoryKeywords],
    ) -> Self {
        Self {
            merchant_rules: lowered(merchant_categories),
            item_rules: lowered(item_categories),
        }
    }

    /// Categorize an item, never failing: `Other` is the exhaustive fallback.
    pub fn categorize(&self, item_name: &str, merchant: &str) -> Category {
        let item_lower = item_name.to_lowercase();
        let merchant_lower = merchant.to_lowercase();

        for (category, keywords) in &self.merchant_rules {
            if keywords.iter().any(|k| merchant_lower.contains(k.as_str())) {
                return *category;
            }
        }

        for (category, keywords) in &self.item_rules {
            if keywords.iter().any(|k| item_lower.contains(k.as_str())) {
                return *category;
            }
        }

        Category::Other
    }
}

fn lowered(table: &[CategoryKeywords]) -> Vec<(Category, Vec<String>)> {
    table
        .iter()
        .map(|entry| {
            (
                entry.category,
                entry.keywords.iter().map(|k| k.to_lowercase()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ParserConfig;

    fn categorizer() -> Categorizer {
        let config = ParserConfig::default();
        Categorizer::from_config(&config.merchant_categories, &config.item_categories)
    }

    #[test]
    fn test_merchant_signal_outranks_item_keywords() {
        let c = categorizer();

        assert_eq!(c.categorize("hamburger", "CVS Pharmacy"), Category::Pharmacy);
        assert_eq!(c.categorize("aspirin", "McDonald's"), Category::Restaurant);
    }

    #[test]
    fn test_item_keyword_fallback() {
        let c = categorizer();

        assert_eq!(c.categorize("Whole Milk 2L", ""), Category::Groceries);
        assert_eq!(c.categorize("Caramel Sundae", ""), Category::Restaurant);
        assert_eq!(c.categorize("Ibuprofen 200mg", ""), Category::Pharmacy);
        assert_eq!(c.categorize("USB Cable", ""), Category::Retail);
    }

    #[test]
    fn test_keyword_table_order_breaks_ties() {
        let c = categorizer();

        // "chicken" is a groceries keyword and groceries scans before
        // restaurant, so "Chicken Wrap" never reaches the "wrap" keyword.
        assert_eq!(c.categorize("Chicken Wrap", ""), Category::Groceries);
    }

    #[test]
    fn test_other_is_exhaustive_fallback() {
        let c = categorizer();

        assert_eq!(c.categorize("Mystery SKU 0042", ""), Category::Other);
        assert_eq!(c.categorize("", ""), Category::Other);
    }
}

//! Configuration tables for the receipt parser.
//!
//! All pattern/keyword/policy tables are data, not control flow: they can be
//! extended from a JSON file without touching the matcher logic. The parser
//! compiles them once at construction and never mutates them afterward.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::receipt::Category;
use crate::error::{RecrError, Result};

/// Main configuration for the receipt parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Ordered merchant name patterns. First match wins.
    pub merchants: Vec<MerchantPattern>,

    /// Merchant-level category heuristics, checked before item keywords.
    pub merchant_categories: Vec<CategoryKeywords>,

    /// Item-name keyword table, scanned in order.
    pub item_categories: Vec<CategoryKeywords>,

    /// Return policy rules, matched by substring against the merchant name.
    pub return_policies: Vec<ReturnPolicy>,

    /// Return window when no policy rule matches.
    pub default_return_days: u32,

    /// Lines containing any of these words are never item lines.
    pub stop_words: Vec<String>,

    /// Assumed tax rate when deriving missing financial values.
    pub tax_rate: Decimal,

    /// Lowest price the bare-trailing-price fallback matcher accepts.
    pub min_item_price: Decimal,

    /// Highest price the bare-trailing-price fallback matcher accepts.
    pub max_item_price: Decimal,

    /// Maximum number of line items kept per receipt.
    pub max_items: usize,

    /// Minimum non-whitespace characters before extraction is attempted.
    pub min_text_chars: usize,
}

/// A canonical merchant name and the regex that recognizes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantPattern {
    /// Canonical display name.
    pub name: String,

    /// Case-insensitive regex tolerating apostrophes, spacing, hyphenation.
    pub pattern: String,
}

/// Keywords that map to a single category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Return window for merchants whose name contains `merchant`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnPolicy {
    pub merchant: String,
    pub days: u32,
}

fn pattern(name: &str, pattern: &str) -> MerchantPattern {
    MerchantPattern {
        name: name.to_string(),
        pattern: pattern.to_string(),
    }
}

fn keywords(category: Category, words: &[&str]) -> CategoryKeywords {
    CategoryKeywords {
        category,
        keywords: words.iter().map(|w| w.to_string()).collect(),
    }
}

fn policy(merchant: &str, days: u32) -> ReturnPolicy {
    ReturnPolicy {
        merchant: merchant.to_string(),
        days,
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            merchants: vec![
                pattern("McDonald's", r"mcdonald'?s?"),
                pattern("Walmart", r"wal[\s-]*mart"),
                pattern("Target", r"target"),
                pattern("IKEA", r"ikea"),
                pattern("Starbucks", r"starbucks?"),
                pattern("Tim Hortons", r"tim[\s-]*horton'?s?"),
                pattern("Subway", r"subway"),
                pattern("CVS", r"cvs\s*(?:pharmacy)?"),
                pattern("Walgreens", r"walgreens?"),
                pattern("Costco", r"costco"),
                pattern("Whole Foods", r"whole[\s-]*foods?"),
                pattern("Safeway", r"safeway"),
                pattern("Kroger", r"kroger"),
                pattern("7-Eleven", r"7-?eleven|7-11"),
                pattern("Wendy's", r"wendy'?s?"),
                pattern("Burger King", r"burger[\s-]*king"),
                pattern("Taco Bell", r"taco[\s-]*bell"),
                pattern("KFC", r"kfc|kentucky[\s-]*fried"),
                pattern("Pizza Hut", r"pizza[\s-]*hut"),
                pattern("Chipotle", r"chipotle"),
                pattern("Panera", r"panera"),
                pattern("Home Depot", r"home[\s-]*depot"),
                pattern("Lowe's", r"lowe'?s?"),
                pattern("Best Buy", r"best[\s-]*buy"),
                pattern("Amazon", r"amazon"),
                pattern("Trader Joe's", r"trader[\s-]*joe'?s?"),
                pattern("Aldi", r"aldi"),
                pattern("Publix", r"publix"),
                pattern("H-E-B", r"h-?e-?b"),
                pattern("Stop & Shop", r"stop\s*&\s*shop"),
                pattern("Food Lion", r"food[\s-]*lion"),
            ],
            merchant_categories: vec![
                keywords(
                    Category::Restaurant,
                    &[
                        "mcdonald", "burger", "wendy", "subway", "pizza", "starbucks",
                        "coffee", "cafe", "restaurant", "taco", "kfc",
                    ],
                ),
                keywords(
                    Category::Groceries,
                    &[
                        "walmart", "target", "costco", "whole foods", "trader joe",
                        "kroger", "safeway", "grocery", "market", "supermarket",
                    ],
                ),
                keywords(
                    Category::Pharmacy,
                    &["cvs", "walgreens", "rite aid", "pharmacy", "drug"],
                ),
                keywords(
                    Category::Retail,
                    &["best buy", "home depot", "lowe", "ikea", "amazon", "nordstrom", "macy"],
                ),
            ],
            item_categories: vec![
                keywords(
                    Category::Groceries,
                    &[
                        "milk", "bread", "eggs", "cheese", "butter", "yogurt", "flour",
                        "sugar", "rice", "pasta", "cereal", "fruit", "vegetable", "meat",
                        "chicken", "beef", "pork", "fish", "salmon", "tuna", "apple",
                        "banana", "orange", "tomato", "lettuce", "carrot", "potato",
                        "onion", "garlic", "oil", "salt", "pepper",
                    ],
                ),
                keywords(
                    Category::Restaurant,
                    &[
                        "burger", "fries", "pizza", "sandwich", "taco", "burrito",
                        "salad", "sundae", "ice cream", "shake", "soda", "coffee", "tea",
                        "latte", "cappuccino", "espresso", "mocha", "combo", "meal",
                        "nuggets", "wings", "wrap", "sub", "hot dog", "nachos",
                        "quesadilla", "smoothie", "juice", "caramel", "fudge",
                        "chocolate", "vanilla", "strawberry",
                    ],
                ),
                keywords(
                    Category::Pharmacy,
                    &[
                        "medicine", "prescription", "tablet", "capsule", "syrup",
                        "cream", "ointment", "bandage", "vitamins", "supplement",
                        "aspirin", "ibuprofen", "antibiotic", "inhaler", "drops",
                        "lotion", "sunscreen", "sanitizer", "mask", "thermometer",
                    ],
                ),
                keywords(
                    Category::Retail,
                    &[
                        "shirt", "pants", "shoes", "socks", "jacket", "dress", "hat",
                        "bag", "wallet", "belt", "watch", "glasses", "towel", "pillow",
                        "blanket", "lamp", "candle", "book", "toy", "game",
                        "electronics", "phone", "charger", "cable", "battery", "pen",
                        "paper", "notebook", "folder",
                    ],
                ),
            ],
            return_policies: vec![
                policy("walmart", 90),
                policy("target", 90),
                policy("costco", 90),
                policy("amazon", 30),
                policy("best buy", 15),
                policy("home depot", 90),
                policy("lowes", 90),
                policy("tj maxx", 30),
                policy("marshalls", 30),
                policy("gap", 45),
                policy("old navy", 45),
                policy("nordstrom", 90),
                policy("macy's", 30),
                policy("whole foods", 90),
                policy("trader joe's", 30),
                policy("cvs", 60),
                policy("walgreens", 30),
                policy("rite aid", 30),
            ],
            default_return_days: 30,
            stop_words: [
                "subtotal", "total", "tax", "gst", "pst", "hst", "qst", "vat",
                "amount", "balance", "change", "tender", "payment", "cash", "credit",
                "debit", "visa", "mastercard", "amex", "card", "received", "refund",
                "discount", "coupon", "savings", "remaining", "due", "paid",
                "ref num", "cashier", "thank", "visit", "receipt", "transaction",
                "invoice", "order", "take home", "meatballs", "cream sauce", "pkgs",
                "swedish", "authentic", "recipe", "for only", "made from", "taste of",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
            tax_rate: Decimal::new(10, 2),
            min_item_price: Decimal::new(10, 2),
            max_item_price: Decimal::new(50000, 2),
            max_items: 20,
            min_text_chars: 10,
        }
    }
}

impl ParserConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| RecrError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| RecrError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_populated() {
        let config = ParserConfig::default();

        assert_eq!(config.merchants.len(), 31);
        assert_eq!(config.return_policies.len(), 18);
        assert!(!config.stop_words.is_empty());
        assert_eq!(config.tax_rate, Decimal::new(10, 2));
        assert_eq!(config.max_items, 20);
    }

    #[test]
    fn test_merchant_table_order_stable() {
        let config = ParserConfig::default();

        // First-match-wins semantics depend on this ordering.
        assert_eq!(config.merchants[0].name, "McDonald's");
        assert_eq!(config.merchants[1].name, "Walmart");
    }

    #[test]
    fn test_item_keyword_scan_order() {
        let config = ParserConfig::default();

        let order: Vec<Category> = config.item_categories.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Groceries,
                Category::Restaurant,
                Category::Pharmacy,
                Category::Retail
            ]
        );
    }

    #[test]
    fn test_json_round_trip() {
        let config = ParserConfig::default();

        let json = serde_json::to_string(&config).unwrap();
        let parsed: ParserConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.merchants.len(), config.merchants.len());
        assert_eq!(parsed.tax_rate, config.tax_rate);
        assert_eq!(parsed.stop_words, config.stop_words);
    }
}

//! Receipt data models.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A complete parsed receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Canonical merchant name, or the literal "Unknown".
    pub merchant: String,

    /// Purchase date. Defaults to the current UTC date when none was found.
    pub date: NaiveDate,

    /// Extracted line items (at most 20, earliest-encountered order).
    pub items: Vec<LineItem>,

    /// Financial totals after reconciliation.
    pub totals: FinancialTotals,

    /// Payment method detected from tender lines.
    pub payment_method: PaymentMethod,

    /// Return window in days for this merchant.
    pub return_policy_days: u32,

    /// Last day items can be returned (`date + return_policy_days`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_deadline: Option<NaiveDate>,

    /// Extraction metadata and provenance flags.
    pub metadata: ExtractionMetadata,
}

/// A single purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name (at most 50 characters, contains letters).
    pub name: String,

    /// Extended line total, not unit price.
    pub price: Decimal,

    /// Quantity purchased (at least 1).
    pub quantity: u32,

    /// Spending category.
    pub category: Category,
}

/// Spending category for a line item.
///
/// `Other` is the exhaustive fallback: every item resolves to exactly one
/// category, never none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Groceries,
    Restaurant,
    Pharmacy,
    Retail,
    Other,
}

impl Category {
    /// Name used in CSV/text output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "groceries",
            Category::Restaurant => "restaurant",
            Category::Pharmacy => "pharmacy",
            Category::Retail => "retail",
            Category::Other => "other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

/// Subtotal, tax, and total after reconciliation.
///
/// Soft invariant: `subtotal + tax ≈ total` within rounding. Enforced by the
/// reconciliation policy, not by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialTotals {
    /// Amount before tax.
    pub subtotal: Decimal,

    /// Tax amount.
    pub tax: Decimal,

    /// Amount paid.
    pub total: Decimal,
}

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Credit,
    Debit,
    Unknown,
}

impl PaymentMethod {
    /// Name used in CSV/text output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Unknown => "unknown",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Metadata about the extraction process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// True when the receipt came from the OCR text parser (as opposed to an
    /// external structurer further down the pipeline).
    pub parsed_from_ocr: bool,

    /// True when the receipt content is synthetic placeholder data rather
    /// than a genuine extraction.
    pub sample_data: bool,

    /// Overall extraction confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Warnings for fields that were defaulted or derived.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Processing time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl Receipt {
    /// The fixed placeholder receipt substituted when the input text is too
    /// short to attempt extraction.
    pub fn sample(today: NaiveDate) -> Self {
        let items = vec![
            LineItem {
                name: "Sample Item 1".to_string(),
                price: Decimal::new(599, 2),
                quantity: 1,
                category: Category::Other,
            },
            LineItem {
                name: "Sample Item 2".to_string(),
                price: Decimal::new(349, 2),
                quantity: 1,
                category: Category::Other,
            },
        ];

        Self {
            merchant: "Sample Store".to_string(),
            date: today,
            items,
            totals: FinancialTotals {
                subtotal: Decimal::new(862, 2),
                tax: Decimal::new(86, 2),
                total: Decimal::new(948, 2),
            },
            payment_method: PaymentMethod::Unknown,
            return_policy_days: 30,
            return_deadline: today.checked_add_days(Days::new(30)),
            metadata: ExtractionMetadata {
                parsed_from_ocr: true,
                sample_data: true,
                confidence: 0.0,
                warnings: Vec::new(),
                processing_time_ms: None,
            },
        }
    }

    /// Validate the receipt data and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.merchant.is_empty() {
            issues.push("Missing merchant name".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.items.len() > 20 {
            issues.push(format!("Too many line items: {}", self.items.len()));
        }

        for item in &self.items {
            if item.quantity == 0 {
                issues.push(format!("Item '{}' has zero quantity", item.name));
            }
            if item.price < Decimal::ZERO {
                issues.push(format!("Item '{}' has negative price", item.name));
            }
        }

        if self.totals.total < Decimal::ZERO {
            issues.push("Total is negative".to_string());
        }

        let drift = (self.totals.subtotal + self.totals.tax - self.totals.total).abs();
        if drift > Decimal::new(1, 2) {
            issues.push(format!(
                "Subtotal ({}) + tax ({}) differs from total ({})",
                self.totals.subtotal, self.totals.tax, self.totals.total
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_receipt_totals() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let receipt = Receipt::sample(today);

        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.totals.total, Decimal::new(948, 2));
        assert_eq!(receipt.totals.subtotal + receipt.totals.tax, receipt.totals.total);
        assert!(receipt.metadata.sample_data);
        assert_eq!(
            receipt.return_deadline,
            Some(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap())
        );
    }

    #[test]
    fn test_sample_receipt_validates() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert!(Receipt::sample(today).validate().is_empty());
    }

    #[test]
    fn test_validate_flags_drift() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mut receipt = Receipt::sample(today);
        receipt.totals.total = Decimal::new(2000, 2);

        let issues = receipt.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("differs from total"));
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&Category::Groceries).unwrap();
        assert_eq!(json, "\"groceries\"");

        let parsed: Category = serde_json::from_str("\"pharmacy\"").unwrap();
        assert_eq!(parsed, Category::Pharmacy);
    }

    #[test]
    fn test_payment_method_serde_names() {
        let json = serde_json::to_string(&PaymentMethod::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }
}

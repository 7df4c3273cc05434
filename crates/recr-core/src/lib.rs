//! Core library for receipt OCR text parsing.
//!
//! This crate provides:
//! - Rule-based line-item extraction from noisy OCR receipt text
//! - Merchant identification and item categorization
//! - Financial reconciliation (subtotal / tax / total)
//! - Return policy lookup and receipt assembly
//!
//! The public contract is total: [`ReceiptParser::parse`] always returns a
//! structurally complete [`Receipt`], substituting sample data when nothing
//! usable can be extracted. Callers distinguish genuine extraction from
//! fallback via the provenance flags on [`ExtractionMetadata`].

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{RecrError, Result};
pub use models::config::ParserConfig;
pub use models::receipt::{
    Category, ExtractionMetadata, FinancialTotals, LineItem, PaymentMethod, Receipt,
};
pub use receipt::{ReceiptParser, TextParser};

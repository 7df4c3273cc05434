//! Error types for the recr-core library.
//!
//! Parsing itself is total and never surfaces an error: every failure inside
//! the extraction cascade narrows to "try the next strategy". The error type
//! below only covers the edges around the engine - configuration tables and
//! file I/O.

use thiserror::Error;

/// Main error type for the recr library.
#[derive(Error, Debug)]
pub enum RecrError {
    /// Configuration error (bad table entry, invalid pattern, bad JSON).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the recr library.
pub type Result<T> = std::result::Result<T, RecrError>;

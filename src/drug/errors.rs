//! Error types for drug library loading and lookup

use thiserror::Error;

/// Errors that can occur when building or querying a [`DrugLibrary`](super::DrugLibrary)
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Failed to parse JSON
    #[error("Failed to parse drug library: {0}")]
    ParseError(#[from] serde_json::Error),

    /// File I/O
    #[error("Failed to read drug library: {0}")]
    Io(#[from] std::io::Error),

    /// A drug entry failed validation
    #[error("Invalid entry for drug '{drug}': {reason}")]
    InvalidEntry { drug: String, reason: String },

    /// Drug not found in library
    #[error("Drug '{0}' not found in library")]
    UnknownDrug(String),
}

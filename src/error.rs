//! Custom error types for pocketbook
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for pocketbook operations
#[derive(Error, Debug)]
pub enum PocketbookError {
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Duplicate entity errors
    #[error("{entity} already exists: {id}")]
    Duplicate { entity: &'static str, id: String },

    /// Unrecognized budget template name
    #[error("Unknown budget template: {0}")]
    UnknownTemplate(String),

    /// Import errors affecting a whole file (bad header, not an array)
    #[error("Import error: {0}")]
    Import(String),

    /// Import errors affecting a single data row
    #[error("Import error in row {row}: {reason}")]
    ImportRow { row: usize, reason: String },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PocketbookError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Expense",
            id: id.into(),
        }
    }

    /// Create a "duplicate" error for expenses
    pub fn duplicate_expense(id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity: "Expense",
            id: id.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a per-row import error
    pub fn is_import_row(&self) -> bool {
        matches!(self, Self::ImportRow { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for PocketbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PocketbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for pocketbook operations
pub type PocketbookResult<T> = Result<T, PocketbookError>;

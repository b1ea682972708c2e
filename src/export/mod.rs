//! Export module for Pocketbook
//!
//! Provides expense export in two formats:
//! - CSV: spreadsheet-compatible, matching the importer's column layout
//! - JSON: machine-readable, matching the expense file shape

pub mod csv;
pub mod json;

pub use csv::export_expenses_csv;
pub use json::export_expenses_json;

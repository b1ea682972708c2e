//! Service layer for Pocketbook
//!
//! Services provide logic that sits between raw storage and the state
//! coordinator, currently file import parsing.

pub mod import;

pub use import::{parse_csv_expenses, parse_json_expenses, ImportOutcome, ImportRowFailure};

//! JSON Export functionality
//!
//! Exports expenses as a JSON array in the same shape the expense file uses,
//! which is also the shape the JSON importer accepts.

use std::io::Write;

use crate::error::{PocketbookError, PocketbookResult};
use crate::models::Expense;

/// Export expenses to a pretty-printed JSON array
pub fn export_expenses_json<W: Write>(
    expenses: &[Expense],
    writer: &mut W,
) -> PocketbookResult<()> {
    serde_json::to_writer_pretty(writer, expenses)
        .map_err(|e| PocketbookError::Export(e.to_string()))?;
    Ok(())
}

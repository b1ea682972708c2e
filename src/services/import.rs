//! Expense import
//!
//! Parses CSV and JSON expense files into per-row results. Rows are validated
//! independently so one bad line never aborts the rest of the file; callers
//! commit the good rows and report the failures in aggregate.

use std::fmt;
use std::io::Read;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{PocketbookError, PocketbookResult};
use crate::models::expense::parse_date_flexible;
use crate::models::{Category, Expense, ExpenseId};

/// A row that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRowFailure {
    /// 1-based data row index (header excluded)
    pub row: usize,
    pub reason: String,
}

impl fmt::Display for ImportRowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.reason)
    }
}

impl From<ImportRowFailure> for PocketbookError {
    fn from(failure: ImportRowFailure) -> Self {
        PocketbookError::ImportRow {
            row: failure.row,
            reason: failure.reason,
        }
    }
}

/// Aggregate result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    /// Rows committed
    pub imported: usize,
    /// Rows skipped (equal to the failure count)
    pub skipped: usize,
    /// Why each skipped row was skipped
    pub failures: Vec<ImportRowFailure>,
}

impl ImportOutcome {
    /// Build an outcome from the committed count and the failures
    pub fn new(imported: usize, failures: Vec<ImportRowFailure>) -> Self {
        Self {
            imported,
            skipped: failures.len(),
            failures,
        }
    }

    /// A sample of failure messages for reporting
    pub fn error_messages(&self, limit: usize) -> Vec<String> {
        self.failures
            .iter()
            .take(limit)
            .map(|f| f.to_string())
            .collect()
    }

    /// Whether every row was committed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

const REQUIRED_CSV_FIELDS: [&str; 3] = ["date", "amount", "category"];

#[derive(Debug, Default)]
struct CsvColumns {
    date: Option<usize>,
    amount: Option<usize>,
    category: Option<usize>,
    description: Option<usize>,
    id: Option<usize>,
}

/// Parse a CSV expense file
///
/// The header row is required and must include `date`, `amount` and
/// `category` (case-insensitive); `description` and `id` are optional.
/// Returns one result per data row.
pub fn parse_csv_expenses<R: Read>(
    reader: R,
    today: NaiveDate,
) -> PocketbookResult<Vec<Result<Expense, ImportRowFailure>>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| PocketbookError::Import(format!("Failed to read CSV header: {}", e)))?;

    let mut columns = CsvColumns::default();
    for (idx, header) in headers.iter().enumerate() {
        match header.trim().to_lowercase().as_str() {
            "date" => columns.date = Some(idx),
            "amount" => columns.amount = Some(idx),
            "category" => columns.category = Some(idx),
            "description" => columns.description = Some(idx),
            "id" => columns.id = Some(idx),
            _ => {}
        }
    }

    let missing: Vec<_> = REQUIRED_CSV_FIELDS
        .iter()
        .zip([columns.date, columns.amount, columns.category])
        .filter(|(_, col)| col.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(PocketbookError::Import(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let mut results = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let row = idx + 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                results.push(Err(reject(row, format!("Unreadable CSV record: {}", e))));
                continue;
            }
        };

        let field = |col: Option<usize>| col.and_then(|i| record.get(i)).map(str::trim);
        let raw_amount = field(columns.amount).unwrap_or("");
        let amount = match parse_amount(raw_amount) {
            Some(amount) => amount,
            None => {
                results.push(Err(reject(row, "Amount must be a positive number")));
                continue;
            }
        };

        results.push(finish_row(
            amount,
            field(columns.date).unwrap_or(""),
            field(columns.category).unwrap_or(""),
            field(columns.description).unwrap_or("").to_string(),
            field(columns.id),
            row,
            today,
        ));
    }

    Ok(results)
}

/// Parse a JSON expense file
///
/// The document must be an array of objects with at minimum `amount`,
/// `category` and `date`; elements are validated independently.
pub fn parse_json_expenses<R: Read>(
    reader: R,
    today: NaiveDate,
) -> PocketbookResult<Vec<Result<Expense, ImportRowFailure>>> {
    let document: serde_json::Value = serde_json::from_reader(reader)
        .map_err(|e| PocketbookError::Import(format!("Invalid JSON: {}", e)))?;

    let serde_json::Value::Array(items) = document else {
        return Err(PocketbookError::Import(
            "JSON must be an array of expense objects".to_string(),
        ));
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_json_item(item, idx + 1, today))
        .collect())
}

fn parse_json_item(
    item: &serde_json::Value,
    row: usize,
    today: NaiveDate,
) -> Result<Expense, ImportRowFailure> {
    let Some(entry) = item.as_object() else {
        return Err(reject(row, "Entry is not an object"));
    };

    let amount = match entry.get("amount") {
        None => return Err(reject(row, "Missing required field: amount")),
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => parse_amount(s),
        Some(_) => None,
    };
    let Some(amount) = amount else {
        return Err(reject(row, "Amount must be a positive number"));
    };

    let raw_date = match entry.get("date") {
        None => return Err(reject(row, "Missing required field: date")),
        Some(value) => match value.as_str() {
            Some(s) => s,
            None => return Err(reject(row, "Date must be a string")),
        },
    };

    let raw_category = match entry.get("category") {
        None => return Err(reject(row, "Missing required field: category")),
        Some(value) => match value.as_str() {
            Some(s) => s,
            None => return Err(reject(row, "Category must be a string")),
        },
    };

    let description = entry
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let supplied_id = entry.get("id").and_then(|v| v.as_str());

    finish_row(
        amount,
        raw_date,
        raw_category,
        description,
        supplied_id,
        row,
        today,
    )
}

/// Validate the shared row fields and build the expense
fn finish_row(
    amount: f64,
    raw_date: &str,
    raw_category: &str,
    description: String,
    supplied_id: Option<&str>,
    row: usize,
    today: NaiveDate,
) -> Result<Expense, ImportRowFailure> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(reject(row, "Amount must be a positive number"));
    }

    let Some(date) = parse_date_flexible(raw_date) else {
        return Err(reject(row, format!("Could not parse date: '{}'", raw_date)));
    };
    if date > today {
        return Err(reject(row, "Date cannot be in the future"));
    }

    let raw_category = raw_category.trim();
    if raw_category.is_empty() {
        return Err(reject(row, "Category is required"));
    }
    let category = Category::normalize(raw_category);
    if Category::parse(raw_category).is_none() {
        debug!(row, raw = raw_category, category = category.key(), "normalized imported category");
    }

    let id = match supplied_id.map(str::trim) {
        Some(raw) if !raw.is_empty() => ExpenseId::from_string(raw),
        _ => ExpenseId::new(),
    };

    Ok(Expense::with_id(id, amount, description, category, date))
}

fn reject(row: usize, reason: impl Into<String>) -> ImportRowFailure {
    let reason = reason.into();
    debug!(row, reason = %reason, "import row rejected");
    ImportRowFailure { row, reason }
}

/// Parse an amount string, tolerating currency symbols and thousands commas
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

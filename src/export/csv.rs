//! CSV Export functionality
//!
//! Exports expenses to CSV in the same column layout the importer accepts,
//! so an exported file can be re-imported as-is.

use std::io::Write;

use crate::error::{PocketbookError, PocketbookResult};
use crate::models::Expense;

/// Export expenses to CSV
///
/// Rows are written in the order given. The description column is always
/// quoted; the other columns never need quoting.
pub fn export_expenses_csv<W: Write>(expenses: &[Expense], writer: &mut W) -> PocketbookResult<()> {
    writeln!(writer, "Date,Category,Amount,Description")
        .map_err(|e| PocketbookError::Export(e.to_string()))?;

    for expense in expenses {
        // f64 Display drops trailing zeros ("50", "12.75"), matching the
        // amounts the importer accepts
        writeln!(
            writer,
            "{},{},{},\"{}\"",
            expense.date.format("%Y-%m-%d"),
            expense.category.display_name(),
            expense.amount,
            expense.description.replace('"', "\"\"")
        )
        .map_err(|e| PocketbookError::Export(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExpenseId};
    use chrono::NaiveDate;

    fn expense(amount: f64, description: &str, category: Category, day: u32) -> Expense {
        Expense::with_id(
            ExpenseId::from_string(format!("exp-{}", day)),
            amount,
            description,
            category,
            NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
        )
    }

    #[test]
    fn test_export_expenses_csv() {
        let expenses = vec![
            expense(50.0, "Taco night", Category::Food, 30),
            expense(200.5, "Rent share", Category::Housing, 5),
        ];

        let mut output = Vec::new();
        export_expenses_csv(&expenses, &mut output).unwrap();

        let csv_string = String::from_utf8(output).unwrap();
        let lines: Vec<_> = csv_string.lines().collect();
        assert_eq!(lines[0], "Date,Category,Amount,Description");
        assert_eq!(lines[1], "2025-05-30,Food,50,\"Taco night\"");
        assert_eq!(lines[2], "2025-05-05,Housing,200.5,\"Rent share\"");
    }

    #[test]
    fn test_export_escapes_quotes_in_description() {
        let expenses = vec![expense(12.0, "the \"good\" coffee", Category::Food, 1)];

        let mut output = Vec::new();
        export_expenses_csv(&expenses, &mut output).unwrap();

        let csv_string = String::from_utf8(output).unwrap();
        assert!(csv_string.contains("\"the \"\"good\"\" coffee\""));
    }

    #[test]
    fn test_export_empty_list_writes_header_only() {
        let mut output = Vec::new();
        export_expenses_csv(&[], &mut output).unwrap();

        let csv_string = String::from_utf8(output).unwrap();
        assert_eq!(csv_string, "Date,Category,Amount,Description\n");
    }

    #[test]
    fn test_exported_csv_reimports() {
        let expenses = vec![expense(50.0, "Dinner, with friends", Category::Food, 30)];

        let mut output = Vec::new();
        export_expenses_csv(&expenses, &mut output).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
        let results =
            crate::services::parse_csv_expenses(output.as_slice(), today).unwrap();
        assert_eq!(results.len(), 1);

        let imported = results[0].as_ref().unwrap();
        assert_eq!(imported.amount, 50.0);
        assert_eq!(imported.category, Category::Food);
        assert_eq!(imported.description, "Dinner, with friends");
    }
}

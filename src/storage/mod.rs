//! Storage layer for Pocketbook
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Each store keeps its working set in memory and persists on
//! request; nothing here emits events or touches view state.

pub mod budgets;
pub mod expenses;
pub mod file_io;
pub mod session;

pub use budgets::BudgetStore;
pub use expenses::{ExpenseFilter, ExpenseSort, ExpenseStore};
pub use file_io::{read_json, write_json_atomic};
pub use session::{SessionState, SessionStore};

use crate::config::paths::PocketbookPaths;
use crate::error::PocketbookError;

/// Main storage coordinator that provides access to all stores
pub struct Storage {
    paths: PocketbookPaths,
    pub expenses: ExpenseStore,
    pub budgets: BudgetStore,
    pub session: SessionStore,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: PocketbookPaths) -> Result<Self, PocketbookError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseStore::new(paths.expenses_file()),
            budgets: BudgetStore::new(paths.monthly_budgets_file(), paths.legacy_budgets_file()),
            session: SessionStore::new(paths.session_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &PocketbookPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), PocketbookError> {
        self.expenses.load()?;
        self.budgets.load()?;
        self.session.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), PocketbookError> {
        self.expenses.save()?;
        self.budgets.save()?;
        self.session.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        storage.load_all().unwrap();
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_save_all_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        {
            let storage = Storage::new(paths.clone()).unwrap();
            storage.load_all().unwrap();
            storage
                .expenses
                .add(crate::models::Expense::new(
                    12.0,
                    "Lunch",
                    crate::models::Category::Food,
                    chrono::NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
                ))
                .unwrap();
            storage.save_all().unwrap();
        }

        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        assert_eq!(storage.expenses.count().unwrap(), 1);
    }
}

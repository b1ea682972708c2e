//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json. The file holds a
//! bare JSON array so data written by earlier revisions loads unchanged.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::PocketbookError;
use crate::models::{Category, Expense, ExpenseId, ExpensePatch, MonthKey};

use super::file_io::{read_json, write_json_atomic};

/// Sort orders for expense listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpenseSort {
    /// Newest first
    #[default]
    DateDesc,
    /// Oldest first
    DateAsc,
    /// Largest amount first
    AmountDesc,
    /// Smallest amount first
    AmountAsc,
    /// Category name, ties broken newest first
    Category,
}

/// Criteria for narrowing an expense listing
///
/// All criteria are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    search: Option<String>,
    category: Option<Category>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    min_amount: Option<f64>,
    max_amount: Option<f64>,
}

impl ExpenseFilter {
    /// Create an empty filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Match expenses whose description or category name contains the text
    /// (case-insensitive)
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into().to_lowercase());
        self
    }

    /// Match a single category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Match expenses on or after this date
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Match expenses on or before this date
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Match expenses with at least this amount
    pub fn with_min_amount(mut self, amount: f64) -> Self {
        self.min_amount = Some(amount);
        self
    }

    /// Match expenses with at most this amount
    pub fn with_max_amount(mut self, amount: f64) -> Self {
        self.max_amount = Some(amount);
        self
    }

    /// Check if an expense matches all criteria
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(ref query) = self.search {
            let in_description = expense.description.to_lowercase().contains(query);
            let in_category = expense
                .category
                .display_name()
                .to_lowercase()
                .contains(query);
            if !in_description && !in_category {
                return false;
            }
        }

        if let Some(category) = self.category {
            if expense.category != category {
                return false;
            }
        }

        if let Some(start) = self.start_date {
            if expense.date < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if expense.date > end {
                return false;
            }
        }

        if let Some(min) = self.min_amount {
            if expense.amount < min {
                return false;
            }
        }

        if let Some(max) = self.max_amount {
            if expense.amount > max {
                return false;
            }
        }

        true
    }
}

/// Repository for expense persistence
pub struct ExpenseStore {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
}

impl ExpenseStore {
    /// Create a new expense store
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), PocketbookError> {
        let expenses: Vec<Expense> = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for expense in expenses {
            if let Some(previous) = data.insert(expense.id.clone(), expense) {
                warn!(id = %previous.id, "duplicate expense id in file, keeping the later entry");
            }
        }

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        write_json_atomic(&self.path, &expenses)
    }

    /// Add a new expense
    ///
    /// Fails with a validation error for non-positive amounts and with a
    /// duplicate error if the id is already present.
    pub fn add(&self, expense: Expense) -> Result<(), PocketbookError> {
        expense
            .validate()
            .map_err(|e| PocketbookError::Validation(e.to_string()))?;

        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if data.contains_key(&expense.id) {
            return Err(PocketbookError::duplicate_expense(expense.id.as_str()));
        }

        data.insert(expense.id.clone(), expense);
        Ok(())
    }

    /// Insert a batch of already-validated expenses (imports)
    ///
    /// Returns the number inserted. Callers are expected to have screened
    /// out colliding ids beforehand.
    pub fn insert_many(&self, expenses: Vec<Expense>) -> Result<usize, PocketbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut inserted = 0;
        for expense in expenses {
            data.insert(expense.id.clone(), expense);
            inserted += 1;
        }

        Ok(inserted)
    }

    /// Apply a partial update to an expense
    ///
    /// Returns `Ok(false)` without touching anything when the id is unknown.
    /// A patch that would make the expense invalid is rejected and the stored
    /// record stays as it was.
    pub fn update(&self, id: &ExpenseId, patch: &ExpensePatch) -> Result<bool, PocketbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let Some(existing) = data.get(id) else {
            warn!(id = %id, "expense to update could not be located");
            return Ok(false);
        };

        let mut updated = existing.clone();
        patch.apply_to(&mut updated);
        updated
            .validate()
            .map_err(|e| PocketbookError::Validation(e.to_string()))?;

        data.insert(id.clone(), updated);
        Ok(true)
    }

    /// Remove an expense
    ///
    /// Returns whether anything was removed; an unknown id is not an error.
    pub fn remove(&self, id: &ExpenseId) -> Result<bool, PocketbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(id).is_some())
    }

    /// Remove a batch of expenses, returning how many were present
    pub fn remove_many(&self, ids: &[ExpenseId]) -> Result<usize, PocketbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut removed = 0;
        for id in ids {
            if data.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Get an expense by id
    pub fn get(&self, id: &ExpenseId) -> Result<Option<Expense>, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(id).cloned())
    }

    /// Check whether an id is present
    pub fn contains(&self, id: &ExpenseId) -> Result<bool, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(id))
    }

    /// Get all expenses, newest first
    pub fn list(&self) -> Result<Vec<Expense>, PocketbookError> {
        self.list_sorted(ExpenseSort::DateDesc)
    }

    /// Get all expenses in the given order
    pub fn list_sorted(&self, sort: ExpenseSort) -> Result<Vec<Expense>, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        sort_expenses(&mut expenses, sort);
        Ok(expenses)
    }

    /// Get the expenses of one calendar month, newest first
    pub fn by_month(&self, month: MonthKey) -> Result<Vec<Expense>, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data
            .values()
            .filter(|e| month.contains(e.date))
            .cloned()
            .collect();
        sort_expenses(&mut expenses, ExpenseSort::DateDesc);
        Ok(expenses)
    }

    /// Get expenses matching a filter, newest first
    pub fn filter(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        sort_expenses(&mut expenses, ExpenseSort::DateDesc);
        Ok(expenses)
    }

    /// Month of the oldest recorded expense, if any
    pub fn oldest_expense_month(&self) -> Result<Option<MonthKey>, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .map(|e| e.date)
            .min()
            .map(MonthKey::from_date))
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

/// Sort expenses in place
///
/// Ids break ties in every order so listings are deterministic.
pub fn sort_expenses(expenses: &mut [Expense], sort: ExpenseSort) {
    match sort {
        ExpenseSort::DateDesc => {
            expenses.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        }
        ExpenseSort::DateAsc => {
            expenses.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        }
        ExpenseSort::AmountDesc => {
            expenses.sort_by(|a, b| {
                b.amount
                    .total_cmp(&a.amount)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
        ExpenseSort::AmountAsc => {
            expenses.sort_by(|a, b| {
                a.amount
                    .total_cmp(&b.amount)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
        ExpenseSort::Category => {
            expenses.sort_by(|a, b| {
                a.category
                    .display_name()
                    .cmp(b.category.display_name())
                    .then_with(|| b.date.cmp(&a.date))
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
    }
}

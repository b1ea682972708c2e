//! Core data models for Pocketbook
//!
//! This module contains the data structures that represent the expense
//! tracking domain: expenses, categories, months, budget templates.

pub mod budget;
pub mod category;
pub mod expense;
pub mod ids;
pub mod month;

pub use budget::BudgetTemplate;
pub use category::Category;
pub use expense::{Expense, ExpensePatch, ExpenseValidationError};
pub use ids::ExpenseId;
pub use month::{MonthKey, MonthKeyParseError};

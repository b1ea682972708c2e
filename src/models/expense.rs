//! Expense model
//!
//! An expense is a flat value record. The raw model does not enforce amount
//! positivity on construction; the store and import boundaries call
//! [`Expense::validate`] before committing anything.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::category::Category;
use super::ids::ExpenseId;

/// A single recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Amount in currency units
    pub amount: f64,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Expense category
    pub category: Category,

    /// Calendar date of the expense (day granularity)
    #[serde(deserialize_with = "deserialize_flexible_date")]
    pub date: NaiveDate,
}

impl Expense {
    /// Create a new expense with a generated id
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            amount,
            description: description.into(),
            category,
            date,
        }
    }

    /// Create an expense with an externally supplied id (imports)
    pub fn with_id(
        id: ExpenseId,
        amount: f64,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            amount,
            description: description.into(),
            category,
            date,
        }
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ExpenseValidationError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseValidationError {
    /// Amount was zero, negative, or not a finite number
    InvalidAmount(f64),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseValidationError::InvalidAmount(amount) => {
                write!(f, "Amount must be a positive number, got {}", amount)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// A partial update for an expense
///
/// Supplied fields replace the existing values; absent fields are left
/// untouched (shallow merge).
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

impl ExpensePatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the amount
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Replace the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the category
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Replace the date
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Check whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    /// Merge the supplied fields over an existing expense
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(ref description) = self.description {
            expense.description = description.clone();
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
    }
}

/// Parse a date from the formats that show up in persisted data and imports
pub(crate) fn parse_date_flexible(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    // Full timestamps: persisted records written by older revisions carried
    // serialized Date objects rather than bare dates
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    // Common alternative formats
    let formats = [
        "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%d/%m/%y", "%Y/%m/%d", "%m-%d-%Y",
    ];
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    None
}

fn deserialize_flexible_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date_flexible(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("Could not parse date: '{}'", raw)))
}

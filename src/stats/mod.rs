//! Monthly spending statistics
//!
//! Pure computation over expense and budget snapshots. Nothing here touches
//! storage or the wall clock; callers pass `today` in, which keeps every
//! figure reproducible in tests.

pub mod alerts;

pub use alerts::{generate_alerts, AlertSeverity, BudgetAlert};

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Category, Expense, MonthKey};

/// Which day count the daily average divides by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvgDailyAnchor {
    /// Divide by today's day-of-month regardless of the viewed month
    RealToday,
    /// Divide by the elapsed days of the viewed month: today's day-of-month
    /// while viewing the current month, the full month length otherwise
    ViewedMonth(MonthKey),
}

/// Derived statistics for one set of expenses against one month's budgets
#[derive(Debug, Clone)]
pub struct MonthlyStats {
    /// Sum of all expense amounts
    pub total_spent: f64,
    /// Sum of all category budgets
    pub total_budget: f64,
    /// Budget left to spend, clamped at zero
    pub remaining_budget: f64,
    /// Signed budget minus spending; negative when over budget
    pub budget_delta: f64,
    /// Average spent per elapsed day
    pub avg_daily: f64,
    /// Spending summed per category; only categories with expenses appear
    pub category_totals: BTreeMap<Category, f64>,
    /// Number of expenses
    pub transaction_count: usize,
}

/// Compute statistics for a set of expenses against a month's budgets
pub fn compute_stats(
    expenses: &[Expense],
    budgets: &BTreeMap<Category, f64>,
    anchor: AvgDailyAnchor,
    today: NaiveDate,
) -> MonthlyStats {
    let total_spent: f64 = expenses.iter().map(|e| e.amount).sum();
    let total_budget: f64 = budgets.values().sum();
    let budget_delta = total_budget - total_spent;
    let remaining_budget = budget_delta.max(0.0);

    let elapsed_days = match anchor {
        AvgDailyAnchor::RealToday => today.day(),
        AvgDailyAnchor::ViewedMonth(month) => {
            if month.contains(today) {
                today.day()
            } else {
                month.days_in_month()
            }
        }
    };
    let avg_daily = if elapsed_days > 0 {
        total_spent / elapsed_days as f64
    } else {
        0.0
    };

    let mut category_totals: BTreeMap<Category, f64> = BTreeMap::new();
    for expense in expenses {
        *category_totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    MonthlyStats {
        total_spent,
        total_budget,
        remaining_budget,
        budget_delta,
        avg_daily,
        category_totals,
        transaction_count: expenses.len(),
    }
}

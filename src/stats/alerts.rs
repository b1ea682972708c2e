//! Budget alerts
//!
//! Derives threshold warnings from spending against budgets. A category with
//! no budget (or a zero budget) never alerts, whatever was spent.

use std::collections::BTreeMap;

use crate::models::{Category, Expense};

/// How urgent an alert is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    /// Budget 75% used
    Info,
    /// Budget 90% used
    Warning,
    /// Budget met or exceeded
    Danger,
}

impl AlertSeverity {
    /// Display icon
    pub fn icon(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "ℹ️",
            AlertSeverity::Warning => "⚠️",
            AlertSeverity::Danger => "🛑",
        }
    }
}

/// A single spending alert for one category
#[derive(Debug, Clone)]
pub struct BudgetAlert {
    pub category: Category,
    pub severity: AlertSeverity,
    /// Spent divided by budget
    pub ratio: f64,
    pub message: String,
}

/// Generate alerts for categories approaching or over their budget
///
/// Alerts come back in canonical category order. Thresholds: 75% used is
/// info, 90% is warning, spending at or past the budget is danger.
pub fn generate_alerts(
    expenses: &[Expense],
    budgets: &BTreeMap<Category, f64>,
) -> Vec<BudgetAlert> {
    let mut spent_by_category: BTreeMap<Category, f64> = BTreeMap::new();
    for expense in expenses {
        *spent_by_category.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    let mut alerts = Vec::new();
    for (&category, &budget) in budgets {
        if budget <= 0.0 {
            continue;
        }

        let spent = spent_by_category.get(&category).copied().unwrap_or(0.0);
        let ratio = spent / budget;
        let percentage = ratio * 100.0;
        let name = category.key();

        if spent >= budget {
            alerts.push(BudgetAlert {
                category,
                severity: AlertSeverity::Danger,
                ratio,
                message: format!(
                    "You've exceeded your {} budget by {}!",
                    name,
                    format_currency(spent - budget)
                ),
            });
        } else if percentage >= 90.0 {
            alerts.push(BudgetAlert {
                category,
                severity: AlertSeverity::Warning,
                ratio,
                message: format!(
                    "You're approaching your {} budget ({}% used)",
                    name,
                    percentage.round() as i64
                ),
            });
        } else if percentage >= 75.0 {
            alerts.push(BudgetAlert {
                category,
                severity: AlertSeverity::Info,
                ratio,
                message: format!("{} budget is {}% used", name, percentage.round() as i64),
            });
        }
    }

    alerts
}

/// Format an amount as US dollars, e.g. `$1,300.50`
fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let dollars = (cents / 100).abs();
    let remainder = (cents % 100).abs();

    let digits = dollars.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{:02}", sign, grouped, remainder)
}

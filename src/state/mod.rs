//! State coordination
//!
//! [`StateCoordinator`] composes the expense store, the budget store and
//! the month cursor behind one facade. Every mutation follows the same
//! sequence: apply in memory, persist, notify subscribers. Stats are
//! derived fresh on every read rather than cached; recomputation is
//! bounded by the expenses of one month and reads happen at interaction
//! frequency.
//!
//! Exactly one coordinator is constructed at application startup and
//! handed to the modules that need it.

pub mod cursor;
pub mod events;

pub use cursor::MonthCursor;
pub use events::{Channel, EventBus, StateEvent, StateSnapshot, SubscriptionId};

use std::collections::{BTreeMap, HashSet};
use std::io::{Read, Write};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{error, info, warn};

use crate::error::{PocketbookError, PocketbookResult};
use crate::export::{export_expenses_csv, export_expenses_json};
use crate::models::{BudgetTemplate, Category, Expense, ExpenseId, ExpensePatch, MonthKey};
use crate::services::{parse_csv_expenses, parse_json_expenses, ImportOutcome, ImportRowFailure};
use crate::stats::{compute_stats, generate_alerts, AvgDailyAnchor, BudgetAlert, MonthlyStats};
use crate::storage::{ExpenseFilter, ExpenseSort, Storage};

/// Facade over the stores, the month cursor and the event bus
pub struct StateCoordinator {
    storage: Storage,
    cursor: MonthCursor,
    events: EventBus,
}

impl StateCoordinator {
    /// Load stored data and position the cursor
    ///
    /// Runs the legacy budget migration once, then restores the saved
    /// month selection clamped into the navigation bounds (oldest expense
    /// month through the current month).
    pub fn new(storage: Storage) -> PocketbookResult<Self> {
        storage.load_all()?;

        let current = MonthKey::current();
        storage.budgets.migrate_legacy(current)?;

        let min = storage.expenses.oldest_expense_month()?.unwrap_or(current);
        let saved = storage.session.get()?;
        let cursor = MonthCursor::restore(saved, min, current);

        Ok(Self {
            storage,
            cursor,
            events: EventBus::new(),
        })
    }

    /// Read-only access to the underlying stores
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    // ----- subscriptions -----

    /// Register a callback on a notification channel
    pub fn subscribe<F>(&mut self, channel: Channel, callback: F) -> SubscriptionId
    where
        F: FnMut(&StateEvent) + 'static,
    {
        self.events.subscribe(channel, callback)
    }

    /// Remove a subscription. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ----- expense operations -----

    /// Add a new expense. Returns the stored record with its generated id.
    pub fn add_expense(
        &mut self,
        amount: f64,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> PocketbookResult<Expense> {
        let expense = Expense::new(amount, description, category, date);
        self.storage.expenses.add(expense.clone())?;
        self.persist_expenses()?;
        self.after_expense_mutation()?;
        Ok(expense)
    }

    /// Apply a patch to a stored expense. Ok(false) when the id is
    /// unknown.
    pub fn update_expense(
        &mut self,
        id: &ExpenseId,
        patch: &ExpensePatch,
    ) -> PocketbookResult<bool> {
        if !self.storage.expenses.update(id, patch)? {
            return Ok(false);
        }
        self.persist_expenses()?;
        self.after_expense_mutation()?;
        Ok(true)
    }

    /// Delete an expense. Ok(false) when the id is unknown.
    pub fn delete_expense(&mut self, id: &ExpenseId) -> PocketbookResult<bool> {
        if !self.storage.expenses.remove(id)? {
            return Ok(false);
        }
        self.persist_expenses()?;
        self.after_expense_mutation()?;
        Ok(true)
    }

    /// Delete several expenses at once. Returns how many existed.
    pub fn delete_expenses(&mut self, ids: &[ExpenseId]) -> PocketbookResult<usize> {
        let removed = self.storage.expenses.remove_many(ids)?;
        if removed == 0 {
            return Ok(0);
        }
        self.persist_expenses()?;
        self.after_expense_mutation()?;
        Ok(removed)
    }

    // ----- import / export -----

    /// Import expenses from CSV. Valid rows commit independently of
    /// failed ones; the outcome carries both counts and the per-row
    /// failures.
    pub fn import_csv_expenses<R: Read>(&mut self, reader: R) -> PocketbookResult<ImportOutcome> {
        let rows = parse_csv_expenses(reader, today())?;
        self.commit_import(rows)
    }

    /// Import expenses from a JSON array, with the same partial-success
    /// policy as CSV import
    pub fn import_json_expenses<R: Read>(&mut self, reader: R) -> PocketbookResult<ImportOutcome> {
        let rows = parse_json_expenses(reader, today())?;
        self.commit_import(rows)
    }

    fn commit_import(
        &mut self,
        rows: Vec<Result<Expense, ImportRowFailure>>,
    ) -> PocketbookResult<ImportOutcome> {
        let mut accepted = Vec::new();
        let mut failures = Vec::new();
        let mut seen_ids = HashSet::new();

        for (idx, row) in rows.into_iter().enumerate() {
            let row_number = idx + 1;
            match row {
                Ok(expense) => {
                    let duplicate_in_file = !seen_ids.insert(expense.id.clone());
                    if duplicate_in_file || self.storage.expenses.contains(&expense.id)? {
                        warn!(id = %expense.id, row = row_number, "skipping imported expense with duplicate id");
                        failures.push(ImportRowFailure {
                            row: row_number,
                            reason: format!("Duplicate expense id: {}", expense.id),
                        });
                    } else {
                        accepted.push(expense);
                    }
                }
                Err(failure) => failures.push(failure),
            }
        }

        let imported = self.storage.expenses.insert_many(accepted)?;
        if imported > 0 {
            self.persist_expenses()?;
            self.after_expense_mutation()?;
        }

        let outcome = ImportOutcome::new(imported, failures);
        info!(
            imported = outcome.imported,
            skipped = outcome.skipped,
            "expense import finished"
        );
        Ok(outcome)
    }

    /// Write every stored expense as CSV, newest first
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> PocketbookResult<()> {
        let expenses = self.all_expenses()?;
        export_expenses_csv(&expenses, writer)
    }

    /// Write every stored expense as a JSON array, newest first
    pub fn export_json<W: Write>(&self, writer: &mut W) -> PocketbookResult<()> {
        let expenses = self.all_expenses()?;
        export_expenses_json(&expenses, writer)
    }

    // ----- budget operations -----

    /// Set one category budget for the selected month
    pub fn set_budget(&mut self, category: Category, amount: f64) -> PocketbookResult<()> {
        self.set_budget_for(self.cursor.selected(), category, amount)
    }

    /// Set one category budget for a specific month
    pub fn set_budget_for(
        &mut self,
        month: MonthKey,
        category: Category,
        amount: f64,
    ) -> PocketbookResult<()> {
        self.storage.budgets.set_budget(month, category, amount)?;
        self.persist_budgets()?;
        self.notify_budget_update(month)
    }

    /// Zero every category budget for one month. Other months keep theirs.
    pub fn reset_budgets(&mut self, month: MonthKey) -> PocketbookResult<()> {
        self.storage.budgets.reset_all(month)?;
        self.persist_budgets()?;
        self.notify_budget_update(month)
    }

    /// Apply a named template to one month. The template's categories are
    /// overwritten; any others keep their prior value.
    pub fn apply_template(
        &mut self,
        name: &str,
        month: MonthKey,
    ) -> PocketbookResult<BudgetTemplate> {
        let template = BudgetTemplate::parse(name)
            .ok_or_else(|| PocketbookError::UnknownTemplate(name.to_string()))?;

        self.storage.budgets.apply_template(month, template)?;
        self.persist_budgets()?;
        self.notify_budget_update(month)?;
        Ok(template)
    }

    /// Copy the previous month's budgets onto a month. Ok(false) when the
    /// previous month has none.
    pub fn copy_budgets_from_previous_month(&mut self, month: MonthKey) -> PocketbookResult<bool> {
        if !self.storage.budgets.copy_from_previous_month(month)? {
            warn!(month = %month, "no previous-month budgets to copy");
            return Ok(false);
        }
        self.persist_budgets()?;
        self.notify_budget_update(month)?;
        Ok(true)
    }

    // ----- month navigation -----

    /// Move the view one month forward. Ok(false) at the current month.
    pub fn next_month(&mut self) -> PocketbookResult<bool> {
        if !self.cursor.next() {
            return Ok(false);
        }
        self.persist_session()?;
        self.notify_month_change()?;
        Ok(true)
    }

    /// Move the view one month back. Ok(false) at the oldest-expense
    /// month.
    pub fn previous_month(&mut self) -> PocketbookResult<bool> {
        if !self.cursor.previous() {
            return Ok(false);
        }
        self.persist_session()?;
        self.notify_month_change()?;
        Ok(true)
    }

    /// Jump the view to a specific month. Ok(false) outside the
    /// navigation bounds.
    pub fn select_month(&mut self, month: MonthKey) -> PocketbookResult<bool> {
        if !self.cursor.select(month) {
            return Ok(false);
        }
        self.persist_session()?;
        self.notify_month_change()?;
        Ok(true)
    }

    pub fn selected_month(&self) -> MonthKey {
        self.cursor.selected()
    }

    pub fn is_current_month(&self) -> bool {
        self.cursor.is_current_month()
    }

    pub fn can_go_next(&self) -> bool {
        self.cursor.can_go_next()
    }

    pub fn can_go_previous(&self) -> bool {
        self.cursor.can_go_previous()
    }

    /// First and last instant of the selected month
    pub fn date_range(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.cursor.date_range()
    }

    // ----- reads -----

    /// Every stored expense, newest first
    pub fn all_expenses(&self) -> PocketbookResult<Vec<Expense>> {
        self.storage.expenses.list_sorted(ExpenseSort::DateDesc)
    }

    /// Expenses in the selected month, newest first
    pub fn monthly_expenses(&self) -> PocketbookResult<Vec<Expense>> {
        self.storage.expenses.by_month(self.cursor.selected())
    }

    /// Expenses matching a filter, newest first
    pub fn filter_expenses(&self, filter: &ExpenseFilter) -> PocketbookResult<Vec<Expense>> {
        self.storage.expenses.filter(filter)
    }

    pub fn get_expense(&self, id: &ExpenseId) -> PocketbookResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Fetch an expense, erroring when the id is unknown
    pub fn require_expense(&self, id: &ExpenseId) -> PocketbookResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| PocketbookError::expense_not_found(id.as_str()))
    }

    /// Budgets for the selected month, every category present
    pub fn current_budgets(&self) -> PocketbookResult<BTreeMap<Category, f64>> {
        self.storage.budgets.get_all_for_month(self.cursor.selected())
    }

    /// Budget for one category in the selected month
    pub fn budget_for(&self, category: Category) -> PocketbookResult<f64> {
        self.storage.budgets.get(self.cursor.selected(), category)
    }

    /// Stats for the selected month, daily average anchored to the real
    /// current day
    pub fn monthly_stats(&self) -> PocketbookResult<MonthlyStats> {
        self.monthly_stats_anchored(AvgDailyAnchor::RealToday)
    }

    /// Stats for the selected month with an explicit daily-average anchor
    pub fn monthly_stats_anchored(&self, anchor: AvgDailyAnchor) -> PocketbookResult<MonthlyStats> {
        let expenses = self.monthly_expenses()?;
        let budgets = self.current_budgets()?;
        Ok(compute_stats(&expenses, &budgets, anchor, today()))
    }

    /// Budget alerts for the selected month, in canonical category order
    pub fn alerts(&self) -> PocketbookResult<Vec<BudgetAlert>> {
        let expenses = self.monthly_expenses()?;
        let budgets = self.current_budgets()?;
        Ok(generate_alerts(&expenses, &budgets))
    }

    /// Complete view of the current state
    pub fn state(&self) -> PocketbookResult<StateSnapshot> {
        let monthly_expenses = self.monthly_expenses()?;
        let budgets = self.current_budgets()?;
        let stats = compute_stats(
            &monthly_expenses,
            &budgets,
            AvgDailyAnchor::RealToday,
            today(),
        );

        Ok(StateSnapshot {
            month: self.cursor.selected(),
            expenses: self.all_expenses()?,
            monthly_expenses,
            budgets,
            stats,
        })
    }

    // ----- external changes -----

    /// Re-read the expense store from disk and re-notify. Covers another
    /// process writing the expense file.
    pub fn reload_expenses(&mut self) -> PocketbookResult<()> {
        self.storage.expenses.load()?;
        self.after_expense_mutation()
    }

    /// Re-read the budget store from disk and re-notify
    pub fn reload_budgets(&mut self) -> PocketbookResult<()> {
        self.storage.budgets.load()?;
        self.notify_budget_update(self.cursor.selected())
    }

    /// Re-read every store from disk and re-notify all channels
    pub fn reload_from_storage(&mut self) -> PocketbookResult<()> {
        self.reload_expenses()?;
        self.reload_budgets()
    }

    // ----- internal plumbing -----

    /// Recompute navigation bounds from the stored expenses. Returns true
    /// if re-clamping moved the selection.
    fn refresh_bounds(&mut self) -> PocketbookResult<bool> {
        let current = MonthKey::current();
        let min = self
            .storage
            .expenses
            .oldest_expense_month()?
            .unwrap_or(current);

        let before = self.cursor.selected();
        self.cursor.set_bounds(min, current);
        Ok(self.cursor.selected() != before)
    }

    fn after_expense_mutation(&mut self) -> PocketbookResult<()> {
        let moved = self.refresh_bounds()?;
        self.notify_expense_update()?;
        if moved {
            self.notify_month_change()?;
        }
        Ok(())
    }

    fn notify_expense_update(&mut self) -> PocketbookResult<()> {
        let event = StateEvent::ExpenseUpdate {
            expenses: self.all_expenses()?,
            monthly_expenses: self.monthly_expenses()?,
        };
        self.events.emit(&event);
        self.notify_state_change()
    }

    fn notify_budget_update(&mut self, month: MonthKey) -> PocketbookResult<()> {
        let event = StateEvent::BudgetUpdate {
            budgets: self.storage.budgets.get_all_for_month(month)?,
            month,
        };
        self.events.emit(&event);
        self.notify_state_change()
    }

    fn notify_month_change(&mut self) -> PocketbookResult<()> {
        let event = StateEvent::MonthChange {
            month: self.cursor.selected(),
        };
        self.events.emit(&event);
        self.notify_state_change()
    }

    fn notify_state_change(&mut self) -> PocketbookResult<()> {
        let snapshot = self.state()?;
        self.events.emit(&StateEvent::StateChange(snapshot));
        Ok(())
    }

    /// In-memory state keeps the mutation even when the write fails; the
    /// session stays usable and the caller sees the error.
    fn persist_expenses(&self) -> PocketbookResult<()> {
        self.storage.expenses.save().map_err(|e| {
            error!(error = %e, "failed to persist expenses");
            e
        })
    }

    fn persist_budgets(&self) -> PocketbookResult<()> {
        self.storage.budgets.save().map_err(|e| {
            error!(error = %e, "failed to persist budgets");
            e
        })
    }

    fn persist_session(&self) -> PocketbookResult<()> {
        self.storage.session.set(self.cursor.session_state())?;
        self.storage.session.save().map_err(|e| {
            error!(error = %e, "failed to persist session");
            e
        })
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

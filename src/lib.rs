//! Pocketbook - Personal expense and budget tracking
//!
//! This library provides the state and data layer for the Pocketbook
//! expense tracker: expense records, month-keyed budgets, derived
//! spending stats and alerts, bounded month navigation, and a state
//! coordinator that ties the stores together behind one facade with
//! typed change notifications.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path management for the data directory
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, categories, months, templates)
//! - `storage`: JSON file storage layer
//! - `services`: Import parsing
//! - `stats`: Derived spending stats and budget alerts
//! - `export`: CSV and JSON expense export
//! - `state`: Month cursor, event bus and the state coordinator
//!
//! # Example
//!
//! ```rust,ignore
//! use pocketbook::config::paths::PocketbookPaths;
//! use pocketbook::state::StateCoordinator;
//! use pocketbook::storage::Storage;
//!
//! let paths = PocketbookPaths::new()?;
//! let mut state = StateCoordinator::new(Storage::new(paths)?)?;
//! ```

use std::sync::Once;

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod state;
pub mod stats;
pub mod storage;

pub use error::{PocketbookError, PocketbookResult};
pub use models::{BudgetTemplate, Category, Expense, ExpenseId, ExpensePatch, MonthKey};
pub use services::{ImportOutcome, ImportRowFailure};
pub use state::{Channel, StateCoordinator, StateEvent, StateSnapshot};
pub use stats::{AlertSeverity, AvgDailyAnchor, BudgetAlert, MonthlyStats};
pub use storage::{ExpenseFilter, ExpenseSort, Storage};

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("pocketbook=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

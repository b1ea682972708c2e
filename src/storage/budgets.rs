//! Budget repository for JSON storage
//!
//! Budgets are month-scoped: monthly_budgets.json maps a month key
//! ("2025-7" = August 2025, zero-based month) to a map of lowercase
//! category keys and amounts. A flat single-month budgets.json written by
//! earlier revisions is migrated into the month-keyed layout on startup.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::error::PocketbookError;
use crate::models::{BudgetTemplate, Category, MonthKey};

use super::file_io::{read_json, remove_file_if_exists, write_json_atomic};

/// On-disk shape: month key -> category key -> amount
type BudgetFileData = BTreeMap<String, BTreeMap<String, f64>>;

/// Repository for per-month category budgets
pub struct BudgetStore {
    path: PathBuf,
    legacy_path: PathBuf,
    data: RwLock<HashMap<MonthKey, BTreeMap<Category, f64>>>,
}

impl BudgetStore {
    /// Create a new budget store
    pub fn new(path: PathBuf, legacy_path: PathBuf) -> Self {
        Self {
            path,
            legacy_path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    ///
    /// Unparseable month keys are skipped; category keys are normalized, so
    /// loading never fails on unexpected names.
    pub fn load(&self) -> Result<(), PocketbookError> {
        let file_data: BudgetFileData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for (raw_key, raw_budgets) in file_data {
            let Ok(month) = MonthKey::parse_storage_key(&raw_key) else {
                warn!(key = %raw_key, "skipping unparseable month key in budget file");
                continue;
            };
            data.insert(month, normalize_category_map(raw_budgets));
        }

        Ok(())
    }

    /// Save budgets to disk
    pub fn save(&self) -> Result<(), PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = to_file_data(&data);
        write_json_atomic(&self.path, &file_data)
    }

    /// Budget for one category in one month, 0 when unset
    pub fn get(&self, month: MonthKey, category: Category) -> Result<f64, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .get(&month)
            .and_then(|budgets| budgets.get(&category))
            .copied()
            .unwrap_or(0.0))
    }

    /// Budgets for every category in one month, 0 for unset categories
    pub fn get_all_for_month(
        &self,
        month: MonthKey,
    ) -> Result<BTreeMap<Category, f64>, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let stored = data.get(&month);
        let mut budgets = BTreeMap::new();
        for category in Category::ALL {
            let amount = stored
                .and_then(|b| b.get(&category))
                .copied()
                .unwrap_or(0.0);
            budgets.insert(category, amount);
        }
        Ok(budgets)
    }

    /// Set one category's budget for a month
    ///
    /// Negative and non-finite amounts are clamped to 0.
    pub fn set_budget(
        &self,
        month: MonthKey,
        category: Category,
        amount: f64,
    ) -> Result<(), PocketbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.entry(month)
            .or_default()
            .insert(category, clamp_amount(amount));
        Ok(())
    }

    /// Set every category's budget for a month to 0
    pub fn reset_all(&self, month: MonthKey) -> Result<(), PocketbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let budgets = data.entry(month).or_default();
        for category in Category::ALL {
            budgets.insert(category, 0.0);
        }
        Ok(())
    }

    /// Apply a template to a month
    ///
    /// Overwrites exactly the categories the template defines; anything else
    /// keeps its prior value.
    pub fn apply_template(
        &self,
        month: MonthKey,
        template: BudgetTemplate,
    ) -> Result<(), PocketbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let budgets = data.entry(month).or_default();
        for (category, amount) in template.amounts() {
            budgets.insert(category, amount);
        }
        Ok(())
    }

    /// Copy the previous month's budgets into a month
    ///
    /// Returns whether anything was copied; the previous month having no
    /// budgets at all is not an error. Existing budgets for the target
    /// month are replaced.
    pub fn copy_from_previous_month(&self, month: MonthKey) -> Result<bool, PocketbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let previous = month.prev();
        let Some(source) = data.get(&previous).filter(|b| !b.is_empty()).cloned() else {
            return Ok(false);
        };

        data.insert(month, source);
        Ok(true)
    }

    /// Migrate a legacy flat budget file into the month-keyed layout
    ///
    /// The legacy amounts land under `current`. Runs at startup and is
    /// idempotent: with no legacy file this is a no-op, and when month-keyed
    /// data already exists the legacy file is left untouched so nothing is
    /// silently overwritten. Persists the month-keyed file before deleting
    /// the legacy one.
    pub fn migrate_legacy(&self, current: MonthKey) -> Result<bool, PocketbookError> {
        if !self.legacy_path.exists() {
            return Ok(false);
        }

        {
            let data = self.data.read().map_err(|e| {
                PocketbookError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            if !data.is_empty() {
                warn!(
                    legacy = %self.legacy_path.display(),
                    "legacy budget file present alongside month-keyed budgets, leaving it in place"
                );
                return Ok(false);
            }
        }

        let raw: BTreeMap<String, f64> = read_json(&self.legacy_path)?;
        let budgets = normalize_category_map(raw);

        {
            let mut data = self.data.write().map_err(|e| {
                PocketbookError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            data.insert(current, budgets);
        }

        self.save()?;
        remove_file_if_exists(&self.legacy_path)?;

        info!(month = %current, "migrated legacy budget file into month-keyed storage");
        Ok(true)
    }
}

fn clamp_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        0.0
    }
}

/// Normalize raw category keys, clamping values and summing collisions
fn normalize_category_map(raw: BTreeMap<String, f64>) -> BTreeMap<Category, f64> {
    let mut budgets: BTreeMap<Category, f64> = BTreeMap::new();
    for (raw_key, amount) in raw {
        let category = Category::normalize(&raw_key);
        if Category::parse(&raw_key).is_none() {
            debug!(raw = %raw_key, category = category.key(), "normalized unknown budget category");
        }
        *budgets.entry(category).or_insert(0.0) += clamp_amount(amount);
    }
    budgets
}

fn to_file_data(data: &HashMap<MonthKey, BTreeMap<Category, f64>>) -> BudgetFileData {
    let mut file_data = BudgetFileData::new();
    for (month, budgets) in data {
        let entry: BTreeMap<String, f64> = budgets
            .iter()
            .map(|(category, amount)| (category.key().to_string(), *amount))
            .collect();
        file_data.insert(month.storage_key(), entry);
    }
    file_data
}

//! Session repository for JSON storage
//!
//! Remembers which month the user was viewing so the next launch can resume
//! there. Losing this file only costs the selection, never data.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::PocketbookError;
use crate::models::MonthKey;

use super::file_io::{read_json, write_json_atomic};

/// The persisted view state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Zero-based month index (0 = January)
    pub month: u32,
    /// Calendar year
    pub year: i32,
}

impl SessionState {
    /// Capture a month selection
    pub fn from_month(month: MonthKey) -> Self {
        Self {
            month: month.month0,
            year: month.year,
        }
    }

    /// Convert back to a month key, rejecting out-of-range month indexes
    pub fn month_key(&self) -> Option<MonthKey> {
        if self.month > 11 {
            return None;
        }
        Some(MonthKey::new(self.year, self.month))
    }
}

/// Repository for the persisted session
pub struct SessionStore {
    path: PathBuf,
    data: RwLock<Option<SessionState>>,
}

impl SessionStore {
    /// Create a new session store
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(None),
        }
    }

    /// Load the session from disk; a missing file means no saved session
    pub fn load(&self) -> Result<(), PocketbookError> {
        let state: Option<SessionState> = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = state;
        Ok(())
    }

    /// Save the session to disk; nothing is written while no session is set
    pub fn save(&self) -> Result<(), PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        match *data {
            Some(state) => write_json_atomic(&self.path, &state),
            None => Ok(()),
        }
    }

    /// Get the current session
    pub fn get(&self) -> Result<Option<SessionState>, PocketbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(*data)
    }

    /// Replace the current session
    pub fn set(&self, state: SessionState) -> Result<(), PocketbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = Some(state);
        Ok(())
    }
}

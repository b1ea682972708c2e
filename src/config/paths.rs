//! Path management for pocketbook
//!
//! Provides platform-appropriate path resolution for the persisted data files.
//!
//! ## Path Resolution Order
//!
//! 1. `POCKETBOOK_DATA_DIR` environment variable (if set)
//! 2. Platform data directory (e.g. `~/.local/share/pocketbook` on Linux,
//!    `~/Library/Application Support/pocketbook` on macOS)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::PocketbookError;

/// Manages all paths used by pocketbook
#[derive(Debug, Clone)]
pub struct PocketbookPaths {
    /// Base directory for all pocketbook data
    base_dir: PathBuf,
}

impl PocketbookPaths {
    /// Create a new PocketbookPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    pub fn new() -> Result<Self, PocketbookError> {
        let base_dir = if let Ok(custom) = std::env::var("POCKETBOOK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create PocketbookPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to expenses.json (the full expense collection)
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Get the path to monthly_budgets.json (budgets keyed by month)
    pub fn monthly_budgets_file(&self) -> PathBuf {
        self.data_dir().join("monthly_budgets.json")
    }

    /// Get the path to the legacy flat budgets.json, read once for migration
    pub fn legacy_budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Get the path to session.json (the persisted month cursor)
    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), PocketbookError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PocketbookError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PocketbookError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory from the platform conventions
fn resolve_default_path() -> Result<PathBuf, PocketbookError> {
    let proj = ProjectDirs::from("", "", "pocketbook").ok_or_else(|| {
        PocketbookError::Io("Could not determine platform data directory".into())
    })?;
    Ok(proj.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        std::env::set_var("POCKETBOOK_DATA_DIR", custom_path);

        let paths = PocketbookPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        std::env::remove_var("POCKETBOOK_DATA_DIR");
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let data = temp_dir.path().join("data");

        assert_eq!(paths.expenses_file(), data.join("expenses.json"));
        assert_eq!(paths.monthly_budgets_file(), data.join("monthly_budgets.json"));
        assert_eq!(paths.legacy_budgets_file(), data.join("budgets.json"));
        assert_eq!(paths.session_file(), data.join("session.json"));
    }
}

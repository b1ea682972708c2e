//! Strongly-typed ID wrapper for expenses
//!
//! The wrapper keeps expense ids distinct from plain strings at compile time.
//! Ids are opaque: freshly created expenses get a random UUID string, while
//! imported records keep whatever id the source file carried.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an [`Expense`](crate::models::Expense)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an id supplied by an external source (import files, persisted data)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ExpenseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ExpenseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let id1 = ExpenseId::new();
        let id2 = ExpenseId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_supplied_id_is_preserved() {
        let id = ExpenseId::from_string("legacy-42");
        assert_eq!(id.as_str(), "legacy-42");
        assert_eq!(id.to_string(), "legacy-42");
    }

    #[test]
    fn test_id_serialization_is_transparent() {
        let id = ExpenseId::from_string("abc-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc-123\"");

        let deserialized: ExpenseId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

//! Expense categories
//!
//! Categories form a closed set. Every raw category string entering the
//! system (persisted files, CSV/JSON imports) passes through
//! [`Category::normalize`], so stored data only ever contains canonical
//! values.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The fixed set of expense categories
///
/// Variant order is the canonical order: it drives alert emission and the
/// iteration order of budget maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Housing,
    Food,
    Transportation,
    Health,
    Entertainment,
    Finances,
    Other,
}

/// Substring patterns for mapping free-text category names onto the fixed
/// set. Earlier entries win; unmatched input falls back to `Other`.
const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("hous", Category::Housing),
    ("rent", Category::Housing),
    ("mortgage", Category::Housing),
    ("apartment", Category::Housing),
    ("food", Category::Food),
    ("grocer", Category::Food),
    ("dining", Category::Food),
    ("restaurant", Category::Food),
    ("meal", Category::Food),
    ("transport", Category::Transportation),
    ("auto", Category::Transportation),
    ("vehicle", Category::Transportation),
    ("gas", Category::Transportation),
    ("fuel", Category::Transportation),
    ("transit", Category::Transportation),
    ("parking", Category::Transportation),
    ("taxi", Category::Transportation),
    ("health", Category::Health),
    ("medical", Category::Health),
    ("doctor", Category::Health),
    ("pharmacy", Category::Health),
    ("dental", Category::Health),
    ("entertain", Category::Entertainment),
    ("movie", Category::Entertainment),
    ("game", Category::Entertainment),
    ("music", Category::Entertainment),
    ("stream", Category::Entertainment),
    ("financ", Category::Finances),
    ("bank", Category::Finances),
    ("invest", Category::Finances),
    ("insurance", Category::Finances),
    ("saving", Category::Finances),
    ("loan", Category::Finances),
    ("debt", Category::Finances),
];

impl Category {
    /// All categories in canonical order
    pub const ALL: [Self; 7] = [
        Self::Housing,
        Self::Food,
        Self::Transportation,
        Self::Health,
        Self::Entertainment,
        Self::Finances,
        Self::Other,
    ];

    /// Lowercase key, used in persisted budget maps and category totals
    pub fn key(&self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Health => "health",
            Self::Entertainment => "entertainment",
            Self::Finances => "finances",
            Self::Other => "other",
        }
    }

    /// Canonical capitalization, used in expense records and exports
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Health => "Health",
            Self::Entertainment => "Entertainment",
            Self::Finances => "Finances",
            Self::Other => "Other",
        }
    }

    /// Display-only icon metadata
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Housing => "🏠",
            Self::Food => "🍔",
            Self::Transportation => "🚗",
            Self::Health => "🏥",
            Self::Entertainment => "🎬",
            Self::Finances => "💰",
            Self::Other => "📦",
        }
    }

    /// Parse an exact category name, case-insensitively
    ///
    /// Returns `None` for anything outside the fixed set. Use this on direct
    /// user entry where an unknown category is a validation failure;
    /// [`Category::normalize`] is the forgiving path for imports.
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL.iter().copied().find(|c| c.key() == lowered)
    }

    /// Map a free-text category name onto the fixed set
    ///
    /// Tries an exact (case-insensitive) match first, then scans the keyword
    /// table, and falls back to `Other`. This is the single entry point for
    /// raw strings from imports and persisted files.
    pub fn normalize(s: &str) -> Self {
        if let Some(category) = Self::parse(s) {
            return category;
        }

        let lowered = s.trim().to_lowercase();
        for (keyword, category) in CATEGORY_KEYWORDS {
            if lowered.contains(keyword) {
                return *category;
            }
        }

        Self::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::normalize(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_in_canonical_order() {
        let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec![
                "housing",
                "food",
                "transportation",
                "health",
                "entertainment",
                "finances",
                "other"
            ]
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Category::parse("Food"), Some(Category::Food));
        assert_eq!(Category::parse("  HOUSING  "), Some(Category::Housing));
        assert_eq!(Category::parse("groceries"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_normalize_exact_match() {
        assert_eq!(Category::normalize("entertainment"), Category::Entertainment);
        assert_eq!(Category::normalize("Finances"), Category::Finances);
    }

    #[test]
    fn test_normalize_keywords() {
        assert_eq!(Category::normalize("Healthcare"), Category::Health);
        assert_eq!(Category::normalize("Groceries"), Category::Food);
        assert_eq!(Category::normalize("rent payment"), Category::Housing);
        assert_eq!(Category::normalize("Gas & Fuel"), Category::Transportation);
        assert_eq!(Category::normalize("Streaming services"), Category::Entertainment);
        assert_eq!(Category::normalize("Bank fees"), Category::Finances);
    }

    #[test]
    fn test_normalize_unmatched_defaults_to_other() {
        assert_eq!(Category::normalize("llama rides"), Category::Other);
        assert_eq!(Category::normalize(""), Category::Other);
    }

    #[test]
    fn test_serialize_canonical_form() {
        let json = serde_json::to_string(&Category::Food).unwrap();
        assert_eq!(json, "\"Food\"");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let category: Category = serde_json::from_str("\"food\"").unwrap();
        assert_eq!(category, Category::Food);

        let legacy: Category = serde_json::from_str("\"Healthcare\"").unwrap();
        assert_eq!(legacy, Category::Health);

        let unknown: Category = serde_json::from_str("\"Donations\"").unwrap();
        assert_eq!(unknown, Category::Other);
    }

    #[test]
    fn test_ordering_follows_canonical_order() {
        assert!(Category::Housing < Category::Food);
        assert!(Category::Finances < Category::Other);
    }
}

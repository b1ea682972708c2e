//! Budget templates
//!
//! Prebuilt monthly budget presets that can be applied to a month in one
//! step. Amounts are fixed config data, not user state.

use std::collections::BTreeMap;
use std::fmt;

use super::category::Category;

/// A prebuilt budget preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetTemplate {
    /// Lower limits, geared toward saving
    Conservative,
    /// Middle-of-the-road limits
    Balanced,
    /// Higher limits for discretionary spending
    Flexible,
}

const CONSERVATIVE_AMOUNTS: &[(Category, f64)] = &[
    (Category::Housing, 1200.0),
    (Category::Food, 400.0),
    (Category::Transportation, 200.0),
    (Category::Health, 150.0),
    (Category::Entertainment, 100.0),
    (Category::Finances, 100.0),
    (Category::Other, 100.0),
];

const BALANCED_AMOUNTS: &[(Category, f64)] = &[
    (Category::Housing, 1500.0),
    (Category::Food, 600.0),
    (Category::Transportation, 300.0),
    (Category::Health, 200.0),
    (Category::Entertainment, 200.0),
    (Category::Finances, 150.0),
    (Category::Other, 200.0),
];

const FLEXIBLE_AMOUNTS: &[(Category, f64)] = &[
    (Category::Housing, 1800.0),
    (Category::Food, 800.0),
    (Category::Transportation, 400.0),
    (Category::Health, 250.0),
    (Category::Entertainment, 400.0),
    (Category::Finances, 200.0),
    (Category::Other, 300.0),
];

impl BudgetTemplate {
    /// All templates, in presentation order
    pub const ALL: [BudgetTemplate; 3] = [
        BudgetTemplate::Conservative,
        BudgetTemplate::Balanced,
        BudgetTemplate::Flexible,
    ];

    /// Lowercase identifier used to select a template
    pub fn key(&self) -> &'static str {
        match self {
            BudgetTemplate::Conservative => "conservative",
            BudgetTemplate::Balanced => "balanced",
            BudgetTemplate::Flexible => "flexible",
        }
    }

    /// Capitalized name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            BudgetTemplate::Conservative => "Conservative",
            BudgetTemplate::Balanced => "Balanced",
            BudgetTemplate::Flexible => "Flexible",
        }
    }

    /// Short blurb describing who the template is for
    pub fn description(&self) -> &'static str {
        match self {
            BudgetTemplate::Conservative => "Perfect for saving-focused budgets",
            BudgetTemplate::Balanced => "Healthy mix of spending and saving",
            BudgetTemplate::Flexible => "Higher limits for lifestyle spending",
        }
    }

    fn amount_table(&self) -> &'static [(Category, f64)] {
        match self {
            BudgetTemplate::Conservative => CONSERVATIVE_AMOUNTS,
            BudgetTemplate::Balanced => BALANCED_AMOUNTS,
            BudgetTemplate::Flexible => FLEXIBLE_AMOUNTS,
        }
    }

    /// Budget amount for every category
    pub fn amounts(&self) -> BTreeMap<Category, f64> {
        self.amount_table().iter().copied().collect()
    }

    /// Budget amount for one category
    pub fn amount_for(&self, category: Category) -> f64 {
        self.amount_table()
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, amount)| *amount)
            .unwrap_or(0.0)
    }

    /// Sum of all category amounts
    pub fn total(&self) -> f64 {
        self.amount_table().iter().map(|(_, amount)| amount).sum()
    }

    /// Look up a template by name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|template| template.key() == lowered)
            .copied()
    }
}

impl fmt::Display for BudgetTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_covers_every_category() {
        for template in BudgetTemplate::ALL {
            let amounts = template.amounts();
            assert_eq!(amounts.len(), Category::ALL.len(), "{}", template);
            for category in Category::ALL {
                assert!(amounts.contains_key(&category));
            }
        }
    }

    #[test]
    fn test_template_totals() {
        assert_eq!(BudgetTemplate::Conservative.total(), 2250.0);
        assert_eq!(BudgetTemplate::Balanced.total(), 3150.0);
        assert_eq!(BudgetTemplate::Flexible.total(), 4150.0);
    }

    #[test]
    fn test_amount_for() {
        assert_eq!(
            BudgetTemplate::Conservative.amount_for(Category::Housing),
            1200.0
        );
        assert_eq!(BudgetTemplate::Balanced.amount_for(Category::Food), 600.0);
        assert_eq!(
            BudgetTemplate::Flexible.amount_for(Category::Entertainment),
            400.0
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            BudgetTemplate::parse("balanced"),
            Some(BudgetTemplate::Balanced)
        );
        assert_eq!(
            BudgetTemplate::parse("  Conservative "),
            Some(BudgetTemplate::Conservative)
        );
        assert_eq!(
            BudgetTemplate::parse("FLEXIBLE"),
            Some(BudgetTemplate::Flexible)
        );
        assert_eq!(BudgetTemplate::parse("aggressive"), None);
    }

    #[test]
    fn test_display_metadata() {
        assert_eq!(BudgetTemplate::Balanced.display_name(), "Balanced");
        assert_eq!(
            BudgetTemplate::Balanced.description(),
            "Healthy mix of spending and saving"
        );
    }
}

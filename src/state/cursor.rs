//! Month navigation cursor
//!
//! Tracks the currently viewed month and enforces the navigation bounds:
//! no earlier than the oldest stored expense, no later than the real
//! current month. Navigation past a bound is rejected without changing
//! the selection.

use chrono::NaiveDateTime;

use crate::models::MonthKey;
use crate::storage::SessionState;

/// The currently viewed month, bounded navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    selected: MonthKey,
    min: MonthKey,
    max: MonthKey,
}

impl MonthCursor {
    /// Cursor positioned at `max` (the current month)
    pub fn new(min: MonthKey, max: MonthKey) -> Self {
        let min = min.min(max);
        Self {
            selected: max,
            min,
            max,
        }
    }

    /// Cursor restored from a saved session selection
    ///
    /// A saved month outside the bounds is clamped rather than rejected,
    /// which covers expenses deleted since the selection was saved. With
    /// no usable saved state the cursor starts at the current month.
    pub fn restore(saved: Option<SessionState>, min: MonthKey, max: MonthKey) -> Self {
        let mut cursor = Self::new(min, max);
        if let Some(month) = saved.and_then(|s| s.month_key()) {
            cursor.selected = month.clamp(cursor.min, cursor.max);
        }
        cursor
    }

    /// Advance one month. Returns false (selection unchanged) at the
    /// current month.
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.selected = self.selected.next();
        true
    }

    /// Go back one month. Returns false (selection unchanged) at the
    /// oldest-expense month.
    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.selected = self.selected.prev();
        true
    }

    /// Jump straight to a month. Returns false (selection unchanged) if
    /// the month lies outside the bounds.
    pub fn select(&mut self, month: MonthKey) -> bool {
        if month < self.min || month > self.max {
            return false;
        }
        self.selected = month;
        true
    }

    pub fn can_go_next(&self) -> bool {
        self.selected < self.max
    }

    pub fn can_go_previous(&self) -> bool {
        self.selected > self.min
    }

    /// Replace the bounds, re-clamping the selection into them
    pub fn set_bounds(&mut self, min: MonthKey, max: MonthKey) {
        self.min = min.min(max);
        self.max = max;
        self.selected = self.selected.clamp(self.min, self.max);
    }

    pub fn selected(&self) -> MonthKey {
        self.selected
    }

    /// Whether the selection is the real current month
    pub fn is_current_month(&self) -> bool {
        self.selected == self.max
    }

    /// First instant of the 1st through the last instant of the final day
    /// of the selected month
    pub fn date_range(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.selected.date_range()
    }

    /// Session document for the current selection
    pub fn session_state(&self) -> SessionState {
        SessionState::from_month(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_current_month() {
        let cursor = MonthCursor::new(MonthKey::new(2025, 1), MonthKey::new(2025, 7));
        assert_eq!(cursor.selected(), MonthKey::new(2025, 7));
        assert!(cursor.is_current_month());
    }

    #[test]
    fn test_previous_stops_at_oldest_expense_month() {
        // viewing April 2025, earliest expense in February 2025
        let mut cursor = MonthCursor::new(MonthKey::new(2025, 1), MonthKey::new(2025, 3));

        assert!(cursor.previous());
        assert!(cursor.previous());
        assert_eq!(cursor.selected(), MonthKey::new(2025, 1));

        assert!(!cursor.previous());
        assert_eq!(cursor.selected(), MonthKey::new(2025, 1));
    }

    #[test]
    fn test_next_stops_at_current_month() {
        let mut cursor = MonthCursor::new(MonthKey::new(2025, 1), MonthKey::new(2025, 3));
        assert!(!cursor.next());

        cursor.previous();
        assert!(cursor.next());
        assert_eq!(cursor.selected(), MonthKey::new(2025, 3));
    }

    #[test]
    fn test_select_enforces_bounds() {
        let mut cursor = MonthCursor::new(MonthKey::new(2025, 1), MonthKey::new(2025, 7));

        assert!(cursor.select(MonthKey::new(2025, 4)));
        assert_eq!(cursor.selected(), MonthKey::new(2025, 4));

        assert!(!cursor.select(MonthKey::new(2025, 0)));
        assert!(!cursor.select(MonthKey::new(2025, 8)));
        assert_eq!(cursor.selected(), MonthKey::new(2025, 4));
    }

    #[test]
    fn test_navigation_rolls_year() {
        let mut cursor = MonthCursor::new(MonthKey::new(2024, 10), MonthKey::new(2025, 1));

        assert!(cursor.previous());
        assert!(cursor.previous());
        assert_eq!(cursor.selected(), MonthKey::new(2024, 11));

        assert!(cursor.next());
        assert_eq!(cursor.selected(), MonthKey::new(2025, 0));
    }

    #[test]
    fn test_restore_uses_saved_selection() {
        let saved = Some(SessionState::from_month(MonthKey::new(2025, 2)));
        let cursor = MonthCursor::restore(saved, MonthKey::new(2025, 1), MonthKey::new(2025, 7));
        assert_eq!(cursor.selected(), MonthKey::new(2025, 2));
        assert!(!cursor.is_current_month());
    }

    #[test]
    fn test_restore_clamps_out_of_bounds_selection() {
        let min = MonthKey::new(2025, 1);
        let max = MonthKey::new(2025, 7);

        let before = Some(SessionState::from_month(MonthKey::new(2024, 0)));
        assert_eq!(MonthCursor::restore(before, min, max).selected(), min);

        let after = Some(SessionState::from_month(MonthKey::new(2026, 3)));
        assert_eq!(MonthCursor::restore(after, min, max).selected(), max);

        assert_eq!(MonthCursor::restore(None, min, max).selected(), max);
    }

    #[test]
    fn test_set_bounds_reclamps_selection() {
        let mut cursor = MonthCursor::new(MonthKey::new(2025, 0), MonthKey::new(2025, 7));
        cursor.previous();
        cursor.previous();
        assert_eq!(cursor.selected(), MonthKey::new(2025, 5));

        // oldest expense removed, floor moves forward past the selection
        cursor.set_bounds(MonthKey::new(2025, 6), MonthKey::new(2025, 7));
        assert_eq!(cursor.selected(), MonthKey::new(2025, 6));
    }

    #[test]
    fn test_min_never_exceeds_max() {
        // a lone future-dated expense would put the floor past the
        // current month
        let cursor = MonthCursor::new(MonthKey::new(2026, 0), MonthKey::new(2025, 7));
        assert_eq!(cursor.selected(), MonthKey::new(2025, 7));
        assert!(!cursor.can_go_previous());
        assert!(!cursor.can_go_next());
    }

    #[test]
    fn test_date_range_for_selection() {
        let mut cursor = MonthCursor::new(MonthKey::new(2024, 0), MonthKey::new(2024, 2));
        cursor.previous();

        let (start, end) = cursor.date_range();
        assert_eq!(start.to_string(), "2024-02-01 00:00:00");
        assert_eq!(end.to_string(), "2024-02-29 23:59:59");
    }

    #[test]
    fn test_session_state_round_trip() {
        let mut cursor = MonthCursor::new(MonthKey::new(2025, 0), MonthKey::new(2025, 7));
        cursor.previous();

        let saved = cursor.session_state();
        assert_eq!(saved.month, 6);
        assert_eq!(saved.year, 2025);

        let restored =
            MonthCursor::restore(Some(saved), MonthKey::new(2025, 0), MonthKey::new(2025, 7));
        assert_eq!(restored.selected(), cursor.selected());
    }
}

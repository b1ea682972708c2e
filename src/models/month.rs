//! Month key representation
//!
//! A [`MonthKey`] identifies one calendar month's scope for budgets, the
//! navigation cursor, and month-filtered expense queries. Months are
//! zero-based (0 = January) to match the persisted month keys and the
//! session document.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A (year, month) pair identifying one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    /// Calendar year
    pub year: i32,
    /// Zero-based month index (0 = January)
    pub month0: u32,
}

impl MonthKey {
    /// Create a month key. `month0` is zero-based (0 = January, 11 = December).
    pub fn new(year: i32, month0: u32) -> Self {
        Self { year, month0 }
    }

    /// The month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// The current wall-clock month
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// First day of the month
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap())
    }

    /// Last day of the month, accounting for month length and leap years
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    /// Number of days in the month
    pub fn days_in_month(&self) -> u32 {
        self.end_date().day()
    }

    /// First instant of the 1st through the last instant of the final day
    pub fn date_range(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.start_date().and_time(NaiveTime::MIN);
        let end = self
            .end_date()
            .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        (start, end)
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    /// The following month, rolling the year on overflow
    pub fn next(&self) -> Self {
        if self.month0 >= 11 {
            Self {
                year: self.year + 1,
                month0: 0,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 + 1,
            }
        }
    }

    /// The preceding month, rolling the year on underflow
    pub fn prev(&self) -> Self {
        if self.month0 == 0 {
            Self {
                year: self.year - 1,
                month0: 11,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 - 1,
            }
        }
    }

    /// Key used in the persisted monthly-budget document, e.g. `"2025-7"`
    /// for August 2025 (month index is zero-based)
    pub fn storage_key(&self) -> String {
        format!("{}-{}", self.year, self.month0)
    }

    /// Parse a persisted month key
    pub fn parse_storage_key(s: &str) -> Result<Self, MonthKeyParseError> {
        let (year_part, month_part) = s
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| MonthKeyParseError::InvalidFormat(s.to_string()))?;

        let year: i32 = year_part
            .parse()
            .map_err(|_| MonthKeyParseError::InvalidFormat(s.to_string()))?;
        let month0: u32 = month_part
            .parse()
            .map_err(|_| MonthKeyParseError::InvalidFormat(s.to_string()))?;

        if month0 > 11 {
            return Err(MonthKeyParseError::InvalidMonth(month0));
        }

        Ok(Self { year, month0 })
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = MONTH_NAMES
            .get(self.month0 as usize)
            .copied()
            .unwrap_or("Unknown");
        write!(f, "{} {}", name, self.year)
    }
}

/// Error type for month key parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthKeyParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for MonthKeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthKeyParseError::InvalidFormat(s) => write!(f, "Invalid month key: {}", s),
            MonthKeyParseError::InvalidMonth(m) => write!(f, "Invalid month index: {}", m),
        }
    }
}

impl std::error::Error for MonthKeyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
        let key = MonthKey::from_date(date);
        assert_eq!(key, MonthKey::new(2025, 7));
    }

    #[test]
    fn test_next_rolls_year() {
        assert_eq!(MonthKey::new(2024, 11).next(), MonthKey::new(2025, 0));
        assert_eq!(MonthKey::new(2025, 3).next(), MonthKey::new(2025, 4));
    }

    #[test]
    fn test_prev_rolls_year() {
        assert_eq!(MonthKey::new(2025, 0).prev(), MonthKey::new(2024, 11));
        assert_eq!(MonthKey::new(2025, 4).prev(), MonthKey::new(2025, 3));
    }

    #[test]
    fn test_storage_key_round_trip() {
        let key = MonthKey::new(2025, 0);
        assert_eq!(key.storage_key(), "2025-0");
        assert_eq!(MonthKey::parse_storage_key("2025-0").unwrap(), key);

        let august = MonthKey::parse_storage_key("2025-7").unwrap();
        assert_eq!(august, MonthKey::new(2025, 7));
    }

    #[test]
    fn test_parse_storage_key_rejects_bad_input() {
        assert!(matches!(
            MonthKey::parse_storage_key("2025"),
            Err(MonthKeyParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            MonthKey::parse_storage_key("2025-12"),
            Err(MonthKeyParseError::InvalidMonth(12))
        ));
        assert!(matches!(
            MonthKey::parse_storage_key("2025-abc"),
            Err(MonthKeyParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_end_date_handles_month_lengths() {
        // February in a leap year
        assert_eq!(
            MonthKey::new(2024, 1).end_date(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        // February in a non-leap year
        assert_eq!(
            MonthKey::new(2025, 1).end_date(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(MonthKey::new(2025, 3).days_in_month(), 30);
        assert_eq!(MonthKey::new(2025, 11).days_in_month(), 31);
    }

    #[test]
    fn test_date_range_spans_whole_month() {
        let (start, end) = MonthKey::new(2025, 4).date_range();
        assert_eq!(start.to_string(), "2025-05-01 00:00:00");
        assert_eq!(end.to_string(), "2025-05-31 23:59:59");
    }

    #[test]
    fn test_contains_boundary_dates() {
        let key = MonthKey::new(2024, 1);
        assert!(key.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert!(key.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!key.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!key.contains(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()));
    }

    #[test]
    fn test_display_label() {
        assert_eq!(MonthKey::new(2025, 7).to_string(), "August 2025");
        assert_eq!(MonthKey::new(2024, 0).to_string(), "January 2024");
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(MonthKey::new(2024, 11) < MonthKey::new(2025, 0));
        assert!(MonthKey::new(2025, 2) < MonthKey::new(2025, 3));
    }
}

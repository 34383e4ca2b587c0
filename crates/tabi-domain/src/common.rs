//! Shared traits, date helpers, and enums for itinerary primitives.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Converts an entity into a one-line label for listings.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Whole calendar days from `start` to `end`. Negative when `end` precedes `start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Inclusive day span of a trip, clamped to at least one day.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> usize {
    (days_between(start, end) + 1).max(1) as usize
}

/// Returns `start` shifted forward by `offset` days.
pub fn nth_day(start: NaiveDate, offset: usize) -> NaiveDate {
    start + Duration::days(offset as i64)
}

/// Splits plans into those still ahead of the traveller and those already over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TripFilter {
    #[default]
    Upcoming,
    Past,
    All,
}

impl TripFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "upcoming" | "next" | "future" => Some(TripFilter::Upcoming),
            "past" | "done" => Some(TripFilter::Past),
            "all" => Some(TripFilter::All),
            _ => None,
        }
    }

    /// Upcoming trips end today or later; past trips ended before today.
    pub fn matches(self, end_date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            TripFilter::Upcoming => end_date >= today,
            TripFilter::Past => end_date < today,
            TripFilter::All => true,
        }
    }
}

impl fmt::Display for TripFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TripFilter::Upcoming => "Upcoming",
            TripFilter::Past => "Past",
            TripFilter::All => "All",
        };
        f.write_str(label)
    }
}

/// First eight hex characters of an identifier, used in listings.
pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_count_is_inclusive_and_clamped() {
        assert_eq!(inclusive_day_count(date(2025, 5, 1), date(2025, 5, 1)), 1);
        assert_eq!(inclusive_day_count(date(2025, 5, 1), date(2025, 5, 3)), 3);
        assert_eq!(inclusive_day_count(date(2025, 5, 3), date(2025, 5, 1)), 1);
    }

    #[test]
    fn day_count_spans_month_and_leap_day() {
        assert_eq!(inclusive_day_count(date(2024, 2, 27), date(2024, 3, 2)), 5);
        assert_eq!(nth_day(date(2024, 2, 28), 1), date(2024, 2, 29));
    }

    #[test]
    fn filter_splits_on_end_date() {
        let today = date(2025, 6, 10);
        assert!(TripFilter::Upcoming.matches(today, today));
        assert!(!TripFilter::Past.matches(today, today));
        assert!(TripFilter::Past.matches(date(2025, 6, 9), today));
        assert_eq!(TripFilter::parse(" PAST "), Some(TripFilter::Past));
        assert_eq!(TripFilter::parse("someday"), None);
    }
}

//! Circular-week utilities.
//!
//! All day-of-week arithmetic in the crate goes through this module: one
//! canonical Sunday-first ordering, one mod-7 distance, one roll operation.

use chrono::{Datelike, Weekday};

/// Day names in canonical Sunday-first order.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Canonical index (0 = Sunday .. 6 = Saturday) for a chrono weekday.
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

/// Canonical index for the weekday of any date-like value.
pub fn date_index<D: Datelike>(date: &D) -> usize {
    weekday_index(date.weekday())
}

/// Name for a canonical day index. Indices are taken mod 7.
pub fn day_name(index: usize) -> &'static str {
    DAY_NAMES[index % 7]
}

/// Canonical index for a day name, `None` for unrecognized names.
pub fn day_index(name: &str) -> Option<usize> {
    DAY_NAMES.iter().position(|d| d.eq_ignore_ascii_case(name))
}

/// Circular distance in days from `from` to the next occurrence of `to`.
/// Always in `0..7`; zero means the same day.
pub fn days_until(from: usize, to: usize) -> u32 {
    (((to % 7) as i64 - (from % 7) as i64).rem_euclid(7)) as u32
}

/// Roll a day index forward (positive) or backward (negative) around the week.
pub fn roll(index: usize, delta: i64) -> usize {
    ((index % 7) as i64 + delta).rem_euclid(7) as usize
}

/// Whether the index falls on Saturday or Sunday.
pub fn is_weekend(index: usize) -> bool {
    matches!(index % 7, 0 | 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_index_sunday_first() {
        assert_eq!(weekday_index(Weekday::Sun), 0);
        assert_eq!(weekday_index(Weekday::Wed), 3);
        assert_eq!(weekday_index(Weekday::Sat), 6);
    }

    #[test]
    fn test_days_until_is_circular() {
        assert_eq!(days_until(1, 1), 0);
        assert_eq!(days_until(1, 3), 2);
        assert_eq!(days_until(5, 1), 3); // Friday -> Monday
        assert_eq!(days_until(6, 0), 1); // Saturday -> Sunday
    }

    #[test]
    fn test_roll_wraps_both_directions() {
        assert_eq!(roll(0, -1), 6);
        assert_eq!(roll(6, 1), 0);
        assert_eq!(roll(2, -9), 0);
        assert_eq!(roll(2, 16), 4);
    }

    #[test]
    fn test_day_name_lookup_round_trip() {
        for (i, name) in DAY_NAMES.iter().enumerate() {
            assert_eq!(day_index(name), Some(i));
            assert_eq!(day_name(i), *name);
        }
        assert_eq!(day_index("tuesday"), Some(2));
        assert_eq!(day_index("Funday"), None);
    }

    #[test]
    fn test_is_weekend() {
        assert!(is_weekend(0));
        assert!(is_weekend(6));
        assert!(!is_weekend(5));
    }
}

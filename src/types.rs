use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DECEMBER, FEBRUARY, FEBRUARY_DAYS_LEAP, FORCED_LEAP_YEAR, GREGORIAN_CYCLE, JANUARY,
    LEAP_YEAR_CYCLE, MAX_MONTH, MIN_DAY, MONTHS_PER_QUARTER,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Day of the week, numbered from Monday = 0 to Sunday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
pub enum Weekday {
    #[display(fmt = "Monday")]
    Monday,
    #[display(fmt = "Tuesday")]
    Tuesday,
    #[display(fmt = "Wednesday")]
    Wednesday,
    #[display(fmt = "Thursday")]
    Thursday,
    #[display(fmt = "Friday")]
    Friday,
    #[display(fmt = "Saturday")]
    Saturday,
    #[display(fmt = "Sunday")]
    Sunday,
}

impl Weekday {
    /// Maps a day count to its weekday: `(day_count + 5) mod 7`.
    pub const fn from_day_count(day_count: i64) -> Self {
        Self::from_index((day_count + 5).rem_euclid(7) as u8)
    }

    /// Index 0..=6; values past 6 wrap.
    pub const fn from_index(index: u8) -> Self {
        match index % 7 {
            0 => Self::Monday,
            1 => Self::Tuesday,
            2 => Self::Wednesday,
            3 => Self::Thursday,
            4 => Self::Friday,
            5 => Self::Saturday,
            _ => Self::Sunday,
        }
    }

    /// Returns 0 for Monday through 6 for Sunday
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

/// A signed, fractional number of days between two serial dates.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, From, Into, Deref, Serialize, Deserialize)]
#[display(fmt = "{_0} days")]
#[serde(transparent)]
pub struct DayDelta(f64);

impl DayDelta {
    /// Returns the raw number of days
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Whole days, truncated toward zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn whole_days(self) -> i64 {
        self.0.trunc() as i64
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

// Helper functions

/// Proleptic Gregorian leap-year test, except 1900 is always a leap year.
///
/// Spreadsheets number 1900-02-29 as serial 60; keeping the same rule here
/// keeps serial dates interchangeable with spreadsheet cells.
pub const fn is_leap_year(year: i32) -> bool {
    year == FORCED_LEAP_YEAR
        || (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0)
        || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

pub const fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Quarter (1..=4) containing `month`
pub const fn quarter_of(month: u8) -> u8 {
    (month - 1) / MONTHS_PER_QUARTER + 1
}

/// First month of the quarter containing `month`
pub const fn quarter_start_month(month: u8) -> u8 {
    ((month - 1) / MONTHS_PER_QUARTER) * MONTHS_PER_QUARTER + 1
}

/// Last month of the quarter containing `month`
pub const fn quarter_end_month(month: u8) -> u8 {
    quarter_start_month(month) + MONTHS_PER_QUARTER - 1
}

/// Civil successor of a valid `(year, month, day)`.
pub(crate) const fn next_civil_day(year: i32, month: u8, day: u8) -> (i32, u8, u8) {
    if day < days_in_month(year, month) {
        (year, month, day + 1)
    } else if month == DECEMBER {
        (year + 1, JANUARY, MIN_DAY)
    } else {
        (year, month + 1, MIN_DAY)
    }
}

/// Civil predecessor of a valid `(year, month, day)`.
pub(crate) const fn previous_civil_day(year: i32, month: u8, day: u8) -> (i32, u8, u8) {
    if day > MIN_DAY {
        (year, month, day - 1)
    } else if month == JANUARY {
        (year - 1, DECEMBER, days_in_month(year - 1, DECEMBER))
    } else {
        (year, month - 1, days_in_month(year, month - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year:        i32,
            is_leap:     bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year:        2020,
                is_leap:     true,
                description: "divisible by 4",
            },
            TestCase {
                year:        2024,
                is_leap:     true,
                description: "divisible by 4",
            },
            TestCase {
                year:        2023,
                is_leap:     false,
                description: "not divisible by 4",
            },
            TestCase {
                year:        1900,
                is_leap:     true,
                description: "spreadsheet-compatible forced leap year",
            },
            TestCase {
                year:        1800,
                is_leap:     false,
                description: "century not divisible by 400",
            },
            TestCase {
                year:        2100,
                is_leap:     false,
                description: "century not divisible by 400",
            },
            TestCase {
                year:        2000,
                is_leap:     true,
                description: "divisible by 400",
            },
            TestCase {
                year:        1600,
                is_leap:     true,
                description: "divisible by 400",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description
            );
        }
    }

    #[test]
    fn test_leap_rule_matches_gregorian_except_1900() {
        for year in 1..=3000 {
            let gregorian = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
            if year == 1900 {
                assert!(is_leap_year(year));
            } else {
                assert_eq!(is_leap_year(year), gregorian, "year {year}");
            }
        }
    }

    #[test]
    fn test_days_in_month_february() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
    }

    #[test]
    fn test_days_in_month_30_and_31() {
        for month in [1, 3, 5, 7, 8, 10, 12] {
            assert_eq!(days_in_month(2024, month), 31, "Month {month} should have 31 days");
        }
        for month in [4, 6, 9, 11] {
            assert_eq!(days_in_month(2024, month), 30, "Month {month} should have 30 days");
        }
    }

    #[test]
    fn test_days_in_year() {
        assert_eq!(days_in_year(2023), 365);
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(1900), 366);
        assert_eq!(days_in_year(2100), 365);
    }

    #[test]
    fn test_quarter_helpers() {
        let expected = [(1, 1, 3), (2, 4, 6), (3, 7, 9), (4, 10, 12)];
        for month in 1..=12u8 {
            let (q, start, end) = expected[usize::from((month - 1) / 3)];
            assert_eq!(quarter_of(month), q, "quarter of month {month}");
            assert_eq!(quarter_start_month(month), start, "quarter start of month {month}");
            assert_eq!(quarter_end_month(month), end, "quarter end of month {month}");
        }
    }

    #[test]
    fn test_civil_day_steps() {
        assert_eq!(next_civil_day(2024, 2, 28), (2024, 2, 29));
        assert_eq!(next_civil_day(2023, 2, 28), (2023, 3, 1));
        assert_eq!(next_civil_day(1900, 2, 28), (1900, 2, 29));
        assert_eq!(next_civil_day(2024, 12, 31), (2025, 1, 1));
        assert_eq!(previous_civil_day(2024, 3, 1), (2024, 2, 29));
        assert_eq!(previous_civil_day(2025, 1, 1), (2024, 12, 31));
        assert_eq!(previous_civil_day(2024, 5, 1), (2024, 4, 30));
    }

    #[test]
    fn test_weekday_from_day_count() {
        // 45306 is the spreadsheet serial of 2024-01-15, a Monday
        assert_eq!(Weekday::from_day_count(45_306), Weekday::Monday);
        assert_eq!(Weekday::from_day_count(45_311), Weekday::Saturday);
        assert_eq!(Weekday::from_day_count(45_312), Weekday::Sunday);
        // negative counts wrap with Euclidean remainder
        assert_eq!(Weekday::from_day_count(-7), Weekday::Saturday);
        assert_eq!(Weekday::from_day_count(-6), Weekday::Sunday);
    }

    #[test]
    fn test_weekday_weekend_and_display() {
        assert!(Weekday::Saturday.is_weekend());
        assert!(Weekday::Sunday.is_weekend());
        assert!(!Weekday::Friday.is_weekend());
        assert_eq!(Weekday::Wednesday.index(), 2);
        assert_eq!(Weekday::Thursday.to_string(), "Thursday");
    }

    #[test]
    fn test_day_delta() {
        let delta = DayDelta::from(-2.75);
        assert_eq!(delta.whole_days(), -2);
        assert_eq!(delta.abs().get(), 2.75);
        assert_eq!(DayDelta::from(3.0).to_string(), "3 days");
        let raw: f64 = delta.into();
        assert_eq!(raw, -2.75);
    }
}

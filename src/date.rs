//! The serial-date value type and its calendar arithmetic.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, CalendarTable};
use crate::consts::{
    AVERAGE_DAYS_PER_MONTH, AVERAGE_DAYS_PER_YEAR, DECEMBER, HOURS_PER_DAY, ISO_DATE_FORMAT, ISO_DATE_TIME_FORMAT,
    JANUARY, MAX_MONTH, MINUTES_PER_DAY, MIN_DAY, SECONDS_PER_DAY,
};
use crate::convert::RawValue;
use crate::error::DateError;
use crate::format::DateFormat;
use crate::types::{
    DayDelta, Weekday, days_in_month, days_in_year, next_civil_day, previous_civil_day, quarter_end_month, quarter_of,
    quarter_start_month,
};

/// Hour, minute and second carried alongside a date. Validated only when a
/// [`DateValue`] is built from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    pub hour:   u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self::new(0, 0, 0);

    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self { hour, minute, second }
    }

    const fn is_valid(self) -> bool {
        self.hour <= 23 && self.minute <= 59 && self.second <= 59
    }

    /// Fraction of a day elapsed at this time
    pub fn day_fraction(self) -> f64 {
        f64::from(self.hour) / HOURS_PER_DAY
            + f64::from(self.minute) / MINUTES_PER_DAY
            + f64::from(self.second) / SECONDS_PER_DAY
    }
}

/// An immutable calendar date with an optional time of day.
///
/// Every value carries its serial date: the day count of the calendar table
/// (1900-01-01 is day 1, 1900-02-29 exists) plus the elapsed fraction of the
/// day. Ordering, equality and differences all work on the serial date, so
/// two values are equal only when both the date and the time of day match.
///
/// The methods without a calendar argument use [`Calendar::global`].
#[derive(Clone, Copy)]
pub struct DateValue {
    year:        i32,
    month:       u8,
    day:         u8,
    time:        TimeOfDay,
    day_count:   i64,
    serial_date: f64,
    weekday:     Weekday,
}

impl DateValue {
    /// Builds a midnight date on the global calendar.
    ///
    /// # Errors
    /// `OutOfRange`, `InvalidMonth` or `InvalidDay`; see [`Calendar::date_time`].
    pub fn new(day: u8, month: u8, year: i32) -> Result<Self, DateError> {
        Calendar::global().date(day, month, year)
    }

    /// Builds a date with a time of day on the global calendar.
    ///
    /// # Errors
    /// `OutOfRange`, `InvalidMonth`, `InvalidDay` or `InvalidTime`.
    pub fn with_time(day: u8, month: u8, year: i32, hour: u8, minute: u8, second: u8) -> Result<Self, DateError> {
        Calendar::global().date_time(day, month, year, hour, minute, second)
    }

    /// Validates the fields against `table`, which must already cover `year`.
    pub(crate) fn from_table(
        table: &CalendarTable,
        day: u8,
        month: u8,
        year: i32,
        time: TimeOfDay,
    ) -> Result<Self, DateError> {
        if !(1..=MAX_MONTH).contains(&month) {
            return Err(DateError::InvalidMonth { month });
        }
        let max_day = days_in_month(year, month);
        if day < MIN_DAY || day > max_day {
            return Err(DateError::InvalidDay {
                day,
                month,
                year,
                max_day,
            });
        }
        if !time.is_valid() {
            return Err(DateError::InvalidTime {
                hour:   time.hour,
                minute: time.minute,
                second: time.second,
            });
        }

        let day_count = i64::from(table.day_count_at(day, month, year).ok_or(DateError::OutOfRange {
            year: i64::from(year),
            min:  table.start_year(),
            max:  table.end_year(),
        })?);

        #[allow(clippy::cast_precision_loss)]
        let serial_date = day_count as f64 + time.day_fraction();

        Ok(Self {
            year,
            month,
            day,
            time,
            day_count,
            serial_date,
            weekday: Weekday::from_day_count(day_count),
        })
    }

    /// Rebuilds a value from a serial date on the global calendar.
    ///
    /// # Errors
    /// See [`Calendar::date_from_serial`].
    pub fn from_serial(serial: f64) -> Result<Self, DateError> {
        Calendar::global().date_from_serial(serial)
    }

    // --- accessors ---

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month (1..=12)
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    #[inline]
    pub const fn hour(&self) -> u8 {
        self.time.hour
    }

    #[inline]
    pub const fn minute(&self) -> u8 {
        self.time.minute
    }

    #[inline]
    pub const fn second(&self) -> u8 {
        self.time.second
    }

    #[inline]
    pub const fn time_of_day(&self) -> TimeOfDay {
        self.time
    }

    /// Whole day count from the calendar table
    #[inline]
    pub const fn day_count(&self) -> i64 {
        self.day_count
    }

    /// Day count plus the fraction of the day elapsed
    #[inline]
    pub const fn serial_date(&self) -> f64 {
        self.serial_date
    }

    /// Weekday derived from the day count. Before 1900-03-01 it inherits the
    /// spreadsheet convention and is one day off the historical weekday.
    #[inline]
    pub const fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Weekday as 0 (Monday) ..= 6 (Sunday)
    #[inline]
    pub const fn weekday_index(&self) -> u8 {
        self.weekday.index()
    }

    #[inline]
    pub const fn is_weekend(&self) -> bool {
        self.weekday.is_weekend()
    }

    #[inline]
    pub const fn is_midnight(&self) -> bool {
        self.time.hour == 0 && self.time.minute == 0 && self.time.second == 0
    }

    /// Quarter of the year (1..=4)
    #[inline]
    pub const fn quarter(&self) -> u8 {
        quarter_of(self.month)
    }

    #[inline]
    pub const fn days_in_month(&self) -> u8 {
        days_in_month(self.year, self.month)
    }

    #[inline]
    pub const fn days_in_year(&self) -> u16 {
        days_in_year(self.year)
    }

    // --- comparison ---

    #[inline]
    pub fn is_before(&self, other: &Self) -> bool {
        self.serial_date < other.serial_date
    }

    #[inline]
    pub fn is_after(&self, other: &Self) -> bool {
        self.serial_date > other.serial_date
    }

    /// Signed serial difference `other - self`, in fractional days.
    pub fn difference_in_days(&self, other: &Self) -> DayDelta {
        DayDelta::from(other.serial_date - self.serial_date)
    }

    /// Whole days from `self` to `other`, truncated toward zero
    pub fn days_between(&self, other: &Self) -> i64 {
        self.difference_in_days(other).whole_days()
    }

    /// Approximate months from `self` to `other`: whole days divided by 30.44.
    ///
    /// This is an average-length approximation. It does not count calendar
    /// months and does not round-trip with [`DateValue::add_months`].
    #[allow(clippy::cast_precision_loss)]
    pub fn months_between(&self, other: &Self) -> f64 {
        self.days_between(other) as f64 / AVERAGE_DAYS_PER_MONTH
    }

    /// Approximate years from `self` to `other`: whole days divided by 365.25.
    ///
    /// Like [`DateValue::months_between`], an approximation that does not
    /// round-trip with [`DateValue::add_years`].
    #[allow(clippy::cast_precision_loss)]
    pub fn years_between(&self, other: &Self) -> f64 {
        self.days_between(other) as f64 / AVERAGE_DAYS_PER_YEAR
    }

    /// Absolute whole days between `self` and `reference`
    pub fn age_in_days(&self, reference: &Self) -> u64 {
        self.days_between(reference).unsigned_abs()
    }

    /// Absolute whole days between `self` and today's local date.
    ///
    /// # Errors
    /// Returns `OutOfRange` if today falls outside the global calendar bounds.
    pub fn age_in_days_today(&self) -> Result<u64, DateError> {
        let today = Self::from_generic_timestamp(&chrono::Local::now().date_naive())?;
        Ok(self.age_in_days(&today))
    }

    pub const fn is_same_month(&self, other: &Self) -> bool {
        self.year == other.year && self.month == other.month
    }

    pub const fn is_same_quarter(&self, other: &Self) -> bool {
        self.year == other.year && self.quarter() == other.quarter()
    }

    pub const fn is_same_year(&self, other: &Self) -> bool {
        self.year == other.year
    }

    // --- arithmetic ---

    /// Moves `days` calendar days (negative goes back), keeping the time of day.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the result leaves the calendar bounds.
    pub fn add_days(&self, days: i64) -> Result<Self, DateError> {
        Calendar::global().add_days(self, days)
    }

    /// Moves `weekdays` Monday-to-Friday days; see [`Calendar::add_weekdays`].
    ///
    /// # Errors
    /// Returns `OutOfRange` if a step leaves the calendar bounds.
    pub fn add_weekdays(&self, weekdays: i64) -> Result<Self, DateError> {
        Calendar::global().add_weekdays(self, weekdays)
    }

    /// Moves `months` calendar months, carrying into the year. A day past the
    /// end of the target month is clamped to its last day (Jan 31 + 1 month
    /// is the end of February). The time of day is kept.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the target year leaves the calendar bounds.
    pub fn add_months(&self, months: i32) -> Result<Self, DateError> {
        Calendar::global().add_months(self, i64::from(months))
    }

    /// Same as `add_months(12 * years)`.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the target year leaves the calendar bounds.
    pub fn add_years(&self, years: i32) -> Result<Self, DateError> {
        Calendar::global().add_years(self, i64::from(years))
    }

    // --- period boundaries ---

    /// # Errors
    /// Fails only if the global calendar cannot cover this year.
    pub fn start_of_month(&self) -> Result<Self, DateError> {
        Calendar::global().start_of_month(self)
    }

    /// # Errors
    /// Fails only if the global calendar cannot cover this year.
    pub fn end_of_month(&self) -> Result<Self, DateError> {
        Calendar::global().end_of_month(self)
    }

    /// # Errors
    /// Fails only if the global calendar cannot cover this year.
    pub fn start_of_quarter(&self) -> Result<Self, DateError> {
        Calendar::global().start_of_quarter(self)
    }

    /// # Errors
    /// Fails only if the global calendar cannot cover this year.
    pub fn end_of_quarter(&self) -> Result<Self, DateError> {
        Calendar::global().end_of_quarter(self)
    }

    /// # Errors
    /// Fails only if the global calendar cannot cover this year.
    pub fn start_of_year(&self) -> Result<Self, DateError> {
        Calendar::global().start_of_year(self)
    }

    /// # Errors
    /// Fails only if the global calendar cannot cover this year.
    pub fn end_of_year(&self) -> Result<Self, DateError> {
        Calendar::global().end_of_year(self)
    }

    /// Last day of the month, whatever the time of day
    pub const fn is_month_end(&self) -> bool {
        self.day == self.days_in_month()
    }

    /// Equal to [`DateValue::end_of_quarter`], which is at midnight: a
    /// quarter's last day with a time of day is not a quarter end.
    pub const fn is_quarter_end(&self) -> bool {
        self.month == quarter_end_month(self.month) && self.is_month_end() && self.is_midnight()
    }

    /// December 31st, whatever the time of day
    pub const fn is_year_end(&self) -> bool {
        self.month == DECEMBER && self.day == 31
    }

    /// First Monday-to-Friday day strictly after `self`.
    ///
    /// # Errors
    /// Returns `OutOfRange` at the upper calendar bound.
    pub fn next_business_day(&self) -> Result<Self, DateError> {
        Calendar::global().next_business_day(self)
    }

    /// Last Monday-to-Friday day strictly before `self`.
    ///
    /// # Errors
    /// Returns `OutOfRange` at the lower calendar bound.
    pub fn previous_business_day(&self) -> Result<Self, DateError> {
        Calendar::global().previous_business_day(self)
    }

    // --- conversion ---

    /// Renders with an already compiled format.
    pub fn format(&self, format: &DateFormat) -> String {
        format.render(self)
    }

    /// Renders with a strftime-style format.
    ///
    /// # Errors
    /// Returns `Parse` if `format` is not a valid specification.
    pub fn to_formatted_string(&self, format: &str) -> Result<String, DateError> {
        Ok(self.format(&format.parse::<DateFormat>()?))
    }

    /// # Errors
    /// Returns `InvalidDay` for 1900-02-29, which chrono cannot represent.
    pub fn to_naive_date(&self) -> Result<NaiveDate, DateError> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day)).ok_or(DateError::InvalidDay {
            day:     self.day,
            month:   self.month,
            year:    self.year,
            max_day: self.day.saturating_sub(1),
        })
    }

    /// # Errors
    /// Returns `InvalidDay` for 1900-02-29, which chrono cannot represent.
    pub fn to_naive_datetime(&self) -> Result<NaiveDateTime, DateError> {
        let date = self.to_naive_date()?;
        date.and_hms_opt(u32::from(self.hour()), u32::from(self.minute()), u32::from(self.second()))
            .ok_or(DateError::InvalidTime {
                hour:   self.hour(),
                minute: self.minute(),
                second: self.second(),
            })
    }

    fn serde_format(&self) -> &'static str {
        if self.is_midnight() { ISO_DATE_FORMAT } else { ISO_DATE_TIME_FORMAT }
    }
}

/// Calendar arithmetic on values, bounded and widened by this calendar.
impl Calendar {
    /// Moves `weekdays` Monday-to-Friday days, stepping one civil day at a
    /// time and counting only the steps that land on a weekday. The result is
    /// at midnight.
    ///
    /// # Errors
    /// Returns `OutOfRange` if a step leaves the calendar bounds.
    pub fn add_weekdays(&self, date: &DateValue, weekdays: i64) -> Result<DateValue, DateError> {
        let forward = weekdays >= 0;
        let mut remaining = weekdays.unsigned_abs();
        let mut current = self.date(date.day, date.month, date.year)?;

        while remaining > 0 {
            let (year, month, day) = if forward {
                next_civil_day(current.year, current.month, current.day)
            } else {
                previous_civil_day(current.year, current.month, current.day)
            };
            current = self.date(day, month, year)?;
            if !current.is_weekend() {
                remaining -= 1;
            }
        }

        Ok(current)
    }

    /// Moves `months` calendar months, clamping the day to the target
    /// month's length and keeping the time of day.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the target year leaves the calendar bounds.
    pub fn add_months(&self, date: &DateValue, months: i64) -> Result<DateValue, DateError> {
        let total = i64::from(date.month - 1) + months;
        let target_year = i64::from(date.year) + total.div_euclid(12);
        let year = i32::try_from(target_year).map_err(|_| DateError::OutOfRange {
            year: target_year,
            min:  self.min_year(),
            max:  self.max_year(),
        })?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let month = total.rem_euclid(12) as u8 + 1;
        let day = date.day.min(days_in_month(year, month));

        self.date_time(day, month, year, date.hour(), date.minute(), date.second())
    }

    /// # Errors
    /// Returns `OutOfRange` if the target year leaves the calendar bounds.
    pub fn add_years(&self, date: &DateValue, years: i64) -> Result<DateValue, DateError> {
        let months = years.checked_mul(12).ok_or(DateError::OutOfRange {
            year: i64::from(date.year).saturating_add(years),
            min:  self.min_year(),
            max:  self.max_year(),
        })?;
        self.add_months(date, months)
    }

    /// # Errors
    /// Fails only if this calendar cannot cover the year of `date`.
    pub fn start_of_month(&self, date: &DateValue) -> Result<DateValue, DateError> {
        self.date(MIN_DAY, date.month, date.year)
    }

    /// # Errors
    /// Fails only if this calendar cannot cover the year of `date`.
    pub fn end_of_month(&self, date: &DateValue) -> Result<DateValue, DateError> {
        self.date(date.days_in_month(), date.month, date.year)
    }

    /// # Errors
    /// Fails only if this calendar cannot cover the year of `date`.
    pub fn start_of_quarter(&self, date: &DateValue) -> Result<DateValue, DateError> {
        self.date(MIN_DAY, quarter_start_month(date.month), date.year)
    }

    /// # Errors
    /// Fails only if this calendar cannot cover the year of `date`.
    pub fn end_of_quarter(&self, date: &DateValue) -> Result<DateValue, DateError> {
        let month = quarter_end_month(date.month);
        self.date(days_in_month(date.year, month), month, date.year)
    }

    /// # Errors
    /// Fails only if this calendar cannot cover the year of `date`.
    pub fn start_of_year(&self, date: &DateValue) -> Result<DateValue, DateError> {
        self.date(MIN_DAY, JANUARY, date.year)
    }

    /// # Errors
    /// Fails only if this calendar cannot cover the year of `date`.
    pub fn end_of_year(&self, date: &DateValue) -> Result<DateValue, DateError> {
        self.date(days_in_month(date.year, DECEMBER), DECEMBER, date.year)
    }

    /// # Errors
    /// Returns `OutOfRange` at the upper calendar bound.
    pub fn next_business_day(&self, date: &DateValue) -> Result<DateValue, DateError> {
        self.step_to_business_day(date, 1)
    }

    /// # Errors
    /// Returns `OutOfRange` at the lower calendar bound.
    pub fn previous_business_day(&self, date: &DateValue) -> Result<DateValue, DateError> {
        self.step_to_business_day(date, -1)
    }

    fn step_to_business_day(&self, date: &DateValue, step: i64) -> Result<DateValue, DateError> {
        let mut current = self.add_days(date, step)?;
        while current.is_weekend() {
            current = self.add_days(&current, step)?;
        }
        Ok(current)
    }
}

impl PartialEq for DateValue {
    fn eq(&self, other: &Self) -> bool {
        self.serial_date == other.serial_date
    }
}

impl Eq for DateValue {}

impl PartialOrd for DateValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.serial_date.total_cmp(&other.serial_date)
    }
}

impl Hash for DateValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serial_date.to_bits().hash(state);
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Debug for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DateValue({:04}-{:02}-{:02} {:02}:{:02}:{:02}, serial {})",
            self.year,
            self.month,
            self.day,
            self.hour(),
            self.minute(),
            self.second(),
            self.serial_date
        )
    }
}

impl Serialize for DateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let format: DateFormat = self.serde_format().parse().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&format.render(self))
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // the serialized forms come first so a configured fallback list cannot shadow them
        let calendar = Calendar::global();
        [ISO_DATE_TIME_FORMAT, ISO_DATE_FORMAT]
            .iter()
            .filter_map(|spec| spec.parse::<DateFormat>().ok())
            .find_map(|format| calendar.parse(&s, &format).ok())
            .map_or_else(|| calendar.best_guess(&RawValue::from(s.as_str())), Ok)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u8, month: u8, year: i32) -> DateValue {
        DateValue::new(day, month, year).expect("valid test date")
    }

    fn ymd(value: &DateValue) -> (i32, u8, u8) {
        (value.year(), value.month(), value.day())
    }

    #[test]
    fn test_construction_derives_serial_and_weekday() {
        let value = date(15, 1, 2024);
        assert_eq!(value.day_count(), 45_306);
        assert_eq!(value.serial_date(), 45_306.0);
        assert_eq!(value.weekday(), Weekday::Monday);
        assert_eq!(value.weekday_index(), 0);
        assert!(!value.is_weekend());
    }

    #[test]
    fn test_time_fraction() {
        let value = DateValue::with_time(15, 1, 2024, 18, 0, 0).expect("valid date time");
        assert_eq!(value.serial_date(), 45_306.75);
        assert_eq!(value.day_count(), 45_306);
        let noon_and_a_bit = DateValue::with_time(15, 1, 2024, 12, 30, 30).expect("valid date time");
        let expected = 45_306.0 + 12.0 / 24.0 + 30.0 / 1440.0 + 30.0 / 86_400.0;
        assert!((noon_and_a_bit.serial_date() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_construction_errors() {
        struct TestCase {
            result:      Result<DateValue, DateError>,
            description: &'static str,
        }

        let cases = [
            TestCase {
                result:      DateValue::new(30, 2, 2024),
                description: "February 30th",
            },
            TestCase {
                result:      DateValue::new(29, 2, 2023),
                description: "February 29th in a common year",
            },
            TestCase {
                result:      DateValue::new(29, 2, 2100),
                description: "February 29th in a century year",
            },
            TestCase {
                result:      DateValue::new(0, 1, 2024),
                description: "day zero",
            },
            TestCase {
                result:      DateValue::new(31, 4, 2024),
                description: "April 31st",
            },
        ];

        for case in cases {
            assert!(
                matches!(case.result, Err(DateError::InvalidDay { .. })),
                "Expected InvalidDay for: {}",
                case.description
            );
        }

        assert_eq!(DateValue::new(1, 13, 2024), Err(DateError::InvalidMonth { month: 13 }));
        assert_eq!(DateValue::new(1, 0, 2024), Err(DateError::InvalidMonth { month: 0 }));
        assert!(matches!(
            DateValue::with_time(1, 1, 2024, 24, 0, 0),
            Err(DateError::InvalidTime { hour: 24, .. })
        ));
        assert!(matches!(
            DateValue::with_time(1, 1, 2024, 0, 60, 0),
            Err(DateError::InvalidTime { minute: 60, .. })
        ));
        assert!(matches!(
            DateValue::with_time(1, 1, 2024, 0, 0, 60),
            Err(DateError::InvalidTime { second: 60, .. })
        ));
        assert!(matches!(DateValue::new(1, 1, 10_000), Err(DateError::OutOfRange { .. })));
        assert!(matches!(DateValue::new(1, 1, 0), Err(DateError::OutOfRange { .. })));
    }

    #[test]
    fn test_february_29_1900_is_valid() {
        let value = date(29, 2, 1900);
        assert_eq!(value.day_count(), 60);
        assert_eq!(date(1, 3, 1900).day_count(), 61);
        assert_eq!(value.days_in_month(), 29);
        assert_eq!(value.days_in_year(), 366);
        assert!(value.to_naive_date().is_err());
    }

    #[test]
    fn test_equality_includes_time() {
        let midnight = date(15, 1, 2024);
        let noon = DateValue::with_time(15, 1, 2024, 12, 0, 0).expect("valid date time");
        assert_ne!(midnight, noon);
        assert!(midnight.is_before(&noon));
        assert!(noon.is_after(&midnight));
        assert_eq!(midnight, date(15, 1, 2024));
        assert_eq!(midnight.difference_in_days(&noon).get(), 0.5);
        assert_eq!(noon.difference_in_days(&midnight).get(), -0.5);
    }

    #[test]
    fn test_ordering() {
        let mut dates = vec![date(1, 3, 2024), date(31, 12, 1999), date(29, 2, 2024)];
        dates.sort();
        assert_eq!(dates, vec![date(31, 12, 1999), date(29, 2, 2024), date(1, 3, 2024)]);
    }

    #[test]
    fn test_add_days() {
        assert_eq!(ymd(&date(15, 1, 2024).add_days(30).expect("in range")), (2024, 2, 14));
        assert_eq!(ymd(&date(28, 2, 2024).add_days(1).expect("in range")), (2024, 2, 29));
        assert_eq!(ymd(&date(28, 2, 2023).add_days(1).expect("in range")), (2023, 3, 1));
        assert_eq!(ymd(&date(1, 3, 2024).add_days(-1).expect("in range")), (2024, 2, 29));
        assert_eq!(ymd(&date(31, 12, 2024).add_days(1).expect("in range")), (2025, 1, 1));
        assert_eq!(ymd(&date(15, 1, 2024).add_days(0).expect("in range")), (2024, 1, 15));
    }

    #[test]
    fn test_add_days_preserves_time() {
        let value = DateValue::with_time(31, 1, 2024, 9, 15, 0).expect("valid date time");
        let moved = value.add_days(1).expect("in range");
        assert_eq!(ymd(&moved), (2024, 2, 1));
        assert_eq!(moved.time_of_day(), TimeOfDay::new(9, 15, 0));
        assert_eq!(value.difference_in_days(&moved).get(), 1.0);
    }

    #[test]
    fn test_add_days_round_trip() {
        let start = DateValue::with_time(10, 7, 1987, 3, 4, 5).expect("valid date time");
        for days in [1, 7, 30, 365, 1000, 20_000, -1, -59, -365, -30_000] {
            let there = start.add_days(days).expect("in range");
            assert_eq!(start.days_between(&there), days, "delta for {days}");
            assert_eq!(there.add_days(-days).expect("in range"), start, "round trip for {days}");
        }
    }

    #[test]
    fn test_add_weekdays() {
        // 2024-01-12 is a Friday
        let friday = date(12, 1, 2024);
        assert_eq!(ymd(&friday.add_weekdays(1).expect("in range")), (2024, 1, 15));
        assert_eq!(ymd(&friday.add_weekdays(5).expect("in range")), (2024, 1, 19));
        let monday = date(15, 1, 2024);
        assert_eq!(ymd(&monday.add_weekdays(-1).expect("in range")), (2024, 1, 12));
        assert_eq!(ymd(&monday.add_weekdays(-6).expect("in range")), (2024, 1, 5));
    }

    #[test]
    fn test_add_weekdays_drops_time() {
        let value = DateValue::with_time(15, 1, 2024, 10, 0, 0).expect("valid date time");
        let moved = value.add_weekdays(0).expect("in range");
        assert_eq!(moved, date(15, 1, 2024));
        assert!(moved.is_midnight());
    }

    #[test]
    fn test_add_weekdays_from_weekend() {
        // 2024-01-13 is a Saturday; zero steps stays on it
        let saturday = date(13, 1, 2024);
        assert_eq!(saturday.add_weekdays(0).expect("in range"), saturday);
        assert_eq!(ymd(&saturday.add_weekdays(1).expect("in range")), (2024, 1, 15));
    }

    #[test]
    fn test_add_months_clamps() {
        struct TestCase {
            from:     (u8, u8, i32),
            months:   i32,
            expected: (i32, u8, u8),
        }

        let cases = [
            TestCase {
                from:     (31, 1, 2024),
                months:   1,
                expected: (2024, 2, 29),
            },
            TestCase {
                from:     (31, 1, 2023),
                months:   1,
                expected: (2023, 2, 28),
            },
            TestCase {
                from:     (31, 3, 2024),
                months:   1,
                expected: (2024, 4, 30),
            },
            TestCase {
                from:     (15, 11, 2024),
                months:   3,
                expected: (2025, 2, 15),
            },
            TestCase {
                from:     (15, 2, 2024),
                months:   -3,
                expected: (2023, 11, 15),
            },
            TestCase {
                from:     (31, 12, 2024),
                months:   -14,
                expected: (2023, 10, 31),
            },
            TestCase {
                from:     (15, 6, 2024),
                months:   0,
                expected: (2024, 6, 15),
            },
            TestCase {
                from:     (29, 2, 2024),
                months:   12,
                expected: (2025, 2, 28),
            },
        ];

        for case in &cases {
            let (day, month, year) = case.from;
            let result = date(day, month, year).add_months(case.months).expect("in range");
            assert_eq!(
                ymd(&result),
                case.expected,
                "{year}-{month:02}-{day:02} + {} months",
                case.months
            );
        }
    }

    #[test]
    fn test_add_months_preserves_time() {
        let value = DateValue::with_time(31, 1, 2024, 23, 59, 59).expect("valid date time");
        let moved = value.add_months(1).expect("in range");
        assert_eq!(ymd(&moved), (2024, 2, 29));
        assert_eq!(moved.time_of_day(), TimeOfDay::new(23, 59, 59));
    }

    #[test]
    fn test_add_years() {
        assert_eq!(ymd(&date(29, 2, 2024).add_years(1).expect("in range")), (2025, 2, 28));
        assert_eq!(ymd(&date(29, 2, 2024).add_years(4).expect("in range")), (2028, 2, 29));
        assert_eq!(ymd(&date(15, 6, 2024).add_years(-24).expect("in range")), (2000, 6, 15));
        assert!(matches!(date(1, 1, 2024).add_years(8000), Err(DateError::OutOfRange { .. })));
    }

    #[test]
    fn test_period_boundaries() {
        let value = DateValue::with_time(14, 8, 2024, 16, 0, 0).expect("valid date time");
        assert_eq!(ymd(&value.start_of_month().expect("in range")), (2024, 8, 1));
        assert_eq!(ymd(&value.end_of_month().expect("in range")), (2024, 8, 31));
        assert_eq!(ymd(&value.start_of_quarter().expect("in range")), (2024, 7, 1));
        assert_eq!(ymd(&value.end_of_quarter().expect("in range")), (2024, 9, 30));
        assert_eq!(ymd(&value.start_of_year().expect("in range")), (2024, 1, 1));
        assert_eq!(ymd(&value.end_of_year().expect("in range")), (2024, 12, 31));
        assert!(value.end_of_month().expect("in range").is_midnight());

        let february = date(10, 2, 2023);
        assert_eq!(ymd(&february.end_of_month().expect("in range")), (2023, 2, 28));
        assert_eq!(ymd(&february.end_of_quarter().expect("in range")), (2023, 3, 31));
        assert_eq!(february.quarter(), 1);
        assert_eq!(date(1, 10, 2023).quarter(), 4);
    }

    #[test]
    fn test_period_end_checks() {
        assert!(date(29, 2, 2024).is_month_end());
        assert!(!date(28, 2, 2024).is_month_end());
        assert!(date(30, 6, 2024).is_quarter_end());
        assert!(!date(31, 5, 2024).is_quarter_end());
        assert!(date(31, 12, 2024).is_quarter_end());
        assert!(date(31, 12, 2024).is_year_end());
        assert!(!date(30, 12, 2024).is_year_end());

        let quarter_end_evening = DateValue::with_time(30, 6, 2024, 18, 0, 0).expect("valid date time");
        assert!(quarter_end_evening.is_month_end());
        assert!(!quarter_end_evening.is_quarter_end());
        let year_end_evening = DateValue::with_time(31, 12, 2024, 18, 0, 0).expect("valid date time");
        assert!(year_end_evening.is_year_end());
    }

    #[test]
    fn test_business_day_stepping() {
        let friday = date(12, 1, 2024);
        assert_eq!(ymd(&friday.next_business_day().expect("in range")), (2024, 1, 15));
        let monday = date(15, 1, 2024);
        assert_eq!(ymd(&monday.previous_business_day().expect("in range")), (2024, 1, 12));
        let wednesday = date(17, 1, 2024);
        assert_eq!(ymd(&wednesday.next_business_day().expect("in range")), (2024, 1, 18));
        let sunday = date(14, 1, 2024);
        assert_eq!(ymd(&sunday.previous_business_day().expect("in range")), (2024, 1, 12));
    }

    #[test]
    fn test_between_approximations() {
        let start = date(1, 1, 2024);
        let end = date(1, 1, 2025);
        assert_eq!(start.days_between(&end), 366);
        assert_eq!(end.days_between(&start), -366);
        assert!((start.months_between(&end) - 366.0 / 30.44).abs() < 1e-12);
        assert!((start.years_between(&end) - 366.0 / 365.25).abs() < 1e-12);
        assert_eq!(end.age_in_days(&start), 366);

        let evening = DateValue::with_time(2, 1, 2024, 20, 0, 0).expect("valid date time");
        assert_eq!(start.days_between(&evening), 1);
        assert_eq!(evening.days_between(&start), -1);
    }

    #[test]
    fn test_same_period() {
        let a = date(1, 4, 2024);
        let b = date(30, 6, 2024);
        let c = date(1, 4, 2023);
        assert!(a.is_same_quarter(&b));
        assert!(!a.is_same_month(&b));
        assert!(a.is_same_year(&b));
        assert!(!a.is_same_quarter(&c));
        assert!(a.is_same_month(&date(30, 4, 2024)));
    }

    #[test]
    fn test_display_and_formatting() {
        let value = DateValue::with_time(5, 3, 2024, 14, 30, 0).expect("valid date time");
        assert_eq!(value.to_string(), "2024-03-05");
        assert_eq!(value.to_formatted_string("%d/%m/%Y").expect("valid format"), "05/03/2024");
        assert_eq!(
            value.to_formatted_string("%Y-%m-%d %H:%M:%S").expect("valid format"),
            "2024-03-05 14:30:00"
        );
        assert_eq!(value.to_formatted_string("%d %B %Y").expect("valid format"), "05 March 2024");
        assert_eq!(value.to_formatted_string("%b %d, %Y").expect("valid format"), "Mar 05, 2024");
        assert!(value.to_formatted_string("%Q").is_err());
    }

    #[test]
    fn test_chrono_conversion() {
        let value = DateValue::with_time(15, 1, 2024, 8, 5, 9).expect("valid date time");
        let naive = value.to_naive_datetime().expect("representable in chrono");
        assert_eq!(naive.to_string(), "2024-01-15 08:05:09");
        assert_eq!(value.to_naive_date().expect("representable").to_string(), "2024-01-15");
    }

    #[test]
    fn test_serde_string_format() {
        let value = date(15, 1, 2024);
        let json = serde_json::to_string(&value).expect("serializes");
        assert_eq!(json, r#""2024-01-15""#);
        let parsed: DateValue = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(value, parsed);

        let timed = DateValue::with_time(15, 1, 2024, 14, 30, 0).expect("valid date time");
        let json = serde_json::to_string(&timed).expect("serializes");
        assert_eq!(json, r#""2024-01-15 14:30:00""#);
        let parsed: DateValue = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(timed, parsed);

        assert!(serde_json::from_str::<DateValue>(r#""not a date""#).is_err());
    }

    #[test]
    fn test_hash_follows_equality() {
        use std::collections::HashSet;
        let set: HashSet<DateValue> = [date(1, 1, 2024), date(1, 1, 2024), date(2, 1, 2024)].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}

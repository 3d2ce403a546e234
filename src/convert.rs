//! Conversions from formatted text, timestamp-like values and raw cells.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use tracing::trace;

use crate::calendar::Calendar;
use crate::consts::{EPOCH_YEAR, JANUARY, MIN_DAY};
use crate::date::DateValue;
use crate::error::DateError;
use crate::format::DateFormat;

/// A value exposing calendar fields, such as a chrono date or date-time.
///
/// Time accessors default to midnight for date-only types.
pub trait Timestamp {
    fn year(&self) -> i32;
    fn month(&self) -> u8;
    fn day(&self) -> u8;

    fn hour(&self) -> u8 {
        0
    }

    fn minute(&self) -> u8 {
        0
    }

    fn second(&self) -> u8 {
        0
    }
}

// chrono keeps month, day and clock fields far below u8::MAX
#[allow(clippy::cast_possible_truncation)]
impl Timestamp for NaiveDate {
    fn year(&self) -> i32 {
        Datelike::year(self)
    }

    fn month(&self) -> u8 {
        Datelike::month(self) as u8
    }

    fn day(&self) -> u8 {
        Datelike::day(self) as u8
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Timestamp for NaiveDateTime {
    fn year(&self) -> i32 {
        Datelike::year(self)
    }

    fn month(&self) -> u8 {
        Datelike::month(self) as u8
    }

    fn day(&self) -> u8 {
        Datelike::day(self) as u8
    }

    fn hour(&self) -> u8 {
        Timelike::hour(self) as u8
    }

    fn minute(&self) -> u8 {
        Timelike::minute(self) as u8
    }

    // leap seconds are folded into the last second of the minute
    fn second(&self) -> u8 {
        Timelike::second(self) as u8
    }
}

/// Local wall-clock fields of a zoned date-time.
impl<Tz: TimeZone> Timestamp for DateTime<Tz> {
    fn year(&self) -> i32 {
        Timestamp::year(&self.naive_local())
    }

    fn month(&self) -> u8 {
        Timestamp::month(&self.naive_local())
    }

    fn day(&self) -> u8 {
        Timestamp::day(&self.naive_local())
    }

    fn hour(&self) -> u8 {
        Timestamp::hour(&self.naive_local())
    }

    fn minute(&self) -> u8 {
        Timestamp::minute(&self.naive_local())
    }

    fn second(&self) -> u8 {
        Timestamp::second(&self.naive_local())
    }
}

/// A raw cell of a tabular query result.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Text(String),
    /// Spreadsheet serial date
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl RawValue {
    /// Default missing-value test: `Null` or a NaN number.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(n) => n.is_nan(),
            Self::Text(_) | Self::Date(_) | Self::DateTime(_) => false,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Calendar {
    /// Parses `text` with `format`. Fields the format lacks default to
    /// 1900-01-01 00:00:00.
    ///
    /// # Errors
    /// Returns `Parse` when the text does not match the format, and the
    /// construction errors for matched but impossible fields.
    pub fn parse(&self, text: &str, format: &DateFormat) -> Result<DateValue, DateError> {
        let fields = format.scan(text)?;
        self.date_time(
            fields.day.unwrap_or(MIN_DAY),
            fields.month.unwrap_or(JANUARY),
            fields.year.unwrap_or(EPOCH_YEAR),
            fields.hour.unwrap_or(0),
            fields.minute.unwrap_or(0),
            fields.second.unwrap_or(0),
        )
    }

    /// Builds a value straight from the fields of `value`.
    ///
    /// # Errors
    /// Same as [`Calendar::date_time`].
    pub fn date_from_timestamp<T: Timestamp + ?Sized>(&self, value: &T) -> Result<DateValue, DateError> {
        self.date_time(
            value.day(),
            value.month(),
            value.year(),
            value.hour(),
            value.minute(),
            value.second(),
        )
    }

    /// Best-guess conversion with this calendar's fallback formats.
    ///
    /// # Errors
    /// See [`Calendar::best_guess_with`].
    pub fn best_guess(&self, value: &RawValue) -> Result<DateValue, DateError> {
        self.best_guess_with(value, self.fallback_formats())
    }

    /// Converts a raw cell: timestamps directly, numbers as serial dates and
    /// text by trying `formats` in order. The first format that yields a
    /// valid date wins, so an ambiguous text such as `01/02/2024` takes the
    /// reading of whichever matching format comes first.
    ///
    /// # Errors
    /// Returns `Parse` for `Null` or text no format accepts, and
    /// `InvalidSerial` for unusable numbers.
    pub fn best_guess_with(&self, value: &RawValue, formats: &[DateFormat]) -> Result<DateValue, DateError> {
        match value {
            RawValue::Null => Err(DateError::parse("", "missing value")),
            RawValue::Number(serial) => self.date_from_serial(*serial),
            RawValue::Date(date) => self.date_from_timestamp(date),
            RawValue::DateTime(date_time) => self.date_from_timestamp(date_time),
            RawValue::Text(text) => self.guess_text(text.trim(), formats),
        }
    }

    fn guess_text(&self, text: &str, formats: &[DateFormat]) -> Result<DateValue, DateError> {
        for format in formats {
            match self.parse(text, format) {
                Ok(date) => {
                    trace!(text, format = format.as_str(), "parsed with fallback format");
                    return Ok(date);
                },
                Err(error) => trace!(text, format = format.as_str(), %error, "fallback format rejected"),
            }
        }
        Err(DateError::parse(text, format!("no format matched among {} tried", formats.len())))
    }
}

impl DateValue {
    /// Parses `text` with an explicit strftime-style format on the global
    /// calendar.
    ///
    /// # Errors
    /// Returns `Parse` for an invalid format or non-matching text, and the
    /// construction errors for impossible fields.
    pub fn from_formatted_string(text: &str, format: &str) -> Result<Self, DateError> {
        Calendar::global().parse(text, &format.parse()?)
    }

    /// # Errors
    /// Same as [`DateValue::with_time`].
    pub fn from_generic_timestamp<T: Timestamp + ?Sized>(value: &T) -> Result<Self, DateError> {
        Calendar::global().date_from_timestamp(value)
    }

    /// Best-guess conversion on the global calendar.
    ///
    /// # Errors
    /// See [`Calendar::best_guess_with`].
    pub fn from_best_guess(value: impl Into<RawValue>) -> Result<Self, DateError> {
        Calendar::global().best_guess(&value.into())
    }

    /// Best-guess conversion with an explicit ordered format list.
    ///
    /// # Errors
    /// See [`Calendar::best_guess_with`].
    pub fn from_best_guess_with(value: impl Into<RawValue>, formats: &[DateFormat]) -> Result<Self, DateError> {
        Calendar::global().best_guess_with(&value.into(), formats)
    }
}

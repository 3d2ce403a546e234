//! Error types for the report_calendar crate.

/// Error type for every fallible operation of the calendar engine.
///
/// Construction and parsing fail atomically: an `Err` never comes with a
/// partially built `DateValue`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Day is zero or past the end of the month.
    #[error("Invalid day {day} for month {year}-{month:02} (max {max_day})")]
    InvalidDay {
        day:     u8,
        month:   u8,
        year:    i32,
        max_day: u8,
    },

    /// Month outside 1..=12.
    #[error("Invalid month: {month} (must be 1-12)")]
    InvalidMonth { month: u8 },

    /// Hour, minute or second outside its range.
    #[error("Invalid time {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u8, minute: u8, second: u8 },

    /// Year outside the bounds the calendar may widen to.
    #[error("Year {year} should be between {min} and {max}")]
    OutOfRange { year: i64, min: i32, max: i32 },

    /// Text did not match the requested format(s).
    #[error("Unable to parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Bulk conversion target column is absent.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// `date_range` step must be strictly positive.
    #[error("Invalid step: {0} (must be > 0)")]
    InvalidStep(i64),

    /// Serial date is not a finite day count.
    #[error("Invalid serial date: {0}")]
    InvalidSerial(String),

    /// Rejected calendar configuration.
    #[error("Invalid calendar configuration: {0}")]
    Config(String),
}

impl DateError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input:  input.to_owned(),
            reason: reason.into(),
        }
    }
}

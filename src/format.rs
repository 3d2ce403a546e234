//! strftime-style format specifications used to parse and render dates.
//!
//! Supported directives:
//!
//! | Directive | Meaning |
//! |-----------|---------|
//! | `%Y` | year, up to four digits when parsing, four when rendering |
//! | `%m` | month, one or two digits when parsing, two when rendering |
//! | `%d` | day of month |
//! | `%H` `%M` `%S` | hour, minute, second |
//! | `%B` `%b` | English month name; either spelling parses |
//! | `%F` | shorthand for `%Y-%m-%d` |
//! | `%T` | shorthand for `%H:%M:%S` |
//! | `%%` | literal percent sign |
//!
//! Any other character is a literal. A run of whitespace renders as one space
//! and matches any amount of whitespace, including none.

use std::fmt;
use std::str::FromStr;

use chrono::format::{Parsed, StrftimeItems, parse};

use crate::consts::{DEFAULT_FALLBACK_FORMATS, ISO_DATE_FORMAT};
use crate::date::DateValue;
use crate::error::DateError;

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Literal(char),
    Whitespace,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    MonthName,
    MonthAbbrev,
}

/// Fields captured from a text by [`DateFormat::scan`]. Absent fields take
/// the defaults 1900-01-01 00:00:00.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ScannedFields {
    pub(crate) year:   Option<i32>,
    pub(crate) month:  Option<u8>,
    pub(crate) day:    Option<u8>,
    pub(crate) hour:   Option<u8>,
    pub(crate) minute: Option<u8>,
    pub(crate) second: Option<u8>,
}

/// A compiled format specification such as `%Y-%m-%d %H:%M:%S`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    spec:  String,
    items: Vec<Item>,
}

impl DateFormat {
    /// The six formats best-guess parsing tries by default, in order.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_FALLBACK_FORMATS
            .iter()
            .filter_map(|spec| spec.parse().ok())
            .collect()
    }

    /// `%Y-%m-%d`
    pub fn iso_date() -> Self {
        Self {
            spec:  ISO_DATE_FORMAT.to_owned(),
            items: vec![Item::Year, Item::Literal('-'), Item::Month, Item::Literal('-'), Item::Day],
        }
    }

    /// The specification this format was compiled from
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    /// Whether the format carries any time-of-day field
    pub fn has_time(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, Item::Hour | Item::Minute | Item::Second))
    }

    fn compile(spec: &str) -> Result<Self, DateError> {
        let mut items = Vec::new();
        let mut chars = spec.chars();

        while let Some(c) = chars.next() {
            if c == '%' {
                let directive = chars
                    .next()
                    .ok_or_else(|| DateError::parse(spec, "format ends with a lone '%'"))?;
                match directive {
                    'Y' => items.push(Item::Year),
                    'm' => items.push(Item::Month),
                    'd' => items.push(Item::Day),
                    'H' => items.push(Item::Hour),
                    'M' => items.push(Item::Minute),
                    'S' => items.push(Item::Second),
                    'B' => items.push(Item::MonthName),
                    'b' => items.push(Item::MonthAbbrev),
                    'F' => items.extend([Item::Year, Item::Literal('-'), Item::Month, Item::Literal('-'), Item::Day]),
                    'T' => items.extend([
                        Item::Hour,
                        Item::Literal(':'),
                        Item::Minute,
                        Item::Literal(':'),
                        Item::Second,
                    ]),
                    '%' => items.push(Item::Literal('%')),
                    other => return Err(DateError::parse(spec, format!("unknown directive '%{other}'"))),
                }
            } else if c.is_whitespace() {
                if items.last() != Some(&Item::Whitespace) {
                    items.push(Item::Whitespace);
                }
            } else {
                items.push(Item::Literal(c));
            }
        }

        Ok(Self {
            spec: spec.to_owned(),
            items,
        })
    }

    /// Matches the whole of `text` against the format.
    ///
    /// Matching runs through chrono's parser, which records each field
    /// without checking that they form a real date; validation is left to
    /// the calendar so that 1900-02-29 goes through.
    pub(crate) fn scan(&self, text: &str) -> Result<ScannedFields, DateError> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, text, StrftimeItems::new(&self.spec)).map_err(|err| self.mismatch(text, err))?;

        let hour = match (parsed.hour_div_12(), parsed.hour_mod_12()) {
            (Some(half), Some(hour)) => Some(half * 12 + hour),
            _ => None,
        };
        Ok(ScannedFields {
            year:   parsed.year(),
            month:  self.small_field(text, "month", parsed.month())?,
            day:    self.small_field(text, "day", parsed.day())?,
            hour:   self.small_field(text, "hour", hour)?,
            minute: self.small_field(text, "minute", parsed.minute())?,
            second: self.small_field(text, "second", parsed.second())?,
        })
    }

    fn small_field(&self, text: &str, what: &str, value: Option<u32>) -> Result<Option<u8>, DateError> {
        value
            .map(|value| u8::try_from(value).map_err(|_| self.mismatch(text, format!("{what} overflow"))))
            .transpose()
    }

    fn mismatch(&self, text: &str, reason: impl fmt::Display) -> DateError {
        DateError::parse(text, format!("does not match '{}': {reason}", self.spec))
    }

    /// Renders `date` with this format.
    pub fn render(&self, date: &DateValue) -> String {
        Rendered { format: self, date }.to_string()
    }
}

struct Rendered<'a> {
    format: &'a DateFormat,
    date:   &'a DateValue,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.date;
        for item in &self.format.items {
            match *item {
                Item::Literal(c) => write!(f, "{c}")?,
                Item::Whitespace => f.write_str(" ")?,
                Item::Year => write!(f, "{:04}", date.year())?,
                Item::Month => write!(f, "{:02}", date.month())?,
                Item::Day => write!(f, "{:02}", date.day())?,
                Item::Hour => write!(f, "{:02}", date.hour())?,
                Item::Minute => write!(f, "{:02}", date.minute())?,
                Item::Second => write!(f, "{:02}", date.second())?,
                Item::MonthName => f.write_str(month_name(date.month()))?,
                Item::MonthAbbrev => f.write_str(&month_name(date.month())[..3])?,
            }
        }
        Ok(())
    }
}

/// English name of `month` (1..=12)
pub fn month_name(month: u8) -> &'static str {
    MONTH_NAMES[usize::from(month.clamp(1, 12) - 1)]
}

impl FromStr for DateFormat {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

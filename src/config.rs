//! Calendar configuration.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_END_YEAR, DEFAULT_FALLBACK_FORMATS, DEFAULT_START_YEAR, MAX_YEAR, MIN_YEAR};
use crate::error::DateError;
use crate::format::DateFormat;

/// Settings of a [`Calendar`](crate::Calendar).
///
/// Every field has a default, so `{}` is a valid JSON configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    /// First year of the initial table window.
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Last year of the initial table window.
    #[serde(default = "default_end_year")]
    pub end_year: i32,

    /// Lowest year the window may grow to.
    #[serde(default = "default_min_year")]
    pub min_year: i32,

    /// Highest year the window may grow to.
    #[serde(default = "default_max_year")]
    pub max_year: i32,

    /// Formats tried in order by best-guess parsing. The first one that
    /// parses wins, so ambiguous inputs such as `01/02/2024` resolve to
    /// whichever matching format comes first.
    #[serde(default = "default_fallback_formats")]
    pub fallback_formats: Vec<String>,
}

const fn default_start_year() -> i32 {
    DEFAULT_START_YEAR
}
const fn default_end_year() -> i32 {
    DEFAULT_END_YEAR
}
const fn default_min_year() -> i32 {
    MIN_YEAR
}
const fn default_max_year() -> i32 {
    MAX_YEAR
}
fn default_fallback_formats() -> Vec<String> {
    DEFAULT_FALLBACK_FORMATS.iter().map(|f| (*f).to_owned()).collect()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_year:       default_start_year(),
            end_year:         default_end_year(),
            min_year:         default_min_year(),
            max_year:         default_max_year(),
            fallback_formats: default_fallback_formats(),
        }
    }
}

impl CalendarConfig {
    /// # Errors
    /// Returns `DateError::Config` for malformed JSON or an invalid configuration.
    pub fn from_json_str(json: &str) -> Result<Self, DateError> {
        let config: Self = serde_json::from_str(json).map_err(|e| DateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `DateError::Config` for unreadable or malformed JSON or an
    /// invalid configuration.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, DateError> {
        let config: Self = serde_json::from_reader(reader).map_err(|e| DateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks bounds, window and formats.
    ///
    /// # Errors
    /// Returns `DateError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<(), DateError> {
        if self.min_year < MIN_YEAR || self.max_year > MAX_YEAR || self.min_year > self.max_year {
            return Err(DateError::Config(format!(
                "year bounds {}..={} must lie within {MIN_YEAR}..={MAX_YEAR}",
                self.min_year, self.max_year
            )));
        }
        if self.start_year > self.end_year {
            return Err(DateError::Config(format!(
                "start_year {} is after end_year {}",
                self.start_year, self.end_year
            )));
        }
        if self.start_year < self.min_year || self.end_year > self.max_year {
            return Err(DateError::Config(format!(
                "window {}..={} exceeds bounds {}..={}",
                self.start_year, self.end_year, self.min_year, self.max_year
            )));
        }
        if self.fallback_formats.is_empty() {
            return Err(DateError::Config("fallback_formats must not be empty".to_owned()));
        }
        self.parsed_formats().map(|_| ())
    }

    pub(crate) fn parsed_formats(&self) -> Result<Vec<DateFormat>, DateError> {
        self.fallback_formats
            .iter()
            .map(|spec| spec.parse::<DateFormat>().map_err(|e| DateError::Config(e.to_string())))
            .collect()
    }
}

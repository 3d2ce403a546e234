//! Day-counter table and the shared calendar that owns it.
//!
//! The table maps every `(year, month, day-slot)` triple of its window to the
//! sequential day count of that day, or to an empty slot when the month has no
//! such day. Day counts are anchored to [`EPOCH_YEAR`]: 1900-01-01 is day 1,
//! whatever the window, so widening never renumbers a day.
//!
//! A [`Calendar`] holds the current table as an immutable snapshot. Widening
//! builds a new table and swaps it in under a write lock; readers keep using
//! the snapshot they already hold.

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::config::CalendarConfig;
use crate::consts::{
    DAYS_PER_COMMON_YEAR, EPOCH_YEAR, MAX_MONTH, MIN_DAY, SECONDS_PER_DAY, SLOTS_PER_MONTH, SLOTS_PER_YEAR,
};
use crate::date::{DateValue, TimeOfDay};
use crate::error::DateError;
use crate::format::DateFormat;
use crate::types::{days_in_month, days_in_year};

static GLOBAL: OnceLock<Calendar> = OnceLock::new();

/// Number of days from 1900-01-01 up to, but excluding, January 1st of `year`.
///
/// Negative for years before the epoch.
pub(crate) fn days_before_year(year: i32) -> i64 {
    if year >= EPOCH_YEAR {
        (EPOCH_YEAR..year).map(|y| i64::from(days_in_year(y))).sum()
    } else {
        -(year..EPOCH_YEAR).map(|y| i64::from(days_in_year(y))).sum::<i64>()
    }
}

/// Immutable day-counter table covering `start_year..=end_year`.
#[derive(Clone, PartialEq, Eq)]
pub struct CalendarTable {
    start_year:  i32,
    end_year:    i32,
    day_counter: Vec<Option<i32>>,
}

impl CalendarTable {
    /// Walks every year, month and day slot of the window, numbering real
    /// days and leaving the other slots empty.
    pub fn build(start_year: i32, end_year: i32) -> Self {
        debug_assert!(start_year <= end_year);

        let years = usize::try_from(end_year - start_year + 1).unwrap_or(0);
        let mut day_counter = Vec::with_capacity(years * SLOTS_PER_YEAR);
        #[allow(clippy::cast_possible_truncation)]
        let mut counter = days_before_year(start_year) as i32;

        for year in start_year..=end_year {
            for month in 1..=MAX_MONTH {
                let max_day = days_in_month(year, month);
                for slot in 1..=SLOTS_PER_MONTH {
                    if slot <= usize::from(max_day) {
                        counter += 1;
                        day_counter.push(Some(counter));
                    } else {
                        day_counter.push(None);
                    }
                }
            }
        }

        Self {
            start_year,
            end_year,
            day_counter,
        }
    }

    #[inline]
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    #[inline]
    pub const fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Number of slots, valid or not
    #[inline]
    pub fn len(&self) -> usize {
        self.day_counter.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.day_counter.is_empty()
    }

    #[inline]
    pub const fn covers(&self, year: i32) -> bool {
        self.start_year <= year && year <= self.end_year
    }

    /// Linear offset of a slot: `(year - start) * 372 + (month - 1) * 31 + (day - 1)`.
    ///
    /// Returns `None` when the year is outside the window or the month/day
    /// fall outside the slot grid. A day past the month end still maps to its
    /// (empty) slot.
    pub fn index_of(&self, day: u8, month: u8, year: i32) -> Option<usize> {
        if !self.covers(year)
            || !(1..=MAX_MONTH).contains(&month)
            || day < MIN_DAY
            || usize::from(day) > SLOTS_PER_MONTH
        {
            return None;
        }
        let year_offset = usize::try_from(year - self.start_year).ok()?;
        Some(year_offset * SLOTS_PER_YEAR + usize::from(month - 1) * SLOTS_PER_MONTH + usize::from(day - 1))
    }

    /// Raw slot content: the day count, or `None` for an empty slot or a
    /// triple outside the window. Callers validate the day first.
    pub fn day_count_at(&self, day: u8, month: u8, year: i32) -> Option<i32> {
        self.index_of(day, month, year).and_then(|idx| self.slot(idx))
    }

    /// Content of the slot at `index`
    #[inline]
    pub fn slot(&self, index: usize) -> Option<i32> {
        self.day_counter.get(index).copied().flatten()
    }

    /// `(day, month, year)` of the slot at `index`. Empty slots yield an
    /// impossible day such as February 30th.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn date_at(&self, index: usize) -> (u8, u8, i32) {
        let year = self.start_year + (index / SLOTS_PER_YEAR) as i32;
        let in_year = index % SLOTS_PER_YEAR;
        let month = (in_year / SLOTS_PER_MONTH) as u8 + 1;
        let day = (in_year % SLOTS_PER_MONTH) as u8 + 1;
        (day, month, year)
    }
}

impl fmt::Debug for CalendarTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarTable")
            .field("start_year", &self.start_year)
            .field("end_year", &self.end_year)
            .field("slots", &self.day_counter.len())
            .finish()
    }
}

/// Thread-safe owner of a growing [`CalendarTable`] plus the parsing
/// settings used by best-guess conversion.
///
/// [`Calendar::global`] is the process-wide instance used by the
/// [`DateValue`] convenience methods. Independent instances can be built with
/// [`Calendar::new`] or [`Calendar::from_config`]; since day counts share the
/// same epoch, values produced by different calendars compare consistently.
pub struct Calendar {
    min_year:         i32,
    max_year:         i32,
    fallback_formats: Vec<DateFormat>,
    table:            RwLock<Arc<CalendarTable>>,
}

impl Calendar {
    /// Calendar with the default bounds and formats and the given initial window.
    ///
    /// # Errors
    /// Returns `DateError::Config` if the window is inverted or outside the
    /// default bounds.
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, DateError> {
        Self::from_config(&CalendarConfig {
            start_year,
            end_year,
            ..CalendarConfig::default()
        })
    }

    /// # Errors
    /// Returns `DateError::Config` if the configuration does not validate.
    pub fn from_config(config: &CalendarConfig) -> Result<Self, DateError> {
        config.validate()?;
        let fallback_formats = config.parsed_formats()?;
        Ok(Self {
            min_year: config.min_year,
            max_year: config.max_year,
            fallback_formats,
            table: RwLock::new(Arc::new(CalendarTable::build(config.start_year, config.end_year))),
        })
    }

    /// The process-wide calendar, built with the default configuration on
    /// first use unless [`Calendar::install_global`] ran before.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::default)
    }

    /// Configures the process-wide calendar once.
    ///
    /// # Errors
    /// Returns `DateError::Config` if the configuration is invalid or the
    /// global calendar is already in use.
    pub fn install_global(config: &CalendarConfig) -> Result<&'static Self, DateError> {
        let calendar = Self::from_config(config)?;
        GLOBAL
            .set(calendar)
            .map_err(|_| DateError::Config("global calendar already initialized".to_owned()))?;
        Ok(Self::global())
    }

    #[inline]
    pub const fn min_year(&self) -> i32 {
        self.min_year
    }

    #[inline]
    pub const fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Ordered formats tried by best-guess parsing
    pub fn fallback_formats(&self) -> &[DateFormat] {
        &self.fallback_formats
    }

    /// Current table. The snapshot stays valid even if the calendar widens
    /// afterwards.
    pub fn snapshot(&self) -> Arc<CalendarTable> {
        Arc::clone(&self.table.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Current `(start_year, end_year)` window
    pub fn window(&self) -> (i32, i32) {
        let table = self.snapshot();
        (table.start_year(), table.end_year())
    }

    /// Returns a table covering `year`, widening and rebuilding if needed.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if `year` is outside the calendar bounds.
    pub fn ensure_year_covered(&self, year: i64) -> Result<Arc<CalendarTable>, DateError> {
        let year = self.check_bounds(year)?;

        let current = self.snapshot();
        if current.covers(year) {
            return Ok(current);
        }

        let mut guard = self.table.write().unwrap_or_else(PoisonError::into_inner);
        // another writer may have widened while we waited
        if guard.covers(year) {
            return Ok(Arc::clone(&guard));
        }

        let start_year = guard.start_year().min(year);
        let end_year = guard.end_year().max(year);
        debug!(
            old_start = guard.start_year(),
            old_end = guard.end_year(),
            start_year,
            end_year,
            "rebuilding calendar table"
        );
        let rebuilt = Arc::new(CalendarTable::build(start_year, end_year));
        *guard = Arc::clone(&rebuilt);
        Ok(rebuilt)
    }

    fn check_bounds(&self, year: i64) -> Result<i32, DateError> {
        let out_of_range = || DateError::OutOfRange {
            year,
            min: self.min_year,
            max: self.max_year,
        };
        let year = i32::try_from(year).map_err(|_| out_of_range())?;
        if year < self.min_year || year > self.max_year {
            return Err(out_of_range());
        }
        Ok(year)
    }

    /// Builds a midnight date.
    ///
    /// # Errors
    /// Same as [`Calendar::date_time`].
    pub fn date(&self, day: u8, month: u8, year: i32) -> Result<DateValue, DateError> {
        self.date_time(day, month, year, 0, 0, 0)
    }

    /// Builds a date with a time of day, widening the table if needed.
    ///
    /// # Errors
    /// Returns `OutOfRange` for a year outside the bounds, `InvalidMonth`,
    /// `InvalidDay` or `InvalidTime` for impossible fields.
    pub fn date_time(
        &self,
        day: u8,
        month: u8,
        year: i32,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<DateValue, DateError> {
        let table = self.ensure_year_covered(i64::from(year))?;
        DateValue::from_table(&table, day, month, year, TimeOfDay::new(hour, minute, second))
    }

    /// Steps `days` valid days away from `date` through the table slots,
    /// skipping empty ones. The time of day is kept.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the walk leaves the calendar bounds.
    pub fn add_days(&self, date: &DateValue, days: i64) -> Result<DateValue, DateError> {
        let mut table = self.ensure_year_covered(i64::from(date.year()))?;
        let mut index = self.index_in(&table, date.day(), date.month(), date.year())?;
        let forward = days >= 0;
        let mut remaining = days.unsigned_abs();

        while remaining > 0 {
            let at_edge = if forward { index + 1 >= table.len() } else { index == 0 };
            if at_edge {
                let (day, month, year) = table.date_at(index);
                table = self.ensure_year_covered(self.reach_year(&table, year, remaining, forward))?;
                index = self.index_in(&table, day, month, year)?;
                continue;
            }

            index = if forward { index + 1 } else { index - 1 };
            if table.slot(index).is_some() {
                remaining -= 1;
            }
        }

        let (day, month, year) = table.date_at(index);
        let time = date.time_of_day();
        DateValue::from_table(&table, day, month, year, time)
    }

    /// Year a walk of `remaining` days from `year` can reach, at least one
    /// year past the table edge and otherwise clamped to the bounds, so a long
    /// walk widens the table once.
    fn reach_year(&self, table: &CalendarTable, year: i32, remaining: u64, forward: bool) -> i64 {
        let span = i64::try_from(remaining / DAYS_PER_COMMON_YEAR + 1).unwrap_or(i64::MAX);
        if forward {
            let edge = i64::from(table.end_year()) + 1;
            i64::from(year)
                .saturating_add(span)
                .clamp(edge, i64::from(self.max_year).max(edge))
        } else {
            let edge = i64::from(table.start_year()) - 1;
            i64::from(year)
                .saturating_sub(span)
                .clamp(i64::from(self.min_year).min(edge), edge)
        }
    }

    fn index_in(&self, table: &CalendarTable, day: u8, month: u8, year: i32) -> Result<usize, DateError> {
        table.index_of(day, month, year).ok_or(DateError::OutOfRange {
            year: i64::from(year),
            min:  self.min_year,
            max:  self.max_year,
        })
    }

    /// Inverse of [`DateValue::serial_date`]: the integer part is the day
    /// count, the fraction the time of day rounded to the second.
    ///
    /// # Errors
    /// Returns `InvalidSerial` for NaN or infinite input and `OutOfRange`
    /// when the day lies outside the calendar bounds.
    pub fn date_from_serial(&self, serial: f64) -> Result<DateValue, DateError> {
        if !serial.is_finite() {
            return Err(DateError::InvalidSerial(serial.to_string()));
        }

        let first = days_before_year(self.min_year) + 1;
        let last = days_before_year(self.max_year) + i64::from(days_in_year(self.max_year));
        #[allow(clippy::cast_precision_loss)]
        let (first, last) = (first as f64, last as f64);
        let whole = serial.floor();
        if whole < first || whole > last {
            return Err(DateError::InvalidSerial(serial.to_string()));
        }

        #[allow(clippy::cast_possible_truncation)]
        let mut day_count = whole as i64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut seconds = ((serial - whole) * SECONDS_PER_DAY).round() as u32;
        if seconds >= 86_400 {
            day_count += 1;
            seconds = 0;
        }

        let (day, month, year) = civil_from_day_count(day_count);
        #[allow(clippy::cast_possible_truncation)]
        let time = TimeOfDay::new((seconds / 3600) as u8, (seconds / 60 % 60) as u8, (seconds % 60) as u8);
        let table = self.ensure_year_covered(i64::from(year))?;
        DateValue::from_table(&table, day, month, year, time)
    }
}

/// Civil `(day, month, year)` for a day count relative to the epoch.
fn civil_from_day_count(day_count: i64) -> (u8, u8, i32) {
    let mut year = EPOCH_YEAR;
    let mut remaining = day_count;

    while remaining < 1 {
        year -= 1;
        remaining += i64::from(days_in_year(year));
    }
    while remaining > i64::from(days_in_year(year)) {
        remaining -= i64::from(days_in_year(year));
        year += 1;
    }

    let mut month = 1;
    while remaining > i64::from(days_in_month(year, month)) {
        remaining -= i64::from(days_in_month(year, month));
        month += 1;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let day = remaining as u8;
    (day, month, year)
}

impl Default for Calendar {
    fn default() -> Self {
        let config = CalendarConfig::default();
        Self {
            min_year:         config.min_year,
            max_year:         config.max_year,
            fallback_formats: DateFormat::defaults(),
            table:            RwLock::new(Arc::new(CalendarTable::build(config.start_year, config.end_year))),
        }
    }
}

impl fmt::Debug for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start_year, end_year) = self.window();
        f.debug_struct("Calendar")
            .field("min_year", &self.min_year)
            .field("max_year", &self.max_year)
            .field("start_year", &start_year)
            .field("end_year", &end_year)
            .field("fallback_formats", &self.fallback_formats.len())
            .finish()
    }
}

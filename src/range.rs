use std::iter::FusedIterator;

use crate::calendar::Calendar;
use crate::date::DateValue;
use crate::error::DateError;
use crate::prelude::*;
use crate::types::Weekday;

const DAYS_PER_WEEK: i64 = 7;
const BUSINESS_DAYS_PER_WEEK: u64 = 5;

/// An inclusive sequence of dates from `start` towards `end`, `step` days apart.
///
/// The direction follows the endpoints: when `start` is after `end` the
/// sequence walks backwards. The last element is `end` only when the distance
/// is a multiple of the step. Iterating does not consume the range, so it can
/// be walked any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start}..={end} every {step} days")]
pub struct DateRange {
    start: DateValue,
    end:   DateValue,
    step:  i64,
}

/// Builds the range from `start` to `end` stepping `step_days` days.
///
/// # Errors
/// Returns `DateError::InvalidStep` if `step_days` is not positive.
pub fn date_range(start: DateValue, end: DateValue, step_days: i64) -> Result<DateRange, DateError> {
    DateRange::new(start, end, step_days)
}

impl DateRange {
    /// # Errors
    /// Returns `DateError::InvalidStep` if `step_days` is not positive.
    pub fn new(start: DateValue, end: DateValue, step_days: i64) -> Result<Self, DateError> {
        if step_days <= 0 {
            return Err(DateError::InvalidStep(step_days));
        }
        Ok(Self {
            start,
            end,
            step: step_days,
        })
    }

    /// Every day from `start` to `end`
    pub const fn daily(start: DateValue, end: DateValue) -> Self {
        Self { start, end, step: 1 }
    }

    pub const fn start(&self) -> DateValue {
        self.start
    }

    pub const fn end(&self) -> DateValue {
        self.end
    }

    pub const fn step(&self) -> i64 {
        self.step
    }

    /// Whether the range walks backwards in time
    pub fn is_descending(&self) -> bool {
        self.start > self.end
    }

    /// Number of dates the range yields.
    pub fn len(&self) -> usize {
        let descending = self.is_descending();
        let mut days = self.start.day_count().abs_diff(self.end.day_count());

        // the end's own day is out of reach when its time lies behind the start's
        let start_time = time_key(&self.start);
        let end_time = time_key(&self.end);
        let overshoots = if descending { end_time > start_time } else { end_time < start_time };
        if overshoots {
            days = days.saturating_sub(1);
        }

        usize::try_from(days / self.step.unsigned_abs() + 1).unwrap_or(usize::MAX)
    }

    /// Always false: a range holds at least its start.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Walks the range on the global calendar.
    pub fn iter(&self) -> DateRangeIter<'static> {
        self.iter_on(Calendar::global())
    }

    /// Walks the range on `calendar`, which bounds and widens every step.
    pub fn iter_on<'a>(&self, calendar: &'a Calendar) -> DateRangeIter<'a> {
        DateRangeIter {
            calendar,
            next: Some(self.start),
            remaining: self.len(),
            step: if self.is_descending() { -self.step } else { self.step },
        }
    }

    /// Monday-to-Friday dates of the range
    pub fn business_days(&self) -> impl Iterator<Item = DateValue> + '_ {
        self.iter().filter(|date| !date.is_weekend())
    }
}

fn time_key(date: &DateValue) -> (u8, u8, u8) {
    (date.hour(), date.minute(), date.second())
}

/// Iterator over a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateRangeIter<'a> {
    calendar:  &'a Calendar,
    next:      Option<DateValue>,
    remaining: usize,
    step:      i64,
}

impl Iterator for DateRangeIter<'_> {
    type Item = DateValue;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            // a failing step can only lie past the calendar bounds, so the sequence ends there
            self.next = self.calendar.add_days(&current, self.step).ok();
            if self.next.is_none() {
                self.remaining = 0;
            }
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next.is_some() { self.remaining } else { 0 };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRangeIter<'_> {}

impl FusedIterator for DateRangeIter<'_> {}

impl IntoIterator for DateRange {
    type Item = DateValue;
    type IntoIter = DateRangeIter<'static>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = DateValue;
    type IntoIter = DateRangeIter<'static>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Counts the Monday-to-Friday days from `start` to `end`, both included,
/// whichever comes first. Times of day are ignored.
pub fn business_days_between(start: &DateValue, end: &DateValue) -> u64 {
    let (first, last) = if start.day_count() <= end.day_count() {
        (start.day_count(), end.day_count())
    } else {
        (end.day_count(), start.day_count())
    };

    let total = last - first + 1;
    let full_weeks = total / DAYS_PER_WEEK;
    // the leftover days start on the same weekday as `first`
    let leftover = (first + full_weeks * DAYS_PER_WEEK..=last)
        .filter(|&day_count| !Weekday::from_day_count(day_count).is_weekend())
        .count();
    full_weeks.unsigned_abs() * BUSINESS_DAYS_PER_WEEK + leftover as u64
}

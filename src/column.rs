//! Bulk conversion of raw table columns into dates.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use tracing::warn;

use crate::calendar::Calendar;
use crate::convert::RawValue;
use crate::date::DateValue;
use crate::error::DateError;

/// Named columns of raw cells, such as a query result keyed by column name.
pub trait ColumnSource {
    fn column(&self, name: &str) -> Option<&[RawValue]>;
}

impl ColumnSource for BTreeMap<String, Vec<RawValue>> {
    fn column(&self, name: &str) -> Option<&[RawValue]> {
        self.get(name).map(Vec::as_slice)
    }
}

impl<S: BuildHasher> ColumnSource for HashMap<String, Vec<RawValue>, S> {
    fn column(&self, name: &str) -> Option<&[RawValue]> {
        self.get(name).map(Vec::as_slice)
    }
}

impl Calendar {
    /// Converts `rows` one by one with [`Calendar::best_guess`]. Rows for
    /// which `missing` holds become `None`; any other row that fails to
    /// convert aborts the whole column.
    ///
    /// # Errors
    /// The conversion error of the first failing row.
    #[tracing::instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn column_to_dates<F>(&self, rows: &[RawValue], missing: F) -> Result<Vec<Option<DateValue>>, DateError>
    where
        F: Fn(&RawValue) -> bool,
    {
        rows.iter()
            .enumerate()
            .map(|(row, value)| {
                if missing(value) {
                    return Ok(None);
                }
                self.best_guess(value).map(Some).inspect_err(|error| {
                    warn!(row, value = ?value, %error, "unable to convert column value to a date");
                })
            })
            .collect()
    }
}

/// [`Calendar::column_to_dates`] on the global calendar.
///
/// # Errors
/// The conversion error of the first failing row.
pub fn column_to_dates<F>(rows: &[RawValue], missing: F) -> Result<Vec<Option<DateValue>>, DateError>
where
    F: Fn(&RawValue) -> bool,
{
    Calendar::global().column_to_dates(rows, missing)
}

/// # Errors
/// Returns `ColumnNotFound` when `source` has no column called `name`.
pub fn column_by_name<'a, C>(source: &'a C, name: &str) -> Result<&'a [RawValue], DateError>
where
    C: ColumnSource + ?Sized,
{
    source
        .column(name)
        .ok_or_else(|| DateError::ColumnNotFound(name.to_owned()))
}

/// Converts each named column of `source`, keyed by column name.
///
/// # Errors
/// Returns `ColumnNotFound` for an absent column, or the first conversion
/// error met.
pub fn convert_columns<C, F>(
    source: &C,
    names: &[&str],
    missing: F,
) -> Result<BTreeMap<String, Vec<Option<DateValue>>>, DateError>
where
    C: ColumnSource + ?Sized,
    F: Fn(&RawValue) -> bool,
{
    let calendar = Calendar::global();
    let mut converted = BTreeMap::new();
    for name in names {
        let rows = column_by_name(source, name)?;
        let dates = calendar.column_to_dates(rows, &missing).inspect_err(|_| {
            warn!(column = *name, "column conversion failed");
        })?;
        converted.insert((*name).to_owned(), dates);
    }
    Ok(converted)
}

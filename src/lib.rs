//! # report_calendar
//!
//! Calendar arithmetic on spreadsheet-compatible serial dates.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["CalendarConfig"] -->|"Calendar::from_config()"| B["Calendar"]
//!     B -->|"snapshot()"| C["CalendarTable"]
//!     C -->|"day_count_at()"| D["DateValue"]
//!     D -->|".add_days() / .add_months()"| D
//!     E["RawValue / text / chrono"] -->|"from_best_guess()"| D
//!     F["ColumnSource"] -->|"convert_columns()"| D
//!     D -->|"date_range()"| G["DateRange"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use report_calendar::{DateValue, business_days_between, date_range};
//!
//! let date = DateValue::new(15, 1, 2024)?;       // a Monday, serial 45306
//! let later = date.add_months(1)?;                // 2024-02-15
//! let end = DateValue::from_best_guess("31/01/2024")?;
//!
//! let weekly = date_range(date, later, 7)?;
//! let working = business_days_between(&date, &end);
//! ```
//!
//! ## Serial Dates
//!
//! | Date | Serial | Note |
//! |------|--------|------|
//! | 1899-12-31 | 0 | earlier dates are negative |
//! | 1900-01-01 | 1 | epoch |
//! | 1900-02-29 | 60 | kept for spreadsheet compatibility |
//! | 2024-01-15 18:00 | 45306.75 | time is the day fraction |
//!
//! Serial numbers never depend on the window of the calendar table, which
//! grows on demand between [`MIN_YEAR`] and [`MAX_YEAR`].
//!
//! ## Isolated Calendars
//!
//! The `DateValue` arithmetic methods run on [`Calendar::global`]. The same
//! operations exist on [`Calendar`] taking the value, for a calendar with its
//! own bounds:
//!
//! ```ignore
//! let calendar = Calendar::new(2000, 2030)?;
//! let date = calendar.date(31, 1, 2024)?;
//! let next = calendar.add_months(&date, 1)?;      // 2024-02-29
//! let days: Vec<_> = DateRange::daily(date, next).iter_on(&calendar).collect();
//! ```

mod calendar;
mod column;
mod config;
mod consts;
mod convert;
mod date;
mod error;
mod format;
mod prelude;
mod range;
mod types;

pub use calendar::{Calendar, CalendarTable};
pub use column::{ColumnSource, column_by_name, column_to_dates, convert_columns};
pub use config::CalendarConfig;
pub use consts::*;
pub use convert::{RawValue, Timestamp};
pub use date::{DateValue, TimeOfDay};
pub use error::DateError;
pub use format::{DateFormat, month_name};
pub use range::{DateRange, DateRangeIter, business_days_between, date_range};
pub use types::{
    DayDelta, Weekday, days_in_month, days_in_year, is_leap_year, quarter_end_month, quarter_of, quarter_start_month,
};

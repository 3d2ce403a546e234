/// Smallest year a calendar will ever widen to (inclusive)
pub const MIN_YEAR: i32 = 1;

/// Largest year a calendar will ever widen to (inclusive)
pub const MAX_YEAR: i32 = 9999;

/// Year whose January 1st carries day count 1
pub const EPOCH_YEAR: i32 = 1900;

/// Default lower bound of the table window
pub const DEFAULT_START_YEAR: i32 = 1900;

/// Default upper bound of the table window
pub const DEFAULT_END_YEAR: i32 = 2100;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Day slots reserved for every month in the calendar table
pub const SLOTS_PER_MONTH: usize = 31;

/// Day slots reserved for every year in the calendar table
pub const SLOTS_PER_YEAR: usize = SLOTS_PER_MONTH * MAX_MONTH as usize;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Months per quarter
pub const MONTHS_PER_QUARTER: u8 = 3;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Days in a common year; every year has at least this many
pub const DAYS_PER_COMMON_YEAR: u64 = 365;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;
/// Spreadsheet-compatible leap year that the Gregorian rule rejects
pub(crate) const FORCED_LEAP_YEAR: i32 = 1900;

/// Hours, minutes and seconds per day, used for the serial time fraction
pub(crate) const HOURS_PER_DAY: f64 = 24.0;
pub(crate) const MINUTES_PER_DAY: f64 = 1_440.0;
pub(crate) const SECONDS_PER_DAY: f64 = 86_400.0;

/// Average month length used by `months_between`
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;
/// Average year length used by `years_between`
pub const AVERAGE_DAYS_PER_YEAR: f64 = 365.25;

/// Format used by `Display` and serialization of midnight values
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
/// Format used for serialization of values with a time of day
pub const ISO_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats tried, in order, by best-guess parsing
pub const DEFAULT_FALLBACK_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y%m%d",
];

//! Logical day arithmetic.
//!
//! A logical day starts at a configurable reset hour instead of midnight:
//! clock times before the reset hour belong to the previous calendar day.

use chrono::{DateTime, Days, Local, NaiveDate, Timelike};

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// The logical day `now` falls into.
pub fn logical_day(now: DateTime<Local>, reset_hour: u32) -> NaiveDate {
    let date = now.date_naive();
    if now.hour() < reset_hour {
        date.checked_sub_days(Days::new(1)).unwrap_or(date)
    } else {
        date
    }
}

/// History key for a day, ISO formatted so that lexical order matches
/// chronological order.
pub fn day_key(day: NaiveDate) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}

pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}

/// Today's reset instant: `reset_hour:00` on the calendar date of `now`.
/// Falls back to `now` itself on a DST gap.
pub fn reset_time_on(now: DateTime<Local>, reset_hour: u32) -> DateTime<Local> {
    now.date_naive()
        .and_hms_opt(reset_hour.min(23), 0, 0)
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .unwrap_or(now)
}

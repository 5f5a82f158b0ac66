// Date utility functions
// Wire format for calendar dates is ISO `YYYY-MM-DD`; weeks start on Monday.

use chrono::{Datelike, Duration, NaiveDate};

use super::time::TimeError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an API date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Result<NaiveDate, TimeError> {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return Err(TimeError::MalformedDate(value.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| TimeError::MalformedDate(value.to_string()))
}

/// Format a date for the API.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Sunday of the week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// The seven dates of the week containing `date`, Monday first.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(date);
    (0..7).map(|offset| start + Duration::days(offset)).collect()
}

/// Hour rows shown by the day/week grid, both ends inclusive.
pub fn working_hours(start_hour: u32, end_hour: u32) -> Vec<u32> {
    (start_hour..=end_hour).collect()
}

pub fn is_past_date(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

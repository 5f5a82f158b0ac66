//! `HH:mm` time-of-day arithmetic.
//!
//! All scheduling math in the crate works on minute offsets from midnight.
//! Parsing is strict: anything that is not a zero-padded 24-hour `HH:mm`
//! string is rejected with a [`TimeError`] rather than silently mapped to 0.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

mod range;

pub use range::TimeRange;

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("'{0}' is not a valid HH:mm time")]
    Malformed(String),
    #[error("'{0}' is out of range (expected 00:00-23:59)")]
    OutOfRange(String),
    #[error("'{0}' is not a valid YYYY-MM-DD date")]
    MalformedDate(String),
}

/// Convert a zero-padded `HH:mm` string into minutes since midnight.
///
/// # Errors
/// Returns [`TimeError::Malformed`] when the text is not exactly two digits,
/// a colon and two digits, and [`TimeError::OutOfRange`] when the hour is
/// above 23 or the minute above 59.
///
/// # Examples
/// ```
/// use calendar_planner::utils::time::time_to_minutes;
/// assert_eq!(time_to_minutes("09:30").unwrap(), 570);
/// assert!(time_to_minutes("9:30").is_err());
/// ```
pub fn time_to_minutes(hhmm: &str) -> Result<u32, TimeError> {
    let bytes = hhmm.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(TimeError::Malformed(hhmm.to_string()));
    }

    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(TimeError::Malformed(hhmm.to_string()));
    }

    let hours = u32::from(digits[0] - b'0') * 10 + u32::from(digits[1] - b'0');
    let minutes = u32::from(digits[2] - b'0') * 10 + u32::from(digits[3] - b'0');

    if hours > 23 || minutes > 59 {
        return Err(TimeError::OutOfRange(hhmm.to_string()));
    }

    Ok(hours * MINUTES_PER_HOUR + minutes)
}

/// Format minutes since midnight as zero-padded `HH:mm`.
///
/// Values past the end of the day are not wrapped (`1500` formats as
/// `"25:00"`); callers clamp before formatting.
pub fn minutes_to_time(total_minutes: u32) -> String {
    format!(
        "{:02}:{:02}",
        total_minutes / MINUTES_PER_HOUR,
        total_minutes % MINUTES_PER_HOUR
    )
}

/// A time of day, stored as minutes since midnight.
///
/// Serialized on the wire as `HH:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Build from a minute offset. Returns `None` past 23:59.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Build from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * MINUTES_PER_HOUR + minute))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / MINUTES_PER_HOUR
    }

    pub fn minute(self) -> u32 {
        self.0 % MINUTES_PER_HOUR
    }

    /// Add minutes, returning `None` if the result leaves the day.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.0.checked_add(minutes)?)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&minutes_to_time(self.0))
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time_to_minutes(s).map(ClockTime)
    }
}

impl TryFrom<&str> for ClockTime {
    type Error = TimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("00:00", 0)]
    #[test_case("09:00", 540)]
    #[test_case("09:30", 570)]
    #[test_case("12:05", 725)]
    #[test_case("23:59", 1439)]
    fn test_time_to_minutes_valid(input: &str, expected: u32) {
        assert_eq!(time_to_minutes(input).unwrap(), expected);
    }

    #[test_case("9:30" ; "missing hour padding")]
    #[test_case("09:3" ; "missing minute padding")]
    #[test_case("0930" ; "no colon")]
    #[test_case("ab:cd" ; "letters")]
    #[test_case("" ; "empty")]
    #[test_case(" 09:30" ; "leading space")]
    fn test_time_to_minutes_malformed(input: &str) {
        assert!(matches!(time_to_minutes(input), Err(TimeError::Malformed(_))));
    }

    #[test]
    fn test_time_to_minutes_out_of_range() {
        assert!(matches!(time_to_minutes("24:00"), Err(TimeError::OutOfRange(_))));
        assert!(matches!(time_to_minutes("10:60"), Err(TimeError::OutOfRange(_))));
    }

    #[test]
    fn test_minutes_to_time_pads() {
        assert_eq!(minutes_to_time(0), "00:00");
        assert_eq!(minutes_to_time(65), "01:05");
        assert_eq!(minutes_to_time(1439), "23:59");
    }

    #[test]
    fn test_minutes_to_time_does_not_wrap() {
        assert_eq!(minutes_to_time(1440), "24:00");
        assert_eq!(minutes_to_time(1500), "25:00");
    }

    #[test]
    fn test_clock_time_serde_uses_hhmm() {
        let time: ClockTime = "07:45".parse().unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"07:45\"");

        let back: ClockTime = serde_json::from_str("\"07:45\"").unwrap();
        assert_eq!(back, time);

        assert!(serde_json::from_str::<ClockTime>("\"7:45\"").is_err());
    }

    #[test]
    fn test_clock_time_checked_add() {
        let time = ClockTime::from_hm(23, 0).unwrap();
        assert_eq!(time.checked_add_minutes(59).unwrap().to_string(), "23:59");
        assert!(time.checked_add_minutes(60).is_none());
    }
}

use std::collections::BTreeSet;

use crate::utils::time::{ClockTime, MINUTES_PER_HOUR};

/// Visible working hours and snapping granularity of the day grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    /// First hour row.
    pub start_hour: u32,
    /// Last hour row, inclusive.
    pub end_hour: u32,
    pub interval_minutes: u32,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            start_hour: 0,
            end_hour: 23,
            interval_minutes: 30,
        }
    }
}

impl TimeGrid {
    pub fn validate(&self) -> Result<(), String> {
        if self.end_hour > 23 {
            return Err(format!("End hour {} must be between 0 and 23", self.end_hour));
        }
        if self.start_hour > self.end_hour {
            return Err("Start hour must not be after end hour".to_string());
        }
        if self.interval_minutes == 0 || MINUTES_PER_HOUR % self.interval_minutes != 0 {
            return Err(format!(
                "Interval of {} minutes must evenly divide an hour",
                self.interval_minutes
            ));
        }
        Ok(())
    }

    /// Number of hour rows (`end_hour` inclusive).
    pub fn hours(&self) -> u32 {
        self.end_hour.saturating_sub(self.start_hour) + 1
    }

    pub fn intervals_per_hour(&self) -> u32 {
        MINUTES_PER_HOUR / self.interval_minutes.max(1)
    }

    pub fn total_intervals(&self) -> u32 {
        self.hours() * self.intervals_per_hour()
    }

    pub fn first_minute(&self) -> u32 {
        self.start_hour * MINUTES_PER_HOUR
    }

    /// Minute offset of the start of interval `index`.
    pub fn minute_at(&self, index: u32) -> u32 {
        self.first_minute() + index * self.interval_minutes
    }
}

/// One entry of the start/end time pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOption {
    pub time: ClockTime,
    pub busy: bool,
}

/// Picker entries from `start_hour:00` to `end_hour:00`, one per interval.
pub fn time_options(grid: &TimeGrid, busy: &BTreeSet<ClockTime>) -> Vec<TimeOption> {
    let step = grid.interval_minutes.max(1) as usize;
    let last = grid.end_hour * MINUTES_PER_HOUR;

    (grid.first_minute()..=last)
        .step_by(step)
        .filter_map(ClockTime::from_minutes)
        .map(|time| TimeOption {
            time,
            busy: busy.contains(&time),
        })
        .collect()
}

/// Entries at least one interval after `start`.
pub fn end_time_options(
    grid: &TimeGrid,
    start: ClockTime,
    busy: &BTreeSet<ClockTime>,
) -> Vec<TimeOption> {
    let min_end = start.minutes() + grid.interval_minutes;
    time_options(grid, busy)
        .into_iter()
        .filter(|option| option.time.minutes() >= min_end)
        .collect()
}

/// The earliest valid end time for `start`, if the grid has one.
pub fn valid_end_time(grid: &TimeGrid, start: ClockTime) -> Option<ClockTime> {
    end_time_options(grid, start, &BTreeSet::new())
        .first()
        .map(|option| option.time)
}

/// A range is valid when it lasts at least one interval and stays within
/// `start_hour:00..=end_hour:00`.
pub fn validate_time_range(grid: &TimeGrid, start: ClockTime, end: ClockTime) -> bool {
    let (start, end) = (start.minutes(), end.minutes());
    end > start
        && end - start >= grid.interval_minutes
        && start >= grid.first_minute()
        && end <= grid.end_hour * MINUTES_PER_HOUR
}

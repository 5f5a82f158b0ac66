// Test fixtures - reusable test data
// Shared by the integration tests

#![allow(dead_code)]

use calendar_planner::models::calendar::Calendar;
use calendar_planner::models::event::Event;
use calendar_planner::models::recurrence::RepeatFrequency;
use calendar_planner::utils::time::ClockTime;
use chrono::NaiveDate;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn time(value: &str) -> ClockTime {
    value.parse().unwrap()
}

/// A single event in `calendar_id` on `day`.
pub fn event(calendar_id: &str, title: &str, day: NaiveDate, start: &str, end: &str) -> Event {
    Event::builder()
        .title(title)
        .date(day)
        .start_time(time(start))
        .end_time(time(end))
        .calendar_id(calendar_id)
        .build()
        .unwrap()
}

pub fn weekly(calendar_id: &str, title: &str, day: NaiveDate, start: &str, end: &str) -> Event {
    let mut event = event(calendar_id, title, day, start, end);
    event.repeat = RepeatFrequency::Weekly;
    event
}

/// A server-side calendar owned by the test user.
pub fn calendar(name: &str) -> Calendar {
    let mut calendar = Calendar::new(name, "#3B82F6").unwrap();
    calendar.owner = Some(USER_ID.to_string());
    calendar
}

pub const USER_ID: &str = "user-1";

//! Busy-slot and overlap calculation for one calendar day.
//!
//! All ranges are half-open `[start, end)` in minutes since midnight, so
//! back-to-back events (`09:00-10:00`, `10:00-11:00`) do not conflict.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::event::Event;
use crate::utils::time::{ClockTime, TimeRange};

mod options;

pub use options::{
    end_time_options, time_options, valid_end_time, validate_time_range, TimeGrid, TimeOption,
};

/// Half-open overlap test. Symmetric; empty ranges never conflict.
pub fn conflicts(a: &TimeRange, b: &TimeRange) -> bool {
    a.overlaps(b)
}

/// Events of `calendar_id` on `date`, minus the event being edited.
pub fn day_events<'a>(
    events: &'a [Event],
    calendar_id: &str,
    date: NaiveDate,
    exclude_id: Option<&str>,
) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| event.calendar_id == calendar_id && event.date == date)
        .filter(|event| exclude_id != Some(event.id.as_str()))
        .collect()
}

/// Every `granularity`-aligned instant covered by one of `events`.
///
/// An instant `t` is busy when some event has `start <= t < end`.
pub fn busy_slots<'a, I>(events: I, granularity: u32) -> BTreeSet<ClockTime>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut busy = BTreeSet::new();
    if granularity == 0 {
        return busy;
    }

    for event in events {
        let range = event.time_range();
        let first = range.start.div_ceil(granularity) * granularity;
        let mut t = first;
        while t < range.end {
            if let Some(slot) = ClockTime::from_minutes(t) {
                busy.insert(slot);
            }
            t += granularity;
        }
    }

    busy
}

/// Events whose range overlaps `candidate`, skipping `exclude_id`.
pub fn find_conflicts<'a, I>(
    candidate: &TimeRange,
    events: I,
    exclude_id: Option<&str>,
) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .filter(|event| exclude_id != Some(event.id.as_str()))
        .filter(|event| conflicts(candidate, &event.time_range()))
        .collect()
}

/// First event in `calendar_id` on `date` that overlaps `candidate`.
pub fn first_conflict<'a>(
    events: &'a [Event],
    calendar_id: &str,
    date: NaiveDate,
    candidate: &TimeRange,
    exclude_id: Option<&str>,
) -> Option<&'a Event> {
    find_conflicts(
        candidate,
        day_events(events, calendar_id, date, exclude_id),
        None,
    )
    .into_iter()
    .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn event(id: &str, start: &str, end: &str, calendar: &str) -> Event {
        Event::builder()
            .id(id)
            .title(id)
            .date(d())
            .start_time(start.parse().unwrap())
            .end_time(end.parse().unwrap())
            .calendar_id(calendar)
            .build()
            .unwrap()
    }

    fn t(value: &str) -> ClockTime {
        value.parse().unwrap()
    }

    #[test]
    fn test_conflicts_is_symmetric() {
        let a = TimeRange::new(540, 600);
        let b = TimeRange::new(570, 630);
        assert_eq!(conflicts(&a, &b), conflicts(&b, &a));
        assert!(conflicts(&a, &b));
    }

    #[test]
    fn test_touching_ranges_do_not_conflict() {
        let a = TimeRange::new(540, 600);
        let c = TimeRange::new(600, 660);
        assert!(!conflicts(&a, &c));
    }

    #[test]
    fn test_busy_slots_for_aligned_events() {
        let events = vec![event("a", "09:00", "10:00", "c"), event("b", "11:00", "11:30", "c")];
        let busy = busy_slots(&events, 30);
        assert_eq!(
            busy.into_iter().collect::<Vec<_>>(),
            vec![t("09:00"), t("09:30"), t("11:00")]
        );
    }

    #[test]
    fn test_busy_slots_unaligned_event_marks_covered_instants_only() {
        let events = vec![event("a", "09:15", "09:45", "c")];
        let busy = busy_slots(&events, 30);
        assert_eq!(busy.into_iter().collect::<Vec<_>>(), vec![t("09:30")]);
    }

    #[test]
    fn test_busy_slots_zero_granularity() {
        let events = vec![event("a", "09:00", "10:00", "c")];
        assert!(busy_slots(&events, 0).is_empty());
    }

    #[test]
    fn test_day_events_filters_calendar_date_and_excluded() {
        let mut other_day = event("x", "09:00", "10:00", "c");
        other_day.date = d().succ_opt().unwrap();
        let events = vec![
            event("a", "09:00", "10:00", "c"),
            event("b", "09:00", "10:00", "other"),
            event("self", "12:00", "13:00", "c"),
            other_day,
        ];

        let ids: Vec<_> = day_events(&events, "c", d(), Some("self"))
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_find_conflicts_excludes_self() {
        let events = vec![event("a", "09:00", "10:00", "c"), event("b", "09:30", "10:30", "c")];
        let candidate = events[0].time_range();

        let hits = find_conflicts(&candidate, &events, Some("a"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }

    #[test]
    fn test_first_conflict_only_in_same_calendar() {
        let events = vec![event("a", "09:00", "10:00", "other")];
        let candidate = TimeRange::new(540, 600);
        assert!(first_conflict(&events, "c", d(), &candidate, None).is_none());
        assert!(first_conflict(&events, "other", d(), &candidate, None).is_some());
    }
}

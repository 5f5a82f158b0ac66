// Shared event module
// The subset of an event carried by a share link

use chrono::NaiveDate;

use crate::models::event::{new_event_id, Event};
use crate::models::recurrence::RepeatFrequency;
use crate::utils::time::{ClockTime, TimeRange};

/// Event data decoded from a share link, before it is imported into a calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedEvent {
    pub id: Option<String>,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub calendar_id: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub repeat: RepeatFrequency,
    pub all_day: bool,
}

impl SharedEvent {
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: Some(event.id.clone()),
            title: event.title.clone(),
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            calendar_id: Some(event.calendar_id.clone()),
            description: event.description.clone().filter(|d| !d.is_empty()),
            color: event.color.clone().filter(|c| !c.is_empty()),
            repeat: event.repeat,
            all_day: event.all_day,
        }
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::from_clock(self.start_time, self.end_time)
    }

    /// Materialize as a new event in `calendar_id`, with a fresh id.
    pub fn into_event(self, calendar_id: &str) -> Result<Event, String> {
        let mut builder = Event::builder()
            .id(new_event_id())
            .title(self.title)
            .date(self.date)
            .start_time(self.start_time)
            .end_time(self.end_time)
            .calendar_id(calendar_id)
            .all_day(self.all_day)
            .repeat(self.repeat);

        if let Some(description) = self.description {
            builder = builder.description(description);
        }
        if let Some(color) = self.color {
            builder = builder.color(color);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut event = Event::new(
            "Lunch",
            date,
            "12:00".parse().unwrap(),
            "13:00".parse().unwrap(),
            "cal-a",
        )
        .unwrap();
        event.color = Some("#FF0000".to_string());
        event.description = Some(String::new());
        event
    }

    #[test]
    fn test_from_event_drops_empty_description() {
        let shared = SharedEvent::from_event(&sample_event());
        assert!(shared.description.is_none());
        assert_eq!(shared.color.as_deref(), Some("#FF0000"));
        assert_eq!(shared.calendar_id.as_deref(), Some("cal-a"));
    }

    #[test]
    fn test_into_event_uses_target_calendar_and_new_id() {
        let original = sample_event();
        let imported = SharedEvent::from_event(&original).into_event("cal-b").unwrap();

        assert_ne!(imported.id, original.id);
        assert_eq!(imported.calendar_id, "cal-b");
        assert_eq!(imported.title, "Lunch");
        assert_eq!(imported.time_range(), original.time_range());
    }
}

// Event module
// Calendar event model as exchanged with the REST API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::recurrence::RepeatFrequency;
use crate::utils::time::{ClockTime, TimeRange};

mod patch;

pub use patch::EventPatch;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    #[default]
    Popup,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(rename = "type", default)]
    pub kind: ReminderKind,
    pub minutes_before: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Tentative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub status: AttendeeStatus,
    #[serde(default)]
    pub is_organizer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl EventLocation {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A single calendar event on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub calendar_id: String,
    #[serde(default)]
    pub repeat: RepeatFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<EventLocation>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing)]
    pub is_owned: bool,
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Create a new event with required fields and a fresh id
    ///
    /// # Examples
    /// ```
    /// use calendar_planner::models::event::Event;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let event = Event::new(
    ///     "Team Meeting",
    ///     date,
    ///     "09:00".parse().unwrap(),
    ///     "10:00".parse().unwrap(),
    ///     "default",
    /// )
    /// .unwrap();
    /// assert_eq!(event.duration_minutes(), 60);
    /// ```
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: ClockTime,
        end_time: ClockTime,
        calendar_id: impl Into<String>,
    ) -> Result<Self, String> {
        let event = Self {
            id: new_event_id(),
            title: title.into(),
            description: None,
            date,
            start_time,
            end_time,
            all_day: false,
            color: None,
            calendar_id: calendar_id.into(),
            repeat: RepeatFrequency::None,
            repeat_id: None,
            repeat_end_date: None,
            reminders: Vec::new(),
            attendees: Vec::new(),
            location: None,
            is_private: false,
            status: EventStatus::Confirmed,
            url: None,
            is_owned: true,
            created_at: None,
            updated_at: None,
        };

        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Event id cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(format!(
                "Title cannot be more than {} characters",
                MAX_TITLE_LEN
            ));
        }

        if let Some(ref description) = self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(format!(
                    "Description cannot be more than {} characters",
                    MAX_DESCRIPTION_LEN
                ));
            }
        }

        if self.end_time <= self.start_time {
            return Err("End time must be after start time".to_string());
        }

        if self.calendar_id.trim().is_empty() {
            return Err("Event calendar is required".to_string());
        }

        if let Some(ref color) = self.color {
            if !is_hex_color(color) {
                return Err("Color must be in hex format (#RRGGBB)".to_string());
            }
        }

        if let Some(end) = self.repeat_end_date {
            if end < self.date {
                return Err("Repeat end date cannot be before the event date".to_string());
            }
        }

        if let Some(attendee) = self.attendees.iter().find(|a| !is_plausible_email(&a.email)) {
            return Err(format!("'{}' is not a valid attendee email", attendee.email));
        }

        Ok(())
    }

    pub fn is_recurring(&self) -> bool {
        self.repeat.is_recurring()
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::from_clock(self.start_time, self.end_time)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.time_range().duration()
    }

    /// Color to render with: the event's own or the calendar's.
    pub fn effective_color<'a>(&'a self, calendar_color: &'a str) -> &'a str {
        self.color.as_deref().unwrap_or(calendar_color)
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    date: Option<NaiveDate>,
    start_time: Option<ClockTime>,
    end_time: Option<ClockTime>,
    all_day: bool,
    color: Option<String>,
    calendar_id: Option<String>,
    repeat: RepeatFrequency,
    repeat_end_date: Option<NaiveDate>,
    location: Option<EventLocation>,
    reminders: Vec<Reminder>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            title: None,
            description: None,
            date: None,
            start_time: None,
            end_time: None,
            all_day: false,
            color: None,
            calendar_id: None,
            repeat: RepeatFrequency::None,
            repeat_end_date: None,
            location: None,
            reminders: Vec::new(),
        }
    }

    /// Use a specific id instead of a generated one
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn start_time(mut self, start: ClockTime) -> Self {
        self.start_time = Some(start);
        self
    }

    pub fn end_time(mut self, end: ClockTime) -> Self {
        self.end_time = Some(end);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Set the event color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    pub fn repeat(mut self, repeat: RepeatFrequency) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn repeat_end_date(mut self, end: NaiveDate) -> Self {
        self.repeat_end_date = Some(end);
        self
    }

    pub fn location(mut self, location: EventLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn reminder(mut self, reminder: Reminder) -> Self {
        self.reminders.push(reminder);
        self
    }

    pub fn build(self) -> Result<Event, String> {
        let title = self.title.ok_or("Event title is required")?;
        let date = self.date.ok_or("Event date is required")?;
        let start_time = self.start_time.ok_or("Event start time is required")?;
        let end_time = self.end_time.ok_or("Event end time is required")?;
        let calendar_id = self.calendar_id.ok_or("Event calendar is required")?;

        let event = Event {
            id: self.id.unwrap_or_else(new_event_id),
            title: title.trim().to_string(),
            description: self.description,
            date,
            start_time,
            end_time,
            all_day: self.all_day,
            color: self.color,
            calendar_id,
            repeat: self.repeat,
            repeat_id: None,
            repeat_end_date: self.repeat_end_date,
            reminders: self.reminders,
            attendees: Vec::new(),
            location: self.location,
            is_private: false,
            status: EventStatus::Confirmed,
            url: None,
            is_owned: true,
            created_at: None,
            updated_at: None,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn new_event_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

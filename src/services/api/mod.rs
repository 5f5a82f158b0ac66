//! REST collaborator.
//!
//! [`CalendarApi`] is the seam between the stores and the server. The
//! production implementation, [`HttpCalendarApi`], is a blocking `reqwest`
//! client; tests substitute a mock.

use chrono::NaiveDate;

use crate::models::calendar::{Calendar, CalendarPatch, SharePermission};
use crate::models::event::{Event, EventPatch};
use crate::utils::date::format_date;

mod client;
mod envelope;
mod error;

pub use client::HttpCalendarApi;
pub use error::ApiError;

/// Filters for `GET /events`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub calendar_id: Option<String>,
}

impl EventQuery {
    pub fn for_calendar(calendar_id: impl Into<String>) -> Self {
        Self {
            calendar_id: Some(calendar_id.into()),
            ..Self::default()
        }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            calendar_id: None,
        }
    }

    /// Query string including the leading `?`, or empty when unfiltered.
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(start) = self.start_date {
            params.push(format!("startDate={}", format_date(start)));
        }
        if let Some(end) = self.end_date {
            params.push(format!("endDate={}", format_date(end)));
        }
        if let Some(ref calendar_id) = self.calendar_id {
            params.push(format!("calendarId={}", urlencoding::encode(calendar_id)));
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Operations offered by the calendar REST API.
#[cfg_attr(test, mockall::automock)]
pub trait CalendarApi {
    fn health_check(&self) -> Result<(), ApiError>;

    fn list_calendars(&self) -> Result<Vec<Calendar>, ApiError>;
    fn get_calendar(&self, id: &str) -> Result<Calendar, ApiError>;
    fn create_calendar(&self, calendar: &Calendar) -> Result<Calendar, ApiError>;
    /// Create the caller's default calendar, or return the existing one.
    fn create_default_calendar(&self) -> Result<Calendar, ApiError>;
    fn update_calendar(&self, id: &str, patch: &CalendarPatch) -> Result<Calendar, ApiError>;
    fn delete_calendar(&self, id: &str) -> Result<(), ApiError>;
    /// Flip the calendar's `visible` flag and return the updated calendar.
    fn toggle_calendar_visibility(&self, id: &str) -> Result<Calendar, ApiError>;
    fn share_calendar(
        &self,
        id: &str,
        email: &str,
        permission: SharePermission,
    ) -> Result<(), ApiError>;

    fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>, ApiError>;
    fn get_event(&self, id: &str) -> Result<Event, ApiError>;
    fn create_event(&self, event: &Event) -> Result<Event, ApiError>;
    fn update_event(&self, id: &str, patch: &EventPatch) -> Result<Event, ApiError>;
    fn delete_event(&self, id: &str) -> Result<(), ApiError>;
    fn move_event(&self, id: &str, new_calendar_id: &str) -> Result<Event, ApiError>;
    fn duplicate_event(
        &self,
        id: &str,
        new_id: &str,
        new_calendar_id: &str,
    ) -> Result<Event, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        assert_eq!(EventQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_calendar_only_query() {
        assert_eq!(
            EventQuery::for_calendar("work").to_query_string(),
            "?calendarId=work"
        );
    }

    #[test]
    fn test_query_string() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let query = EventQuery {
            calendar_id: Some("team cal".to_string()),
            ..EventQuery::between(start, end)
        };
        assert_eq!(
            query.to_query_string(),
            "?startDate=2024-01-01&endDate=2024-01-07&calendarId=team%20cal"
        );
    }
}

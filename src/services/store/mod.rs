//! Client-side state: optimistic event and calendar stores and the
//! [`Workspace`] that drives them against the REST API.

use thiserror::Error;

use crate::models::event::Event;
use crate::services::api::ApiError;

mod calendars;
mod events;
mod pending;
mod workspace;

pub use calendars::CalendarStore;
pub use events::{EventStore, COPY_SUFFIX};
pub use pending::{MutationKind, PendingMutation, Reconciliation};
pub use workspace::Workspace;

/// Why a store operation was refused or could not be completed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("Permission denied for calendar '{0}'")]
    Forbidden(String),
    #[error("'{0}' was not found")]
    NotFound(String),
    #[error("Time slot conflicts with \"{}\" ({}-{})", .0.title, .0.start_time, .0.end_time)]
    Conflict(Box<Event>),
    #[error("Calendar '{0}' is completed")]
    CalendarCompleted(String),
    #[error("The default calendar cannot be deleted")]
    DefaultCalendar,
    #[error("No active calendar selected")]
    NoActiveCalendar,
    #[error("Cannot create events in the past")]
    PastDate,
    /// The server rejected the change; local state was reloaded.
    #[error("Sync failed: {0}")]
    Sync(ApiError),
}

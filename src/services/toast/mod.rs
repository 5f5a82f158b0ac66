//! Toast notifications for brief feedback messages.
//!
//! Every store outcome is reported as a toast. The queue only holds them;
//! showing and timing them out is up to the front end.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

/// Types of toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Info => "ℹ",
            ToastLevel::Warning => "⚠",
            ToastLevel::Error => "✗",
        }
    }
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Error)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.icon(), self.message)
    }
}

/// The user-facing outcomes of calendar operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    EventCreated { title: String },
    EventUpdated { title: String },
    EventDeleted { title: String },
    EventMoved { title: String, calendar: String },
    EventDuplicated { title: String },
    RecurringCreated { title: String },
    EventImported { title: String },
    CalendarCreated { name: String },
    CalendarUpdated { name: String },
    CalendarDeleted { name: String },
    CalendarCompleted { name: String, completed: bool },
    CalendarShared { name: String, email: String },
    TimeConflict { title: String, start: String, end: String },
    ImportConflict { title: String, start: String, end: String },
    CreationNotAllowed { calendar: Option<String> },
    CompletedCalendarCreate,
    CompletedCalendarEdit,
    DefaultCalendarUndeletable,
    NoActiveCalendar,
    PastDate,
    PermissionDenied,
    SaveError,
    SavedOffline { title: String },
    SyncFailed,
    LinkCreated,
    ShareError,
    InvalidSharedData,
    ImportError,
}

impl Notice {
    pub fn level(&self) -> ToastLevel {
        match self {
            Notice::EventCreated { .. }
            | Notice::EventUpdated { .. }
            | Notice::EventDeleted { .. }
            | Notice::EventMoved { .. }
            | Notice::EventDuplicated { .. }
            | Notice::RecurringCreated { .. }
            | Notice::EventImported { .. }
            | Notice::CalendarCreated { .. }
            | Notice::CalendarUpdated { .. }
            | Notice::CalendarDeleted { .. }
            | Notice::CalendarShared { .. }
            | Notice::LinkCreated => ToastLevel::Success,
            Notice::CalendarCompleted { .. } | Notice::SavedOffline { .. } => ToastLevel::Info,
            Notice::ImportConflict { .. }
            | Notice::CompletedCalendarCreate
            | Notice::CompletedCalendarEdit
            | Notice::NoActiveCalendar
            | Notice::PastDate
            | Notice::DefaultCalendarUndeletable => ToastLevel::Warning,
            Notice::TimeConflict { .. }
            | Notice::CreationNotAllowed { .. }
            | Notice::PermissionDenied
            | Notice::SaveError
            | Notice::SyncFailed
            | Notice::ShareError
            | Notice::InvalidSharedData
            | Notice::ImportError => ToastLevel::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::EventCreated { title } => format!("Event \"{}\" has been created", title),
            Notice::EventUpdated { title } => format!("Event \"{}\" has been updated", title),
            Notice::EventDeleted { title } => format!("Event \"{}\" has been deleted", title),
            Notice::EventMoved { title, calendar } => {
                format!("Event \"{}\" has been moved to \"{}\"", title, calendar)
            }
            Notice::EventDuplicated { title } => format!("Event \"{}\" has been duplicated", title),
            Notice::RecurringCreated { title } => {
                format!("Recurring events \"{}\" have been created", title)
            }
            Notice::EventImported { title } => {
                format!("Event \"{}\" has been imported to your calendar", title)
            }
            Notice::CalendarCreated { name } => format!("Calendar \"{}\" has been created", name),
            Notice::CalendarUpdated { name } => format!("Calendar \"{}\" has been updated", name),
            Notice::CalendarDeleted { name } => format!("Calendar \"{}\" has been deleted", name),
            Notice::CalendarCompleted { name, completed: true } => {
                format!("Calendar \"{}\" marked as completed", name)
            }
            Notice::CalendarCompleted { name, completed: false } => {
                format!("Calendar \"{}\" marked as incomplete", name)
            }
            Notice::CalendarShared { name, email } => {
                format!("Calendar \"{}\" has been shared with {}", name, email)
            }
            Notice::TimeConflict { title, start, end } => format!(
                "This time slot conflicts with \"{}\" ({} - {}) in the same calendar.",
                title, start, end
            ),
            Notice::ImportConflict { title, start, end } => format!(
                "Imported event overlaps \"{}\" ({} - {}) in the same calendar.",
                title, start, end
            ),
            Notice::CreationNotAllowed { calendar: Some(name) } => {
                format!("Cannot create event in calendar \"{}\"", name)
            }
            Notice::CreationNotAllowed { calendar: None } => {
                "Cannot create event in selected calendar".to_string()
            }
            Notice::CompletedCalendarCreate => {
                "Cannot create events in completed calendar. Mark it as incomplete first."
                    .to_string()
            }
            Notice::CompletedCalendarEdit => {
                "Cannot edit events in completed calendar. Mark it as incomplete first.".to_string()
            }
            Notice::DefaultCalendarUndeletable => "The default calendar cannot be deleted".to_string(),
            Notice::NoActiveCalendar => "Please select an active calendar first".to_string(),
            Notice::PastDate => "Cannot create events in the past".to_string(),
            Notice::PermissionDenied => {
                "You do not have permission to change this calendar".to_string()
            }
            Notice::SaveError => "Failed to save event. Please try again.".to_string(),
            Notice::SavedOffline { title } => {
                format!("Event \"{}\" was saved locally and will sync later", title)
            }
            Notice::SyncFailed => "Could not reach the server. Reloading your calendar.".to_string(),
            Notice::LinkCreated => "Event link created".to_string(),
            Notice::ShareError => "Failed to create link. Please try again.".to_string(),
            Notice::InvalidSharedData => "Invalid shared event data".to_string(),
            Notice::ImportError => "Failed to import event. Please try again.".to_string(),
        }
    }

    pub fn to_toast(&self) -> Toast {
        Toast::new(self.message(), self.level())
    }
}

/// Pending toasts, oldest first.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, toast: Toast) {
        log::debug!("Toast: {}", toast);
        self.toasts.push_back(toast);
    }

    pub fn notify(&mut self, notice: Notice) {
        self.add(notice.to_toast());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.add(Toast::success(message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Toast::info(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Toast::warning(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(Toast::error(message));
    }

    /// Remove expired toasts
    pub fn cleanup(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| !t.is_expired_at(now));
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Take every pending toast.
    pub fn drain(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }
}

use log::{debug, info, warn};

use super::pending::{MutationKind, PendingMutation, Reconciliation, SequenceTracker};
use super::StoreError;
use crate::models::calendar::{Calendar, CalendarPatch};
use crate::services::api::ApiError;

/// In-memory calendar collection plus the active-calendar selection.
///
/// Starts with the local default calendar so event creation works before
/// the first fetch.
#[derive(Debug)]
pub struct CalendarStore {
    calendars: Vec<Calendar>,
    active_id: Option<String>,
    sequences: SequenceTracker,
    dirty: bool,
    last_error: Option<String>,
}

impl Default for CalendarStore {
    fn default() -> Self {
        let default = Calendar::local_default();
        Self {
            active_id: Some(default.id.clone()),
            calendars: vec![default],
            sequences: SequenceTracker::default(),
            dirty: false,
            last_error: None,
        }
    }
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Calendar] {
        &self.calendars
    }

    pub fn get(&self, id: &str) -> Option<&Calendar> {
        self.calendars.iter().find(|calendar| calendar.id == id)
    }

    pub fn default_calendar(&self) -> Option<&Calendar> {
        self.calendars.iter().find(|calendar| calendar.is_default)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&Calendar> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn set_active(&mut self, id: &str) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.active_id = Some(id.to_string());
        Ok(())
    }

    /// Calendars whose `visible` flag is set.
    pub fn visible(&self) -> Vec<&Calendar> {
        self.calendars.iter().filter(|calendar| calendar.visible).collect()
    }

    pub fn can_remove(&self, id: &str) -> bool {
        self.get(id).is_some_and(|calendar| !calendar.is_default)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the collection with a fetched list.
    ///
    /// An empty list leaves the current calendars alone. The active
    /// calendar becomes the default one, or the first when there is none.
    /// Answers to requests sent before the fetch are dropped as stale.
    pub fn replace_all(&mut self, calendars: Vec<Calendar>) {
        self.sequences.reset();
        self.dirty = false;
        self.last_error = None;
        if calendars.is_empty() {
            debug!("Fetched calendar list is empty, keeping local calendars");
            return;
        }

        self.active_id = calendars
            .iter()
            .find(|calendar| calendar.is_default)
            .or_else(|| calendars.first())
            .map(|calendar| calendar.id.clone());
        self.calendars = calendars;
        info!("Loaded {} calendars", self.calendars.len());
    }

    /// Take the server copy of a single calendar, if it is still listed.
    pub fn refresh(&mut self, calendar: Calendar) {
        match self.position(&calendar.id) {
            Some(index) => self.calendars[index] = calendar,
            None => debug!("Ignoring refreshed calendar {} that is not listed", calendar.id),
        }
    }

    pub fn fetch_failed(&mut self, error: &ApiError) {
        warn!("Failed to fetch calendars: {}", error);
        self.last_error = Some(error.to_string());
    }

    /// Add a calendar and make it the active one.
    pub fn add(&mut self, calendar: Calendar) -> Result<PendingMutation, StoreError> {
        calendar.validate().map_err(StoreError::Validation)?;
        let pending = self.sequences.issue(&calendar.id, MutationKind::Create);
        self.active_id = Some(calendar.id.clone());
        self.calendars.push(calendar);
        Ok(pending)
    }

    pub fn update(
        &mut self,
        id: &str,
        patch: &CalendarPatch,
    ) -> Result<(Calendar, PendingMutation), StoreError> {
        let index = self.index_of(id)?;
        let updated = patch
            .applied_to(&self.calendars[index])
            .map_err(StoreError::Validation)?;
        self.calendars[index] = updated.clone();
        Ok((updated, self.sequences.issue(id, MutationKind::Update)))
    }

    /// Remove a calendar. The default calendar cannot be removed; when the
    /// active calendar goes, the first remaining one becomes active.
    pub fn remove(&mut self, id: &str) -> Result<(Calendar, PendingMutation), StoreError> {
        let index = self.index_of(id)?;
        if self.calendars[index].is_default {
            warn!("Refusing to remove default calendar {}", id);
            return Err(StoreError::DefaultCalendar);
        }

        let removed = self.calendars.remove(index);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.calendars.first().map(|calendar| calendar.id.clone());
        }
        Ok((removed, self.sequences.issue(id, MutationKind::Delete)))
    }

    /// Flip the completed flag.
    pub fn toggle_completed(&mut self, id: &str) -> Result<(Calendar, PendingMutation), StoreError> {
        let index = self.index_of(id)?;
        let calendar = &mut self.calendars[index];
        calendar.visible = !calendar.visible;
        let toggled = calendar.clone();
        Ok((toggled, self.sequences.issue(id, MutationKind::Toggle)))
    }

    /// Apply the outcome of the request behind `pending`; same rules as
    /// [`super::EventStore::complete`].
    pub fn complete(
        &mut self,
        pending: &PendingMutation,
        outcome: Result<Option<Calendar>, ApiError>,
    ) -> Reconciliation {
        if !self.sequences.is_latest(pending) {
            debug!(
                "Dropping stale response for calendar {} (seq {})",
                pending.record_id, pending.seq
            );
            return Reconciliation::Stale;
        }
        self.sequences.settle(pending);

        match outcome {
            Ok(Some(server)) => {
                let Some(index) = self.position(&pending.record_id) else {
                    return Reconciliation::Confirmed;
                };
                if self.active_id.as_deref() == Some(pending.record_id.as_str()) {
                    self.active_id = Some(server.id.clone());
                }
                self.calendars[index] = server;
                Reconciliation::Replaced
            }
            Ok(None) => Reconciliation::Confirmed,
            Err(error) if pending.kind == MutationKind::Create => {
                warn!(
                    "Calendar {} could not be synced, keeping local copy: {}",
                    pending.record_id, error
                );
                Reconciliation::KeepLocal
            }
            Err(error) => {
                warn!(
                    "{:?} of calendar {} failed: {}",
                    pending.kind, pending.record_id, error
                );
                self.dirty = true;
                self.last_error = Some(error.to_string());
                Reconciliation::NeedsRefetch
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.calendars.iter().position(|calendar| calendar.id == id)
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

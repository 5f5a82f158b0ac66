use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use log::{info, warn};

use super::pending::{PendingMutation, Reconciliation};
use super::{CalendarStore, EventStore, StoreError};
use crate::interaction::GestureCommit;
use crate::models::calendar::{Calendar, CalendarPatch, SharePermission, LOCAL_DEFAULT_CALENDAR_ID};
use crate::models::event::{Event, EventPatch};
use crate::models::shared_event::SharedEvent;
use crate::services::api::{ApiError, CalendarApi, EventQuery};
use crate::services::recurrence::{expand_series, related_series_events, DEFAULT_OCCURRENCE_COUNT};
use crate::services::slots::{self, TimeGrid, TimeOption};
use crate::services::toast::{Notice, ToastQueue};
use crate::utils::date::is_past_date;
use crate::utils::time::{ClockTime, TimeRange};

/// What the caller wants to do with a calendar's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Create,
    Edit,
    Delete,
}

/// Everything a calendar front end holds: both stores, the toast queue and
/// the working-hours grid.
///
/// Each driver method applies its change locally, performs the request on
/// the given [`CalendarApi`] and reconciles the answer before returning.
/// Rejected operations push a toast and return a [`StoreError`].
#[derive(Debug)]
pub struct Workspace {
    pub events: EventStore,
    pub calendars: CalendarStore,
    pub toasts: ToastQueue,
    grid: TimeGrid,
    user_id: Option<String>,
    today: NaiveDate,
    query: EventQuery,
}

impl Workspace {
    pub fn new(grid: TimeGrid, user_id: Option<String>) -> Self {
        Self {
            events: EventStore::new(),
            calendars: CalendarStore::new(),
            toasts: ToastQueue::new(),
            grid,
            user_id,
            today: Local::now().date_naive(),
            query: EventQuery::default(),
        }
    }

    /// Override the date used for the no-events-in-the-past rule.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Events from `start` to `end` inclusive, ordered by date and start time.
    pub fn events_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Event> {
        let mut events: Vec<&Event> = self
            .events
            .all()
            .iter()
            .filter(|event| event.date >= start && event.date <= end)
            .collect();
        events.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        events
    }

    pub fn busy_slots(
        &self,
        calendar_id: &str,
        date: NaiveDate,
        exclude_id: Option<&str>,
    ) -> BTreeSet<ClockTime> {
        slots::busy_slots(
            slots::day_events(self.events.all(), calendar_id, date, exclude_id),
            self.grid.interval_minutes,
        )
    }

    /// Start-time picker entries for one calendar day, busy ones flagged.
    pub fn time_options(
        &self,
        calendar_id: &str,
        date: NaiveDate,
        exclude_id: Option<&str>,
    ) -> Vec<TimeOption> {
        slots::time_options(&self.grid, &self.busy_slots(calendar_id, date, exclude_id))
    }

    pub fn find_conflicts(
        &self,
        calendar_id: &str,
        date: NaiveDate,
        range: &TimeRange,
        exclude_id: Option<&str>,
    ) -> Vec<&Event> {
        slots::find_conflicts(
            range,
            slots::day_events(self.events.all(), calendar_id, date, exclude_id),
            None,
        )
    }

    // ----- fetching -----

    /// Load calendars, creating the default one when the server has none.
    ///
    /// If the server cannot create it either, the local default is used.
    pub fn fetch_calendars(&mut self, api: &dyn CalendarApi) -> Result<usize, ApiError> {
        let mut calendars = match api.list_calendars() {
            Ok(calendars) => calendars,
            Err(error) => {
                self.calendars.fetch_failed(&error);
                return Err(error);
            }
        };

        if !calendars.iter().any(|calendar| calendar.is_default) {
            info!("No default calendar found, creating one");
            let default = api.create_default_calendar().unwrap_or_else(|error| {
                warn!("Failed to create default calendar, using local one: {}", error);
                Calendar::local_default()
            });
            calendars.insert(0, default);
        }

        let count = calendars.len();
        self.calendars.replace_all(calendars);
        Ok(count)
    }

    /// Load events matching `query`; the query is reused for later reloads.
    ///
    /// Events created while offline are kept and sent again once the list
    /// arrives.
    pub fn fetch_events(
        &mut self,
        api: &dyn CalendarApi,
        query: EventQuery,
    ) -> Result<usize, ApiError> {
        self.query = query;
        match api.list_events(&self.query) {
            Ok(events) => {
                let count = events.len();
                self.events.replace_all(events);
                self.push_unsynced(api);
                Ok(count)
            }
            Err(error) => {
                self.events.fetch_failed(&error);
                Err(error)
            }
        }
    }

    /// Fetch calendars, then events for the last query.
    pub fn sync(&mut self, api: &dyn CalendarApi) -> Result<(), ApiError> {
        self.fetch_calendars(api)?;
        let query = self.query.clone();
        self.fetch_events(api, query)?;
        Ok(())
    }

    /// Retry the creates the server never accepted. Returns how many went
    /// through.
    ///
    /// Events saved in the local stand-in calendar, or in a calendar that
    /// is gone, move to the server's default calendar. While there is none
    /// they stay local.
    pub fn push_unsynced(&mut self, api: &dyn CalendarApi) -> usize {
        let server_default = self
            .calendars
            .default_calendar()
            .filter(|calendar| !is_local_only(&calendar.id))
            .map(|calendar| calendar.id.clone());
        let waiting: Vec<Event> = self.events.unsynced().into_iter().cloned().collect();

        let mut synced = 0;
        for mut event in waiting {
            if is_local_only(&event.calendar_id) || self.calendars.get(&event.calendar_id).is_none() {
                let Some(default_id) = &server_default else {
                    continue;
                };
                event.calendar_id = default_id.clone();
            }
            let (_, reconciliation) = self.push_event(api, event);
            if reconciliation == Reconciliation::Replaced {
                synced += 1;
            }
        }
        if synced > 0 {
            info!("Sent {} events created offline", synced);
        }
        synced
    }

    /// Reload whichever store was marked dirty by a failed mutation.
    pub fn refresh_if_dirty(&mut self, api: &dyn CalendarApi) -> bool {
        let mut refreshed = false;
        if self.calendars.is_dirty() {
            refreshed |= self.fetch_calendars(api).is_ok();
        }
        if self.events.is_dirty() {
            refreshed |= self.reload_events(api);
        }
        refreshed
    }

    // ----- events -----

    /// Save a new event from the form.
    ///
    /// A recurring draft becomes [`DEFAULT_OCCURRENCE_COUNT`] occurrences,
    /// stopping early at `repeat_end_date`. Every occurrence must be free of
    /// conflicts in its calendar before anything is saved.
    pub fn create_event(
        &mut self,
        api: &dyn CalendarApi,
        draft: Event,
    ) -> Result<Vec<Event>, StoreError> {
        if self.calendars.active().is_none() {
            return Err(self.reject(Notice::NoActiveCalendar, StoreError::NoActiveCalendar));
        }
        self.writable_calendar(&draft.calendar_id, Access::Create)?;
        if is_past_date(draft.date, self.today) {
            return Err(self.reject(Notice::PastDate, StoreError::PastDate));
        }
        if let Err(message) = draft.validate() {
            return Err(self.invalid(message));
        }

        let occurrences = expand_series(&draft, DEFAULT_OCCURRENCE_COUNT);
        self.ensure_free(&occurrences, &[])?;

        let mut saved = Vec::with_capacity(occurrences.len());
        let mut offline = false;
        for occurrence in occurrences {
            let (event, reconciliation) = self.push_event(api, occurrence);
            offline |= reconciliation == Reconciliation::KeepLocal;
            saved.push(event);
        }

        let title = draft.title.clone();
        self.toasts.notify(if draft.is_recurring() {
            Notice::RecurringCreated { title }
        } else if offline {
            Notice::SavedOffline { title }
        } else {
            Notice::EventCreated { title }
        });
        Ok(saved)
    }

    /// Reload one event from the server.
    ///
    /// When the server cannot be reached the local copy is returned. An
    /// event the server no longer has is dropped unless it is still unsynced.
    pub fn refresh_event(&mut self, api: &dyn CalendarApi, id: &str) -> Result<Event, StoreError> {
        match api.get_event(id) {
            Ok(event) => {
                self.events.refresh(event.clone());
                Ok(event)
            }
            Err(ApiError::NotFound(_)) if !self.events.is_unsynced(id) => {
                info!("Event {} is gone from the server", id);
                self.events.forget(id);
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(error) => {
                warn!("Could not reload event {}, using local copy: {}", id, error);
                self.existing_event(id)
            }
        }
    }

    /// Apply a form edit.
    ///
    /// Turning the event into (or keeping it as) a recurring one replaces its
    /// whole series with freshly generated occurrences. Turning a recurring
    /// event into a single one removes the other occurrences.
    pub fn edit_event(
        &mut self,
        api: &dyn CalendarApi,
        id: &str,
        patch: &EventPatch,
    ) -> Result<Vec<Event>, StoreError> {
        let existing = self.existing_event(id)?;
        self.writable_calendar(&existing.calendar_id, Access::Edit)?;
        let updated = patch
            .applied_to(&existing)
            .map_err(|message| self.invalid(message))?;

        let siblings: Vec<String> = if existing.is_recurring() {
            related_series_events(self.events.all(), &existing)
                .into_iter()
                .map(|event| event.id.clone())
                .collect()
        } else {
            Vec::new()
        };
        let mut replaced = siblings.clone();
        replaced.push(id.to_string());

        if updated.is_recurring() {
            let occurrences = expand_series(&updated, DEFAULT_OCCURRENCE_COUNT);
            self.ensure_free(&occurrences, &replaced)?;
            for old in &replaced {
                self.drop_event(api, old)?;
            }
            let saved: Vec<Event> = occurrences
                .into_iter()
                .map(|occurrence| self.push_event(api, occurrence).0)
                .collect();
            self.toasts.notify(Notice::RecurringCreated {
                title: updated.title,
            });
            return Ok(saved);
        }

        self.ensure_free(std::slice::from_ref(&updated), &replaced)?;
        for sibling in &siblings {
            self.drop_event(api, sibling)?;
        }
        let saved = self.apply_update(api, id, patch)?;
        self.toasts.notify(Notice::EventUpdated {
            title: saved.title.clone(),
        });
        Ok(vec![saved])
    }

    pub fn delete_event(&mut self, api: &dyn CalendarApi, id: &str) -> Result<Event, StoreError> {
        let existing = self.existing_event(id)?;
        self.writable_calendar(&existing.calendar_id, Access::Delete)?;
        let removed = self.drop_event(api, id)?;
        self.toasts.notify(Notice::EventDeleted {
            title: removed.title.clone(),
        });
        Ok(removed)
    }

    /// Commit a finished drag or resize. Overlaps in the calendar block the drop.
    pub fn reschedule_event(
        &mut self,
        api: &dyn CalendarApi,
        commit: &GestureCommit,
    ) -> Result<Event, StoreError> {
        let existing = self.existing_event(&commit.event_id)?;
        self.writable_calendar(&existing.calendar_id, Access::Edit)?;
        let Some(patch) = commit.to_patch() else {
            return Err(self.invalid(format!(
                "Cannot place \"{}\" at {}",
                existing.title, commit.range
            )));
        };
        let candidate = patch
            .applied_to(&existing)
            .map_err(|message| self.invalid(message))?;
        self.ensure_free(std::slice::from_ref(&candidate), &[existing.id.clone()])?;

        let saved = self.apply_update(api, &existing.id, &patch)?;
        self.toasts.notify(Notice::EventUpdated {
            title: saved.title.clone(),
        });
        Ok(saved)
    }

    pub fn move_event_to_calendar(
        &mut self,
        api: &dyn CalendarApi,
        id: &str,
        calendar_id: &str,
    ) -> Result<Event, StoreError> {
        let existing = self.existing_event(id)?;
        if existing.calendar_id == calendar_id {
            return Ok(existing);
        }
        self.writable_calendar(&existing.calendar_id, Access::Edit)?;
        let target = self.writable_calendar(calendar_id, Access::Create)?;

        let (moved, pending) = self.events.move_to_calendar(id, calendar_id)?;
        let outcome = api.move_event(id, calendar_id);
        let saved = outcome.as_ref().map_or(moved, Clone::clone);
        self.settle_event(api, pending, outcome.map(Some))?;

        self.toasts.notify(Notice::EventMoved {
            title: saved.title.clone(),
            calendar: target.name,
        });
        Ok(saved)
    }

    pub fn duplicate_event_to_calendar(
        &mut self,
        api: &dyn CalendarApi,
        id: &str,
        calendar_id: &str,
    ) -> Result<Event, StoreError> {
        let existing = self.existing_event(id)?;
        self.writable_calendar(calendar_id, Access::Create)?;

        let (copy, pending) = self.events.duplicate(id, calendar_id)?;
        let outcome = api.duplicate_event(id, &copy.id, calendar_id);
        let saved = outcome.as_ref().map_or(copy, Clone::clone);
        self.settle_event(api, pending, outcome.map(Some))?;

        self.toasts.notify(Notice::EventDuplicated {
            title: existing.title,
        });
        Ok(saved)
    }

    /// Import an event received through a share link into the active
    /// calendar (or the first one). Overlaps only produce a warning.
    pub fn import_shared_event(
        &mut self,
        api: &dyn CalendarApi,
        shared: SharedEvent,
    ) -> Result<Event, StoreError> {
        let target_id = self
            .calendars
            .active()
            .or_else(|| self.calendars.all().first())
            .map(|calendar| calendar.id.clone());
        let Some(target_id) = target_id else {
            return Err(self.reject(Notice::NoActiveCalendar, StoreError::NoActiveCalendar));
        };
        self.writable_calendar(&target_id, Access::Create)?;

        let event = match shared.into_event(&target_id) {
            Ok(event) => event,
            Err(message) => {
                return Err(self.reject(Notice::InvalidSharedData, StoreError::Validation(message)))
            }
        };

        let overlap = self
            .find_conflicts(&target_id, event.date, &event.time_range(), None)
            .first()
            .map(|other| Notice::ImportConflict {
                title: other.title.clone(),
                start: other.start_time.to_string(),
                end: other.end_time.to_string(),
            });
        if let Some(notice) = overlap {
            self.toasts.notify(notice);
        }

        let (saved, _) = self.push_event(api, event);
        self.toasts.notify(Notice::EventImported {
            title: saved.title.clone(),
        });
        Ok(saved)
    }

    // ----- calendars -----

    pub fn set_active_calendar(&mut self, id: &str) -> Result<(), StoreError> {
        self.calendars.set_active(id)
    }

    /// Add a calendar and make it active. A failed request keeps it locally.
    pub fn create_calendar(
        &mut self,
        api: &dyn CalendarApi,
        calendar: Calendar,
    ) -> Result<Calendar, StoreError> {
        let pending = match self.calendars.add(calendar.clone()) {
            Ok(pending) => pending,
            Err(StoreError::Validation(message)) => return Err(self.invalid(message)),
            Err(error) => return Err(error),
        };
        let outcome = api.create_calendar(&calendar);
        let saved = outcome.as_ref().map_or(calendar, Clone::clone);
        self.settle_calendar(api, pending, outcome.map(Some))?;

        self.toasts.notify(Notice::CalendarCreated {
            name: saved.name.clone(),
        });
        Ok(saved)
    }

    pub fn update_calendar(
        &mut self,
        api: &dyn CalendarApi,
        id: &str,
        patch: &CalendarPatch,
    ) -> Result<Calendar, StoreError> {
        self.owned_calendar(id)?;
        let (updated, pending) = match self.calendars.update(id, patch) {
            Ok(result) => result,
            Err(StoreError::Validation(message)) => return Err(self.invalid(message)),
            Err(error) => return Err(error),
        };

        let saved = if is_local_only(id) {
            updated
        } else {
            let outcome = api.update_calendar(id, patch);
            let saved = outcome.as_ref().map_or(updated, Clone::clone);
            self.settle_calendar(api, pending, outcome.map(Some))?;
            saved
        };

        self.toasts.notify(Notice::CalendarUpdated {
            name: saved.name.clone(),
        });
        Ok(saved)
    }

    /// Delete a calendar together with its events.
    pub fn delete_calendar(&mut self, api: &dyn CalendarApi, id: &str) -> Result<Calendar, StoreError> {
        let calendar = self.owned_calendar(id)?;
        if calendar.is_default {
            return Err(self.reject(Notice::DefaultCalendarUndeletable, StoreError::DefaultCalendar));
        }

        let (removed, pending) = self.calendars.remove(id)?;
        let cascaded = self.events.remove_calendar_events(id);
        info!(
            "Removed calendar '{}' and {} of its events",
            removed.name,
            cascaded.len()
        );

        let outcome = api.delete_calendar(id).map(|()| None);
        if let Err(error) = self.settle_calendar(api, pending, outcome) {
            self.reload_events(api);
            return Err(error);
        }

        self.toasts.notify(Notice::CalendarDeleted {
            name: removed.name.clone(),
        });
        Ok(removed)
    }

    /// Flip the completed flag of a calendar.
    pub fn toggle_calendar_completed(
        &mut self,
        api: &dyn CalendarApi,
        id: &str,
    ) -> Result<Calendar, StoreError> {
        self.owned_calendar(id)?;
        let (toggled, pending) = self.calendars.toggle_completed(id)?;

        let saved = if is_local_only(id) {
            toggled
        } else {
            let outcome = api.toggle_calendar_visibility(id);
            let saved = outcome.as_ref().map_or(toggled, Clone::clone);
            self.settle_calendar(api, pending, outcome.map(Some))?;
            saved
        };

        self.toasts.notify(Notice::CalendarCompleted {
            name: saved.name.clone(),
            completed: saved.is_completed(),
        });
        Ok(saved)
    }

    pub fn share_calendar(
        &mut self,
        api: &dyn CalendarApi,
        id: &str,
        email: &str,
        permission: SharePermission,
    ) -> Result<(), StoreError> {
        let calendar = self.owned_calendar(id)?;
        if let Err(error) = api.share_calendar(id, email, permission) {
            warn!("Sharing calendar {} failed: {}", id, error);
            self.toasts.error(error.to_string());
            return Err(StoreError::Sync(error));
        }

        match api.get_calendar(id) {
            Ok(fresh) => self.calendars.refresh(fresh),
            Err(error) => warn!("Could not reload calendar {} after sharing: {}", id, error),
        }

        self.toasts.notify(Notice::CalendarShared {
            name: calendar.name,
            email: email.to_string(),
        });
        Ok(())
    }

    // ----- helpers -----

    fn reject(&mut self, notice: Notice, error: StoreError) -> StoreError {
        self.toasts.notify(notice);
        error
    }

    fn invalid(&mut self, message: String) -> StoreError {
        self.toasts.error(message.clone());
        StoreError::Validation(message)
    }

    fn existing_event(&mut self, id: &str) -> Result<Event, StoreError> {
        if let Some(event) = self.events.get(id).cloned() {
            return Ok(event);
        }
        Err(self.reject(Notice::SaveError, StoreError::NotFound(id.to_string())))
    }

    /// Check that events in `calendar_id` may be changed the way `access` says.
    fn writable_calendar(&mut self, calendar_id: &str, access: Access) -> Result<Calendar, StoreError> {
        let Some(calendar) = self.calendars.get(calendar_id).cloned() else {
            return Err(self.reject(
                Notice::CreationNotAllowed { calendar: None },
                StoreError::NotFound(calendar_id.to_string()),
            ));
        };

        if !calendar.can_write(self.user_id.as_deref()) {
            return Err(self.reject(
                Notice::PermissionDenied,
                StoreError::Forbidden(calendar.name),
            ));
        }

        match access {
            Access::Create if calendar.is_completed() => Err(self.reject(
                Notice::CompletedCalendarCreate,
                StoreError::CalendarCompleted(calendar.name),
            )),
            Access::Edit if calendar.is_completed() => Err(self.reject(
                Notice::CompletedCalendarEdit,
                StoreError::CalendarCompleted(calendar.name),
            )),
            Access::Create if !calendar.settings.allow_event_creation => Err(self.reject(
                Notice::CreationNotAllowed {
                    calendar: Some(calendar.name.clone()),
                },
                StoreError::Forbidden(calendar.name),
            )),
            _ => Ok(calendar),
        }
    }

    fn owned_calendar(&mut self, id: &str) -> Result<Calendar, StoreError> {
        let Some(calendar) = self.calendars.get(id).cloned() else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        if !calendar.is_owner(self.user_id.as_deref()) {
            return Err(self.reject(Notice::PermissionDenied, StoreError::Forbidden(calendar.name)));
        }
        Ok(calendar)
    }

    /// Refuse when any candidate overlaps an existing event of its calendar.
    /// Events listed in `ignore` are about to be replaced and do not count.
    fn ensure_free(&mut self, candidates: &[Event], ignore: &[String]) -> Result<(), StoreError> {
        let conflict = candidates.iter().find_map(|candidate| {
            slots::day_events(self.events.all(), &candidate.calendar_id, candidate.date, None)
                .into_iter()
                .filter(|event| !ignore.contains(&event.id))
                .find(|event| slots::conflicts(&candidate.time_range(), &event.time_range()))
                .cloned()
        });

        match conflict {
            Some(other) => Err(self.reject(
                Notice::TimeConflict {
                    title: other.title.clone(),
                    start: other.start_time.to_string(),
                    end: other.end_time.to_string(),
                },
                StoreError::Conflict(Box::new(other)),
            )),
            None => Ok(()),
        }
    }

    /// Add locally, then create on the server. Returns the saved version.
    fn push_event(&mut self, api: &dyn CalendarApi, event: Event) -> (Event, Reconciliation) {
        let pending = self.events.add(event.clone());
        let outcome = api.create_event(&event);
        let saved = outcome.as_ref().map_or(event, Clone::clone);
        let reconciliation = self.events.complete(&pending, outcome.map(Some));
        (saved, reconciliation)
    }

    fn drop_event(&mut self, api: &dyn CalendarApi, id: &str) -> Result<Event, StoreError> {
        let (removed, pending) = self.events.remove(id)?;
        let outcome = api.delete_event(id).map(|()| None);
        self.settle_event(api, pending, outcome)?;
        Ok(removed)
    }

    fn apply_update(
        &mut self,
        api: &dyn CalendarApi,
        id: &str,
        patch: &EventPatch,
    ) -> Result<Event, StoreError> {
        let (updated, pending) = self.events.update(id, patch)?;
        let outcome = api.update_event(id, patch);
        let saved = outcome.as_ref().map_or(updated, Clone::clone);
        self.settle_event(api, pending, outcome.map(Some))?;
        Ok(saved)
    }

    fn settle_event(
        &mut self,
        api: &dyn CalendarApi,
        pending: PendingMutation,
        outcome: Result<Option<Event>, ApiError>,
    ) -> Result<Reconciliation, StoreError> {
        let error = outcome.as_ref().err().cloned();
        match (self.events.complete(&pending, outcome), error) {
            (Reconciliation::NeedsRefetch, Some(error)) => {
                self.toasts.notify(Notice::SyncFailed);
                self.reload_events(api);
                Err(StoreError::Sync(error))
            }
            (reconciliation, _) => Ok(reconciliation),
        }
    }

    fn settle_calendar(
        &mut self,
        api: &dyn CalendarApi,
        pending: PendingMutation,
        outcome: Result<Option<Calendar>, ApiError>,
    ) -> Result<Reconciliation, StoreError> {
        let error = outcome.as_ref().err().cloned();
        match (self.calendars.complete(&pending, outcome), error) {
            (Reconciliation::NeedsRefetch, Some(error)) => {
                self.toasts.notify(Notice::SyncFailed);
                if let Err(reload) = self.fetch_calendars(api) {
                    warn!("Reloading calendars failed: {}", reload);
                }
                Err(StoreError::Sync(error))
            }
            (reconciliation, _) => Ok(reconciliation),
        }
    }

    fn reload_events(&mut self, api: &dyn CalendarApi) -> bool {
        let query = self.query.clone();
        match self.fetch_events(api, query) {
            Ok(_) => true,
            Err(error) => {
                warn!("Reloading events failed: {}", error);
                false
            }
        }
    }
}

/// The stand-in default calendar exists only on this client.
fn is_local_only(calendar_id: &str) -> bool {
    calendar_id == LOCAL_DEFAULT_CALENDAR_ID
}

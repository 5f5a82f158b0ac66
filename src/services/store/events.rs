//! In-memory event collection with optimistic mutations.
//!
//! Every mutation changes the local list immediately and hands back a
//! [`PendingMutation`]. Once the request finishes, its outcome goes to
//! [`EventStore::complete`], which applies it only if no newer local
//! mutation of the same record happened in between.
//!
//! Creates that fail stay in the list as unsynced events. They survive
//! reloads until the server has them.

use std::collections::{BTreeSet, HashSet};

use log::{debug, info, warn};

use super::pending::{MutationKind, PendingMutation, Reconciliation, SequenceTracker};
use super::StoreError;
use crate::models::event::{new_event_id, Event, EventPatch};
use crate::services::api::ApiError;

pub const COPY_SUFFIX: &str = " (Copy)";

#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
    sequences: SequenceTracker,
    unsynced: BTreeSet<String>,
    dirty: bool,
    last_error: Option<String>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn by_calendar(&self, calendar_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| event.calendar_id == calendar_id)
            .collect()
    }

    /// Set after a failed mutation; cleared by the next successful fetch.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Events created locally that the server has not accepted yet.
    pub fn unsynced(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| self.unsynced.contains(&event.id))
            .collect()
    }

    pub fn is_unsynced(&self, id: &str) -> bool {
        self.unsynced.contains(id)
    }

    /// Put back events that were still unsynced when the cache was written.
    pub fn restore_unsynced(&mut self, events: Vec<Event>) {
        for event in events {
            self.unsynced.insert(event.id.clone());
            match self.position(&event.id) {
                Some(index) => self.events[index] = event,
                None => self.events.push(event),
            }
        }
    }

    /// Replace the whole collection with a fetched list.
    ///
    /// Unsynced events missing from the list are kept. Answers to requests
    /// sent before the fetch are dropped as stale.
    pub fn replace_all(&mut self, events: Vec<Event>) {
        debug!("Replacing event list with {} fetched events", events.len());
        let fetched: HashSet<&str> = events.iter().map(|event| event.id.as_str()).collect();
        self.unsynced.retain(|id| !fetched.contains(id.as_str()));

        let kept: Vec<Event> = std::mem::take(&mut self.events)
            .into_iter()
            .filter(|event| self.unsynced.contains(&event.id))
            .collect();
        if !kept.is_empty() {
            info!("Keeping {} events not yet on the server", kept.len());
        }
        self.unsynced = kept.iter().map(|event| event.id.clone()).collect();

        self.events = events;
        self.events.extend(kept);
        self.sequences.reset();
        self.dirty = false;
        self.last_error = None;
    }

    /// Take the server copy of a single event.
    pub fn refresh(&mut self, event: Event) {
        self.unsynced.remove(&event.id);
        match self.position(&event.id) {
            Some(index) => self.events[index] = event,
            None => self.events.push(event),
        }
    }

    /// Drop an event the server no longer has. Nothing is sent.
    pub fn forget(&mut self, id: &str) -> Option<Event> {
        self.unsynced.remove(id);
        let index = self.position(id)?;
        Some(self.events.remove(index))
    }

    /// Record a failed fetch; the current list is kept.
    pub fn fetch_failed(&mut self, error: &ApiError) {
        warn!("Failed to fetch events: {}", error);
        self.last_error = Some(error.to_string());
    }

    pub fn add(&mut self, event: Event) -> PendingMutation {
        let pending = self.sequences.issue(&event.id, MutationKind::Create);
        match self.position(&event.id) {
            Some(index) => self.events[index] = event,
            None => self.events.push(event),
        }
        pending
    }

    /// Merge `patch` into the record. The merged event must still be valid.
    pub fn update(
        &mut self,
        id: &str,
        patch: &EventPatch,
    ) -> Result<(Event, PendingMutation), StoreError> {
        let index = self.index_of(id)?;
        let updated = patch
            .applied_to(&self.events[index])
            .map_err(StoreError::Validation)?;
        self.events[index] = updated.clone();
        Ok((updated, self.sequences.issue(id, MutationKind::Update)))
    }

    pub fn remove(&mut self, id: &str) -> Result<(Event, PendingMutation), StoreError> {
        let index = self.index_of(id)?;
        let removed = self.events.remove(index);
        self.unsynced.remove(id);
        Ok((removed, self.sequences.issue(id, MutationKind::Delete)))
    }

    /// Drop every event of a deleted calendar. Local only: the server
    /// cascades on its side.
    pub fn remove_calendar_events(&mut self, calendar_id: &str) -> Vec<Event> {
        let (removed, kept) = std::mem::take(&mut self.events)
            .into_iter()
            .partition(|event| event.calendar_id == calendar_id);
        self.events = kept;
        for event in &removed {
            self.unsynced.remove(&event.id);
        }
        removed
    }

    /// Copy an event into `calendar_id` under a new id, titled `"<title> (Copy)"`.
    ///
    /// The pending mutation refers to the copy.
    pub fn duplicate(
        &mut self,
        id: &str,
        calendar_id: &str,
    ) -> Result<(Event, PendingMutation), StoreError> {
        let original = self.events[self.index_of(id)?].clone();
        let copy = Event {
            id: new_event_id(),
            title: format!("{}{}", original.title, COPY_SUFFIX),
            calendar_id: calendar_id.to_string(),
            repeat_id: None,
            is_owned: true,
            created_at: None,
            updated_at: None,
            ..original
        };
        let pending = self.sequences.issue(&copy.id, MutationKind::Duplicate);
        self.events.push(copy.clone());
        Ok((copy, pending))
    }

    pub fn move_to_calendar(
        &mut self,
        id: &str,
        calendar_id: &str,
    ) -> Result<(Event, PendingMutation), StoreError> {
        let index = self.index_of(id)?;
        self.events[index].calendar_id = calendar_id.to_string();
        let moved = self.events[index].clone();
        Ok((moved, self.sequences.issue(id, MutationKind::Move)))
    }

    /// Apply the outcome of the request behind `pending`.
    ///
    /// `Ok(Some(event))` replaces the local record with the server version,
    /// `Ok(None)` acknowledges a delete. Errors keep the optimistic record for
    /// creates and mark the store dirty for everything else.
    pub fn complete(
        &mut self,
        pending: &PendingMutation,
        outcome: Result<Option<Event>, ApiError>,
    ) -> Reconciliation {
        if !self.sequences.is_latest(pending) {
            debug!(
                "Dropping stale response for event {} (seq {})",
                pending.record_id, pending.seq
            );
            return Reconciliation::Stale;
        }
        self.sequences.settle(pending);
        if outcome.is_ok() {
            self.unsynced.remove(&pending.record_id);
        }

        match outcome {
            Ok(Some(server)) => {
                match self.position(&pending.record_id) {
                    Some(index) => self.events[index] = server,
                    None if pending.kind != MutationKind::Delete => self.events.push(server),
                    None => {}
                }
                Reconciliation::Replaced
            }
            Ok(None) => Reconciliation::Confirmed,
            Err(error) if pending.kind == MutationKind::Create => {
                warn!(
                    "Event {} could not be synced, keeping local copy: {}",
                    pending.record_id, error
                );
                self.unsynced.insert(pending.record_id.clone());
                Reconciliation::KeepLocal
            }
            Err(error) => {
                warn!(
                    "{:?} of event {} failed: {}",
                    pending.kind, pending.record_id, error
                );
                self.dirty = true;
                self.last_error = Some(error.to_string());
                Reconciliation::NeedsRefetch
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.events.iter().position(|event| event.id == id)
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

use std::collections::HashMap;

/// What a local mutation did, which decides how a failed request is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Move,
    Duplicate,
    Toggle,
}

/// Ticket for a mutation that was applied locally and still awaits the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub record_id: String,
    pub seq: u64,
    pub kind: MutationKind,
}

/// Result of handing a server response back to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// A newer local mutation of the same record exists; the response was dropped.
    Stale,
    /// The local record now holds the server version.
    Replaced,
    /// The server acknowledged a mutation that returns no body.
    Confirmed,
    /// A create failed; the optimistic record stays so it can sync later.
    KeepLocal,
    /// The mutation failed; local state may be wrong until the next fetch.
    NeedsRefetch,
}

/// Monotonic sequence numbers for the mutations still awaiting an answer.
///
/// Only the newest ticket of a record has an entry; it goes away once that
/// ticket settles or the store is reloaded.
#[derive(Debug, Default)]
pub(crate) struct SequenceTracker {
    counter: u64,
    latest: HashMap<String, u64>,
}

impl SequenceTracker {
    pub(crate) fn issue(&mut self, record_id: &str, kind: MutationKind) -> PendingMutation {
        self.counter += 1;
        self.latest.insert(record_id.to_string(), self.counter);
        PendingMutation {
            record_id: record_id.to_string(),
            seq: self.counter,
            kind,
        }
    }

    pub(crate) fn is_latest(&self, pending: &PendingMutation) -> bool {
        self.latest.get(&pending.record_id) == Some(&pending.seq)
    }

    pub(crate) fn settle(&mut self, pending: &PendingMutation) {
        if self.is_latest(pending) {
            self.latest.remove(&pending.record_id);
        }
    }

    /// Invalidate every outstanding ticket. The counter keeps running.
    pub(crate) fn reset(&mut self) {
        self.latest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_numbers_increase_across_records() {
        let mut tracker = SequenceTracker::default();
        let a = tracker.issue("a", MutationKind::Create);
        let b = tracker.issue("b", MutationKind::Update);
        assert!(b.seq > a.seq);
        assert!(tracker.is_latest(&a));
        assert!(tracker.is_latest(&b));
    }

    #[test]
    fn test_newer_mutation_supersedes_older() {
        let mut tracker = SequenceTracker::default();
        let first = tracker.issue("a", MutationKind::Update);
        let second = tracker.issue("a", MutationKind::Update);
        assert!(!tracker.is_latest(&first));
        assert!(tracker.is_latest(&second));
    }

    #[test]
    fn test_settled_ticket_is_forgotten() {
        let mut tracker = SequenceTracker::default();
        let first = tracker.issue("a", MutationKind::Update);
        let second = tracker.issue("a", MutationKind::Update);

        tracker.settle(&first);
        assert!(tracker.is_latest(&second));

        tracker.settle(&second);
        assert!(tracker.latest.is_empty());
        assert!(!tracker.is_latest(&first));
        assert!(!tracker.is_latest(&second));
    }

    #[test]
    fn test_reset_invalidates_outstanding_tickets() {
        let mut tracker = SequenceTracker::default();
        let before = tracker.issue("a", MutationKind::Update);
        tracker.reset();
        assert!(!tracker.is_latest(&before));

        let after = tracker.issue("a", MutationKind::Update);
        assert!(after.seq > before.seq);
        assert!(tracker.is_latest(&after));
    }
}

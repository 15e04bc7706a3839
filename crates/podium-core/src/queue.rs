//! The announcement queue: pending records awaiting presentation.
//!
//! The queue is a strict FIFO over record arrival order with one twist:
//! a record already waiting is never queued twice. A duplicate activation
//! refreshes the waiting entry's fields in place without moving it, so the
//! most recent field values win while the original position is kept.
//!
//! Admission checks against the in-flight record and the display history
//! belong to the sequencer, which owns both; the queue itself only knows
//! about its own entries.

use std::collections::VecDeque;

use podium_types::{ResultId, ResultRecord};

/// What [`AnnouncementQueue::enqueue`] did with the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The record was new and was appended at the tail.
    Appended,
    /// A pending entry with the same identifier was refreshed in place.
    Refreshed,
}

/// Ordered buffer of records awaiting announcement.
///
/// Invariant: no identifier appears more than once in the queue.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementQueue {
    entries: VecDeque<ResultRecord>,
}

impl AnnouncementQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Insert a record at the tail, or refresh a pending entry in place.
    ///
    /// If a record with the same identifier is already waiting, its fields
    /// are replaced with the new arrival's (position unchanged). Otherwise
    /// the record is appended.
    pub fn enqueue(&mut self, record: ResultRecord) -> EnqueueOutcome {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == record.id) {
            *entry = record;
            return EnqueueOutcome::Refreshed;
        }
        self.entries.push_back(record);
        EnqueueOutcome::Appended
    }

    /// Remove and return the head record.
    ///
    /// `None` signals an empty queue -- a normal, pollable state, not an
    /// error.
    pub fn dequeue(&mut self) -> Option<ResultRecord> {
        self.entries.pop_front()
    }

    /// Whether a record with the given identifier is waiting.
    pub fn contains(&self, id: ResultId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Number of records waiting.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record(name: &str) -> ResultRecord {
        ResultRecord {
            id: ResultId::new(),
            name: Some(name.to_owned()),
            school: None,
            aplus: Some(8),
            reg_no: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn fifo_order_is_preserved() {
        let mut queue = AnnouncementQueue::new();
        let a = record("A");
        let b = record("B");
        let c = record("C");
        assert_eq!(queue.enqueue(a.clone()), EnqueueOutcome::Appended);
        assert_eq!(queue.enqueue(b.clone()), EnqueueOutcome::Appended);
        assert_eq!(queue.enqueue(c.clone()), EnqueueOutcome::Appended);

        assert_eq!(queue.dequeue().map(|r| r.id), Some(a.id));
        assert_eq!(queue.dequeue().map(|r| r.id), Some(b.id));
        assert_eq!(queue.dequeue().map(|r| r.id), Some(c.id));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn duplicate_refreshes_in_place() {
        let mut queue = AnnouncementQueue::new();
        let first = record("First");
        let second = record("Second");
        queue.enqueue(first.clone());
        queue.enqueue(second);

        let mut refreshed = first.clone();
        refreshed.name = Some(String::from("First, updated"));
        assert_eq!(queue.enqueue(refreshed), EnqueueOutcome::Refreshed);
        assert_eq!(queue.len(), 2);

        // Position unchanged: the refreshed entry still dequeues first,
        // carrying the newest fields.
        let head = queue.dequeue();
        assert_eq!(head.as_ref().map(|r| r.id), Some(first.id));
        assert_eq!(
            head.and_then(|r| r.name),
            Some(String::from("First, updated"))
        );
    }

    #[test]
    fn contains_tracks_pending_ids() {
        let mut queue = AnnouncementQueue::new();
        let entry = record("A");
        assert!(!queue.contains(entry.id));
        queue.enqueue(entry.clone());
        assert!(queue.contains(entry.id));
        let _ = queue.dequeue();
        assert!(!queue.contains(entry.id));
    }

    #[test]
    fn empty_queue_is_pollable() {
        let mut queue = AnnouncementQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.dequeue(), None);
    }
}

//! The display history: bounded, most-recent-first presented records.
//!
//! The reference behavior kept history as a growable list with a manual
//! `slice(0, 10)` after every insert. Here the bound is an invariant of the
//! type: insertion prepends and evicts in one operation, so no caller can
//! forget the truncation.

use std::collections::VecDeque;

use podium_types::{ResultId, ResultRecord};

/// Bounded, most-recently-presented-first collection of records.
///
/// Invariants: `len() <= capacity()`; no identifier appears twice.
#[derive(Debug, Clone)]
pub struct DisplayHistory {
    entries: VecDeque<ResultRecord>,
    capacity: usize,
}

impl DisplayHistory {
    /// Create an empty history with the given capacity.
    pub const fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Create a history pre-populated from a most-recent-first list.
    ///
    /// Used for the one-shot initial population at startup. Entries beyond
    /// the capacity and entries repeating an identifier are discarded.
    pub fn seeded(records: Vec<ResultRecord>, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        for record in records {
            if history.entries.len() >= capacity {
                break;
            }
            if !history.contains(record.id) {
                history.entries.push_back(record);
            }
        }
        history
    }

    /// Prepend a record, evicting the oldest entry when over capacity.
    ///
    /// Any stale entry carrying the same identifier is removed first, so
    /// the no-duplicate invariant holds by construction. Returns the
    /// evicted record, if any.
    pub fn insert_most_recent(&mut self, record: ResultRecord) -> Option<ResultRecord> {
        self.entries.retain(|entry| entry.id != record.id);
        self.entries.push_front(record);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Whether a record with the given identifier has been presented.
    pub fn contains(&self, id: ResultId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Ordered read-only copy, most recent first.
    ///
    /// Rendering reads only these snapshots and never observes a
    /// partially-mutated history.
    pub fn snapshot(&self) -> Vec<ResultRecord> {
        self.entries.iter().cloned().collect()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured maximum number of records.
    pub const fn capacity(&self) -> usize {
        self.capacity
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
            aplus: Some(7),
            reg_no: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn insert_prepends_most_recent() {
        let mut history = DisplayHistory::new(10);
        let a = record("A");
        let b = record("B");
        assert_eq!(history.insert_most_recent(a.clone()), None);
        assert_eq!(history.insert_most_recent(b.clone()), None);

        let ids: Vec<_> = history.snapshot().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn eleventh_insert_evicts_oldest() {
        let mut history = DisplayHistory::new(10);
        let oldest = record("oldest");
        history.insert_most_recent(oldest.clone());
        for i in 0..9 {
            history.insert_most_recent(record(&format!("r{i}")));
        }
        assert_eq!(history.len(), 10);

        let newest = record("newest");
        let evicted = history.insert_most_recent(newest.clone());
        assert_eq!(history.len(), 10);
        assert_eq!(evicted.map(|r| r.id), Some(oldest.id));
        assert_eq!(history.snapshot().first().map(|r| r.id), Some(newest.id));
        assert!(!history.contains(oldest.id));
    }

    #[test]
    fn reinsert_same_id_does_not_duplicate() {
        let mut history = DisplayHistory::new(10);
        let a = record("A");
        let b = record("B");
        history.insert_most_recent(a.clone());
        history.insert_most_recent(b);
        history.insert_most_recent(a.clone());

        assert_eq!(history.len(), 2);
        assert_eq!(history.snapshot().first().map(|r| r.id), Some(a.id));
    }

    #[test]
    fn seeded_caps_and_dedups() {
        let a = record("A");
        let b = record("B");
        let records = vec![a.clone(), b.clone(), a.clone(), record("C")];
        let history = DisplayHistory::seeded(records, 3);

        assert_eq!(history.len(), 3);
        let ids: Vec<_> = history.snapshot().into_iter().map(|r| r.id).collect();
        assert_eq!(ids.first(), Some(&a.id));
        assert_eq!(ids.get(1), Some(&b.id));
    }

    #[test]
    fn seeded_respects_capacity() {
        let records: Vec<_> = (0..15).map(|i| record(&format!("r{i}"))).collect();
        let history = DisplayHistory::seeded(records, 10);
        assert_eq!(history.len(), 10);
    }
}

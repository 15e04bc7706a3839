//! Transition callback that updates the observer API state.
//!
//! After each sequencer transition, this callback updates the in-memory
//! [`GallerySnapshot`] and broadcasts an [`AnnouncementBroadcast`] to all
//! connected `WebSocket` clients.
//!
//! [`GallerySnapshot`]: podium_observer::GallerySnapshot

use std::sync::Arc;

use podium_core::history::DisplayHistory;
use podium_core::sequencer::{SequencerState, TransitionCallback};
use podium_observer::state::{AnnouncementBroadcast, AppState};
use podium_types::GalleryPhase;
use tracing::debug;

/// Callback that bridges the announcement loop to the observer API.
pub struct ObserverCallback {
    state: Arc<AppState>,
    total_presented: u64,
}

impl ObserverCallback {
    /// Create a new observer callback backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            total_presented: 0,
        }
    }
}

impl TransitionCallback for ObserverCallback {
    fn on_transition(&mut self, state: &SequencerState, history: &DisplayHistory) {
        // The cooldown edge is where the presented record folded into
        // history, so it is the edge that counts.
        if state.phase() == GalleryPhase::Cooldown {
            self.total_presented = self.total_presented.saturating_add(1);
        }

        let broadcast = AnnouncementBroadcast {
            phase: state.phase(),
            record: state.current_record().cloned(),
            history_len: history.len(),
            total_presented: self.total_presented,
        };

        // Broadcast to WebSocket clients.
        let receivers = self.state.broadcast(&broadcast);
        debug!(phase = %broadcast.phase, receivers, "Transition broadcast sent");

        // Update the snapshot. Use try_write to avoid blocking the
        // announcement loop -- if a REST handler holds the read lock, skip
        // this update; the next transition will catch up.
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.phase = state.phase();
            snap.current = state.current_record().cloned();
            snap.history = history.snapshot();
            snap.total_presented = self.total_presented;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use podium_types::{ResultId, ResultRecord};

    use super::*;

    fn record(name: &str) -> ResultRecord {
        ResultRecord {
            id: ResultId::new(),
            name: Some(name.to_owned()),
            school: None,
            aplus: Some(9),
            reg_no: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn transition_updates_snapshot_and_broadcast() {
        let state = Arc::new(AppState::new());
        let mut rx = state.subscribe();
        let mut callback = ObserverCallback::new(Arc::clone(&state));

        let shown = record("Asha");
        let mut history = DisplayHistory::new(10);
        history.insert_most_recent(record("Binu"));

        callback.on_transition(&SequencerState::Presenting(shown.clone()), &history);

        let snap = state.snapshot.read().await;
        assert_eq!(snap.phase, GalleryPhase::Presenting);
        assert_eq!(snap.current.as_ref().map(|r| r.id), Some(shown.id));
        assert_eq!(snap.history.len(), 1);
        drop(snap);

        let message = rx.recv().await.unwrap();
        assert_eq!(message.phase, GalleryPhase::Presenting);
        assert_eq!(message.record.map(|r| r.id), Some(shown.id));
    }

    #[tokio::test]
    async fn cooldown_edge_counts_presentations() {
        let state = Arc::new(AppState::new());
        let mut callback = ObserverCallback::new(Arc::clone(&state));
        let history = DisplayHistory::new(10);

        callback.on_transition(&SequencerState::AwaitingAsset(record("A")), &history);
        callback.on_transition(&SequencerState::Presenting(record("A")), &history);
        assert_eq!(state.snapshot.read().await.total_presented, 0);

        callback.on_transition(&SequencerState::Cooldown, &history);
        assert_eq!(state.snapshot.read().await.total_presented, 1);

        callback.on_transition(&SequencerState::Idle, &history);
        assert_eq!(state.snapshot.read().await.total_presented, 1);
    }
}

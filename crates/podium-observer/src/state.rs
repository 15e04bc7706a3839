//! Shared application state for the observer API server.
//!
//! [`AppState`] holds the broadcast channel for announcement transitions
//! and the in-memory [`GallerySnapshot`] the REST endpoints serve. The
//! engine updates the snapshot on every sequencer transition; the observer
//! serves it read-only, so rendering never blocks the announcement loop.

use std::sync::Arc;

use podium_db::PostgresPool;
use podium_types::{GalleryPhase, ResultRecord};
use tokio::sync::{RwLock, broadcast};

/// Capacity of the broadcast channel for announcement transitions.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// JSON-serializable transition pushed over the `WebSocket`.
///
/// A lightweight projection of the sequencer state: the phase tag, the
/// in-flight record (when one exists), and the current history length.
/// The gallery frontend re-renders on every message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnnouncementBroadcast {
    /// The sequencer phase after the transition.
    pub phase: GalleryPhase,
    /// The in-flight record, present in the awaiting/presenting phases.
    pub record: Option<ResultRecord>,
    /// Number of records currently in the display history.
    pub history_len: usize,
    /// Total records presented since startup.
    pub total_presented: u64,
}

/// In-memory snapshot of the gallery state served by REST endpoints.
///
/// Updated by the engine on every sequencer transition. All reads are
/// served from this snapshot; rendering is a pure function of it.
#[derive(Debug, Clone)]
pub struct GallerySnapshot {
    /// Current sequencer phase.
    pub phase: GalleryPhase,
    /// The in-flight record, if an announcement is running.
    pub current: Option<ResultRecord>,
    /// Display history, most recently presented first.
    pub history: Vec<ResultRecord>,
    /// Total records presented since startup.
    pub total_presented: u64,
}

impl Default for GallerySnapshot {
    fn default() -> Self {
        Self {
            phase: GalleryPhase::Idle,
            current: None,
            history: Vec::new(),
            total_presented: 0,
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// broadcast sender pushes transitions to all connected `WebSocket`
/// clients; the snapshot is a read-write lock protecting the gallery
/// state. The record store is present when the analytics endpoint is
/// backed by a database connection.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for announcement transitions.
    pub tx: broadcast::Sender<AnnouncementBroadcast>,
    /// The current gallery snapshot (updated on every transition).
    pub snapshot: Arc<RwLock<GallerySnapshot>>,
    /// Record store for the analytics snapshot, when configured.
    pub store: Option<PostgresPool>,
}

impl AppState {
    /// Create a new application state with an empty snapshot and no store.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(GallerySnapshot::default())),
            store: None,
        }
    }

    /// Create a new application state backed by a record store.
    pub fn with_store(store: PostgresPool) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(GallerySnapshot::default())),
            store: Some(store),
        }
    }

    /// Subscribe to the announcement broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<AnnouncementBroadcast> {
        self.tx.subscribe()
    }

    /// Publish a transition to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, message: &AnnouncementBroadcast) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(message.clone()).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

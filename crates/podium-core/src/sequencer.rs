//! The live announcement sequencer.
//!
//! This module provides [`Sequencer`], the single-owner control loop that
//! turns a bursty, unordered stream of change events into a strictly
//! one-at-a-time announcement pipeline:
//!
//! - **Admission**: activations are deduplicated against the pending queue,
//!   the in-flight record, and the display history before they queue.
//! - **Gating**: a record's image asset is readied before its presentation
//!   starts, so the animation never pops in around a half-loaded image.
//! - **Pacing**: a fixed-duration presentation followed by a cooldown
//!   before the next record is admitted.
//! - **History**: the presented record folds into the bounded history at
//!   the `Presenting -> Cooldown` edge, never earlier.
//!
//! The feed adapter pushes events onto an `mpsc` channel; the sequencer is
//! the sole consumer and the sole mutator of queue, state, and history, so
//! no locks are involved. While suspended on the gate or a timer it keeps
//! servicing the channel, so arrivals during a presentation are admitted
//! without forcing an early transition -- the machine only advances from
//! `Idle`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use podium_types::{ChangeEvent, ChangeKind, GalleryPhase, ResultRecord};

use crate::config::GalleryConfig;
use crate::gate::ReadinessGate;
use crate::history::DisplayHistory;
use crate::queue::{AnnouncementQueue, EnqueueOutcome};

/// The sequencer's lifecycle state.
///
/// Exactly one of these holds at any instant. The in-flight record, when
/// one exists, lives inside the state itself -- there is no separate
/// "current record" field that could disagree with the state tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerState {
    /// No announcement in flight.
    Idle,
    /// A record has been dequeued and its asset is being readied.
    AwaitingAsset(ResultRecord),
    /// The record's announcement animation is on screen.
    Presenting(ResultRecord),
    /// Pause between announcements.
    Cooldown,
}

impl SequencerState {
    /// The externally visible phase tag for this state.
    pub const fn phase(&self) -> GalleryPhase {
        match self {
            Self::Idle => GalleryPhase::Idle,
            Self::AwaitingAsset(_) => GalleryPhase::AwaitingAsset,
            Self::Presenting(_) => GalleryPhase::Presenting,
            Self::Cooldown => GalleryPhase::Cooldown,
        }
    }

    /// The in-flight record, if one exists in this state.
    pub const fn current_record(&self) -> Option<&ResultRecord> {
        match self {
            Self::AwaitingAsset(record) | Self::Presenting(record) => Some(record),
            Self::Idle | Self::Cooldown => None,
        }
    }
}

/// Pacing constants for the announcement pipeline.
#[derive(Debug, Clone, Copy)]
pub struct SequencerTiming {
    /// How long the announcement animation stays on screen.
    pub presentation: Duration,
    /// Pause between one announcement and the next.
    pub cooldown: Duration,
}

impl SequencerTiming {
    /// Derive the pacing from the gallery configuration.
    pub const fn from_config(config: &GalleryConfig) -> Self {
        Self {
            presentation: config.presentation(),
            cooldown: config.cooldown(),
        }
    }
}

/// Callback invoked on every state transition.
///
/// Implementations use this to update the observer snapshot and broadcast
/// to `WebSocket` clients. The callback receives the new state and the
/// current history; rendering is a pure function of these two values.
pub trait TransitionCallback: Send {
    /// Called after the sequencer has entered `state`.
    fn on_transition(&mut self, state: &SequencerState, history: &DisplayHistory);
}

/// A no-op transition callback for testing.
pub struct NoOpCallback;

impl TransitionCallback for NoOpCallback {
    fn on_transition(&mut self, _state: &SequencerState, _history: &DisplayHistory) {}
}

/// Why the sequencer run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEndReason {
    /// The change feed channel closed and the pending queue drained.
    FeedClosed,
}

/// Result of a sequencer run.
#[derive(Debug)]
pub struct SequencerReport {
    /// Why the run ended.
    pub end_reason: SequencerEndReason,
    /// Total number of records presented over the run.
    pub total_presented: u64,
    /// The final history snapshot, most recent first.
    pub history: Vec<ResultRecord>,
}

/// The single-owner announcement control loop.
pub struct Sequencer {
    rx: mpsc::Receiver<ChangeEvent>,
    queue: AnnouncementQueue,
    history: DisplayHistory,
    state: SequencerState,
    gate: Arc<ReadinessGate>,
    timing: SequencerTiming,
    feed_open: bool,
    total_presented: u64,
}

impl Sequencer {
    /// Create a sequencer consuming events from `rx`.
    ///
    /// `history` is typically pre-seeded from the initial bulk read so
    /// records presented before this process started are not re-announced.
    pub const fn new(
        rx: mpsc::Receiver<ChangeEvent>,
        gate: Arc<ReadinessGate>,
        timing: SequencerTiming,
        history: DisplayHistory,
    ) -> Self {
        Self {
            rx,
            queue: AnnouncementQueue::new(),
            history,
            state: SequencerState::Idle,
            gate,
            timing,
            feed_open: true,
            total_presented: 0,
        }
    }

    /// Run the announcement loop until the feed closes and the queue
    /// drains.
    ///
    /// Every state transition invokes `callback` with the new state and
    /// the current history. Records already pending when the feed closes
    /// are still presented before the run returns.
    pub async fn run(mut self, callback: &mut dyn TransitionCallback) -> SequencerReport {
        info!(
            presentation_ms = u64::try_from(self.timing.presentation.as_millis()).unwrap_or(u64::MAX),
            cooldown_ms = u64::try_from(self.timing.cooldown.as_millis()).unwrap_or(u64::MAX),
            history_capacity = self.history.capacity(),
            seeded = self.history.len(),
            "Announcement sequencer starting"
        );

        loop {
            self.drain_pending();

            let Some(record) = self.queue.dequeue() else {
                if !self.feed_open {
                    break;
                }
                match self.rx.recv().await {
                    Some(event) => self.admit(event),
                    None => self.feed_open = false,
                }
                continue;
            };

            // --- AwaitingAsset ---
            let asset = record.image_url.clone();
            self.transition(SequencerState::AwaitingAsset(record.clone()), callback);
            let readiness = self.gate_while_admitting(asset).await;
            debug!(record = %record.id, readiness = ?readiness, "Asset gate resolved");

            // --- Presenting ---
            self.transition(SequencerState::Presenting(record.clone()), callback);
            self.sleep_while_admitting(self.timing.presentation).await;

            // History mutates exactly once per presented record, on the
            // Presenting -> Cooldown edge.
            if let Some(evicted) = self.history.insert_most_recent(record) {
                debug!(record = %evicted.id, "Oldest history entry evicted");
            }
            self.total_presented = self.total_presented.saturating_add(1);

            // --- Cooldown ---
            self.transition(SequencerState::Cooldown, callback);
            self.sleep_while_admitting(self.timing.cooldown).await;

            self.transition(SequencerState::Idle, callback);
        }

        info!(
            total_presented = self.total_presented,
            "Change feed closed, sequencer stopping"
        );

        SequencerReport {
            end_reason: SequencerEndReason::FeedClosed,
            total_presented: self.total_presented,
            history: self.history.snapshot(),
        }
    }

    /// Apply the admission rules to one incoming event.
    ///
    /// Deactivations are ignored (they serve the moderation view).
    /// Activations for the in-flight record or an already-presented record
    /// are no-ops, which is what makes redundant feed deliveries
    /// idempotent. Everything else lands in the queue, where a pending
    /// duplicate refreshes in place.
    fn admit(&mut self, event: ChangeEvent) {
        if event.kind == ChangeKind::Deactivated {
            debug!(record = %event.record.id, seq = event.seq, "Deactivation ignored by sequencer");
            return;
        }

        let id = event.record.id;
        if self.state.current_record().is_some_and(|current| current.id == id) {
            debug!(record = %id, "Activation for in-flight record ignored");
            return;
        }
        if self.history.contains(id) {
            debug!(record = %id, "Activation for already-presented record ignored");
            return;
        }

        match self.queue.enqueue(event.record) {
            EnqueueOutcome::Appended => {
                debug!(record = %id, seq = event.seq, pending = self.queue.len(), "Record queued for announcement");
            }
            EnqueueOutcome::Refreshed => {
                debug!(record = %id, seq = event.seq, "Pending record fields refreshed");
            }
        }
    }

    /// Admit every event already sitting in the channel, without waiting.
    fn drain_pending(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.admit(event),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.feed_open = false;
                    break;
                }
            }
        }
    }

    /// Resolve the asset gate while continuing to admit incoming events.
    async fn gate_while_admitting(&mut self, asset: Option<String>) -> crate::gate::AssetReadiness {
        let gate = Arc::clone(&self.gate);
        let readiness = async move { gate.await_readiness(asset.as_deref()).await };
        tokio::pin!(readiness);

        loop {
            if !self.feed_open {
                return readiness.as_mut().await;
            }
            tokio::select! {
                resolved = readiness.as_mut() => return resolved,
                event = self.rx.recv() => match event {
                    Some(event) => self.admit(event),
                    None => self.feed_open = false,
                },
            }
        }
    }

    /// Sleep for `duration` while continuing to admit incoming events.
    async fn sleep_while_admitting(&mut self, duration: Duration) {
        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);

        loop {
            if !self.feed_open {
                sleep.as_mut().await;
                return;
            }
            tokio::select! {
                () = sleep.as_mut() => return,
                event = self.rx.recv() => match event {
                    Some(event) => self.admit(event),
                    None => self.feed_open = false,
                },
            }
        }
    }

    /// Enter `next` and notify the callback.
    fn transition(&mut self, next: SequencerState, callback: &mut dyn TransitionCallback) {
        self.state = next;
        callback.on_transition(&self.state, &self.history);
    }
}

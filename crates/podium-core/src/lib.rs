//! Announcement sequencing for the Podium results board.
//!
//! This crate holds the only part of the system with real temporal
//! semantics: the live announcement sequencer and its collaborators.
//!
//! # Modules
//!
//! - [`config`] -- Typed YAML configuration with env overrides
//! - [`queue`] -- FIFO announcement queue with in-place dedup
//! - [`history`] -- Bounded most-recent-first display history
//! - [`gate`] -- Asset readiness gate (fetcher trait, HTTP impl, stub)
//! - [`sequencer`] -- The one-at-a-time announcement state machine
//! - [`analytics`] -- Stateless aggregation over the full record set
//!
//! # Ownership
//!
//! The [`sequencer::Sequencer`] exclusively owns the queue, the history,
//! and the in-flight record. The feed adapter communicates with it over an
//! `mpsc` channel; rendering reads copy-on-read snapshots delivered
//! through the [`sequencer::TransitionCallback`]. The analytics view reads
//! an independent store snapshot and never touches sequencer state.

pub mod analytics;
pub mod config;
pub mod gate;
pub mod history;
pub mod queue;
pub mod sequencer;

// Re-export primary types for convenience.
pub use analytics::{AnalyticsFilter, AnalyticsReport, DistrictSummary, aggregate};
pub use config::{ConfigError, GalleryConfig, InfrastructureConfig, PodiumConfig};
pub use gate::{AssetError, AssetFetcher, AssetReadiness, HttpAssetFetcher, ReadinessGate};
pub use history::DisplayHistory;
pub use queue::{AnnouncementQueue, EnqueueOutcome};
pub use sequencer::{
    NoOpCallback, Sequencer, SequencerEndReason, SequencerReport, SequencerState, SequencerTiming,
    TransitionCallback,
};

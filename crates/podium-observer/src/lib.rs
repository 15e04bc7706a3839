//! Observer API server for the Podium results board.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/announcements`) for real-time
//!   announcement transition streaming via [`tokio::sync::broadcast`]
//! - **REST endpoints** for the rendering layer (current presentation +
//!   phase tag, display history) and the analytics aggregation
//! - **Minimal HTML dashboard** (`GET /`) showing the current phase and
//!   links to API endpoints
//!
//! # Architecture
//!
//! The observer reads from an in-memory [`GallerySnapshot`] that the
//! engine updates on every sequencer transition. All REST reads are
//! served against this snapshot so the observer never blocks the
//! announcement loop. `WebSocket` clients receive transitions via a
//! broadcast channel with automatic lag handling. The analytics endpoint
//! additionally reads a full record snapshot from `PostgreSQL` when a
//! store is configured.
//!
//! [`GallerySnapshot`]: state::GallerySnapshot

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_observer};
pub use state::{AnnouncementBroadcast, AppState, GallerySnapshot};

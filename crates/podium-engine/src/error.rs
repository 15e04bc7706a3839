//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup. Errors inside the running
//! announcement pipeline are non-fatal by design and never surface here.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: podium_core::config::ConfigError,
    },

    /// Record store connection or query failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying data-layer error.
        #[from]
        source: podium_db::DbError,
    },

    /// Observer API server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: podium_observer::StartupError,
    },
}

//! Shared type definitions for the Podium results board.
//!
//! This crate is the single source of truth for the types used across the
//! Podium workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the gallery frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for result identifiers
//! - [`enums`] -- Change feed kinds and the sequencer phase tag
//! - [`records`] -- The result record entity
//! - [`feed`] -- Wire and in-process change event types

pub mod enums;
pub mod feed;
pub mod ids;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use enums::{ChangeKind, GalleryPhase};
pub use feed::{ChangeEvent, FeedMessage};
pub use ids::ResultId;
pub use records::{MAX_SCORE, ResultRecord, UNKNOWN_DISTRICT};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::ResultId::export_all();
        let _ = crate::enums::ChangeKind::export_all();
        let _ = crate::enums::GalleryPhase::export_all();
        let _ = crate::records::ResultRecord::export_all();
        let _ = crate::feed::FeedMessage::export_all();
    }
}

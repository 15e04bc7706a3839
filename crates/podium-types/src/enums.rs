//! Enumeration types for the Podium results board.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Change feed event kinds
// ---------------------------------------------------------------------------

/// The kind of a change feed event.
///
/// The feed delivers two kinds of notification. Only `Activated` is relevant
/// to the announcement sequencer; `Deactivated` serves the moderation view
/// and is tolerated and ignored by the sequencing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ChangeKind {
    /// The record newly qualifies for public announcement.
    Activated,
    /// The record no longer qualifies for public display.
    Deactivated,
}

// ---------------------------------------------------------------------------
// Sequencer phase
// ---------------------------------------------------------------------------

/// The externally visible phase of the announcement sequencer.
///
/// A single enumeration replaces the reference behavior's trio of boolean
/// flags (is-animating, has-image-loaded, is-showing), so invalid
/// combinations such as "showing while not animating" are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GalleryPhase {
    /// No announcement in flight; the queue is being polled.
    Idle,
    /// A record has been pulled and its image asset is being readied.
    AwaitingAsset,
    /// The announcement animation for one record is on screen.
    Presenting,
    /// The pause between one announcement and the next.
    Cooldown,
}

impl core::fmt::Display for GalleryPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingAsset => "awaiting_asset",
            Self::Presenting => "presenting",
            Self::Cooldown => "cooldown",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_wire_names_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChangeKind::Activated).ok().as_deref(),
            Some("\"activated\"")
        );
        assert_eq!(
            serde_json::to_string(&ChangeKind::Deactivated).ok().as_deref(),
            Some("\"deactivated\"")
        );
    }

    #[test]
    fn phase_display_matches_wire_name() {
        for phase in [
            GalleryPhase::Idle,
            GalleryPhase::AwaitingAsset,
            GalleryPhase::Presenting,
            GalleryPhase::Cooldown,
        ] {
            let wire = serde_json::to_string(&phase).unwrap_or_default();
            assert_eq!(wire, format!("\"{phase}\""));
        }
    }
}

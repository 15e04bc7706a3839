//! Type-safe identifier wrapper around [`Uuid`].
//!
//! A result's identity is its identifier alone: two records carrying the
//! same [`ResultId`] are the same logical entity even if their other fields
//! differ across feed deliveries. The newtype keeps result identifiers from
//! being mixed with raw UUIDs at compile time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for a result record.
///
/// The upstream store generates identifiers on insert; the `new()`
/// constructor exists for app-side generation (tests, seed data) and uses
/// UUID v7 so identifiers stay time-ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResultId(pub Uuid);

impl ResultId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ResultId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ResultId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ResultId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<ResultId> for Uuid {
    fn from(id: ResultId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_not_nil() {
        let id = ResultId::new();
        assert_ne!(id.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = ResultId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<ResultId, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = ResultId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}

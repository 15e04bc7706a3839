//! Change feed message types.
//!
//! The feed transport delivers [`FeedMessage`] JSON payloads. The engine's
//! feed adapter tags each accepted payload with a process-local arrival
//! sequence number, producing the [`ChangeEvent`] the sequencer consumes.
//! External timestamps on the record are never trusted for ordering; only
//! the local sequence number orders events.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ChangeKind;
use crate::records::ResultRecord;

/// A change notification as delivered on the wire.
///
/// Deserialization enforces the required shape: a payload missing the
/// record identifier (or otherwise malformed) fails to parse and is dropped
/// by the feed adapter, never enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeedMessage {
    /// What happened to the record.
    pub kind: ChangeKind,
    /// The record in its post-change shape.
    pub record: ResultRecord,
}

/// A change event as observed by this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// What happened to the record.
    pub kind: ChangeKind,
    /// The record in its post-change shape.
    pub record: ResultRecord,
    /// Process-local monotonic arrival number assigned by the feed adapter.
    pub seq: u64,
}

impl ChangeEvent {
    /// Build an event from a wire message and its local arrival number.
    pub fn from_message(message: FeedMessage, seq: u64) -> Self {
        Self {
            kind: message.kind,
            record: message.record,
            seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::ids::ResultId;

    #[test]
    fn message_without_record_id_is_rejected() {
        let payload = serde_json::json!({
            "kind": "activated",
            "record": {
                "name": "Asha",
                "school": null,
                "aplus": 9,
                "reg_no": null,
                "image_url": null,
                "created_at": Utc::now(),
                "updated_at": Utc::now(),
            }
        });
        let parsed: Result<FeedMessage, _> = serde_json::from_value(payload);
        assert!(parsed.is_err());
    }

    #[test]
    fn message_parses_and_tags_sequence() {
        let id = ResultId::new();
        let payload = serde_json::json!({
            "kind": "activated",
            "record": {
                "id": id,
                "name": "Asha",
                "school": "GHSS Meenangadi, Wayanad",
                "aplus": 10,
                "reg_no": "402113",
                "image_url": "https://cdn.example/results/asha.png",
                "created_at": Utc::now(),
                "updated_at": Utc::now(),
            }
        });
        let message: Option<FeedMessage> = serde_json::from_value(payload).ok();
        assert!(message.is_some());
        let event = message.map(|m| ChangeEvent::from_message(m, 7));
        assert_eq!(event.as_ref().map(|e| e.seq), Some(7));
        assert_eq!(event.map(|e| e.record.id), Some(id));
    }
}

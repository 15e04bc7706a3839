//! NATS-based change feed adapter.
//!
//! [`NatsFeed`] subscribes to the configured subject and forwards each
//! well-formed [`FeedMessage`] into the sequencer's channel as a
//! [`ChangeEvent`] tagged with a process-local arrival number. Delivery is
//! at-least-once with no ordering guarantee beyond receipt order; the
//! sequencer's admission rules make redundant deliveries harmless.
//!
//! Malformed payloads (invalid JSON, missing record identifier) are
//! dropped and logged, never enqueued. A transport drop is a non-fatal
//! operator notice: the `async-nats` client reconnects on its own, and if
//! the subscription stream itself ends the adapter logs and exits while
//! the board keeps serving the last known history.

use futures::StreamExt as _;
use podium_types::{ChangeEvent, FeedMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Errors that can occur while establishing the change feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Connecting to the NATS server failed.
    #[error("failed to connect to NATS: {message}")]
    Connect {
        /// Description of the connection failure.
        message: String,
    },

    /// Subscribing to the change subject failed.
    #[error("failed to subscribe to {subject}: {message}")]
    Subscribe {
        /// The subject that could not be subscribed.
        subject: String,
        /// Description of the subscription failure.
        message: String,
    },
}

/// A connected change feed ready to be spawned.
pub struct NatsFeed {
    client: async_nats::Client,
    subject: String,
}

impl NatsFeed {
    /// Connect to a NATS server.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Connect`] if the connection fails.
    pub async fn connect(url: &str, subject: String) -> Result<Self, FeedError> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| FeedError::Connect {
                message: format!("{url}: {e}"),
            })?;
        info!(url, subject, "Change feed connected");
        Ok(Self { client, subject })
    }

    /// Subscribe and spawn the forwarding task.
    ///
    /// The task runs until the subscription stream ends or the sequencer
    /// channel closes. Arrival numbers are assigned here, on receipt --
    /// no external timestamp is trusted for ordering.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Subscribe`] if the subscription cannot be
    /// established.
    pub async fn spawn(
        self,
        tx: mpsc::Sender<ChangeEvent>,
    ) -> Result<JoinHandle<()>, FeedError> {
        let mut sub = self
            .client
            .subscribe(self.subject.clone())
            .await
            .map_err(|e| FeedError::Subscribe {
                subject: self.subject.clone(),
                message: format!("{e}"),
            })?;

        let subject = self.subject;
        let handle = tokio::spawn(async move {
            let mut seq: u64 = 0;
            while let Some(msg) = sub.next().await {
                let Some(message) = decode_message(&msg.payload, &subject) else {
                    continue;
                };
                let event = ChangeEvent::from_message(message, seq);
                seq = seq.saturating_add(1);
                if tx.send(event).await.is_err() {
                    debug!(subject, "Sequencer channel closed, feed adapter stopping");
                    return;
                }
            }
            // Non-fatal by design: the display history remains as last
            // known and the observer keeps serving it.
            warn!(
                subject,
                delivered = seq,
                "Change feed stream ended, no further announcements will arrive"
            );
        });

        Ok(handle)
    }
}

/// Decode one wire payload, dropping and logging malformed ones.
fn decode_message(payload: &[u8], subject: &str) -> Option<FeedMessage> {
    match serde_json::from_slice::<FeedMessage>(payload) {
        Ok(message) => {
            debug!(
                subject,
                kind = ?message.kind,
                record = %message.record.id,
                "Change message received"
            );
            Some(message)
        }
        Err(e) => {
            warn!(subject, error = %e, "Dropping malformed change message");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use podium_types::{ChangeKind, ResultId, ResultRecord};

    use super::*;

    #[test]
    fn well_formed_payload_decodes() {
        let record = ResultRecord {
            id: ResultId::new(),
            name: Some(String::from("Asha")),
            school: None,
            aplus: Some(10),
            reg_no: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let payload = serde_json::to_vec(&FeedMessage {
            kind: ChangeKind::Activated,
            record: record.clone(),
        })
        .unwrap_or_default();

        let decoded = decode_message(&payload, "podium.results.changes");
        assert_eq!(decoded.map(|m| m.record.id), Some(record.id));
    }

    #[test]
    fn invalid_json_is_dropped() {
        assert_eq!(decode_message(b"not json", "podium.results.changes"), None);
    }

    #[test]
    fn payload_missing_identifier_is_dropped() {
        let payload = br#"{"kind":"activated","record":{"name":"Asha"}}"#;
        assert_eq!(decode_message(payload, "podium.results.changes"), None);
    }
}

//! The asset readiness gate.
//!
//! Presenting the announcement animation around an image that has not been
//! fetched yet produces a visible pop-in. The gate makes the precondition
//! explicit: given a record's asset reference, it resolves once the image
//! has been retrieved and looks renderable, and the sequencer only starts
//! the presentation after that resolution.
//!
//! Fetching is abstracted behind the [`AssetFetcher`] trait -- an HTTP
//! implementation for production, a stub for tests. The gate performs no
//! retries; retry policy belongs to the transport. The wait is bounded so a
//! dead asset host cannot stall the whole pipeline: on timeout the gate
//! resolves [`AssetReadiness::Failed`] and the record is presented through
//! the no-asset path.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

/// Errors an asset fetch can produce.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The asset could not be retrieved at all.
    #[error("asset transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The asset was retrieved but does not look like a renderable image.
    #[error("asset not renderable: {message}")]
    Undecodable {
        /// Description of what was wrong with the payload.
        message: String,
    },
}

/// The resolution of a readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetReadiness {
    /// The asset was fetched and is renderable.
    Ready,
    /// The record carries no asset reference; presentation proceeds
    /// without gating.
    NoAsset,
    /// Retrieval failed or exceeded the wait bound; presentation proceeds
    /// through the no-asset path.
    Failed,
}

/// A mechanism for retrieving a remote asset.
///
/// Implementations resolve `Ok(())` once the referenced asset has been
/// fetched and is renderable by the hosting environment.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the asset at `url`, verifying it is renderable.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError`] if retrieval fails or the payload is not a
    /// usable image.
    async fn fetch(&self, url: &str) -> Result<(), AssetError>;
}

/// HTTP asset fetcher backed by [`reqwest`].
///
/// Renderability is checked at the transport level: a success status, an
/// `image/*` content type, and a non-empty body. Decoding proper is the
/// rendering host's concern.
#[derive(Debug, Clone, Default)]
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    /// Create a fetcher with a fresh HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<(), AssetError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssetError::Transport {
                message: format!("request to {url} failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Transport {
                message: format!("{url} returned status {status}"),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        if !content_type.starts_with("image/") {
            return Err(AssetError::Undecodable {
                message: format!("{url} has content type {content_type:?}, expected image/*"),
            });
        }

        let body = response.bytes().await.map_err(|e| AssetError::Transport {
            message: format!("reading body of {url} failed: {e}"),
        })?;
        if body.is_empty() {
            return Err(AssetError::Undecodable {
                message: format!("{url} returned an empty body"),
            });
        }

        Ok(())
    }
}

/// A stub fetcher with scripted behavior, for exercising the sequencer
/// without a network.
#[derive(Debug, Clone, Default)]
pub struct StubAssetFetcher {
    fail: bool,
    delay: Duration,
}

impl StubAssetFetcher {
    /// A stub that resolves `Ok(())` immediately.
    pub const fn succeeding() -> Self {
        Self {
            fail: false,
            delay: Duration::ZERO,
        }
    }

    /// A stub that fails immediately with a transport error.
    pub const fn failing() -> Self {
        Self {
            fail: true,
            delay: Duration::ZERO,
        }
    }

    /// Delay the resolution, for exercising the wait bound.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl AssetFetcher for StubAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<(), AssetError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(AssetError::Transport {
                message: format!("stub failure for {url}"),
            });
        }
        Ok(())
    }
}

/// The readiness gate: one bounded wait per asset reference.
pub struct ReadinessGate {
    fetcher: Arc<dyn AssetFetcher>,
    wait_bound: Option<Duration>,
}

impl ReadinessGate {
    /// Create a gate over the given fetcher.
    ///
    /// `wait_bound` caps how long a single readiness wait may take;
    /// `None` leaves the wait unbounded.
    pub fn new(fetcher: Arc<dyn AssetFetcher>, wait_bound: Option<Duration>) -> Self {
        Self {
            fetcher,
            wait_bound,
        }
    }

    /// Resolve readiness for the given asset reference.
    ///
    /// `None` resolves [`AssetReadiness::NoAsset`] immediately. Fetch
    /// errors and bound overruns resolve [`AssetReadiness::Failed`]; both
    /// are logged and neither blocks the pipeline.
    pub async fn await_readiness(&self, asset: Option<&str>) -> AssetReadiness {
        let Some(url) = asset else {
            return AssetReadiness::NoAsset;
        };

        let fetch = self.fetcher.fetch(url);
        let outcome = if let Some(bound) = self.wait_bound {
            match tokio::time::timeout(bound, fetch).await {
                Ok(outcome) => outcome,
                Err(_elapsed) => {
                    warn!(
                        url,
                        bound_ms = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX),
                        "asset readiness wait exceeded bound, presenting without asset"
                    );
                    return AssetReadiness::Failed;
                }
            }
        } else {
            fetch.await
        };

        match outcome {
            Ok(()) => {
                debug!(url, "asset ready");
                AssetReadiness::Ready
            }
            Err(e) => {
                warn!(url, error = %e, "asset fetch failed, presenting without asset");
                AssetReadiness::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(fetcher: StubAssetFetcher, bound: Option<Duration>) -> ReadinessGate {
        ReadinessGate::new(Arc::new(fetcher), bound)
    }

    #[tokio::test]
    async fn absent_reference_skips_gating() {
        let gate = gate(StubAssetFetcher::failing(), Some(Duration::from_secs(1)));
        assert_eq!(gate.await_readiness(None).await, AssetReadiness::NoAsset);
    }

    #[tokio::test]
    async fn successful_fetch_is_ready() {
        let gate = gate(StubAssetFetcher::succeeding(), Some(Duration::from_secs(1)));
        assert_eq!(
            gate.await_readiness(Some("https://cdn.example/a.png")).await,
            AssetReadiness::Ready
        );
    }

    #[tokio::test]
    async fn fetch_error_resolves_failed() {
        let gate = gate(StubAssetFetcher::failing(), Some(Duration::from_secs(1)));
        assert_eq!(
            gate.await_readiness(Some("https://cdn.example/a.png")).await,
            AssetReadiness::Failed
        );
    }

    #[tokio::test]
    async fn slow_fetch_hits_the_bound() {
        let fetcher = StubAssetFetcher::succeeding().with_delay(Duration::from_millis(200));
        let gate = gate(fetcher, Some(Duration::from_millis(20)));
        assert_eq!(
            gate.await_readiness(Some("https://cdn.example/slow.png"))
                .await,
            AssetReadiness::Failed
        );
    }

    #[tokio::test]
    async fn unbounded_gate_waits_out_the_delay() {
        let fetcher = StubAssetFetcher::succeeding().with_delay(Duration::from_millis(20));
        let gate = gate(fetcher, None);
        assert_eq!(
            gate.await_readiness(Some("https://cdn.example/slow.png"))
                .await,
            AssetReadiness::Ready
        );
    }
}

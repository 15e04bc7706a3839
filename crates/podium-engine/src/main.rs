//! Engine binary for the Podium results board.
//!
//! This is the main entry point that wires together the change feed
//! adapter, the announcement sequencer, the record store, and the
//! observer API. It loads configuration, initializes all subsystems, and
//! runs the announcement loop until the change feed closes.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `podium-config.yaml`
//! 3. Connect to `PostgreSQL`
//! 4. Seed the display history with the most recently approved records
//! 5. Start the observer API server
//! 6. Connect to NATS and spawn the change feed adapter
//! 7. Run the announcement sequencer
//! 8. Log the result

mod callback;
mod error;
mod feed;

use std::path::Path;
use std::sync::Arc;

use podium_core::config::PodiumConfig;
use podium_core::gate::{HttpAssetFetcher, ReadinessGate};
use podium_core::history::DisplayHistory;
use podium_core::sequencer::{Sequencer, SequencerTiming};
use podium_db::{PostgresPool, ResultStore};
use podium_observer::state::AppState;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::callback::ObserverCallback;
use crate::error::EngineError;
use crate::feed::NatsFeed;

/// Capacity of the channel between the feed adapter and the sequencer.
///
/// Bursts beyond this apply backpressure to the adapter task; the NATS
/// client buffers upstream in the meantime.
const FEED_CHANNEL_CAPACITY: usize = 256;

/// Application entry point for the engine.
///
/// Initializes all subsystems and runs the announcement loop.
///
/// # Errors
///
/// Returns an error if any initialization step fails. The running
/// pipeline itself degrades rather than failing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("podium-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        presentation_ms = config.gallery.presentation_ms,
        cooldown_ms = config.gallery.cooldown_ms,
        history_capacity = config.gallery.history_capacity,
        initial_page_size = config.gallery.initial_page_size,
        asset_wait_ms = config.gallery.asset_wait_ms,
        "Configuration loaded"
    );

    // 3. Connect to PostgreSQL.
    let pool = PostgresPool::connect_url(&config.infrastructure.postgres_url)
        .await
        .map_err(EngineError::from)?;

    // 4. Seed the display history before subscribing to incremental
    //    events, so already-announced records are not re-announced.
    let seed = ResultStore::new(pool.pool())
        .list_recent_approved(config.gallery.initial_page_size)
        .await
        .map_err(EngineError::from)?;
    let history = DisplayHistory::seeded(seed, config.gallery.history_capacity);
    info!(seeded = history.len(), "Display history seeded");

    // 5. Start the observer API server.
    let app_state = Arc::new(AppState::with_store(pool));
    {
        let mut snap = app_state.snapshot.write().await;
        snap.history = history.snapshot();
    }
    let observer_port = config.infrastructure.observer_port;
    let _observer_handle =
        podium_observer::spawn_observer(observer_port, Arc::clone(&app_state))
            .await
            .map_err(EngineError::from)?;
    info!(port = observer_port, "Observer API server started");

    // 6. Connect to NATS and spawn the change feed adapter. A feed that
    //    cannot be established is a non-fatal operator notice: the board
    //    keeps serving the seeded history, and the guard below keeps the
    //    sequencer channel open so the loop idles instead of exiting.
    let (tx, rx) = mpsc::channel(FEED_CHANNEL_CAPACITY);
    let _feed_guard = match NatsFeed::connect(
        &config.infrastructure.nats_url,
        config.infrastructure.feed_subject.clone(),
    )
    .await
    {
        Ok(nats_feed) => match nats_feed.spawn(tx.clone()).await {
            Ok(_handle) => {
                drop(tx);
                None
            }
            Err(e) => {
                warn!(error = %e, "Change feed subscription failed, serving last known history");
                Some(tx)
            }
        },
        Err(e) => {
            warn!(error = %e, "Change feed unavailable, serving last known history");
            Some(tx)
        }
    };

    // 7. Run the announcement sequencer.
    let gate = Arc::new(ReadinessGate::new(
        Arc::new(HttpAssetFetcher::new()),
        config.gallery.asset_wait(),
    ));
    let timing = SequencerTiming::from_config(&config.gallery);
    let sequencer = Sequencer::new(rx, gate, timing, history);
    let mut callback = ObserverCallback::new(app_state);

    info!("Entering announcement loop");
    let report = sequencer.run(&mut callback).await;

    // 8. Log results.
    info!(
        end_reason = ?report.end_reason,
        total_presented = report.total_presented,
        history_len = report.history.len(),
        "podium-engine shutdown complete"
    );

    Ok(())
}

/// Load the board configuration from `podium-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
fn load_config() -> Result<PodiumConfig, EngineError> {
    let config_path = Path::new("podium-config.yaml");
    if config_path.exists() {
        let config = PodiumConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(PodiumConfig::default())
    }
}

//! REST API endpoint handlers for the observer server.
//!
//! The presentation and history handlers read from the in-memory
//! [`GallerySnapshot`] via the shared [`AppState`]; the analytics handler
//! additionally queries the record store for its full snapshot.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/presentation` | Current presentation + phase tag |
//! | `GET` | `/api/history` | Display history, most recent first |
//! | `GET` | `/api/analytics` | Filtered aggregation over all records |
//!
//! [`GallerySnapshot`]: crate::state::GallerySnapshot

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use podium_core::analytics::{self, AnalyticsFilter, AnalyticsReport};
use podium_db::ResultStore;
use podium_types::{GalleryPhase, MAX_SCORE, ResultRecord};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/analytics` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct AnalyticsQuery {
    /// Case-insensitive text-contains match against the district label.
    pub district: Option<String>,
    /// Inclusive lower score bound (default 0).
    pub min_score: Option<u8>,
    /// Inclusive upper score bound (default 10).
    pub max_score: Option<u8>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing board status and API links.
///
/// This is the placeholder dashboard until the gallery frontend is wired
/// up against the JSON endpoints.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let phase = snapshot.phase.to_string();
    let current = snapshot
        .current
        .as_ref()
        .and_then(|record| record.name.clone())
        .unwrap_or_else(|| String::from("-"));
    let history_len = snapshot.history.len();
    let total_presented = snapshot.total_presented;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Podium Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Podium Observer</h1>
    <p class="subtitle">Live results board monitoring</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Phase</div>
            <div class="value">{phase}</div>
        </div>
        <div class="metric">
            <div class="label">On screen</div>
            <div class="value">{current}</div>
        </div>
        <div class="metric">
            <div class="label">History</div>
            <div class="value">{history_len}</div>
        </div>
        <div class="metric">
            <div class="label">Presented</div>
            <div class="value">{total_presented}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/presentation">/api/presentation</a> -- Current presentation + phase</li>
        <li><a href="/api/history">/api/history</a> -- Display history strip</li>
        <li><a href="/api/analytics">/api/analytics</a> -- Filtered aggregation</li>
        <li><a href="/ws/announcements">/ws/announcements</a> -- Transition stream (WebSocket)</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/presentation
// ---------------------------------------------------------------------------

/// Response body for the presentation endpoint.
#[derive(Debug, serde::Serialize)]
pub struct PresentationResponse {
    /// Current sequencer phase.
    pub phase: GalleryPhase,
    /// The in-flight record, when an announcement is running.
    pub record: Option<ResultRecord>,
}

/// Return the current presentation and state tag.
///
/// # Route
///
/// `GET /api/presentation`
pub async fn get_presentation(State(state): State<Arc<AppState>>) -> Json<PresentationResponse> {
    let snapshot = state.snapshot.read().await;
    Json(PresentationResponse {
        phase: snapshot.phase,
        record: snapshot.current.clone(),
    })
}

// ---------------------------------------------------------------------------
// GET /api/history
// ---------------------------------------------------------------------------

/// Return the display history, most recently presented first.
///
/// # Route
///
/// `GET /api/history`
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<ResultRecord>> {
    let snapshot = state.snapshot.read().await;
    Json(snapshot.history.clone())
}

// ---------------------------------------------------------------------------
// GET /api/analytics
// ---------------------------------------------------------------------------

/// Compute the filtered aggregation over the full record set.
///
/// # Route
///
/// `GET /api/analytics?district=<text>&min_score=<0..=10>&max_score=<0..=10>`
///
/// # Errors
///
/// Returns [`ObserverError::InvalidQuery`] for out-of-range or inverted
/// score bounds, [`ObserverError::Unavailable`] when no record store is
/// configured, and [`ObserverError::Store`] if the snapshot query fails.
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>, ObserverError> {
    let min_score = query.min_score.unwrap_or(0);
    let max_score = query.max_score.unwrap_or(MAX_SCORE);
    if min_score > MAX_SCORE || max_score > MAX_SCORE {
        return Err(ObserverError::InvalidQuery(format!(
            "score bounds must be between 0 and {MAX_SCORE}"
        )));
    }
    if min_score > max_score {
        return Err(ObserverError::InvalidQuery(format!(
            "min_score {min_score} exceeds max_score {max_score}"
        )));
    }

    let Some(store) = state.store.as_ref() else {
        return Err(ObserverError::Unavailable(String::from(
            "record store not configured",
        )));
    };

    let records = ResultStore::new(store.pool()).fetch_all().await?;
    let filter = AnalyticsFilter {
        district_contains: query.district,
        min_score,
        max_score,
    };
    Ok(Json(analytics::aggregate(&records, &filter)))
}

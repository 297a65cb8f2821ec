//! authtriage -- Sequential login anomaly scoring for authentication telemetry.
//!
//! This crate provides the core library for per-user behavioral baselining,
//! deviation flagging, sequential geo-velocity analysis, risk-score
//! aggregation, and anomaly selection, plus the JSON API and CLI plumbing
//! around the engine.

pub mod api;
pub mod config;
pub mod geo;
pub mod ingest;
pub mod model;
pub mod score;

use anyhow::Result;

/// Start the authtriage server: load the telemetry snapshot and serve the
/// scoring API over it.
pub async fn serve(bind: &str, events_path: &str, config: config::ScoringConfig) -> Result<()> {
    tracing::info!(%events_path, "Loading login telemetry snapshot");
    let events = ingest::load_events(events_path)?;
    let histories = ingest::group_by_user(events);
    tracing::info!(users = histories.len(), "Snapshot ready");

    let state = api::state::AppState::new(histories, config);
    let app = api::router(state);

    let addr: std::net::SocketAddr = bind.parse()?;
    tracing::info!(%addr, "authtriage listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

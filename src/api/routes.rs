//! API route definitions.
//!
//! Responses follow the `{data, meta}` envelope. The engine exposes plain
//! data only; chart/map rendering belongs to the consuming collaborator.

use crate::api::state::AppState;
use crate::model::UserHistory;
use crate::score::baseline::{compare_users, compute_summary};
use crate::score::engine::{score_history, select_anomalies};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/users", get(list_users))
        .route("/users/{user_id}/baseline", get(user_baseline))
        .route("/users/{user_id}/compare/{other_id}", get(user_compare))
        .route("/users/{user_id}/score", get(user_score))
        .route("/users/{user_id}/anomalies", get(user_anomalies))
}

type ApiError = (StatusCode, Json<Value>);

fn not_found(user_id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("unknown user {}", user_id) })),
    )
}

fn scoring_failed(e: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": e.to_string() })),
    )
}

fn envelope(data: Value, meta: Value) -> Json<Value> {
    Json(json!({ "data": data, "meta": meta }))
}

fn lookup<'a>(state: &'a AppState, user_id: &str) -> Result<&'a UserHistory, ApiError> {
    state.histories.get(user_id).ok_or_else(|| not_found(user_id))
}

async fn health() -> Json<Value> {
    envelope(
        json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }),
        json!({ "timestamp": chrono::Utc::now().to_rfc3339() }),
    )
}

async fn list_users(State(state): State<AppState>) -> Json<Value> {
    let mut ids: Vec<&String> = state.histories.keys().collect();
    ids.sort();
    let total = ids.len();
    envelope(json!(ids), json!({ "total": total }))
}

async fn user_baseline(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let history = lookup(&state, &user_id)?;
    let summary = compute_summary(history).map_err(scoring_failed)?;
    Ok(envelope(json!(summary), json!({})))
}

async fn user_compare(
    State(state): State<AppState>,
    Path((user_id, other_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let left = lookup(&state, &user_id)?;
    let right = lookup(&state, &other_id)?;
    let comparison = compare_users(left, right).map_err(scoring_failed)?;
    Ok(envelope(json!(comparison), json!({})))
}

async fn user_score(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let history = lookup(&state, &user_id)?;
    let results = score_history(history, &state.config).map_err(scoring_failed)?;
    let total = results.len();
    Ok(envelope(json!(results), json!({ "total": total })))
}

#[derive(Deserialize)]
struct AnomalyParams {
    threshold: Option<f64>,
}

async fn user_anomalies(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<AnomalyParams>,
) -> Result<Json<Value>, ApiError> {
    let history = lookup(&state, &user_id)?;
    let threshold = params.threshold.unwrap_or(state.config.threshold);
    let results = score_history(history, &state.config).map_err(scoring_failed)?;
    let anomalies = select_anomalies(&results, threshold);
    let total = anomalies.len();
    Ok(envelope(
        json!(anomalies),
        json!({ "total": total, "threshold": threshold, "scored": results.len() }),
    ))
}

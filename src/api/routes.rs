//! API route definitions.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::state::AppState;
use super::ApiError;
use crate::detect::date_range;
use crate::records::Snapshot;
use crate::storage;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/insights", get(stored_insights).post(posted_insights))
        .route("/range", get(stored_range))
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<u32>,
}

async fn health() -> Json<Value> {
    Json(json!({
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION")
        },
        "meta": {
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION")
        }
    }))
}

async fn load(state: &AppState, days: Option<u32>) -> Result<Snapshot, ApiError> {
    let pool = state.pool.clone();
    let snapshot = tokio::task::spawn_blocking(move || storage::load_window(&pool, days))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(snapshot)
}

fn insights_body(state: &AppState, snapshot: &Snapshot, days: Option<u32>) -> Result<Json<Value>, ApiError> {
    snapshot.ensure_data()?;
    let insights = state.engine.generate(snapshot);
    let range = date_range(&snapshot.executions);
    Ok(Json(json!({
        "data": {
            "range": range,
            "insights": insights
        },
        "meta": {
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "days": days,
            "total": insights.total()
        }
    })))
}

async fn stored_insights(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Value>, ApiError> {
    let days = query.days.or(state.default_days);
    let snapshot = load(&state, days).await?;
    insights_body(&state, &snapshot, days)
}

async fn posted_insights(
    State(state): State<AppState>,
    Json(snapshot): Json<Snapshot>,
) -> Result<Json<Value>, ApiError> {
    insights_body(&state, &snapshot, None)
}

async fn stored_range(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Value>, ApiError> {
    let days = query.days.or(state.default_days);
    let snapshot = load(&state, days).await?;
    Ok(Json(json!({
        "data": date_range(&snapshot.executions),
        "meta": { "days": days }
    })))
}

//! Front-facing read API.
//!
//! Thin glue over [`Group::get`](crate::group::Group::get):
//! - `GET /api?key=K`: the raw bytes for `K`, 400 for a missing key,
//!   500 carrying the error text otherwise
//! - `GET /health`: process uptime and per-group entry counts
//! - `GET /stats/{group}`: resolution counters for one group

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::group::registry::GroupRegistry;
use crate::group::GroupError;

/// State shared by the front-facing handlers.
pub struct ApiState {
    pub registry: Arc<GroupRegistry>,
    /// The group `/api` reads from.
    pub group_name: String,
    pub start_time: Instant,
}

/// Build the front-facing router.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api", get(lookup))
        .route("/health", get(health))
        .route("/stats/{group}", get(group_stats))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    #[serde(default)]
    key: String,
}

async fn lookup(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<LookupParams>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    info!(request_id = %request_id, key = %params.key, "api lookup");

    let Some(group) = state.registry.get_group(&state.group_name) else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "cache group not configured".to_string(),
        )
            .into_response();
    };

    match group.get(&params.key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(err @ GroupError::EmptyKey) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
    groups: Vec<GroupHealth>,
}

#[derive(Debug, Serialize)]
struct GroupHealth {
    name: String,
    cached_entries: usize,
}

async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let groups = state
        .registry
        .group_names()
        .into_iter()
        .filter_map(|name| {
            state.registry.get_group(&name).map(|group| GroupHealth {
                cached_entries: group.cached_entries(),
                name,
            })
        })
        .collect();

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        groups,
    })
}

async fn group_stats(
    State(state): State<Arc<ApiState>>,
    Path(group): Path<String>,
) -> Response {
    match state.registry.get_group(&group) {
        Some(group) => Json(group.stats()).into_response(),
        None => (StatusCode::NOT_FOUND, format!("no such group: {group}")).into_response(),
    }
}

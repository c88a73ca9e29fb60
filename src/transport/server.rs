//! Server half of the peer transport.
//!
//! Exposes `GET <base>/{group}/{key}`, where the key may contain further
//! `/` separators. An unknown group is a 404 the requesting node treats
//! as a remote failure; anything the group itself reports becomes a 500
//! whose body carries the error text.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::debug;

use crate::group::registry::GroupRegistry;
use crate::transport::BASE_PATH;

/// Build the router serving peer lookups.
pub fn build_router(registry: Arc<GroupRegistry>) -> Router {
    Router::new()
        .route(&format!("{BASE_PATH}/{{group}}/{{*key}}"), get(fetch))
        .fallback(bad_path)
        .with_state(registry)
}

async fn fetch(
    State(registry): State<Arc<GroupRegistry>>,
    Path((group_name, key)): Path<(String, String)>,
) -> Response {
    debug!(group = %group_name, key = %key, "peer fetch");

    let Some(group) = registry.get_group(&group_name) else {
        return (
            StatusCode::NOT_FOUND,
            format!("no such group: {group_name}"),
        )
            .into_response();
    };

    match group.get(&key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// Anything that is not `<base>/<group>/<key>` is a malformed request.
/// Untrusted input: answered with a 400, never a crash.
async fn bad_path() -> Response {
    (StatusCode::BAD_REQUEST, "bad request").into_response()
}

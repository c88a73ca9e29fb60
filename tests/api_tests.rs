//! Tests for the front-facing read API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use peercache::api::{self, ApiState};
use peercache::group::registry::GroupRegistry;
use peercache::group::LoaderFn;

async fn spawn_api() -> SocketAddr {
    let registry = Arc::new(GroupRegistry::new());
    registry
        .new_group(
            "scores",
            1 << 20,
            Arc::new(LoaderFn(|key: &str| -> anyhow::Result<Vec<u8>> {
                match key {
                    "Tom" => Ok(b"630".to_vec()),
                    _ => Err(anyhow::anyhow!("{key} not exist")),
                }
            })),
        )
        .unwrap();

    let state = Arc::new(ApiState {
        registry,
        group_name: "scores".to_string(),
        start_time: Instant::now(),
    });

    let app = api::build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_lookup_returns_the_value() {
    let addr = spawn_api().await;

    let response = reqwest::get(format!("http://{addr}/api?key=Tom"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"630");
}

#[tokio::test]
async fn test_missing_key_is_a_bad_request() {
    let addr = spawn_api().await;

    let response = reqwest::get(format!("http://{addr}/api")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "key must not be empty");
}

#[tokio::test]
async fn test_loader_error_text_reaches_the_caller() {
    let addr = spawn_api().await;

    let response = reqwest::get(format!("http://{addr}/api?key=Nobody"))
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(response.text().await.unwrap(), "Nobody not exist");
}

#[tokio::test]
async fn test_stats_and_health_reflect_traffic() {
    let addr = spawn_api().await;

    reqwest::get(format!("http://{addr}/api?key=Tom"))
        .await
        .unwrap();
    reqwest::get(format!("http://{addr}/api?key=Tom"))
        .await
        .unwrap();

    let stats: serde_json::Value = reqwest::get(format!("http://{addr}/stats/scores"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["gets"], 2);
    assert_eq!(stats["cache_hits"], 1);
    assert_eq!(stats["loader_loads"], 1);

    let health: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["groups"][0]["name"], "scores");
    assert_eq!(health["groups"][0]["cached_entries"], 1);
}

#[tokio::test]
async fn test_stats_for_unknown_group_is_not_found() {
    let addr = spawn_api().await;

    let response = reqwest::get(format!("http://{addr}/stats/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

//! Integration Tests for API Endpoints
//!
//! Drives the full router against an in-memory ranking source.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use super_ganaderia::{
    api::create_router,
    cache::{ConfigCache, RankingCache},
    error::{AppError, Result},
    models::TeamRanking,
    ranking::{RankingService, RankingSource},
    AppState,
};
use tower::ServiceExt;

// == Helper Functions ==

/// Ranking source that counts calls and can be switched to failing.
#[derive(Default)]
struct ScriptedSource {
    calls: AtomicUsize,
    failing: AtomicBool,
}

#[async_trait]
impl RankingSource for ScriptedSource {
    async fn fetch_ranking(&self, zone: Option<&str>) -> Result<Vec<TeamRanking>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Backend("backend unavailable".into()));
        }
        let zone = zone.unwrap_or("all");
        Ok(vec![
            TeamRanking::new("Los Toros", 120).in_zone(zone),
            TeamRanking::new("X", 10).in_zone(zone),
        ])
    }
}

fn create_test_app(source: Arc<ScriptedSource>, ranking_ttl: Duration) -> Router {
    let rankings = RankingService::new(
        RankingCache::new(ranking_ttl, 100),
        source,
        Duration::from_secs(5),
    );
    let state = AppState::new(ConfigCache::new(Duration::from_secs(300), 100), rankings);
    create_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// == Ranking Endpoint Tests ==

#[tokio::test]
async fn test_ranking_miss_then_hit() {
    let source = Arc::new(ScriptedSource::default());
    let app = create_test_app(source.clone(), Duration::from_secs(120));

    let (status, first) = send(&app, "GET", "/ranking?zone=norte", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["zone"], "norte");
    assert_eq!(first["cached"], false);
    assert_eq!(first["teams"][0]["team"], "Los Toros");

    let (_, second) = send(&app, "GET", "/ranking?zone=norte", None).await;
    assert_eq!(second["cached"], true);
    assert_eq!(second["teams"], first["teams"]);

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_ranking_without_zone_uses_all_bucket() {
    let source = Arc::new(ScriptedSource::default());
    let app = create_test_app(source.clone(), Duration::from_secs(120));

    let (_, body) = send(&app, "GET", "/ranking", None).await;
    assert_eq!(body["zone"], "all");

    let (_, body) = send(&app, "GET", "/ranking?zone=", None).await;
    assert_eq!(body["zone"], "all");
    assert_eq!(body["cached"], true);
}

#[tokio::test]
async fn test_ranking_backend_failure_is_not_cached() {
    let source = Arc::new(ScriptedSource::default());
    source.failing.store(true, Ordering::SeqCst);
    let app = create_test_app(source.clone(), Duration::from_secs(120));

    let (status, body) = send(&app, "GET", "/ranking?zone=sur", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("backend unavailable"));

    source.failing.store(false, Ordering::SeqCst);
    let (status, body) = send(&app, "GET", "/ranking?zone=sur", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_ranking_expires_after_ttl() {
    let source = Arc::new(ScriptedSource::default());
    let app = create_test_app(source.clone(), Duration::from_millis(2000));

    send(&app, "GET", "/ranking?zone=zoneA", None).await;

    tokio::time::advance(Duration::from_millis(1000)).await;
    let (_, body) = send(&app, "GET", "/ranking?zone=zoneA", None).await;
    assert_eq!(body["cached"], true);

    tokio::time::advance(Duration::from_millis(1500)).await;
    let (_, body) = send(&app, "GET", "/ranking?zone=zoneA", None).await;
    assert_eq!(body["cached"], false);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalidate_zone_keeps_other_zones() {
    let source = Arc::new(ScriptedSource::default());
    let app = create_test_app(source.clone(), Duration::from_secs(120));

    send(&app, "GET", "/ranking?zone=norte", None).await;
    send(&app, "GET", "/ranking?zone=sur", None).await;

    let (status, body) = send(&app, "DELETE", "/ranking/norte", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "norte");

    let (_, sur) = send(&app, "GET", "/ranking?zone=sur", None).await;
    let (_, norte) = send(&app, "GET", "/ranking?zone=norte", None).await;
    assert_eq!(sur["cached"], true);
    assert_eq!(norte["cached"], false);
}

#[tokio::test]
async fn test_clear_ranking_cache() {
    let source = Arc::new(ScriptedSource::default());
    let app = create_test_app(source.clone(), Duration::from_secs(120));

    send(&app, "GET", "/ranking?zone=norte", None).await;
    send(&app, "GET", "/ranking", None).await;

    let (status, _) = send(&app, "DELETE", "/ranking", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["ranking"]["total_entries"], 0);
}

// == Config Endpoint Tests ==

#[tokio::test]
async fn test_config_set_get_invalidate() {
    let app = create_test_app(Arc::new(ScriptedSource::default()), Duration::from_secs(120));

    let (status, body) = send(
        &app,
        "PUT",
        "/config",
        Some(r#"{"key":"point_rules","value":{"per_sale":10}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("point_rules"));

    let (status, body) = send(&app, "GET", "/config/point_rules", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["per_sale"], 10);

    let (status, _) = send(&app, "DELETE", "/config/point_rules", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/config/point_rules", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_config_ttl_override_expires() {
    let app = create_test_app(Arc::new(ScriptedSource::default()), Duration::from_secs(120));

    send(
        &app,
        "PUT",
        "/config",
        Some(r#"{"key":"banner","value":"Cierre de mes","ttl_ms":1000}"#),
    )
    .await;

    tokio::time::advance(Duration::from_millis(400)).await;
    let (status, body) = send(&app, "GET", "/config/banner", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ttl_remaining_ms"], 600);

    tokio::time::advance(Duration::from_millis(601)).await;
    let (status, _) = send(&app, "GET", "/config/banner", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["config"]["expirations"], 1);
}

#[tokio::test]
async fn test_config_empty_key_rejected() {
    let app = create_test_app(Arc::new(ScriptedSource::default()), Duration::from_secs(120));

    let (status, body) = send(&app, "PUT", "/config", Some(r#"{"key":"","value":1}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_config_clear() {
    let app = create_test_app(Arc::new(ScriptedSource::default()), Duration::from_secs(120));

    send(&app, "PUT", "/config", Some(r#"{"key":"a","value":1}"#)).await;
    send(&app, "PUT", "/config", Some(r#"{"key":"b","value":2}"#)).await;
    send(&app, "DELETE", "/config", None).await;

    let (status_a, _) = send(&app, "GET", "/config/a", None).await;
    let (status_b, _) = send(&app, "GET", "/config/b", None).await;
    assert_eq!(status_a, StatusCode::NOT_FOUND);
    assert_eq!(status_b, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_purge_removes_stale_entries_from_both_caches() {
    let source = Arc::new(ScriptedSource::default());
    let app = create_test_app(source.clone(), Duration::from_millis(2000));

    send(&app, "GET", "/ranking?zone=norte", None).await;
    send(
        &app,
        "PUT",
        "/config",
        Some(r#"{"key":"flash","value":true,"ttl_ms":500}"#),
    )
    .await;
    send(&app, "PUT", "/config", Some(r#"{"key":"steady","value":1}"#)).await;

    tokio::time::advance(Duration::from_millis(2500)).await;
    let (status, body) = send(&app, "POST", "/purge", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"], 1);
    assert_eq!(body["ranking"], 1);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["config"]["total_entries"], 1);
    assert_eq!(stats["ranking"]["total_entries"], 0);
}

// == Stats & Health Tests ==

#[tokio::test]
async fn test_stats_track_hits_and_misses() {
    let app = create_test_app(Arc::new(ScriptedSource::default()), Duration::from_secs(120));

    send(&app, "GET", "/ranking?zone=norte", None).await; // miss
    send(&app, "GET", "/ranking?zone=norte", None).await; // hit
    send(&app, "GET", "/config/missing", None).await; // miss

    let (status, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["ranking"]["hits"], 1);
    assert_eq!(stats["ranking"]["misses"], 1);
    assert_eq!(stats["ranking"]["hit_rate"], 0.5);
    assert_eq!(stats["config"]["misses"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(Arc::new(ScriptedSource::default()), Duration::from_secs(120));

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

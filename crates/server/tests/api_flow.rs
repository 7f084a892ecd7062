use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes;
use server::state::AppState;
use service::clock::ManualClock;
use service::records::repository::memory::InMemoryRecordRepository;
use service::records::RecordStore;
use service::stats::repository::memory::InMemoryStatsRepository;
use service::stats::StatsService;

const KEY: &str = "test-secret";

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
    records: Arc<InMemoryRecordRepository>,
    stats: Arc<StatsService>,
}

fn app() -> TestApp {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
    let records = Arc::new(InMemoryRecordRepository::default());
    let store = Arc::new(RecordStore::new(records.clone(), clock.clone()));
    let stats = Arc::new(StatsService::new(Arc::new(InMemoryStatsRepository::default()), clock.clone()));
    let state = AppState::from_parts(store, stats.clone(), KEY);
    TestApp { router: routes::build_router(state, CorsLayer::very_permissive()), clock, records, stats }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn save_req(key: Option<&str>, body: &str) -> Request<Body> {
    let mut b = Request::builder().method("POST").uri("/api/save").header("content-type", "application/json");
    if let Some(k) = key {
        b = b.header("x-api-key", k);
    }
    b.body(Body::from(body.to_string())).unwrap()
}

fn fetch_req(uri: &str, key: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method("GET").uri(uri);
    if let Some(k) = key {
        b = b.header("x-api-key", k);
    }
    b.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn save_fetch_then_expire() {
    let t = app();
    let (status, body) = send(&t.router, save_req(Some(KEY), &json!({"key": "k1", "data": "hello"}).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": true, "message": "Data Secured"}));

    let (status, body) = send(&t.router, fetch_req("/api/fetch/k1", Some(KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": true, "data": "hello"}));

    t.clock.advance(Duration::from_secs(601));
    let (status, body) = send(&t.router, fetch_req("/api/fetch/k1", Some(KEY))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"status": false, "message": "Data Expired or Not Found"}));
}

#[tokio::test]
async fn resave_restarts_expiry() {
    let t = app();
    send(&t.router, save_req(Some(KEY), r#"{"key":"k","data":"v1"}"#)).await;
    t.clock.advance(Duration::from_secs(500));
    send(&t.router, save_req(Some(KEY), r#"{"key":"k","data":"v2"}"#)).await;
    t.clock.advance(Duration::from_secs(500));

    let (status, body) = send(&t.router, fetch_req("/api/fetch/k", Some(KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "v2");
    assert_eq!(t.records.len().await, 1);
}

#[tokio::test]
async fn missing_fields_or_bad_json_is_bad_request() {
    let t = app();
    let expected = json!({"status": false, "message": "Key and Data required"});
    for body in [r#"{"key":"k"}"#, r#"{"data":"d"}"#, r#"{"key":"","data":"d"}"#, "not json", ""] {
        let (status, resp) = send(&t.router, save_req(Some(KEY), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(resp, expected);
    }
    assert!(t.records.is_empty().await);
}

#[tokio::test]
async fn nul_in_payload_is_bad_request() {
    let t = app();
    let (status, body) = send(&t.router, save_req(Some(KEY), &json!({"key": "k", "data": "a\u{0}b"}).to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
    assert!(t.records.is_empty().await);
}

#[tokio::test]
async fn non_string_data_is_bad_request() {
    let t = app();
    let (status, body) = send(&t.router, save_req(Some(KEY), r#"{"key":"k","data":123}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": false, "message": "Key and Data required"}));
}

#[tokio::test]
async fn long_key_round_trips() {
    let t = app();
    let key = "k".repeat(600);
    let (status, _) = send(&t.router, save_req(Some(KEY), &json!({"key": key, "data": "v"}).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&t.router, fetch_req(&format!("/api/fetch/{key}"), Some(KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "v");
}

#[tokio::test]
async fn denied_requests_have_no_side_effects() {
    let t = app();
    let denied = json!({"status": false, "message": "Access Denied"});

    let (status, body) = send(&t.router, save_req(None, r#"{"key":"k","data":"d"}"#)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, denied);

    let (status, _) = send(&t.router, save_req(Some("wrong"), r#"{"key":"k","data":"d"}"#)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&t.router, fetch_req("/api/stats?apikey=wrong", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert!(t.records.is_empty().await);
    let snapshot = t.stats.buffer().snapshot();
    assert_eq!((snapshot.get, snapshot.post), (0, 0));
}

#[tokio::test]
async fn query_param_key_is_accepted() {
    let t = app();
    send(&t.router, save_req(Some(KEY), r#"{"key":"q","data":"via query"}"#)).await;
    let (status, body) = send(&t.router, fetch_req(&format!("/api/fetch/q?apikey={KEY}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "via query");
}

#[tokio::test]
async fn tracked_requests_flush_into_today_total() {
    let t = app();
    send(&t.router, fetch_req("/api/fetch/none", Some(KEY))).await;
    send(&t.router, fetch_req("/api/fetch/none", Some(KEY))).await;
    send(&t.router, save_req(Some(KEY), r#"{"key":"k","data":"d"}"#)).await;
    // public routes are not counted
    send(&t.router, fetch_req("/health", None)).await;

    t.stats.flush().await.unwrap();
    let stats = t.stats.formatted_stats().await.unwrap();
    assert_eq!(stats.today.total, 3);
    assert_eq!((stats.today.get, stats.today.post), (2, 1));
    assert_eq!(stats.today.date, "2024-03-01");
    assert_eq!(stats.all_time.total, 3);
}

#[tokio::test]
async fn stats_endpoint_reports_live_counts() {
    let t = app();
    send(&t.router, save_req(Some(KEY), r#"{"key":"k","data":"d"}"#)).await;

    // this GET is counted before the handler reads the buffer
    let (status, body) = send(&t.router, fetch_req("/api/stats", Some(KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["stats"]["today"]["get"], 1);
    assert_eq!(body["stats"]["today"]["post"], 1);
    assert_eq!(body["stats"]["today"]["total"], 2);
    // nothing flushed yet: lifetime counts equal the live buffer
    assert_eq!(body["stats"]["allTime"]["total"], 2);
}

#[tokio::test]
async fn public_routes_need_no_key() {
    let t = app();
    let (status, body) = send(&t.router, fetch_req("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let res = t.router.clone().oneshot(fetch_req("/", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8_lossy(&bytes);
    assert!(html.contains("tempstore is running"));
    assert!(html.contains("2024-03-01"));

    let res = t.router.clone().oneshot(fetch_req("/metrics", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

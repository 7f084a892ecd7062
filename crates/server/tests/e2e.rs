use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use server::state::AppState;
use service::clock::SystemClock;
use service::storage::Storage;

const API_KEY: &str = "e2e-secret";

struct TestApp {
    base_url: String,
}

/// Serve the full router over a real socket. Uses Postgres when `DATABASE_URL` is set,
/// otherwise the in-process backend.
async fn start_server() -> anyhow::Result<TestApp> {
    let mut cfg = configs::AppConfig::default();
    cfg.auth.api_key = API_KEY.into();
    cfg.database.url = match std::env::var("DATABASE_URL") {
        Ok(url) if std::env::var("SKIP_DB_TESTS").is_err() => url,
        _ => "memory://".into(),
    };

    let storage = match Storage::connect(&cfg.database).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("database unavailable ({e}); falling back to memory://");
            Storage::in_memory()
        }
    };
    let state = AppState::new(storage, Arc::new(SystemClock), &cfg);

    let app: Router = routes::build_router(state, CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().build().expect("reqwest client")
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_save_and_fetch() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let key = format!("e2e-{}", Uuid::new_v4());

    let res = c
        .post(format!("{}/api/save", app.base_url))
        .header("x-api-key", API_KEY)
        .json(&json!({"key": key, "data": "payload"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Data Secured");

    let res = c
        .get(format!("{}/api/fetch/{}?apikey={}", app.base_url, key, API_KEY))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"], "payload");

    let res = c
        .get(format!("{}/api/fetch/{}-missing", app.base_url, key))
        .header("x-api-key", API_KEY)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_rejects_missing_key() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/api/save", app.base_url))
        .json(&json!({"key": "k", "data": "d"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"status": false, "message": "Access Denied"}));
    Ok(())
}

#[tokio::test]
async fn e2e_stats_shape() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .get(format!("{}/api/stats", app.base_url))
        .header("x-api-key", API_KEY)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], true);
    assert!(body["stats"]["allTime"]["total"].is_u64());
    assert!(body["stats"]["today"]["date"].is_string());
    Ok(())
}

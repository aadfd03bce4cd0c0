#![allow(dead_code)]

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use invport_common::types::{CreateUserRequest, Role};
use invport_server::app;
use invport_server::config::ServerConfig;
use invport_server::state::AppState;
use invport_storage::auth::hash_password;
use invport_storage::InventoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub struct TestContext {
    pub temp_dir: TempDir,
    pub state: AppState,
    pub app: axum::Router,
}

pub async fn build_test_context() -> Result<TestContext> {
    invport_common::id::init(1, 1);

    let temp_dir = tempfile::tempdir()?;
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("invport.db").display()
    );
    let store = Arc::new(InventoryStore::connect(&db_url).await?);

    let password_hash = hash_password("changeme")?;
    store
        .create_user(
            &CreateUserRequest {
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
                password: String::new(),
                role: Some(Role::Admin),
            },
            &password_hash,
        )
        .await?;
    store
        .create_user(
            &CreateUserRequest {
                username: "trainee".to_string(),
                email: "trainee@example.com".to_string(),
                password: String::new(),
                role: Some(Role::Ojt),
            },
            &password_hash,
        )
        .await?;

    let config = ServerConfig::default();

    let state = AppState {
        store,
        start_time: Utc::now(),
        jwt_secret: Arc::new("test-secret".to_string()),
        token_expire_secs: 3600,
        config: Arc::new(config),
    };

    let app = app::build_http_app(state.clone());

    Ok(TestContext {
        temp_dir,
        state,
        app,
    })
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder = builder.header("Content-Type", "application/json");

    let req_body = body.unwrap_or(Value::Null).to_string();
    let req = builder
        .body(Body::from(req_body))
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json)
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let req = builder.body(Body::empty()).expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json)
}

/// Raw-byte variant for the CSV/PDF export endpoints.
pub async fn request_bytes(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, String, Vec<u8>) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let req = builder.body(Body::empty()).expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    (status, content_type, bytes.to_vec())
}

pub async fn login_as(app: &axum::Router, username: &str, password: &str) -> String {
    let (status, body) = request_json(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    body["data"]["token"]
        .as_str()
        .expect("token should exist")
        .to_string()
}

pub async fn login_admin(app: &axum::Router) -> String {
    login_as(app, "admin", "changeme").await
}

pub async fn login_ojt(app: &axum::Router) -> String {
    login_as(app, "trainee", "changeme").await
}

pub fn assert_ok_envelope(json: &Value) {
    assert_eq!(json["success"], true);
}

pub fn assert_err_envelope(json: &Value) {
    assert_eq!(json["success"], false);
    assert!(json["message"].is_string());
}

/// Minimal valid create-item body; override fields per test.
pub fn item_body(name: &str) -> Value {
    json!({
        "building": "Main",
        "floor": "1",
        "room": "101",
        "name": name,
    })
}

pub async fn create_item(app: &axum::Router, token: &str, body: Value) -> Value {
    let (status, resp) = request_json(app, "POST", "/api/inventory", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create item failed: {resp}");
    assert_ok_envelope(&resp);
    resp["data"]["item"].clone()
}

//! HTTP-level integration tests for the operator setup endpoints:
//! token gating, the migration coordinator's single-run guarantee, and
//! one-shot admin bootstrap.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use common::{body_json, build_app, build_test_app, test_state, TEST_SETUP_TOKEN};
use sqlx::PgPool;
use tower::ServiceExt;

/// Send a request with an optional `X-Setup-Token` header.
async fn send_setup(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-setup-token", token);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

fn bootstrap_body() -> serde_json::Value {
    serde_json::json!({
        "email": "root@parc.test",
        "password": "bootstrap-password-123",
        "first_name": "Root",
        "last_name": "Operator",
    })
}

// ---------------------------------------------------------------------------
// Token gating
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_setup_token_is_forbidden(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = send_setup(app, Method::POST, "/api/admin/migrate", None, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "SETUP_TOKEN_INVALID");

    let app = build_test_app(pool);
    let response = send_setup(
        app,
        Method::POST,
        "/api/admin/migrate",
        Some("wrong-token"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_setup_disabled_without_configured_token(pool: PgPool) {
    // A server with no SETUP_TOKEN refuses even a correct header.
    let mut state = test_state(pool);
    let mut config = (*state.config).clone();
    config.setup_token = None;
    state.config = std::sync::Arc::new(config);

    let app = build_app(state);
    let response = send_setup(
        app,
        Method::POST,
        "/api/admin/migrate",
        Some(TEST_SETUP_TOKEN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "SETUP_DISABLED");
}

// ---------------------------------------------------------------------------
// Migration coordinator
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_status_starts_idle(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send_setup(
        app,
        Method::GET,
        "/api/admin/migrate/status",
        Some(TEST_SETUP_TOKEN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["state"], "idle");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_trigger_while_running_conflicts(pool: PgPool) {
    let state = test_state(pool);
    // Simulate a run already in flight.
    state.migrations.try_begin().unwrap();

    let app = build_app(state);
    let response = send_setup(
        app,
        Method::POST,
        "/api/admin/migrate",
        Some(TEST_SETUP_TOKEN),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "MIGRATION_RUNNING");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_trigger_runs_to_completion(pool: PgPool) {
    let state = test_state(pool);

    let app = build_app(state.clone());
    let response = send_setup(
        app,
        Method::POST,
        "/api/admin/migrate",
        Some(TEST_SETUP_TOKEN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["status"], "running");

    // The test database is already migrated, so the run is a fast no-op;
    // poll the status endpoint until it settles.
    let mut settled = false;
    for _ in 0..50 {
        let app = build_app(state.clone());
        let response = send_setup(
            app,
            Method::GET,
            "/api/admin/migrate/status",
            Some(TEST_SETUP_TOKEN),
            None,
        )
        .await;
        let json = body_json(response).await;
        if json["state"] == "completed" {
            settled = true;
            break;
        }
        assert_ne!(json["state"], "failed", "no-op migration must not fail");
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(settled, "migration run should reach the completed state");
}

// ---------------------------------------------------------------------------
// Admin bootstrap
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bootstrap_creates_admin_once(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = send_setup(
        app,
        Method::POST,
        "/api/admin/bootstrap",
        Some(TEST_SETUP_TOKEN),
        Some(bootstrap_body()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["role"], "admin");

    // Replay refuses once an admin exists.
    let app = build_test_app(pool);
    let response = send_setup(
        app,
        Method::POST,
        "/api/admin/bootstrap",
        Some(TEST_SETUP_TOKEN),
        Some(bootstrap_body()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "ADMIN_EXISTS");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bootstrap_requires_token(pool: PgPool) {
    let app = build_test_app(pool);
    let response = send_setup(
        app,
        Method::POST,
        "/api/admin/bootstrap",
        None,
        Some(bootstrap_body()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{build_app, get_request, get_request_with_host, json_request, load_config, read_json};

const TEST_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
auth:
  sign_in_timeout_in_ms: 3000
  restore_timeout_in_ms: 3000
  profile_timeout_in_ms: 3000
providers:
  - name: "Plain provider"
    type: "plain"
    users:
      - id: u1
        email: bo@plant.example
        password: workshop
      - id: m1
        email: admin@plant.example
        password: masterkey
profiles:
  type: "plain"
  name: "Inline profiles"
  masters:
    - m1
  assignments:
    u1:
      - dashboard
preview:
  hosts:
    - preview.plant.example
store:
  enabled: true
  type: memory
jwt:
  iss: sessiongate-test
  exp: 3600
  secret: test-secret
bind_address: 127.0.0.1:8081
"#;

async fn sign_in(app: &common::TestApp, email: &str, password: &str) {
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "/session/sign-in",
            Method::POST,
            json!({"email": email, "password": password}),
        ))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
}

async fn decision_for(app: &common::TestApp, path: &str) -> serde_json::Value {
    let response = app
        .router
        .clone()
        .oneshot(get_request(&format!("/gate/decision?path={}", path)))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await
}

/// Scenario A: anonymous visitor heading to a protected page sees the
/// loading state until the session resolves, then is sent to login.
#[tokio::test]
async fn integration_anonymous_navigation_waits_then_redirects() {
    let app = build_app(load_config(TEST_CONFIG)).await;

    // The store has not settled yet.
    let decision = decision_for(&app, "/inventory").await;
    assert_eq!(decision["action"], "loading");

    app.sessions.initialize().await;

    let decision = decision_for(&app, "/inventory").await;
    assert_eq!(decision["action"], "redirect");
    assert_eq!(decision["target"], "/auth");
    assert_eq!(decision["replace"], true);
    assert!(decision.get("notice").is_none());
}

/// Scenario B: the always-allowed set covers account pages even when the
/// assignment only lists the dashboard.
#[tokio::test]
async fn integration_always_allowed_page_renders() {
    let app = build_app(load_config(TEST_CONFIG)).await;
    app.sessions.initialize().await;
    sign_in(&app, "bo@plant.example", "workshop").await;

    let decision = decision_for(&app, "/settings").await;
    assert_eq!(decision["action"], "render");
}

/// Scenario C: a page outside the allow-list is denied with a notice and a
/// history-replacing redirect to the dashboard.
#[tokio::test]
async fn integration_denied_page_redirects_with_notice() {
    let app = build_app(load_config(TEST_CONFIG)).await;
    app.sessions.initialize().await;
    sign_in(&app, "bo@plant.example", "workshop").await;

    let decision = decision_for(&app, "/production").await;
    assert_eq!(decision["action"], "redirect");
    assert_eq!(decision["target"], "/dashboard");
    assert_eq!(decision["replace"], true);
    assert!(decision["notice"].as_str().is_some());
}

/// Scenario D: a master identity renders every page, including admin.
#[tokio::test]
async fn integration_master_renders_admin() {
    let app = build_app(load_config(TEST_CONFIG)).await;
    app.sessions.initialize().await;
    sign_in(&app, "admin@plant.example", "masterkey").await;

    let decision = decision_for(&app, "/admin").await;
    assert_eq!(decision["action"], "render");
}

/// Scenario E: a request from the preview host renders immediately, with
/// no loading flash, even though the session has not resolved.
#[tokio::test]
async fn integration_preview_host_bypasses_gate() {
    let app = build_app(load_config(TEST_CONFIG)).await;

    let response = app
        .router
        .clone()
        .oneshot(get_request_with_host(
            "/gate/decision?path=/reports",
            "preview.plant.example",
        ))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
    let decision = read_json(response).await;
    assert_eq!(decision["action"], "render");

    // The same navigation from a production host is still gated.
    let decision = decision_for(&app, "/reports").await;
    assert_eq!(decision["action"], "loading");
}

/// Public routes render for everyone, gate or no gate.
#[tokio::test]
async fn integration_public_routes_render() {
    let app = build_app(load_config(TEST_CONFIG)).await;
    app.sessions.initialize().await;

    for path in ["/", "/auth", "/terms", "/privacy", "/refund"] {
        let decision = decision_for(&app, path).await;
        assert_eq!(decision["action"], "render", "path {} should render", path);
    }
}

/// The page catalog lists the closed page set for the admin UI.
#[tokio::test]
async fn integration_page_catalog() {
    let app = build_app(load_config(TEST_CONFIG)).await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/pages"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let pages = body["pages"].as_array().expect("pages should be an array");
    assert!(pages
        .iter()
        .any(|p| p["id"] == "inventory" && p["path"] == "/inventory"));
}

/// The provider list is sanitized down to names and types.
#[tokio::test]
async fn integration_provider_list_is_sanitized() {
    let app = build_app(load_config(TEST_CONFIG)).await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/providers"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let providers = body["providers"]
        .as_array()
        .expect("providers should be an array");
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0]["type"], "plain");
    assert!(providers[0].get("users").is_none());
}

/// Health endpoint answers without touching the gate.
#[tokio::test]
async fn integration_health_check() {
    let app = build_app(load_config(TEST_CONFIG)).await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/health"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
}

/// Gate decisions are counted in the metrics exposition.
#[tokio::test]
async fn integration_metrics_count_decisions() {
    let app = build_app(load_config(TEST_CONFIG)).await;
    app.sessions.initialize().await;

    decision_for(&app, "/inventory").await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/metrics"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let text = String::from_utf8(bytes.to_vec()).expect("metrics should be UTF-8");
    assert!(text.contains("gate_decisions_total"));
}

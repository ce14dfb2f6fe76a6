use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use figment::providers::{Format, Yaml};
use figment::Figment;
use serde_json::Value;

use sessiongate::config::{Config, ConfigV1};
use sessiongate::gate::{Gate, PreviewMode};
use sessiongate::metrics::Metrics;
use sessiongate::policy::{create_profile_source, AccessPolicy};
use sessiongate::routes::create_router;
use sessiongate::session::{create_session_backend, SessionStore};
use sessiongate::state::AppState;

/// A built application plus handles to the pieces tests poke at directly.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<ConfigV1>,
    pub sessions: Arc<SessionStore>,
}

pub fn load_config(yaml: &str) -> ConfigV1 {
    let config: Config = Figment::new()
        .merge(Yaml::string(yaml))
        .extract()
        .expect("Failed to parse test config YAML");

    match config {
        Config::ConfigV1(cfg) => cfg,
    }
}

/// Builds the router the same way `startup::run` does, but leaves session
/// restoration to the caller so tests control when the store settles.
pub async fn build_app(config: ConfigV1) -> TestApp {
    let config = Arc::new(config);
    let backend = create_session_backend(&config.store).await;
    let sessions = Arc::new(SessionStore::new(
        &config.providers,
        backend,
        config.auth.clone(),
        config.jwt.clone(),
    ));

    let source = create_profile_source(&config.profiles).await;
    let policy = Arc::new(AccessPolicy::new(
        source,
        config.auth.profile_timeout_in_ms,
    ));

    let gate = Arc::new(Gate::new(
        sessions.clone(),
        policy.clone(),
        PreviewMode::from_config(&config.preview),
    ));

    let state = AppState {
        config: config.clone(),
        sessions: sessions.clone(),
        policy,
        gate,
        metrics: Metrics::new(),
    };

    TestApp {
        router: create_router(state),
        config,
        sessions,
    }
}

pub fn json_request(path: &str, method: Method, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn get_request(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn get_request_with_host(path: &str, host: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("host", host)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

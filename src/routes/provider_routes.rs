//! Provider information endpoint handlers.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::debug;

use crate::state::AppState;

/// Registers provider routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/providers", get(list_providers))
}

/// GET /providers endpoint: returns only the provider "name" and "type"
/// fields by converting each provider config into JSON and extracting the
/// fields. Secrets and account lists never leave the config.
async fn list_providers(State(state): State<AppState>) -> Json<Value> {
    let providers: Vec<Value> = state
        .config
        .providers
        .iter()
        .map(|provider| {
            let provider_json =
                serde_json::to_value(provider).expect("Failed to serialize provider config");
            if let Value::Object(mut map) = provider_json {
                let name = map.remove("name").unwrap_or_default();
                let provider_type = map.remove("type").unwrap_or_default();
                json!({
                    "name": name,
                    "type": provider_type,
                })
            } else {
                debug!("Provider configuration was not an object: {:?}", provider);
                json!({})
            }
        })
        .collect();

    Json(json!({ "providers": providers }))
}

//! Page catalog endpoint handlers.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::models::Page;
use crate::state::AppState;

/// Registers page catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/pages", get(list_pages))
}

/// GET /pages endpoint: the closed set of known pages with their ids and
/// paths. The admin assignment UI builds its picker from this list, so the
/// gate and the assignments can never disagree on spelling.
async fn list_pages() -> Json<Value> {
    let pages: Vec<Value> = Page::all()
        .iter()
        .map(|page| {
            json!({
                "id": page.id(),
                "path": page.as_path(),
            })
        })
        .collect();

    Json(json!({ "pages": pages }))
}

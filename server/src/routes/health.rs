//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use stow_engine::{StoreStats, WriteMode};

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub write_mode: WriteMode,
    pub collections: BTreeMap<&'static str, StoreStats>,
}

/// Create health routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let collections = BTreeMap::from([
        ("cart", state.cart.stats().await),
        ("notes", state.notes.stats().await),
        ("todos", state.todos.stats().await),
    ]);

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        write_mode: state.todos.write_mode(),
        collections,
    })
}

/// Root handler.
async fn root() -> &'static str {
    "Stow Server"
}

//! HTTP route definitions.

mod health;
mod resource;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/todos", resource::routes(state.todos.clone()))
        .nest("/notes", resource::routes(state.notes.clone()))
        .nest("/cart", resource::routes(state.cart.clone()))
}

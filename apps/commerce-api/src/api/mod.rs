//! HTTP API routes.

pub mod admin;
pub mod chat;

use axum::Router;

use crate::state::AppState;

/// All API routes, nested under `/api` by the server layer.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .nest("/chat", chat::router(state.clone()))
        .nest("/admin", admin::router(state))
}

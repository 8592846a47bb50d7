//! Admin endpoints.

use axum::{extract::State, routing::post, Json, Router};
use axum_helpers::{errors::responses::InternalServerErrorResponse, AppError};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::bootstrap::build_engine;
use crate::state::AppState;

/// OpenAPI documentation for the admin endpoints
#[derive(OpenApi)]
#[openapi(
    paths(reload),
    components(
        schemas(ReloadResponse),
        responses(InternalServerErrorResponse)
    ),
    tags(
        (name = "Admin", description = "Operational endpoints")
    )
)]
pub struct AdminApi;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/reload", post(reload))
        .with_state(state)
}

#[derive(Serialize, ToSchema)]
pub struct ReloadResponse {
    pub status: &'static str,
    /// Products in the catalog after reload.
    pub products: u64,
}

/// Rebuild the engine: reseed the catalog and refresh the vocabulary.
///
/// The new engine is swapped in atomically; requests already in flight
/// finish on the previous snapshot.
#[utoipa::path(
    post,
    path = "/reload",
    tag = "Admin",
    responses(
        (status = 200, description = "Engine rebuilt", body = ReloadResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let report = build_engine(&state.config, true)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Reload failed: {e}")))?;

    state.replace_engine(report.engine).await;
    tracing::info!(products = report.products, "Engine reloaded");

    Ok(Json(ReloadResponse {
        status: "reloaded",
        products: report.products,
    }))
}

//! Commerce API - chat-driven product discovery server

use std::time::Duration;

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod bootstrap;
mod config;
mod openapi;
mod seed;
mod state;
#[cfg(test)]
mod test_support;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to Qdrant at {}", config.qdrant.url);

    let report = bootstrap::build_engine(&config, false).await?;
    let state = AppState::new(report.engine, config);

    // Build REST router
    let api_routes = api::routes(state.clone());
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(state.config.app));

    info!(
        "Starting Commerce API on port {} with {} products",
        state.config.server.port, report.products
    );

    create_production_app(app, &state.config.server, Duration::from_secs(30), async {
        info!("Shutting down: no external connections to close");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Commerce API shutdown complete");
    Ok(())
}

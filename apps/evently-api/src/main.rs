use axum_helpers::{
    create_cors_layer, create_router,
    server::{create_production_app, health_router},
};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    if !config.mongodb.is_configured() {
        warn!("MONGODB_URI is not set; event storage is unavailable until it is");
    }
    if config.cloudinary.is_none() {
        warn!("Cloudinary credentials are not set; event creation will fail");
    }

    // MongoDB is connected on first use, not here
    let state = AppState::new(config);

    let api_routes = api::routes(&state);
    let site_routes = api::pages::router(&state)?;
    let cors = create_cors_layer(&state.config.cors_origins)?;

    let router = create_router::<openapi::ApiDoc>(api_routes, site_routes, cors, &state.config.server);

    // Merge health endpoints
    let app = router.merge(health_router(state.config.app.clone()));

    info!(
        base_url = %state.config.base_url,
        "Starting Evently with production-ready shutdown (30s timeout)"
    );

    let connector = state.connector.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!(
                connected = connector.is_connected(),
                "Shutting down: releasing MongoDB client"
            );
            // The driver closes its pool when the last handle drops
            drop(connector);
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Evently shutdown complete");
    Ok(())
}

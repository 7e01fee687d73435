use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod forecast;
mod refresh;
mod registry;
mod resolve;
mod routes;
mod store;

use config::Config;
use forecast::openmeteo::OpenMeteoClient;
use forecast::ForecastClient;
use routes::{create_router, AppState};
use store::CatalogStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_tracker_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let store = Arc::new(CatalogStore::new(&config.catalog_path));
    let forecast: Arc<dyn ForecastClient> = Arc::new(OpenMeteoClient::new(&config));

    // The first refresh cycle starts with the process; the loop re-arms
    // itself every refresh_interval_secs after that.
    refresh::spawn_refresh_task(
        Arc::clone(&store),
        Arc::clone(&forecast),
        Duration::from_secs(config.refresh_interval_secs),
    );

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        config: Arc::new(config),
        store,
        forecast,
    };

    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server starting on http://{bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

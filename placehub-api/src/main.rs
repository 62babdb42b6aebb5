//! # Placehub API Server
//!
//! REST backend for the Placehub application: user accounts with hashed
//! credentials, and user-submitted places with geocoded addresses and
//! uploaded images.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/placehub \
//! GEOCODER_API_KEY=... \
//! cargo run -p placehub-api
//! ```

use std::sync::Arc;

use placehub_api::app::{build_router, AppState};
use placehub_api::config::{Config, GeocoderProvider};
use placehub_api::geocode::{FixedGeocoder, Geocoder, GoogleGeocoder};
use placehub_shared::db::migrations::run_migrations;
use placehub_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "placehub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Placehub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    let geocoder: Arc<dyn Geocoder> = match config.geocoder.provider {
        GeocoderProvider::Google => Arc::new(GoogleGeocoder::new(
            config.geocoder.api_base.clone(),
            config.geocoder.api_key.clone(),
        )),
        GeocoderProvider::Fixed => Arc::new(FixedGeocoder::default()),
    };

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config, geocoder);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, exiting...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
}

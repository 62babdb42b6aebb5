/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use placehub_api::app::{build_router, AppState};
/// use placehub_api::config::Config;
/// use placehub_api::geocode::FixedGeocoder;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, Arc::new(FixedGeocoder::default()));
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3011").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::ApiError;
use crate::geocode::Geocoder;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Address-to-coordinates adapter
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            geocoder,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// └── /api/
///     ├── /places/
///     │   ├── GET    /:id        # Fetch one place
///     │   ├── GET    /user/:id   # Fetch a user's places
///     │   ├── POST   /           # Create place (multipart with image)
///     │   ├── PATCH  /:id        # Update title/description
///     │   └── DELETE /:id        # Delete place
///     └── /users/
///         ├── GET    /           # List users (no password hashes)
///         ├── POST   /signup     # Register (multipart with image)
///         └── POST   /login      # Verify credentials
/// ```
///
/// Unknown routes fall through to a JSON 404. Request bodies are capped at
/// the image size limit; every route is traced.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let places_routes = Router::new()
        .route("/", post(routes::places::create_place))
        .route(
            "/:id",
            get(routes::places::get_place)
                .patch(routes::places::update_place)
                .delete(routes::places::delete_place),
        )
        .route("/user/:id", get(routes::places::get_places_by_user));

    let users_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/signup", post(routes::users::signup))
        .route("/login", post(routes::users::login));

    let cors = build_cors_layer(&state.config);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/places", places_routes)
        .nest("/api/users", users_routes)
        .fallback(unknown_route)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(crate::upload::MAX_IMAGE_BYTES))
        .with_state(state)
}

/// Configures CORS from the origin list
///
/// `*` anywhere in the list means permissive (development); otherwise the
/// listed origins are allowed with the methods the API actually serves.
fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    }
}

/// Fallback for unknown routes
async fn unknown_route() -> ApiError {
    ApiError::NotFound("Could not find this route.".to_string())
}

/// Common test utilities for API tests
///
/// Builds the full router against either a lazily-connected pool (for
/// request paths that never reach the database) or a real database from
/// `DATABASE_URL` (for the end-to-end tests, which are `#[ignore]`d so
/// they only run where Postgres is available).

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use placehub_api::app::{build_router, AppState};
use placehub_api::config::{
    ApiConfig, Config, DatabaseConfig, GeocoderConfig, GeocoderProvider, UploadConfig,
};
use placehub_api::geocode::FixedGeocoder;
use sqlx::PgPool;
use uuid::Uuid;

/// Multipart boundary used by every test request
pub const BOUNDARY: &str = "placehub-test-boundary";

/// Test context holding the router under test
pub struct TestContext {
    pub app: axum::Router,
    pub db: PgPool,
    pub upload_dir: PathBuf,
}

fn test_config(database_url: &str, upload_dir: PathBuf) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        geocoder: GeocoderConfig {
            provider: GeocoderProvider::Fixed,
            api_base: String::new(),
            api_key: String::new(),
        },
        uploads: UploadConfig { dir: upload_dir },
    }
}

fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("placehub-test-{}", Uuid::new_v4()))
}

impl TestContext {
    /// Context with no reachable database
    ///
    /// The pool is created lazily and never connects; only request paths
    /// that fail before touching the database can be exercised.
    pub fn new() -> Self {
        let upload_dir = temp_upload_dir();
        let config = test_config("postgresql://127.0.0.1:1/placehub_unreachable", upload_dir.clone());

        let db = PgPool::connect_lazy(&config.database.url).expect("lazy pool should parse URL");
        let state = AppState::new(db.clone(), config, Arc::new(FixedGeocoder::default()));

        TestContext {
            app: build_router(state),
            db,
            upload_dir,
        }
    }

    /// Context backed by the database from `DATABASE_URL`
    ///
    /// Runs migrations before handing the router back.
    pub async fn with_database() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL is required for database-backed tests"))?;

        let upload_dir = temp_upload_dir();
        let config = test_config(&database_url, upload_dir.clone());

        let db = PgPool::connect(&database_url).await?;
        placehub_shared::db::migrations::run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config, Arc::new(FixedGeocoder::default()));

        Ok(TestContext {
            app: build_router(state),
            db,
            upload_dir,
        })
    }

    /// Deletes a test user; owned places cascade
    pub async fn delete_user(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Builds a multipart request with text fields and an optional image part
pub fn multipart_request(
    uri: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"test.png\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Builds a JSON request
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a bodyless request
pub fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("response body was not JSON: {}", e))
}

/// A fresh email per test run so database-backed tests can re-run safely
pub fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}

/// Fake PNG payload; image contents are never inspected, only stored
pub fn png_bytes() -> &'static [u8] {
    b"\x89PNG\r\n\x1a\nfake-image-bytes"
}

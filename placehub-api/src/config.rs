/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 3011)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `GEOCODER_PROVIDER`: `google` or `fixed` (default: google)
/// - `GEOCODER_API_BASE`: Geocoding endpoint base URL
///   (default: https://maps.googleapis.com)
/// - `GEOCODER_API_KEY`: API key (required when the provider is `google`)
/// - `UPLOAD_DIR`: Directory for stored images (default: uploads/images)
/// - `RUST_LOG`: Log level filter (default: info)
///
/// # Example
///
/// ```no_run
/// use placehub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::path::PathBuf;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Geocoder configuration
    pub geocoder: GeocoderConfig,

    /// Image upload configuration
    pub uploads: UploadConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` means permissive (development)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Which geocoding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocoderProvider {
    /// Google geocoding API over HTTP
    Google,

    /// Deterministic stand-in, no network; for development and tests
    Fixed,
}

/// Geocoder configuration
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Selected backend
    pub provider: GeocoderProvider,

    /// Base URL of the geocoding endpoint
    pub api_base: String,

    /// API key; empty for the fixed provider
    pub api_key: String,
}

/// Image upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory where uploaded images are stored
    pub dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "3011".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let provider = match env::var("GEOCODER_PROVIDER")
            .unwrap_or_else(|_| "google".to_string())
            .as_str()
        {
            "google" => GeocoderProvider::Google,
            "fixed" => GeocoderProvider::Fixed,
            other => anyhow::bail!("Unknown GEOCODER_PROVIDER: {}", other),
        };

        let api_base = env::var("GEOCODER_API_BASE")
            .unwrap_or_else(|_| "https://maps.googleapis.com".to_string());

        let api_key = match provider {
            GeocoderProvider::Google => env::var("GEOCODER_API_KEY").map_err(|_| {
                anyhow::anyhow!("GEOCODER_API_KEY is required when GEOCODER_PROVIDER=google")
            })?,
            GeocoderProvider::Fixed => String::new(),
        };

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads/images".to_string());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            geocoder: GeocoderConfig {
                provider,
                api_base,
                api_key,
            },
            uploads: UploadConfig {
                dir: PathBuf::from(upload_dir),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

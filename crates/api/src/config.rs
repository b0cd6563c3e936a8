//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, with defaults
//! for everything except the database connection string.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `GENERATION_TIMEOUT_SECONDS`: Budget for one generation run (default: 120)
//! - `PUBLISH_RETRIES`: Retries after a publish loses to a concurrent one (default: 3)

use eyre::{Result, WrapErr};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;
use unitime_core::EngineOptions;

/// Configuration for the timetable API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    pub database_max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Generation runs get their own, longer budget in seconds.
    pub generation_timeout: u64,

    pub publish_retries: u32,
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// Fails if `DATABASE_URL` is not set or `API_PORT` is not a valid port.
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 5);

        // Logging settings
        let log_level = match env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = parse_or("API_REQUEST_TIMEOUT_SECONDS", 30);
        let generation_timeout = parse_or("GENERATION_TIMEOUT_SECONDS", 120);
        let publish_retries = parse_or("PUBLISH_RETRIES", 3);

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
            generation_timeout,
            publish_retries,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            publish_retries: self.publish_retries,
        }
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout)
    }

    /// The layer-level timeout never cuts a generation run short.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(self.generation_timeout + 5))
    }
}

use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub http: HttpClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Public base URL of the host; return, cancel and success routes hang off it
    pub url: String,
}

/// Outbound provider HTTP settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpClientConfig {
    pub timeout_secs: u64,
    /// Retries when the provider could not be reached at all
    pub max_retries: u32,
}

impl HttpClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                url: env::var("APP_URL")
                    .map_err(|_| AppError::Configuration("APP_URL not set".to_string()))?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            http: HttpClientConfig {
                timeout_secs: env::var("GATEWAY_HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid GATEWAY_HTTP_TIMEOUT_SECS".to_string())
                    })?,
                max_retries: env::var("GATEWAY_HTTP_MAX_RETRIES")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid GATEWAY_HTTP_MAX_RETRIES".to_string())
                    })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "Gateway HTTP timeout must be greater than 0".to_string(),
            ));
        }

        if !self.app.url.starts_with("http://") && !self.app.url.starts_with("https://") {
            return Err(AppError::Configuration(format!(
                "APP_URL must be an http(s) URL, got {}",
                self.app.url
            )));
        }

        Ok(())
    }
}

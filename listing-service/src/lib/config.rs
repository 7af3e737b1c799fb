use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for listing-service.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// Media host credentials. Uploads are refused while this is absent.
    #[serde(default)]
    pub media: Option<MediaConfig>,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// JWT authentication configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in hours. Tokens never expire when unset.
    #[serde(default)]
    pub expiration_hours: Option<i64>,
}

/// Cloudinary credentials for image uploads.
#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_media_api_url")]
    pub api_url: String,
}

const PLACEHOLDER_SECRET_PREFIX: &str = "change-me";

fn default_max_connections() -> u32 {
    5
}

fn default_media_api_url() -> String {
    "https://api.cloudinary.com".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// * `ConfigError` - A source failed to parse or a required key is missing
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".to_string()));
        }

        if self.jwt.secret.starts_with(PLACEHOLDER_SECRET_PREFIX) {
            return Err(ConfigError::Message(
                "jwt.secret is still a placeholder; set JWT__SECRET".to_string(),
            ));
        }

        if let Some(hours) = self.jwt.expiration_hours {
            if hours <= 0 {
                return Err(ConfigError::Message(format!(
                    "jwt.expiration_hours must be positive, got {}",
                    hours
                )));
            }
        }

        Ok(())
    }
}

//! Application configuration structs
//!
//! Sources, lowest precedence first: built-in defaults, the optional
//! `config/default.toml`, then `GAMER__*` environment variables
//! (`GAMER__DATABASE__URL`, `GAMER__SNOWFLAKE__WORKER_ID`, ...). A `.env`
//! file is loaded into the environment beforehand.

use config::{Config, ConfigBuilder, File, FileFormat};
use serde::Deserialize;
use std::env;

const ENV_PREFIX: &str = "GAMER";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_FILE: &str = "config/default";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub snowflake: SnowflakeConfig,
    pub telemetry: TelemetrySettings,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    pub level: String,
    pub json: bool,
}

impl AppConfig {
    /// Load configuration from `.env`, `config/default.toml`, and `GAMER__*` variables
    ///
    /// `DATABASE_URL` is honoured when `database.url` is not set through any
    /// other source.
    ///
    /// # Errors
    /// Returns an error if a source is malformed or `database.url` is missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let settings = defaults()?
            .add_source(File::with_name(DEFAULT_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        if config.database.url.is_empty() {
            if let Ok(url) = env::var("DATABASE_URL") {
                config.database.url = url;
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML document layered over the defaults
    ///
    /// # Errors
    /// Returns an error if the document is malformed or `database.url` is missing
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingVar("database.url"));
        }
        if self.snowflake.worker_id >= 1024 {
            return Err(ConfigError::InvalidValue(
                "snowflake.worker_id",
                self.snowflake.worker_id.to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::InvalidValue(
                "database.min_connections",
                self.database.min_connections.to_string(),
            ));
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("app.name", "gamer-communities")?
        .set_default("app.env", "development")?
        .set_default("database.max_connections", 20)?
        .set_default("database.min_connections", 5)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("snowflake.worker_id", 0)?
        .set_default("telemetry.level", "info")?
        .set_default("telemetry.json", false)?)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

//! Tracing and logging setup
//!
//! One global `tracing` subscriber per process. The filter is built from the
//! configured level plus a few fixed per-crate directives; `RUST_LOG` replaces
//! the whole filter when set.

use tracing::Subscriber;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use crate::config::{Environment, TelemetrySettings};

/// Dependencies that log every statement at `debug`/`info`
const NOISY_CRATES: &[&str] = &["sqlx=warn"];

/// Subscriber options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Base level for the gamer crates, e.g. "info"
    pub level: String,
    /// Newline-delimited JSON instead of the human format
    pub json: bool,
    /// Emit span open/close lines, useful to follow a service call
    pub span_events: bool,
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl TracingConfig {
    /// Preset per deployment environment
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: "debug".to_string(),
                json: false,
                span_events: true,
                file_line: true,
            },
            Environment::Staging => Self {
                level: "info".to_string(),
                json: true,
                span_events: false,
                file_line: true,
            },
            Environment::Production => Self {
                level: "info".to_string(),
                json: true,
                span_events: false,
                file_line: false,
            },
        }
    }

    /// Full filter directive string, e.g. `info,sqlx=warn`
    #[must_use]
    pub fn directives(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(NOISY_CRATES.iter().copied())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(self.directives())
            .map_err(|e| TracingError::InvalidFilter(format!("{}: {e}", self.level)))
    }
}

impl From<&TelemetrySettings> for TracingConfig {
    fn from(settings: &TelemetrySettings) -> Self {
        let base = if settings.json {
            Self::for_environment(Environment::Production)
        } else {
            Self::default()
        };
        Self {
            level: settings.level.to_lowercase(),
            json: settings.json,
            ..base
        }
    }
}

fn build_subscriber(config: &TracingConfig) -> Result<Box<dyn Subscriber + Send + Sync>, TracingError> {
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_target(true)
        .with_file(config.file_line)
        .with_line_number(config.file_line)
        .with_span_events(span_events);

    Ok(if config.json {
        Box::new(builder.json().flatten_event(true).finish())
    } else {
        Box::new(builder.finish())
    })
}

/// Install the global subscriber
///
/// # Panics
/// Panics if the filter is invalid or a global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) {
    if let Err(err) = try_init_tracing(config) {
        panic!("{err}");
    }
}

/// Install the global subscriber, reporting instead of panicking
pub fn try_init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    tracing::subscriber::set_global_default(build_subscriber(config)?)
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_presets() {
        let dev = TracingConfig::for_environment(Environment::Development);
        assert_eq!(dev.level, "debug");
        assert!(dev.span_events);

        let prod = TracingConfig::for_environment(Environment::Production);
        assert!(prod.json);
        assert!(!prod.file_line);

        assert_eq!(TracingConfig::default(), dev);
    }

    #[test]
    fn test_directives_quiet_sqlx() {
        let config = TracingConfig::for_environment(Environment::Production);
        assert_eq!(config.directives(), "info,sqlx=warn");
    }

    #[test]
    fn test_from_settings() {
        let config = TracingConfig::from(&TelemetrySettings {
            level: "DEBUG".to_string(),
            json: true,
        });
        assert_eq!(config.level, "debug");
        assert!(config.json);
        assert!(!config.file_line);
    }
}

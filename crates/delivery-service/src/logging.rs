//! Structured logging for the delivery service.
//!
//! Reads `LOG_FORMAT` (`json` by default, `text`/`pretty` for humans),
//! `RUST_LOG` (falls back to `info`) and `SERVICE_NAME`.
//!
//! ```no_run
//! use delivery_service::logging::{LoggingConfig, init_logging};
//!
//! init_logging(&LoggingConfig::from_env().with_service("delivery"));
//! ```

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used when neither `RUST_LOG` nor the config names one.
const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Text,
}

impl FromStr for LogFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            _ => Ok(LogFormat::Json),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or `delivery_lib=debug`.
    pub level: String,
    pub service: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: DEFAULT_LEVEL.to_string(),
            service: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            format: non_blank("LOG_FORMAT")
                .and_then(|value| value.parse().ok())
                .unwrap_or_default(),
            level: non_blank("RUST_LOG").unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
            service: non_blank("SERVICE_NAME"),
        }
    }

    /// Name the service unless `SERVICE_NAME` already did.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service.get_or_insert_with(|| service.into());
        self
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, in which case the
/// existing one keeps running.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false).with_span_list(false))
            .try_init(),
    }
    .is_ok();

    if installed {
        tracing::info!(
            service = config.service.as_deref().unwrap_or(env!("CARGO_PKG_NAME")),
            format = ?config.format,
            "logging initialized"
        );
    }
    installed
}

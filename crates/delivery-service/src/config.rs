//! Service configuration read from the environment at startup.
//!
//! - `DELIVERY_DATABASE_PATH`: SQLite database file (default `delivery.db`)
//! - `SERVICE_PORT`: HTTP port (default 8080)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default SQLite database location, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "delivery.db";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Startup configuration handed to the store and the listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// An unparsable `SERVICE_PORT` falls back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_path = lookup("DELIVERY_DATABASE_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));
        let port = lookup("SERVICE_PORT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            database_path,
            port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn reads_database_path_and_port() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("DELIVERY_DATABASE_PATH", "/data/maps.db"),
            ("SERVICE_PORT", "9090"),
        ]));
        assert_eq!(config.database_path, PathBuf::from("/data/maps.db"));
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = ServiceConfig::from_lookup(lookup(&[("SERVICE_PORT", "eighty")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }
}

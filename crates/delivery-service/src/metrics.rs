//! Prometheus metrics for the delivery service.
//!
//! - [`MetricsConfig`]: configuration for the metrics system
//! - [`init_metrics`]: install the Prometheus recorder
//! - [`metrics_handler`]: axum handler for the `/metrics` endpoint
//! - Business metric helpers for maps and delivery estimates

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use delivery_lib::Error as LibError;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Path for the metrics endpoint (e.g., "/metrics").
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    /// - `METRICS_PATH`: path for the metrics endpoint (default: "/metrics")
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let path = std::env::var("METRICS_PATH").unwrap_or_else(|_| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Install the Prometheus recorder. Must be called once before recording.
///
/// # Errors
///
/// Fails when metrics are disabled, the recorder was already installed, or the
/// Prometheus builder cannot install itself.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the metrics endpoint, in Prometheus exposition format.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Increment `delivery_estimates_total`.
pub fn record_delivery_estimated(service: &str) {
    metrics::counter!(
        "delivery_estimates_total",
        "service" => service.to_string()
    )
    .increment(1);
}

/// Increment `delivery_estimates_failed_total`.
///
/// `reason` is a short label such as "map_not_found", "no_path", or
/// "validation_error"; see [`failure_reason`].
pub fn record_delivery_failed(reason: &str, service: &str) {
    metrics::counter!(
        "delivery_estimates_failed_total",
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record the number of routes travelled in the `delivery_path_legs` histogram.
pub fn record_path_legs(legs: usize) {
    metrics::histogram!("delivery_path_legs").record(legs as f64);
}

/// Increment `delivery_maps_created_total`.
pub fn record_map_created(service: &str) {
    metrics::counter!(
        "delivery_maps_created_total",
        "service" => service.to_string()
    )
    .increment(1);
}

/// Metric label for a library failure.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::MapNotFound { .. } => "map_not_found",
        LibError::UnknownLocation { .. } => "unknown_location",
        LibError::PathNotFound { .. } => "no_path",
        LibError::InvalidConfiguration { .. } | LibError::InvalidMap { .. } => "validation_error",
        LibError::DuplicateMap { .. } => "duplicate_map",
        _ => "internal_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_metrics_handler_without_recorder() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let output = rt.block_on(async { metrics_handler().await });
        assert!(output.contains('#') || output.is_empty());
    }

    #[test]
    fn test_disabled_metrics_refuse_to_initialize() {
        let config = MetricsConfig {
            enabled: false,
            path: "/metrics".to_string(),
        };
        assert!(matches!(init_metrics(&config), Err(MetricsError::Disabled)));
    }

    #[test]
    fn test_business_metrics_record_without_recorder() {
        record_delivery_estimated("delivery");
        record_delivery_failed("no_path", "delivery");
        record_path_legs(2);
        record_map_created("delivery");
    }

    #[test]
    fn test_failure_reasons() {
        let error = LibError::PathNotFound {
            origin: "A".to_string(),
            destination: "B".to_string(),
        };
        assert_eq!(failure_reason(&error), "no_path");

        let error = LibError::InvalidConfiguration {
            message: "autonomy".to_string(),
        };
        assert_eq!(failure_reason(&error), "validation_error");

        let error = LibError::MapNotFound {
            name: "Mapa RJ".to_string(),
        };
        assert_eq!(failure_reason(&error), "map_not_found");
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert!(MetricsError::InstallFailed("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}

//! Delivery map HTTP service.
//!
//! # Endpoints
//!
//! - `POST /maps` - Store a map and its routes
//! - `GET /maps` - List stored maps
//! - `POST /maps/estimate_delivery` - Cheapest path and fuel cost between two locations
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! # Configuration
//!
//! - `DELIVERY_DATABASE_PATH` - SQLite database file (default: delivery.db)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - json (default) or text
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint toggle and path

use std::net::SocketAddr;

use tracing::{error, info};

use delivery_service::{
    init_logging, init_metrics, router, AppState, LoggingConfig, MetricsConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("delivery");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if metrics_config.enabled {
        if let Err(e) = init_metrics(&metrics_config) {
            tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
        }
    }

    let config = ServiceConfig::from_env();
    info!(
        database = %config.database_path.display(),
        port = config.port,
        "starting delivery service"
    );

    let state = AppState::open(&config.database_path).map_err(|e| {
        error!(error = %e, "failed to open map store");
        e
    })?;

    let app = router(state, &metrics_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

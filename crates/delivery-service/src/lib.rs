//! HTTP service for delivery maps and economical route estimates.
//!
//! - [`AppState`]: shared map repository handle
//! - [`router`]: the full axum application (`/maps`, health probes, metrics)
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ServiceResponse`]: successful JSON responses with status and `Location`
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: structured JSON logging setup
//! - [`middleware`]: request tracking and metrics middleware
//!
//! # Architecture
//!
//! Handlers stay thin: all routing and pricing logic lives in `delivery-lib`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate parameters                                      │
//! │  - Call delivery-lib APIs on a blocking thread              │
//! │  - Format response                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![deny(warnings)]

pub mod config;
mod handlers;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ServiceConfig;
pub use handlers::{create_map, estimate_delivery, list_maps, router};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_delivery_estimated, record_delivery_failed,
    record_map_created, record_path_legs, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_MAP_NOT_FOUND, PROBLEM_PATH_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE,
    PROBLEM_UNKNOWN_LOCATION, PROBLEM_UNPROCESSABLE_MAP,
};
pub use request::{CreateMapRequest, EstimateDeliveryRequest, RouteInput, Validate};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError};

//! Liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" or "not_ready: <reason>".
    pub status: String,
    pub service: String,
    pub version: String,

    /// Number of stored maps (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps_stored: Option<usize>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            maps_stored: None,
        }
    }

    pub fn ready(service: &str, version: &str, maps: usize) -> Self {
        Self {
            maps_stored: Some(maps),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }
}

/// `GET /health/live`: 200 while the process is running.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// `GET /health/ready`: 200 when the map store answers a ping, 503 otherwise.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let repository = state.repository();
    let count = tokio::task::spawn_blocking(move || {
        repository.ping()?;
        repository.map_count()
    })
    .await;

    match count {
        Ok(Ok(maps)) => (StatusCode::OK, Json(HealthStatus::ready(service, version, maps)))
            .into_response(),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "map store not reachable");
            let status = HealthStatus::not_ready(service, version, "map store unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "readiness check panicked");
            let status = HealthStatus::not_ready(service, version, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use delivery_lib::{DeliveryMap, Error as LibError, MapRepository};

    /// Store whose backing storage never answers.
    struct OfflineStore;

    impl MapRepository for OfflineStore {
        fn find_map_by_name(&self, _name: &str) -> delivery_lib::Result<Option<DeliveryMap>> {
            Ok(None)
        }

        fn save_map_with_routes(&self, map: &DeliveryMap) -> delivery_lib::Result<DeliveryMap> {
            Ok(map.clone())
        }

        fn list_maps(&self) -> delivery_lib::Result<Vec<DeliveryMap>> {
            Ok(Vec::new())
        }

        fn ping(&self) -> delivery_lib::Result<()> {
            Err(LibError::Io(std::io::Error::other("database offline")))
        }
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_store() {
        let state = AppState::from_repository(Arc::new(OfflineStore));
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_ready_reports_map_count() {
        let state = crate::test_utils::test_state();
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_health_status_ready() {
        let status = HealthStatus::ready("delivery-service", "0.1.0", 3);
        assert_eq!(status.status, "ok");
        assert_eq!(status.maps_stored, Some(3));
    }

    #[test]
    fn test_health_status_not_ready() {
        let status = HealthStatus::not_ready("delivery-service", "0.1.0", "map store unreachable");
        assert!(status.status.starts_with("not_ready:"));
        assert!(status.maps_stored.is_none());
    }

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::alive("delivery-service", "0.1.0")).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(!json.contains("maps_stored"));
    }
}

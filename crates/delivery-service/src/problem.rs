//! RFC 9457 Problem Details for the delivery API.
//!
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use delivery_lib::Error as LibError;

/// Problem type URI for malformed or invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for a map name that matches nothing.
pub const PROBLEM_MAP_NOT_FOUND: &str = "/problems/map-not-found";

/// Problem type URI for an origin or destination absent from the map.
pub const PROBLEM_UNKNOWN_LOCATION: &str = "/problems/unknown-location";

/// Problem type URI for locations in disconnected parts of the map.
pub const PROBLEM_PATH_NOT_FOUND: &str = "/problems/path-not-found";

/// Problem type URI for maps that cannot be stored (invalid or duplicate).
pub const PROBLEM_UNPROCESSABLE_MAP: &str = "/problems/unprocessable-map";

pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for an unreachable map store.
pub const PROBLEM_SERVICE_UNAVAILABLE: &str = "/problems/service-unavailable";

/// RFC 9457 Problem Details response body.
///
/// ```
/// use delivery_service::{ProblemDetails, PROBLEM_MAP_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(PROBLEM_MAP_NOT_FOUND, "Map Not Found", StatusCode::NOT_FOUND)
///     .with_detail("map not found: Mapa RJ")
///     .with_request_id("req-12345");
/// assert_eq!(problem.status, 404);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_uri: String,

    pub title: String,

    pub status: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// The request ID of the failing call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 for unparseable bodies and non-positive fuel parameters.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn map_not_found(name: &str, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_MAP_NOT_FOUND, "Map Not Found", StatusCode::NOT_FOUND)
            .with_detail(format!("No map named '{}'", name))
            .with_request_id(request_id)
    }

    pub fn unknown_location(
        name: &str,
        suggestions: &[String],
        request_id: impl Into<String>,
    ) -> Self {
        let detail = if suggestions.is_empty() {
            format!("Location '{}' is not part of the map", name)
        } else {
            format!(
                "Location '{}' is not part of the map. Did you mean: {}?",
                name,
                suggestions.join(", ")
            )
        };

        Self::new(
            PROBLEM_UNKNOWN_LOCATION,
            "Unknown Location",
            StatusCode::NOT_FOUND,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn path_not_found(origin: &str, destination: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_PATH_NOT_FOUND,
            "Path Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!(
            "No path connects '{}' to '{}'",
            origin, destination
        ))
        .with_request_id(request_id)
    }

    /// 422 for maps that fail validation or collide with an existing name.
    pub fn unprocessable_map(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UNPROCESSABLE_MAP,
            "Unprocessable Map",
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn service_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_SERVICE_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.detail.as_deref().unwrap_or(""))
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        *response.status_mut() = status;
        response
    }
}

/// Map a library error onto its problem type.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::MapNotFound { name } => ProblemDetails::map_not_found(name, request_id),
        LibError::UnknownLocation { name, suggestions } => {
            ProblemDetails::unknown_location(name, suggestions, request_id)
        }
        LibError::PathNotFound {
            origin,
            destination,
        } => ProblemDetails::path_not_found(origin, destination, request_id),
        LibError::InvalidConfiguration { message } => {
            ProblemDetails::bad_request(message.clone(), request_id)
        }
        LibError::InvalidMap { .. } | LibError::DuplicateMap { .. } => {
            ProblemDetails::unprocessable_map(error.to_string(), request_id)
        }
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_details_serialization() {
        let problem = ProblemDetails::bad_request("autonomy must be positive", "req-test");
        let json = serde_json::to_string(&problem).unwrap();

        assert!(json.contains("\"type\":\"/problems/invalid-request\""));
        assert!(json.contains("\"title\":\"Invalid Request\""));
        assert!(json.contains("\"status\":400"));
        assert!(json.contains("\"instance\":\"req-test\""));
    }

    #[test]
    fn test_unknown_location_with_suggestions() {
        let suggestions = vec!["Osasco".to_string()];
        let problem = ProblemDetails::unknown_location("Osaco", &suggestions, "req-1");

        assert_eq!(problem.status, 404);
        let detail = problem.detail.unwrap();
        assert!(detail.contains("Osaco"));
        assert!(detail.contains("Did you mean: Osasco?"));
    }

    #[test]
    fn test_unknown_location_without_suggestions() {
        let problem = ProblemDetails::unknown_location("Recife", &[], "req-2");
        assert!(!problem.detail.unwrap().contains("Did you mean"));
    }

    #[test]
    fn test_from_lib_error_statuses() {
        let cases = [
            (
                LibError::MapNotFound {
                    name: "Mapa RJ".to_string(),
                },
                PROBLEM_MAP_NOT_FOUND,
                404,
            ),
            (
                LibError::PathNotFound {
                    origin: "A".to_string(),
                    destination: "C".to_string(),
                },
                PROBLEM_PATH_NOT_FOUND,
                404,
            ),
            (
                LibError::InvalidConfiguration {
                    message: "autonomy must be a positive number".to_string(),
                },
                PROBLEM_INVALID_REQUEST,
                400,
            ),
            (
                LibError::DuplicateMap {
                    name: "Mapa SP".to_string(),
                },
                PROBLEM_UNPROCESSABLE_MAP,
                422,
            ),
            (
                LibError::InvalidMap {
                    message: "route 1 has an empty origin".to_string(),
                },
                PROBLEM_UNPROCESSABLE_MAP,
                422,
            ),
        ];

        for (error, type_uri, status) in cases {
            let problem = from_lib_error(&error, "req-lib");
            assert_eq!(problem.type_uri, type_uri);
            assert_eq!(problem.status, status);
            assert_eq!(problem.instance.as_deref(), Some("req-lib"));
        }
    }

    #[test]
    fn test_into_response_sets_problem_content_type() {
        let response = ProblemDetails::map_not_found("Mapa RJ", "req-3").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(axum::http::header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
    }
}

//! Response wrapper for successful HTTP responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Successful JSON payload with an explicit status and optional `Location`.
///
/// The payload is serialized as-is; the content type travels in the header.
#[derive(Debug, Clone)]
pub struct ServiceResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub location: Option<String>,
}

impl<T> ServiceResponse<T> {
    /// 200 OK response.
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
            location: None,
        }
    }

    /// 201 Created response pointing at the new resource.
    pub fn created(data: T, location: impl Into<String>) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
            location: Some(location.into()),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.data).into_response();
        *response.status_mut() = self.status;
        if let Some(location) = self
            .location
            .and_then(|l| HeaderValue::from_str(&l).ok())
        {
            response.headers_mut().insert(header::LOCATION, location);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Estimate {
        total_distance: f64,
    }

    #[test]
    fn test_ok_response() {
        let response = ServiceResponse::new(Estimate {
            total_distance: 150.0,
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_created_response_sets_location() {
        let response = ServiceResponse::created(
            Estimate {
                total_distance: 0.0,
            },
            "/maps/7",
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/maps/7");
    }

    #[test]
    fn test_from_trait() {
        let data = Estimate {
            total_distance: 1.5,
        };
        let response: ServiceResponse<Estimate> = data.clone().into();
        assert_eq!(response.data, data);
        assert_eq!(response.status, StatusCode::OK);
    }
}

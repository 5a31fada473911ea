//! Request bodies and their validation.

use serde::{Deserialize, Serialize};

use delivery_lib::{DeliveryMap, DeliveryQuery, Route};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// The `request_id` populates the `instance` field of the returned problem.
/// Problems are boxed to keep `Result::Err` small.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

fn require_text(value: &str, field: &str, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    if value.trim().is_empty() {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' field is required and cannot be empty", field),
            request_id,
        )));
    }
    Ok(())
}

fn require_positive(value: f64, field: &str, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' field must be a positive number", field),
            request_id,
        )));
    }
    Ok(())
}

/// One route of a map being created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteInput {
    pub origin: String,
    pub destination: String,
    pub distance: f64,
}

impl From<RouteInput> for Route {
    fn from(value: RouteInput) -> Self {
        Route::new(value.origin, value.destination, value.distance)
    }
}

/// Body of `POST /maps`.
///
/// Only the name is checked here; route contents are validated by the store
/// and rejected as unprocessable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMapRequest {
    pub name: String,

    #[serde(default)]
    pub routes: Vec<RouteInput>,
}

impl CreateMapRequest {
    pub fn into_map(self) -> DeliveryMap {
        DeliveryMap::new(
            self.name,
            self.routes.into_iter().map(Route::from).collect(),
        )
    }
}

impl Validate for CreateMapRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require_text(&self.name, "name", request_id)
    }
}

/// Body of `POST /maps/estimate_delivery`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateDeliveryRequest {
    /// Map name; matched exactly first, then as a `LIKE` pattern.
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub liter_price: f64,
    /// Kilometres per litre.
    pub autonomy: f64,
}

impl EstimateDeliveryRequest {
    pub fn to_query(&self) -> DeliveryQuery {
        DeliveryQuery::new(
            self.name.clone(),
            self.origin.clone(),
            self.destination.clone(),
            self.liter_price,
            self.autonomy,
        )
    }
}

impl Validate for EstimateDeliveryRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require_text(&self.name, "name", request_id)?;
        require_text(&self.origin, "origin", request_id)?;
        require_text(&self.destination, "destination", request_id)?;
        require_positive(self.liter_price, "liter_price", request_id)?;
        require_positive(self.autonomy, "autonomy", request_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate() -> EstimateDeliveryRequest {
        EstimateDeliveryRequest {
            name: "Mapa SP".to_string(),
            origin: "Barueri".to_string(),
            destination: "Santos".to_string(),
            liter_price: 2.5,
            autonomy: 10.0,
        }
    }

    #[test]
    fn test_estimate_request_valid() {
        assert!(estimate().validate("req-1").is_ok());
    }

    #[test]
    fn test_estimate_request_empty_origin() {
        let request = EstimateDeliveryRequest {
            origin: "  ".to_string(),
            ..estimate()
        };

        let problem = request.validate("req-2").unwrap_err();
        assert_eq!(problem.status, 400);
        assert!(problem.detail.as_deref().unwrap().contains("origin"));
        assert_eq!(problem.instance.as_deref(), Some("req-2"));
    }

    #[test]
    fn test_estimate_request_zero_autonomy() {
        let request = EstimateDeliveryRequest {
            autonomy: 0.0,
            ..estimate()
        };

        let problem = request.validate("req-3").unwrap_err();
        assert!(problem.detail.as_deref().unwrap().contains("autonomy"));
    }

    #[test]
    fn test_estimate_request_negative_price() {
        let request = EstimateDeliveryRequest {
            liter_price: -1.0,
            ..estimate()
        };

        let problem = request.validate("req-4").unwrap_err();
        assert!(problem.detail.as_deref().unwrap().contains("liter_price"));
    }

    #[test]
    fn test_estimate_request_to_query() {
        let query = estimate().to_query();
        assert_eq!(query.map_name, "Mapa SP");
        assert_eq!(query.destination, "Santos");
        assert_eq!(query.autonomy, 10.0);
    }

    #[test]
    fn test_create_map_request_deserializes_without_routes() {
        let request: CreateMapRequest = serde_json::from_str(r#"{"name":"Vazio"}"#).unwrap();
        assert!(request.routes.is_empty());
        assert!(request.validate("req-5").is_ok());
    }

    #[test]
    fn test_create_map_request_blank_name() {
        let request = CreateMapRequest {
            name: String::new(),
            routes: Vec::new(),
        };
        assert_eq!(request.validate("req-6").unwrap_err().status, 400);
    }

    #[test]
    fn test_create_map_request_into_map() {
        let request: CreateMapRequest = serde_json::from_str(
            r#"{"name":"Mapa SP","routes":[{"origin":"Barueri","destination":"Sao Paulo","distance":50}]}"#,
        )
        .unwrap();

        let map = request.into_map();
        assert_eq!(map.name, "Mapa SP");
        assert_eq!(map.routes, vec![Route::new("Barueri", "Sao Paulo", 50.0)]);
        assert!(map.id.is_none());
    }
}

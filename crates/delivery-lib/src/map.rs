//! Delivery map model: named collections of distance-weighted routes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque place label. Locations exist only as route endpoints.
pub type Location = String;

/// Distance-weighted connection between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: Location,
    pub destination: Location,
    pub distance: f64,
}

impl Route {
    /// Convenience constructor.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, distance: f64) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            distance,
        }
    }

    /// Endpoint reached when leaving `from` along this route, if `from` is one of its ends.
    pub fn opposite(&self, from: &str) -> Option<&str> {
        if self.origin == from {
            Some(&self.destination)
        } else if self.destination == from {
            Some(&self.origin)
        } else {
            None
        }
    }

    fn validate(&self, position: usize) -> Result<()> {
        if self.origin.trim().is_empty() {
            return Err(Error::InvalidMap {
                message: format!("route {position} has an empty origin"),
            });
        }
        if self.destination.trim().is_empty() {
            return Err(Error::InvalidMap {
                message: format!("route {position} has an empty destination"),
            });
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(Error::InvalidMap {
                message: format!(
                    "route {position} distance must be a finite non-negative number, got {}",
                    self.distance
                ),
            });
        }
        Ok(())
    }
}

/// A named graph of locations connected by routes.
///
/// `id` is assigned by the repository once the map has been stored; maps
/// built in memory carry `None` until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl DeliveryMap {
    /// Create an unsaved map.
    pub fn new(name: impl Into<String>, routes: Vec<Route>) -> Self {
        Self {
            id: None,
            name: name.into(),
            routes,
        }
    }

    /// Parse a map from its JSON representation (`{"name": ..., "routes": [...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a map JSON document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the map can be stored: a non-empty name and well-formed routes.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidMap {
                message: "map name is required".to_string(),
            });
        }
        for (position, route) in self.routes.iter().enumerate() {
            route.validate(position)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_file_reports_missing_files_as_io() {
        let dir = tempfile::tempdir().unwrap();
        let error = DeliveryMap::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn from_file_reads_map_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapa.json");
        fs::write(
            &path,
            r#"{"name":"Mapa SP","routes":[{"origin":"A","destination":"B","distance":10}]}"#,
        )
        .unwrap();

        let map = DeliveryMap::from_file(&path).unwrap();
        assert_eq!(map.name, "Mapa SP");
        assert_eq!(map.routes, vec![Route::new("A", "B", 10.0)]);
    }

    #[test]
    fn opposite_resolves_both_ends() {
        let route = Route::new("Barueri", "Sao Paulo", 50.0);
        assert_eq!(route.opposite("Barueri"), Some("Sao Paulo"));
        assert_eq!(route.opposite("Sao Paulo"), Some("Barueri"));
        assert_eq!(route.opposite("Santos"), None);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let map = DeliveryMap::new("  ", vec![]);
        assert!(matches!(map.validate(), Err(Error::InvalidMap { .. })));
    }

    #[test]
    fn validate_rejects_negative_distance() {
        let map = DeliveryMap::new("Mapa SP", vec![Route::new("A", "B", -1.0)]);
        let error = map.validate().unwrap_err();
        assert!(error.to_string().contains("route 0 distance"));
    }

    #[test]
    fn validate_rejects_blank_endpoints() {
        let map = DeliveryMap::new(
            "Mapa SP",
            vec![Route::new("A", "B", 1.0), Route::new("B", "", 2.0)],
        );
        let error = map.validate().unwrap_err();
        assert!(error.to_string().contains("route 1 has an empty destination"));
    }

    #[test]
    fn empty_map_is_valid() {
        assert!(DeliveryMap::new("Empty", vec![]).validate().is_ok());
    }

    #[test]
    fn parses_json_without_id() {
        let map = DeliveryMap::from_json(
            r#"{"name":"Mapa SP","routes":[{"origin":"Osasco","destination":"Sao Paulo","distance":30}]}"#,
        )
        .unwrap();
        assert_eq!(map.id, None);
        assert_eq!(map.routes, vec![Route::new("Osasco", "Sao Paulo", 30.0)]);

        let json = serde_json::to_string(&map).unwrap();
        assert!(!json.contains("\"id\""));
    }
}

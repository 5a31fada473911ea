#![allow(dead_code)]

use std::path::PathBuf;

use delivery_lib::{DeliveryMap, Route};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// The "Mapa SP" fixture map: Barueri and Osasco feed Sao Paulo, which feeds Santos.
pub fn mapa_sp() -> DeliveryMap {
    DeliveryMap::from_file(&fixtures_dir().join("mapa_sp.json")).expect("fixture mapa_sp.json loads")
}

pub fn mapa_sp_routes() -> Vec<Route> {
    mapa_sp().routes
}

//! Fixtures for handler tests.
//!
//! Each call builds a fresh in-memory store seeded with the São Paulo map so
//! tests that create maps do not leak into one another.

use std::path::PathBuf;
use std::sync::Arc;

use delivery_lib::{DeliveryMap, InMemoryMapStore};

use crate::state::AppState;

/// Path to the JSON fixture holding "Mapa SP".
pub const TEST_FIXTURE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../docs/fixtures/mapa_sp.json"
);

/// Name of the seeded map.
pub const FIXTURE_MAP: &str = "Mapa SP";

/// Locations present in the seeded map.
pub mod fixture_locations {
    pub const BARUERI: &str = "Barueri";
    pub const OSASCO: &str = "Osasco";
    pub const SAO_PAULO: &str = "Sao Paulo";
    pub const SANTOS: &str = "Santos";
}

pub fn fixture_path() -> PathBuf {
    PathBuf::from(TEST_FIXTURE_PATH)
}

/// Load the fixture map from disk.
///
/// # Panics
///
/// Panics if the fixture is missing or malformed, which is a test setup bug.
pub fn fixture_map() -> DeliveryMap {
    let path = fixture_path();
    DeliveryMap::from_file(&path)
        .unwrap_or_else(|e| panic!("failed to load fixture {:?}: {}", path, e))
}

/// Fresh state backed by an in-memory store holding the fixture map.
pub fn test_state() -> AppState {
    let store = InMemoryMapStore::with_maps([fixture_map()])
        .unwrap_or_else(|e| panic!("failed to seed in-memory store: {}", e));
    AppState::from_repository(Arc::new(store))
}

/// Fresh state with no maps at all.
pub fn empty_state() -> AppState {
    AppState::from_repository(Arc::new(InMemoryMapStore::new()))
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    crate::RequestId::generate().0
}

//! Map persistence seam.
//!
//! [`MapRepository`] is the only way the rest of the workspace reaches stored
//! maps. [`crate::SqliteMapStore`] backs the service and the CLI;
//! [`InMemoryMapStore`] mirrors its rules without touching disk.

use std::sync::{PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::map::DeliveryMap;

/// Storage for delivery maps and their routes.
pub trait MapRepository: Send + Sync {
    /// Find a map by exact name, falling back to a SQL `LIKE` pattern match.
    ///
    /// When several maps match the pattern, the one stored first wins.
    fn find_map_by_name(&self, name: &str) -> Result<Option<DeliveryMap>>;

    /// Validate and store a map together with all of its routes, atomically.
    ///
    /// Returns the stored map with its assigned identifier.
    fn save_map_with_routes(&self, map: &DeliveryMap) -> Result<DeliveryMap>;

    /// Every stored map with its routes, in creation order.
    fn list_maps(&self) -> Result<Vec<DeliveryMap>>;

    /// Number of stored maps.
    fn map_count(&self) -> Result<usize> {
        Ok(self.list_maps()?.len())
    }

    /// Confirm the backing storage answers queries.
    fn ping(&self) -> Result<()> {
        self.map_count().map(|_| ())
    }
}

/// In-process map store with the same semantics as the SQLite store.
#[derive(Debug, Default)]
pub struct InMemoryMapStore {
    maps: RwLock<Vec<DeliveryMap>>,
}

impl InMemoryMapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `maps`, assigning identifiers in order.
    pub fn with_maps(maps: impl IntoIterator<Item = DeliveryMap>) -> Result<Self> {
        let store = Self::new();
        for map in maps {
            store.save_map_with_routes(&map)?;
        }
        Ok(store)
    }
}

impl MapRepository for InMemoryMapStore {
    fn find_map_by_name(&self, name: &str) -> Result<Option<DeliveryMap>> {
        let maps = self.maps.read().unwrap_or_else(PoisonError::into_inner);
        let found = maps
            .iter()
            .find(|map| map.name == name)
            .or_else(|| maps.iter().find(|map| like_matches(name, &map.name)));
        Ok(found.cloned())
    }

    fn save_map_with_routes(&self, map: &DeliveryMap) -> Result<DeliveryMap> {
        map.validate()?;
        let mut maps = self.maps.write().unwrap_or_else(PoisonError::into_inner);
        if maps.iter().any(|existing| existing.name == map.name) {
            return Err(Error::DuplicateMap {
                name: map.name.clone(),
            });
        }

        let id = maps.iter().filter_map(|existing| existing.id).max().unwrap_or(0) + 1;
        let stored = DeliveryMap {
            id: Some(id),
            ..map.clone()
        };
        maps.push(stored.clone());
        Ok(stored)
    }

    fn list_maps(&self) -> Result<Vec<DeliveryMap>> {
        Ok(self
            .maps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn map_count(&self) -> Result<usize> {
        Ok(self.maps.read().unwrap_or_else(PoisonError::into_inner).len())
    }
}

/// SQLite `LIKE` semantics: `%` matches any run, `_` one character, ASCII
/// letters compare case-insensitively.
pub(crate) fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(&'%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '_' || c.eq_ignore_ascii_case(&text[t]) => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}

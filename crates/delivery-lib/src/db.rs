use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::map::{DeliveryMap, Route};
use crate::store::MapRepository;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS maps (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT    NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS routes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    map_id      INTEGER NOT NULL REFERENCES maps(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    origin      TEXT    NOT NULL,
    destination TEXT    NOT NULL,
    distance    REAL    NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_routes_map_position ON routes(map_id, position);
";

/// SQLite-backed [`MapRepository`].
///
/// The store owns a single connection guarded by a mutex, so one instance can
/// be shared across threads. The schema is created on open when missing.
#[derive(Debug)]
pub struct SqliteMapStore {
    connection: Mutex<Connection>,
}

impl SqliteMapStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path)?;
        debug!(path = %path.display(), "opened map database");
        Self::from_connection(connection)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        connection.pragma_update(None, "foreign_keys", "ON")?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MapRepository for SqliteMapStore {
    fn find_map_by_name(&self, name: &str) -> Result<Option<DeliveryMap>> {
        let connection = self.lock();
        let exact = connection
            .query_row(
                "SELECT id, name FROM maps WHERE name = ?1",
                params![name],
                row_to_header,
            )
            .optional()?;

        let header = match exact {
            Some(header) => Some(header),
            None => connection
                .query_row(
                    "SELECT id, name FROM maps WHERE name LIKE ?1 ORDER BY id LIMIT 1",
                    params![name],
                    row_to_header,
                )
                .optional()?,
        };

        let Some((id, map_name)) = header else {
            debug!(map = name, "no map matched");
            return Ok(None);
        };

        let routes = load_routes(&connection, id)?;
        Ok(Some(DeliveryMap {
            id: Some(id),
            name: map_name,
            routes,
        }))
    }

    fn save_map_with_routes(&self, map: &DeliveryMap) -> Result<DeliveryMap> {
        map.validate()?;

        let mut connection = self.lock();
        let tx = connection.transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM maps WHERE name = ?1",
                params![map.name],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            return Err(Error::DuplicateMap {
                name: map.name.clone(),
            });
        }

        tx.execute("INSERT INTO maps (name) VALUES (?1)", params![map.name])?;
        let id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO routes (map_id, position, origin, destination, distance)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, route) in map.routes.iter().enumerate() {
                stmt.execute(params![
                    id,
                    position as i64,
                    route.origin,
                    route.destination,
                    route.distance
                ])?;
            }
        }
        tx.commit()?;

        info!(map = %map.name, id, routes = map.routes.len(), "stored map");
        Ok(DeliveryMap {
            id: Some(id),
            ..map.clone()
        })
    }

    fn list_maps(&self) -> Result<Vec<DeliveryMap>> {
        let connection = self.lock();

        let mut routes_by_map: HashMap<i64, Vec<Route>> = HashMap::new();
        let mut stmt = connection.prepare(
            "SELECT map_id, origin, destination, distance FROM routes ORDER BY map_id, position",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row_to_route(row, 1)?)))?;
        for entry in rows {
            let (map_id, route) = entry?;
            routes_by_map.entry(map_id).or_default().push(route);
        }

        let mut stmt = connection.prepare("SELECT id, name FROM maps ORDER BY id")?;
        let rows = stmt.query_map([], row_to_header)?;
        let mut maps = Vec::new();
        for entry in rows {
            let (id, name) = entry?;
            maps.push(DeliveryMap {
                id: Some(id),
                name,
                routes: routes_by_map.remove(&id).unwrap_or_default(),
            });
        }
        Ok(maps)
    }

    fn map_count(&self) -> Result<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM maps", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn ping(&self) -> Result<()> {
        self.lock().query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

fn load_routes(connection: &Connection, map_id: i64) -> Result<Vec<Route>> {
    let mut stmt = connection.prepare(
        "SELECT origin, destination, distance FROM routes WHERE map_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![map_id], |row| row_to_route(row, 0))?;

    let mut routes = Vec::new();
    for entry in rows {
        routes.push(entry?);
    }
    Ok(routes)
}

fn row_to_header(row: &Row<'_>) -> rusqlite::Result<(i64, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn row_to_route(row: &Row<'_>, offset: usize) -> rusqlite::Result<Route> {
    Ok(Route {
        origin: row.get(offset)?,
        destination: row.get(offset + 1)?,
        distance: row.get(offset + 2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let store = SqliteMapStore::open_in_memory().unwrap();
        store.lock().execute_batch(SCHEMA).unwrap();
        store.ping().unwrap();
        assert_eq!(store.map_count().unwrap(), 0);
    }

    #[test]
    fn duplicate_name_leaves_no_partial_rows() {
        let store = SqliteMapStore::open_in_memory().unwrap();
        let map = DeliveryMap::new("Mapa SP", vec![Route::new("A", "B", 1.0)]);
        store.save_map_with_routes(&map).unwrap();
        assert!(matches!(
            store.save_map_with_routes(&map),
            Err(Error::DuplicateMap { .. })
        ));

        let routes: i64 = store
            .lock()
            .query_row("SELECT COUNT(*) FROM routes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(routes, 1);
    }
}

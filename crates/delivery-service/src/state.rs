//! Shared application state for the axum handlers.

use std::path::Path;
use std::sync::Arc;

use delivery_lib::{Error as LibError, MapRepository, SqliteMapStore};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The SQLite map store could not be opened or migrated.
    StoreOpen { path: String, source: LibError },
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreOpen { path, source } => {
                write!(f, "failed to open map store at {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreOpen { source, .. } => Some(source),
        }
    }
}

/// Cheaply cloneable handle to the map repository, shared via `State`.
#[derive(Clone)]
pub struct AppState {
    repository: Arc<dyn MapRepository>,
}

impl AppState {
    /// Open (creating if needed) the SQLite map store at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, AppStateError> {
        let db_path = db_path.as_ref();
        tracing::info!(path = %db_path.display(), "opening map store");

        let store = SqliteMapStore::open(db_path).map_err(|source| AppStateError::StoreOpen {
            path: db_path.display().to_string(),
            source,
        })?;

        Ok(Self::from_repository(Arc::new(store)))
    }

    /// Wrap an existing repository, e.g. an in-memory store in tests.
    pub fn from_repository(repository: Arc<dyn MapRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> Arc<dyn MapRepository> {
        Arc::clone(&self.repository)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("map_count", &self.repository.map_count().ok())
            .finish()
    }
}

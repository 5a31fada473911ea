//! Command handlers for the delivery CLI.

pub mod estimate;
pub mod import;
pub mod maps;

use std::path::Path;

use anyhow::{Context, Result};

use delivery_lib::SqliteMapStore;

/// Open (creating if needed) the map store used by every command.
pub(crate) fn open_store(database: &Path) -> Result<SqliteMapStore> {
    SqliteMapStore::open(database)
        .with_context(|| format!("failed to open map store at {}", database.display()))
}

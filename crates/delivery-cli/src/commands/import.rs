//! `import`: store a map read from a JSON document.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use delivery_lib::{DeliveryMap, MapRepository};

use crate::output::{render_imported, OutputFormat};

pub fn handle_import(database: &Path, file: &Path, format: OutputFormat) -> Result<()> {
    let map = DeliveryMap::from_file(file)
        .with_context(|| format!("failed to read map file {}", file.display()))?;

    let store = super::open_store(database)?;
    let saved = store
        .save_map_with_routes(&map)
        .with_context(|| format!("failed to import map '{}'", map.name))?;
    info!(map = %saved.name, routes = saved.routes.len(), "map imported");

    println!("{}", render_imported(&saved, format)?);
    Ok(())
}

//! `maps`: list stored maps and their routes.

use std::path::Path;

use anyhow::{Context, Result};

use delivery_lib::MapRepository;

use crate::output::{render_maps, OutputFormat};

pub fn handle_maps(database: &Path, format: OutputFormat) -> Result<()> {
    let store = super::open_store(database)?;
    let maps = store.list_maps().context("failed to list maps")?;
    println!("{}", render_maps(&maps, format)?);
    Ok(())
}

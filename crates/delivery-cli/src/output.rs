//! Rendering of command results as text or JSON.
//!
//! Text output rounds distances and money to two decimals. JSON output keeps
//! full precision.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use delivery_lib::{DeliveryMap, EconomicalPath, Route};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn route_line(route: &Route) -> String {
    format!(
        "- {} -> {} ({:.2} km)",
        route.origin, route.destination, route.distance
    )
}

/// Result of `import`.
pub fn render_imported(map: &DeliveryMap, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(map),
        OutputFormat::Text => {
            let id = map
                .id
                .map(|id| format!(" (id {})", id))
                .unwrap_or_default();
            Ok(format!(
                "Imported map '{}'{} with {} route(s)",
                map.name,
                id,
                map.routes.len()
            ))
        }
    }
}

/// Result of `maps`.
pub fn render_maps(maps: &[DeliveryMap], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(maps),
        OutputFormat::Text => {
            if maps.is_empty() {
                return Ok("No maps stored".to_string());
            }
            let mut lines = Vec::new();
            for map in maps {
                lines.push(format!("{} ({} route(s))", map.name, map.routes.len()));
                lines.extend(map.routes.iter().map(|r| format!("  {}", route_line(r))));
            }
            Ok(lines.join("\n"))
        }
    }
}

/// Result of `estimate`.
pub fn render_estimate(path: &EconomicalPath, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(path),
        OutputFormat::Text => {
            let mut lines = vec!["Route:".to_string()];
            if path.routes.is_empty() {
                lines.push("- already at destination".to_string());
            } else {
                lines.extend(path.routes.iter().map(route_line));
            }
            lines.push(format!("Total distance: {:.2} km", path.total_distance));
            lines.push(format!("Total cost: {:.2}", path.total_cost));
            Ok(lines.join("\n"))
        }
    }
}

//! `estimate`: cheapest delivery between two locations of a stored map.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use delivery_lib::{estimate_delivery_from_store, DeliveryQuery};

use crate::output::{render_estimate, OutputFormat};

/// Arguments for the estimate command.
#[derive(Debug, Clone)]
pub struct EstimateCommandArgs {
    /// Map name or `LIKE` pattern.
    pub map: String,
    pub from: String,
    pub to: String,
    /// Price of one litre of fuel.
    pub liter_price: f64,
    /// Kilometres per litre.
    pub autonomy: f64,
}

impl EstimateCommandArgs {
    fn to_query(&self) -> DeliveryQuery {
        DeliveryQuery::new(
            self.map.clone(),
            self.from.clone(),
            self.to.clone(),
            self.liter_price,
            self.autonomy,
        )
    }
}

pub fn handle_estimate(
    database: &Path,
    args: &EstimateCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let store = super::open_store(database)?;
    let path = estimate_delivery_from_store(&store, &args.to_query()).with_context(|| {
        format!(
            "failed to estimate delivery from {} to {} on map '{}'",
            args.from, args.to, args.map
        )
    })?;
    debug!(legs = path.leg_count(), "delivery estimated");

    println!("{}", render_estimate(&path, format)?);
    Ok(())
}

//! Delivery estimation: validates a query, builds the map graph, and prices
//! the cheapest path.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fuel::FuelConfig;
use crate::graph::{build_graph, Graph};
use crate::map::Route;
use crate::path::{find_economical_path, EconomicalPath};
use crate::store::MapRepository;

/// Number of fuzzy suggestions attached to an unknown location error.
const MAX_SUGGESTIONS: usize = 3;

/// Request for the cheapest delivery between two locations of one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryQuery {
    pub map_name: String,
    pub origin: String,
    pub destination: String,
    pub liter_price: f64,
    pub autonomy: f64,
}

impl DeliveryQuery {
    pub fn new(
        map_name: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        liter_price: f64,
        autonomy: f64,
    ) -> Self {
        Self {
            map_name: map_name.into(),
            origin: origin.into(),
            destination: destination.into(),
            liter_price,
            autonomy,
        }
    }

    /// Validated fuel parameters for this query.
    pub fn fuel_config(&self) -> Result<FuelConfig> {
        FuelConfig::new(self.liter_price, self.autonomy)
    }
}

/// Estimate the cheapest delivery over an already-resolved set of routes.
///
/// Fuel parameters are validated before any graph work happens. Unknown
/// endpoints are reported with fuzzy suggestions drawn from the map's
/// locations; a map without routes behaves like any other map in which the
/// endpoints do not appear.
pub fn estimate_delivery(routes: &[Route], query: &DeliveryQuery) -> Result<EconomicalPath> {
    let fuel = query.fuel_config()?;
    let graph = build_graph(routes);
    debug!(
        map = %query.map_name,
        routes = routes.len(),
        locations = graph.location_count(),
        "built delivery graph"
    );

    if query.origin != query.destination {
        resolve_location(&graph, &query.origin)?;
        resolve_location(&graph, &query.destination)?;
    }

    let Some(path) = find_economical_path(&graph, &query.origin, &query.destination, &fuel) else {
        debug!(
            origin = %query.origin,
            destination = %query.destination,
            "no path connects the requested locations"
        );
        return Err(Error::PathNotFound {
            origin: query.origin.clone(),
            destination: query.destination.clone(),
        });
    };

    debug!(
        legs = path.leg_count(),
        total_distance = path.total_distance,
        total_cost = path.total_cost,
        "economical path found"
    );
    Ok(path)
}

/// Look up the query's map in `repository` and estimate the delivery over it.
pub fn estimate_delivery_from_store<R>(repository: &R, query: &DeliveryQuery) -> Result<EconomicalPath>
where
    R: MapRepository + ?Sized,
{
    query.fuel_config()?;
    let map = repository
        .find_map_by_name(&query.map_name)?
        .ok_or_else(|| Error::MapNotFound {
            name: query.map_name.clone(),
        })?;
    estimate_delivery(&map.routes, query)
}

fn resolve_location(graph: &Graph, name: &str) -> Result<()> {
    if graph.contains(name) {
        return Ok(());
    }
    Err(Error::UnknownLocation {
        name: name.to_string(),
        suggestions: graph.fuzzy_location_matches(name, MAX_SUGGESTIONS),
    })
}

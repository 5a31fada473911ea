//! Delivery library entry points.
//!
//! This crate holds the delivery route model, turns a map's routes into a
//! traversable graph, and finds the most economical path between two
//! locations for a given fuel price and vehicle autonomy. Persistence lives
//! behind the [`MapRepository`] trait so the HTTP service and the CLI share
//! the same storage rules. Higher-level consumers should only depend on the
//! functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod db;
pub mod delivery;
pub mod error;
pub mod fuel;
pub mod graph;
pub mod map;
pub mod path;
pub mod store;

pub use db::SqliteMapStore;
pub use delivery::{estimate_delivery, estimate_delivery_from_store, DeliveryQuery};
pub use error::{Error, Result};
pub use fuel::FuelConfig;
pub use graph::{build_directed_graph, build_graph, Edge, Graph, RouteIndex};
pub use map::{DeliveryMap, Location, Route};
pub use path::{find_economical_path, EconomicalPath};
pub use store::{InMemoryMapStore, MapRepository};

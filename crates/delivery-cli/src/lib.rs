//! Delivery CLI library.
//!
//! Command handlers open the SQLite map store, call into `delivery-lib`, and
//! hand the results to [`output`] for rendering.

pub mod commands;
pub mod output;

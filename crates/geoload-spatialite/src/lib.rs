//! SpatiaLite-backed storage for the `GeoLoad` import pipeline.
//!
//! This crate owns everything on the database side of an import: opening
//! the destination file with the SpatiaLite extension loaded, creating or
//! validating the destination table according to the write mode, and
//! inserting features inside a single transaction.
//!
//! The SpatiaLite SQL surface is confined to [`Spatialite`], an
//! implementation of the
//! [`GeometryBackend`](geoload_core_common::GeometryBackend) seam, so the
//! writer itself can be exercised against a plain SQLite connection.

mod backend;
mod error;
mod extension;
mod loader;
mod table;

pub use backend::Spatialite;
pub use error::StoreError;
pub use extension::{open_spatialite, spatialite_available};
pub use loader::load_features;
pub use table::{prepare_table, quote_ident, table_exists};

//! Common types and traits shared across `GeoLoad` crates.
//!
//! This crate provides the core abstractions that are shared between
//! `geoload-core`, the format reader crates, and the storage crate,
//! preventing circular dependencies.

pub mod drivers;
pub mod features;
pub mod io;

// Re-export commonly used types
pub use drivers::{Driver, DriverCapabilities, SupportStatus};
pub use features::{ColumnDef, ColumnType, Feature, FeatureSet, TableSchema, Value, WriteMode};
pub use io::{FeatureReader, GeometryBackend};

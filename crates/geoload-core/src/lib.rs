//! `geoload-core` is the core library for the `GeoLoad` project: importing
//! GeoJSON and ESRI Shapefile data into SpatiaLite-enabled SQLite
//! databases.
//!
//! This crate includes:
//! - **Driver Registry**: the supported geospatial formats and their capabilities.
//! - **Schema Resolver**: turns a feature sequence into a destination table schema.
//! - **Import Operations**: the public `import_geojson` / `import_shapefile`
//!   entry points composing reader, resolver, and writer.
//! - **Errors**: the single public failure type, [`DataImportError`].

pub mod drivers;
pub mod error;
pub mod operations;
pub mod schema;
pub mod types;
pub mod utils;

pub use error::{ConfigError, DataImportError, Result, SchemaError};
pub use operations::{dataset_info, import_features, import_geojson, import_shapefile};
pub use types::{ImportOptions, ImportSummary};

// Re-export the shared vocabulary so callers need only this crate.
pub use geoload_core_common::{
    ColumnDef, ColumnType, Feature, FeatureSet, TableSchema, Value, WriteMode,
};

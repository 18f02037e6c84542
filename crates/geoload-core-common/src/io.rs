//! I/O traits for reading features and storing geometries.
//!
//! This module defines the seams between the import pipeline and its two
//! substrates: format crates implement [`FeatureReader`] to produce
//! features, and the storage crate implements [`GeometryBackend`] to keep
//! all geometry-specific SQL behind one interface.

use std::path::Path;

use anyhow::Result;
use geoload_shared::SpatialFormatReadError;
use rusqlite::Connection;

use crate::features::{FeatureSet, TableSchema};

/// Trait for reading features from a geographic source file.
///
/// Implementations produce a finite, single-pass sequence of features plus
/// whatever coordinate-system metadata the source declares. File handles
/// are scoped to the call and released on all exit paths.
pub trait FeatureReader {
    /// Short format name used in log output and error messages.
    fn format_name(&self) -> &'static str;

    /// Reads all features from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`SpatialFormatReadError`] when the file does not exist,
    /// is unreadable, or is not valid for this format.
    fn read_features(&self, path: &Path) -> Result<FeatureSet, SpatialFormatReadError>;
}

/// Trait for the geometry capabilities of a storage backend.
///
/// The database writer never names SpatiaLite SQL directly; everything
/// geometry-specific (metadata initialization, geometry column creation,
/// the insert-side value expression, spatial indexing, and drop
/// bookkeeping) goes through this interface, so an alternate backend can
/// be substituted — tests use a plain-SQLite backend that stores WKT text.
pub trait GeometryBackend {
    /// Prepares a freshly opened connection for storing geometries.
    ///
    /// # Errors
    ///
    /// Returns an error if backend metadata cannot be initialized.
    fn initialize(&self, conn: &Connection) -> Result<()>;

    /// Adds the geometry column described by `schema` to its table.
    ///
    /// Called after the attribute columns have been created.
    ///
    /// # Errors
    ///
    /// Returns an error if the column cannot be registered, including when
    /// the schema names an unknown geometry type.
    fn add_geometry_column(&self, conn: &Connection, schema: &TableSchema) -> Result<()>;

    /// SQL expression producing the stored geometry from one bound WKT
    /// parameter (a single `?` placeholder).
    ///
    /// Implementations reproject when the schema's source SRID differs
    /// from its target SRID.
    fn geometry_value_expr(&self, schema: &TableSchema) -> String;

    /// Builds a spatial index over `table.column`.
    ///
    /// # Errors
    ///
    /// Returns an error if index creation fails.
    fn create_spatial_index(&self, conn: &Connection, table: &str, column: &str) -> Result<()>;

    /// Drops `table` together with any geometry metadata and spatial index
    /// bookkeeping the backend maintains for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be dropped.
    fn drop_table(&self, conn: &Connection, table: &str, column: &str) -> Result<()>;
}

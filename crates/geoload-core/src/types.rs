//! Option and summary types for import operations.

use std::path::PathBuf;

use geoload_core_common::WriteMode;

/// Configuration of one import call.
///
/// Immutable for the duration of the call; the defaults reproduce the
/// original tool's behavior (table named after the file, SRID 4326, no
/// primary key, create mode, auto-detected extension).
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Destination table name; defaults to the source file stem.
    pub table_name: Option<String>,
    /// Target SRID geometries are stored in. `None` means 4326.
    pub srid: Option<i32>,
    /// Overrides the SRID detected from the source. Useful when a `.prj`
    /// is absent, or to stamp geometries without reprojecting (set it
    /// equal to the target SRID).
    pub source_srid: Option<i32>,
    /// Primary-key columns; empty synthesizes an integer key.
    pub primary_key: Vec<String>,
    /// How to treat a pre-existing destination table.
    pub write_mode: WriteMode,
    /// Declared geometry column type; `None` detects it from the data.
    pub geometry_type: Option<String>,
    /// Explicit path to the `mod_spatialite` module; `None` auto-detects.
    pub spatialite_extension: Option<PathBuf>,
}

impl ImportOptions {
    /// The effective target SRID.
    #[must_use]
    pub fn target_srid(&self) -> i32 {
        self.srid.unwrap_or(4326)
    }
}

/// What an import accomplished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// The destination table.
    pub table: String,
    /// Number of features written.
    pub features: usize,
}

/// Description of a source dataset, for the CLI `info` command.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    /// The dataset path as given.
    pub dataset: String,
    /// Short driver name.
    pub driver: String,
    /// Long driver name.
    pub driver_long_name: String,
    /// Detected source CRS, as `EPSG:nnnn`, when known.
    pub crs: Option<String>,
    /// Geometry type the importer would use for these features.
    pub geometry_type: String,
    /// Number of features in the source.
    pub feature_count: usize,
    /// Inferred attribute fields.
    pub fields: Vec<FieldInfo>,
}

/// One attribute field of a dataset.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Field name.
    pub name: String,
    /// Inferred SQL type.
    pub data_type: String,
}

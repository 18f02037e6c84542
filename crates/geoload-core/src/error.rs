//! The public error type for `GeoLoad` imports.
//!
//! Every recoverable failure surfaces as a [`DataImportError`]. The type is
//! an umbrella over stage-specific enums, using `#[error(transparent)]` to
//! delegate display formatting to the variant that knows the details.

use thiserror::Error;

use geoload_shared::SpatialFormatReadError;
use geoload_spatialite::StoreError;

/// The single failure type of an import run.
///
/// Callers match on it for programmatic handling, or use
/// [`user_message`](DataImportError::user_message) and
/// [`recovery_suggestion`](DataImportError::recovery_suggestion) to present
/// the failure to a person.
#[derive(Debug, Error)]
pub enum DataImportError {
    /// The source file could not be read or decoded.
    #[error(transparent)]
    Source(#[from] SpatialFormatReadError),

    /// The feature attributes could not be resolved into a table schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The destination database rejected the import.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The import configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic errors from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Schema resolution errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A user-specified primary-key column is absent from some feature.
    #[error("Field '{column}' must exist in every feature to be used as primary key")]
    PrimaryKeyNotFound {
        /// The requested key column.
        column: String,
    },

    /// The source contained no features to derive a schema from.
    #[error("Source '{path}' contains no features")]
    EmptySource {
        /// The offending source path.
        path: String,
    },

    /// The geometry-type override is not a known SpatiaLite type.
    #[error("'{value}' is not a valid geometry type")]
    UnknownGeometryType {
        /// The rejected value.
        value: String,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The SRID is not a positive EPSG code.
    #[error("Invalid SRID {value}: must be a positive EPSG code")]
    InvalidSrid {
        /// The rejected value.
        value: i32,
    },

    /// No driver claims the source file.
    #[error("No driver for '{path}'. Available drivers: {available}")]
    UnsupportedSource {
        /// The source path.
        path: String,
        /// Comma-separated driver names.
        available: String,
    },

    /// Options contradict each other.
    #[error("Conflicting options: {message}")]
    ConflictingOptions {
        /// Description of the conflict.
        message: String,
    },
}

/// Type alias for Results using [`DataImportError`].
pub type Result<T> = std::result::Result<T, DataImportError>;

impl DataImportError {
    /// A user-facing message identifying the failing stage.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Source(e) => format!("Could not read the source: {e}"),
            Self::Schema(e) => format!("Could not resolve the table schema: {e}"),
            Self::Store(e) => format!("Could not write to the database: {e}"),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// A hint on how to fix or work around the failure, if one exists.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Store(StoreError::ExtensionLoad { .. }) => Some(
                "Install SpatiaLite (e.g. libsqlite3-mod-spatialite) or pass \
                 --spatialite-extension with the path to the module."
                    .to_string(),
            ),
            Self::Store(StoreError::TableExists { .. }) => Some(
                "Pass --write-mode overwrite to replace the table, or append to add to it."
                    .to_string(),
            ),
            Self::Source(SpatialFormatReadError::MissingSidecar { path }) => Some(format!(
                "Shapefiles travel as a set; place '{}' next to the .shp file \
                 (or pass --source-srid if only the .prj is missing).",
                path.display()
            )),
            Self::Source(SpatialFormatReadError::Io { .. }) => {
                Some("Check that the file path is correct and the file exists.".to_string())
            },
            Self::Schema(SchemaError::PrimaryKeyNotFound { .. }) => {
                Some("Pick a field that is present on every feature.".to_string())
            },
            _ => None,
        }
    }

    /// `true` when retrying with different options could succeed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Store(StoreError::TableExists { .. })
                | Self::Schema(SchemaError::PrimaryKeyNotFound { .. })
        )
    }
}

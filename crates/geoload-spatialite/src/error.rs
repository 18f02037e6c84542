//! Storage-side error type.

use thiserror::Error;

/// Errors raised while writing features into the destination database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SpatiaLite extension could not be loaded on the connection.
    #[error("Failed to load the SpatiaLite extension (tried: {tried})")]
    ExtensionLoad {
        /// The module names or path that were attempted.
        tried: String,
    },

    /// The destination table already exists and the write mode is `create`.
    #[error("Table '{table}' already exists")]
    TableExists {
        /// The destination table name.
        table: String,
    },

    /// The existing table is not column-compatible with the incoming schema.
    #[error("Cannot append to table '{table}': {reason}")]
    AppendMismatch {
        /// The destination table name.
        table: String,
        /// What differs between the table and the incoming schema.
        reason: String,
    },

    /// A record names an attribute that is not part of the resolved schema.
    #[error("Record {record}: attribute '{attribute}' is not part of the resolved schema")]
    UnknownAttribute {
        /// 1-based record number within the import.
        record: usize,
        /// The offending attribute name.
        attribute: String,
    },

    /// A geometry could not be encoded for storage.
    #[error("Failed to encode geometry for record {record}: {message}")]
    Geometry {
        /// 1-based record number within the import.
        record: usize,
        /// Encoder error description.
        message: String,
    },

    /// An underlying SQLite failure.
    #[error(transparent)]
    Sql(#[from] rusqlite::Error),

    /// A failure reported by the geometry backend.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

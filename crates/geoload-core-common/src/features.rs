//! Core data structures for features, attribute values, and table schemas.
//!
//! A [`Feature`] is the atomic unit of geographic data exchange: one optional
//! geometry plus an insertion-ordered map of scalar attributes. The schema
//! resolver turns a sequence of features into a [`TableSchema`], which the
//! database writer treats as an immutable contract for one import run.

use std::fmt;
use std::str::FromStr;

use geo_types::Geometry;
use indexmap::IndexMap;
use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, ValueRef};

/// A scalar attribute value.
///
/// Booleans are folded into integers (0/1) at the format boundary, and
/// nested JSON structures are serialized to text, so the storage layer only
/// ever sees these four shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// 64-bit integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
}

impl Value {
    /// Returns the narrowest [`ColumnType`] able to hold this value, or
    /// `None` for NULL (which carries no type information).
    #[must_use]
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Integer(_) => Some(ColumnType::Integer),
            Value::Real(_) => Some(ColumnType::Float),
            Value::Text(_) => Some(ColumnType::Text),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Declared SQL type of an attribute column.
///
/// The spellings match what the original tooling writes into table DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// `INTEGER`
    Integer,
    /// `FLOAT`
    Float,
    /// `TEXT`
    Text,
}

impl ColumnType {
    /// The SQL spelling used in `CREATE TABLE` statements.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "FLOAT",
            ColumnType::Text => "TEXT",
        }
    }

    /// Widens `self` to also accommodate `other`.
    ///
    /// Integer and float merge to float; any other disagreement falls back
    /// to text.
    #[must_use]
    pub fn widen(self, other: ColumnType) -> ColumnType {
        use ColumnType::{Float, Integer, Text};
        match (self, other) {
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            (_, _) => Text,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One geographic record: an optional geometry plus named attributes.
#[derive(Debug, Clone, Default)]
pub struct Feature {
    /// The decoded geometry, if the record has one.
    pub geometry: Option<Geometry<f64>>,
    /// Attributes in source order.
    pub properties: IndexMap<String, Value>,
}

impl Feature {
    /// Creates a feature from a geometry and its attributes.
    #[must_use]
    pub fn new(geometry: Option<Geometry<f64>>, properties: IndexMap<String, Value>) -> Self {
        Self {
            geometry,
            properties,
        }
    }
}

/// The product of one reader invocation: the materialized feature sequence
/// plus whatever the source declared about its coordinate system.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    /// Features in source order, consumed in a single pass by the writer.
    pub features: Vec<Feature>,
    /// Source SRID, when the format declares one (GeoJSON is always 4326;
    /// Shapefiles derive it from the `.prj` sidecar).
    pub source_srid: Option<i32>,
}

/// An attribute column of the destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name, unique within one schema.
    pub name: String,
    /// Declared SQL type.
    pub column_type: ColumnType,
}

/// Resolved destination table layout for one import run.
///
/// Invariant: column names are unique, and the schema does not change for
/// the duration of the run. Records that name an attribute outside the
/// schema are rejected rather than widening it.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Destination table name (unquoted).
    pub table: String,
    /// Attribute columns in order; excludes the geometry column.
    pub columns: Vec<ColumnDef>,
    /// User-chosen primary key columns; empty when a key was synthesized.
    pub primary_key: Vec<String>,
    /// Name of the synthesized integer key column, present iff
    /// `primary_key` is empty.
    pub synthesized_key: Option<String>,
    /// Name of the geometry column.
    pub geometry_column: String,
    /// SpatiaLite geometry type for the geometry column (`POINT`,
    /// `POLYGON`, ..., or generic `GEOMETRY`).
    pub geometry_type: String,
    /// Target SRID geometries are stored in.
    pub srid: i32,
    /// SRID the source coordinates are expressed in.
    pub source_srid: i32,
}

impl TableSchema {
    /// Returns `true` when geometries must be reprojected on insert.
    #[must_use]
    pub fn needs_transform(&self) -> bool {
        self.source_srid != self.srid
    }

    /// Position of an attribute column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// Policy governing how an import interacts with a pre-existing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Fail if the destination table already exists.
    #[default]
    Create,
    /// Drop and recreate the destination table unconditionally.
    Overwrite,
    /// Insert into an existing, column-compatible table.
    Append,
}

impl WriteMode {
    /// The canonical lower-case name of this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Create => "create",
            WriteMode::Overwrite => "overwrite",
            WriteMode::Append => "append",
        }
    }
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(WriteMode::Create),
            // "replace" is the original tool's name for this mode
            "overwrite" | "replace" => Ok(WriteMode::Overwrite),
            "append" => Ok(WriteMode::Append),
            other => Err(format!(
                "invalid write mode '{other}' (expected create, overwrite or append)"
            )),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

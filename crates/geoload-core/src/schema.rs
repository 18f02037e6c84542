//! The schema resolver: from a feature sequence to a destination table
//! layout.
//!
//! Types are inferred once, from a bounded sample of leading features, and
//! the result is treated as an immutable contract for the rest of the run.
//! Records are validated against it downstream instead of widening it.

use geo_types::Geometry;
use indexmap::IndexMap;

use geoload_core_common::{ColumnDef, ColumnType, Feature, TableSchema};

use crate::error::SchemaError;
use crate::types::ImportOptions;

/// How many leading features participate in type inference (the window the
/// original tool samples).
pub const SCHEMA_SAMPLE_SIZE: usize = 100;

/// Geometry column types SpatiaLite accepts.
const GEOMETRY_TYPES: &[&str] = &[
    "POINT",
    "LINESTRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
    "GEOMETRY",
];

/// Infers the attribute columns from the first [`SCHEMA_SAMPLE_SIZE`]
/// features.
///
/// Columns appear in first-seen order. Integer-only columns stay
/// `INTEGER`, any real widens to `FLOAT`, and anything else (including
/// all-null columns) is `TEXT`.
#[must_use]
pub fn infer_columns(features: &[Feature]) -> Vec<ColumnDef> {
    let mut inferred: IndexMap<String, Option<ColumnType>> = IndexMap::new();

    for feature in features.iter().take(SCHEMA_SAMPLE_SIZE) {
        for (name, value) in &feature.properties {
            let observed = value.column_type();
            let slot = inferred.entry(name.clone()).or_insert(None);
            *slot = match (*slot, observed) {
                (None, next) => next,
                (prev, None) => prev,
                (Some(prev), Some(next)) => Some(prev.widen(next)),
            };
        }
    }

    inferred
        .into_iter()
        .map(|(name, column_type)| ColumnDef {
            name,
            column_type: column_type.unwrap_or(ColumnType::Text),
        })
        .collect()
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) | Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
    }
}

/// The geometry column type for these features: their uniform kind, or the
/// generic `GEOMETRY` when kinds are mixed or absent.
#[must_use]
pub fn detect_geometry_type(features: &[Feature]) -> String {
    let mut detected: Option<&'static str> = None;
    for geometry in features.iter().filter_map(|f| f.geometry.as_ref()) {
        let kind = geometry_kind(geometry);
        match detected {
            None => detected = Some(kind),
            Some(existing) if existing == kind => {},
            Some(_) => return "GEOMETRY".to_string(),
        }
    }
    detected.unwrap_or("GEOMETRY").to_string()
}

/// Picks a name for the synthesized key column that does not collide with
/// an attribute, following the tool's `-N` suffix convention.
fn synthesize_key_name(columns: &[ColumnDef]) -> String {
    let taken = |name: &str| columns.iter().any(|c| c.name == name);
    if !taken("id") {
        return "id".to_string();
    }
    let mut i = 1;
    loop {
        let candidate = format!("id-{i}");
        if !taken(&candidate) {
            return candidate;
        }
        i += 1;
    }
}

/// Resolves the destination table schema for one import run.
///
/// # Errors
///
/// Fails when the source has no features, when a requested primary-key
/// column is absent from some feature, or when the geometry-type override
/// is not a known SpatiaLite type.
pub fn resolve_schema(
    features: &[Feature],
    table: &str,
    source_srid: i32,
    options: &ImportOptions,
    source_label: &str,
) -> Result<TableSchema, SchemaError> {
    if features.is_empty() {
        return Err(SchemaError::EmptySource {
            path: source_label.to_string(),
        });
    }

    let columns = infer_columns(features);

    for column in &options.primary_key {
        let everywhere = features
            .iter()
            .all(|feature| feature.properties.contains_key(column));
        if !everywhere {
            return Err(SchemaError::PrimaryKeyNotFound {
                column: column.clone(),
            });
        }
    }

    let geometry_type = match &options.geometry_type {
        Some(requested) => {
            let upper = requested.to_ascii_uppercase();
            if !GEOMETRY_TYPES.contains(&upper.as_str()) {
                return Err(SchemaError::UnknownGeometryType {
                    value: requested.clone(),
                });
            }
            upper
        },
        None => detect_geometry_type(features),
    };

    let synthesized_key = if options.primary_key.is_empty() {
        Some(synthesize_key_name(&columns))
    } else {
        None
    };

    Ok(TableSchema {
        table: table.to_string(),
        columns,
        primary_key: options.primary_key.clone(),
        synthesized_key,
        geometry_column: "geometry".to_string(),
        geometry_type,
        srid: options.target_srid(),
        source_srid,
    })
}

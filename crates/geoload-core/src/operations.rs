//! Import operations composing reader, schema resolver, and writer.
//!
//! The public entry points [`import_geojson`] and [`import_shapefile`]
//! wire the concrete reader for their format to the SpatiaLite backend.
//! [`import_features`] is the generic composition underneath them,
//! parameterized over both seams so alternate readers and backends can be
//! substituted.

use std::path::Path;

use log::info;
use rusqlite::Connection;

use geoload_core_common::{FeatureReader, GeometryBackend};
use geoload_geojson::GeoJsonReader;
use geoload_shapefile::ShapefileReader;
use geoload_shared::SpatialFormatReadError;
use geoload_spatialite::{Spatialite, load_features, open_spatialite};

use crate::drivers::{detect_driver, get_driver_names};
use crate::error::{ConfigError, DataImportError, Result};
use crate::schema::{detect_geometry_type, infer_columns, resolve_schema};
use crate::types::{DatasetInfo, FieldInfo, ImportOptions, ImportSummary};
use crate::utils::filename_to_table_name;

fn validate_options(options: &ImportOptions) -> Result<()> {
    let target = options.target_srid();
    if target <= 0 {
        return Err(ConfigError::InvalidSrid { value: target }.into());
    }
    if let Some(source) = options.source_srid
        && source <= 0
    {
        return Err(ConfigError::InvalidSrid { value: source }.into());
    }
    Ok(())
}

/// Runs one import through an arbitrary reader and geometry backend.
///
/// Returns only once the transaction has committed; any stage failure
/// propagates as [`DataImportError`] and leaves the destination unchanged.
///
/// # Errors
///
/// Fails on invalid options, unreadable or undecodable sources, a source
/// whose CRS cannot be determined, schema resolution failures, and every
/// database-side failure described in [`geoload_spatialite`].
pub fn import_features<R: FeatureReader, B: GeometryBackend>(
    conn: &mut Connection,
    backend: &B,
    reader: &R,
    source: &Path,
    table: &str,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    validate_options(options)?;

    info!("Starting import:");
    info!("Source: {} (Driver: {})", source.display(), reader.format_name());
    info!("Destination table: {table}");

    backend.initialize(conn)?;

    let set = reader.read_features(source)?;
    info!("Read {} feature(s)", set.features.len());

    let source_srid = options.source_srid.or(set.source_srid).ok_or_else(|| {
        DataImportError::Source(SpatialFormatReadError::MissingSidecar {
            path: source.with_extension("prj"),
        })
    })?;

    let schema = resolve_schema(
        &set.features,
        table,
        source_srid,
        options,
        &source.display().to_string(),
    )?;

    let features = load_features(conn, backend, &schema, &set.features, options.write_mode)?;

    info!("Import complete: {features} feature(s) into '{table}'");
    Ok(ImportSummary {
        table: table.to_string(),
        features,
    })
}

fn open_destination(sqlite_db: &Path, options: &ImportOptions) -> Result<Connection> {
    Ok(open_spatialite(
        sqlite_db,
        options.spatialite_extension.as_deref(),
    )?)
}

/// Loads a `GeoJSON` file into a SpatiaLite database.
///
/// The destination table defaults to the source file stem; see
/// [`ImportOptions`] for the remaining knobs.
///
/// # Errors
///
/// Returns [`DataImportError`] as described on [`import_features`].
pub fn import_geojson(
    sqlite_db: &Path,
    geojson_file: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    let table = options
        .table_name
        .clone()
        .unwrap_or_else(|| filename_to_table_name(geojson_file));
    let mut conn = open_destination(sqlite_db, options)?;
    import_features(
        &mut conn,
        &Spatialite::new(),
        &GeoJsonReader::new(),
        geojson_file,
        &table,
        options,
    )
}

/// Loads an ESRI Shapefile into a SpatiaLite database.
///
/// The `.shx` and `.dbf` sidecars must accompany the `.shp` file, and the
/// source CRS must be derivable from a `.prj` sidecar unless
/// [`ImportOptions::source_srid`] overrides it.
///
/// # Errors
///
/// Returns [`DataImportError`] as described on [`import_features`].
pub fn import_shapefile(
    sqlite_db: &Path,
    shp_file: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    let table = options
        .table_name
        .clone()
        .unwrap_or_else(|| filename_to_table_name(shp_file));
    let mut conn = open_destination(sqlite_db, options)?;
    import_features(
        &mut conn,
        &Spatialite::new(),
        &ShapefileReader::new(),
        shp_file,
        &table,
        options,
    )
}

/// Describes a source dataset without importing it.
///
/// The driver is picked from the file extension; the features are read and
/// run through the same schema inference an import would use.
///
/// # Errors
///
/// Fails when no read-capable driver claims the file, or when the file
/// cannot be read.
pub fn dataset_info(source: &Path) -> Result<DatasetInfo> {
    let driver = detect_driver(source).ok_or_else(|| ConfigError::UnsupportedSource {
        path: source.display().to_string(),
        available: get_driver_names().join(", "),
    })?;

    let set = match driver.short_name {
        "ESRI Shapefile" => ShapefileReader::new().read_features(source)?,
        _ => GeoJsonReader::new().read_features(source)?,
    };

    let fields = infer_columns(&set.features)
        .into_iter()
        .map(|column| FieldInfo {
            name: column.name,
            data_type: column.column_type.to_string(),
        })
        .collect();

    Ok(DatasetInfo {
        dataset: source.display().to_string(),
        driver: driver.short_name.to_string(),
        driver_long_name: driver.long_name.to_string(),
        crs: set.source_srid.map(|srid| format!("EPSG:{srid}")),
        geometry_type: detect_geometry_type(&set.features),
        feature_count: set.features.len(),
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_valid_geojson(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("valid.geojson");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"type":"FeatureCollection","features":[
  {{"type":"Feature","id":1,"geometry":{{"type":"Point","coordinates":[102.0,0.5]}},"properties":{{"prop0":"string"}}}},
  {{"type":"Feature","id":2,"geometry":{{"type":"LineString","coordinates":[[102.0,0.0],[103.0,1.0]]}},"properties":{{"prop0":"string","prop1":0}}}},
  {{"type":"Feature","id":3,"geometry":{{"type":"Polygon","coordinates":[[[100.0,0.0],[101.0,0.0],[101.0,1.0],[100.0,1.0],[100.0,0.0]]]}},"properties":{{"prop0":"string","prop1":7}}}}
]}}"#
        )
        .unwrap();
        path
    }

    #[test]
    fn invalid_srid_is_rejected() {
        let options = ImportOptions {
            srid: Some(0),
            ..ImportOptions::default()
        };
        let err = validate_options(&options).unwrap_err();
        assert!(matches!(
            err,
            DataImportError::Config(ConfigError::InvalidSrid { value: 0 })
        ));
    }

    #[test]
    fn invalid_source_srid_is_rejected() {
        let options = ImportOptions {
            source_srid: Some(-1),
            ..ImportOptions::default()
        };
        assert!(validate_options(&options).is_err());
    }

    #[test]
    fn default_options_validate() {
        assert!(validate_options(&ImportOptions::default()).is_ok());
    }

    #[test]
    fn dataset_info_for_geojson() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_valid_geojson(dir.path());

        let info = dataset_info(&path).unwrap();
        assert_eq!(info.driver, "GeoJSON");
        assert_eq!(info.feature_count, 3);
        assert_eq!(info.crs.as_deref(), Some("EPSG:4326"));
        // Mixed point/line/polygon features fall back to generic GEOMETRY.
        assert_eq!(info.geometry_type, "GEOMETRY");

        let names: Vec<&str> = info.fields.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"prop0"));
        assert!(names.contains(&"prop1"));
        assert!(names.contains(&"id"));
    }

    #[test]
    fn dataset_info_rejects_unknown_formats() {
        let err = dataset_info(Path::new("mystery.xyz")).unwrap_err();
        assert!(matches!(
            err,
            DataImportError::Config(ConfigError::UnsupportedSource { .. })
        ));
    }
}

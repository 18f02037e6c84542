//! File-level Shapefile reading.

use std::convert::TryInto;
use std::path::{Path, PathBuf};

use log::debug;
use shapefile::Shape;

use geoload_core_common::{Feature, FeatureReader, FeatureSet};
use geoload_shared::{SourcePosition, SpatialFormatReadError};

use crate::fields::record_to_properties;
use crate::prj::epsg_from_wkt;

/// Reads ESRI Shapefiles into the common feature representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapefileReader;

impl ShapefileReader {
    /// Creates a new reader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Locates a sidecar of `path` with the given lower-case extension,
/// accepting the upper-case spelling some producers use.
fn find_sidecar(path: &Path, extension: &str) -> Option<PathBuf> {
    let lower = path.with_extension(extension);
    if lower.is_file() {
        return Some(lower);
    }
    let upper = path.with_extension(extension.to_ascii_uppercase());
    if upper.is_file() {
        return Some(upper);
    }
    None
}

fn require_sidecar(path: &Path, extension: &str) -> Result<PathBuf, SpatialFormatReadError> {
    find_sidecar(path, extension).ok_or_else(|| SpatialFormatReadError::MissingSidecar {
        path: path.with_extension(extension),
    })
}

/// Reads the `.prj` sidecar and derives the source SRID from it.
///
/// Returns `None` when the sidecar is absent or its WKT does not resolve to
/// an EPSG code; the import layer decides whether that is fatal.
fn detect_source_srid(path: &Path) -> Option<i32> {
    let prj = find_sidecar(path, "prj")?;
    let wkt = std::fs::read_to_string(&prj).ok()?;
    let srid = epsg_from_wkt(&wkt);
    if srid.is_none() {
        debug!("Could not derive an EPSG code from {}", prj.display());
    }
    srid
}

fn convert_shape(
    shape: Shape,
    record: u64,
    context: &str,
) -> Result<Option<geo_types::Geometry<f64>>, SpatialFormatReadError> {
    match shape {
        Shape::NullShape => Ok(None),
        other => other
            .try_into()
            .map(Some)
            .map_err(|err| SpatialFormatReadError::Parse {
                message: format!("Failed to convert shape: {err}"),
                position: Some(SourcePosition {
                    record: Some(record),
                    ..SourcePosition::default()
                }),
                context: Some(context.to_string()),
            }),
    }
}

impl FeatureReader for ShapefileReader {
    fn format_name(&self) -> &'static str {
        "ESRI Shapefile"
    }

    fn read_features(&self, path: &Path) -> Result<FeatureSet, SpatialFormatReadError> {
        let context = path.display().to_string();

        if !path.is_file() {
            return Err(SpatialFormatReadError::Io {
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                context: Some(context),
            });
        }

        // The geometry file alone is not a usable source.
        require_sidecar(path, "shx")?;
        require_sidecar(path, "dbf")?;

        let source_srid = detect_source_srid(path);

        let mut reader =
            shapefile::Reader::from_path(path).map_err(|err| SpatialFormatReadError::Parse {
                message: format!("Failed to open shapefile: {err}"),
                position: None,
                context: Some(context.clone()),
            })?;

        let mut features = Vec::new();
        for (idx, shape_record) in reader.iter_shapes_and_records().enumerate() {
            let record_number = (idx + 1) as u64;
            let (shape, record) =
                shape_record.map_err(|err| SpatialFormatReadError::Parse {
                    message: format!("Failed to read shape record: {err}"),
                    position: Some(SourcePosition {
                        record: Some(record_number),
                        ..SourcePosition::default()
                    }),
                    context: Some(context.clone()),
                })?;

            let geometry = convert_shape(shape, record_number, &context)?;
            features.push(Feature::new(geometry, record_to_properties(record)));
        }

        debug!(
            "Read {} shapefile record(s) from {} (srid: {:?})",
            features.len(),
            path.display(),
            source_srid
        );

        Ok(FeatureSet {
            features,
            source_srid,
        })
    }
}

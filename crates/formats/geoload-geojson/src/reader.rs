//! File-level `GeoJSON` reading.

use std::path::Path;

use log::debug;

use geoload_core_common::{FeatureReader, FeatureSet};
use geoload_shared::SpatialFormatReadError;

use crate::parser::parse_geojson_bytes;

/// SRID of every `GeoJSON` source (RFC 7946 fixes the CRS to WGS84).
pub const GEOJSON_SRID: i32 = 4326;

/// Reads `GeoJSON` files into the common feature representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonReader;

impl GeoJsonReader {
    /// Creates a new reader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FeatureReader for GeoJsonReader {
    fn format_name(&self) -> &'static str {
        "GeoJSON"
    }

    fn read_features(&self, path: &Path) -> Result<FeatureSet, SpatialFormatReadError> {
        let context = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| SpatialFormatReadError::Io {
            source,
            context: Some(context.clone()),
        })?;

        let features = parse_geojson_bytes(&bytes, context)?;
        debug!("Read {} GeoJSON feature(s) from {}", features.len(), path.display());

        Ok(FeatureSet {
            features,
            source_srid: Some(GEOJSON_SRID),
        })
    }
}

//! `GeoJSON` reader for the `GeoLoad` import pipeline.
//!
//! Accepts a `FeatureCollection`, a single `Feature`, a bare geometry, or a
//! newline-delimited sequence of any of those, and produces the common
//! [`Feature`](geoload_core_common::Feature) representation. `GeoJSON`
//! coordinates are WGS84 by definition, so the reader always reports a
//! source SRID of 4326.

mod parser;
mod reader;

pub use parser::parse_geojson_bytes;
pub use reader::{GEOJSON_SRID, GeoJsonReader};

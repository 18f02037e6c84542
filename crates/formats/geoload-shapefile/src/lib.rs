//! ESRI Shapefile reader for the `GeoLoad` import pipeline.
//!
//! A Shapefile is a multi-file format: the `.shp` geometry file travels
//! with an `.shx` index, a `.dbf` attribute table, and (usually) a `.prj`
//! sidecar describing the coordinate system. This reader refuses to import
//! a source with missing `.shx`/`.dbf` sidecars rather than silently
//! producing malformed output, and derives the source SRID from the `.prj`
//! when one is present.

mod fields;
mod prj;
mod reader;

pub use prj::epsg_from_wkt;
pub use reader::ShapefileReader;

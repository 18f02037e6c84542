//! Driver registry for the formats `GeoLoad` knows about.
//!
//! The registry is modeled after GDAL's driver system, scoped to what an
//! importer needs: which formats can be read, which can be written, and
//! which file extensions identify them. The capability vocabulary lives in
//! `geoload-core-common`; this module holds the concrete entries and the
//! lookup helpers.
//!
//! # Examples
//!
//! ```
//! use geoload_core::drivers::{find_driver, get_available_drivers};
//!
//! let geojson = find_driver("GeoJSON").expect("GeoJSON driver should exist");
//! assert!(geojson.capabilities.read.is_supported());
//!
//! for driver in get_available_drivers() {
//!     println!("{}: {}", driver.short_name, driver.long_name);
//! }
//! ```

use std::path::Path;

pub use geoload_core_common::{Driver, DriverCapabilities, SupportStatus};

/// Returns the complete registry of known drivers, regardless of support
/// status.
#[must_use]
pub fn get_drivers() -> Vec<Driver> {
    use SupportStatus::{NotSupported, Planned, Supported};

    vec![
        // Input formats
        Driver::new(
            "GeoJSON",
            "GeoJSON",
            &["geojson", "json"],
            Supported,
            Supported,
            NotSupported,
        ),
        Driver::new(
            "GeoJSONSeq",
            "GeoJSONSeq: sequence of GeoJSON features",
            &["geojsonl", "geojsons", "ndjson"],
            Supported,
            Supported,
            NotSupported,
        ),
        Driver::new(
            "ESRI Shapefile",
            "ESRI Shapefile / DBF",
            &["shp"],
            Supported,
            Supported,
            NotSupported,
        ),
        // Destination
        Driver::new(
            "SQLite",
            "SQLite / SpatiaLite",
            &["db", "sqlite"],
            NotSupported,
            NotSupported,
            Supported,
        ),
        // Formats worth taking next
        Driver::new(
            "GPKG",
            "GeoPackage vector",
            &["gpkg"],
            Planned,
            Planned,
            NotSupported,
        ),
        Driver::new(
            "FlatGeobuf",
            "FlatGeobuf",
            &["fgb"],
            Planned,
            Planned,
            NotSupported,
        ),
        Driver::new(
            "CSV",
            "Comma Separated Value (.csv)",
            &["csv"],
            Planned,
            Planned,
            NotSupported,
        ),
        // Out of scope
        Driver::new(
            "GML",
            "Geography Markup Language",
            &["gml"],
            NotSupported,
            NotSupported,
            NotSupported,
        ),
        Driver::new(
            "KML",
            "Keyhole Markup Language",
            &["kml", "kmz"],
            NotSupported,
            NotSupported,
            NotSupported,
        ),
        Driver::new(
            "GPX",
            "GPS Exchange Format",
            &["gpx"],
            NotSupported,
            NotSupported,
            NotSupported,
        ),
    ]
}

/// Returns all drivers that have at least one fully supported operation.
#[must_use]
pub fn get_available_drivers() -> Vec<Driver> {
    get_drivers()
        .into_iter()
        .filter(|d| d.capabilities.has_supported_operation())
        .collect()
}

/// Finds a driver by its short name (case-insensitive).
#[must_use]
pub fn find_driver(name: &str) -> Option<Driver> {
    get_drivers()
        .into_iter()
        .find(|d| d.short_name.eq_ignore_ascii_case(name))
}

/// Picks the read-capable driver that claims the file's extension.
#[must_use]
pub fn detect_driver(path: &Path) -> Option<Driver> {
    let extension = path.extension()?.to_str()?;
    get_drivers()
        .into_iter()
        .filter(|d| d.capabilities.read.is_supported())
        .find(|d| d.matches_extension(extension))
}

/// Returns all driver short names in alphabetically sorted order.
#[must_use]
pub fn get_driver_names() -> Vec<&'static str> {
    let mut names: Vec<_> = get_drivers().iter().map(|d| d.short_name).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_driver() {
        let driver = find_driver("GeoJSON");
        assert!(driver.is_some());
        assert_eq!(driver.unwrap().short_name, "GeoJSON");
    }

    #[test]
    fn test_find_driver_case_insensitive() {
        let driver = find_driver("esri shapefile");
        assert!(driver.is_some());
        assert_eq!(driver.unwrap().short_name, "ESRI Shapefile");
    }

    #[test]
    fn test_available_drivers() {
        let drivers = get_available_drivers();
        assert!(drivers.iter().any(|d| d.short_name == "GeoJSON"));
        assert!(drivers.iter().any(|d| d.short_name == "ESRI Shapefile"));
        assert!(drivers.iter().any(|d| d.short_name == "SQLite"));
        assert!(!drivers.iter().any(|d| d.short_name == "GPKG"));
    }

    #[test]
    fn test_detect_driver_by_extension() {
        assert_eq!(
            detect_driver(Path::new("data/roads.shp")).unwrap().short_name,
            "ESRI Shapefile"
        );
        assert_eq!(
            detect_driver(Path::new("data/ROADS.GEOJSON")).unwrap().short_name,
            "GeoJSON"
        );
        // The destination format is not a readable source.
        assert!(detect_driver(Path::new("data/roads.db")).is_none());
        assert!(detect_driver(Path::new("data/roads.gml")).is_none());
        assert!(detect_driver(Path::new("no-extension")).is_none());
    }

    #[test]
    fn test_driver_names_are_sorted() {
        let names = get_driver_names();
        assert!(names.contains(&"GeoJSON"));
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}

//! Driver registry types for geospatial format support and capabilities.
//!
//! `GeoLoad` keeps a small registry of format drivers, modeled after GDAL's
//! driver system: each driver declares whether it can describe (`info`),
//! read, or write a format. The registry itself lives in `geoload-core`;
//! this module holds the vocabulary so format crates can name capabilities
//! without depending on the core crate.

/// Support status for a specific driver operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportStatus {
    /// The feature is fully supported and implemented.
    Supported,
    /// The feature is not supported by the driver.
    NotSupported,
    /// The feature is planned for future implementation.
    Planned,
}

impl SupportStatus {
    /// Returns `true` if the operation is fully supported and implemented.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(self, SupportStatus::Supported)
    }

    /// Returns the string representation of this support status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SupportStatus::Supported => "Supported",
            SupportStatus::NotSupported => "Not Supported",
            SupportStatus::Planned => "Planned",
        }
    }
}

/// Capabilities supported by a geospatial format driver.
#[derive(Debug, Clone, Copy)]
pub struct DriverCapabilities {
    /// Support status for describing a dataset without importing it.
    pub info: SupportStatus,
    /// Support status for reading features from this format.
    pub read: SupportStatus,
    /// Support status for writing features into this format.
    pub write: SupportStatus,
}

impl DriverCapabilities {
    /// Returns `true` if at least one operation is fully supported and implemented.
    #[must_use]
    pub fn has_supported_operation(&self) -> bool {
        self.info.is_supported() || self.read.is_supported() || self.write.is_supported()
    }
}

/// Geospatial format driver definition.
///
/// A driver represents support for a specific format (e.g., `GeoJSON`,
/// `ESRI Shapefile`, `SQLite/SpatiaLite`). Each driver has a short name used
/// in the CLI, a descriptive long name, the set of file extensions it claims,
/// and its capabilities.
#[derive(Debug, Clone)]
pub struct Driver {
    /// Short name used in the CLI and for driver identification (e.g., `"GeoJSON"`).
    pub short_name: &'static str,
    /// Long descriptive name for display purposes.
    pub long_name: &'static str,
    /// Lower-case file extensions claimed by this driver, without the dot.
    pub extensions: &'static [&'static str],
    /// Operations supported by this driver (info, read, write).
    pub capabilities: DriverCapabilities,
}

impl Driver {
    /// Creates a new driver definition with specified capabilities.
    #[must_use]
    pub const fn new(
        short_name: &'static str,
        long_name: &'static str,
        extensions: &'static [&'static str],
        info: SupportStatus,
        read: SupportStatus,
        write: SupportStatus,
    ) -> Self {
        Self {
            short_name,
            long_name,
            extensions,
            capabilities: DriverCapabilities { info, read, write },
        }
    }

    /// Returns `true` when this driver claims the given file extension.
    #[must_use]
    pub fn matches_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_status_predicates() {
        assert!(SupportStatus::Supported.is_supported());
        assert!(!SupportStatus::NotSupported.is_supported());
        assert!(!SupportStatus::Planned.is_supported());
    }

    #[test]
    fn support_status_labels() {
        assert_eq!(SupportStatus::Supported.as_str(), "Supported");
        assert_eq!(SupportStatus::NotSupported.as_str(), "Not Supported");
        assert_eq!(SupportStatus::Planned.as_str(), "Planned");
    }

    #[test]
    fn capabilities_supported_operation() {
        let caps = DriverCapabilities {
            info: SupportStatus::Planned,
            read: SupportStatus::Supported,
            write: SupportStatus::NotSupported,
        };
        assert!(caps.has_supported_operation());

        let caps = DriverCapabilities {
            info: SupportStatus::Planned,
            read: SupportStatus::Planned,
            write: SupportStatus::NotSupported,
        };
        assert!(!caps.has_supported_operation());
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let driver = Driver::new(
            "GeoJSON",
            "GeoJSON",
            &["geojson", "json"],
            SupportStatus::Supported,
            SupportStatus::Supported,
            SupportStatus::NotSupported,
        );
        assert!(driver.matches_extension("GeoJSON"));
        assert!(driver.matches_extension("json"));
        assert!(!driver.matches_extension("shp"));
    }
}

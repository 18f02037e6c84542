//! Coordinate system detection from `.prj` sidecars.
//!
//! A `.prj` file holds the CRS as WKT. OGC-style WKT carries explicit
//! `AUTHORITY["EPSG","nnnn"]` nodes; ESRI-style WKT often does not, so a
//! handful of common CRS names are recognized as a fallback.

/// Extracts an EPSG code from CRS WKT.
///
/// The outermost (last) `AUTHORITY` node wins, which for projected CRS WKT
/// is the code of the projection itself rather than its datum. Returns
/// `None` when no code can be derived.
#[must_use]
pub fn epsg_from_wkt(wkt: &str) -> Option<i32> {
    let upper = wkt.to_ascii_uppercase();

    if let Some(start) = upper.rfind("AUTHORITY[\"EPSG\"") {
        let rest = &upper[start..];
        let digits: String = rest
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(code) = digits.parse() {
            return Some(code);
        }
    }

    // ESRI WKT fallback: well-known names without AUTHORITY nodes.
    if upper.contains("BRITISH_NATIONAL_GRID") {
        return Some(27700);
    }
    if upper.contains("WEB_MERCATOR") || upper.contains("PSEUDO-MERCATOR") {
        return Some(3857);
    }
    if upper.contains("WGS_1984") || upper.contains("WGS 84") {
        return Some(4326);
    }

    None
}

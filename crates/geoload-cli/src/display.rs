//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and formatting functions
//! for presenting dataset and driver information in a human-readable
//! format.

use tabled::{Table, Tabled};

use geoload_core::types::DatasetInfo;

/// Table row representation for displaying field/column information.
#[derive(Tabled)]
pub struct FieldRow {
    /// Name of the field.
    #[tabled(rename = "Field")]
    pub name: String,
    /// Inferred SQL type of the field.
    #[tabled(rename = "Type")]
    pub data_type: String,
}

/// Table row representation for displaying driver information.
#[derive(Tabled)]
pub struct DriverRow {
    /// Short identifier for the driver (e.g., `GeoJSON`).
    #[tabled(rename = "Short Name")]
    pub short_name: String,
    /// Full descriptive name of the driver format.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// Support status for describing a dataset.
    #[tabled(rename = "Info")]
    pub info: String,
    /// Support status for reading data from this format.
    #[tabled(rename = "Read")]
    pub read: String,
    /// Support status for writing data to this format.
    #[tabled(rename = "Write")]
    pub write: String,
}

/// Display dataset information in a formatted table.
///
/// Presents the driver, CRS, geometry type, feature count, and the field
/// schema an import would infer, written to standard output.
pub fn display_dataset_info(info: &DatasetInfo) {
    println!("\nDataset: {}", info.dataset);
    println!("Driver: {} ({})", info.driver, info.driver_long_name);
    println!(
        "CRS: {}",
        info.crs.clone().unwrap_or_else(|| "unknown".to_string())
    );
    println!("Geometry type: {}", info.geometry_type);
    println!("Features: {}", info.feature_count);

    if !info.fields.is_empty() {
        println!("\n=== Fields ===");

        let field_rows: Vec<FieldRow> = info
            .fields
            .iter()
            .map(|f| FieldRow {
                name: f.name.clone(),
                data_type: f.data_type.clone(),
            })
            .collect();

        let field_table = Table::new(field_rows).to_string();
        println!("{field_table}");
    }
}

//! The SpatiaLite implementation of the geometry backend seam.

use anyhow::{Result, bail};
use rusqlite::Connection;
use rusqlite::params;

use geoload_core_common::{GeometryBackend, TableSchema};

use crate::table::quote_ident;

/// SpatiaLite geometry capabilities: metadata initialization,
/// `AddGeometryColumn`, WKT decoding with optional `ST_Transform`,
/// `CreateSpatialIndex`, and the drop-side bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spatialite;

impl Spatialite {
    /// Creates the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GeometryBackend for Spatialite {
    fn initialize(&self, conn: &Connection) -> Result<()> {
        // spatial_ref_sys only exists once InitSpatialMetadata has run for
        // this database file.
        if conn
            .prepare("SELECT srid FROM spatial_ref_sys LIMIT 1")
            .is_err()
        {
            conn.query_row("SELECT InitSpatialMetadata(1)", [], |_| Ok(()))?;
        }
        Ok(())
    }

    fn add_geometry_column(&self, conn: &Connection, schema: &TableSchema) -> Result<()> {
        let result: i64 = conn.query_row(
            "SELECT AddGeometryColumn(?1, ?2, ?3, ?4, 2)",
            params![
                schema.table,
                schema.geometry_column,
                schema.srid,
                schema.geometry_type
            ],
            |row| row.get(0),
        )?;
        if result != 1 {
            bail!(
                "AddGeometryColumn failed for table '{}' (type {}, srid {})",
                schema.table,
                schema.geometry_type,
                schema.srid
            );
        }
        Ok(())
    }

    fn geometry_value_expr(&self, schema: &TableSchema) -> String {
        if schema.needs_transform() {
            format!(
                "ST_Transform(ST_GeomFromText(?, {}), {})",
                schema.source_srid, schema.srid
            )
        } else {
            format!("ST_GeomFromText(?, {})", schema.srid)
        }
    }

    fn create_spatial_index(&self, conn: &Connection, table: &str, column: &str) -> Result<()> {
        let result: i64 = conn.query_row(
            "SELECT CreateSpatialIndex(?1, ?2)",
            params![table, column],
            |row| row.get(0),
        )?;
        if result != 1 {
            bail!("CreateSpatialIndex failed for '{table}.{column}'");
        }
        Ok(())
    }

    fn drop_table(&self, conn: &Connection, table: &str, column: &str) -> Result<()> {
        // The table may predate this tool and carry no geometry metadata,
        // so the bookkeeping calls are best-effort.
        let _ = conn.query_row(
            "SELECT DisableSpatialIndex(?1, ?2)",
            params![table, column],
            |_| Ok(()),
        );
        let _ = conn.query_row(
            "SELECT DiscardGeometryColumn(?1, ?2)",
            params![table, column],
            |_| Ok(()),
        );
        conn.execute(
            &format!(
                "DROP TABLE IF EXISTS {}",
                quote_ident(&format!("idx_{table}_{column}"))
            ),
            [],
        )?;
        conn.execute(&format!("DROP TABLE {}", quote_ident(table)), [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoload_core_common::{ColumnDef, ColumnType};

    fn schema(srid: i32, source_srid: i32) -> TableSchema {
        TableSchema {
            table: "places".to_string(),
            columns: vec![ColumnDef {
                name: "name".to_string(),
                column_type: ColumnType::Text,
            }],
            primary_key: Vec::new(),
            synthesized_key: Some("id".to_string()),
            geometry_column: "geometry".to_string(),
            geometry_type: "POINT".to_string(),
            srid,
            source_srid,
        }
    }

    #[test]
    fn value_expr_without_transform() {
        let expr = Spatialite::new().geometry_value_expr(&schema(4326, 4326));
        assert_eq!(expr, "ST_GeomFromText(?, 4326)");
    }

    #[test]
    fn value_expr_with_transform() {
        let expr = Spatialite::new().geometry_value_expr(&schema(27700, 4326));
        assert_eq!(expr, "ST_Transform(ST_GeomFromText(?, 4326), 27700)");
    }
}

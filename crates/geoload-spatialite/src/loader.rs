//! Transactional feature loading.

use geozero::ToWkt;
use log::info;
use rusqlite::Connection;

use geoload_core_common::{Feature, GeometryBackend, TableSchema, Value, WriteMode};

use crate::error::StoreError;
use crate::table::{prepare_table, quote_ident};

/// Builds the prepared-statement SQL for one import run.
///
/// Attribute parameters come first, in schema order; the geometry WKT is
/// the final parameter, wrapped in the backend's value expression.
fn insert_sql(backend: &impl GeometryBackend, schema: &TableSchema) -> String {
    let mut columns: Vec<String> = schema.columns.iter().map(|c| quote_ident(&c.name)).collect();
    let mut values: Vec<String> = schema.columns.iter().map(|_| "?".to_string()).collect();

    columns.push(quote_ident(&schema.geometry_column));
    values.push(backend.geometry_value_expr(schema));

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(&schema.table),
        columns.join(", "),
        values.join(", ")
    )
}

/// Writes the feature sequence into the destination table.
///
/// The write mode is applied, every feature is inserted through one
/// prepared statement, and a spatial index is built, all within a single
/// transaction: the destination only ever observes the complete import or
/// none of it. Records are validated against the schema as they stream
/// through; an attribute name outside the schema aborts the run.
///
/// # Errors
///
/// Returns the first [`StoreError`] encountered; the transaction is rolled
/// back in that case.
pub fn load_features(
    conn: &mut Connection,
    backend: &impl GeometryBackend,
    schema: &TableSchema,
    features: &[Feature],
    mode: WriteMode,
) -> Result<usize, StoreError> {
    let tx = conn.transaction()?;

    prepare_table(&tx, backend, schema, mode)?;

    let sql = insert_sql(backend, schema);
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(&sql)?;
        for (idx, feature) in features.iter().enumerate() {
            let record = idx + 1;

            for attribute in feature.properties.keys() {
                if schema.column_index(attribute).is_none() {
                    return Err(StoreError::UnknownAttribute {
                        record,
                        attribute: attribute.clone(),
                    });
                }
            }

            let mut row: Vec<Value> = schema
                .columns
                .iter()
                .map(|column| {
                    feature
                        .properties
                        .get(&column.name)
                        .cloned()
                        .unwrap_or(Value::Null)
                })
                .collect();

            row.push(match &feature.geometry {
                Some(geometry) => {
                    Value::Text(geometry.to_wkt().map_err(|err| StoreError::Geometry {
                        record,
                        message: err.to_string(),
                    })?)
                },
                None => Value::Null,
            });

            stmt.execute(rusqlite::params_from_iter(row))?;
            inserted += 1;
        }
    }

    backend.create_spatial_index(&tx, &schema.table, &schema.geometry_column)?;
    tx.commit()?;

    info!(
        "Loaded {inserted} feature(s) into table '{}' ({mode} mode)",
        schema.table
    );
    Ok(inserted)
}

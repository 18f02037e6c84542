//! Destination table DDL and write-mode enforcement.

use rusqlite::Connection;

use geoload_core_common::{GeometryBackend, TableSchema, WriteMode};

use crate::error::StoreError;

/// Quotes an identifier for embedding in SQL, escaping embedded quotes.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Returns `true` when a table with the given name exists.
///
/// # Errors
///
/// Returns an error when the catalog query fails.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Declared `(name, type)` pairs of an existing table, in definition order.
fn existing_columns(conn: &Connection, table: &str) -> Result<Vec<(String, String)>, StoreError> {
    let sql = format!("PRAGMA table_info({})", quote_ident(table));
    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Builds the `CREATE TABLE` statement for the attribute columns.
///
/// The geometry column is not part of the statement; it is registered
/// afterwards through the backend.
fn create_table_sql(schema: &TableSchema) -> String {
    let mut columns = Vec::new();

    if let Some(key) = &schema.synthesized_key {
        // INTEGER PRIMARY KEY aliases the rowid, so SQLite assigns
        // monotonically increasing ids without the loader binding one.
        columns.push(format!("{} INTEGER PRIMARY KEY", quote_ident(key)));
    }

    for column in &schema.columns {
        let mut definition = format!(
            "{} {}",
            quote_ident(&column.name),
            column.column_type.as_sql()
        );
        if schema.primary_key.len() == 1 && schema.primary_key[0] == column.name {
            definition.push_str(" PRIMARY KEY");
        }
        columns.push(definition);
    }

    if schema.primary_key.len() > 1 {
        let key_list: Vec<String> = schema.primary_key.iter().map(|c| quote_ident(c)).collect();
        columns.push(format!("PRIMARY KEY ({})", key_list.join(", ")));
    }

    format!(
        "CREATE TABLE {} (\n  {}\n)",
        quote_ident(&schema.table),
        columns.join(",\n  ")
    )
}

fn create_table(
    conn: &Connection,
    backend: &impl GeometryBackend,
    schema: &TableSchema,
) -> Result<(), StoreError> {
    conn.execute(&create_table_sql(schema), [])?;
    backend.add_geometry_column(conn, schema)?;
    Ok(())
}

/// Checks that an existing table can receive this schema's rows.
///
/// Policy: the table must expose exactly the incoming attribute columns
/// (plus the synthesized key, if any) with the same declared types, and a
/// column named after the schema's geometry column. The geometry column's
/// declared type is left to the backend, which enforces it on insert.
fn validate_append(conn: &Connection, schema: &TableSchema) -> Result<(), StoreError> {
    let existing = existing_columns(conn, &schema.table)?;
    let mismatch = |reason: String| StoreError::AppendMismatch {
        table: schema.table.clone(),
        reason,
    };

    let mut expected: Vec<(&str, &str)> = Vec::new();
    if let Some(key) = &schema.synthesized_key {
        expected.push((key.as_str(), "INTEGER"));
    }
    for column in &schema.columns {
        expected.push((column.name.as_str(), column.column_type.as_sql()));
    }

    for (name, expected_type) in &expected {
        match existing.iter().find(|(n, _)| n.as_str() == *name) {
            None => {
                return Err(mismatch(format!("table has no column '{name}'")));
            },
            Some((_, actual_type)) if !actual_type.eq_ignore_ascii_case(expected_type) => {
                return Err(mismatch(format!(
                    "column '{name}' is {actual_type}, incoming data needs {expected_type}"
                )));
            },
            Some(_) => {},
        }
    }

    if !existing
        .iter()
        .any(|(name, _)| *name == schema.geometry_column)
    {
        return Err(mismatch(format!(
            "table has no geometry column '{}'",
            schema.geometry_column
        )));
    }

    for (name, _) in &existing {
        let known = *name == schema.geometry_column
            || expected
                .iter()
                .any(|(expected_name, _)| *expected_name == name.as_str());
        if !known {
            return Err(mismatch(format!(
                "table has extra column '{name}' not present in the incoming data"
            )));
        }
    }

    Ok(())
}

/// Applies the write mode: creates, replaces, or validates the destination
/// table so that inserts can follow.
///
/// # Errors
///
/// Returns [`StoreError::TableExists`] for `create` onto an existing
/// table, [`StoreError::AppendMismatch`] for an incompatible `append`, or
/// the underlying SQL/backend error.
pub fn prepare_table(
    conn: &Connection,
    backend: &impl GeometryBackend,
    schema: &TableSchema,
    mode: WriteMode,
) -> Result<(), StoreError> {
    let exists = table_exists(conn, &schema.table)?;
    match mode {
        WriteMode::Create => {
            if exists {
                return Err(StoreError::TableExists {
                    table: schema.table.clone(),
                });
            }
            create_table(conn, backend, schema)
        },
        WriteMode::Overwrite => {
            if exists {
                backend.drop_table(conn, &schema.table, &schema.geometry_column)?;
            }
            create_table(conn, backend, schema)
        },
        WriteMode::Append => {
            if exists {
                validate_append(conn, schema)
            } else {
                create_table(conn, backend, schema)
            }
        },
    }
}

//! Write-mode behavior of the feature loader, exercised through a plain
//! SQLite backend so the suite runs without the native SpatiaLite module.

use anyhow::Result;
use indexmap::IndexMap;
use rusqlite::Connection;

use geoload_core_common::{
    ColumnDef, ColumnType, Feature, GeometryBackend, TableSchema, Value, WriteMode,
};
use geoload_spatialite::{StoreError, load_features, quote_ident, table_exists};

/// Stores geometries as WKT text; indexing and metadata are no-ops.
struct TextBackend;

impl GeometryBackend for TextBackend {
    fn initialize(&self, _conn: &Connection) -> Result<()> {
        Ok(())
    }

    fn add_geometry_column(&self, conn: &Connection, schema: &TableSchema) -> Result<()> {
        conn.execute(
            &format!(
                "ALTER TABLE {} ADD COLUMN {} TEXT",
                quote_ident(&schema.table),
                quote_ident(&schema.geometry_column)
            ),
            [],
        )?;
        Ok(())
    }

    fn geometry_value_expr(&self, _schema: &TableSchema) -> String {
        "?".to_string()
    }

    fn create_spatial_index(&self, _conn: &Connection, _table: &str, _column: &str) -> Result<()> {
        Ok(())
    }

    fn drop_table(&self, conn: &Connection, table: &str, _column: &str) -> Result<()> {
        conn.execute(&format!("DROP TABLE {}", quote_ident(table)), [])?;
        Ok(())
    }
}

fn schema() -> TableSchema {
    TableSchema {
        table: "points".to_string(),
        columns: vec![
            ColumnDef {
                name: "prop0".to_string(),
                column_type: ColumnType::Text,
            },
            ColumnDef {
                name: "prop1".to_string(),
                column_type: ColumnType::Integer,
            },
        ],
        primary_key: Vec::new(),
        synthesized_key: Some("id".to_string()),
        geometry_column: "geometry".to_string(),
        geometry_type: "POINT".to_string(),
        srid: 4326,
        source_srid: 4326,
    }
}

fn point_feature(x: f64, y: f64, prop1: Option<i64>) -> Feature {
    let mut properties = IndexMap::new();
    properties.insert("prop0".to_string(), Value::Text("string".to_string()));
    match prop1 {
        Some(v) => properties.insert("prop1".to_string(), Value::Integer(v)),
        None => properties.insert("prop1".to_string(), Value::Null),
    };
    Feature::new(
        Some(geo_types::Geometry::Point(geo_types::Point::new(x, y))),
        properties,
    )
}

fn features() -> Vec<Feature> {
    vec![
        point_feature(102.0, 0.5, None),
        point_feature(103.0, 1.0, Some(0)),
        point_feature(100.0, 0.0, Some(7)),
    ]
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(
        &format!("SELECT count(*) FROM {}", quote_ident(table)),
        [],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn create_inserts_all_features() {
    let mut conn = Connection::open_in_memory().unwrap();
    let count =
        load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Create).unwrap();

    assert_eq!(count, 3);
    assert_eq!(row_count(&conn, "points"), 3);

    // The synthesized key is monotonically increasing.
    let ids: Vec<i64> = conn
        .prepare("SELECT id FROM points ORDER BY id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn create_fails_when_table_exists_and_leaves_it_unchanged() {
    let mut conn = Connection::open_in_memory().unwrap();
    load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Create).unwrap();

    let err = load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Create)
        .unwrap_err();
    assert!(matches!(err, StoreError::TableExists { .. }));
    assert_eq!(row_count(&conn, "points"), 3);
}

#[test]
fn overwrite_discards_previous_rows() {
    let mut conn = Connection::open_in_memory().unwrap();
    load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Create).unwrap();

    let replacement = vec![point_feature(10.0, 10.0, Some(1))];
    let count = load_features(
        &mut conn,
        &TextBackend,
        &schema(),
        &replacement,
        WriteMode::Overwrite,
    )
    .unwrap();

    assert_eq!(count, 1);
    assert_eq!(row_count(&conn, "points"), 1);
}

#[test]
fn append_accumulates_rows() {
    let mut conn = Connection::open_in_memory().unwrap();
    load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Create).unwrap();
    load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Append).unwrap();

    assert_eq!(row_count(&conn, "points"), 6);
}

#[test]
fn append_creates_the_table_when_absent() {
    let mut conn = Connection::open_in_memory().unwrap();
    load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Append).unwrap();

    assert_eq!(row_count(&conn, "points"), 3);
}

#[test]
fn append_rejects_incompatible_table() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute("CREATE TABLE points (id INT)", []).unwrap();
    conn.execute("INSERT INTO points VALUES (99)", []).unwrap();

    let err = load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Append)
        .unwrap_err();
    assert!(matches!(err, StoreError::AppendMismatch { .. }));

    // The prior contents are untouched.
    assert_eq!(row_count(&conn, "points"), 1);
}

#[test]
fn append_rejects_column_type_drift() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute(
        "CREATE TABLE points (id INTEGER PRIMARY KEY, prop0 TEXT, prop1 TEXT, geometry TEXT)",
        [],
    )
    .unwrap();

    let err = load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Append)
        .unwrap_err();
    match err {
        StoreError::AppendMismatch { reason, .. } => {
            assert!(reason.contains("prop1"));
        },
        other => panic!("Expected AppendMismatch, got {other}"),
    }
}

#[test]
fn append_rejects_extra_columns() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute(
        "CREATE TABLE points (id INTEGER PRIMARY KEY, prop0 TEXT, prop1 INTEGER, bonus TEXT, geometry TEXT)",
        [],
    )
    .unwrap();

    let err = load_features(&mut conn, &TextBackend, &schema(), &features(), WriteMode::Append)
        .unwrap_err();
    match err {
        StoreError::AppendMismatch { reason, .. } => {
            assert!(reason.contains("bonus"));
        },
        other => panic!("Expected AppendMismatch, got {other}"),
    }
}

#[test]
fn failed_import_rolls_back_entirely() {
    let mut conn = Connection::open_in_memory().unwrap();

    // The second record carries an attribute outside the schema; the whole
    // import must vanish, including the table created for it.
    let mut bad_properties = IndexMap::new();
    bad_properties.insert("prop0".to_string(), Value::Text("x".to_string()));
    bad_properties.insert("intruder".to_string(), Value::Integer(1));
    let batch = vec![point_feature(1.0, 1.0, Some(1)), Feature::new(None, bad_properties)];

    let err =
        load_features(&mut conn, &TextBackend, &schema(), &batch, WriteMode::Create).unwrap_err();
    assert!(matches!(err, StoreError::UnknownAttribute { record: 2, .. }));
    assert!(!table_exists(&conn, "points").unwrap());
}

#[test]
fn missing_attributes_insert_as_null() {
    let mut conn = Connection::open_in_memory().unwrap();

    let mut sparse = IndexMap::new();
    sparse.insert("prop0".to_string(), Value::Text("only".to_string()));
    let batch = vec![Feature::new(None, sparse)];

    load_features(&mut conn, &TextBackend, &schema(), &batch, WriteMode::Create).unwrap();

    let prop1: Option<i64> = conn
        .query_row("SELECT prop1 FROM points", [], |row| row.get(0))
        .unwrap();
    assert_eq!(prop1, None);
    let geometry: Option<String> = conn
        .query_row("SELECT geometry FROM points", [], |row| row.get(0))
        .unwrap();
    assert_eq!(geometry, None);
}

#[test]
fn user_primary_key_is_declared() {
    let mut conn = Connection::open_in_memory().unwrap();
    let schema = TableSchema {
        primary_key: vec!["prop1".to_string()],
        synthesized_key: None,
        ..schema()
    };

    load_features(
        &mut conn,
        &TextBackend,
        &schema,
        &[point_feature(1.0, 2.0, Some(5))],
        WriteMode::Create,
    )
    .unwrap();

    let pk_flag: i64 = conn
        .query_row(
            "SELECT pk FROM pragma_table_info('points') WHERE name = 'prop1'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(pk_flag, 1);
}

#[test]
fn composite_primary_key_is_declared() {
    let mut conn = Connection::open_in_memory().unwrap();
    let schema = TableSchema {
        primary_key: vec!["prop0".to_string(), "prop1".to_string()],
        synthesized_key: None,
        ..schema()
    };

    load_features(
        &mut conn,
        &TextBackend,
        &schema,
        &[point_feature(1.0, 2.0, Some(5))],
        WriteMode::Create,
    )
    .unwrap();

    let pk_columns: Vec<(String, i64)> = conn
        .prepare("SELECT name, pk FROM pragma_table_info('points') WHERE pk > 0 ORDER BY pk")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        pk_columns,
        vec![("prop0".to_string(), 1), ("prop1".to_string(), 2)]
    );
}

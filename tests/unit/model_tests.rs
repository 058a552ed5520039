//! Unit tests for result normalization
//!
//! These tests parse small scripts end to end and check the normalized
//! entities rather than the raw statement trees.

use pretty_assertions::assert_eq;
use rust_ddlparser::{parse_ddl, DdlError, ParseOptions};
use serde_json::{json, Value};

fn parse(sql: &str) -> Vec<Value> {
    match parse_ddl(sql, &ParseOptions::default()) {
        Ok(Value::Array(entities)) => entities,
        other => panic!("Expected entity list, got {:?}", other),
    }
}

fn column_names(table: &Value) -> Vec<&str> {
    table["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Table Shape Tests
// ============================================================================

#[test]
fn test_table_always_has_required_keys() {
    let entities = parse("CREATE TABLE t (a INT)");
    let table = entities[0].as_object().unwrap();
    for key in [
        "columns",
        "primary_key",
        "alter",
        "checks",
        "index",
        "partitioned_by",
        "tablespace",
    ] {
        assert!(table.contains_key(key), "missing key {}", key);
    }
    assert_eq!(table["alter"], json!({}));
    assert_eq!(table["tablespace"], Value::Null);
    assert!(!table.contains_key("constraints"));
}

#[test]
fn test_primary_key_scenario() {
    let entities = parse("CREATE TABLE t (x INT, y VARCHAR(255), PRIMARY KEY (x))");
    let table = &entities[0];
    assert_eq!(table["primary_key"], json!(["x"]));
    assert_eq!(table["columns"][0]["nullable"], json!(false));
    assert_eq!(table["columns"][1]["size"], json!(255));
    assert!(table["columns"][0].get("primary_key").is_none());
}

#[test]
fn test_primary_key_invariant() {
    let scripts = [
        "CREATE TABLE a (id INT PRIMARY KEY, b INT NULL)",
        "CREATE TABLE a (id INT, b INT, CONSTRAINT pk PRIMARY KEY (id, b))",
        "CREATE TABLE a (id INT CONSTRAINT pk PRIMARY KEY NULL, b INT)",
        "CREATE TABLE [dbo].[a] ([id] INT NOT NULL, PRIMARY KEY CLUSTERED ([id]))",
    ];
    for sql in scripts {
        let entities = parse(sql);
        let table = &entities[0];
        let names = column_names(table);
        let primary_key = table["primary_key"].as_array().unwrap();
        assert!(!primary_key.is_empty(), "no primary key for {}", sql);
        for key in primary_key {
            let key = key.as_str().unwrap();
            assert!(names.contains(&key), "{} not a column in {}", key, sql);
            let column = table["columns"]
                .as_array()
                .unwrap()
                .iter()
                .find(|c| c["name"] == key)
                .unwrap();
            assert_eq!(column["nullable"], json!(false), "{} nullable in {}", key, sql);
        }
    }
}

#[test]
fn test_named_constraints() {
    let entities = parse(
        "CREATE TABLE orders (\n\
           id INT,\n\
           customer_id INT,\n\
           CONSTRAINT pk_orders PRIMARY KEY (id),\n\
           CONSTRAINT fk_customer FOREIGN KEY (customer_id) REFERENCES customers (id) ON DELETE CASCADE\n\
         )",
    );
    let constraints = &entities[0]["constraints"];
    assert_eq!(
        constraints["primary_keys"],
        json!([{"constraint_name": "pk_orders", "columns": ["id"]}])
    );
    assert_eq!(
        constraints["references"][0],
        json!({
            "constraint_name": "fk_customer",
            "fk_columns": ["customer_id"],
            "table": "customers",
            "schema": null,
            "columns": ["id"],
            "on_delete": "CASCADE",
            "on_update": null,
            "deferrable_initially": null
        })
    );
    assert_eq!(entities[0]["primary_key"], json!(["id"]));
}

#[test]
fn test_column_reference_shape() {
    let entities = parse("CREATE TABLE b (a_id INT REFERENCES a)");
    assert_eq!(
        entities[0]["columns"][0]["references"],
        json!({
            "table": "a",
            "schema": null,
            "column": null,
            "on_delete": null,
            "on_update": null,
            "deferrable_initially": null
        })
    );
}

#[test]
fn test_column_check_joined() {
    let entities = parse("CREATE TABLE t (name TEXT CHECK (LENGTH(name) > 0))");
    assert_eq!(entities[0]["columns"][0]["check"], "LENGTH(name) > 0");
}

#[test]
fn test_encode_only_column_has_null_type() {
    let entities = parse("CREATE TABLE t (a ENCODE zstd, b ARRAY)");
    let columns = &entities[0]["columns"];
    assert_eq!(columns[0]["type"], Value::Null);
    assert_eq!(columns[0]["encode"], "zstd");
    assert_eq!(columns[1]["type"], "[]");
}

// ============================================================================
// Cross-statement Tests
// ============================================================================

#[test]
fn test_alter_foreign_key_shape() {
    let entities = parse(
        "CREATE TABLE parent (id INT);\n\
         CREATE TABLE child (parent_id INT);\n\
         ALTER TABLE child ADD CONSTRAINT fk_parent FOREIGN KEY (parent_id) REFERENCES parent (id);",
    );
    assert_eq!(
        entities[1]["alter"],
        json!({
            "columns": [{
                "name": "parent_id",
                "constraint_name": "fk_parent",
                "references": {"column": "id", "table": "parent", "schema": null}
            }]
        })
    );
}

#[test]
fn test_alter_before_create_is_unresolved() {
    let err = parse_ddl(
        "ALTER TABLE t ADD FOREIGN KEY (c) REFERENCES r (x);\nCREATE TABLE t (c INT);",
        &ParseOptions::default(),
    )
    .unwrap_err();
    match err {
        DdlError::UnresolvedReference { table, schema } => {
            assert_eq!(table, "t");
            assert_eq!(schema, None);
        }
        other => panic!("Expected unresolved reference, got {:?}", other),
    }
}

#[test]
fn test_alter_schema_must_match() {
    let result = parse_ddl(
        "CREATE TABLE s.t (c INT);\nALTER TABLE t ADD UNIQUE (c);",
        &ParseOptions::default(),
    );
    assert!(matches!(result, Err(DdlError::UnresolvedReference { .. })));
}

#[test]
fn test_index_detailed_columns() {
    let entities = parse("CREATE TABLE t (a INT, b INT);\nCREATE UNIQUE INDEX idx ON t (a DESC, b);");
    let index = &entities[0]["index"][0];
    assert_eq!(index["index_name"], "idx");
    assert_eq!(index["unique"], json!(true));
    assert_eq!(index["columns"], json!(["a", "b"]));
    assert_eq!(
        index["detailed_columns"],
        json!([
            {"name": "a", "order": "DESC", "nulls": "LAST"},
            {"name": "b", "order": "ASC", "nulls": "LAST"}
        ])
    );
}

#[test]
fn test_drop_table_after_create() {
    let entities = parse("CREATE TABLE t (a INT);\nDROP TABLE IF EXISTS t;\nCREATE TABLE t (b INT);");
    assert_eq!(entities.len(), 1);
    assert_eq!(column_names(&entities[0]), vec!["b"]);
}

// ============================================================================
// Other Entity Tests
// ============================================================================

#[test]
fn test_sequence_entity() {
    let entities = parse("CREATE SEQUENCE dev.seq INCREMENT BY 2 START WITH 10 CACHE 5");
    assert_eq!(
        entities[0],
        json!({
            "schema": "dev",
            "sequence_name": "seq",
            "increment": 2,
            "start": 10,
            "cache": 5
        })
    );
}

#[test]
fn test_domain_entity() {
    let entities = parse("CREATE DOMAIN us_zip AS VARCHAR(10) NOT NULL CHECK (VALUE <> '')");
    assert_eq!(
        entities[0],
        json!({
            "schema": null,
            "domain_name": "us_zip",
            "base_type": "VARCHAR",
            "properties": {"size": 10, "nullable": false, "check": "VALUE <> ''"}
        })
    );
}

#[test]
fn test_tablespace_entity() {
    let entities = parse("CREATE BIGFILE TABLESPACE ts DATAFILE 'ts.dbf' SIZE 10M");
    assert_eq!(entities[0]["tablespace_name"], "ts");
    assert_eq!(entities[0]["type"], "BIGFILE");
    assert_eq!(entities[0]["properties"]["DATAFILE"], "'ts.dbf'");
    assert_eq!(entities[0]["properties"]["SIZE"], "10M");
}

#[test]
fn test_set_property_entity() {
    let entities = parse("SET ANSI_NULLS ON\nCREATE TABLE t (a INT)");
    assert_eq!(entities[0], json!({"name": "ANSI_NULLS", "value": "ON"}));
}

//! Dialect scripts parsed end to end with grouped output

use pretty_assertions::assert_eq;
use rust_ddlparser::OutputMode;
use serde_json::{json, Value};

use crate::common::{parse_flat, parse_grouped};

#[test]
fn test_bigquery_dataset_in_output() {
    let result = parse_grouped("CREATE TABLE mydataset.newtable ( x INT64 )", OutputMode::BigQuery);
    assert_eq!(
        result,
        json!({
            "tables": [{
                "dataset": "mydataset",
                "table_name": "newtable",
                "columns": [{
                    "name": "x",
                    "type": "INT64",
                    "size": null,
                    "references": null,
                    "unique": false,
                    "nullable": true,
                    "default": null,
                    "check": null
                }],
                "primary_key": [],
                "alter": {},
                "checks": [],
                "index": [],
                "partitioned_by": [],
                "tablespace": null
            }],
            "sequences": [],
            "types": [],
            "domains": [],
            "schemas": [],
            "ddl_properties": []
        })
    );
}

#[test]
fn test_bigquery_project_and_table_clauses() {
    let sql = r#"
    CREATE SCHEMA IF NOT EXISTS project.calender
    OPTIONS (
    location="project-location"
    );
    CREATE TABLE project_id.calender.REF_CALENDAR (
    calendar_dt DATE,
    calendar_dt_id INT
    )
    OPTIONS (
    description="Calendar table"
    )
    PARTITION BY DATETIME_TRUNC(calendar_dt, DAY)
    CLUSTER BY calendar_dt
    "#;
    let result = parse_grouped(sql, OutputMode::BigQuery);

    let schema = &result["schemas"][0];
    assert_eq!(schema["schema_name"], "calender");
    assert_eq!(schema["project"], "project");
    assert_eq!(
        schema["properties"],
        json!({"options": [{"location": "\"project-location\""}]})
    );

    let table = &result["tables"][0];
    assert_eq!(table["project"], "project_id");
    assert_eq!(table["dataset"], "calender");
    assert!(table.get("schema").is_none());
    assert_eq!(table["table_name"], "REF_CALENDAR");
    assert_eq!(table["options"], json!([{"description": "\"Calendar table\""}]));
    assert_eq!(
        table["partition_by"],
        json!({"columns": ["calendar_dt", "DAY"], "type": "DATETIME_TRUNC"})
    );
    assert_eq!(table["cluster_by"], json!(["calendar_dt"]));
}

#[test]
fn test_schema_options_scenario() {
    let result = parse_grouped(
        "CREATE SCHEMA IF NOT EXISTS name OPTIONS (location=\"path\")",
        OutputMode::Generic,
    );
    assert_eq!(
        result,
        json!({
            "tables": [],
            "sequences": [],
            "types": [],
            "domains": [],
            "schemas": [{
                "schema_name": "name",
                "properties": {"options": [{"location": "\"path\""}]}
            }],
            "ddl_properties": []
        })
    );
}

#[test]
fn test_column_options() {
    let sql = r#"
    CREATE TABLE mydataset.newtable
    (
    x INT64 OPTIONS(description="An optional INTEGER field")
    )
    OPTIONS(
    expiration_timestamp="2023-01-01 00:00:00 UTC",
    description="a table that expires in 2023",
    )
    "#;
    let result = parse_grouped(sql, OutputMode::Generic);
    let table = &result["tables"][0];
    assert_eq!(table["schema"], "mydataset");
    assert_eq!(
        table["columns"][0]["options"],
        json!([{"description": "\"An optional INTEGER field\""}])
    );
    assert_eq!(
        table["options"],
        json!([
            {"expiration_timestamp": "\"2023-01-01 00:00:00 UTC\""},
            {"description": "\"a table that expires in 2023\""}
        ])
    );
}

#[test]
fn test_redshift_table() {
    let sql = "CREATE TABLE sales (\n\
                 id INTEGER ENCODE az64 DISTKEY,\n\
                 sold_at TIMESTAMP\n\
               )\n\
               DISTSTYLE KEY\n\
               COMPOUND SORTKEY (sold_at, id);";
    let result = parse_grouped(sql, OutputMode::Redshift);
    let table = &result["tables"][0];
    assert_eq!(table["diststyle"], "KEY");
    assert_eq!(table["distkey"], Value::Null);
    assert_eq!(table["sortkey"], json!({"type": "COMPOUND", "keys": ["sold_at", "id"]}));
    assert_eq!(table["columns"][0]["encode"], "az64");
    assert_eq!(table["columns"][0]["distkey"], json!(true));
    assert_eq!(table["columns"][1]["encode"], Value::Null);
}

#[test]
fn test_generic_mode_omits_redshift_defaults() {
    let result = parse_grouped("CREATE TABLE t (a INT)", OutputMode::Generic);
    let table = result["tables"][0].as_object().unwrap();
    assert!(!table.contains_key("diststyle"));
    assert!(!table["columns"][0].as_object().unwrap().contains_key("encode"));
}

#[test]
fn test_snowflake_clone() {
    let result = parse_grouped(
        "CREATE OR REPLACE TRANSIENT TABLE db.t2 CLONE db.t1;",
        OutputMode::Snowflake,
    );
    let table = &result["tables"][0];
    assert_eq!(table["replace"], json!(true));
    assert_eq!(table["transient"], json!(true));
    assert_eq!(table["clone"], json!({"schema": "db", "table_name": "t1"}));
}

#[test]
fn test_unknown_mode_name_is_generic() {
    let sql = "CREATE TABLE d.t (a INT)";
    assert_eq!(
        parse_grouped(sql, OutputMode::from_name("oracle")),
        parse_grouped(sql, OutputMode::Generic)
    );
}

#[test]
fn test_mssql_script() {
    let sql = "SET ANSI_NULLS ON\n\
               GO\n\
               CREATE TABLE [dbo].[Users] (\n\
                 [Id] INT IDENTITY(1,1) NOT NULL,\n\
                 [Name] NVARCHAR(MAX) NULL,\n\
                 CONSTRAINT [PK_Users] PRIMARY KEY CLUSTERED ([Id] ASC)\n\
               )\n\
               GO\n\
               ALTER TABLE [dbo].[Users] ADD CONSTRAINT [DF_Name] DEFAULT ('none') FOR [Name]\n\
               GO\n";
    let result = parse_grouped(sql, OutputMode::Generic);
    assert_eq!(result["ddl_properties"], json!([{"name": "ANSI_NULLS", "value": "ON"}]));

    let table = &result["tables"][0];
    assert_eq!(table["schema"], "[dbo]");
    assert_eq!(table["primary_key"], json!(["[Id]"]));
    assert_eq!(table["columns"][0]["identity"], json!({"seed": 1, "increment": 1}));
    assert_eq!(table["columns"][1]["size"], "max");
    assert_eq!(
        table["alter"]["defaults"],
        json!([{"constraint_name": "[DF_Name]", "column": "[Name]", "value": "'none'"}])
    );
}

#[test]
fn test_postgres_types_and_sequences() {
    let sql = "CREATE TYPE mood AS ENUM ('sad', 'ok');\n\
               CREATE SEQUENCE public.user_id_seq START 1;\n\
               CREATE TABLE public.users (\n\
                 id INTEGER DEFAULT nextval('public.user_id_seq') NOT NULL,\n\
                 current_mood mood,\n\
                 tags TEXT[]\n\
               );";
    let result = parse_grouped(sql, OutputMode::Generic);
    assert_eq!(
        result["types"],
        json!([{
            "schema": null,
            "type_name": "mood",
            "base_type": "ENUM",
            "properties": {"values": ["'sad'", "'ok'"]}
        }])
    );
    assert_eq!(result["sequences"][0]["sequence_name"], "user_id_seq");

    let columns = &result["tables"][0]["columns"];
    assert_eq!(columns[0]["default"], "nextval('public.user_id_seq')");
    assert_eq!(columns[0]["nullable"], json!(false));
    assert_eq!(columns[2]["type"], "TEXT[]");
}

#[test]
fn test_flat_output_keeps_declaration_order() {
    let entities = parse_flat(
        "CREATE SCHEMA s;\nCREATE TABLE s.a (x INT);\nCREATE DOMAIN d AS INT;\nCREATE TABLE s.b (y INT);",
    );
    let names: Vec<Option<&str>> = entities
        .iter()
        .map(|e| {
            e.get("table_name")
                .or_else(|| e.get("schema_name"))
                .or_else(|| e.get("domain_name"))
                .and_then(Value::as_str)
        })
        .collect();
    assert_eq!(names, vec![Some("s"), Some("a"), Some("d"), Some("b")]);
}

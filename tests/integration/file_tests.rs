//! File parsing and schema dump tests

use rust_ddlparser::files::{collect_sql_files, parse_sql_files};
use rust_ddlparser::{parse_files, DdlError, OutputMode, ParseFilesOptions, ParseOptions};
use serde_json::json;

use crate::common::TestContext;

fn grouped() -> ParseOptions {
    ParseOptions {
        group_by_type: true,
        output_mode: OutputMode::Generic,
    }
}

#[test]
fn test_dump_one_file_per_input() {
    let ctx = TestContext::new();
    let users = ctx.write_sql("ddl/users.sql", "CREATE TABLE users (id INT PRIMARY KEY);");
    ctx.write_sql("ddl/nested/orders.sql", "CREATE TABLE orders (id INT);");

    let options = ParseFilesOptions {
        inputs: vec![users, ctx.dir.join("ddl").join("nested")],
        dump_dir: Some(ctx.dir.join("out")),
        parse: grouped(),
    };
    let parsed = parse_files(&options).unwrap();
    assert_eq!(parsed.len(), 2);

    let users = ctx.read_json("out/users_schema.json");
    assert_eq!(users["tables"][0]["table_name"], "users");
    assert_eq!(users["tables"][0]["primary_key"], json!(["id"]));

    let orders = ctx.read_json("out/orders_schema.json");
    assert_eq!(orders["tables"][0]["table_name"], "orders");
}

#[test]
fn test_parallel_parse_matches_sequential() {
    let ctx = TestContext::new();
    for i in 0..12 {
        ctx.write_sql(
            &format!("scripts/t{:02}.sql", i),
            &format!("CREATE TABLE t{} (id INT, name VARCHAR({}))", i, i + 1),
        );
    }
    let files = collect_sql_files(&[ctx.dir.join("scripts")]);
    assert_eq!(files.len(), 12);

    let parallel = parse_sql_files(&files, &grouped()).unwrap();
    let sequential: Vec<_> = files
        .chunks(1)
        .map(|chunk| parse_sql_files(chunk, &grouped()).unwrap().remove(0))
        .collect();

    for (a, b) in parallel.iter().zip(&sequential) {
        assert_eq!(a.path, b.path);
        assert_eq!(a.result, b.result);
    }
    assert_eq!(parallel[3].result["tables"][0]["columns"][1]["size"], json!(4));
}

#[test]
fn test_broken_file_fails_whole_run() {
    let ctx = TestContext::new();
    ctx.write_sql("good.sql", "CREATE TABLE a (x INT);");
    let bad = ctx.write_sql("bad.sql", "CREATE TABLE b (x INT");

    let err = parse_sql_files(&[bad], &grouped()).unwrap_err();
    assert!(matches!(err, DdlError::Syntax(_)));

    let options = ParseFilesOptions {
        inputs: vec![ctx.dir.clone()],
        dump_dir: None,
        parse: grouped(),
    };
    assert!(parse_files(&options).is_err());
}

//! Unit tests for the DDL grammar
//!
//! These tests drive the public parsing API and inspect the statement
//! trees it produces before normalization.

use rust_ddlparser::parser::ast::{
    AlterAction, DefaultValue, Size, Statement, TableElement, TypeBody,
};
use rust_ddlparser::{parse_statements, parse_tokens, DdlError, ParseOptions, Token, TokenKind};

fn statements(sql: &str) -> Vec<Statement> {
    parse_statements(sql).unwrap_or_else(|e| panic!("Failed to parse: {}\n{}", e, sql))
}

fn single(sql: &str) -> Statement {
    let mut parsed = statements(sql);
    assert_eq!(parsed.len(), 1, "Expected one statement from {}", sql);
    parsed.remove(0)
}

fn syntax_error(sql: &str) -> rust_ddlparser::SyntaxError {
    match parse_statements(sql) {
        Err(DdlError::Syntax(err)) => err,
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

// ============================================================================
// Statement Boundary Tests
// ============================================================================

#[test]
fn test_semicolon_separated_statements() {
    let parsed = statements("CREATE TABLE a (x INT); CREATE TABLE b (y INT);;");
    assert_eq!(parsed.len(), 2);
    assert!(parsed.iter().all(|s| s.kind() == "table"));
}

#[test]
fn test_newline_separated_statements() {
    let sql = "CREATE TABLE a (x INT)\nCREATE INDEX i ON a (x)\nALTER TABLE a ADD UNIQUE (x)";
    let kinds: Vec<&str> = statements(sql).iter().map(Statement::kind).collect();
    assert_eq!(kinds, vec!["table", "index", "alter"]);
}

#[test]
fn test_go_batch_separator() {
    let sql = "CREATE TABLE t1 (id INT)\nGO\nCREATE TABLE t2 (id INT)\ngo\n";
    assert_eq!(statements(sql).len(), 2);
}

#[test]
fn test_empty_script() {
    assert!(statements("").is_empty());
    assert!(statements("-- only a comment\n;").is_empty());
}

// ============================================================================
// Column Tests
// ============================================================================

#[test]
fn test_columns_in_declaration_order() {
    let Statement::Table(decl) = single("CREATE TABLE s.t (c1 INT, c2 VARCHAR(20), c3 DECIMAL(10, 2))") else {
        panic!("expected table");
    };
    let columns: Vec<(&str, &str, Option<Size>)> = decl
        .elements
        .iter()
        .filter_map(|e| match e {
            TableElement::Column(c) => Some((c.name.as_str(), c.data_type.text.as_str(), c.data_type.size)),
            _ => None,
        })
        .collect();
    assert_eq!(
        columns,
        vec![
            ("c1", "INT", None),
            ("c2", "VARCHAR", Some(Size::Int(20))),
            ("c3", "DECIMAL", Some(Size::Pair(10, 2))),
        ]
    );
}

#[test]
fn test_bigquery_struct_type() {
    let Statement::Table(decl) = single("CREATE TABLE d.t (y STRUCT<a ARRAY<STRING>,b BOOL>)") else {
        panic!("expected table");
    };
    let TableElement::Column(column) = &decl.elements[0] else {
        panic!("expected column");
    };
    assert_eq!(column.data_type.text, "STRUCT < a ARRAY < STRING >, b BOOL >");
}

#[test]
fn test_default_forms() {
    let Statement::Table(decl) = single(
        "CREATE TABLE t (\
         a INT DEFAULT 5, \
         b VARCHAR(10) DEFAULT 'x', \
         c INT DEFAULT nextval('seq'), \
         d INT DEFAULT NEXT VALUE FOR dbo.seq)",
    ) else {
        panic!("expected table");
    };
    let defaults: Vec<Option<DefaultValue>> = decl
        .elements
        .iter()
        .filter_map(|e| match e {
            TableElement::Column(c) => Some(c.default.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(defaults[0], Some(DefaultValue::Int(5)));
    assert_eq!(defaults[1], Some(DefaultValue::Text("'x'".to_string())));
    assert_eq!(defaults[2], Some(DefaultValue::Text("nextval('seq')".to_string())));
    assert_eq!(defaults[3], Some(DefaultValue::NextValueFor("dbo.seq".to_string())));
}

// ============================================================================
// Non-table Statement Tests
// ============================================================================

#[test]
fn test_alter_add_check() {
    let Statement::Alter(decl) =
        single("ALTER TABLE s.t ADD CONSTRAINT ck CHECK (LENGTH(name) > 0)")
    else {
        panic!("expected alter");
    };
    assert_eq!(decl.alter_table_name, "t");
    assert_eq!(decl.schema.as_deref(), Some("s"));
    let AlterAction::Check {
        constraint_name,
        statement,
    } = decl.action
    else {
        panic!("expected check");
    };
    assert_eq!(constraint_name.as_deref(), Some("ck"));
    assert_eq!(statement.join(" "), "LENGTH(name) > 0");
}

#[test]
fn test_create_type_enum() {
    let Statement::Type(decl) = single("CREATE TYPE status AS ENUM ('on', 'off')") else {
        panic!("expected type");
    };
    assert_eq!(decl.type_name, "status");
    assert!(matches!(decl.body, TypeBody::Enum(ref values) if values.len() == 2));
}

#[test]
fn test_create_sequence_and_tablespace() {
    let parsed = statements(
        "CREATE SEQUENCE seq START WITH 1 INCREMENT BY 1;\n\
         CREATE TEMPORARY TABLESPACE temp_ts;",
    );
    let Statement::Sequence(seq) = &parsed[0] else {
        panic!("expected sequence");
    };
    assert_eq!(seq.start, Some(1));
    let Statement::Tablespace(ts) = &parsed[1] else {
        panic!("expected tablespace");
    };
    assert_eq!(ts.tablespace_name, "temp_ts");
    assert!(ts.temporary);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_syntax_error_reports_position_and_productions() {
    let err = syntax_error("CREATE TABLE t (id INT,\n  name VARCHAR(10) 'oops')");
    assert_eq!(err.line, 2);
    assert_eq!(err.found.as_deref(), Some("'oops'"));
    assert_eq!(err.expected, vec!["create_table"]);
    assert!(err.statement.starts_with("CREATE TABLE t("));
}

#[test]
fn test_unknown_statement_lists_all_productions() {
    let err = syntax_error("SELECT 1");
    assert_eq!(err.line, 1);
    assert_eq!(err.column, 1);
    assert!(err.expected.contains(&"create_table"));
    assert!(err.expected.contains(&"alter_table"));
}

#[test]
fn test_mismatched_bracket_in_options_is_syntax_error() {
    let err = syntax_error("CREATE SCHEMA s OPTIONS (k = (a]), b = 1)");
    assert_eq!((err.line, err.column), (1, 32));
    assert_eq!(err.found.as_deref(), Some("]"));
}

#[test]
fn test_malformed_statement_aborts_script() {
    let result = parse_statements("CREATE TABLE ok (a INT); CREATE TABLE bad (a INT");
    assert!(matches!(result, Err(DdlError::Syntax(_))));
}

// ============================================================================
// Token Input Tests
// ============================================================================

#[test]
fn test_pre_tokenized_input() {
    let punct = |text: &str, column: u64| Token::new(TokenKind::Punct, text, 1, column);
    let tokens = vec![
        Token::word("CREATE", 1, 1),
        Token::word("TABLE", 1, 8),
        Token::word("t", 1, 14),
        punct("(", 16),
        Token::word("a", 1, 17),
        Token::word("INT", 1, 19),
        punct(")", 22),
    ];
    let value = parse_tokens(tokens, &ParseOptions::default()).unwrap();
    assert_eq!(value[0]["table_name"], "t");
    assert_eq!(value[0]["columns"][0]["type"], "INT");
}

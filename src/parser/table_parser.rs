//! CREATE TABLE parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! CREATE [OR REPLACE] [EXTERNAL | TEMP | TEMPORARY | TRANSIENT | GLOBAL TEMPORARY]
//!     TABLE [IF NOT EXISTS] [project.][schema.]name
//!     ( column_definition | table_constraint | LIKE t | PERIOD FOR p (a, b) [, …] )
//!     [PARTITION BY (cols) | PARTITION BY fn(cols) | PARTITION BY col]
//!     [PARTITIONED BY (column_definition, …)]
//!     [CLUSTER BY (cols)]
//!     [OPTIONS (k = v, …)]
//!     [TABLESPACE name [properties]]
//!     [COMMENT [=] 'text']
//!     [DISTSTYLE style] [DISTKEY (col)] [[COMPOUND | INTERLEAVED] SORTKEY (cols)]
//!
//! CREATE TABLE t LIKE other
//! CREATE TABLE t (LIKE other)
//! CREATE TABLE t CLONE other
//! ```

use super::ast::{LikeSpec, PartitionBy, SortKey, Statement, TableDecl, TableElement};
use super::column_parser::parse_column_definition;
use super::constraint_parser::{parse_table_constraint, require_string};
use super::grammar::{is_create_of, Grammar};
use super::storage_parser::{parse_options, parse_tablespace_clause};
use super::token_parser_base::{ParseResult, TokenParser};
use super::tokens::tokens_to_text;

pub fn register(grammar: &mut Grammar) {
    grammar.register(
        "create_table",
        |base| is_create_of(base, "TABLE"),
        reduce_create_table,
    );
}

fn reduce_create_table(base: &mut TokenParser) -> ParseResult<Statement> {
    let mut decl = parse_table_header(base)?;

    if base.check_any_word_ci(&["LIKE", "CLONE"]) {
        decl.like = Some(parse_like(base)?);
    } else if base.check_punct("(") && base.peek_word_ci(1, "LIKE") {
        base.advance();
        decl.like = Some(parse_like(base)?);
        base.require_punct(")")?;
    } else if base.check_punct("(") {
        decl.elements = parse_table_elements(base)?;
    }

    while parse_table_clause(base, &mut decl)? {}

    Ok(Statement::Table(decl))
}

/// `CREATE [modifiers] TABLE [IF NOT EXISTS] name`
fn parse_table_header(base: &mut TokenParser) -> ParseResult<TableDecl> {
    base.require_word_ci("CREATE")?;
    let mut decl = TableDecl {
        replace: base.expect_words_ci(&["OR", "REPLACE"]),
        ..TableDecl::default()
    };

    loop {
        if base.expect_word_ci("EXTERNAL") {
            decl.external = true;
        } else if base.expect_word_ci("TEMP") || base.expect_word_ci("TEMPORARY") {
            decl.temp = true;
        } else if base.expect_word_ci("TRANSIENT") {
            decl.transient = true;
        } else if base.expect_word_ci("GLOBAL") || base.expect_word_ci("LOCAL") {
            continue;
        } else {
            break;
        }
    }

    base.require_word_ci("TABLE")?;
    decl.if_not_exists = base.expect_words_ci(&["IF", "NOT", "EXISTS"]);

    let mut parts = base.require_qualified_name()?;
    decl.table_name = parts.pop().unwrap_or_default();
    decl.schema = parts.pop();
    decl.project = parts.pop();
    if !parts.is_empty() {
        return Err(base.error("table name has too many parts"));
    }
    Ok(decl)
}

/// `LIKE [schema.]name` or `CLONE [schema.]name`
fn parse_like(base: &mut TokenParser) -> ParseResult<LikeSpec> {
    let clone = base.check_word_ci("CLONE");
    base.advance();
    let (schema, table_name) = base.require_schema_qualified_name()?;
    Ok(LikeSpec {
        schema,
        table_name,
        clone,
    })
}

/// Parse the parenthesized element list. A trailing comma is accepted.
fn parse_table_elements(base: &mut TokenParser) -> ParseResult<Vec<TableElement>> {
    base.require_punct("(")?;
    let mut elements = Vec::new();

    loop {
        if base.expect_punct(")") {
            return Ok(elements);
        }
        elements.push(parse_table_element(base)?);
        if !base.expect_punct(",") {
            base.require_punct(")")?;
            return Ok(elements);
        }
    }
}

fn parse_table_element(base: &mut TokenParser) -> ParseResult<TableElement> {
    if base.check_word_ci("PERIOD") && base.peek_word_ci(1, "FOR") {
        base.advance();
        base.advance();
        let name = base.require_identifier()?;
        let columns = base.require_name_list()?;
        return Ok(TableElement::Period { name, columns });
    }

    if base.check_word_ci("LIKE") {
        return Ok(TableElement::Like(parse_like(base)?));
    }

    if let Some(constraint) = parse_table_constraint(base)? {
        return Ok(TableElement::Constraint(constraint));
    }

    Ok(TableElement::Column(parse_column_definition(base)?))
}

/// Parse one clause following the table body.
///
/// Returns `false` when the current token does not start a table clause.
fn parse_table_clause(base: &mut TokenParser, decl: &mut TableDecl) -> ParseResult<bool> {
    if base.expect_words_ci(&["PARTITION", "BY"]) {
        decl.partition_by = Some(parse_partition_by(base)?);
    } else if base.expect_words_ci(&["PARTITIONED", "BY"]) {
        base.require_punct("(")?;
        loop {
            decl.partitioned_by.push(parse_column_definition(base)?);
            if !base.expect_punct(",") {
                break;
            }
        }
        base.require_punct(")")?;
    } else if base.expect_words_ci(&["CLUSTER", "BY"]) {
        decl.cluster_by = Some(parse_column_names(base)?);
    } else if base.check_word_ci("OPTIONS") {
        decl.options = Some(parse_options(base)?);
    } else if base.check_word_ci("TABLESPACE") {
        decl.tablespace = Some(parse_tablespace_clause(base)?);
    } else if base.expect_word_ci("COMMENT") {
        base.expect_punct("=");
        decl.comment = Some(require_string(base)?);
    } else if base.expect_word_ci("DISTSTYLE") {
        decl.diststyle = Some(base.require_identifier()?);
    } else if base.expect_word_ci("DISTKEY") {
        base.require_punct("(")?;
        decl.distkey = Some(base.require_identifier()?);
        base.require_punct(")")?;
    } else if base.check_any_word_ci(&["COMPOUND", "INTERLEAVED", "SORTKEY"]) {
        let kind = if base.check_word_ci("SORTKEY") {
            None
        } else {
            base.take_text()
        };
        base.require_word_ci("SORTKEY")?;
        let keys = base.require_name_list()?;
        decl.sortkey = Some(SortKey { kind, keys });
    } else {
        return Ok(false);
    }
    Ok(true)
}

/// `(cols)`, `fn(args)` or a bare column list
fn parse_partition_by(base: &mut TokenParser) -> ParseResult<PartitionBy> {
    if base.check_punct("(") {
        return Ok(PartitionBy {
            columns: base.require_name_list()?,
            kind: None,
        });
    }

    if base.check_identifier() && base.peek_punct(1, "(") {
        let kind = base.require_identifier()?;
        let args = base.require_parenthesized()?;
        let columns = args
            .split(|t| t.is_punct(","))
            .filter(|part| !part.is_empty())
            .map(tokens_to_text)
            .collect();
        return Ok(PartitionBy {
            columns,
            kind: Some(kind),
        });
    }

    Ok(PartitionBy {
        columns: parse_column_names(base)?,
        kind: None,
    })
}

/// `(a, b)` or `a, b`
fn parse_column_names(base: &mut TokenParser) -> ParseResult<Vec<String>> {
    if base.check_punct("(") {
        return base.require_name_list();
    }
    let mut names = vec![base.require_identifier()?];
    while base.expect_punct(",") {
        names.push(base.require_identifier()?);
    }
    Ok(names)
}

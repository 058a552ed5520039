//! CREATE INDEX parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! CREATE [UNIQUE] [CLUSTERED | NONCLUSTERED] INDEX [IF NOT EXISTS] name
//!     ON [schema.]table (col [ASC | DESC] [NULLS FIRST | NULLS LAST], …)
//! CREATE INDEX idx ON t (lower(email))
//! ```
//!
//! Each column's sort order and null ordering apply to that column only;
//! unspecified ones default to `ASC` and `LAST`.

use super::ast::{IndexColumn, IndexDecl, Statement};
use super::grammar::{is_create_of, Grammar};
use super::token_parser_base::{ParseResult, TokenParser};
use super::tokens::tokens_to_text;

pub fn register(grammar: &mut Grammar) {
    grammar.register(
        "create_index",
        |base| is_create_of(base, "INDEX"),
        reduce_create_index,
    );
}

fn reduce_create_index(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("CREATE")?;

    let mut unique = false;
    let mut clustered = false;
    loop {
        if base.expect_word_ci("UNIQUE") {
            unique = true;
        } else if base.expect_word_ci("CLUSTERED") {
            clustered = true;
        } else if !base.expect_word_ci("NONCLUSTERED") {
            break;
        }
    }

    base.require_word_ci("INDEX")?;
    base.expect_words_ci(&["IF", "NOT", "EXISTS"]);
    let index_name = base.require_identifier()?;
    base.require_word_ci("ON")?;
    let (schema, table_name) = base.require_schema_qualified_name()?;
    let columns = parse_index_columns(base)?;

    Ok(Statement::Index(IndexDecl {
        schema,
        table_name,
        index_name,
        unique,
        clustered,
        columns,
    }))
}

fn parse_index_columns(base: &mut TokenParser) -> ParseResult<Vec<IndexColumn>> {
    base.require_punct("(")?;
    let mut columns = Vec::new();

    loop {
        let mut name = base.require_identifier()?;
        if base.check_punct("(") {
            let args = base.require_parenthesized()?;
            name = format!("{}({})", name, tokens_to_text(&args));
        }

        let mut column = IndexColumn {
            name,
            order: "ASC".to_string(),
            nulls: "LAST".to_string(),
        };
        if base.expect_word_ci("DESC") {
            column.order = "DESC".to_string();
        } else {
            base.expect_word_ci("ASC");
        }
        if base.expect_word_ci("NULLS") {
            if base.expect_word_ci("FIRST") {
                column.nulls = "FIRST".to_string();
            } else {
                base.require_word_ci("LAST")?;
            }
        }
        columns.push(column);

        if !base.expect_punct(",") {
            base.require_punct(")")?;
            return Ok(columns);
        }
    }
}

//! Parsing for the small non-CREATE statements
//!
//! ## Supported Patterns
//!
//! DROP TABLE:
//! ```sql
//! DROP TABLE [IF EXISTS] [schema.]name [CASCADE | RESTRICT]
//! ```
//!
//! Session properties:
//! ```sql
//! SET ANSI_NULLS ON
//! SET search_path = public, extensions
//! SET client_encoding TO 'UTF8'
//! ```

use super::ast::{DropDecl, PropertyDecl, Statement};
use super::grammar::Grammar;
use super::token_parser_base::{ParseResult, TokenParser};
use super::tokens::is_boundary_word;

pub fn register(grammar: &mut Grammar) {
    grammar.register(
        "drop_table",
        |base| base.check_word_ci("DROP") && base.peek_word_ci(1, "TABLE"),
        reduce_drop_table,
    );
    grammar.register("set_property", |base| base.check_word_ci("SET"), reduce_set);
}

fn reduce_drop_table(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("DROP")?;
    base.require_word_ci("TABLE")?;
    let if_exists = base.expect_words_ci(&["IF", "EXISTS"]);
    let (schema, table_name) = base.require_schema_qualified_name()?;
    if !base.expect_word_ci("CASCADE") {
        base.expect_word_ci("RESTRICT");
    }

    Ok(Statement::Drop(DropDecl {
        schema,
        table_name,
        if_exists,
    }))
}

fn reduce_set(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("SET")?;
    let name = base.require_identifier()?;
    if !base.expect_punct("=") {
        base.expect_word_ci("TO");
    }

    let start = base.pos();
    while let Some(token) = base.current_token() {
        if token.is_punct(";") || is_boundary_word(token) || token.is_bare_word("SET") {
            break;
        }
        base.advance();
    }
    if base.pos() == start {
        return Err(base.error("expected property value"));
    }
    let value = base.tokens_to_string(start, base.pos());

    Ok(Statement::Property(PropertyDecl { name, value }))
}

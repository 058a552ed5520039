//! CREATE SCHEMA and CREATE DATABASE parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! CREATE SCHEMA [IF NOT EXISTS] [project.]name [AUTHORIZATION owner]
//!     [OPTIONS (k = v, …)] [CLONE source] [key = value …]
//! CREATE SCHEMA AUTHORIZATION owner
//! CREATE DATABASE [IF NOT EXISTS] name [CLONE source] [key = value …]
//! ```

use super::ast::{DatabaseDecl, SchemaDecl, Statement};
use super::grammar::{is_create_of, Grammar};
use super::storage_parser::{parse_options, parse_properties};
use super::token_parser_base::{ParseResult, TokenParser};

pub fn register(grammar: &mut Grammar) {
    grammar.register(
        "create_schema",
        |base| is_create_of(base, "SCHEMA"),
        reduce_create_schema,
    );
    grammar.register(
        "create_database",
        |base| is_create_of(base, "DATABASE"),
        reduce_create_database,
    );
}

fn reduce_create_schema(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("CREATE")?;
    base.require_word_ci("SCHEMA")?;
    let mut decl = SchemaDecl {
        if_not_exists: base.expect_words_ci(&["IF", "NOT", "EXISTS"]),
        ..SchemaDecl::default()
    };

    if base.expect_word_ci("AUTHORIZATION") {
        let owner = base.require_identifier()?;
        decl.schema_name = owner.clone();
        decl.authorization = Some(owner);
    } else {
        let mut parts = base.require_qualified_name()?;
        decl.schema_name = parts.pop().unwrap_or_default();
        decl.project = parts.pop();
        if base.expect_word_ci("AUTHORIZATION") {
            decl.authorization = Some(base.require_identifier()?);
        }
    }

    loop {
        if base.check_word_ci("OPTIONS") {
            decl.options = Some(parse_options(base)?);
        } else if base.expect_word_ci("CLONE") {
            decl.clone = Some(base.require_qualified_name()?.join("."));
        } else {
            let properties = parse_properties(base);
            if properties.is_empty() {
                break;
            }
            decl.properties.extend(properties);
        }
    }

    Ok(Statement::Schema(decl))
}

fn reduce_create_database(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("CREATE")?;
    base.require_word_ci("DATABASE")?;
    let mut decl = DatabaseDecl {
        if_not_exists: base.expect_words_ci(&["IF", "NOT", "EXISTS"]),
        database_name: base.require_identifier()?,
        ..DatabaseDecl::default()
    };

    loop {
        if base.expect_word_ci("CLONE") {
            decl.clone = Some(base.require_qualified_name()?.join("."));
        } else {
            let properties = parse_properties(base);
            if properties.is_empty() {
                break;
            }
            decl.properties.extend(properties);
        }
    }

    Ok(Statement::Database(decl))
}

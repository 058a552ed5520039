//! Parser for storage-related clauses and statements (OPTIONS lists, key/value
//! properties, tablespaces)
//!
//! ## Supported Syntax
//!
//! ```sql
//! OPTIONS (location="path", description="text",)
//! CREATE [BIGFILE | SMALLFILE | UNDO] [TEMPORARY] TABLESPACE name [key value …]
//! TABLESPACE name [key value …]    -- trailing table clause
//! ```

use super::ast::{OptionEntry, Statement, TablespaceDecl};
use super::grammar::{is_create_of, Grammar};
use super::token_parser_base::{ParseResult, TokenParser};
use super::tokens::{is_boundary_word, tokens_to_text, Token, TokenKind};

pub fn register(grammar: &mut Grammar) {
    grammar.register(
        "create_tablespace",
        |base| is_create_of(base, "TABLESPACE"),
        reduce_create_tablespace,
    );
}

/// Words that end a run of `key value` properties.
const PROPERTY_STOP_WORDS: &[&str] = &[
    "PARTITION",
    "PARTITIONED",
    "CLUSTER",
    "OPTIONS",
    "TABLESPACE",
    "COMMENT",
    "DISTSTYLE",
    "DISTKEY",
    "SORTKEY",
    "COMPOUND",
    "INTERLEAVED",
    "LIKE",
    "CLONE",
    "PERIOD",
    "SET",
];

/// Parse `OPTIONS (key = value, …)`.
///
/// Values are kept as raw text, quotes included. A trailing comma before the
/// closing parenthesis is accepted.
pub fn parse_options(base: &mut TokenParser) -> ParseResult<Vec<OptionEntry>> {
    base.require_word_ci("OPTIONS")?;
    base.require_punct("(")?;

    let mut entries = Vec::new();
    loop {
        if base.expect_punct(")") {
            return Ok(entries);
        }
        let key = base.require_identifier()?;
        base.require_punct("=")?;
        let value = parse_option_value(base)?;
        entries.push(OptionEntry { key, value });

        if !base.expect_punct(",") {
            base.require_punct(")")?;
            return Ok(entries);
        }
    }
}

/// Collect tokens up to the next top-level `,` or `)`.
fn parse_option_value(base: &mut TokenParser) -> ParseResult<String> {
    let mut value: Vec<Token> = Vec::new();
    while let Some(token) = base.current_token() {
        if token.is_punct(",") || token.is_punct(")") {
            break;
        }
        if token.is_punct("(") || token.is_punct("[") {
            let close = if token.is_punct("(") { ")" } else { "]" };
            value.extend(take_group(base, close)?);
            continue;
        }
        value.push(token.clone());
        base.advance();
    }
    if value.is_empty() {
        return Err(base.error("expected option value"));
    }
    Ok(tokens_to_text(&value))
}

/// Take a bracketed group including its delimiters.
///
/// Every closer must match the innermost open bracket.
fn take_group(base: &mut TokenParser, close: &str) -> ParseResult<Vec<Token>> {
    let mut group = Vec::new();
    let mut open: Vec<&str> = Vec::new();
    while let Some(token) = base.current_token() {
        if token.is_punct("(") {
            open.push(")");
        } else if token.is_punct("[") {
            open.push("]");
        } else if token.is_punct(")") || token.is_punct("]") {
            match open.pop() {
                Some(expected) if token.is_punct(expected) => {}
                Some(expected) => return Err(base.error(format!("expected '{}'", expected))),
                None => return Err(base.error("unbalanced brackets")),
            }
        }
        let token = token.clone();
        base.advance();
        let done = open.is_empty() && token.is_punct(close);
        group.push(token);
        if done {
            return Ok(group);
        }
    }
    Err(base.error(format!("expected '{}'", close)))
}

/// Parse a run of `key value` or `key = value` pairs.
///
/// Stops at punctuation, a table clause word, or the start of another
/// statement.
pub fn parse_properties(base: &mut TokenParser) -> Vec<(String, String)> {
    let mut properties = Vec::new();
    loop {
        let Some(key) = base.current_token() else {
            break;
        };
        if !key.is_word()
            || is_boundary_word(key)
            || PROPERTY_STOP_WORDS.iter().any(|w| key.is_bare_word(w))
        {
            break;
        }
        let with_equals = base.peek_punct(1, "=");
        let value_offset = if with_equals { 2 } else { 1 };
        let Some(value) = base.peek(value_offset) else {
            break;
        };
        let is_value = value.is_word()
            || matches!(value.kind, TokenKind::String | TokenKind::Number);
        if !is_value || (!with_equals && is_boundary_word(value)) {
            break;
        }
        properties.push((key.text.clone(), value.text.clone()));
        base.set_pos(base.pos() + value_offset + 1);
    }
    properties
}

/// Parse a `TABLESPACE name [properties]` table clause.
pub fn parse_tablespace_clause(base: &mut TokenParser) -> ParseResult<TablespaceDecl> {
    base.require_word_ci("TABLESPACE")?;
    let tablespace_name = base.require_identifier()?;
    let properties = parse_properties(base);
    Ok(TablespaceDecl {
        tablespace_name,
        properties,
        kind: None,
        temporary: false,
    })
}

fn reduce_create_tablespace(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("CREATE")?;

    let mut kind = None;
    let mut temporary = false;
    while !base.check_word_ci("TABLESPACE") {
        if base.expect_word_ci("TEMPORARY") {
            temporary = true;
        } else {
            kind = Some(base.require_identifier()?);
        }
    }

    let mut decl = parse_tablespace_clause(base)?;
    decl.kind = kind;
    decl.temporary = temporary;
    Ok(Statement::Tablespace(decl))
}

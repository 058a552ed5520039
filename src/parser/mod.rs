//! DDL parsing: text to tokens to statement trees

pub mod ast;
mod alter_parser;
mod column_parser;
mod constraint_parser;
mod grammar;
mod index_parser;
mod schema_parser;
mod sequence_parser;
mod statement_parser;
mod storage_parser;
mod table_parser;
mod token_parser_base;
pub mod tokens;
mod type_def_parser;
mod type_parser;

pub use ast::Statement;
pub use tokens::{tokenize, Token, TokenKind};

use crate::error::{DdlError, SyntaxError};

/// Parse DDL text into statement trees, in source order.
pub fn parse_statements(sql: &str) -> Result<Vec<Statement>, DdlError> {
    let tokens = tokenize(sql)?;
    Ok(parse_token_stream(tokens)?)
}

/// Parse an already tokenized script.
pub fn parse_token_stream(tokens: Vec<Token>) -> Result<Vec<Statement>, SyntaxError> {
    grammar::standard_grammar().parse(tokens)
}

//! rust-ddlparser: A multi-dialect SQL DDL parser
//!
//! This library turns CREATE/ALTER/DROP scripts written for generic SQL,
//! BigQuery, Redshift, Snowflake, Oracle and SQL Server into normalized
//! table, sequence, type, domain, schema and tablespace records.

pub mod error;
pub mod files;
pub mod model;
pub mod parser;

use std::path::PathBuf;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info};

pub use error::{DdlError, SyntaxError};
pub use model::{OutputMode, ParseOptions};
pub use parser::{parse_statements, tokenize, Statement, Token, TokenKind};

/// Parse a DDL script into its rendered output
pub fn parse_ddl(sql: &str, options: &ParseOptions) -> Result<Value, DdlError> {
    let tokens = tokenize(sql)?;
    parse_tokens(tokens, options)
}

/// Parse an already tokenized script into its rendered output
pub fn parse_tokens(tokens: Vec<Token>, options: &ParseOptions) -> Result<Value, DdlError> {
    let statements = parser::parse_token_stream(tokens)?;
    debug!(statements = statements.len(), "parsed statements");

    let output = model::build_model(statements)?;
    debug!(entities = output.len(), mode = %options.output_mode, "built model");

    model::render(&output, options)
}

/// Options for parsing files from the command line
#[derive(Debug, Clone)]
pub struct ParseFilesOptions {
    /// Files or directories to parse
    pub inputs: Vec<PathBuf>,
    /// Directory receiving one `<stem>_schema.json` per file
    pub dump_dir: Option<PathBuf>,
    pub parse: ParseOptions,
}

/// Parse every input file, dumping results when a dump directory is set.
///
/// Returns the parsed results in input order.
pub fn parse_files(options: &ParseFilesOptions) -> Result<Vec<files::ParsedFile>> {
    let sql_files = files::collect_sql_files(&options.inputs);
    info!(count = sql_files.len(), "found SQL files");

    let parsed = files::parse_sql_files(&sql_files, &options.parse)?;

    if let Some(dir) = &options.dump_dir {
        for file in &parsed {
            let path = files::dump_schema(dir, &files::dump_name(&file.path), &file.result)?;
            info!(path = %path.display(), "wrote schema");
        }
    }

    Ok(parsed)
}

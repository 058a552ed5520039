//! Error types for rust-ddlparser

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing a DDL script
#[derive(Error, Debug)]
pub enum DdlError {
    #[error("Failed to tokenize DDL at line {line}, column {column}: {message}")]
    Tokenize {
        line: u64,
        column: u64,
        message: String,
    },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Found ALTER statement for undeclared table {table} with schema {schema:?}")]
    UnresolvedReference {
        table: String,
        schema: Option<String>,
    },

    #[error("Failed to serialize parse result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to read DDL file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A token sequence that matched no grammar production.
///
/// Carries the position of the furthest token any attempted production
/// reached, the names of the productions that were tried, and the text of
/// the statement consumed up to that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: u64,
    pub column: u64,
    /// Text of the offending token, or `None` at end of input
    pub found: Option<String>,
    /// What the failing production wanted at this position
    pub message: String,
    /// Productions attempted for the statement
    pub expected: Vec<&'static str>,
    /// Statement text parsed before the failure
    pub statement: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let found = self.found.as_deref().unwrap_or("end of input");
        write!(
            f,
            "Syntax error at line {}, column {} near '{}': {}",
            self.line, self.column, found, self.message
        )?;
        if !self.expected.is_empty() {
            write!(f, " (attempted: {})", self.expected.join(", "))?;
        }
        if !self.statement.is_empty() {
            write!(f, " in statement: {}", self.statement)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

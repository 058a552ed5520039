//! Common test utilities for rust-ddlparser tests

use std::fs;
use std::path::PathBuf;

use rust_ddlparser::{parse_ddl, OutputMode, ParseOptions};
use serde_json::Value;
use tempfile::TempDir;

/// Parse a script with grouped output in the given mode
pub fn parse_grouped(sql: &str, output_mode: OutputMode) -> Value {
    parse_ddl(
        sql,
        &ParseOptions {
            group_by_type: true,
            output_mode,
        },
    )
    .unwrap_or_else(|e| panic!("Failed to parse: {}\n{}", e, sql))
}

/// Parse a script with flat generic output
pub fn parse_flat(sql: &str) -> Vec<Value> {
    match parse_ddl(sql, &ParseOptions::default()) {
        Ok(Value::Array(entities)) => entities,
        other => panic!("Expected a flat entity list, got {:?}", other),
    }
}

/// Test context with temporary directory for isolated file tests
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            dir,
        }
    }

    /// Write a SQL file relative to the context directory
    pub fn write_sql(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write SQL file");
        path
    }

    /// Read and parse a dumped JSON file
    pub fn read_json(&self, relative: &str) -> Value {
        let content = fs::read_to_string(self.dir.join(relative)).expect("Failed to read dump");
        serde_json::from_str(&content).expect("Dump is not valid JSON")
    }
}

//! Reading DDL files and dumping parse results

use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::error::DdlError;
use crate::model::ParseOptions;

/// Minimum number of files to benefit from parallel processing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

/// Result of parsing one file
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub result: Value,
}

/// Expand the given paths into `.sql` files; directories are walked
/// recursively and their files returned in sorted order.
pub fn collect_sql_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
            })
            .collect();
        found.sort();
        debug!(dir = %path.display(), count = found.len(), "collected SQL files");
        files.extend(found);
    }
    files
}

/// Decode file bytes as UTF-8, falling back to Windows-1252
fn decode(bytes: Vec<u8>) -> std::io::Result<String> {
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ))
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}

/// Read a DDL file, stripping a UTF-8 byte order mark
pub fn read_sql_file(path: &Path) -> Result<String, DdlError> {
    let content = std::fs::read(path)
        .and_then(decode)
        .map_err(|source| DdlError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(content),
    }
}

pub fn parse_sql_file(path: &Path, options: &ParseOptions) -> Result<ParsedFile, DdlError> {
    let sql = read_sql_file(path)?;
    let result = crate::parse_ddl(&sql, options)?;
    Ok(ParsedFile {
        path: path.to_path_buf(),
        result,
    })
}

/// Parse multiple files, using parallel processing for larger file sets.
/// Each file is an independent parse; the first error is returned.
pub fn parse_sql_files(
    files: &[PathBuf],
    options: &ParseOptions,
) -> Result<Vec<ParsedFile>, DdlError> {
    if files.len() >= PARALLEL_THRESHOLD {
        files
            .par_iter()
            .map(|file| parse_sql_file(file, options))
            .collect()
    } else {
        files
            .iter()
            .map(|file| parse_sql_file(file, options))
            .collect()
    }
}

/// Write a parse result to `<dir>/<stem>_schema.json`, creating `dir` if
/// needed. Returns the written path.
pub fn dump_schema(dir: &Path, name: &str, result: &Value) -> Result<PathBuf, DdlError> {
    let target = dir.join(format!("{}_schema.json", name));
    let write_err = |source| DdlError::Write {
        path: target.clone(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&target, json).map_err(write_err)?;
    debug!(path = %target.display(), "dumped schema");
    Ok(target)
}

/// File stem used to name a dump
pub fn dump_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

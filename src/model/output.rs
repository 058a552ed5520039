//! Output shaping per dialect mode
//!
//! Entities are serialized to JSON values and then reshaped for the
//! requested mode. Shaping never fails on unknown input; an unrecognized
//! mode name renders as generic output.

use std::fmt;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::DdlError;

use super::{DdlOutput, Entity};

/// Groups of grouped output in output order, paired with whether the group
/// is emitted even when empty
const GROUPS: [(&str, bool); 9] = [
    ("tables", true),
    ("sequences", true),
    ("types", true),
    ("domains", true),
    ("schemas", true),
    ("databases", false),
    ("tablespaces", false),
    ("indexes", false),
    ("ddl_properties", true),
];

/// Dialect-specific output shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Generic,
    BigQuery,
    Redshift,
    Snowflake,
}

impl OutputMode {
    /// Resolve a mode from its name, case-insensitively. Unknown names fall
    /// back to generic output.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "sql" | "generic" => OutputMode::Generic,
            "bigquery" => OutputMode::BigQuery,
            "redshift" => OutputMode::Redshift,
            "snowflake" => OutputMode::Snowflake,
            other => {
                debug!(mode = other, "unknown output mode, using generic output");
                OutputMode::Generic
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputMode::Generic => "sql",
            OutputMode::BigQuery => "bigquery",
            OutputMode::Redshift => "redshift",
            OutputMode::Snowflake => "snowflake",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options controlling the shape of parse results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Emit a map of entity lists keyed by kind instead of one flat list
    pub group_by_type: bool,
    pub output_mode: OutputMode,
}

/// Render normalized entities as a JSON value
pub fn render(output: &DdlOutput, options: &ParseOptions) -> Result<Value, DdlError> {
    let mut rendered = Vec::with_capacity(output.len());
    for entity in output.entities() {
        rendered.push((entity.group_key(), render_entity(entity, options.output_mode)?));
    }

    if !options.group_by_type {
        return Ok(Value::Array(rendered.into_iter().map(|(_, value)| value).collect()));
    }

    let mut groups: Vec<(&str, bool, Vec<Value>)> = GROUPS
        .iter()
        .map(|&(key, always)| (key, always, Vec::new()))
        .collect();
    for (key, value) in rendered {
        if let Some((_, _, list)) = groups.iter_mut().find(|(k, _, _)| *k == key) {
            list.push(value);
        }
    }
    let groups: Map<String, Value> = groups
        .into_iter()
        .filter(|(_, always, list)| *always || !list.is_empty())
        .map(|(key, _, list)| (key.to_string(), Value::Array(list)))
        .collect();
    Ok(Value::Object(groups))
}

fn render_entity(entity: &Entity, mode: OutputMode) -> Result<Value, DdlError> {
    let value = match entity {
        Entity::Table(table) => {
            let mut value = serde_json::to_value(table)?;
            if let Value::Object(map) = &mut value {
                shape_table(map, mode);
            }
            value
        }
        Entity::Sequence(sequence) => serde_json::to_value(sequence)?,
        Entity::Type(definition) => serde_json::to_value(definition)?,
        Entity::Domain(domain) => serde_json::to_value(domain)?,
        Entity::Schema(schema) => serde_json::to_value(schema)?,
        Entity::Database(database) => serde_json::to_value(database)?,
        Entity::Tablespace(tablespace) => serde_json::to_value(tablespace)?,
        Entity::Index(index) => serde_json::to_value(index)?,
        Entity::Property(property) => serde_json::to_value(property)?,
    };
    Ok(value)
}

fn shape_table(table: &mut Map<String, Value>, mode: OutputMode) {
    match mode {
        OutputMode::Snowflake => {
            table.entry("clone").or_insert(Value::Null);
        }
        _ => {
            // Only Snowflake distinguishes CLONE from LIKE
            if let Some(source) = table.remove("clone") {
                table.entry("like").or_insert(source);
            }
        }
    }

    match mode {
        OutputMode::BigQuery => rename_key(table, "schema", "dataset"),
        OutputMode::Redshift => {
            table.entry("diststyle").or_insert(Value::Null);
            table.entry("distkey").or_insert(Value::Null);
            table
                .entry("sortkey")
                .or_insert_with(|| json!({"type": null, "keys": []}));
            for key in ["columns", "partitioned_by"] {
                if let Some(Value::Array(columns)) = table.get_mut(key) {
                    for column in columns.iter_mut().filter_map(Value::as_object_mut) {
                        column.entry("encode").or_insert(Value::Null);
                    }
                }
            }
        }
        OutputMode::Generic | OutputMode::Snowflake => {}
    }
}

/// Rename a key in place, keeping its position
fn rename_key(map: &mut Map<String, Value>, from: &str, to: &str) {
    if !map.contains_key(from) {
        return;
    }
    let entries = std::mem::take(map);
    *map = entries
        .into_iter()
        .map(|(key, value)| {
            if key == from {
                (to.to_string(), value)
            } else {
                (key, value)
            }
        })
        .collect();
}

//! Normalized schema entity types
//!
//! These are the records returned to callers. Field order is the order keys
//! appear in JSON output; optional dialect fields are omitted unless set.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::parser::ast::{ColumnExtras, DefaultValue, IndexColumn, OptionEntry, PropertyDecl, Size};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A normalized entity, in the order it was first declared
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Table(Table),
    Sequence(Sequence),
    Type(TypeDefinition),
    Domain(Domain),
    Schema(Schema),
    Database(Database),
    Tablespace(Tablespace),
    Index(StandaloneIndex),
    Property(PropertyDecl),
}

impl Entity {
    /// Key of the group this entity belongs to in grouped output
    pub fn group_key(&self) -> &'static str {
        match self {
            Entity::Table(_) => "tables",
            Entity::Sequence(_) => "sequences",
            Entity::Type(_) => "types",
            Entity::Domain(_) => "domains",
            Entity::Schema(_) => "schemas",
            Entity::Database(_) => "databases",
            Entity::Tablespace(_) => "tablespaces",
            Entity::Index(_) => "indexes",
            Entity::Property(_) => "ddl_properties",
        }
    }
}

/// Referenced table and column of a column-level foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReference {
    pub table: String,
    pub schema: Option<String>,
    pub column: Option<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
    pub deferrable_initially: Option<String>,
}

/// Column record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    /// `None` when the declaration carries no type, only an encoding
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    pub size: Option<Size>,
    pub references: Option<ColumnReference>,
    pub unique: bool,
    pub nullable: bool,
    pub default: Option<DefaultValue>,
    pub check: Option<String>,
    #[serde(flatten)]
    pub extras: ColumnExtras,
}

/// `{constraint_name, statement}` check entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckConstraint {
    pub constraint_name: Option<String>,
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyConstraint {
    pub constraint_name: String,
    pub columns: Vec<String>,
}

/// Named foreign key from a table constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceConstraint {
    pub constraint_name: String,
    /// Referencing columns of this table
    pub fk_columns: Vec<String>,
    pub table: String,
    pub schema: Option<String>,
    /// Referenced columns
    pub columns: Vec<Option<String>>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
    pub deferrable_initially: Option<String>,
}

/// Named table constraints grouped by kind
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Constraints {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<CheckConstraint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub primary_keys: Vec<KeyConstraint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uniques: Vec<KeyConstraint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceConstraint>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
            && self.primary_keys.is_empty()
            && self.uniques.is_empty()
            && self.references.is_empty()
    }
}

/// Target of a foreign key added by ALTER TABLE
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlterReference {
    pub column: Option<String>,
    pub table: String,
    pub schema: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlterColumn {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_name: Option<String>,
    pub references: AlterReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlterUnique {
    pub constraint_name: Option<String>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlterDefault {
    pub constraint_name: Option<String>,
    pub column: Option<String>,
    pub value: DefaultValue,
}

/// Changes recorded by ALTER TABLE statements; only non-empty lists are
/// serialized, so an unaltered table shows `{}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AlterInfo {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<AlterColumn>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uniques: Vec<AlterUnique>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<CheckConstraint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defaults: Vec<AlterDefault>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub primary_keys: Vec<AlterUnique>,
}

/// Index attached to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Index {
    pub index_name: String,
    pub unique: bool,
    pub clustered: bool,
    pub columns: Vec<String>,
    pub detailed_columns: Vec<IndexColumn>,
}

/// Index whose table was not declared in the same script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandaloneIndex {
    pub schema: Option<String>,
    pub table_name: String,
    #[serde(flatten)]
    pub index: Index,
}

/// `LIKE`/`CLONE` source table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRef {
    pub schema: Option<String>,
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionBy {
    pub columns: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodFor {
    pub name: String,
    pub columns: Vec<String>,
}

/// Table record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub schema: Option<String>,
    pub table_name: String,
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
    pub alter: AlterInfo,
    pub checks: Vec<CheckConstraint>,
    pub index: Vec<Index>,
    pub partitioned_by: Vec<Column>,
    pub tablespace: Option<Tablespace>,
    #[serde(skip_serializing_if = "Constraints::is_empty")]
    pub constraints: Constraints,
    #[serde(skip_serializing_if = "is_false")]
    pub external: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub temp: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub transient: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub replace: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub if_not_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key_enforced: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<TableRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone: Option<TableRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_by: Option<PartitionBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_by: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diststyle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortkey: Option<SortKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_for_system_time: Option<PeriodFor>,
}

impl Table {
    pub fn new(schema: Option<String>, table_name: String) -> Self {
        Self {
            project: None,
            schema,
            table_name,
            columns: Vec::new(),
            primary_key: Vec::new(),
            alter: AlterInfo::default(),
            checks: Vec::new(),
            index: Vec::new(),
            partitioned_by: Vec::new(),
            tablespace: None,
            constraints: Constraints::default(),
            external: false,
            temp: false,
            transient: false,
            replace: false,
            if_not_exists: false,
            primary_key_enforced: None,
            like: None,
            clone: None,
            partition_by: None,
            cluster_by: None,
            options: None,
            comment: None,
            diststyle: None,
            distkey: None,
            sortkey: None,
            period_for_system_time: None,
        }
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }
}

/// Sequence record; only options that were written appear
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sequence {
    pub schema: Option<String>,
    pub sequence_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increment: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minvalue: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxvalue: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// User-defined type record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDefinition {
    pub schema: Option<String>,
    pub type_name: String,
    pub base_type: Option<String>,
    pub properties: Map<String, Value>,
}

/// Domain record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Domain {
    pub schema: Option<String>,
    pub domain_name: String,
    pub base_type: String,
    pub properties: Map<String, Value>,
}

/// Schema record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub schema_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone: Option<String>,
}

/// Database record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Database {
    pub database_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub if_not_exists: bool,
}

/// Tablespace record, standalone or attached to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tablespace {
    pub tablespace_name: String,
    pub properties: Option<std::collections::BTreeMap<String, String>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub temporary: bool,
}

//! Statement trees produced by the grammar.
//!
//! One variant per top-level statement kind; table statements keep their
//! column and constraint fragments in source order; grouping them into a
//! table entity is done by `model::build_model`.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Size suffix of a column type: `(n)`, `(p, s)` or `(max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Int(i64),
    Pair(i64, i64),
    Max,
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Size::Int(n) => serializer.serialize_i64(*n),
            Size::Pair(precision, scale) => (precision, scale).serialize(serializer),
            Size::Max => serializer.serialize_str("max"),
        }
    }
}

/// Canonical type text plus optional size
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeExpression {
    pub text: String,
    pub size: Option<Size>,
}

/// Column default value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Numeric-looking defaults
    Int(i64),
    /// Anything else, kept as written (string literals keep their quotes)
    Text(String),
    /// `DEFAULT NEXT VALUE FOR schema.sequence`
    NextValueFor(String),
}

impl DefaultValue {
    pub fn as_text(&self) -> String {
        match self {
            DefaultValue::Int(n) => n.to_string(),
            DefaultValue::Text(s) | DefaultValue::NextValueFor(s) => s.clone(),
        }
    }
}

impl Serialize for DefaultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DefaultValue::Int(n) => serializer.serialize_i64(*n),
            DefaultValue::Text(s) => serializer.serialize_str(s),
            DefaultValue::NextValueFor(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("next_value_for", id)?;
                map.end()
            }
        }
    }
}

/// `key = value` entry of an OPTIONS list, serialized as `{key: value}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub key: String,
    pub value: String,
}

impl Serialize for OptionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

/// Target of a REFERENCES clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSpec {
    pub schema: Option<String>,
    pub table: String,
    /// Referenced columns; `[None]` when no column list was written
    pub columns: Vec<Option<String>>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
    pub deferrable_initially: Option<String>,
}

impl ReferenceSpec {
    pub fn new(schema: Option<String>, table: String) -> Self {
        Self {
            schema,
            table,
            columns: vec![None],
            on_delete: None,
            on_update: None,
            deferrable_initially: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSpec {
    pub always: bool,
    #[serde(rename = "as")]
    pub expression: String,
    pub stored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptSpec {
    pub salt: bool,
    pub encryption_algorithm: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdentitySpec {
    pub seed: i64,
    pub increment: i64,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Dialect-specific column properties; only the ones that were written are
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ColumnExtras {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub distkey: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sortkey: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated: Option<GeneratedSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforced: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypt: Option<EncryptSpec>,
    #[serde(skip_serializing_if = "is_false")]
    pub autoincrement: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentitySpec>,
}

/// One clause following a column's type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnClause {
    Nullable(bool),
    Default(DefaultValue),
    PrimaryKey,
    Unique,
    Check(Vec<String>),
    References(ReferenceSpec),
    Collate(String),
    Enforced(bool),
    Encode(String),
    DistKey,
    SortKey,
    Generated(GeneratedSpec),
    Comment(String),
    Options(Vec<OptionEntry>),
    OnUpdate(String),
    Encrypt(EncryptSpec),
    AutoIncrement,
    Identity(IdentitySpec),
    /// `CONSTRAINT name <clause>`
    Named(String, Box<ColumnClause>),
}

/// A column definition as accumulated from its clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFragment {
    pub name: String,
    pub data_type: TypeExpression,
    pub nullable: bool,
    pub default: Option<DefaultValue>,
    pub unique: bool,
    pub primary_key: bool,
    /// CHECK expression parts, joined with spaces on output
    pub check: Vec<String>,
    pub references: Option<ReferenceSpec>,
    pub extras: ColumnExtras,
    /// Inline constraints declared with `CONSTRAINT name`
    pub constraints: Vec<ConstraintBlock>,
}

impl ColumnFragment {
    pub fn new(name: String, data_type: TypeExpression) -> Self {
        Self {
            name,
            data_type,
            nullable: true,
            default: None,
            unique: false,
            primary_key: false,
            check: Vec::new(),
            references: None,
            extras: ColumnExtras::default(),
            constraints: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintBody {
    Check(Vec<String>),
    PrimaryKey {
        columns: Vec<String>,
        enforced: Option<bool>,
    },
    Unique(Vec<String>),
    ForeignKey {
        columns: Vec<String>,
        references: ReferenceSpec,
    },
}

/// A possibly named table-level (or named inline) constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintBlock {
    pub constraint_name: Option<String>,
    pub body: ConstraintBody,
}

/// `LIKE t` / `CLONE t` source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeSpec {
    pub schema: Option<String>,
    pub table_name: String,
    pub clone: bool,
}

/// Element of a CREATE TABLE body, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableElement {
    Column(ColumnFragment),
    Constraint(ConstraintBlock),
    Like(LikeSpec),
    Period { name: String, columns: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionBy {
    pub columns: Vec<String>,
    /// Partitioning function or method (`DATETIME_TRUNC`, `RANGE`, …)
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// COMPOUND or INTERLEAVED
    pub kind: Option<String>,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableDecl {
    pub project: Option<String>,
    pub schema: Option<String>,
    pub table_name: String,
    pub external: bool,
    pub temp: bool,
    pub transient: bool,
    pub replace: bool,
    pub if_not_exists: bool,
    pub elements: Vec<TableElement>,
    pub like: Option<LikeSpec>,
    pub partition_by: Option<PartitionBy>,
    pub partitioned_by: Vec<ColumnFragment>,
    pub cluster_by: Option<Vec<String>>,
    pub options: Option<Vec<OptionEntry>>,
    pub tablespace: Option<TablespaceDecl>,
    pub comment: Option<String>,
    pub diststyle: Option<String>,
    pub distkey: Option<String>,
    pub sortkey: Option<SortKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterAction {
    ForeignKey {
        constraint_name: Option<String>,
        columns: Vec<String>,
        references: ReferenceSpec,
    },
    Unique {
        constraint_name: Option<String>,
        columns: Vec<String>,
    },
    Check {
        constraint_name: Option<String>,
        statement: Vec<String>,
    },
    Default {
        constraint_name: Option<String>,
        value: DefaultValue,
        column: Option<String>,
    },
    PrimaryKey {
        constraint_name: Option<String>,
        columns: Vec<String>,
    },
}

/// `ALTER TABLE [schema.]name ADD …`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterDecl {
    pub alter_table_name: String,
    pub schema: Option<String>,
    pub action: AlterAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexColumn {
    pub name: String,
    pub order: String,
    pub nulls: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDecl {
    pub schema: Option<String>,
    pub table_name: String,
    pub index_name: String,
    pub unique: bool,
    pub clustered: bool,
    pub columns: Vec<IndexColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeBody {
    Enum(Vec<String>),
    Object(Vec<ColumnFragment>),
    Table(Vec<ColumnFragment>),
    Composite(Vec<ColumnFragment>),
    Properties(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub schema: Option<String>,
    pub type_name: String,
    pub replace: bool,
    pub body: TypeBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainDecl {
    pub schema: Option<String>,
    pub domain_name: String,
    pub base_type: String,
    pub values: Option<Vec<String>>,
    pub size: Option<Size>,
    pub nullable: Option<bool>,
    pub default: Option<DefaultValue>,
    pub check: Vec<String>,
    pub collate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaDecl {
    pub project: Option<String>,
    pub schema_name: String,
    pub authorization: Option<String>,
    pub if_not_exists: bool,
    pub options: Option<Vec<OptionEntry>>,
    pub properties: Vec<(String, String)>,
    pub clone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatabaseDecl {
    pub database_name: String,
    pub if_not_exists: bool,
    pub clone: Option<String>,
    pub properties: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequenceDecl {
    pub schema: Option<String>,
    pub sequence_name: String,
    pub if_not_exists: bool,
    pub data_type: Option<String>,
    pub increment: Option<i64>,
    pub start: Option<i64>,
    pub minvalue: Option<i64>,
    pub maxvalue: Option<i64>,
    pub cache: Option<i64>,
    pub cycle: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TablespaceDecl {
    pub tablespace_name: String,
    pub properties: Vec<(String, String)>,
    /// Leading modifier such as BIGFILE or UNDO
    pub kind: Option<String>,
    pub temporary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropDecl {
    pub schema: Option<String>,
    pub table_name: String,
    pub if_exists: bool,
}

/// `SET name = value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDecl {
    pub name: String,
    pub value: String,
}

/// One top-level statement tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Table(TableDecl),
    Alter(AlterDecl),
    Index(IndexDecl),
    Type(TypeDecl),
    Domain(DomainDecl),
    Schema(SchemaDecl),
    Database(DatabaseDecl),
    Sequence(SequenceDecl),
    Tablespace(TablespaceDecl),
    Drop(DropDecl),
    Property(PropertyDecl),
}

impl Statement {
    /// Short kind name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Table(_) => "table",
            Statement::Alter(_) => "alter",
            Statement::Index(_) => "index",
            Statement::Type(_) => "type",
            Statement::Domain(_) => "domain",
            Statement::Schema(_) => "schema",
            Statement::Database(_) => "database",
            Statement::Sequence(_) => "sequence",
            Statement::Tablespace(_) => "tablespace",
            Statement::Drop(_) => "drop",
            Statement::Property(_) => "property",
        }
    }
}

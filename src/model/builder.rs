//! Build normalized entities from parsed statement trees
//!
//! Statements are applied strictly in source order. Tables are registered
//! under `(table_name, schema)` as they are created, so an ALTER, CREATE
//! INDEX or DROP TABLE can only see tables declared before it.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::DdlError;
use crate::parser::ast::{
    AlterAction, AlterDecl, ColumnFragment, ConstraintBlock, ConstraintBody, DatabaseDecl,
    DomainDecl, DropDecl, IndexDecl, ReferenceSpec, SchemaDecl, SequenceDecl, Statement,
    TableDecl, TableElement, TablespaceDecl, TypeBody, TypeDecl,
};

use super::{
    AlterColumn, AlterDefault, AlterReference, AlterUnique, CheckConstraint, Column,
    ColumnReference, Database, DdlOutput, Domain, Entity, Index, KeyConstraint, PartitionBy,
    PeriodFor, ReferenceConstraint, Schema, Sequence, SortKey, StandaloneIndex, Table, TableRef,
    Tablespace, TypeDefinition,
};

type TableKey = (String, Option<String>);

/// Normalize an ordered list of statements into output entities
pub fn build_model(statements: Vec<Statement>) -> Result<DdlOutput, DdlError> {
    let mut output = DdlOutput::new();
    // (table_name, schema) -> output slot
    let mut registry: HashMap<TableKey, usize> = HashMap::new();

    for statement in statements {
        trace!(kind = statement.kind(), "normalizing statement");
        match statement {
            Statement::Table(decl) => {
                let table = build_table(decl);
                let key = (table.table_name.clone(), table.schema.clone());
                let slot = output.add_entity(Entity::Table(table));
                debug!(table = %key.0, schema = ?key.1, slot, "registered table");
                registry.insert(key, slot);
            }
            Statement::Alter(decl) => apply_alter(&mut output, &registry, decl)?,
            Statement::Index(decl) => attach_index(&mut output, &registry, decl),
            Statement::Drop(decl) => drop_table(&mut output, &mut registry, decl),
            Statement::Type(decl) => {
                output.add_entity(Entity::Type(build_type(decl)?));
            }
            Statement::Domain(decl) => {
                output.add_entity(Entity::Domain(build_domain(decl)?));
            }
            Statement::Schema(decl) => {
                output.add_entity(Entity::Schema(build_schema(decl)?));
            }
            Statement::Database(decl) => {
                output.add_entity(Entity::Database(build_database(decl)));
            }
            Statement::Sequence(decl) => {
                output.add_entity(Entity::Sequence(build_sequence(decl)));
            }
            Statement::Tablespace(decl) => {
                output.add_entity(Entity::Tablespace(build_tablespace(decl)));
            }
            Statement::Property(decl) => {
                output.add_entity(Entity::Property(decl));
            }
        }
    }

    Ok(output)
}

/// Convert a column fragment into its output record.
///
/// The fragment's primary key flag is not carried over; callers hoist it.
fn column_from_fragment(fragment: ColumnFragment) -> Column {
    let check = if fragment.check.is_empty() {
        None
    } else {
        Some(fragment.check.join(" "))
    };
    Column {
        name: fragment.name,
        data_type: Some(fragment.data_type.text).filter(|text| !text.is_empty()),
        size: fragment.data_type.size,
        references: fragment
            .references
            .map(|spec| column_reference(&spec, 0)),
        unique: fragment.unique,
        nullable: fragment.nullable,
        default: fragment.default,
        check,
        extras: fragment.extras,
    }
}

/// Reference of the `position`-th referencing column
fn column_reference(spec: &ReferenceSpec, position: usize) -> ColumnReference {
    ColumnReference {
        table: spec.table.clone(),
        schema: spec.schema.clone(),
        column: spec.columns.get(position).cloned().flatten(),
        on_delete: spec.on_delete.clone(),
        on_update: spec.on_update.clone(),
        deferrable_initially: spec.deferrable_initially.clone(),
    }
}

fn table_ref(schema: Option<String>, table_name: String) -> TableRef {
    TableRef { schema, table_name }
}

fn build_table(decl: TableDecl) -> Table {
    let mut table = Table::new(decl.schema, decl.table_name);
    table.project = decl.project;
    table.external = decl.external;
    table.temp = decl.temp;
    table.transient = decl.transient;
    table.replace = decl.replace;
    table.if_not_exists = decl.if_not_exists;

    let mut flagged_keys: Vec<String> = Vec::new();
    let mut declared_key: Option<Vec<String>> = None;
    let mut unique_columns: Vec<String> = Vec::new();
    let mut foreign_keys: Vec<(Vec<String>, ReferenceSpec)> = Vec::new();

    let mut like = decl.like;
    for element in decl.elements {
        match element {
            TableElement::Column(mut fragment) => {
                if fragment.primary_key {
                    flagged_keys.push(fragment.name.clone());
                }
                for block in std::mem::take(&mut fragment.constraints) {
                    record_named_constraint(&mut table, block);
                }
                table.columns.push(column_from_fragment(fragment));
            }
            TableElement::Constraint(block) => {
                let ConstraintBlock {
                    constraint_name,
                    body,
                } = block;
                match body {
                    ConstraintBody::PrimaryKey { columns, enforced } => {
                        if enforced.is_some() {
                            table.primary_key_enforced = enforced;
                        }
                        if let Some(name) = constraint_name {
                            table.constraints.primary_keys.push(KeyConstraint {
                                constraint_name: name,
                                columns: columns.clone(),
                            });
                        }
                        declared_key.get_or_insert_with(Vec::new).extend(columns);
                    }
                    ConstraintBody::Unique(columns) => {
                        if let Some(name) = constraint_name {
                            table.constraints.uniques.push(KeyConstraint {
                                constraint_name: name,
                                columns: columns.clone(),
                            });
                        }
                        unique_columns.extend(columns);
                    }
                    ConstraintBody::Check(parts) => {
                        let statement = parts.join(" ");
                        if let Some(name) = &constraint_name {
                            table.constraints.checks.push(CheckConstraint {
                                constraint_name: Some(name.clone()),
                                statement: statement.clone(),
                            });
                        }
                        table.checks.push(CheckConstraint {
                            constraint_name,
                            statement,
                        });
                    }
                    ConstraintBody::ForeignKey {
                        columns,
                        references,
                    } => match constraint_name {
                        Some(name) => table
                            .constraints
                            .references
                            .push(reference_constraint(name, columns, references)),
                        None => foreign_keys.push((columns, references)),
                    },
                }
            }
            TableElement::Like(spec) => like = Some(spec),
            TableElement::Period { name, columns } => {
                table.period_for_system_time = Some(PeriodFor { name, columns });
            }
        }
    }

    if let Some(spec) = like {
        let source = table_ref(spec.schema, spec.table_name);
        if spec.clone {
            table.clone = Some(source);
        } else {
            table.like = Some(source);
        }
    }

    // Primary key: a table-level list wins over column flags
    table.primary_key = declared_key.unwrap_or(flagged_keys);
    for column in &mut table.columns {
        if table.primary_key.contains(&column.name) {
            column.nullable = false;
        }
        if unique_columns.contains(&column.name) {
            column.unique = true;
        }
    }

    for (columns, references) in foreign_keys {
        for (position, name) in columns.iter().enumerate() {
            match table.column_mut(name) {
                Some(column) => column.references = Some(column_reference(&references, position)),
                None => debug!(column = %name, "foreign key names an undeclared column"),
            }
        }
    }

    table.partition_by = decl.partition_by.map(|p| PartitionBy {
        columns: p.columns,
        kind: p.kind,
    });
    table.partitioned_by = decl
        .partitioned_by
        .into_iter()
        .map(column_from_fragment)
        .collect();
    table.cluster_by = decl.cluster_by;
    table.options = decl.options;
    table.tablespace = decl.tablespace.map(build_tablespace);
    table.comment = decl.comment;
    table.diststyle = decl.diststyle;
    table.distkey = decl.distkey;
    table.sortkey = decl.sortkey.map(|s| SortKey {
        kind: s.kind,
        keys: s.keys,
    });

    table
}

fn reference_constraint(
    constraint_name: String,
    fk_columns: Vec<String>,
    references: ReferenceSpec,
) -> ReferenceConstraint {
    ReferenceConstraint {
        constraint_name,
        fk_columns,
        table: references.table,
        schema: references.schema,
        columns: references.columns,
        on_delete: references.on_delete,
        on_update: references.on_update,
        deferrable_initially: references.deferrable_initially,
    }
}

/// Record a named inline column constraint. The clause itself was already
/// applied to the column.
fn record_named_constraint(table: &mut Table, block: ConstraintBlock) {
    let Some(name) = block.constraint_name else {
        return;
    };
    match block.body {
        ConstraintBody::PrimaryKey { columns, .. } => {
            table.constraints.primary_keys.push(KeyConstraint {
                constraint_name: name,
                columns,
            })
        }
        ConstraintBody::Unique(columns) => table.constraints.uniques.push(KeyConstraint {
            constraint_name: name,
            columns,
        }),
        ConstraintBody::Check(parts) => table.constraints.checks.push(CheckConstraint {
            constraint_name: Some(name),
            statement: parts.join(" "),
        }),
        ConstraintBody::ForeignKey {
            columns,
            references,
        } => table
            .constraints
            .references
            .push(reference_constraint(name, columns, references)),
    }
}

fn apply_alter(
    output: &mut DdlOutput,
    registry: &HashMap<TableKey, usize>,
    decl: AlterDecl,
) -> Result<(), DdlError> {
    let key = (decl.alter_table_name, decl.schema);
    let Some(table) = registry
        .get(&key)
        .copied()
        .and_then(|slot| output.table_mut(slot))
    else {
        return Err(DdlError::UnresolvedReference {
            table: key.0,
            schema: key.1,
        });
    };
    debug!(table = %key.0, schema = ?key.1, "applying ALTER TABLE");

    let alter = &mut table.alter;
    match decl.action {
        AlterAction::ForeignKey {
            constraint_name,
            columns,
            references,
        } => {
            for (position, name) in columns.into_iter().enumerate() {
                alter.columns.push(AlterColumn {
                    name,
                    constraint_name: constraint_name.clone(),
                    references: AlterReference {
                        column: references.columns.get(position).cloned().flatten(),
                        table: references.table.clone(),
                        schema: references.schema.clone(),
                    },
                });
            }
        }
        AlterAction::Unique {
            constraint_name,
            columns,
        } => alter.uniques.push(AlterUnique {
            constraint_name,
            columns,
        }),
        AlterAction::Check {
            constraint_name,
            statement,
        } => alter.checks.push(CheckConstraint {
            constraint_name,
            statement: statement.join(" "),
        }),
        AlterAction::Default {
            constraint_name,
            value,
            column,
        } => alter.defaults.push(AlterDefault {
            constraint_name,
            column,
            value,
        }),
        AlterAction::PrimaryKey {
            constraint_name,
            columns,
        } => alter.primary_keys.push(AlterUnique {
            constraint_name,
            columns,
        }),
    }
    Ok(())
}

fn attach_index(output: &mut DdlOutput, registry: &HashMap<TableKey, usize>, decl: IndexDecl) {
    let index = Index {
        index_name: decl.index_name,
        unique: decl.unique,
        clustered: decl.clustered,
        columns: decl.columns.iter().map(|c| c.name.clone()).collect(),
        detailed_columns: decl.columns,
    };

    let key = (decl.table_name, decl.schema);
    if let Some(table) = registry
        .get(&key)
        .copied()
        .and_then(|slot| output.table_mut(slot))
    {
        trace!(index = %index.index_name, table = %key.0, "attaching index");
        table.index.push(index);
        return;
    }

    debug!(index = %index.index_name, table = %key.0, "index target not declared, keeping standalone");
    output.add_entity(Entity::Index(StandaloneIndex {
        schema: key.1,
        table_name: key.0,
        index,
    }));
}

fn drop_table(output: &mut DdlOutput, registry: &mut HashMap<TableKey, usize>, decl: DropDecl) {
    let key = (decl.table_name, decl.schema);
    match registry.remove(&key) {
        Some(slot) => {
            output.remove(slot);
            debug!(table = %key.0, schema = ?key.1, "dropped table");
        }
        None => debug!(table = %key.0, schema = ?key.1, "DROP TABLE for undeclared table ignored"),
    }
}

fn string_list(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}

fn columns_value(fragments: Vec<ColumnFragment>) -> Result<Value, DdlError> {
    let columns: Vec<Column> = fragments.into_iter().map(column_from_fragment).collect();
    Ok(serde_json::to_value(columns)?)
}

fn build_type(decl: TypeDecl) -> Result<TypeDefinition, DdlError> {
    let mut properties = Map::new();
    let base_type = match decl.body {
        TypeBody::Enum(values) => {
            properties.insert("values".to_string(), string_list(values));
            Some("ENUM")
        }
        TypeBody::Object(attributes) => {
            properties.insert("attributes".to_string(), columns_value(attributes)?);
            Some("OBJECT")
        }
        TypeBody::Table(columns) => {
            properties.insert("columns".to_string(), columns_value(columns)?);
            Some("TABLE")
        }
        TypeBody::Composite(columns) => {
            properties.insert("columns".to_string(), columns_value(columns)?);
            None
        }
        TypeBody::Properties(pairs) => {
            for (key, value) in pairs {
                properties.insert(key, Value::String(value));
            }
            None
        }
    };
    if decl.replace {
        properties.insert("replace".to_string(), Value::Bool(true));
    }

    Ok(TypeDefinition {
        schema: decl.schema,
        type_name: decl.type_name,
        base_type: base_type.map(str::to_string),
        properties,
    })
}

fn build_domain(decl: DomainDecl) -> Result<Domain, DdlError> {
    let mut properties = Map::new();
    if let Some(values) = decl.values {
        properties.insert("values".to_string(), string_list(values));
    }
    if let Some(size) = decl.size {
        properties.insert("size".to_string(), serde_json::to_value(size)?);
    }
    if let Some(nullable) = decl.nullable {
        properties.insert("nullable".to_string(), Value::Bool(nullable));
    }
    if let Some(default) = decl.default {
        properties.insert("default".to_string(), serde_json::to_value(default)?);
    }
    if !decl.check.is_empty() {
        properties.insert("check".to_string(), Value::String(decl.check.join(" ")));
    }
    if let Some(collate) = decl.collate {
        properties.insert("collate".to_string(), Value::String(collate));
    }

    Ok(Domain {
        schema: decl.schema,
        domain_name: decl.domain_name,
        base_type: decl.base_type,
        properties,
    })
}

fn property_map(pairs: Vec<(String, String)>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

fn build_schema(decl: SchemaDecl) -> Result<Schema, DdlError> {
    let mut properties = property_map(decl.properties);
    if let Some(options) = decl.options {
        properties.insert("options".to_string(), serde_json::to_value(options)?);
    }
    Ok(Schema {
        project: decl.project,
        schema_name: decl.schema_name,
        authorization: decl.authorization,
        properties: (!properties.is_empty()).then_some(properties),
        clone: decl.clone,
    })
}

fn build_database(decl: DatabaseDecl) -> Database {
    let properties = property_map(decl.properties);
    Database {
        database_name: decl.database_name,
        properties: (!properties.is_empty()).then_some(properties),
        clone: decl.clone,
        if_not_exists: decl.if_not_exists,
    }
}

fn build_sequence(decl: SequenceDecl) -> Sequence {
    Sequence {
        schema: decl.schema,
        sequence_name: decl.sequence_name,
        increment: decl.increment,
        start: decl.start,
        minvalue: decl.minvalue,
        maxvalue: decl.maxvalue,
        cache: decl.cache,
        cycle: decl.cycle,
        data_type: decl.data_type,
    }
}

fn build_tablespace(decl: TablespaceDecl) -> Tablespace {
    let properties: BTreeMap<String, String> = decl.properties.into_iter().collect();
    Tablespace {
        tablespace_name: decl.tablespace_name,
        properties: (!properties.is_empty()).then_some(properties),
        kind: decl.kind,
        temporary: decl.temporary,
    }
}

//! Column definition parsing
//!
//! A column is a name, a type and any number of clauses. Clauses are parsed
//! one at a time into [`ColumnClause`] values and folded into a
//! [`ColumnFragment`] by [`apply_clause`].
//!
//! ## Supported Syntax
//!
//! ```sql
//! name TYPE [NOT NULL | NULL] [DEFAULT value] [PRIMARY KEY] [UNIQUE]
//!     [CHECK (expr)] [REFERENCES t (col) …] [CONSTRAINT name <clause>]
//!     [COLLATE c] [ENCODE e] [DISTKEY] [SORTKEY] [GENERATED …]
//!     [COMMENT 'text'] [OPTIONS (k = v)] [ON UPDATE expr] [ENCRYPT …]
//!     [IDENTITY(seed, increment)] [AUTO_INCREMENT] [[NOT] ENFORCED]
//! ```

use super::ast::{ColumnClause, ColumnFragment, ConstraintBlock, ConstraintBody, TypeExpression};
use super::constraint_parser::{
    parse_check, parse_default, parse_encrypt, parse_generated, parse_identity, parse_on_update,
    parse_references, require_string,
};
use super::storage_parser::parse_options;
use super::token_parser_base::{ParseResult, TokenParser};
use super::type_parser::{resolve_type, ResolvedType};

/// Parse one column definition starting at the column name.
pub fn parse_column_definition(base: &mut TokenParser) -> ParseResult<ColumnFragment> {
    let name = base.require_identifier()?;

    let mut clauses = Vec::new();
    let data_type = match resolve_type(base)? {
        ResolvedType::Type(t) => t,
        ResolvedType::Property { value, .. } => {
            clauses.push(ColumnClause::Encode(value));
            TypeExpression::default()
        }
    };

    while let Some(clause) = parse_column_clause(base)? {
        clauses.push(clause);
    }

    Ok(clauses
        .into_iter()
        .fold(ColumnFragment::new(name, data_type), apply_clause))
}

/// Parse a single column clause, or return `None` when the current token does
/// not start one.
pub fn parse_column_clause(base: &mut TokenParser) -> ParseResult<Option<ColumnClause>> {
    let clause = if base.expect_words_ci(&["NOT", "NULL"]) {
        ColumnClause::Nullable(false)
    } else if base.expect_words_ci(&["NOT", "ENFORCED"]) {
        ColumnClause::Enforced(false)
    } else if base.expect_word_ci("NULL") {
        ColumnClause::Nullable(true)
    } else if base.expect_word_ci("ENFORCED") {
        ColumnClause::Enforced(true)
    } else if base.expect_words_ci(&["PRIMARY", "KEY"]) {
        if !base.expect_word_ci("CLUSTERED") {
            base.expect_word_ci("NONCLUSTERED");
        }
        if !base.expect_word_ci("ASC") {
            base.expect_word_ci("DESC");
        }
        ColumnClause::PrimaryKey
    } else if base.expect_word_ci("UNIQUE") {
        base.expect_word_ci("KEY");
        ColumnClause::Unique
    } else if base.check_word_ci("CHECK") {
        ColumnClause::Check(parse_check(base)?)
    } else if base.check_word_ci("DEFAULT") {
        ColumnClause::Default(parse_default(base)?)
    } else if base.check_word_ci("REFERENCES") {
        ColumnClause::References(parse_references(base)?)
    } else if base.check_word_ci("FOREIGN") && base.peek_word_ci(1, "KEY") {
        base.advance();
        base.advance();
        ColumnClause::References(parse_references(base)?)
    } else if base.expect_word_ci("CONSTRAINT") {
        let name = base.require_identifier()?;
        match parse_column_clause(base)? {
            Some(inner) => ColumnClause::Named(name, Box::new(inner)),
            None => return Err(base.error("expected constraint after CONSTRAINT name")),
        }
    } else if base.expect_word_ci("COLLATE") {
        ColumnClause::Collate(base.require_identifier()?)
    } else if base.check_word_ci("ENCODE") {
        match resolve_type(base)? {
            ResolvedType::Property { value, .. } => ColumnClause::Encode(value),
            ResolvedType::Type(_) => return Err(base.error("expected encoding")),
        }
    } else if base.expect_word_ci("DISTKEY") {
        ColumnClause::DistKey
    } else if base.expect_word_ci("SORTKEY") {
        ColumnClause::SortKey
    } else if base.check_word_ci("GENERATED") {
        ColumnClause::Generated(parse_generated(base)?)
    } else if base.expect_word_ci("COMMENT") {
        ColumnClause::Comment(require_string(base)?)
    } else if base.check_word_ci("OPTIONS") {
        ColumnClause::Options(parse_options(base)?)
    } else if base.check_word_ci("ON") && base.peek_word_ci(1, "UPDATE") {
        ColumnClause::OnUpdate(parse_on_update(base)?)
    } else if base.check_word_ci("ENCRYPT") {
        ColumnClause::Encrypt(parse_encrypt(base)?)
    } else if base.check_word_ci("IDENTITY") {
        ColumnClause::Identity(parse_identity(base)?)
    } else if base.expect_word_ci("AUTO_INCREMENT") || base.expect_word_ci("AUTOINCREMENT") {
        ColumnClause::AutoIncrement
    } else {
        return Ok(None);
    };
    Ok(Some(clause))
}

/// Fold one clause into a column fragment.
///
/// Later clauses overwrite earlier ones, except CHECK parts which accumulate.
/// PRIMARY KEY makes the column non-nullable regardless of an explicit NULL.
pub fn apply_clause(mut column: ColumnFragment, clause: ColumnClause) -> ColumnFragment {
    match clause {
        ColumnClause::Nullable(nullable) => column.nullable = nullable && !column.primary_key,
        ColumnClause::Default(value) => column.default = Some(value),
        ColumnClause::PrimaryKey => {
            column.primary_key = true;
            column.nullable = false;
        }
        ColumnClause::Unique => column.unique = true,
        ColumnClause::Check(parts) => column.check.extend(parts),
        ColumnClause::References(spec) => column.references = Some(spec),
        ColumnClause::Collate(collation) => column.extras.collate = Some(collation),
        ColumnClause::Enforced(enforced) => column.extras.enforced = Some(enforced),
        ColumnClause::Encode(encoding) => column.extras.encode = Some(encoding),
        ColumnClause::DistKey => column.extras.distkey = true,
        ColumnClause::SortKey => column.extras.sortkey = true,
        ColumnClause::Generated(spec) => column.extras.generated = Some(spec),
        ColumnClause::Comment(comment) => column.extras.comment = Some(comment),
        ColumnClause::Options(options) => column.extras.options = Some(options),
        ColumnClause::OnUpdate(expr) => column.extras.on_update = Some(expr),
        ColumnClause::Encrypt(spec) => column.extras.encrypt = Some(spec),
        ColumnClause::AutoIncrement => column.extras.autoincrement = true,
        ColumnClause::Identity(spec) => column.extras.identity = Some(spec),
        ColumnClause::Named(name, inner) => {
            if let Some(block) = named_block(&column.name, name, &inner) {
                column.constraints.push(block);
            }
            column = apply_clause(column, *inner);
        }
    }
    column
}

/// Constraint block recorded for a named inline clause, if it is one that
/// shows up among table constraints.
fn named_block(column: &str, name: String, clause: &ColumnClause) -> Option<ConstraintBlock> {
    let body = match clause {
        ColumnClause::PrimaryKey => ConstraintBody::PrimaryKey {
            columns: vec![column.to_string()],
            enforced: None,
        },
        ColumnClause::Unique => ConstraintBody::Unique(vec![column.to_string()]),
        ColumnClause::Check(parts) => ConstraintBody::Check(parts.clone()),
        ColumnClause::References(spec) => ConstraintBody::ForeignKey {
            columns: vec![column.to_string()],
            references: spec.clone(),
        },
        _ => return None,
    };
    Some(ConstraintBlock {
        constraint_name: Some(name),
        body,
    })
}

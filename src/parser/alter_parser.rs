//! ALTER TABLE … ADD parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! ALTER TABLE [ONLY] [IF EXISTS] [schema.]table [WITH CHECK | WITH NOCHECK] ADD
//!     [CONSTRAINT name] FOREIGN KEY (cols) REFERENCES t (cols) [ON DELETE …]
//!   | [CONSTRAINT name] UNIQUE (cols)
//!   | [CONSTRAINT name] CHECK (expr)
//!   | [CONSTRAINT name] PRIMARY KEY (cols)
//!   | [CONSTRAINT name] DEFAULT value FOR column
//! ```

use super::ast::{AlterAction, AlterDecl, ConstraintBody, Statement};
use super::constraint_parser::{parse_constraint_name, parse_default, parse_table_constraint};
use super::grammar::Grammar;
use super::token_parser_base::{ParseResult, TokenParser};

pub fn register(grammar: &mut Grammar) {
    grammar.register(
        "alter_table",
        |base| base.check_word_ci("ALTER") && base.peek_word_ci(1, "TABLE"),
        reduce_alter_table,
    );
}

fn reduce_alter_table(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("ALTER")?;
    base.require_word_ci("TABLE")?;
    base.expect_word_ci("ONLY");
    base.expect_words_ci(&["IF", "EXISTS"]);
    let (schema, alter_table_name) = base.require_schema_qualified_name()?;

    // Skip optional WITH CHECK or WITH NOCHECK
    if base.expect_word_ci("WITH") && !base.expect_word_ci("CHECK") {
        base.require_word_ci("NOCHECK")?;
    }

    base.require_word_ci("ADD")?;
    let action = parse_alter_action(base)?;

    Ok(Statement::Alter(AlterDecl {
        alter_table_name,
        schema,
        action,
    }))
}

fn parse_alter_action(base: &mut TokenParser) -> ParseResult<AlterAction> {
    let start = base.pos();
    let constraint_name = parse_constraint_name(base)?;

    if base.check_word_ci("DEFAULT") {
        let value = parse_default(base)?;
        let column = if base.expect_word_ci("FOR") {
            Some(base.require_identifier()?)
        } else {
            None
        };
        return Ok(AlterAction::Default {
            constraint_name,
            value,
            column,
        });
    }

    base.set_pos(start);
    let Some(block) = parse_table_constraint(base)? else {
        return Err(base.error("expected constraint or DEFAULT after ADD"));
    };

    let constraint_name = block.constraint_name;
    Ok(match block.body {
        ConstraintBody::ForeignKey {
            columns,
            references,
        } => AlterAction::ForeignKey {
            constraint_name,
            columns,
            references,
        },
        ConstraintBody::Unique(columns) => AlterAction::Unique {
            constraint_name,
            columns,
        },
        ConstraintBody::Check(statement) => AlterAction::Check {
            constraint_name,
            statement,
        },
        ConstraintBody::PrimaryKey { columns, .. } => AlterAction::PrimaryKey {
            constraint_name,
            columns,
        },
    })
}

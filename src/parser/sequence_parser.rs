//! CREATE SEQUENCE parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! CREATE SEQUENCE [IF NOT EXISTS] [schema.]name [AS BIGINT]
//!     [INCREMENT [BY] n] [START [WITH] n]
//!     [MINVALUE n | NO MINVALUE] [MAXVALUE n | NO MAXVALUE]
//!     [CACHE n | NO CACHE] [CYCLE | NO CYCLE]
//! ```
//!
//! Options may appear in any order; only the ones written are recorded.

use super::ast::{SequenceDecl, Statement};
use super::grammar::{is_create_of, Grammar};
use super::token_parser_base::{ParseResult, TokenParser};

pub fn register(grammar: &mut Grammar) {
    grammar.register(
        "create_sequence",
        |base| is_create_of(base, "SEQUENCE"),
        reduce_create_sequence,
    );
}

fn reduce_create_sequence(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("CREATE")?;
    base.require_word_ci("SEQUENCE")?;
    let mut decl = SequenceDecl {
        if_not_exists: base.expect_words_ci(&["IF", "NOT", "EXISTS"]),
        ..SequenceDecl::default()
    };
    let (schema, sequence_name) = base.require_schema_qualified_name()?;
    decl.schema = schema;
    decl.sequence_name = sequence_name;

    parse_sequence_options(base, &mut decl)?;
    Ok(Statement::Sequence(decl))
}

fn parse_sequence_options(base: &mut TokenParser, decl: &mut SequenceDecl) -> ParseResult<()> {
    loop {
        // AS <data_type>
        if base.expect_word_ci("AS") {
            decl.data_type = Some(base.require_identifier()?);
            continue;
        }

        // INCREMENT [BY] <value>
        if base.expect_word_ci("INCREMENT") {
            base.expect_word_ci("BY");
            decl.increment = Some(base.require_signed_integer()?);
            continue;
        }

        // START [WITH] <value>
        if base.expect_word_ci("START") {
            base.expect_word_ci("WITH");
            decl.start = Some(base.require_signed_integer()?);
            continue;
        }

        if base.expect_word_ci("MINVALUE") {
            decl.minvalue = Some(base.require_signed_integer()?);
            continue;
        }

        if base.expect_word_ci("MAXVALUE") {
            decl.maxvalue = Some(base.require_signed_integer()?);
            continue;
        }

        if base.expect_word_ci("CACHE") {
            decl.cache = Some(base.require_signed_integer()?);
            continue;
        }

        if base.expect_word_ci("CYCLE") {
            decl.cycle = Some(true);
            continue;
        }

        // NO MINVALUE, NO MAXVALUE, NO CYCLE, NO CACHE
        if base.check_word_ci("NO") {
            if base.peek_word_ci(1, "CYCLE") {
                decl.cycle = Some(false);
            } else if !(base.peek_word_ci(1, "MINVALUE")
                || base.peek_word_ci(1, "MAXVALUE")
                || base.peek_word_ci(1, "CACHE"))
            {
                base.advance();
                return Err(base.error("expected MINVALUE, MAXVALUE, CACHE or CYCLE after NO"));
            }
            base.advance();
            base.advance();
            continue;
        }

        return Ok(());
    }
}

//! Statement grammar engine.
//!
//! The grammar is a table of named productions. Each statement family module
//! registers its productions with a cheap lookahead predicate and a reducer
//! that consumes one statement and returns its tree:
//!
//! ```ignore
//! pub fn register(grammar: &mut Grammar) {
//!     grammar.register("create_sequence", |base| is_create_of(base, "SEQUENCE"), reduce_create_sequence);
//! }
//! ```
//!
//! For every statement the engine tries the productions whose lookahead
//! accepts, in registration order, rewinding between attempts. The first
//! reducer that succeeds wins. When all of them fail, the error from the
//! attempt that got furthest is reported along with the names of every
//! production tried.
//!
//! Statements end at `;`, `GO`, end of input, or the first token of the next
//! statement.

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use super::ast::Statement;
use super::token_parser_base::{ParseResult, TokenParser};
use super::tokens::{is_boundary_word, Token};
use super::{
    alter_parser, index_parser, schema_parser, sequence_parser, statement_parser, storage_parser,
    table_parser, type_def_parser,
};
use crate::error::SyntaxError;

pub type Lookahead = fn(&TokenParser) -> bool;
pub type Reducer = fn(&mut TokenParser) -> ParseResult<Statement>;

/// A named grammar production.
pub struct Production {
    pub name: &'static str,
    pub lookahead: Lookahead,
    pub reduce: Reducer,
}

/// Ordered production table.
#[derive(Default)]
pub struct Grammar {
    productions: Vec<Production>,
}

static STANDARD_GRAMMAR: Lazy<Grammar> = Lazy::new(Grammar::standard);

/// The grammar with every supported statement family registered.
pub fn standard_grammar() -> &'static Grammar {
    &STANDARD_GRAMMAR
}

/// Words allowed between CREATE and the object keyword.
const CREATE_MODIFIERS: &[&str] = &[
    "OR",
    "REPLACE",
    "EXTERNAL",
    "TEMP",
    "TEMPORARY",
    "TRANSIENT",
    "GLOBAL",
    "LOCAL",
    "UNIQUE",
    "CLUSTERED",
    "NONCLUSTERED",
    "BIGFILE",
    "SMALLFILE",
    "UNDO",
];

/// True when the current statement is `CREATE [modifiers…] <object>`.
pub fn is_create_of(base: &TokenParser, object: &str) -> bool {
    if !base.check_word_ci("CREATE") {
        return false;
    }
    let mut offset = 1;
    while let Some(token) = base.peek(offset) {
        if token.is_bare_word(object) {
            return true;
        }
        if !CREATE_MODIFIERS.iter().any(|m| token.is_bare_word(m)) {
            return false;
        }
        offset += 1;
    }
    false
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the grammar for every supported statement family.
    pub fn standard() -> Self {
        let mut grammar = Self::new();
        table_parser::register(&mut grammar);
        alter_parser::register(&mut grammar);
        index_parser::register(&mut grammar);
        schema_parser::register(&mut grammar);
        type_def_parser::register(&mut grammar);
        sequence_parser::register(&mut grammar);
        storage_parser::register(&mut grammar);
        statement_parser::register(&mut grammar);
        debug!(productions = grammar.productions.len(), "built statement grammar");
        grammar
    }

    /// Add a production after the ones already registered.
    pub fn register(&mut self, name: &'static str, lookahead: Lookahead, reduce: Reducer) {
        self.productions.push(Production {
            name,
            lookahead,
            reduce,
        });
    }

    pub fn production_names(&self) -> Vec<&'static str> {
        self.productions.iter().map(|p| p.name).collect()
    }

    /// Parse a whole token stream into statement trees, in source order.
    pub fn parse(&self, tokens: Vec<Token>) -> Result<Vec<Statement>, SyntaxError> {
        let mut base = TokenParser::new(tokens);
        let mut statements = Vec::new();

        loop {
            skip_separators(&mut base);
            if base.is_at_end() {
                break;
            }

            let start = base.pos();
            let (production, statement) = self.parse_statement(&mut base)?;

            if !at_statement_end(&base) {
                let mut err = base.error("expected end of statement");
                err.expected = vec![production];
                err.statement = base.tokens_to_string(start, base.pos());
                return Err(err);
            }

            debug!(
                production,
                kind = statement.kind(),
                tokens = base.pos() - start,
                "reduced statement"
            );
            statements.push(statement);
        }

        Ok(statements)
    }

    fn parse_statement(
        &self,
        base: &mut TokenParser,
    ) -> Result<(&'static str, Statement), SyntaxError> {
        let start = base.pos();
        let mut attempted = Vec::new();
        let mut furthest: Option<(usize, SyntaxError)> = None;

        for production in &self.productions {
            if !(production.lookahead)(base) {
                continue;
            }
            attempted.push(production.name);
            trace!(production = production.name, "trying production");

            match (production.reduce)(base) {
                Ok(statement) => return Ok((production.name, statement)),
                Err(err) => {
                    let reached = base.pos();
                    trace!(production = production.name, reached, error = %err, "production failed");
                    if furthest.as_ref().map_or(true, |(pos, _)| reached > *pos) {
                        furthest = Some((reached, err));
                    }
                    base.set_pos(start);
                }
            }
        }

        let (reached, mut err) = match furthest {
            Some(found) => found,
            None => {
                attempted = self.production_names();
                (start, base.error("expected a DDL statement"))
            }
        };
        err.expected = attempted;
        err.statement = base.tokens_to_string(start, reached.max(start + 1));
        Err(err)
    }
}

fn skip_separators(base: &mut TokenParser) {
    while base.expect_punct(";") || base.expect_word_ci("GO") {}
}

fn at_statement_end(base: &TokenParser) -> bool {
    match base.current_token() {
        None => true,
        Some(token) => token.is_punct(";") || is_boundary_word(token) || token.is_bare_word("SET"),
    }
}

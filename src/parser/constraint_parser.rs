//! Constraint and column-clause parsing
//!
//! Recognizes the clauses that can follow a column type and the constraints
//! that can appear as table elements or in `ALTER TABLE … ADD`.
//!
//! ## Supported Syntax
//!
//! Table-level constraints:
//! ```sql
//! CONSTRAINT [name] PRIMARY KEY CLUSTERED ([Col1], [Col2] DESC)
//! CONSTRAINT uq UNIQUE (col1, col2)
//! CONSTRAINT fk FOREIGN KEY (col) REFERENCES schema.table (col) ON DELETE CASCADE
//! CHECK (price > 0 AND discount < price)
//! PRIMARY KEY (id) NOT ENFORCED
//! ```
//!
//! Column clauses:
//! ```sql
//! DEFAULT 'x' | DEFAULT (getdate()) | DEFAULT NEXT VALUE FOR dbo.seq
//! REFERENCES t (id) ON UPDATE SET NULL DEFERRABLE INITIALLY DEFERRED
//! GENERATED ALWAYS AS (a + b) STORED
//! ENCRYPT NO SALT USING 'AES256'
//! ```

use super::ast::{
    ConstraintBlock, ConstraintBody, DefaultValue, EncryptSpec, GeneratedSpec, IdentitySpec,
    ReferenceSpec,
};
use super::token_parser_base::{ParseResult, TokenParser};
use super::tokens::{is_boundary_word, is_call_target, tokens_to_text, Token, TokenKind};
use super::type_parser::is_clause_word;

const DEFAULT_ENCRYPTION_ALGORITHM: &str = "'AES192'";

// ============================================================================
// Table-level constraints
// ============================================================================

/// Parse `CONSTRAINT name` if present.
pub fn parse_constraint_name(base: &mut TokenParser) -> ParseResult<Option<String>> {
    if base.expect_word_ci("CONSTRAINT") {
        Ok(Some(base.require_identifier()?))
    } else {
        Ok(None)
    }
}

/// Parse a table-level constraint.
///
/// Returns `Ok(None)` without consuming anything when the element is not a
/// constraint (i.e. it is a column definition).
pub fn parse_table_constraint(base: &mut TokenParser) -> ParseResult<Option<ConstraintBlock>> {
    let start = base.pos();
    let constraint_name = parse_constraint_name(base)?;

    let body = if base.check_word_ci("PRIMARY") && base.peek_word_ci(1, "KEY") {
        base.advance();
        base.advance();
        skip_clustering(base);
        let columns = parse_key_columns(base)?;
        let enforced = parse_enforced(base);
        ConstraintBody::PrimaryKey { columns, enforced }
    } else if base.check_word_ci("UNIQUE") {
        base.advance();
        base.expect_word_ci("KEY");
        skip_clustering(base);
        ConstraintBody::Unique(parse_key_columns(base)?)
    } else if base.check_word_ci("CHECK") {
        ConstraintBody::Check(parse_check(base)?)
    } else if base.check_word_ci("FOREIGN") && base.peek_word_ci(1, "KEY") {
        base.advance();
        base.advance();
        let columns = parse_key_columns(base)?;
        let references = parse_references(base)?;
        ConstraintBody::ForeignKey { columns, references }
    } else if constraint_name.is_some() {
        return Err(base.error("expected PRIMARY KEY, UNIQUE, CHECK or FOREIGN KEY"));
    } else {
        base.set_pos(start);
        return Ok(None);
    };

    Ok(Some(ConstraintBlock {
        constraint_name,
        body,
    }))
}

/// Skip CLUSTERED / NONCLUSTERED after PRIMARY KEY or UNIQUE
fn skip_clustering(base: &mut TokenParser) {
    if !base.expect_word_ci("CLUSTERED") {
        base.expect_word_ci("NONCLUSTERED");
    }
}

/// Parse `(col [ASC|DESC], …)` returning column names.
pub fn parse_key_columns(base: &mut TokenParser) -> ParseResult<Vec<String>> {
    base.require_punct("(")?;
    let mut columns = Vec::new();
    loop {
        columns.push(base.require_identifier()?);
        if !base.expect_word_ci("ASC") {
            base.expect_word_ci("DESC");
        }
        if base.expect_punct(",") {
            continue;
        }
        base.require_punct(")")?;
        return Ok(columns);
    }
}

/// `ENFORCED` → true, `NOT ENFORCED` → false
pub fn parse_enforced(base: &mut TokenParser) -> Option<bool> {
    if base.expect_word_ci("ENFORCED") {
        Some(true)
    } else if base.expect_words_ci(&["NOT", "ENFORCED"]) {
        Some(false)
    } else {
        None
    }
}

// ============================================================================
// REFERENCES
// ============================================================================

/// Parse a `REFERENCES` clause.
pub fn parse_references(base: &mut TokenParser) -> ParseResult<ReferenceSpec> {
    base.require_word_ci("REFERENCES")?;
    let (schema, table) = base.require_schema_qualified_name()?;
    let mut spec = ReferenceSpec::new(schema, table);

    if base.check_punct("(") {
        spec.columns = base.require_name_list()?.into_iter().map(Some).collect();
    }

    loop {
        if base.check_word_ci("ON") && base.peek_word_ci(1, "DELETE") {
            base.advance();
            base.advance();
            spec.on_delete = Some(parse_reference_action(base)?);
        } else if base.check_word_ci("ON") && base.peek_word_ci(1, "UPDATE") {
            base.advance();
            base.advance();
            spec.on_update = Some(parse_reference_action(base)?);
        } else if base.expect_words_ci(&["NOT", "DEFERRABLE"]) {
            spec.deferrable_initially = Some("NOT".to_string());
            if base.expect_word_ci("INITIALLY") {
                base.require_identifier()?;
            }
        } else if base.expect_word_ci("DEFERRABLE") {
            let mode = if base.expect_word_ci("INITIALLY") {
                base.require_identifier()?
            } else {
                "IMMEDIATE".to_string()
            };
            spec.deferrable_initially = Some(mode);
        } else {
            return Ok(spec);
        }
    }
}

/// `CASCADE`, `RESTRICT`, `SET NULL`, `SET DEFAULT`, `NO ACTION`
fn parse_reference_action(base: &mut TokenParser) -> ParseResult<String> {
    if base.check_any_word_ci(&["SET", "NO"]) {
        let first = base.require_identifier()?;
        let second = base.require_identifier()?;
        return Ok(format!("{} {}", first, second));
    }
    base.require_identifier()
}

// ============================================================================
// CHECK
// ============================================================================

/// Parse `CHECK (expr)` into expression parts.
pub fn parse_check(base: &mut TokenParser) -> ParseResult<Vec<String>> {
    base.require_word_ci("CHECK")?;
    let inner = base.require_parenthesized()?;
    Ok(check_parts(&inner))
}

/// Split a check expression into parts, keeping function calls and nested
/// groups as single parts.
pub fn check_parts(tokens: &[Token]) -> Vec<String> {
    let mut parts = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        let opens_call = is_call_target(token)
            && tokens.get(i + 1).map(|t| t.is_punct("(")).unwrap_or(false);
        if opens_call {
            let end = matching_paren(tokens, i + 1);
            parts.push(tokens_to_text(&tokens[i..end]));
            i = end;
        } else if token.is_punct("(") {
            let end = matching_paren(tokens, i);
            parts.push(tokens_to_text(&tokens[i..end]));
            i = end;
        } else {
            parts.push(token.text.clone());
            i += 1;
        }
    }
    parts
}

/// Index just past the `)` matching the `(` at `open`, or the slice end.
fn matching_paren(tokens: &[Token], open: usize) -> usize {
    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        if token.is_punct("(") {
            depth += 1;
        } else if token.is_punct(")") {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return open + offset + 1;
            }
        }
    }
    tokens.len()
}

// ============================================================================
// DEFAULT
// ============================================================================

/// Parse a `DEFAULT` clause, including continuation words.
///
/// A trailing `FOR col` that is not a sequence reference is left unconsumed
/// for `ALTER TABLE … ADD DEFAULT x FOR col`.
pub fn parse_default(base: &mut TokenParser) -> ParseResult<DefaultValue> {
    base.require_word_ci("DEFAULT")?;
    let mut value = parse_default_start(base)?;

    loop {
        let Some(token) = base.current_token() else {
            break;
        };

        if token.is_bare_word("FOR") {
            let dotted = base.peek_punct(2, ".");
            let next_value = value.as_text().eq_ignore_ascii_case("NEXT VALUE");
            if !(dotted || next_value) {
                break;
            }
            base.advance();
            let name = base.require_qualified_name()?.join(".");
            value = DefaultValue::NextValueFor(name);
            break;
        }

        if token.is_punct("(") {
            let inner = base.require_parenthesized()?;
            value = append_default(value, &format!("({})", tokens_to_text(&inner)), false);
        } else if token.is_punct("::") {
            base.advance();
            let target = base.require_identifier()?;
            value = append_default(value, &format!("::{}", target), false);
        } else if continues_default(token) {
            let text = token.text.clone();
            base.advance();
            value = append_default(value, &text, true);
        } else {
            break;
        }
    }

    Ok(value)
}

/// First element of a default value.
fn parse_default_start(base: &mut TokenParser) -> ParseResult<DefaultValue> {
    if base.check_punct("(") {
        let mut inner = base.require_parenthesized()?;
        while is_wrapped_in_parens(&inner) {
            inner = inner[1..inner.len() - 1].to_vec();
        }
        return Ok(match inner.as_slice() {
            [single] => literal_default(single),
            [minus, number] if minus.is_punct("-") && number.kind == TokenKind::Number => {
                literal_default(&Token::new(
                    TokenKind::Number,
                    format!("-{}", number.text),
                    number.line,
                    number.column,
                ))
            }
            _ => DefaultValue::Text(tokens_to_text(&inner)),
        });
    }

    if let Some(n) = base.parse_signed_integer() {
        return Ok(DefaultValue::Int(n));
    }

    let token = base
        .current_token()
        .cloned()
        .ok_or_else(|| base.error("expected default value"))?;

    match token.kind {
        TokenKind::String | TokenKind::Number => {
            base.advance();
            Ok(literal_default(&token))
        }
        _ if token.is_word() => {
            base.advance();
            if is_call_target(&token) && base.check_punct("(") {
                let args = base.require_parenthesized()?;
                Ok(DefaultValue::Text(format!(
                    "{}({})",
                    token.text,
                    tokens_to_text(&args)
                )))
            } else {
                Ok(DefaultValue::Text(token.text))
            }
        }
        _ => Err(base.error("expected default value")),
    }
}

fn literal_default(token: &Token) -> DefaultValue {
    if token.kind == TokenKind::Number {
        if let Ok(n) = token.text.parse::<i64>() {
            return DefaultValue::Int(n);
        }
    }
    DefaultValue::Text(token.text.clone())
}

fn is_wrapped_in_parens(tokens: &[Token]) -> bool {
    tokens.len() >= 2
        && tokens[0].is_punct("(")
        && matching_paren(tokens, 0) == tokens.len()
}

fn continues_default(token: &Token) -> bool {
    let word_like = token.is_word()
        || matches!(token.kind, TokenKind::String | TokenKind::Number);
    word_like && !is_clause_word(token) && !is_boundary_word(token)
}

/// Append a continuation part to a default value.
///
/// Numeric defaults become text once continued. A doubled closing parenthesis
/// produced by the append collapses to one.
pub fn append_default(value: DefaultValue, part: &str, spaced: bool) -> DefaultValue {
    let mut text = value.as_text();
    if spaced {
        text.push(' ');
    }
    text.push_str(part);
    if text.ends_with("))") {
        text.pop();
    }
    DefaultValue::Text(text)
}

// ============================================================================
// Other column clauses
// ============================================================================

/// `GENERATED {ALWAYS | BY DEFAULT} AS expr [STORED | VIRTUAL]`
pub fn parse_generated(base: &mut TokenParser) -> ParseResult<GeneratedSpec> {
    base.require_word_ci("GENERATED")?;
    let always = if base.expect_word_ci("ALWAYS") {
        true
    } else {
        base.require_word_ci("BY")?;
        base.require_word_ci("DEFAULT")?;
        false
    };
    base.require_word_ci("AS")?;

    let expression = if base.check_punct("(") {
        tokens_to_text(&base.require_parenthesized()?)
    } else {
        let name = base.require_identifier()?;
        if base.check_punct("(") {
            format!("{}({})", name, tokens_to_text(&base.require_parenthesized()?))
        } else {
            name
        }
    };

    let stored = base.expect_word_ci("STORED");
    if !stored {
        base.expect_word_ci("VIRTUAL");
    }

    Ok(GeneratedSpec {
        always,
        expression,
        stored,
    })
}

/// `ENCRYPT [NO SALT | SALT] [USING 'algorithm']`
pub fn parse_encrypt(base: &mut TokenParser) -> ParseResult<EncryptSpec> {
    base.require_word_ci("ENCRYPT")?;
    let mut salt = true;
    if base.expect_words_ci(&["NO", "SALT"]) {
        salt = false;
    } else {
        base.expect_word_ci("SALT");
    }
    let encryption_algorithm = if base.expect_word_ci("USING") {
        match base.current_token() {
            Some(t) if t.kind == TokenKind::String => base
                .take_text()
                .unwrap_or_else(|| DEFAULT_ENCRYPTION_ALGORITHM.to_string()),
            _ => return Err(base.error("expected encryption algorithm string")),
        }
    } else {
        DEFAULT_ENCRYPTION_ALGORITHM.to_string()
    };
    Ok(EncryptSpec {
        salt,
        encryption_algorithm,
    })
}

/// `IDENTITY [(seed, increment)]`; seed and increment default to 1
pub fn parse_identity(base: &mut TokenParser) -> ParseResult<IdentitySpec> {
    base.require_word_ci("IDENTITY")?;
    if !base.expect_punct("(") {
        return Ok(IdentitySpec {
            seed: 1,
            increment: 1,
        });
    }
    let seed = base.require_signed_integer()?;
    base.require_punct(",")?;
    let increment = base.require_signed_integer()?;
    base.require_punct(")")?;
    Ok(IdentitySpec { seed, increment })
}

/// `ON UPDATE expr`, e.g. `ON UPDATE CURRENT_TIMESTAMP`
pub fn parse_on_update(base: &mut TokenParser) -> ParseResult<String> {
    base.require_word_ci("ON")?;
    base.require_word_ci("UPDATE")?;
    let name = base.require_identifier()?;
    if base.check_punct("(") {
        let args = base.require_parenthesized()?;
        return Ok(format!("{}({})", name, tokens_to_text(&args)));
    }
    Ok(name)
}

/// Consume a string literal, returning it with its quotes.
pub fn require_string(base: &mut TokenParser) -> ParseResult<String> {
    match base.current_token() {
        Some(t) if t.kind == TokenKind::String => {
            let text = t.text.clone();
            base.advance();
            Ok(text)
        }
        _ => Err(base.error("expected string literal")),
    }
}

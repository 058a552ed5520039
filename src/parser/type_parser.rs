//! Column type resolution.
//!
//! Reads the words, generics, array markers and size suffix that make up a
//! column type and produces canonical type text plus an optional size.
//!
//! ## Supported Syntax
//!
//! ```sql
//! INT
//! VARCHAR(255) | NUMERIC(10, 2) | NVARCHAR(max)
//! TIMESTAMP(6) WITH TIME ZONE
//! INT[] | INT ARRAY
//! ARRAY<STRUCT<a INT64, b STRING>>
//! public.my_type
//! ENUM('a', 'b')
//! ```
//!
//! Canonical text joins parts with single spaces; `,` and `[]` attach to the
//! preceding part and dotted names keep no spaces. Resolving canonical text a
//! second time yields the same text.

use super::ast::{Size, TypeExpression};
use super::token_parser_base::{ParseResult, TokenParser};
use super::tokens::{is_boundary_word, tokens_to_text, Token, TokenKind};

/// Words that end a column type and start a column clause.
pub const COLUMN_CLAUSE_WORDS: &[&str] = &[
    "NOT",
    "NULL",
    "DEFAULT",
    "PRIMARY",
    "UNIQUE",
    "CHECK",
    "REFERENCES",
    "FOREIGN",
    "CONSTRAINT",
    "COLLATE",
    "ENCODE",
    "DISTKEY",
    "SORTKEY",
    "GENERATED",
    "ENFORCED",
    "COMMENT",
    "OPTIONS",
    "ON",
    "ENCRYPT",
    "IDENTITY",
    "AUTO_INCREMENT",
    "AUTOINCREMENT",
];

/// True when the token is an unquoted column clause word.
pub fn is_clause_word(token: &Token) -> bool {
    COLUMN_CLAUSE_WORDS.iter().any(|w| token.is_bare_word(w))
}

/// Result of resolving a type position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    Type(TypeExpression),
    /// A type position that actually holds a column property, e.g.
    /// `ENCODE zstd`
    Property { key: String, value: String },
}

/// Accumulates canonical type text.
#[derive(Default)]
struct TypeText {
    text: String,
}

impl TypeText {
    /// Append a part separated by a single space.
    fn push(&mut self, part: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(part);
    }

    /// Append a part with no separating space.
    fn attach(&mut self, part: &str) {
        self.text.push_str(part);
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Resolve the type starting at the current token.
///
/// Stops before a column clause word, `,`, `)`, `;` or end of input when not
/// nested inside `<…>`.
pub fn resolve_type(base: &mut TokenParser) -> ParseResult<ResolvedType> {
    if base.check_word_ci("ENCODE") {
        base.advance();
        let value = base.require_identifier()?;
        return Ok(ResolvedType::Property {
            key: "encode".to_string(),
            value,
        });
    }

    let start = base.pos();
    let mut out = TypeText::default();
    let mut size = None;
    let mut depth = 0usize;
    let mut saw_generic = false;

    while let Some(token) = base.current_token() {
        if depth == 0 && ends_type(token) {
            break;
        }

        if token.is_punct("<") {
            out.push("<");
            depth += 1;
            saw_generic = true;
            base.advance();
        } else if token.is_punct(">") {
            out.push(">");
            depth -= 1;
            base.advance();
        } else if token.is_punct(",") {
            out.attach(",");
            base.advance();
        } else if token.is_punct(".") && !out.is_empty() {
            base.advance();
            let part = base.require_identifier()?;
            out.attach(".");
            out.attach(&part);
        } else if token.is_punct("[") && base.peek_punct(1, "]") {
            out.attach("[]");
            base.advance();
            base.advance();
        } else if token.is_punct("(") {
            let inner = base.require_parenthesized()?;
            match parse_size(&inner) {
                Some(parsed) if depth == 0 && size.is_none() => size = Some(parsed),
                _ => {
                    out.attach("(");
                    out.attach(&tokens_to_text(&inner));
                    out.attach(")");
                }
            }
        } else if token.is_bare_word("ARRAY") && !base.peek_punct(1, "<") {
            if depth == 0 && !saw_generic {
                out.attach("[]");
            } else {
                out.push("ARRAY");
            }
            base.advance();
        } else if token.is_word() || depth > 0 {
            out.push(&token.text);
            base.advance();
        } else {
            break;
        }
    }

    if depth > 0 {
        base.set_pos(start);
        return Err(base.error("unclosed '<' in type"));
    }
    if out.is_empty() {
        return Err(base.error("expected data type"));
    }

    let mut text = out.text;
    if saw_generic {
        if let Some(stripped) = text.strip_suffix("[]") {
            text = format!("{} ARRAY", stripped);
        }
    }
    Ok(ResolvedType::Type(TypeExpression { text, size }))
}

/// Resolve a type and require a real type rather than a property.
pub fn require_type(base: &mut TokenParser) -> ParseResult<TypeExpression> {
    match resolve_type(base)? {
        ResolvedType::Type(t) => Ok(t),
        ResolvedType::Property { .. } => Err(base.error("expected data type")),
    }
}

fn ends_type(token: &Token) -> bool {
    token.is_punct(",")
        || token.is_punct(")")
        || token.is_punct(";")
        || token.is_punct(">")
        || is_clause_word(token)
        || is_boundary_word(token)
}

/// Interpret the contents of a type's parentheses as a size.
///
/// `n` → `Int`, `p, s` → `Pair`, `max` → `Max`; anything else is not a size.
pub fn parse_size(inner: &[Token]) -> Option<Size> {
    let number = |t: &Token| {
        if t.kind == TokenKind::Number {
            t.text.parse::<i64>().ok()
        } else {
            None
        }
    };
    match inner {
        [n] if n.is_bare_word("max") => Some(Size::Max),
        [n] => number(n).map(Size::Int),
        [p, comma, s] if comma.is_punct(",") => Some(Size::Pair(number(p)?, number(s)?)),
        _ => None,
    }
}

//! Token contract for the DDL grammar and the adapter from sqlparser tokens.
//!
//! Lexing itself is delegated to sqlparser's `Tokenizer`. This module only
//! reshapes its output into positioned [`Token`]s:
//!
//! - whitespace and comments are dropped
//! - `[name]` becomes one quoted identifier (MS-SQL bracket quoting), while an
//!   empty `[]` stays as two punctuation tokens (array suffix)
//! - hyphenated names written without spaces (`my-project.dataset`) become a
//!   single identifier, as BigQuery allows
//! - a number glued to a word (`10M`, `5k`) becomes a single identifier
//! - `>>` is split into two `>` so nested generics close correctly

use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Location, Token as SqlToken, TokenWithSpan, Tokenizer, Word};

use crate::error::DdlError;

/// Lexical category of a [`Token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted word that sqlparser recognizes as a SQL keyword
    Keyword(Keyword),
    /// Unquoted non-keyword word
    Identifier,
    /// Identifier written with `"…"`, `` `…` `` or `[…]`
    QuotedIdentifier,
    /// Single-quoted (or national) string literal, quotes kept in `text`
    String,
    /// Numeric literal
    Number,
    /// Operators and punctuation: `.` `,` `(` `)` `<` `>` `@` `=` `;` …
    Punct,
}

/// A positioned token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u64,
    pub column: u64,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u64, column: u64) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Build an unquoted word token, classifying it as keyword or identifier
    /// the same way the tokenizer does.
    pub fn word(text: &str, line: u64, column: u64) -> Self {
        let kind = match SqlToken::make_word(text, None) {
            SqlToken::Word(w) if w.keyword != Keyword::NoKeyword => TokenKind::Keyword(w.keyword),
            _ => TokenKind::Identifier,
        };
        Self::new(kind, text, line, column)
    }

    /// True for any unquoted or quoted word (keyword or identifier).
    pub fn is_word(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Keyword(_) | TokenKind::Identifier | TokenKind::QuotedIdentifier
        )
    }

    /// True for an unquoted word equal to `word`, ignoring case.
    pub fn is_bare_word(&self, word: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword(_) | TokenKind::Identifier)
            && self.text.eq_ignore_ascii_case(word)
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }
}

/// Tokenize DDL text into positioned tokens.
pub fn tokenize(sql: &str) -> Result<Vec<Token>, DdlError> {
    let dialect = GenericDialect {};
    let raw = Tokenizer::new(&dialect, sql)
        .tokenize_with_location()
        .map_err(|e| DdlError::Tokenize {
            line: e.location.line,
            column: e.location.column,
            message: e.message,
        })?;

    let significant: Vec<TokenWithSpan> = raw
        .into_iter()
        .filter(|t| !matches!(t.token, SqlToken::Whitespace(_)))
        .collect();

    Ok(adapt_tokens(&significant))
}

/// Convert significant sqlparser tokens into [`Token`]s, applying the merge
/// rules listed in the module docs.
fn adapt_tokens(raw: &[TokenWithSpan]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let current = &raw[i];
        let start = current.span.start;

        // [name] -> quoted identifier
        if matches!(current.token, SqlToken::LBracket) {
            if let (Some(inner), Some(close)) = (raw.get(i + 1), raw.get(i + 2)) {
                if let (SqlToken::Word(w), SqlToken::RBracket) = (&inner.token, &close.token) {
                    tokens.push(Token::new(
                        TokenKind::QuotedIdentifier,
                        format!("[{}]", w.value),
                        start.line,
                        start.column,
                    ));
                    i += 3;
                    continue;
                }
            }
        }

        // >> -> > >
        if matches!(current.token, SqlToken::ShiftRight) {
            tokens.push(Token::new(TokenKind::Punct, ">", start.line, start.column));
            tokens.push(Token::new(TokenKind::Punct, ">", start.line, start.column + 1));
            i += 1;
            continue;
        }

        // Glued words: my-project-1, 10M
        if let Some((text, consumed)) = glued_identifier(raw, i) {
            tokens.push(Token::new(
                TokenKind::Identifier,
                text,
                start.line,
                start.column,
            ));
            i += consumed;
            continue;
        }

        tokens.push(convert_token(&current.token, start));
        i += 1;
    }

    tokens
}

/// Detect a run of tokens written without whitespace that forms one name.
///
/// Returns the merged text and the number of raw tokens consumed, or `None`
/// when the token at `start` does not begin such a run.
fn glued_identifier(raw: &[TokenWithSpan], start: usize) -> Option<(String, usize)> {
    let first = &raw[start];
    let mut text = match &first.token {
        SqlToken::Word(w) if w.quote_style.is_none() => w.value.clone(),
        SqlToken::Number(n, _) => {
            // Number immediately followed by a bare word: 10M, 5k
            let next = raw.get(start + 1)?;
            return match &next.token {
                SqlToken::Word(w) if w.quote_style.is_none() && adjacent(first, next) => {
                    Some((format!("{}{}", n, w.value), 2))
                }
                _ => None,
            };
        }
        _ => return None,
    };

    let mut pos = start;
    while let (Some(dash), Some(part)) = (raw.get(pos + 1), raw.get(pos + 2)) {
        if !matches!(dash.token, SqlToken::Minus)
            || !adjacent(&raw[pos], dash)
            || !adjacent(dash, part)
        {
            break;
        }
        match &part.token {
            SqlToken::Word(w) if w.quote_style.is_none() => text.push_str(&format!("-{}", w.value)),
            SqlToken::Number(n, _) => text.push_str(&format!("-{}", n)),
            _ => break,
        }
        pos += 2;
    }

    if pos == start {
        None
    } else {
        Some((text, pos - start + 1))
    }
}

fn adjacent(left: &TokenWithSpan, right: &TokenWithSpan) -> bool {
    left.span.end == right.span.start
}

fn convert_token(token: &SqlToken, at: Location) -> Token {
    let (kind, text) = match token {
        SqlToken::Word(w) => word_kind_and_text(w),
        SqlToken::Number(n, _) => (TokenKind::Number, n.clone()),
        SqlToken::SingleQuotedString(s) => {
            (TokenKind::String, format!("'{}'", s.replace('\'', "''")))
        }
        SqlToken::NationalStringLiteral(s) => {
            (TokenKind::String, format!("N'{}'", s.replace('\'', "''")))
        }
        SqlToken::DoubleQuotedString(s) => (TokenKind::String, format!("\"{}\"", s)),
        SqlToken::EscapedStringLiteral(_)
        | SqlToken::HexStringLiteral(_)
        | SqlToken::SingleQuotedByteStringLiteral(_)
        | SqlToken::DoubleQuotedByteStringLiteral(_) => (TokenKind::String, token.to_string()),
        other => (TokenKind::Punct, other.to_string()),
    };
    Token::new(kind, text, at.line, at.column)
}

fn word_kind_and_text(word: &Word) -> (TokenKind, String) {
    match word.quote_style {
        Some('[') => (TokenKind::QuotedIdentifier, format!("[{}]", word.value)),
        Some(q) => (
            TokenKind::QuotedIdentifier,
            format!("{q}{}{}", word.value, closing_quote(q)),
        ),
        None if word.keyword != Keyword::NoKeyword => {
            (TokenKind::Keyword(word.keyword), word.value.clone())
        }
        None => (TokenKind::Identifier, word.value.clone()),
    }
}

fn closing_quote(open: char) -> char {
    match open {
        '[' => ']',
        other => other,
    }
}

/// Words that begin a new statement even without a preceding `;`.
const BOUNDARY_WORDS: &[&str] = &["CREATE", "ALTER", "DROP", "GO"];

/// True when the token can only start a new statement.
pub fn is_boundary_word(token: &Token) -> bool {
    BOUNDARY_WORDS.iter().any(|w| token.is_bare_word(w))
}

/// Words after which a `(` opens a sub-expression rather than a call.
const OPERATOR_WORDS: &[&str] = &[
    "AND", "OR", "NOT", "IN", "IS", "LIKE", "ILIKE", "BETWEEN", "EXISTS", "ANY", "ALL", "SOME",
    "CASE", "WHEN", "THEN", "ELSE", "AS",
];

/// True when `(` following this token starts a function-call argument list.
pub fn is_call_target(token: &Token) -> bool {
    token.is_word()
        && !OPERATOR_WORDS
            .iter()
            .any(|w| token.kind != TokenKind::QuotedIdentifier && token.text.eq_ignore_ascii_case(w))
}

/// Render tokens back to text joined by single spaces.
///
/// No space is put around `.`, before `,` `)` `]`, after `(` `[`, or between
/// a function name and its argument list.
pub fn tokens_to_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;
    for token in tokens {
        if let Some(p) = prev {
            let glue_left = token.is_punct(".")
                || token.is_punct(",")
                || token.is_punct(")")
                || token.is_punct("]")
                || (token.is_punct("(") && is_call_target(p));
            let glue_right = p.is_punct(".") || p.is_punct("(") || p.is_punct("[");
            if !glue_left && !glue_right {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        prev = Some(token);
    }
    out
}

//! Base token parser providing the navigation helpers shared by every
//! grammar production.
//!
//! ## Usage
//!
//! Each statement family module receives a `&mut TokenParser` positioned at
//! the first token of a statement and consumes what it recognizes:
//!
//! ```ignore
//! fn reduce_create_sequence(base: &mut TokenParser) -> ParseResult<Statement> {
//!     base.require_word_ci("CREATE")?;
//!     base.require_word_ci("SEQUENCE")?;
//!     let name = base.require_qualified_name()?;
//!     // ...
//! }
//! ```
//!
//! `check_*` methods never move the cursor, `expect_*` methods advance only on
//! a match, and `require_*` methods turn a mismatch into a [`SyntaxError`]
//! positioned at the current token.

use super::tokens::{tokens_to_text, Token, TokenKind};
use crate::error::SyntaxError;

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Cursor over a token stream with the common checks needed by the grammar.
pub struct TokenParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenParser {
    /// Create a new TokenParser over already tokenized input.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ========================================================================
    // Position and state
    // ========================================================================

    /// Check if at end of tokens.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Get current position in token stream.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Set current position in token stream.
    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    // ========================================================================
    // Token access
    // ========================================================================

    /// Get current token without consuming.
    #[inline]
    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Peek at a token at an offset from current position.
    #[inline]
    pub fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    /// Advance to next token.
    #[inline]
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Consume the current token and return its text.
    pub fn take_text(&mut self) -> Option<String> {
        let text = self.current_token()?.text.clone();
        self.advance();
        Some(text)
    }

    // ========================================================================
    // Token type checks
    // ========================================================================

    /// Check if current token is an unquoted word matching (case-insensitive).
    ///
    /// Used for dialect words sqlparser does not know as keywords
    /// (e.g. "DISTKEY", "ENCODE", "CLUSTERED").
    #[inline]
    pub fn check_word_ci(&self, word: &str) -> bool {
        matches!(self.current_token(), Some(t) if t.is_bare_word(word))
    }

    /// Check the word at `offset` from the current position.
    #[inline]
    pub fn peek_word_ci(&self, offset: usize, word: &str) -> bool {
        matches!(self.peek(offset), Some(t) if t.is_bare_word(word))
    }

    /// Check if current token is one of several words.
    pub fn check_any_word_ci(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.check_word_ci(w))
    }

    /// Check if current token is the given punctuation.
    #[inline]
    pub fn check_punct(&self, punct: &str) -> bool {
        matches!(self.current_token(), Some(t) if t.is_punct(punct))
    }

    #[inline]
    pub fn peek_punct(&self, offset: usize, punct: &str) -> bool {
        matches!(self.peek(offset), Some(t) if t.is_punct(punct))
    }

    /// Check if current token can serve as a name (keyword, identifier or quoted).
    #[inline]
    pub fn check_identifier(&self) -> bool {
        matches!(self.current_token(), Some(t) if t.is_word())
    }

    // ========================================================================
    // Expect methods (check and advance)
    // ========================================================================

    /// Expect a specific word (case-insensitive), advancing if found.
    pub fn expect_word_ci(&mut self, word: &str) -> bool {
        let found = self.check_word_ci(word);
        if found {
            self.advance();
        }
        found
    }

    /// Expect a sequence of words, advancing past all of them only if every
    /// one matches.
    pub fn expect_words_ci(&mut self, words: &[&str]) -> bool {
        let matched = words
            .iter()
            .enumerate()
            .all(|(i, w)| self.peek_word_ci(i, w));
        if matched {
            self.pos += words.len();
        }
        matched
    }

    /// Expect punctuation, advancing if found.
    pub fn expect_punct(&mut self, punct: &str) -> bool {
        let found = self.check_punct(punct);
        if found {
            self.advance();
        }
        found
    }

    // ========================================================================
    // Require methods (expect or fail)
    // ========================================================================

    pub fn require_word_ci(&mut self, word: &str) -> ParseResult<()> {
        if self.expect_word_ci(word) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", word.to_uppercase())))
        }
    }

    pub fn require_punct(&mut self, punct: &str) -> ParseResult<()> {
        if self.expect_punct(punct) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", punct)))
        }
    }

    // ========================================================================
    // Identifier parsing
    // ========================================================================

    /// Parse an identifier (keyword, plain or quoted word).
    ///
    /// Returns the identifier text as written, quotes included.
    pub fn parse_identifier(&mut self) -> Option<String> {
        if self.check_identifier() {
            self.take_text()
        } else {
            None
        }
    }

    pub fn require_identifier(&mut self) -> ParseResult<String> {
        self.parse_identifier()
            .ok_or_else(|| self.error("expected identifier"))
    }

    /// Parse a dot-separated name: `a`, `a.b`, `a.b.c`.
    ///
    /// Returns the parts in source order.
    pub fn require_qualified_name(&mut self) -> ParseResult<Vec<String>> {
        let mut parts = vec![self.require_identifier()?];
        while self.check_punct(".") {
            self.advance();
            parts.push(self.require_identifier()?);
        }
        Ok(parts)
    }

    /// Parse `[schema.]name` into `(schema, name)`.
    ///
    /// Longer names keep their last two parts.
    pub fn require_schema_qualified_name(&mut self) -> ParseResult<(Option<String>, String)> {
        let mut parts = self.require_qualified_name()?;
        let name = parts.pop().unwrap_or_default();
        Ok((parts.pop(), name))
    }

    // ========================================================================
    // Numeric parsing
    // ========================================================================

    /// Parse a signed integer (positive or negative).
    pub fn parse_signed_integer(&mut self) -> Option<i64> {
        let negative = self.check_punct("-");
        let offset = usize::from(negative);
        let token = self.peek(offset)?;
        if token.kind != TokenKind::Number {
            return None;
        }
        let value = token.text.parse::<i64>().ok()?;
        self.pos += offset + 1;
        Some(if negative { -value } else { value })
    }

    pub fn require_signed_integer(&mut self) -> ParseResult<i64> {
        self.parse_signed_integer()
            .ok_or_else(|| self.error("expected integer"))
    }

    // ========================================================================
    // Parenthesized content
    // ========================================================================

    /// Consume a balanced parenthesized group and return the tokens between
    /// the outer parentheses.
    ///
    /// Position must be at `(`; afterwards it is past the matching `)`.
    pub fn require_parenthesized(&mut self) -> ParseResult<Vec<Token>> {
        if !self.check_punct("(") {
            return Err(self.error("expected '('"));
        }
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(token) = self.current_token() {
            if token.is_punct("(") {
                depth += 1;
            } else if token.is_punct(")") {
                depth -= 1;
                if depth == 0 {
                    let inner = self.tokens[start + 1..self.pos].to_vec();
                    self.advance();
                    return Ok(inner);
                }
            }
            self.advance();
        }
        self.set_pos(start);
        Err(self.error("unbalanced parentheses"))
    }

    /// Parse `(a, b, c)` where each element is a single token, returning texts.
    pub fn require_name_list(&mut self) -> ParseResult<Vec<String>> {
        self.require_punct("(")?;
        let mut names = Vec::new();
        loop {
            match self.current_token() {
                Some(t) if t.is_word() || matches!(t.kind, TokenKind::String | TokenKind::Number) => {
                    names.push(t.text.clone());
                    self.advance();
                }
                _ => return Err(self.error("expected name in list")),
            }
            if self.expect_punct(",") {
                continue;
            }
            self.require_punct(")")?;
            return Ok(names);
        }
    }

    // ========================================================================
    // Text and errors
    // ========================================================================

    /// Convert a range of tokens to text.
    pub fn tokens_to_string(&self, start_pos: usize, end_pos: usize) -> String {
        let end = end_pos.min(self.tokens.len());
        tokens_to_text(&self.tokens[start_pos.min(end)..end])
    }

    /// Build a syntax error at the current token (or after the last one).
    pub fn error(&self, message: impl Into<String>) -> SyntaxError {
        let (line, column, found) = match self.current_token() {
            Some(t) => (t.line, t.column, Some(t.text.clone())),
            None => self
                .tokens
                .last()
                .map(|t| (t.line, t.column + t.text.chars().count() as u64, None))
                .unwrap_or((1, 1, None)),
        };
        SyntaxError {
            line,
            column,
            found,
            message: message.into(),
            expected: Vec::new(),
            statement: String::new(),
        }
    }
}

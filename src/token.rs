//! Defines the `Token` and `TokenKind` types.
//!
//! These are the intermediate representation between the `Tokenizer`
//! (lexer) and the `Translator`. Lexemes keep the source text as typed:
//! string literals keep their quotes and escapes, numbers keep their sign
//! and exponent characters.

use std::borrow::Cow;
use std::fmt;

/// The kind of a `Token`.
///
/// This is a closed set. Anything the tokenizer cannot classify is folded
/// into `Eof`, with the offending text kept in the token's lexeme.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// A string literal, e.g. `"hello"`
    String,
    /// A number literal, e.g. `-1.5e3`
    Number,
    /// `true` or `TRUE`
    True,
    /// `false` or `FALSE`
    False,
    /// `null` or `NULL`
    Null,
    /// End of input, or an unrecognized character or word.
    Eof,
}

impl TokenKind {
    /// Returns `true` for the kinds that can stand as a scalar value.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Number
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::String => "a string",
            TokenKind::Number => "a number",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// A single token produced by the `Tokenizer`.
///
/// It carries its kind, the source text it was built from and the
/// location (line and column) of its first character.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token<'a> {
    /// The kind of the token.
    pub kind: TokenKind,
    /// The source text of the token. Empty only for the real end of input.
    pub lexeme: Cow<'a, str>,
    /// The 1-indexed line number where the token starts.
    pub line: usize,
    /// The 1-indexed column number where the token starts.
    pub column: usize,
    /// `false` only for a string literal cut off by the end of input.
    pub terminated: bool,
}

impl<'a> Token<'a> {
    pub(crate) fn new(
        kind: TokenKind,
        lexeme: impl Into<Cow<'a, str>>,
        line: usize,
        column: usize,
    ) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
            terminated: true,
        }
    }

    /// Returns `true` if this token marks the real end of the input, as
    /// opposed to an unrecognized character or word folded into `Eof`.
    pub fn is_end_of_input(&self) -> bool {
        self.kind == TokenKind::Eof && self.lexeme.is_empty()
    }
}

/// Renders the token the way diagnostics quote it.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end_of_input() {
            f.write_str("end of input")
        } else {
            write!(f, "'{}'", self.lexeme)
        }
    }
}

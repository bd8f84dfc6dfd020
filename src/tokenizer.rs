//! The byte-based tokenizer (lexer).
//!
//! It walks the input `&str` as bytes, classifies each byte with a lookup
//! table (`BYTE_PROPERTIES`) and uses `memchr` to jump through string
//! literals. Tokens borrow their lexemes straight from the input.
//!
//! The tokenizer never fails: anything it cannot classify becomes an
//! `Eof`-kind token whose lexeme names the offending text, and the bad
//! text is consumed so that callers always make progress.

use crate::token::{Token, TokenKind};
use memchr::{memchr2, memchr_iter, memrchr};
use std::iter::FusedIterator;

// --- The Lookup Table (LUT) ---
pub(crate) const W: u8 = 1; // Whitespace
pub(crate) const S: u8 = 2; // Structural
pub(crate) const A: u8 = 3; // ASCII letter
pub(crate) const D: u8 = 4; // Digit
pub(crate) const Q: u8 = 5; // Quote
pub(crate) const N: u8 = 6; // Sign

static BYTE_PROPERTIES: [u8; 256] = {
    let mut table = [0; 256];
    table[b' ' as usize] = W;
    table[b'\n' as usize] = W;
    table[b'\r' as usize] = W;
    table[b'\t' as usize] = W;

    table[b'{' as usize] = S;
    table[b'}' as usize] = S;
    table[b'[' as usize] = S;
    table[b']' as usize] = S;
    table[b':' as usize] = S;
    table[b',' as usize] = S;

    table[b'"' as usize] = Q;

    table[b'+' as usize] = N;
    table[b'-' as usize] = N;

    let mut b = b'0';
    while b <= b'9' {
        table[b as usize] = D;
        b += 1;
    }

    let mut b = b'a';
    while b <= b'z' {
        table[b as usize] = A;
        table[(b - b'a' + b'A') as usize] = A;
        b += 1;
    }

    // 0: everything else is unrecognized
    table
};

/// Splits JSON-like text into `Token`s.
///
/// `next_token` keeps returning end-of-input tokens once the input is
/// exhausted. The `Iterator` implementation stops right after the first
/// real end-of-input token instead.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    /// The input text.
    input: &'a str,
    /// The same input as raw bytes.
    bytes: &'a [u8],
    /// The current position (byte index) in the input.
    cursor: usize,
    /// The current line number (1-indexed).
    line: usize,
    /// The current column number (1-indexed, in characters).
    column: usize,
    /// Set once the iterator has yielded the end-of-input token.
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new `Tokenizer` over an input string.
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            bytes: input.as_bytes(),
            cursor: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Returns the next token, advancing past it.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();

        let (line, column) = (self.line, self.column);
        let byte = match self.peek() {
            Some(byte) => byte,
            None => return Token::new(TokenKind::Eof, "", line, column),
        };

        match BYTE_PROPERTIES[byte as usize] {
            S => {
                self.advance_byte();
                let kind = match byte {
                    b'{' => TokenKind::LeftBrace,
                    b'}' => TokenKind::RightBrace,
                    b'[' => TokenKind::LeftBracket,
                    b']' => TokenKind::RightBracket,
                    b':' => TokenKind::Colon,
                    b',' => TokenKind::Comma,
                    _ => unreachable!(), // LUT guarantees this
                };
                let lexeme = &self.input[self.cursor - 1..self.cursor];
                Token::new(kind, lexeme, line, column)
            }
            Q => self.lex_string(line, column),
            D | N => self.lex_number(line, column),
            A => self.lex_word(line, column),
            _ => self.lex_unrecognized(line, column),
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            if BYTE_PROPERTIES[byte as usize] != W {
                break;
            }
            self.advance_byte();
        }
    }

    /// Advances the cursor over one ASCII byte, updating line/col.
    /// Assumes the cursor is not at the end.
    #[inline]
    fn advance_byte(&mut self) -> u8 {
        let byte = self.bytes[self.cursor];
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.cursor += 1;
        byte
    }

    /// Advances the cursor over one (possibly multi-byte) character.
    fn advance_char(&mut self) {
        if let Some(c) = self.input[self.cursor..].chars().next() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.cursor += c.len_utf8();
        }
    }

    /// Moves the cursor to `end` in one step, accounting for every newline
    /// and character in between. `end` must be a char boundary.
    fn advance_to(&mut self, end: usize) {
        let segment = &self.input[self.cursor..end];
        match memrchr(b'\n', segment.as_bytes()) {
            Some(last) => {
                self.line += memchr_iter(b'\n', segment.as_bytes()).count();
                self.column = 1 + segment[last + 1..].chars().count();
            }
            None => self.column += segment.chars().count(),
        }
        self.cursor = end;
    }

    #[inline]
    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.advance_byte();
        }
    }

    /// Scans a string literal, keeping quotes and escapes verbatim.
    fn lex_string(&mut self, line: usize, column: usize) -> Token<'a> {
        let start = self.cursor;
        self.advance_byte(); // Consume opening '"'

        loop {
            let Some(offset) = memchr2(b'"', b'\\', &self.bytes[self.cursor..]) else {
                self.advance_to(self.bytes.len());
                return self.unterminated_string(start, self.cursor, line, column);
            };
            self.advance_to(self.cursor + offset);

            if self.advance_byte() == b'"' {
                let lexeme = &self.input[start..self.cursor];
                return Token::new(TokenKind::String, lexeme, line, column);
            }

            // A backslash escapes whatever character follows it.
            if self.cursor == self.bytes.len() {
                return self.unterminated_string(start, self.cursor - 1, line, column);
            }
            self.advance_char();
        }
    }

    fn unterminated_string(
        &self,
        start: usize,
        end: usize,
        line: usize,
        column: usize,
    ) -> Token<'a> {
        Token {
            terminated: false,
            ..Token::new(TokenKind::String, &self.input[start..end], line, column)
        }
    }

    /// Scans a number: `[+-]? digits* ('.' digits*)? ([eE] [+-]? digits*)?`.
    /// No digit is required anywhere.
    fn lex_number(&mut self, line: usize, column: usize) -> Token<'a> {
        let start = self.cursor;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.advance_byte();
        }
        self.skip_digits();

        if self.peek() == Some(b'.') {
            self.advance_byte();
            self.skip_digits();
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.advance_byte();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.advance_byte();
            }
            self.skip_digits();
        }

        Token::new(TokenKind::Number, &self.input[start..self.cursor], line, column)
    }

    /// Scans a run of letters and digits and matches it against the
    /// keyword literals. Unknown words come back as `Eof`-kind tokens.
    fn lex_word(&mut self, line: usize, column: usize) -> Token<'a> {
        let start = self.cursor;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric()) {
            self.advance_byte();
        }

        let word = &self.input[start..self.cursor];
        let kind = match word {
            "true" | "TRUE" => TokenKind::True,
            "false" | "FALSE" => TokenKind::False,
            "null" | "NULL" => TokenKind::Null,
            _ => TokenKind::Eof,
        };
        Token::new(kind, word, line, column)
    }

    fn lex_unrecognized(&mut self, line: usize, column: usize) -> Token<'a> {
        let start = self.cursor;
        self.advance_char();
        let lexeme = format!("<?>:{}", &self.input[start..self.cursor]);
        Token::new(TokenKind::Eof, lexeme, line, column)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.is_end_of_input();
        Some(token)
    }
}

impl FusedIterator for Tokenizer<'_> {}

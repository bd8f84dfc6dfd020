//! Contains the `Translator`, a recursive-descent parser that writes XML
//! while it reads tokens.
//!
//! Each grammar rule is a method; the single lookahead token decides which
//! branch to take. XML is appended as a side effect of parsing and is never
//! rewound. On a grammar error the rule reports a `Diagnostic` and either
//! returns to its caller or discards tokens until one of its recovery
//! tokens comes up (panic-mode recovery), so translation always finishes.
//!
//! ```text
//! document   := element
//! element    := object | array
//! object     := '{' '}' | '{' attribute (',' attribute)* '}'
//! attribute  := STRING ':' value
//! value      := object | array | STRING | NUMBER | true | false | null
//! array      := '[' ']' | '[' item (',' item)* ']'
//! item       := object | array | STRING | NUMBER | true | false | null
//! ```

use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::xml;
use crate::MAX_DEPTH_LIMIT;

// --- Recovery sets ---
// `Eof` is implied in every set: synchronization always stops there.
const ELEMENT_RECOVERY: &[TokenKind] = &[
    TokenKind::Comma,
    TokenKind::RightBrace,
    TokenKind::RightBracket,
];
const ATTRIBUTE_NAME_RECOVERY: &[TokenKind] =
    &[TokenKind::Comma, TokenKind::RightBrace, TokenKind::Colon];
const ATTRIBUTE_COLON_RECOVERY: &[TokenKind] = &[
    TokenKind::LeftBracket,
    TokenKind::LeftBrace,
    TokenKind::String,
    TokenKind::Number,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Null,
    TokenKind::Comma,
    TokenKind::RightBrace,
];
const ATTRIBUTE_VALUE_RECOVERY: &[TokenKind] = &[TokenKind::Comma, TokenKind::RightBrace];
const ITEM_RECOVERY: &[TokenKind] = &[TokenKind::Comma, TokenKind::RightBracket];

const ITEM_TAG: &str = "item";

/// Translates one document.
///
/// The translator owns its tokenizer, lookahead and output buffer and
/// borrows the diagnostic sink for the duration of the translation.
pub struct Translator<'a, 'd> {
    /// The token source.
    tokenizer: Tokenizer<'a>,
    /// The one token of lookahead.
    lookahead: Token<'a>,
    /// The XML produced so far.
    xml: String,
    /// Where grammar errors go.
    diagnostics: &'d mut Diagnostics,
    /// The maximum allowed nesting of objects and arrays.
    max_depth: usize,
    /// The *current* nesting depth.
    depth: usize,
}

impl<'a, 'd> Translator<'a, 'd> {
    /// Creates a translator for `input`, reading its first token.
    ///
    /// `max_depth` is clamped to [`MAX_DEPTH_LIMIT`].
    pub fn new(input: &'a str, max_depth: usize, diagnostics: &'d mut Diagnostics) -> Self {
        if max_depth > MAX_DEPTH_LIMIT {
            log::warn!("max depth {max_depth} clamped to {MAX_DEPTH_LIMIT}");
        }
        let max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        let mut tokenizer = Tokenizer::new(input);
        let lookahead = tokenizer.next_token();
        Translator {
            tokenizer,
            lookahead,
            xml: String::with_capacity(input.len()),
            diagnostics,
            max_depth,
            depth: 0,
        }
    }

    /// Runs the translation to completion and returns the XML text.
    ///
    /// The result is whatever could be derived from the input; grammar
    /// errors along the way are in the diagnostic sink.
    pub fn translate(mut self) -> String {
        self.element();
        if self.lookahead.kind != TokenKind::Eof {
            self.report(DiagnosticKind::TrailingInput, "end of input");
        }
        self.xml
    }

    fn advance(&mut self) {
        self.lookahead = self.tokenizer.next_token();
    }

    fn report(&mut self, kind: DiagnosticKind, expected: impl Into<String>) {
        let diagnostic = Diagnostic::at(kind, expected, &self.lookahead);
        self.diagnostics.report(diagnostic);
    }

    /// Consumes the lookahead if it is of `kind`. Otherwise reports a
    /// missing delimiter, leaves the lookahead in place and returns `false`.
    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.lookahead.kind == kind {
            self.advance();
            true
        } else {
            self.report(DiagnosticKind::MissingDelimiter, kind.to_string());
            false
        }
    }

    /// Discards tokens until the lookahead is in `recovery` or is an
    /// `Eof`-kind token. The recovery token itself is not consumed.
    fn sync_to(&mut self, recovery: &[TokenKind]) {
        let mut skipped = 0usize;
        while self.lookahead.kind != TokenKind::Eof && !recovery.contains(&self.lookahead.kind) {
            self.advance();
            skipped += 1;
        }
        log::trace!(
            "resynchronized at {} ({}:{}) after skipping {} token(s)",
            self.lookahead,
            self.lookahead.line,
            self.lookahead.column,
            skipped
        );
    }

    /// Enters an object or array. Past the depth limit, reports it, skips
    /// the whole structure and returns `false`.
    fn enter(&mut self) -> bool {
        if self.depth < self.max_depth {
            self.depth += 1;
            return true;
        }

        self.report(
            DiagnosticKind::NestingTooDeep,
            format!("at most {} nested levels", self.max_depth),
        );
        self.skip_structure();
        false
    }

    /// Skips from an opening `{` or `[` to just past its matching closer,
    /// or to the end of input. Iterative, so any depth is fine.
    fn skip_structure(&mut self) {
        let mut open = 0usize;
        loop {
            match self.lookahead.kind {
                TokenKind::Eof => break,
                TokenKind::LeftBrace | TokenKind::LeftBracket => open += 1,
                TokenKind::RightBrace | TokenKind::RightBracket => {
                    open = open.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
            if open == 0 {
                break;
            }
        }
    }

    // element := object | array
    fn element(&mut self) {
        match self.lookahead.kind {
            TokenKind::LeftBrace => self.object(),
            TokenKind::LeftBracket => self.array(),
            _ => {
                self.report(DiagnosticKind::UnexpectedToken, "'{' or '['");
                self.sync_to(ELEMENT_RECOVERY);
            }
        }
    }

    // object := '{' '}' | '{' attribute (',' attribute)* '}'
    fn object(&mut self) {
        if !self.enter() {
            return;
        }

        self.expect(TokenKind::LeftBrace);
        if self.lookahead.kind == TokenKind::RightBrace {
            self.advance();
        } else {
            self.attribute();
            while self.lookahead.kind == TokenKind::Comma {
                self.advance();
                self.attribute();
            }
            self.expect(TokenKind::RightBrace);
        }

        self.depth -= 1;
    }

    // attribute := STRING ':' value
    fn attribute(&mut self) {
        if self.lookahead.kind != TokenKind::String {
            self.report(DiagnosticKind::InvalidAttributeName, "a string attribute name");
            self.sync_to(ATTRIBUTE_NAME_RECOVERY);
            if self.lookahead.kind == TokenKind::Colon {
                self.advance();
            }
            return;
        }

        let tag = self.lookahead.lexeme.replace('"', "");
        self.advance();

        if !self.expect(TokenKind::Colon) {
            self.sync_to(ATTRIBUTE_COLON_RECOVERY);
        }

        xml::push_open_tag(&mut self.xml, &tag);
        match self.lookahead.kind {
            TokenKind::LeftBrace => self.object(),
            TokenKind::LeftBracket => self.array(),
            kind if kind.is_scalar() => self.scalar(),
            _ => {
                self.report(DiagnosticKind::InvalidValue, "a value");
                self.sync_to(ATTRIBUTE_VALUE_RECOVERY);
            }
        }
        xml::push_close_tag(&mut self.xml, &tag);
    }

    // array := '[' ']' | '[' item (',' item)* ']'
    fn array(&mut self) {
        if !self.enter() {
            return;
        }

        self.expect(TokenKind::LeftBracket);
        if self.lookahead.kind == TokenKind::RightBracket {
            self.advance();
        } else {
            self.item();
            while self.lookahead.kind == TokenKind::Comma {
                self.advance();
                self.item();
            }
            self.expect(TokenKind::RightBracket);
        }

        self.depth -= 1;
    }

    // item := object | array | STRING | NUMBER | true | false | null
    fn item(&mut self) {
        xml::push_open_tag(&mut self.xml, ITEM_TAG);
        match self.lookahead.kind {
            TokenKind::LeftBrace => self.object(),
            TokenKind::LeftBracket => self.array(),
            kind if kind.is_scalar() => self.scalar(),
            _ => {
                self.report(DiagnosticKind::InvalidValue, "'{', '[' or a literal");
                self.sync_to(ITEM_RECOVERY);
            }
        }
        xml::push_close_tag(&mut self.xml, ITEM_TAG);
    }

    /// Writes the lookahead's lexeme as escaped text and consumes it.
    fn scalar(&mut self) {
        xml::push_escaped(&mut self.xml, &self.lookahead.lexeme);
        self.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run(input: &str, max_depth: usize) -> (String, Vec<Diagnostic>) {
        let mut diagnostics = Diagnostics::new();
        let xml = Translator::new(input, max_depth, &mut diagnostics).translate();
        (xml, diagnostics.into_vec())
    }

    fn kinds(diagnostics: &[Diagnostic]) -> Vec<DiagnosticKind> {
        diagnostics.iter().map(|d| d.kind).collect()
    }

    #[rstest]
    #[case(r#"{"a":1,"b":"x"}"#, r#"<a>1</a><b>"x"</b>"#)]
    #[case("[1,2,3]", "<item>1</item><item>2</item><item>3</item>")]
    #[case("{}", "")]
    #[case("[]", "")]
    #[case(r#"{"a":{}}"#, "<a></a>")]
    #[case(r#"{"a":[]}"#, "<a></a>")]
    #[case("[[]]", "<item></item>")]
    #[case("[true, FALSE, null]", "<item>true</item><item>FALSE</item><item>null</item>")]
    #[case(r#"{"n": -1.5e+3}"#, "<n>-1.5e+3</n>")]
    #[case(r#"{"a":{"b":[1,{"c":null}]}}"#, "<a><b><item>1</item><item><c>null</c></item></b></a>")]
    #[case(r#"[{"a":1},[2]]"#, "<item><a>1</a></item><item><item>2</item></item>")]
    #[case(r#"{"a":1,"a":2}"#, "<a>1</a><a>2</a>")]
    #[case(r#"{"first name":"x"}"#, r#"<first name>"x"</first name>"#)]
    #[case(r#"{"a\"b":1}"#, r#"<a\b>1</a\b>"#)]
    #[case(r#"{"t":"<b> & </b>"}"#, r#"<t>"&lt;b&gt; &amp; &lt;/b&gt;"</t>"#)]
    fn test_translates_well_formed_input(#[case] input: &str, #[case] expected: &str) {
        let (xml, diagnostics) = run(input, 100);
        assert_eq!(xml, expected);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn test_invalid_value_keeps_tags() {
        let (xml, diagnostics) = run(r#"{"a":}"#, 100);
        assert_eq!(xml, "<a></a>");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::InvalidValue]);
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (1, 6));
        assert_eq!(diagnostics[0].found, "'}'");
    }

    #[test]
    fn test_bare_scalar_document() {
        let (xml, diagnostics) = run("42", 100);
        assert_eq!(xml, "");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnexpectedToken]);
        assert_eq!(
            diagnostics[0].to_string(),
            "[ERROR] expected '{' or '[' but found '42' at line 1, col 1"
        );
    }

    #[test]
    fn test_malformed_array_inside_object() {
        let (xml, diagnostics) = run(r#"{"x": [1,}"#, 100);
        assert_eq!(xml, "<x><item>1</item><item></item></x>");
        assert_eq!(
            kinds(&diagnostics),
            vec![
                DiagnosticKind::InvalidValue,
                DiagnosticKind::MissingDelimiter,
                DiagnosticKind::MissingDelimiter,
            ]
        );
        // The item resync skips the '}' and stops at the end of input.
        assert_eq!(diagnostics[0].column, 10);
        assert_eq!(diagnostics[1].expected, "']'");
        assert_eq!(diagnostics[1].found, "end of input");
        assert_eq!(diagnostics[2].expected, "'}'");
    }

    #[test]
    fn test_missing_colon_recovers_at_value() {
        let (xml, diagnostics) = run(r#"{"a" 1, "b": 2}"#, 100);
        assert_eq!(xml, "<a>1</a><b>2</b>");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::MissingDelimiter]);
        assert_eq!(diagnostics[0].expected, "':'");
        assert_eq!(diagnostics[0].column, 6);
    }

    #[test]
    fn test_missing_colon_skips_junk_before_value() {
        let (xml, diagnostics) = run(r#"{"a" : : 1}"#, 100);
        // The second ':' is not a value start, so it is reported as invalid.
        assert_eq!(xml, "<a></a>");
        assert_eq!(kinds(&diagnostics)[0], DiagnosticKind::InvalidValue);
    }

    #[test]
    fn test_invalid_attribute_name_consumes_colon() {
        let (xml, diagnostics) = run(r#"{1: 2}"#, 100);
        assert_eq!(xml, "");
        assert_eq!(
            kinds(&diagnostics),
            vec![
                DiagnosticKind::InvalidAttributeName,
                DiagnosticKind::MissingDelimiter,
                DiagnosticKind::TrailingInput,
            ]
        );
        assert_eq!(diagnostics[1].found, "'2'");
    }

    #[test]
    fn test_invalid_attribute_name_then_next_member() {
        let (xml, diagnostics) = run(r#"{true, "b": 2}"#, 100);
        assert_eq!(xml, "<b>2</b>");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::InvalidAttributeName]);
    }

    #[test]
    fn test_trailing_comma_in_object() {
        let (xml, diagnostics) = run(r#"{"a": 1,}"#, 100);
        assert_eq!(xml, "<a>1</a>");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::InvalidAttributeName]);
        assert_eq!(diagnostics[0].column, 9);
    }

    #[test]
    fn test_trailing_comma_in_array() {
        let (xml, diagnostics) = run("[1, 2,]", 100);
        assert_eq!(xml, "<item>1</item><item>2</item><item></item>");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::InvalidValue]);
        assert_eq!(diagnostics[0].column, 7);
    }

    #[test]
    fn test_missing_comma_between_items() {
        let (xml, diagnostics) = run("[1 true]", 100);
        assert_eq!(xml, "<item>1</item>");
        assert_eq!(
            kinds(&diagnostics),
            vec![DiagnosticKind::MissingDelimiter, DiagnosticKind::TrailingInput]
        );
        assert_eq!(diagnostics[0].column, 4);
    }

    #[test]
    fn test_trailing_input_still_returns_xml() {
        let (xml, diagnostics) = run("[1] [2]", 100);
        assert_eq!(xml, "<item>1</item>");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::TrailingInput]);
        assert_eq!(
            diagnostics[0].to_string(),
            "[ERROR] expected end of input but found '[' at line 1, col 5"
        );
    }

    #[test]
    fn test_unrecognized_character_stops_like_end_of_input() {
        let (xml, diagnostics) = run("[1, ?, 2]", 100);
        assert_eq!(xml, "<item>1</item><item></item>");
        assert_eq!(
            kinds(&diagnostics),
            vec![DiagnosticKind::InvalidValue, DiagnosticKind::MissingDelimiter]
        );
        assert_eq!(diagnostics[0].found, "'<?>:?'");
        assert_eq!(diagnostics[0].column, 5);
    }

    #[test]
    fn test_empty_input() {
        let (xml, diagnostics) = run("", 100);
        assert_eq!(xml, "");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnexpectedToken]);
        assert_eq!(diagnostics[0].found, "end of input");
    }

    #[test]
    fn test_truncated_input() {
        let (xml, diagnostics) = run(r#"{"a": [1, {"b": "#, 100);
        assert_eq!(xml, "<a><item>1</item><item><b></b></item></a>");
        assert!(diagnostics
            .iter()
            .all(|d| d.found == "end of input"));
        assert_eq!(diagnostics.len(), 4);
    }

    #[test]
    fn test_unterminated_string_is_not_reported() {
        let (xml, diagnostics) = run(r#"["abc"#, 100);
        assert_eq!(xml, "<item>\"abc</item>");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::MissingDelimiter]);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = "[".repeat(4) + &"]".repeat(4);
        let (xml, diagnostics) = run(&deep, 3);
        assert_eq!(xml, "<item><item><item></item></item></item>");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::NestingTooDeep]);
        assert_eq!(diagnostics[0].column, 4);
        assert_eq!(diagnostics[0].expected, "at most 3 nested levels");

        let (_, diagnostics) = run(&deep, 4);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_nesting_limit_skips_structure_and_continues() {
        let (xml, diagnostics) = run(r#"{"a": {"b": [1]}, "c": 2}"#, 1);
        assert_eq!(xml, "<a></a><c>2</c>");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::NestingTooDeep]);
    }

    #[test]
    fn test_very_deep_input_does_not_overflow() {
        let deep = "[".repeat(100_000);
        let (xml, diagnostics) = run(&deep, 100);
        assert!(xml.starts_with("<item>"));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::NestingTooDeep);
    }

    #[test]
    fn test_max_depth_above_limit_is_clamped() {
        let deep = "{\"a\":".repeat(50_000);
        let (_, diagnostics) = run(&deep, usize::MAX);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::NestingTooDeep);
        assert_eq!(diagnostics[0].expected, "at most 512 nested levels");

        let limit = "[".repeat(MAX_DEPTH_LIMIT) + &"]".repeat(MAX_DEPTH_LIMIT);
        let (_, diagnostics) = run(&limit, usize::MAX);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_positions_span_lines() {
        let (_, diagnostics) = run("{\n  \"a\": 1\n  \"b\": 2\n}", 100);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingDelimiter);
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (3, 3));
    }
}

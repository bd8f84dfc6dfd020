//! XML text output: element tags, text escaping and the comment header
//! that lists diagnostics in front of a translated document.

use crate::diagnostic::Diagnostics;
use memchr::memchr3;

/// Appends `<name>`. The name is written as given, without validation.
pub(crate) fn push_open_tag(out: &mut String, name: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
}

/// Appends `</name>`.
pub(crate) fn push_close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Appends `text` with `&`, `<` and `>` replaced by their entities.
/// Every other character, quotes included, is copied unchanged.
pub fn push_escaped(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(i) = memchr3(b'&', b'<', b'>', rest.as_bytes()) {
        out.push_str(&rest[..i]);
        out.push_str(match rest.as_bytes()[i] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            _ => "&gt;",
        });
        rest = &rest[i + 1..];
    }
    out.push_str(rest);
}

/// Returns `text` escaped as by `push_escaped`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

/// Builds the final document: a comment listing every diagnostic, one per
/// line, followed by the XML text. Without diagnostics the XML is
/// returned as is.
pub fn render_document(xml: &str, diagnostics: &Diagnostics) -> String {
    if !diagnostics.has_errors() {
        return xml.to_string();
    }

    let mut out = String::from("<!-- Errors detected:\n");
    for diagnostic in diagnostics {
        out.push_str(&comment_safe(&diagnostic.to_string()));
        out.push('\n');
    }
    out.push_str("-->\n");
    out.push_str(xml);
    out
}

/// `--` may not appear inside an XML comment; split every such pair.
fn comment_safe(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut previous = None;
    for c in line.chars() {
        if c == '-' && previous == Some('-') {
            out.push(' ');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Diagnostic, DiagnosticKind};
    use crate::token::{Token, TokenKind};
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("a&b", "a&amp;b")]
    #[case("<tag>", "&lt;tag&gt;")]
    #[case("\"q\" & 'q'", "\"q\" &amp; 'q'")]
    #[case("&amp;", "&amp;amp;")]
    #[case("é<ü>", "é&lt;ü&gt;")]
    #[case("", "")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn test_tags() {
        let mut out = String::new();
        push_open_tag(&mut out, "first name");
        push_close_tag(&mut out, "first name");
        assert_eq!(out, "<first name></first name>");
    }

    #[test]
    fn test_render_without_diagnostics() {
        assert_eq!(render_document("<a>1</a>", &Diagnostics::new()), "<a>1</a>");
    }

    #[test]
    fn test_render_with_diagnostics() {
        let mut diagnostics = Diagnostics::new();
        let token = Token::new(TokenKind::RightBrace, "}", 1, 6);
        diagnostics.report(Diagnostic::at(DiagnosticKind::InvalidValue, "a value", &token));

        assert_eq!(
            render_document("<a></a>", &diagnostics),
            "<!-- Errors detected:\n\
             [ERROR] expected a value but found '}' at line 1, col 6\n\
             -->\n\
             <a></a>"
        );
    }

    #[test]
    fn test_comment_safe() {
        assert_eq!(comment_safe("found '--'"), "found '- -'");
        assert_eq!(comment_safe("---"), "- - -");
        assert_eq!(comment_safe("-a-"), "-a-");
    }
}

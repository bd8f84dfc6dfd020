//! # rill-json2xml
//!
//! `rill-json2xml` translates JSON-like text into XML without giving up on
//! bad input. Object members become elements named after their keys, array
//! items become `<item>` elements, and scalar values become escaped text.
//!
//! ## Key Features
//!
//! * **Fault tolerant:** grammar errors are collected as [`Diagnostic`]s
//!   with line and column, and translation keeps going (panic-mode
//!   recovery). Whatever XML could be derived is always returned.
//! * **Lexemes as typed:** string values keep their quotes, numbers keep
//!   their sign and exponent characters. Only `&`, `<` and `>` are escaped.
//! * **Bounded nesting:** structures deeper than [`Options::max_depth`] are
//!   reported and skipped instead of growing the stack.
//! * **Fast scanning:** a byte-based tokenizer with a lookup table and
//!   `memchr` for string literals.
//!
//! ## Quick Start
//!
//! ```
//! use rill_json2xml::translate;
//!
//! let translation = translate(r#"{"name": "Babbage", "ids": [1, 2]}"#);
//! assert_eq!(
//!     translation.xml,
//!     r#"<name>"Babbage"</name><ids><item>1</item><item>2</item></ids>"#
//! );
//! assert!(!translation.diagnostics.has_errors());
//!
//! let translation = translate(r#"{"a":}"#);
//! assert_eq!(translation.xml, "<a></a>");
//! assert_eq!(
//!     translation.diagnostics.errors()[0].to_string(),
//!     "[ERROR] expected a value but found '}' at line 1, col 6"
//! );
//! ```

/// The recoverable `Diagnostic` type and the `Diagnostics` sink.
pub mod diagnostic;
/// Contains the fatal `Error` type for the library.
pub mod error;
/// Contains the `Token` and `TokenKind` types.
pub mod token;
/// The lexer that turns text into `Token`s.
pub mod tokenizer;
/// The recursive-descent `Translator`.
pub mod translator;
/// XML escaping and document rendering.
pub mod xml;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{Error, Result};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
pub use translator::Translator;

use std::io::Read;

// --- Constants ---
/// The default maximum nesting depth (e.g., `[[[]]]`).
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// The highest accepted nesting limit. Larger [`Options::max_depth`]
/// values are clamped to it, since each level costs a few stack frames.
pub const MAX_DEPTH_LIMIT: usize = 512;

/// Translation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// How many objects/arrays may be nested inside each other.
    /// Clamped to [`MAX_DEPTH_LIMIT`].
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The outcome of a translation: the XML text plus every diagnostic
/// reported on the way. Diagnostics do not invalidate the XML.
#[derive(Debug)]
pub struct Translation {
    /// The XML body, with no prolog and no synthetic root element.
    pub xml: String,
    /// Grammar errors, in the order they were found.
    pub diagnostics: Diagnostics,
}

impl Translation {
    /// Returns the document to write out: the XML, preceded by a comment
    /// listing the diagnostics when there are any.
    pub fn render(&self) -> String {
        xml::render_document(&self.xml, &self.diagnostics)
    }
}

/// Translates `input` with the default [`Options`].
pub fn translate(input: &str) -> Translation {
    translate_with(input, &Options::default(), Diagnostics::new())
}

/// Translates `input`, reporting grammar errors into `diagnostics`.
///
/// Pass a sink made with [`Diagnostics::with_observer`] to see each
/// diagnostic as soon as it is reported.
pub fn translate_with(input: &str, options: &Options, mut diagnostics: Diagnostics) -> Translation {
    log::debug!(
        "translating {} bytes (max depth {})",
        input.len(),
        options.max_depth
    );
    let xml = Translator::new(input, options.max_depth, &mut diagnostics).translate();
    log::debug!(
        "translated into {} bytes of xml with {} diagnostic(s)",
        xml.len(),
        diagnostics.len()
    );
    Translation { xml, diagnostics }
}

/// Reads all of `reader` and translates it.
///
/// # Errors
/// Returns [`Error::Read`] if the stream fails or is not valid UTF-8. In
/// that case nothing is translated and no diagnostics are kept.
pub fn translate_reader<R: Read>(
    mut reader: R,
    options: &Options,
    diagnostics: Diagnostics,
) -> Result<Translation> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(translate_with(&input, options, diagnostics))
}

//! Recoverable translation diagnostics and the sink that collects them.
use crate::token::Token;
use std::fmt;

/// What went wrong at a grammar position.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DiagnosticKind {
    /// The document does not start with `{` or `[`.
    UnexpectedToken,
    /// A required `{`, `}`, `[`, `]`, `,` or `:` is absent.
    MissingDelimiter,
    /// An object member name is not a string literal.
    InvalidAttributeName,
    /// A member value or array item is not a value.
    InvalidValue,
    /// Tokens follow the end of the document.
    TrailingInput,
    /// An object or array is nested deeper than the configured limit.
    NestingTooDeep,
}

/// A single recoverable error found while translating.
///
/// Every diagnostic names what was expected, the text of the token that
/// was found instead and where that token starts.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Diagnostic {
    /// The category of the error.
    pub kind: DiagnosticKind,
    /// A description of what the grammar expected at this point.
    pub expected: String,
    /// The offending token, as quoted in messages.
    pub found: String,
    /// The line number (1-indexed) of the offending token.
    pub line: usize,
    /// The column number (1-indexed) of the offending token.
    pub column: usize,
}

impl Diagnostic {
    /// Creates a diagnostic located at `token`.
    pub fn at(kind: DiagnosticKind, expected: impl Into<String>, token: &Token<'_>) -> Self {
        Diagnostic {
            kind,
            expected: expected.into(),
            found: token.to_string(),
            line: token.line,
            column: token.column,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ERROR] expected {} but found {} at line {}, col {}",
            self.expected, self.found, self.line, self.column
        )
    }
}

type Observer = Box<dyn FnMut(&Diagnostic)>;

/// An ordered, append-only log of diagnostics.
///
/// Storing is the sink's only job. Anything that wants to see diagnostics
/// as they happen (a terminal, a logger) registers an observer.
#[derive(Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    observer: Option<Observer>,
}

impl Diagnostics {
    /// Creates an empty sink with no observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sink that forwards every reported diagnostic to
    /// `observer` right after storing it.
    pub fn with_observer(observer: impl FnMut(&Diagnostic) + 'static) -> Self {
        Diagnostics {
            entries: Vec::new(),
            observer: Some(Box::new(observer)),
        }
    }

    /// Appends a diagnostic and notifies the observer, if any.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::trace!("reported: {diagnostic}");
        if let Some(observer) = self.observer.as_mut() {
            observer(&diagnostic);
        }
        self.entries.push(diagnostic);
    }

    /// Returns `true` if anything was ever reported.
    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// The diagnostics in the order they were reported.
    pub fn errors(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// The number of diagnostics reported so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the diagnostics in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Consumes the sink, dropping the observer, and returns the diagnostics.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("entries", &self.entries)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

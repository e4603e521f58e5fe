//! Diagnostic collection for template parsing
//!
//!     User-facing problems found while lexing a template or parsing the expressions inside
//!     its tags are plain values accumulated in a [`DiagnosticSink`]. Scanning never stops
//!     at the first one: later tags are still classified so independent mistakes surface
//!     together in one pass.
//!
//!     Every record carries the absolute byte offset it was raised at, the human
//!     line/column derived from it, what the parser expected, what it found, and a short
//!     window of the surrounding line so the problem can be shown without the full source.
//!
//!     Programming-contract failures are not diagnostics. They live in
//!     [`super::error::InternalError`] and abort the parse instead.

use super::range::{LineIndex, SourcePosition};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Characters shown on either side of the offending offset
pub const CONTEXT_RADIUS: usize = 20;

/// Category of a user diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A closing tag with no matching opening tag
    UnopenedScope,
    /// An opening tag that is never closed
    UnclosedScope,
    /// Malformed tag or expression
    SyntaxError,
    /// An expression that could mean more than one thing
    AmbiguousExpression,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnopenedScope => write!(f, "unopened scope"),
            DiagnosticKind::UnclosedScope => write!(f, "unclosed scope"),
            DiagnosticKind::SyntaxError => write!(f, "syntax error"),
            DiagnosticKind::AmbiguousExpression => write!(f, "ambiguous expression"),
        }
    }
}

/// A fixed-radius excerpt of the line around an offset
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SourceWindow {
    pub text: String,
    /// Character index inside `text` the diagnostic points at
    pub marker: usize,
}

impl SourceWindow {
    pub fn around(index: &LineIndex<'_>, offset: usize) -> Self {
        let source = index.source();
        let bounds = index.line_bounds(offset);
        let offset = offset.clamp(bounds.start, bounds.end);

        let line: Vec<char> = source[bounds.clone()].chars().collect();
        let column = source
            .get(bounds.start..offset)
            .map(|text| text.chars().count())
            .unwrap_or(0);

        let start = column.saturating_sub(CONTEXT_RADIUS);
        let end = (column + CONTEXT_RADIUS).min(line.len());

        Self {
            text: line[start..end].iter().collect(),
            marker: column - start,
        }
    }
}

impl fmt::Display for SourceWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.text)?;
        write!(f, "{}^", " ".repeat(self.marker))
    }
}

/// A user-facing problem in a template
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{position}: {kind}: {message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Absolute byte offset into the template
    pub offset: usize,
    pub position: SourcePosition,
    /// What would have been valid here, e.g. `{{/each}}`
    pub expected: String,
    /// The offending text
    pub actual: String,
    pub message: String,
    pub context: SourceWindow,
}

impl Diagnostic {
    /// Create a diagnostic that has not been placed yet
    ///
    /// Offset, position and context are filled in by [`DiagnosticSink::push_at`].
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            offset: 0,
            position: SourcePosition::default(),
            expected: String::new(),
            actual: String::new(),
            message: message.into(),
            context: SourceWindow::default(),
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::SyntaxError, message)
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::AmbiguousExpression, message)
    }

    /// A closing tag for `keyword` with nothing open to close
    pub fn unopened_scope(keyword: &str, expected: &str) -> Self {
        Self::new(
            DiagnosticKind::UnopenedScope,
            format!("found a closing '{}' tag without a matching open tag", keyword),
        )
        .actual(keyword)
        .expected(expected)
    }

    /// A block labelled `label` that was still open at the end of the template
    pub fn unclosed_scope(label: &str) -> Self {
        Self::new(
            DiagnosticKind::UnclosedScope,
            format!("'{}' is opened here but never closed", label),
        )
        .actual(label)
    }

    /// Text that does not form a valid path or expression
    pub fn invalid_path(actual: impl Into<String>) -> Self {
        Self::syntax("invalid path or expression")
            .actual(actual)
            .expected("a valid expression")
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = actual.into();
        self
    }
}

/// Accumulates diagnostics for one template, placing each against its source
#[derive(Debug, Clone)]
pub struct DiagnosticSink<'src> {
    index: LineIndex<'src>,
    items: Vec<Diagnostic>,
}

impl<'src> DiagnosticSink<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            index: LineIndex::build(source),
            items: Vec::new(),
        }
    }

    pub fn source(&self) -> &'src str {
        self.index.source()
    }

    pub fn locate(&self, offset: usize) -> SourcePosition {
        self.index.locate(offset)
    }

    /// Record `diagnostic` as raised at the absolute byte `offset`
    pub fn push_at(&mut self, offset: usize, mut diagnostic: Diagnostic) {
        diagnostic.offset = offset;
        diagnostic.position = self.index.locate(offset);
        diagnostic.context = SourceWindow::around(&self.index, offset);
        tracing::debug!(
            kind = %diagnostic.kind,
            position = %diagnostic.position,
            message = %diagnostic.message,
            "diagnostic"
        );
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

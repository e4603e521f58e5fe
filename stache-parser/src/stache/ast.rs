//! Abstract syntax trees and source bookkeeping
//!
//!     Two trees come out of a parse. Every tag body that carries an expression is parsed
//!     into an [`Expression`]; the token list as a whole is assembled into a [`Document`]
//!     made of [`DocumentNode`]s. Both are plain owned values: once a parse returns they
//!     are never mutated again and can be shared freely across threads.
//!
//!     Positions are kept as byte offsets during processing and converted to 1-based
//!     line/column pairs through a [`LineIndex`] only when a token or diagnostic is
//!     recorded.

pub mod diagnostics;
pub mod document;
pub mod error;
pub mod expression;
pub mod range;

pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, SourceWindow};
pub use document::{Document, DocumentNode, ScopeKind, TextOperation};
pub use error::{format_source_context, InternalError};
pub use expression::{
    Argument, Expression, ExpressionList, Number, NumberLiteral, Operator, OperatorExpression,
    PathExpression, PathKind, PathSegment, StringLiteral,
};
pub use range::{LineIndex, SourcePosition};

//! Token definitions
//!
//!     The lexer emits one token per content run and, usually, one per tag. A few tags
//!     produce more than one: `{{#each list AS item}}` is a `CollectionOpen` followed by an
//!     `Alias`, and `{{#ifelse}}` is an `IfClose` followed by an `Else`. Only the first token
//!     of a tag carries its source text in `raw`, so concatenating every `raw` gives back the
//!     template exactly.

use crate::stache::ast::{Expression, SourcePosition};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Literal text between tags
    Content,
    /// `{{path}}`
    EscapedValue,
    /// `{{{path}}}` or `{{&path}}`
    UnescapedValue,
    /// `{{#path}}`
    ScopeOpen,
    /// `{{^path}}`
    InvertedScopeOpen,
    /// `{{/path}}`
    ScopeClose,
    /// `{{! ... }}`
    Comment,
    CollectionOpen,
    CollectionClose,
    PartialDeclarationOpen,
    PartialDeclarationClose,
    RenderPartial,
    /// Name bound by a trailing `AS name`
    Alias,
    If,
    IfNot,
    IfClose,
    Else,
    ElseClose,
    VariableVar,
    VariableLet,
    WhileOpen,
    WhileClose,
    DoOpen,
    DoClose,
    RepeatOpen,
    RepeatClose,
    WriteLineBreak,
    TrimLineBreak,
    TrimLineBreaks,
    TrimEverything,
    /// Produced by a custom tag provider; the string names the tag kind
    Custom(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Custom(name) => write!(f, "Custom({})", name),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Scoping override for an aliased `#each`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeBehavior {
    /// `WithScope`: push the item as the context even though it is aliased
    ScopeAnyway,
    /// `NoScope`: only bind the alias
    DoNotScope,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the tag or content run; empty for secondary tokens
    pub raw: String,
    /// The classified payload: expression text, partial or alias name, or block label
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expression>,
    /// Byte range in the template
    pub span: Range<usize>,
    pub position: SourcePosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_behavior: Option<ScopeBehavior>,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        raw: impl Into<String>,
        value: impl Into<String>,
        span: Range<usize>,
        position: SourcePosition,
    ) -> Self {
        Self {
            kind,
            raw: raw.into(),
            value: value.into(),
            expression: None,
            span,
            position,
            scope_behavior: None,
        }
    }

    pub fn with_expression(mut self, expression: Option<Expression>) -> Self {
        self.expression = expression;
        self
    }

    pub fn with_scope_behavior(mut self, behavior: Option<ScopeBehavior>) -> Self {
        self.scope_behavior = behavior;
        self
    }

    pub fn is_content(&self) -> bool {
        self.kind == TokenKind::Content
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expression {
            Some(expression) => write!(f, "{}({})", self.kind, expression),
            None if self.value.is_empty() => write!(f, "{}", self.kind),
            None => write!(f, "{}({:?})", self.kind, self.value),
        }
    }
}

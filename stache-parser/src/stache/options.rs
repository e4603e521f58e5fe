//! Parser options and extension points
//!
//!     [`ParserOptions`] carries what a parse needs besides the template text: the names
//!     of partials registered outside the template, and the custom tag providers. Options
//!     are shared read-only between parses, so both are held behind `Arc` and must be
//!     `Send + Sync`.
//!
//!     A [`TagProvider`] teaches the parser a new tag. It is consulted in two places:
//!
//!         lexing      `should_tokenize` / `tokenize` for tags no built-in keyword claims
//!         assembling  `should_parse` / `parse` for the tokens it produced
//!
//!     See [`crate::stache::custom`] for the two ready-made providers.

use crate::stache::ast::{DiagnosticSink, DocumentNode, SourcePosition};
use crate::stache::building::{BuildStack, ScopeIdFactory};
use crate::stache::lexing::ScopeStack;
use crate::stache::token::{Token, TokenKind};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Source of partial names that `{{#include}}` may reference without a `{{#declare}}`
pub trait PartialRegistry: Send + Sync {
    fn names(&self) -> Vec<String>;
}

impl PartialRegistry for Vec<String> {
    fn names(&self) -> Vec<String> {
        self.clone()
    }
}

/// What a provider sees of the tag it is asked to tokenize
pub struct TagInfo<'a, 'src> {
    /// The whole tag including braces
    pub raw: &'src str,
    /// The text between the braces
    pub body: &'src str,
    pub span: Range<usize>,
    pub position: SourcePosition,
    /// Block stack shared with the built-in tags, for providers that open blocks
    pub scope_stack: &'a mut ScopeStack,
    pub diagnostics: &'a mut DiagnosticSink<'src>,
}

impl TagInfo<'_, '_> {
    /// A token carrying this tag's source text
    pub fn token(&self, kind: TokenKind, value: impl Into<String>) -> Token {
        Token::new(kind, self.raw, value, self.span.clone(), self.position)
    }
}

/// A custom tag kind
pub trait TagProvider: Send + Sync {
    /// Whether this provider handles `tag` (the whole tag including braces)
    fn should_tokenize(&self, tag: &str) -> bool;

    fn tokenize(&self, info: TagInfo<'_, '_>, options: &ParserOptions) -> Vec<Token>;

    /// Whether this provider assembles `token`
    fn should_parse(&self, _token: &Token, _options: &ParserOptions) -> bool {
        false
    }

    /// Assemble `token`
    ///
    /// A returned node is appended to the innermost open block. Providers that open or
    /// close blocks work on `stack` directly and return `None`.
    fn parse(
        &self,
        _token: &Token,
        _options: &ParserOptions,
        _stack: &mut BuildStack,
        _scope_ids: &mut ScopeIdFactory,
    ) -> Option<DocumentNode> {
        None
    }
}

#[derive(Clone, Default)]
pub struct ParserOptions {
    partials: Option<Arc<dyn PartialRegistry>>,
    providers: Vec<Arc<dyn TagProvider>>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register partial names known outside the template
    pub fn with_partials<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.with_partial_registry(Arc::new(names))
    }

    pub fn with_partial_registry(mut self, registry: Arc<dyn PartialRegistry>) -> Self {
        self.partials = Some(registry);
        self
    }

    pub fn with_provider(mut self, provider: impl TagProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn partial_names(&self) -> Vec<String> {
        self.partials
            .as_ref()
            .map(|registry| registry.names())
            .unwrap_or_default()
    }

    pub fn providers(&self) -> &[Arc<dyn TagProvider>] {
        &self.providers
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("partials", &self.partial_names())
            .field("providers", &self.providers.len())
            .finish()
    }
}

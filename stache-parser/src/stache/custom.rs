//! Ready-made custom tags
//!
//!     Two [`TagProvider`] implementations cover the common shapes of an extension tag:
//!
//!         SimpleTagProvider   {{#now utc}}                       one Custom leaf
//!         BlockTagProvider    {{#section x}} ... {{/section}}    a Custom container
//!
//!     Both match their keyword ignoring ASCII case, like the built-in tags. A block tag
//!     takes part in the same nesting checks as the built-in blocks: it pushes on the
//!     lexer's block stack, and a stray or missing close is reported like any other.

use crate::stache::ast::{Diagnostic, DocumentNode};
use crate::stache::building::{BuildStack, ScopeIdFactory};
use crate::stache::lexing::tags::{split_tag, trim_with_offset, TagParts};
use crate::stache::lexing::BlockKind;
use crate::stache::options::{ParserOptions, TagInfo, TagProvider};
use crate::stache::token::{Token, TokenKind};

/// Cut `{{body}}` down to its body and split it
fn parts_of(tag: &str) -> Option<TagParts<'_>> {
    let body = tag.strip_prefix("{{")?.strip_suffix("}}")?;
    Some(split_tag(body))
}

/// A single-statement tag, `{{#name payload}}`
#[derive(Debug, Clone)]
pub struct SimpleTagProvider {
    tag: String,
}

impl SimpleTagProvider {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl TagProvider for SimpleTagProvider {
    fn should_tokenize(&self, tag: &str) -> bool {
        parts_of(tag).is_some_and(|parts| parts.is('#', &self.tag))
    }

    fn tokenize(&self, info: TagInfo<'_, '_>, _options: &ParserOptions) -> Vec<Token> {
        let payload = split_tag(info.body).rest.trim();
        vec![info.token(TokenKind::Custom(self.tag.clone()), payload)]
    }

    fn should_parse(&self, token: &Token, _options: &ParserOptions) -> bool {
        matches!(&token.kind, TokenKind::Custom(tag) if *tag == self.tag)
    }

    fn parse(
        &self,
        token: &Token,
        _options: &ParserOptions,
        _stack: &mut BuildStack,
        _scope_ids: &mut ScopeIdFactory,
    ) -> Option<DocumentNode> {
        Some(DocumentNode::Custom {
            tag: self.tag.clone(),
            value: token.value.clone(),
            scope_id: None,
            children: Vec::new(),
        })
    }
}

/// A block tag, `{{#name payload}} ... {{/name}}`
///
/// The opening token has kind `Custom(name)`, the closing one `Custom("/name")`. The
/// assembled node owns a scope id of its own.
#[derive(Debug, Clone)]
pub struct BlockTagProvider {
    tag: String,
    close: String,
}

impl BlockTagProvider {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let close = format!("/{}", tag);
        Self { tag, close }
    }

    fn block(&self) -> BlockKind {
        BlockKind::Custom(self.tag.clone())
    }
}

impl TagProvider for BlockTagProvider {
    fn should_tokenize(&self, tag: &str) -> bool {
        parts_of(tag).is_some_and(|parts| parts.is('#', &self.tag) || parts.is('/', &self.tag))
    }

    fn tokenize(&self, info: TagInfo<'_, '_>, _options: &ParserOptions) -> Vec<Token> {
        let parts = split_tag(info.body);
        let payload = trim_with_offset(parts.rest, info.span.start + 2 + parts.rest_offset);

        if parts.sigil == Some('#') {
            info.scope_stack
                .push(self.block(), payload.text, info.span.start);
            return vec![info.token(TokenKind::Custom(self.tag.clone()), payload.text)];
        }

        let expected = format!("{{{{/{}}}}}", self.tag);
        if !payload.text.is_empty() {
            info.diagnostics.push_at(
                payload.offset,
                Diagnostic::syntax(format!("'{}' does not take an argument", expected))
                    .actual(payload.text)
                    .expected(expected.as_str()),
            );
        }
        if info.scope_stack.pop_kind(&self.block()).is_none() {
            info.diagnostics.push_at(
                info.span.start,
                Diagnostic::unopened_scope(&self.tag, &expected),
            );
        }
        vec![info.token(TokenKind::Custom(self.close.clone()), "")]
    }

    fn should_parse(&self, token: &Token, _options: &ParserOptions) -> bool {
        matches!(&token.kind, TokenKind::Custom(tag) if *tag == self.tag || *tag == self.close)
    }

    fn parse(
        &self,
        token: &Token,
        _options: &ParserOptions,
        stack: &mut BuildStack,
        scope_ids: &mut ScopeIdFactory,
    ) -> Option<DocumentNode> {
        if token.kind == TokenKind::Custom(self.tag.clone()) {
            stack.open(DocumentNode::Custom {
                tag: self.tag.clone(),
                value: token.value.clone(),
                scope_id: Some(scope_ids.next_id()),
                children: Vec::new(),
            });
        } else {
            stack.close();
        }
        None
    }
}

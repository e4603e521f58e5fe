//! Tag classification
//!
//!     [`tokenize`] walks the tag spans of a template in order, emits `Content` tokens for
//!     the text between them and classifies every tag. Keyword tags are matched first
//!     (ignoring ASCII case), then custom providers, then the generic `#path`, `/path` and
//!     bare value forms.
//!
//!     Every problem goes to the diagnostic sink and the scan moves on to the next tag.
//!     The only early exit is an [`InternalError`]: a tag whose tokens reach past the end
//!     of its own span.

use super::classify::is_data_char;
use super::scopes::{BlockKind, ScopeLabel, ScopeStack};
use super::spans::{find_tags, TagSpan};
use super::tags::{
    split_alias, split_assignment, split_include, split_scope_behavior, split_tag,
    trim_with_offset, AssignmentError, TagParts,
};
use crate::stache::ast::{Diagnostic, DiagnosticSink, Expression, InternalError, SourcePosition};
use crate::stache::options::{ParserOptions, TagInfo};
use crate::stache::parsing::parse_expression;
use crate::stache::token::{Token, TokenKind};
use std::ops::Range;

/// Output of one lexing pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
}

/// Tokenize `template`, reporting problems to `sink`
pub fn tokenize<'src>(
    template: &'src str,
    options: &ParserOptions,
    sink: &mut DiagnosticSink<'src>,
) -> Result<Lexed, InternalError> {
    let mut lexer = Lexer::new(template, options, sink);
    for span in find_tags(template) {
        lexer.content_until(span.start);
        lexer.tag(span)?;
    }
    lexer.content_until(template.len());
    Ok(lexer.finish())
}

/// Close tag that would have been valid for `label`
fn close_tag(label: &ScopeLabel) -> String {
    match &label.kind {
        BlockKind::Scope => format!("{{{{/{}}}}}", label.name),
        kind => format!("{{{{/{}}}}}", kind.keyword()),
    }
}

/// What the tag currently being classified looks like
struct Tag<'src> {
    raw: &'src str,
    body: &'src str,
    /// Absolute offset of `body`
    body_offset: usize,
    span: Range<usize>,
    position: SourcePosition,
}

impl<'src> Tag<'src> {
    fn token(&self, kind: TokenKind, value: impl Into<String>) -> Token {
        Token::new(kind, self.raw, value, self.span.clone(), self.position)
    }

    /// Payload after a one-character sigil, with its absolute offset
    fn after_sigil(&self) -> (&'src str, usize) {
        (&self.body[1..], self.body_offset + 1)
    }
}

struct Lexer<'o, 'src> {
    template: &'src str,
    options: &'o ParserOptions,
    sink: &'o mut DiagnosticSink<'src>,
    scopes: ScopeStack,
    /// Registered and declared partial names
    partials: Vec<String>,
    tokens: Vec<Token>,
    cursor: usize,
}

impl<'o, 'src> Lexer<'o, 'src> {
    fn new(
        template: &'src str,
        options: &'o ParserOptions,
        sink: &'o mut DiagnosticSink<'src>,
    ) -> Self {
        Self {
            template,
            options,
            sink,
            scopes: ScopeStack::new(),
            partials: options.partial_names(),
            tokens: Vec::new(),
            cursor: 0,
        }
    }

    fn content_until(&mut self, end: usize) {
        if end <= self.cursor {
            return;
        }
        let text = &self.template[self.cursor..end];
        let position = self.sink.locate(self.cursor);
        self.tokens.push(Token::new(
            TokenKind::Content,
            text,
            text,
            self.cursor..end,
            position,
        ));
        self.cursor = end;
    }

    fn tag(&mut self, span: TagSpan) -> Result<(), InternalError> {
        let body_range = span.body();
        let tag = Tag {
            raw: &self.template[span.range()],
            body: &self.template[body_range.clone()],
            body_offset: body_range.start,
            span: span.range(),
            position: self.sink.locate(span.start),
        };
        let first_new = self.tokens.len();

        if span.is_triple() {
            self.value(&tag, TokenKind::UnescapedValue, tag.body, tag.body_offset);
        } else {
            self.classify(&tag);
        }

        if let Some(token) = self.tokens[first_new..]
            .iter()
            .find(|token| token.span.end > span.end)
        {
            return Err(InternalError::OffsetRegression {
                offset: token.span.end,
                span_end: span.end,
            });
        }

        for token in &self.tokens[first_new..] {
            tracing::debug!(token = %token, position = %token.position, "tag");
        }
        self.cursor = span.end;
        Ok(())
    }

    fn classify(&mut self, tag: &Tag<'src>) {
        let parts = split_tag(tag.body);
        let keyword = parts.keyword.map(str::to_ascii_lowercase);

        match (parts.sigil, keyword.as_deref()) {
            (Some('#'), Some("declare")) => self.declare(tag, &parts),
            (Some('/'), Some("declare")) => {
                self.close_keyword(tag, &parts, BlockKind::Declare, TokenKind::PartialDeclarationClose)
            }
            (Some('#'), Some("include")) => self.include(tag, &parts),
            (Some('#'), Some("each")) => {
                self.open_block(tag, &parts, BlockKind::Each, TokenKind::CollectionOpen)
            }
            (Some('/'), Some("each")) => {
                self.close_keyword(tag, &parts, BlockKind::Each, TokenKind::CollectionClose)
            }
            (Some('#'), Some("while")) => {
                self.open_block(tag, &parts, BlockKind::While, TokenKind::WhileOpen)
            }
            (Some('/'), Some("while")) => {
                self.close_keyword(tag, &parts, BlockKind::While, TokenKind::WhileClose)
            }
            (Some('#'), Some("do")) => {
                self.open_block(tag, &parts, BlockKind::Do, TokenKind::DoOpen)
            }
            (Some('/'), Some("do")) => {
                self.close_keyword(tag, &parts, BlockKind::Do, TokenKind::DoClose)
            }
            (Some('#'), Some("repeat")) => {
                self.open_block(tag, &parts, BlockKind::Repeat, TokenKind::RepeatOpen)
            }
            (Some('/'), Some("repeat")) => {
                self.close_keyword(tag, &parts, BlockKind::Repeat, TokenKind::RepeatClose)
            }
            (Some('#'), Some("if")) => self.open_block(tag, &parts, BlockKind::If, TokenKind::If),
            (Some('^'), Some("if")) => {
                self.open_block(tag, &parts, BlockKind::IfNot, TokenKind::IfNot)
            }
            (Some('/'), Some("if")) => {
                self.close_keyword(tag, &parts, BlockKind::If, TokenKind::IfClose)
            }
            (Some('#'), Some("ifelse")) => self.if_else(tag, &parts),
            (Some('#'), Some("else")) => self.open_else(tag, &parts),
            (Some('/'), Some("else")) => {
                self.close_keyword(tag, &parts, BlockKind::Else, TokenKind::ElseClose)
            }
            (Some('#'), Some("var")) => self.assignment(tag, &parts, TokenKind::VariableVar),
            (Some('#'), Some("let")) => self.assignment(tag, &parts, TokenKind::VariableLet),
            (Some('#'), Some("nl")) => self.directive(tag, &parts, TokenKind::WriteLineBreak),
            (Some('#'), Some("tnl")) => self.directive(tag, &parts, TokenKind::TrimLineBreak),
            (Some('#'), Some("tnls")) => self.directive(tag, &parts, TokenKind::TrimLineBreaks),
            (Some('#'), Some("trimall")) => {
                self.directive(tag, &parts, TokenKind::TrimEverything)
            }
            (Some('^'), _) => {
                let (payload, offset) = tag.after_sigil();
                self.scope_open(tag, payload, offset, TokenKind::InvertedScopeOpen);
            }
            (Some('&'), _) => {
                let (payload, offset) = tag.after_sigil();
                self.value(tag, TokenKind::UnescapedValue, payload, offset);
            }
            (Some('!'), _) => {
                let (payload, _) = tag.after_sigil();
                self.tokens.push(tag.token(TokenKind::Comment, payload));
            }
            _ if self.custom(tag) => {}
            (Some('#'), _) => {
                let (payload, offset) = tag.after_sigil();
                self.scope_open(tag, payload, offset, TokenKind::ScopeOpen);
            }
            (Some('/'), _) => self.scope_close(tag),
            _ => self.value(tag, TokenKind::EscapedValue, tag.body, tag.body_offset),
        }
    }

    fn expression(&mut self, text: &str, offset: usize) -> Option<Expression> {
        parse_expression(text, offset, self.sink)
    }

    fn syntax_error(&mut self, offset: usize, diagnostic: Diagnostic) {
        self.sink.push_at(offset, diagnostic);
    }

    /// Offset of a keyword tag's payload
    fn payload_offset(tag: &Tag<'_>, parts: &TagParts<'_>) -> usize {
        tag.body_offset + parts.rest_offset
    }

    fn value(&mut self, tag: &Tag<'src>, kind: TokenKind, text: &'src str, offset: usize) {
        let expression = self.expression(text, offset);
        self.tokens
            .push(tag.token(kind, text.trim()).with_expression(expression));
    }

    fn open_block(
        &mut self,
        tag: &Tag<'src>,
        parts: &TagParts<'src>,
        block: BlockKind,
        kind: TokenKind,
    ) {
        let payload = trim_with_offset(parts.rest, Self::payload_offset(tag, parts));
        let split = split_alias(payload.text);

        match (block, split.alias) {
            (block @ BlockKind::Each, Some(alias)) => {
                let (head, behavior) = split_scope_behavior(split.head);
                let expression = self.expression(head, payload.offset);
                self.scopes.push(block, alias, tag.span.start);
                self.tokens.push(
                    tag.token(kind, head)
                        .with_expression(expression)
                        .with_scope_behavior(behavior),
                );
                self.alias(tag, alias, payload.offset + split.alias_offset);
            }
            (block @ (BlockKind::If | BlockKind::IfNot), Some(alias)) => {
                self.syntax_error(
                    payload.offset + split.alias_offset,
                    Diagnostic::syntax("an if block cannot declare an alias")
                        .actual(alias)
                        .expected("{{#if expression}}"),
                );
                let expression = self.expression(split.head, payload.offset);
                self.scopes.push(block, split.head, tag.span.start);
                self.tokens
                    .push(tag.token(kind, split.head).with_expression(expression));
            }
            (block, _) => {
                let expression = self.expression(payload.text, payload.offset);
                self.scopes.push(block, payload.text, tag.span.start);
                self.tokens
                    .push(tag.token(kind, payload.text).with_expression(expression));
            }
        }
    }

    /// `{{#path}}` / `{{^path}}`, optionally aliased
    fn scope_open(&mut self, tag: &Tag<'src>, payload: &'src str, offset: usize, kind: TokenKind) {
        let payload = trim_with_offset(payload, offset);
        let split = split_alias(payload.text);
        let expression = self.expression(split.head, payload.offset);
        let label = split.alias.unwrap_or(split.head);
        self.scopes.push(BlockKind::Scope, label, tag.span.start);
        self.tokens
            .push(tag.token(kind, split.head).with_expression(expression));
        if let Some(alias) = split.alias {
            self.alias(tag, alias, payload.offset + split.alias_offset);
        }
    }

    fn alias(&mut self, tag: &Tag<'_>, alias: &str, offset: usize) {
        let position = self.sink.locate(offset);
        self.tokens.push(Token::new(
            TokenKind::Alias,
            "",
            alias,
            offset..offset + alias.len(),
            position,
        ));
        tracing::trace!(alias, tag = tag.raw, "alias");
    }

    /// `{{/path}}`: must name the innermost generic scope
    fn scope_close(&mut self, tag: &Tag<'src>) {
        let (payload, offset) = tag.after_sigil();
        let name = trim_with_offset(payload, offset);
        let closed = self
            .scopes
            .pop_if(|label| label.kind == BlockKind::Scope && label.name == name.text);
        if closed.is_none() {
            let expected = self.expected_close();
            self.syntax_error(
                tag.span.start,
                Diagnostic::unopened_scope(name.text, &expected),
            );
        }
        self.tokens.push(tag.token(TokenKind::ScopeClose, name.text));
    }

    fn close_keyword(
        &mut self,
        tag: &Tag<'src>,
        parts: &TagParts<'src>,
        block: BlockKind,
        kind: TokenKind,
    ) {
        let keyword = block.keyword().to_string();
        let close = format!("{{{{/{}}}}}", keyword);
        let trailing = parts.rest.trim();
        if !trailing.is_empty() {
            self.syntax_error(
                Self::payload_offset(tag, parts),
                Diagnostic::syntax(format!("'{}' does not take an argument", close))
                    .actual(trailing)
                    .expected(close.as_str()),
            );
        }

        let closed = match block {
            BlockKind::If => self
                .scopes
                .pop_if(|label| matches!(label.kind, BlockKind::If | BlockKind::IfNot)),
            ref other => self.scopes.pop_kind(other),
        };
        if closed.is_none() {
            let expected = self.expected_close();
            self.syntax_error(
                tag.span.start,
                Diagnostic::unopened_scope(&keyword, &expected),
            );
        }
        self.tokens.push(tag.token(kind, ""));
    }

    /// Close tag for the innermost open block, or nothing when none is open
    fn expected_close(&self) -> String {
        self.scopes
            .peek()
            .map(|entry| close_tag(&entry.label))
            .unwrap_or_default()
    }

    /// `{{#else}}` must directly follow an if block
    fn else_is_placed(&self) -> bool {
        self.tokens
            .iter()
            .rev()
            .find(|token| !matches!(token.kind, TokenKind::Content | TokenKind::Comment))
            .is_some_and(|token| token.kind == TokenKind::IfClose)
    }

    fn open_else(&mut self, tag: &Tag<'src>, parts: &TagParts<'src>) {
        self.reject_payload(tag, parts, "{{#else}}");
        if !self.else_is_placed() {
            self.syntax_error(
                tag.span.start,
                Diagnostic::syntax("could not find an /if block for this else")
                    .actual(tag.raw)
                    .expected("{{/if}}"),
            );
        }
        self.scopes.push(BlockKind::Else, "else", tag.span.start);
        self.tokens.push(tag.token(TokenKind::Else, ""));
    }

    /// `{{#ifelse}}` closes the open if and starts its else branch
    fn if_else(&mut self, tag: &Tag<'src>, parts: &TagParts<'src>) {
        self.reject_payload(tag, parts, "{{#ifelse}}");
        let closed = self
            .scopes
            .pop_if(|label| matches!(label.kind, BlockKind::If | BlockKind::IfNot));
        if closed.is_none() {
            let expected = self.expected_close();
            self.syntax_error(tag.span.start, Diagnostic::unopened_scope("if", &expected));
        }
        self.tokens.push(tag.token(TokenKind::IfClose, ""));
        self.scopes.push(BlockKind::Else, "else", tag.span.start);
        self.tokens.push(Token::new(
            TokenKind::Else,
            "",
            "",
            tag.span.end..tag.span.end,
            tag.position,
        ));
    }

    fn reject_payload(&mut self, tag: &Tag<'_>, parts: &TagParts<'_>, expected: &str) {
        let trailing = parts.rest.trim();
        if !trailing.is_empty() {
            self.syntax_error(
                Self::payload_offset(tag, parts),
                Diagnostic::syntax(format!("'{}' does not take an argument", expected))
                    .actual(trailing)
                    .expected(expected),
            );
        }
    }

    fn directive(&mut self, tag: &Tag<'src>, parts: &TagParts<'src>, kind: TokenKind) {
        let expected = format!("{{{{#{}}}}}", parts.keyword.unwrap_or_default());
        self.reject_payload(tag, parts, &expected);
        self.tokens.push(tag.token(kind, ""));
    }

    fn declare(&mut self, tag: &Tag<'src>, parts: &TagParts<'src>) {
        let name = trim_with_offset(parts.rest, Self::payload_offset(tag, parts));
        let valid = !name.text.is_empty()
            && name
                .text
                .chars()
                .all(is_data_char);
        if !valid {
            self.syntax_error(
                name.offset,
                Diagnostic::syntax("expected a partial name")
                    .actual(name.text)
                    .expected("{{#declare Name}}"),
            );
        } else {
            self.partials.push(name.text.to_string());
        }
        self.scopes.push(BlockKind::Declare, name.text, tag.span.start);
        self.tokens
            .push(tag.token(TokenKind::PartialDeclarationOpen, name.text));
    }

    fn include(&mut self, tag: &Tag<'src>, parts: &TagParts<'src>) {
        let offset = Self::payload_offset(tag, parts);
        let include = split_include(parts.rest, offset);
        let name_offset = trim_with_offset(parts.rest, offset).offset;

        if include.name.is_empty() {
            self.syntax_error(
                name_offset,
                Diagnostic::syntax("expected a partial name")
                    .actual(parts.rest.trim())
                    .expected("{{#include Name}}"),
            );
        } else if !self.partials.iter().any(|known| known == include.name) {
            self.syntax_error(
                name_offset,
                Diagnostic::syntax(format!(
                    "no partial named '{}' has been declared",
                    include.name
                ))
                .actual(include.name)
                .expected("the name of a declared partial"),
            );
        }

        if let Some(trailing) = include.trailing {
            self.syntax_error(
                name_offset + include.name.len(),
                Diagnostic::syntax("unexpected text after the partial name")
                    .actual(trailing)
                    .expected("With expression"),
            );
        }

        let context = include
            .context
            .and_then(|context| self.expression(context.text, context.offset));
        self.tokens.push(
            tag.token(TokenKind::RenderPartial, include.name)
                .with_expression(context),
        );
    }

    fn assignment(&mut self, tag: &Tag<'src>, parts: &TagParts<'src>, kind: TokenKind) {
        let offset = Self::payload_offset(tag, parts);
        match split_assignment(parts.rest, offset) {
            Ok(assignment) => {
                let expression =
                    self.expression(assignment.expression.text, assignment.expression.offset);
                self.tokens
                    .push(tag.token(kind, assignment.name).with_expression(expression));
            }
            Err(error) => {
                let message = match error {
                    AssignmentError::MissingName => "expected a variable name",
                    AssignmentError::MissingEquals => "expected '=' after the variable name",
                    AssignmentError::MissingExpression => "expected an expression after '='",
                };
                self.syntax_error(
                    trim_with_offset(parts.rest, offset).offset,
                    Diagnostic::syntax(message)
                        .actual(parts.rest.trim())
                        .expected("name = expression"),
                );
                self.tokens.push(tag.token(kind, ""));
            }
        }
    }

    /// Offer the tag to the custom providers; true when one of them took it
    fn custom(&mut self, tag: &Tag<'src>) -> bool {
        let options = self.options;
        let Some(provider) = options
            .providers()
            .iter()
            .find(|provider| provider.should_tokenize(tag.raw))
        else {
            return false;
        };

        let info = TagInfo {
            raw: tag.raw,
            body: tag.body,
            span: tag.span.clone(),
            position: tag.position,
            scope_stack: &mut self.scopes,
            diagnostics: &mut *self.sink,
        };
        let tokens = provider.tokenize(info, options);
        self.tokens.extend(tokens);
        true
    }

    fn finish(mut self) -> Lexed {
        for entry in self.scopes.drain_unclosed() {
            tracing::debug!(label = %entry.label.name, offset = entry.offset, "unclosed block");
            self.sink.push_at(
                entry.offset,
                Diagnostic::unclosed_scope(entry.label.reported_name())
                    .expected(close_tag(&entry.label)),
            );
        }
        Lexed {
            tokens: self.tokens,
        }
    }
}

//! Public entry points
//!
//!     parse       lex, then assemble when the lex was clean
//!     validate    lex only, keep the diagnostics
//!     tokenize    lex only, keep tokens and diagnostics
//!
//!     A template with any diagnostic never yields a document, so a caller cannot render
//!     a partial tree. Internal errors abort the call and come back as `Err`.

use crate::stache::ast::{Diagnostic, DiagnosticSink, Document, InternalError};
use crate::stache::building::assemble;
use crate::stache::lexing;
use crate::stache::options::ParserOptions;
use crate::stache::token::Token;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    /// `None` whenever `diagnostics` is not empty
    pub document: Option<Document>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenizeOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a template into a document
pub fn parse(template: &str, options: &ParserOptions) -> Result<ParseOutput, InternalError> {
    let mut sink = DiagnosticSink::new(template);
    let lexed = lexing::tokenize(template, options, &mut sink)?;

    if !sink.is_empty() {
        tracing::debug!(diagnostics = sink.len(), "template has errors, skipping assembly");
        return Ok(ParseOutput {
            document: None,
            diagnostics: sink.into_vec(),
        });
    }

    let document = assemble(&lexed.tokens, options)?;
    Ok(ParseOutput {
        document: Some(document),
        diagnostics: Vec::new(),
    })
}

/// Check a template without building a tree
pub fn validate(template: &str) -> Result<Vec<Diagnostic>, InternalError> {
    validate_with(template, &ParserOptions::default())
}

/// [`validate`] with partials and custom tags
pub fn validate_with(
    template: &str,
    options: &ParserOptions,
) -> Result<Vec<Diagnostic>, InternalError> {
    let mut sink = DiagnosticSink::new(template);
    lexing::tokenize(template, options, &mut sink)?;
    Ok(sink.into_vec())
}

/// Lex a template, keeping tokens even when there are diagnostics
pub fn tokenize(template: &str, options: &ParserOptions) -> Result<TokenizeOutput, InternalError> {
    let mut sink = DiagnosticSink::new(template);
    let lexed = lexing::tokenize(template, options, &mut sink)?;
    Ok(TokenizeOutput {
        tokens: lexed.tokens,
        diagnostics: sink.into_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stache::options::{TagInfo, TagProvider};
    use crate::stache::token::TokenKind;

    #[test]
    fn test_clean_template_has_document() {
        let output = parse("Hello {{name}}!", &ParserOptions::default()).unwrap();
        assert!(output.is_ok());
        assert_eq!(output.document.map(|d| d.children.len()), Some(3));
    }

    #[test]
    fn test_errors_suppress_document() {
        let output = parse("{{#if a}}{{b}}", &ParserOptions::default()).unwrap();
        assert!(output.document.is_none());
        assert_eq!(output.diagnostics.len(), 1);
    }

    #[test]
    fn test_validate_balanced() {
        let diagnostics = validate("{{#each xs AS x}}{{#if x.ok}}{{x}}{{/if}}{{/each}}").unwrap();
        assert!(diagnostics.is_empty());
    }

    /// Emits a token whose span runs past the end of its tag
    struct OverreachingProvider;

    impl TagProvider for OverreachingProvider {
        fn should_tokenize(&self, tag: &str) -> bool {
            tag == "{{#bad}}"
        }

        fn tokenize(&self, info: TagInfo<'_, '_>, _options: &ParserOptions) -> Vec<Token> {
            let mut token = info.token(TokenKind::Custom("bad".into()), "");
            token.span.end += 5;
            vec![token]
        }
    }

    fn overreaching() -> ParserOptions {
        ParserOptions::new().with_provider(OverreachingProvider)
    }

    #[test]
    fn test_internal_error_aborts_every_entry_point() {
        let template = "{{#bad}} tail";
        let expected = InternalError::OffsetRegression {
            offset: 13,
            span_end: 8,
        };
        assert_eq!(parse(template, &overreaching()), Err(expected.clone()));
        assert_eq!(tokenize(template, &overreaching()), Err(expected.clone()));
        assert_eq!(validate_with(template, &overreaching()), Err(expected));
    }

    #[test]
    fn test_tokenize_keeps_tokens_on_error() {
        let output = tokenize("{{/if}}x", &ParserOptions::default()).unwrap();
        assert_eq!(output.tokens.len(), 2);
        assert_eq!(output.diagnostics.len(), 1);
    }
}

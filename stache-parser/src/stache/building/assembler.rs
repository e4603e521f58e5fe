//! Token list to document tree

use super::stack::{BuildStack, ScopeIdFactory};
use crate::stache::ast::{Document, DocumentNode, InternalError, ScopeKind, TextOperation};
use crate::stache::options::ParserOptions;
use crate::stache::token::{Token, TokenKind};

/// Assemble a token list into a document
///
/// `tokens` should come from a lex that raised no diagnostics. Blocks left open at the
/// end are an [`InternalError`].
pub fn assemble(tokens: &[Token], options: &ParserOptions) -> Result<Document, InternalError> {
    let mut stack = BuildStack::new();
    let mut scope_ids = ScopeIdFactory::new();
    tracing::debug!(tokens = tokens.len(), "assembling");

    for token in tokens {
        match &token.kind {
            TokenKind::Content => stack.push_child(DocumentNode::Content {
                text: token.value.clone(),
            }),
            TokenKind::EscapedValue | TokenKind::UnescapedValue => {
                if let Some(expression) = token.expression.clone() {
                    stack.push_child(DocumentNode::PathPrint {
                        expression,
                        escape: token.kind == TokenKind::EscapedValue,
                    });
                }
            }
            TokenKind::ScopeOpen => open_scope(&mut stack, &mut scope_ids, ScopeKind::ExpressionScope, token),
            TokenKind::InvertedScopeOpen => {
                open_scope(&mut stack, &mut scope_ids, ScopeKind::InvertedScope, token)
            }
            TokenKind::If => open_scope(&mut stack, &mut scope_ids, ScopeKind::If, token),
            TokenKind::IfNot => open_scope(&mut stack, &mut scope_ids, ScopeKind::IfNot, token),
            TokenKind::Else => open_scope(&mut stack, &mut scope_ids, ScopeKind::Else, token),
            TokenKind::CollectionOpen => {
                open_scope(&mut stack, &mut scope_ids, ScopeKind::Each, token)
            }
            TokenKind::WhileOpen => open_scope(&mut stack, &mut scope_ids, ScopeKind::While, token),
            TokenKind::DoOpen => open_scope(&mut stack, &mut scope_ids, ScopeKind::Do, token),
            TokenKind::RepeatOpen => {
                open_scope(&mut stack, &mut scope_ids, ScopeKind::Repeat, token)
            }
            TokenKind::PartialDeclarationOpen => {
                let scope_id = scope_ids.next_id();
                stack.open(DocumentNode::PartialDeclaration {
                    name: token.value.clone(),
                    scope_id,
                    children: Vec::new(),
                });
            }
            TokenKind::ScopeClose
            | TokenKind::IfClose
            | TokenKind::ElseClose
            | TokenKind::CollectionClose
            | TokenKind::WhileClose
            | TokenKind::DoClose
            | TokenKind::RepeatClose
            | TokenKind::PartialDeclarationClose => {
                if !stack.close() {
                    tracing::warn!(token = %token, "close without an open block");
                }
            }
            TokenKind::Alias => {
                let scope_id = stack.nearest_scope_id();
                stack.push_child(DocumentNode::Alias {
                    name: token.value.clone(),
                    scope_id,
                });
                stack.declare_local(token.value.as_str());
            }
            TokenKind::RenderPartial => stack.push_child(DocumentNode::PartialRender {
                name: token.value.clone(),
                context: token.expression.clone(),
            }),
            TokenKind::VariableVar => {
                if let Some(expression) = token.expression.clone() {
                    stack.push_child(DocumentNode::VariableBinding {
                        name: token.value.clone(),
                        expression,
                        scope_id: ScopeIdFactory::ROOT,
                        durable: true,
                    });
                }
            }
            TokenKind::VariableLet => {
                if let Some(expression) = token.expression.clone() {
                    let scope_id = stack.nearest_scope_id();
                    stack.push_child(DocumentNode::VariableBinding {
                        name: token.value.clone(),
                        expression,
                        scope_id,
                        durable: false,
                    });
                    stack.declare_local(token.value.as_str());
                }
            }
            TokenKind::WriteLineBreak => text_edit(&mut stack, TextOperation::AppendLineBreak),
            TokenKind::TrimLineBreak => text_edit(&mut stack, TextOperation::TrimLineBreak),
            TokenKind::TrimLineBreaks => text_edit(&mut stack, TextOperation::TrimLineBreaks),
            TokenKind::TrimEverything => text_edit(&mut stack, TextOperation::TrimEverything),
            TokenKind::Comment => {}
            TokenKind::Custom(tag) => {
                let provider = options
                    .providers()
                    .iter()
                    .find(|provider| provider.should_parse(token, options));
                match provider {
                    Some(provider) => {
                        if let Some(node) = provider.parse(token, options, &mut stack, &mut scope_ids) {
                            stack.push_child(node);
                        }
                    }
                    None => stack.push_child(DocumentNode::Custom {
                        tag: tag.clone(),
                        value: token.value.clone(),
                        scope_id: None,
                        children: Vec::new(),
                    }),
                }
            }
        }
    }

    stack.into_document()
}

fn open_scope(stack: &mut BuildStack, scope_ids: &mut ScopeIdFactory, kind: ScopeKind, token: &Token) {
    let scope_id = scope_ids.next_id();
    tracing::trace!(%kind, scope_id, "scope");
    stack.open(DocumentNode::Scope {
        kind,
        condition: token.expression.clone(),
        scope_id,
        children: Vec::new(),
    });
}

fn text_edit(stack: &mut BuildStack, operation: TextOperation) {
    stack.push_child(DocumentNode::TextEdit { operation });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stache::ast::DiagnosticSink;
    use crate::stache::lexing::tokenize;

    fn build(template: &str) -> Document {
        let options = ParserOptions::default();
        let mut sink = DiagnosticSink::new(template);
        let lexed = tokenize(template, &options, &mut sink).unwrap();
        assert!(sink.is_empty(), "{:?}", sink.items());
        assemble(&lexed.tokens, &options).unwrap()
    }

    #[test]
    fn test_if_scope_owns_its_print() {
        let document = build("{{#if a}}{{b}}{{/if}}");
        assert_eq!(document.children.len(), 1);
        let DocumentNode::Scope {
            kind,
            condition,
            scope_id,
            children,
        } = &document.children[0]
        else {
            panic!("expected a scope, got {:?}", document.children[0]);
        };
        assert_eq!(*kind, ScopeKind::If);
        assert_eq!(condition.as_ref().map(|c| c.to_string()), Some("a".to_string()));
        assert_eq!(*scope_id, 1);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].node_type(), "PathPrint");
    }

    #[test]
    fn test_each_alias_is_bound_and_unbound() {
        let document = build("{{#each list AS item}}{{item}}{{/each}}");
        let children = document.children[0].children();
        let types: Vec<&str> = children.iter().map(|n| n.node_type()).collect();
        assert_eq!(types, vec!["Alias", "PathPrint", "Unbind"]);
        assert_eq!(
            children[0],
            DocumentNode::Alias {
                name: "item".into(),
                scope_id: 1
            }
        );
    }

    #[test]
    fn test_var_is_global_and_let_is_local() {
        let document = build("{{#let a = 1}}{{#each xs}}{{#var b = 2}}{{#let c = 3}}{{/each}}");
        let bindings: Vec<(String, usize, bool)> = document
            .iter_all_nodes()
            .filter_map(|node| match node {
                DocumentNode::VariableBinding {
                    name,
                    scope_id,
                    durable,
                    ..
                } => Some((name.clone(), *scope_id, *durable)),
                _ => None,
            })
            .collect();
        assert_eq!(
            bindings,
            vec![
                ("a".to_string(), 0, false),
                ("b".to_string(), 0, true),
                ("c".to_string(), 1, false)
            ]
        );

        let each = &document.children[1];
        assert_eq!(
            each.children().last(),
            Some(&DocumentNode::Unbind {
                name: "c".into(),
                scope_id: 1
            })
        );
    }

    #[test]
    fn test_scope_ids_increase_across_the_parse() {
        let document = build("{{#if a}}{{#each b}}{{/each}}{{/if}}{{#with}}{{/with}}");
        let ids: Vec<usize> = document
            .iter_all_nodes()
            .filter_map(|node| node.scope_id())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_else_follows_if() {
        let document = build("{{#if a}}x{{#ifelse}}y{{/else}}");
        let kinds: Vec<String> = document
            .children
            .iter()
            .map(|node| node.label())
            .collect();
        assert_eq!(kinds, vec!["if a #1", "else #2"]);
    }

    #[test]
    fn test_partials_and_text_edits() {
        let document = build("{{#declare Card}}{{name}}{{/declare}}{{#include Card With person}}{{#NL}}");
        let types: Vec<&str> = document.children.iter().map(|n| n.node_type()).collect();
        assert_eq!(types, vec!["PartialDeclaration", "PartialRender", "TextEdit"]);
        assert_eq!(document.children[1].label(), "Card with person");
    }

    #[test]
    fn test_comments_are_dropped() {
        let document = build("a{{! note }}b");
        assert_eq!(document.children.len(), 2);
    }

    #[test]
    fn test_unclosed_tokens_are_internal_error() {
        let template = "{{#each xs}}";
        let options = ParserOptions::default();
        let mut sink = DiagnosticSink::new(template);
        let lexed = tokenize(template, &options, &mut sink).unwrap();
        let error = assemble(&lexed.tokens, &options).unwrap_err();
        assert!(matches!(error, InternalError::UnbalancedBuildStack { .. }));
    }
}

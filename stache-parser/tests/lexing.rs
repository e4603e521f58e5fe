//! Lexer behaviour over whole templates

use rstest::rstest;
use stache_parser::stache::token::detokenize;
use stache_parser::stache::{tokenize, DiagnosticKind, ParserOptions, TokenKind};

fn shapes(template: &str) -> Vec<String> {
    let output = tokenize(template, &ParserOptions::default()).unwrap();
    assert!(
        output.diagnostics.is_empty(),
        "{}: {:?}",
        template,
        output.diagnostics
    );
    output.tokens.iter().map(|t| t.to_string()).collect()
}

fn kinds(template: &str) -> Vec<DiagnosticKind> {
    tokenize(template, &ParserOptions::default())
        .unwrap()
        .diagnostics
        .iter()
        .map(|d| d.kind)
        .collect()
}

#[test]
fn content_around_a_value() {
    assert_eq!(
        shapes("Hello {{name}}!"),
        vec!["Content(\"Hello \")", "EscapedValue(name)", "Content(\"!\")"]
    );
}

#[test]
fn if_block_tokens() {
    assert_eq!(
        shapes("{{#if a}}{{b}}{{/if}}"),
        vec!["If(a)", "EscapedValue(b)", "IfClose"]
    );
}

#[test]
fn each_alias_is_a_separate_token() {
    assert_eq!(
        shapes("{{#each list AS item}}{{item}}{{/each}}"),
        vec![
            "CollectionOpen(list)",
            "Alias(\"item\")",
            "EscapedValue(item)",
            "CollectionClose"
        ]
    );
}

#[rstest]
#[case("{{#while i < 3}}{{/while}}", TokenKind::WhileOpen, TokenKind::WhileClose)]
#[case("{{#do ok}}{{/do}}", TokenKind::DoOpen, TokenKind::DoClose)]
#[case("{{#repeat 3}}{{/repeat}}", TokenKind::RepeatOpen, TokenKind::RepeatClose)]
#[case("{{^if a}}{{/if}}", TokenKind::IfNot, TokenKind::IfClose)]
#[case("{{#declare Row}}{{/declare}}", TokenKind::PartialDeclarationOpen, TokenKind::PartialDeclarationClose)]
#[case("{{#person}}{{/person}}", TokenKind::ScopeOpen, TokenKind::ScopeClose)]
#[case("{{^people}}{{/people}}", TokenKind::InvertedScopeOpen, TokenKind::ScopeClose)]
fn block_pairs(#[case] template: &str, #[case] open: TokenKind, #[case] close: TokenKind) {
    let output = tokenize(template, &ParserOptions::default()).unwrap();
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let kinds: Vec<TokenKind> = output.tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![open, close]);
}

#[rstest]
#[case("{{#NL}}", TokenKind::WriteLineBreak)]
#[case("{{#TNL}}", TokenKind::TrimLineBreak)]
#[case("{{#TNLS}}", TokenKind::TrimLineBreaks)]
#[case("{{#TRIMALL}}", TokenKind::TrimEverything)]
#[case("{{#trimall}}", TokenKind::TrimEverything)]
#[case("{{{raw}}}", TokenKind::UnescapedValue)]
#[case("{{&raw}}", TokenKind::UnescapedValue)]
#[case("{{! a comment }}", TokenKind::Comment)]
#[case("{{#var x = 1}}", TokenKind::VariableVar)]
#[case("{{#let x = 1}}", TokenKind::VariableLet)]
fn single_tags(#[case] template: &str, #[case] kind: TokenKind) {
    let output = tokenize(template, &ParserOptions::default()).unwrap();
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(output.tokens.len(), 1);
    assert_eq!(output.tokens[0].kind, kind);
}

#[test]
fn one_unmatched_each_names_each() {
    let output = tokenize("before {{#each x}} after", &ParserOptions::default()).unwrap();
    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::UnclosedScope);
    assert_eq!(diagnostic.actual, "each");
    assert_eq!(diagnostic.position.to_string(), "1:8");
}

#[rstest]
#[case("{{/if}}", vec![DiagnosticKind::UnopenedScope])]
#[case("{{#if a}}{{/each}}{{/if}}", vec![DiagnosticKind::UnopenedScope])]
#[case("{{#each a}}{{#if b}}{{/each}}", vec![DiagnosticKind::UnopenedScope, DiagnosticKind::UnclosedScope, DiagnosticKind::UnclosedScope])]
#[case("{{#else}}{{/else}}", vec![DiagnosticKind::SyntaxError])]
#[case("{{#include Missing}}", vec![DiagnosticKind::SyntaxError])]
#[case("{{a()()}}", vec![DiagnosticKind::AmbiguousExpression])]
#[case("{{#if a AS b}}{{/if}}", vec![DiagnosticKind::SyntaxError])]
#[case("{{#NL now}}", vec![DiagnosticKind::SyntaxError])]
fn diagnostics(#[case] template: &str, #[case] expected: Vec<DiagnosticKind>) {
    assert_eq!(kinds(template), expected);
}

#[test]
fn independent_errors_are_all_reported() {
    let template = "{{a b}}\n{{#if}}{{/if}}\n{{f(}}\n{{/each}}";
    let output = tokenize(template, &ParserOptions::default()).unwrap();
    let lines: Vec<usize> = output.diagnostics.iter().map(|d| d.position.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4]);
}

#[test]
fn recursive_partial_may_include_itself() {
    let template = "{{#declare Tree}}{{#each children}}{{#include Tree With .}}{{/each}}{{/declare}}";
    assert!(kinds(template).is_empty());
}

#[test]
fn include_before_declare_is_rejected() {
    assert_eq!(
        kinds("{{#include Card}}{{#declare Card}}{{/declare}}"),
        vec![DiagnosticKind::SyntaxError]
    );
}

#[test]
fn detokenize_reproduces_malformed_templates() {
    let template = "{{#each}} {{ {{a b}} }} {{{x}}} {{/nothing}}";
    let output = tokenize(template, &ParserOptions::default()).unwrap();
    assert!(!output.diagnostics.is_empty());
    assert_eq!(detokenize(&output.tokens), template);
}

#[test]
fn stray_braces_are_content() {
    assert_eq!(
        shapes("a { b } {{}} c"),
        vec!["Content(\"a { b } {{}} c\")"]
    );
}

//! Property tests over generated templates

use proptest::prelude::*;
use stache_parser::stache::token::detokenize;
use stache_parser::stache::{parse, tokenize, validate, ParserOptions};

const NAMES: &[&str] = &["name", "person", "items", "title", "count", "total"];

fn name() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES).prop_map(str::to_string)
}

fn content() -> impl Strategy<Value = String> {
    "[a-z .,\n]{1,8}"
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        content(),
        name().prop_map(|n| format!("{{{{{}}}}}", n)),
        name().prop_map(|n| format!("{{{{{{{}}}}}}}", n)),
        name().prop_map(|n| format!("{{{{{}.length > 2}}}}", n)),
        Just("{{! note }}".to_string()),
        Just("{{#NL}}".to_string()),
    ]
}

/// Templates whose blocks are always balanced and whose expressions are valid
fn balanced() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        let body = prop::collection::vec(inner, 0..4).prop_map(|parts| parts.concat());
        prop_oneof![
            (name(), body.clone()).prop_map(|(n, b)| format!("{{{{#if {}}}}}{}{{{{/if}}}}", n, b)),
            (name(), body.clone())
                .prop_map(|(n, b)| format!("{{{{^if {}}}}}{}{{{{/if}}}}", n, b)),
            (name(), body.clone()).prop_map(|(n, b)| {
                format!("{{{{#each {} AS item}}}}{}{{{{/each}}}}", n, b)
            }),
            (name(), body.clone())
                .prop_map(|(n, b)| format!("{{{{#{}}}}}{}{{{{/{}}}}}", n, b, n)),
            (name(), body.clone(), body.clone()).prop_map(|(n, a, b)| {
                format!("{{{{#if {}}}}}{}{{{{#ifelse}}}}{}{{{{/else}}}}", n, a, b)
            }),
            (name(), body.clone())
                .prop_map(|(n, b)| format!("{{{{#let x = {}}}}}{}", n, b)),
            body.prop_map(|b| format!("{{{{#repeat 3}}}}{}{{{{/repeat}}}}", b)),
        ]
    })
}

fn sequence() -> impl Strategy<Value = String> {
    prop::collection::vec(balanced(), 1..5).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn balanced_templates_validate_cleanly(template in sequence()) {
        let diagnostics = validate(&template).unwrap();
        prop_assert!(diagnostics.is_empty(), "{:?}: {:?}", template, diagnostics);
    }

    #[test]
    fn balanced_templates_assemble(template in sequence()) {
        let output = parse(&template, &ParserOptions::default()).unwrap();
        prop_assert!(output.document.is_some());
    }

    #[test]
    fn detokenize_reproduces_balanced_templates(template in sequence()) {
        let options = ParserOptions::default();
        let first = tokenize(&template, &options).unwrap();
        let source = detokenize(&first.tokens);
        prop_assert_eq!(&source, &template);
        let second = tokenize(&source, &options).unwrap();
        prop_assert_eq!(first.tokens, second.tokens);
    }

    #[test]
    fn detokenize_reproduces_arbitrary_text(template in "[a-z{}#/^!&. ()]{0,40}") {
        let output = tokenize(&template, &ParserOptions::default()).unwrap();
        prop_assert_eq!(detokenize(&output.tokens), template);
    }
}

//! Testing utilities for document and expression assertions
//!
//!     Tests that walk the document tree by hand are verbose and tend to check only counts.
//!     They also break in many places whenever a node gains a field. This module offers a
//!     fluent API instead: tests state what they expect of a node through semantic methods
//!     (`kind`, `condition`, `child`), and only the assertion code knows the node layout.
//!
//! Usage
//!
//!     ```rust,ignore
//!     use stache_parser::stache::testing::{assert_document, parse_ok};
//!     use stache_parser::stache::ScopeKind;
//!
//!     let document = parse_ok("{{#each items AS item}}{{item.name}}{{/each}}");
//!
//!     assert_document(&document)
//!         .item_count(1)
//!         .item(0, |node| {
//!             node.assert_scope()
//!                 .kind(ScopeKind::Each)
//!                 .condition("items")
//!                 .child_types(&["Alias", "PathPrint", "Unbind"])
//!                 .child(1, |child| {
//!                     child.assert_print().expression("item.name").escaped(true);
//!                 });
//!         });
//!     ```
//!
//!     Expressions get the same treatment through [`assert_expression`]:
//!
//!     ```rust,ignore
//!     assert_expression(&parse_expr("a.b(c, [x]1)"))
//!         .assert_path()
//!         .segments(&["a"])
//!         .formatter("b")
//!         .argument(1, Some("x"), |arg| { arg.renders("1"); });
//!     ```
//!
//!     Both render failures with the path to the offending node, e.g.
//!     `items[0].children[1]: Expected PathPrint, found Content`.

mod assertions;
mod expression;
mod matchers;

pub use assertions::{
    assert_document, BindingAssertion, ContentAssertion, CustomAssertion, DocumentAssertion,
    NodeAssertion, PartialAssertion, PrintAssertion, ScopeAssertion,
};
pub use expression::{assert_expression, ExpressionAssertion, OperatorAssertion, PathAssertion};
pub use matchers::TextMatch;

use crate::stache::ast::{Diagnostic, Document, Expression};
use crate::stache::options::ParserOptions;
use crate::stache::parsing::parse_standalone;
use crate::stache::pipeline;

/// Parse a template that must be valid
///
/// Panics with the diagnostics when it is not.
pub fn parse_ok(template: &str) -> Document {
    parse_ok_with(template, &ParserOptions::default())
}

pub fn parse_ok_with(template: &str, options: &ParserOptions) -> Document {
    let output = match pipeline::parse(template, options) {
        Ok(output) => output,
        Err(error) => panic!("internal error parsing {:?}: {}", template, error),
    };
    match output.document {
        Some(document) => document,
        None => panic!(
            "expected {:?} to parse, got diagnostics:\n{}",
            template,
            render_diagnostics(&output.diagnostics)
        ),
    }
}

/// Parse a template that must be rejected, returning its diagnostics
pub fn parse_err(template: &str) -> Vec<Diagnostic> {
    let output = match pipeline::parse(template, &ParserOptions::default()) {
        Ok(output) => output,
        Err(error) => panic!("internal error parsing {:?}: {}", template, error),
    };
    assert!(
        output.document.is_none() && !output.diagnostics.is_empty(),
        "expected {:?} to be rejected",
        template
    );
    output.diagnostics
}

/// Parse a standalone expression that must be valid
pub fn parse_expr(text: &str) -> Expression {
    match parse_standalone(text) {
        Ok(expression) => expression,
        Err(diagnostics) => panic!(
            "expected expression {:?} to parse, got:\n{}",
            text,
            render_diagnostics(&diagnostics)
        ),
    }
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}

//! Fluent assertions over document nodes

use super::matchers::TextMatch;
use crate::stache::ast::{Document, DocumentNode, ScopeKind, TextOperation};

/// Create an assertion builder for a document
pub fn assert_document(document: &Document) -> DocumentAssertion<'_> {
    DocumentAssertion { document }
}

fn summarize(nodes: &[DocumentNode]) -> String {
    nodes
        .iter()
        .map(|node| node.node_type())
        .collect::<Vec<_>>()
        .join(", ")
}

fn assert_types(nodes: &[DocumentNode], expected: &[&str], context: &str) {
    let actual: Vec<&str> = nodes.iter().map(|node| node.node_type()).collect();
    assert_eq!(
        actual, expected,
        "{}: Expected node types [{}], found [{}]",
        context,
        expected.join(", "),
        summarize(nodes)
    );
}

fn nth<'a>(nodes: &'a [DocumentNode], index: usize, context: &str) -> &'a DocumentNode {
    assert!(
        index < nodes.len(),
        "{}: index {} out of bounds ({} nodes: [{}])",
        context,
        index,
        nodes.len(),
        summarize(nodes)
    );
    &nodes[index]
}

pub struct DocumentAssertion<'a> {
    document: &'a Document,
}

impl<'a> DocumentAssertion<'a> {
    pub fn item_count(self, expected: usize) -> Self {
        let actual = self.document.children.len();
        assert_eq!(
            actual,
            expected,
            "Expected {} items, found {} items: [{}]",
            expected,
            actual,
            summarize(&self.document.children)
        );
        self
    }

    /// Assert the node types of the top-level items, in order
    pub fn item_types(self, expected: &[&str]) -> Self {
        assert_types(&self.document.children, expected, "document");
        self
    }

    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node = nth(&self.document.children, index, "document");
        assertion(NodeAssertion {
            node,
            context: format!("items[{}]", index),
        });
        self
    }
}

/// A node whose variant has not been asserted yet
pub struct NodeAssertion<'a> {
    pub(crate) node: &'a DocumentNode,
    pub(crate) context: String,
}

impl<'a> NodeAssertion<'a> {
    fn mismatch(&self, expected: &str) -> ! {
        panic!(
            "{}: Expected {}, found {} ({})",
            self.context,
            expected,
            self.node.node_type(),
            self.node.label()
        )
    }

    /// Assert the one-line label of the node
    pub fn label(self, expected: impl Into<TextMatch>) -> Self {
        expected
            .into()
            .assert(&self.node.label(), &format!("{} label", self.context));
        self
    }

    pub fn assert_content(self) -> ContentAssertion<'a> {
        match self.node {
            DocumentNode::Content { text } => ContentAssertion {
                text,
                context: self.context,
            },
            _ => self.mismatch("Content"),
        }
    }

    pub fn assert_print(self) -> PrintAssertion<'a> {
        match self.node {
            DocumentNode::PathPrint { .. } => PrintAssertion {
                node: self.node,
                context: self.context,
            },
            _ => self.mismatch("PathPrint"),
        }
    }

    pub fn assert_scope(self) -> ScopeAssertion<'a> {
        match self.node {
            DocumentNode::Scope { .. } => ScopeAssertion {
                node: self.node,
                context: self.context,
            },
            _ => self.mismatch("Scope"),
        }
    }

    /// Alias, variable binding or unbind
    pub fn assert_binding(self) -> BindingAssertion<'a> {
        match self.node {
            DocumentNode::Alias { .. }
            | DocumentNode::VariableBinding { .. }
            | DocumentNode::Unbind { .. } => BindingAssertion {
                node: self.node,
                context: self.context,
            },
            _ => self.mismatch("Alias, VariableBinding or Unbind"),
        }
    }

    /// Partial declaration or render
    pub fn assert_partial(self) -> PartialAssertion<'a> {
        match self.node {
            DocumentNode::PartialDeclaration { .. } | DocumentNode::PartialRender { .. } => {
                PartialAssertion {
                    node: self.node,
                    context: self.context,
                }
            }
            _ => self.mismatch("PartialDeclaration or PartialRender"),
        }
    }

    pub fn assert_text_edit(self, expected: TextOperation) {
        match self.node {
            DocumentNode::TextEdit { operation } => assert_eq!(
                *operation, expected,
                "{}: Expected text edit {:?}, found {:?}",
                self.context, expected, operation
            ),
            _ => self.mismatch("TextEdit"),
        }
    }

    pub fn assert_custom(self) -> CustomAssertion<'a> {
        match self.node {
            DocumentNode::Custom { .. } => CustomAssertion {
                node: self.node,
                context: self.context,
            },
            _ => self.mismatch("Custom"),
        }
    }
}

/// Child assertions shared by every node that owns children
macro_rules! children_assertions {
    ($assertion:ident) => {
        impl<'a> $assertion<'a> {
            pub fn child_count(self, expected: usize) -> Self {
                let children = self.node.children();
                assert_eq!(
                    children.len(),
                    expected,
                    "{}: Expected {} children, found {}: [{}]",
                    self.context,
                    expected,
                    children.len(),
                    summarize(children)
                );
                self
            }

            pub fn child_types(self, expected: &[&str]) -> Self {
                assert_types(self.node.children(), expected, &self.context);
                self
            }

            pub fn child<F>(self, index: usize, assertion: F) -> Self
            where
                F: FnOnce(NodeAssertion<'a>),
            {
                let node = nth(self.node.children(), index, &self.context);
                assertion(NodeAssertion {
                    node,
                    context: format!("{}.children[{}]", self.context, index),
                });
                self
            }

            pub fn scope_id(self, expected: usize) -> Self {
                assert_eq!(
                    self.node.scope_id(),
                    Some(expected),
                    "{}: Expected scope id {}",
                    self.context,
                    expected
                );
                self
            }
        }
    };
}

pub struct ContentAssertion<'a> {
    text: &'a str,
    context: String,
}

impl ContentAssertion<'_> {
    pub fn text(self, expected: impl Into<TextMatch>) -> Self {
        expected.into().assert(self.text, &self.context);
        self
    }
}

pub struct PrintAssertion<'a> {
    node: &'a DocumentNode,
    context: String,
}

impl PrintAssertion<'_> {
    /// Assert the canonical source text of the printed expression
    pub fn expression(self, expected: &str) -> Self {
        if let DocumentNode::PathPrint { expression, .. } = self.node {
            assert_eq!(
                expression.to_string(),
                expected,
                "{}: Expected expression '{}', found '{}'",
                self.context,
                expected,
                expression
            );
        }
        self
    }

    pub fn escaped(self, expected: bool) -> Self {
        if let DocumentNode::PathPrint { escape, .. } = self.node {
            assert_eq!(
                *escape, expected,
                "{}: Expected escape {}, found {}",
                self.context, expected, escape
            );
        }
        self
    }
}

pub struct ScopeAssertion<'a> {
    node: &'a DocumentNode,
    context: String,
}

children_assertions!(ScopeAssertion);

impl ScopeAssertion<'_> {
    pub fn kind(self, expected: ScopeKind) -> Self {
        if let DocumentNode::Scope { kind, .. } = self.node {
            assert_eq!(
                *kind, expected,
                "{}: Expected scope kind {}, found {}",
                self.context, expected, kind
            );
        }
        self
    }

    /// Assert the canonical source text of the condition
    pub fn condition(self, expected: &str) -> Self {
        if let DocumentNode::Scope { condition, .. } = self.node {
            let actual = condition.as_ref().map(|c| c.to_string());
            assert_eq!(
                actual.as_deref(),
                Some(expected),
                "{}: Expected condition '{}', found {:?}",
                self.context,
                expected,
                actual
            );
        }
        self
    }

    pub fn no_condition(self) -> Self {
        if let DocumentNode::Scope { condition, .. } = self.node {
            assert!(
                condition.is_none(),
                "{}: Expected no condition, found {:?}",
                self.context,
                condition.as_ref().map(|c| c.to_string())
            );
        }
        self
    }
}

pub struct BindingAssertion<'a> {
    node: &'a DocumentNode,
    context: String,
}

impl BindingAssertion<'_> {
    fn parts(&self) -> (&str, usize) {
        match self.node {
            DocumentNode::Alias { name, scope_id }
            | DocumentNode::VariableBinding { name, scope_id, .. }
            | DocumentNode::Unbind { name, scope_id } => (name.as_str(), *scope_id),
            _ => ("", 0),
        }
    }

    pub fn name(self, expected: &str) -> Self {
        let (name, _) = self.parts();
        assert_eq!(
            name, expected,
            "{}: Expected binding name '{}', found '{}'",
            self.context, expected, name
        );
        self
    }

    pub fn scope_id(self, expected: usize) -> Self {
        let (_, scope_id) = self.parts();
        assert_eq!(
            scope_id, expected,
            "{}: Expected binding scope id {}, found {}",
            self.context, expected, scope_id
        );
        self
    }

    pub fn durable(self, expected: bool) -> Self {
        match self.node {
            DocumentNode::VariableBinding { durable, .. } => assert_eq!(
                *durable, expected,
                "{}: Expected durable {}, found {}",
                self.context, expected, durable
            ),
            other => panic!(
                "{}: Expected VariableBinding, found {}",
                self.context,
                other.node_type()
            ),
        }
        self
    }

    /// Assert the canonical source text of a variable binding's value
    pub fn expression(self, expected: &str) -> Self {
        match self.node {
            DocumentNode::VariableBinding { expression, .. } => assert_eq!(
                expression.to_string(),
                expected,
                "{}: Expected binding expression '{}', found '{}'",
                self.context,
                expected,
                expression
            ),
            other => panic!(
                "{}: Expected VariableBinding, found {}",
                self.context,
                other.node_type()
            ),
        }
        self
    }
}

pub struct PartialAssertion<'a> {
    node: &'a DocumentNode,
    context: String,
}

children_assertions!(PartialAssertion);

impl PartialAssertion<'_> {
    pub fn name(self, expected: &str) -> Self {
        let name = match self.node {
            DocumentNode::PartialDeclaration { name, .. }
            | DocumentNode::PartialRender { name, .. } => name.as_str(),
            _ => "",
        };
        assert_eq!(
            name, expected,
            "{}: Expected partial '{}', found '{}'",
            self.context, expected, name
        );
        self
    }

    /// Assert the `With` context of a partial render
    pub fn context(self, expected: Option<&str>) -> Self {
        if let DocumentNode::PartialRender { context, .. } = self.node {
            let actual = context.as_ref().map(|c| c.to_string());
            assert_eq!(
                actual.as_deref(),
                expected,
                "{}: Expected partial context {:?}, found {:?}",
                self.context,
                expected,
                actual
            );
        }
        self
    }
}

pub struct CustomAssertion<'a> {
    node: &'a DocumentNode,
    context: String,
}

children_assertions!(CustomAssertion);

impl CustomAssertion<'_> {
    pub fn tag(self, expected: &str) -> Self {
        if let DocumentNode::Custom { tag, .. } = self.node {
            assert_eq!(
                tag, expected,
                "{}: Expected custom tag '{}', found '{}'",
                self.context, expected, tag
            );
        }
        self
    }

    pub fn value(self, expected: impl Into<TextMatch>) -> Self {
        if let DocumentNode::Custom { value, .. } = self.node {
            expected.into().assert(value, &self.context);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stache::testing::parse_ok;

    #[test]
    fn test_nested_assertions() {
        let document = parse_ok("Hi {{#each people AS p}}{{p.name}}{{/each}}");
        assert_document(&document)
            .item_types(&["Content", "Scope"])
            .item(0, |node| {
                node.assert_content().text("Hi ");
            })
            .item(1, |node| {
                node.assert_scope()
                    .kind(ScopeKind::Each)
                    .condition("people")
                    .scope_id(1)
                    .child_types(&["Alias", "PathPrint", "Unbind"])
                    .child(0, |child| {
                        child.assert_binding().name("p").scope_id(1);
                    })
                    .child(1, |child| {
                        child.assert_print().expression("p.name").escaped(true);
                    });
            });
    }

    #[test]
    #[should_panic(expected = "items[0]: Expected Scope, found Content")]
    fn test_wrong_variant_panics_with_path() {
        let document = parse_ok("text");
        assert_document(&document).item(0, |node| {
            node.assert_scope();
        });
    }

    #[test]
    #[should_panic(expected = "Expected 2 items, found 1 items")]
    fn test_item_count_mismatch() {
        let document = parse_ok("text");
        assert_document(&document).item_count(2);
    }
}

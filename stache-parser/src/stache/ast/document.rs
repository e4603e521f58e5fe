//! Document tree produced by the assembler
//!
//!     A parsed template is a [`Document`]: an ordered list of [`DocumentNode`]s where block
//!     tags own their children. Every node that opens a variable scope carries a `scope_id`
//!     from a counter shared across the whole parse (the root is scope 0). Alias and `let`
//!     bindings record the id of the block they belong to, and the block ends with one
//!     `Unbind` per binding so a renderer can restore what the names meant before.

use super::expression::Expression;
use serde::Serialize;
use std::fmt;

/// Root of a parsed template
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub children: Vec<DocumentNode>,
}

impl Document {
    pub fn new(children: Vec<DocumentNode>) -> Self {
        Self { children }
    }

    /// Depth-first walk over every node in the tree
    pub fn iter_all_nodes(&self) -> impl Iterator<Item = &DocumentNode> {
        let mut stack: Vec<&DocumentNode> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

/// Kind of a block that owns children and a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    If,
    IfNot,
    Else,
    Each,
    While,
    Do,
    Repeat,
    /// `{{#path}}`: render children with `path` as the context when it is truthy
    ExpressionScope,
    /// `{{^path}}`: render children when `path` is falsy
    InvertedScope,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeKind::If => "if",
            ScopeKind::IfNot => "if-not",
            ScopeKind::Else => "else",
            ScopeKind::Each => "each",
            ScopeKind::While => "while",
            ScopeKind::Do => "do",
            ScopeKind::Repeat => "repeat",
            ScopeKind::ExpressionScope => "scope",
            ScopeKind::InvertedScope => "inverted-scope",
        };
        write!(f, "{}", name)
    }
}

/// Whitespace directives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOperation {
    /// `{{#NL}}`
    AppendLineBreak,
    /// `{{#TNL}}`
    TrimLineBreak,
    /// `{{#TNLS}}`
    TrimLineBreaks,
    /// `{{#TRIMALL}}`
    TrimEverything,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNode {
    Content {
        text: String,
    },
    PathPrint {
        expression: Expression,
        escape: bool,
    },
    Scope {
        kind: ScopeKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        condition: Option<Expression>,
        scope_id: usize,
        children: Vec<DocumentNode>,
    },
    Alias {
        name: String,
        scope_id: usize,
    },
    /// `var` bindings are durable and global; `let` bindings live until their block closes
    VariableBinding {
        name: String,
        expression: Expression,
        scope_id: usize,
        durable: bool,
    },
    Unbind {
        name: String,
        scope_id: usize,
    },
    PartialDeclaration {
        name: String,
        scope_id: usize,
        children: Vec<DocumentNode>,
    },
    PartialRender {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<Expression>,
    },
    TextEdit {
        operation: TextOperation,
    },
    /// A node produced by a custom tag provider
    Custom {
        tag: String,
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        scope_id: Option<usize>,
        children: Vec<DocumentNode>,
    },
}

impl DocumentNode {
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Scope { children, .. }
            | DocumentNode::PartialDeclaration { children, .. }
            | DocumentNode::Custom { children, .. } => children,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<DocumentNode>> {
        match self {
            DocumentNode::Scope { children, .. }
            | DocumentNode::PartialDeclaration { children, .. }
            | DocumentNode::Custom { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Scope id owned by a block node
    pub fn scope_id(&self) -> Option<usize> {
        match self {
            DocumentNode::Scope { scope_id, .. }
            | DocumentNode::PartialDeclaration { scope_id, .. } => Some(*scope_id),
            DocumentNode::Custom { scope_id, .. } => *scope_id,
            _ => None,
        }
    }

    /// Short name of the node variant, used by tree renderers and assertions
    pub fn node_type(&self) -> &'static str {
        match self {
            DocumentNode::Content { .. } => "Content",
            DocumentNode::PathPrint { .. } => "PathPrint",
            DocumentNode::Scope { .. } => "Scope",
            DocumentNode::Alias { .. } => "Alias",
            DocumentNode::VariableBinding { .. } => "VariableBinding",
            DocumentNode::Unbind { .. } => "Unbind",
            DocumentNode::PartialDeclaration { .. } => "PartialDeclaration",
            DocumentNode::PartialRender { .. } => "PartialRender",
            DocumentNode::TextEdit { .. } => "TextEdit",
            DocumentNode::Custom { .. } => "Custom",
        }
    }

    /// One-line summary without children
    pub fn label(&self) -> String {
        match self {
            DocumentNode::Content { text } => format!("{:?}", text),
            DocumentNode::PathPrint { expression, escape } => {
                if *escape {
                    expression.to_string()
                } else {
                    format!("{} (unescaped)", expression)
                }
            }
            DocumentNode::Scope {
                kind,
                condition,
                scope_id,
                ..
            } => match condition {
                Some(condition) => format!("{} {} #{}", kind, condition, scope_id),
                None => format!("{} #{}", kind, scope_id),
            },
            DocumentNode::Alias { name, scope_id } => format!("{} #{}", name, scope_id),
            DocumentNode::VariableBinding {
                name,
                expression,
                scope_id,
                durable,
            } => {
                let keyword = if *durable { "var" } else { "let" };
                format!("{} {} = {} #{}", keyword, name, expression, scope_id)
            }
            DocumentNode::Unbind { name, scope_id } => format!("{} #{}", name, scope_id),
            DocumentNode::PartialDeclaration { name, scope_id, .. } => {
                format!("{} #{}", name, scope_id)
            }
            DocumentNode::PartialRender { name, context } => match context {
                Some(context) => format!("{} with {}", name, context),
                None => name.clone(),
            },
            DocumentNode::TextEdit { operation } => format!("{:?}", operation),
            DocumentNode::Custom { tag, value, .. } => format!("{} {}", tag, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_all_nodes_is_depth_first() {
        let document = Document::new(vec![
            DocumentNode::Scope {
                kind: ScopeKind::ExpressionScope,
                condition: None,
                scope_id: 1,
                children: vec![DocumentNode::Content { text: "a".into() }],
            },
            DocumentNode::Content { text: "b".into() },
        ]);

        let types: Vec<&str> = document.iter_all_nodes().map(|n| n.node_type()).collect();
        assert_eq!(types, vec!["Scope", "Content", "Content"]);
    }

    #[test]
    fn test_scope_id_of_leaf_is_none() {
        let node = DocumentNode::Content { text: "x".into() };
        assert_eq!(node.scope_id(), None);
        assert!(node.children().is_empty());
    }
}

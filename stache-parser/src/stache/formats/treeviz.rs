//! Treeviz formatter for documents
//!
//! Treeviz draws one line per node, so a template's structure can be scanned at a glance.
//! Nesting is shown with box-drawing connectors, two columns per level:
//!
//!     <prefix><connector> <icon> <label>  (label truncated to 40 characters)
//!
//! Example, for `Hi {{#each people AS p}}{{p.name}}{{/each}}`:
//!
//!     ⧉ document
//!     ├─ ¶ "Hi "
//!     └─ § each people #1
//!       ├─ @ p #1
//!       ├─ ≡ p.name
//!       └─ ⊘ p #1
//!
//! Icons
//!     Document: ⧉
//!     Content: ¶
//!     PathPrint: ≡
//!     Scope: §
//!     Alias: @
//!     VariableBinding: ≔
//!     Unbind: ⊘
//!     PartialDeclaration: ⊏
//!     PartialRender: ⊐
//!     TextEdit: ↵
//!     Custom: ⊕

use crate::stache::ast::{Document, DocumentNode};
use crate::stache::token::Token;

const LABEL_WIDTH: usize = 40;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn icon(node_type: &str) -> &'static str {
    match node_type {
        "Content" => "¶",
        "PathPrint" => "≡",
        "Scope" => "§",
        "Alias" => "@",
        "VariableBinding" => "≔",
        "Unbind" => "⊘",
        "PartialDeclaration" => "⊏",
        "PartialRender" => "⊐",
        "TextEdit" => "↵",
        "Custom" => "⊕",
        _ => "○",
    }
}

fn format_node(node: &DocumentNode, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        icon(node.node_type()),
        truncate(&node.label(), LABEL_WIDTH)
    ));

    let children = node.children();
    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    for (i, child) in children.iter().enumerate() {
        format_node(child, &child_prefix, i + 1 == children.len(), output);
    }
}

pub fn to_treeviz_str(document: &Document) -> String {
    let mut output = String::from("⧉ document\n");
    let count = document.children.len();
    for (i, node) in document.children.iter().enumerate() {
        format_node(node, "", i + 1 == count, &mut output);
    }
    output
}

/// One token per line, optionally prefixed with `line:column`
pub fn to_token_listing(tokens: &[Token], show_positions: bool) -> String {
    tokens
        .iter()
        .map(|token| {
            if show_positions {
                format!("{:>7} {}\n", token.position.to_string(), token)
            } else {
                format!("{}\n", token)
            }
        })
        .collect()
}

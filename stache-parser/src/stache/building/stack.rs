//! Build stack and scope numbering
//!
//!     The assembler keeps the blocks that are currently open on a [`BuildStack`], seeded
//!     with the document root. Children are collected per frame and handed to their block
//!     node when it closes. Each frame remembers the names bound inside it (aliases and
//!     `let` bindings) so closing it can emit one `Unbind` per name.
//!
//!     Scope ids come from a [`ScopeIdFactory`] threaded through the parse. The root is
//!     scope 0; every block that owns a scope takes the next id, starting at 1.

use crate::stache::ast::{Document, DocumentNode, InternalError};

/// Hands out scope ids for one parse
#[derive(Debug, Clone)]
pub struct ScopeIdFactory {
    next: usize,
}

impl ScopeIdFactory {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for ScopeIdFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct BuildFrame {
    /// `None` for the document root
    node: Option<DocumentNode>,
    scope_id: Option<usize>,
    children: Vec<DocumentNode>,
    /// Names bound in this scope, in binding order
    locals: Vec<String>,
}

#[derive(Debug)]
pub struct BuildStack {
    frames: Vec<BuildFrame>,
}

impl BuildStack {
    pub fn new() -> Self {
        Self {
            frames: vec![BuildFrame {
                node: None,
                scope_id: Some(ScopeIdFactory::ROOT),
                children: Vec::new(),
                locals: Vec::new(),
            }],
        }
    }

    /// Open a block; its children collect until the matching [`close`](Self::close)
    pub fn open(&mut self, node: DocumentNode) {
        let scope_id = node.scope_id();
        tracing::trace!(node = node.node_type(), ?scope_id, depth = self.depth(), "open");
        self.frames.push(BuildFrame {
            node: Some(node),
            scope_id,
            children: Vec::new(),
            locals: Vec::new(),
        });
    }

    /// Close the innermost block and append it to its parent
    ///
    /// Returns `false` when only the root is open.
    pub fn close(&mut self) -> bool {
        if self.frames.len() < 2 {
            return false;
        }
        let Some(mut frame) = self.frames.pop() else {
            return false;
        };

        if let Some(scope_id) = frame.scope_id {
            frame
                .children
                .extend(frame.locals.drain(..).map(|name| DocumentNode::Unbind { name, scope_id }));
        }

        if let Some(mut node) = frame.node {
            if let Some(children) = node.children_mut() {
                *children = frame.children;
            }
            tracing::trace!(node = node.node_type(), depth = self.depth(), "close");
            self.push_child(node);
        }
        true
    }

    /// Append a leaf to the innermost open block
    pub fn push_child(&mut self, node: DocumentNode) {
        if let Some(frame) = self.frames.last_mut() {
            frame.children.push(node);
        }
    }

    /// Scope id of the innermost block that owns one (0 at the root)
    pub fn nearest_scope_id(&self) -> usize {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.scope_id)
            .unwrap_or(ScopeIdFactory::ROOT)
    }

    /// Record `name` as bound in the innermost scope-owning block
    ///
    /// Names bound at the root are never unbound.
    pub fn declare_local(&mut self, name: impl Into<String>) {
        if let Some(frame) = self
            .frames
            .iter_mut()
            .skip(1)
            .rev()
            .find(|frame| frame.scope_id.is_some())
        {
            let name = name.into();
            if !frame.locals.contains(&name) {
                frame.locals.push(name);
            }
        }
    }

    /// Number of open frames, including the root
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Finish the build; every block must have been closed
    pub fn into_document(mut self) -> Result<Document, InternalError> {
        if self.frames.len() != 1 {
            let open = self
                .frames
                .iter()
                .filter_map(|frame| frame.node.as_ref().map(|node| node.label()))
                .collect();
            return Err(InternalError::UnbalancedBuildStack { open });
        }

        let children = self
            .frames
            .pop()
            .map(|frame| frame.children)
            .unwrap_or_default();
        Ok(Document::new(children))
    }
}

impl Default for BuildStack {
    fn default() -> Self {
        Self::new()
    }
}

//! Lexer block stack
//!
//! Tracks which blocks are open while tags are classified, so closing tags can be
//! matched against the innermost opener. Entries only live for one lex; the assembler
//! keeps its own stack with scope ids.

/// What opened a block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    If,
    IfNot,
    Else,
    Each,
    While,
    Do,
    Repeat,
    Declare,
    /// `{{#path}}` and `{{^path}}`, closed by `{{/path}}` (or `{{/alias}}`)
    Scope,
    /// A block opened by a custom tag provider
    Custom(String),
}

impl BlockKind {
    /// Name used in diagnostics for this kind of block
    pub fn keyword(&self) -> &str {
        match self {
            BlockKind::If | BlockKind::IfNot => "if",
            BlockKind::Else => "else",
            BlockKind::Each => "each",
            BlockKind::While => "while",
            BlockKind::Do => "do",
            BlockKind::Repeat => "repeat",
            BlockKind::Declare => "declare",
            BlockKind::Scope => "scope",
            BlockKind::Custom(tag) => tag,
        }
    }
}

/// An open block: its kind and the name a generic close has to repeat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLabel {
    pub kind: BlockKind,
    /// Alias if one was given, otherwise the expression text or partial name
    pub name: String,
}

impl ScopeLabel {
    pub fn new(kind: BlockKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Text naming this block in an unclosed-scope diagnostic
    pub fn reported_name(&self) -> &str {
        match self.kind {
            BlockKind::Scope => &self.name,
            _ => self.kind.keyword(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    pub label: ScopeLabel,
    /// Byte offset of the opening tag
    pub offset: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    entries: Vec<ScopeEntry>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: BlockKind, name: impl Into<String>, offset: usize) {
        let label = ScopeLabel::new(kind, name);
        tracing::trace!(kind = ?label.kind, name = %label.name, offset, "open block");
        self.entries.push(ScopeEntry { label, offset });
    }

    pub fn peek(&self) -> Option<&ScopeEntry> {
        self.entries.last()
    }

    /// Pop the innermost entry if `matches` accepts it
    pub fn pop_if(&mut self, matches: impl FnOnce(&ScopeLabel) -> bool) -> Option<ScopeEntry> {
        if self.peek().is_some_and(|entry| matches(&entry.label)) {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Pop the innermost entry if it is of `kind`
    pub fn pop_kind(&mut self, kind: &BlockKind) -> Option<ScopeEntry> {
        self.pop_if(|label| &label.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every remaining entry, innermost first
    pub fn drain_unclosed(&mut self) -> Vec<ScopeEntry> {
        let mut entries = std::mem::take(&mut self.entries);
        entries.reverse();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_kind_only_matches_innermost() {
        let mut stack = ScopeStack::new();
        stack.push(BlockKind::Each, "items", 0);
        stack.push(BlockKind::If, "a", 10);

        assert!(stack.pop_kind(&BlockKind::Each).is_none());
        assert_eq!(stack.pop_kind(&BlockKind::If).map(|e| e.offset), Some(10));
        assert_eq!(stack.pop_kind(&BlockKind::Each).map(|e| e.offset), Some(0));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_drain_unclosed_is_innermost_first() {
        let mut stack = ScopeStack::new();
        stack.push(BlockKind::Each, "items", 0);
        stack.push(BlockKind::Scope, "person", 5);

        let names: Vec<String> = stack
            .drain_unclosed()
            .iter()
            .map(|e| e.label.reported_name().to_string())
            .collect();
        assert_eq!(names, vec!["person", "each"]);
        assert!(stack.is_empty());
    }
}

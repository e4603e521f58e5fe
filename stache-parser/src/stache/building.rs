//! Tree assembler
//!
//!     Turns the lexer's token list into a [`Document`](crate::stache::ast::Document). The
//!     lexer has already checked that blocks are balanced, so the assembler is a single
//!     pass over the tokens with an explicit [`BuildStack`]:
//!
//!         block open     new frame with a fresh scope id, node kept until it closes
//!         block close    frame popped, `Unbind` nodes appended, node added to its parent
//!         anything else  a leaf appended to the innermost open block
//!
//!     Scope ids come from one [`ScopeIdFactory`] per parse. A `var` binding is always
//!     bound to the root scope; a `let` binding and an alias belong to the innermost
//!     scope-owning block and are unbound when it closes.

pub mod assembler;
pub mod stack;

pub use assembler::assemble;
pub use stack::{BuildStack, ScopeIdFactory};

//! Core token types and helpers shared across the lexer, assembler, and tooling.

pub mod core;
pub mod formatting;

pub use core::{ScopeBehavior, Token, TokenKind};
pub use formatting::{detokenize, ToTemplateString};

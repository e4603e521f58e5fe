//! Main module for stache library functionality

pub mod ast;
pub mod building;
pub mod custom;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod options;
pub mod parsing;
pub mod pipeline;
pub mod testing;
pub mod token;

pub use ast::{
    Diagnostic, DiagnosticKind, Document, DocumentNode, Expression, InternalError, ScopeKind,
    SourcePosition,
};
pub use custom::{BlockTagProvider, SimpleTagProvider};
pub use loader::{LoaderError, TemplateLoader};
pub use options::{ParserOptions, PartialRegistry, TagInfo, TagProvider};
pub use pipeline::{parse, tokenize, validate, validate_with, ParseOutput, TokenizeOutput};
pub use token::{Token, TokenKind};

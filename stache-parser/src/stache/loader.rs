//! Template loading utilities
//!
//! This module provides `TemplateLoader` - a utility for loading template text from files
//! or strings and running the pipeline on it. It is used by the CLI and by tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use stache_parser::stache::loader::TemplateLoader;
//!
//! // From file
//! let loader = TemplateLoader::from_path("page.stache").unwrap();
//! let output = loader.parse().unwrap();
//!
//! // From string
//! let loader = TemplateLoader::from_string("Hello {{name}}");
//! let diagnostics = loader.validate().unwrap();
//! ```

use crate::stache::ast::{Diagnostic, InternalError};
use crate::stache::options::ParserOptions;
use crate::stache::pipeline::{self, ParseOutput, TokenizeOutput};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error that can occur when loading templates
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Template loader with pipeline shortcuts
pub struct TemplateLoader {
    source: String,
    options: ParserOptions,
}

impl TemplateLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let source = fs::read_to_string(path)?;
        Ok(Self::from_string(source))
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        TemplateLoader {
            source: source.into(),
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parse(&self) -> Result<ParseOutput, LoaderError> {
        Ok(pipeline::parse(&self.source, &self.options)?)
    }

    pub fn validate(&self) -> Result<Vec<Diagnostic>, LoaderError> {
        Ok(pipeline::validate_with(&self.source, &self.options)?)
    }

    pub fn tokenize(&self) -> Result<TokenizeOutput, LoaderError> {
        Ok(pipeline::tokenize(&self.source, &self.options)?)
    }
}

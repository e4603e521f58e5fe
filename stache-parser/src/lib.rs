//! # stache
//!
//! Front end for the stache template language: turns template text into an immutable
//! document tree.
//!
//! File Layout
//!
//! The crate follows the order in which a template is processed:
//!
//! src/stache
//!   ├── lexing      Tag spans, tag classification, block-label validation
//!   ├── parsing     The expression parser used for every tag body
//!   ├── building    The tree assembler turning tokens into a document
//!   ├── ast         Expression and document trees, positions, diagnostics
//!   ├── token       Token types and detokenizing
//!   ├── options     Parser options, partial registry, custom tag providers
//!   ├── custom      Ready-made custom tag providers
//!   ├── pipeline    parse / validate / tokenize entry points
//!   ├── loader      Reading templates from files
//!   ├── formats     Treeviz, JSON and YAML output
//!   └── testing     Assertion helpers for tests
//!
//! The public entry points are [`stache::parse`], [`stache::validate`] and
//! [`stache::tokenize`]. For tests, see the [testing module](stache::testing).

pub mod stache;

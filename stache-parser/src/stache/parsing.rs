//! Expression parsing
//!
//!     Tag bodies that carry an expression (value prints, block conditions, `let`/`var`
//!     assignments, the context of an include) are handed here by the lexer with their
//!     absolute offset, so diagnostics point into the template rather than the body.
//!
//!         expression.rs   the frame-stack parser
//!         path.rs         path accumulation and segment compilation
//!         literals.rs     number and string scanners

pub mod expression;
pub mod literals;
pub mod path;

pub use expression::{parse_expression, parse_standalone};
pub use path::PathBuilder;

//! Lexer
//!
//!     The lexer scans a whole template once and produces an ordered token list plus
//!     diagnostics. It never stops at a user mistake: a malformed tag is reported and
//!     scanning continues with the next one, so independent problems surface together.
//!
//! The Lexing Pass
//!
//!     1. Tag spans. Every `{{body}}` / `{{{body}}}` is located, see [spans]. Text between
//!        spans becomes `Content` tokens verbatim.
//!
//!     2. Classification. Each span is cut into sigil, keyword and payload (see [tags]) and
//!        matched against the keyword table in a fixed order. Keywords are matched
//!        ignoring ASCII case and must be followed by whitespace or the end of the tag, so
//!        `{{#eachItem}}` is a generic scope named `eachItem`. Unmatched `#`, `/` and bare
//!        tags are first offered to the custom tag providers.
//!
//!     3. Block matching. Opening tags push a label on the [scopes::ScopeStack]; closing
//!        tags must find their label on top. Labels still open at the end are reported
//!        innermost first.
//!
//!     4. Expressions. Bodies that carry an expression are parsed by
//!        [crate::stache::parsing], whose diagnostics merge into the same list.
//!
//!     A single internal check guards the pass: the cursor must never move past the end
//!     of the tag being processed. Breaking it is an [InternalError], not a diagnostic.
//!
//! [InternalError]: crate::stache::ast::InternalError

pub mod classify;
pub mod scopes;
pub mod spans;
pub mod tags;
pub mod tokenizer;

pub use scopes::{BlockKind, ScopeEntry, ScopeLabel, ScopeStack};
pub use spans::{find_tags, TagSpan};
pub use tokenizer::{tokenize, Lexed};

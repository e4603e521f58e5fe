//! Detokenizer for templates
//!
//! Converts a stream of tokens back into source text. Useful for:
//!
//! - Round-trip testing (source -> tokens -> source)
//! - Debugging and visualization of token streams

use super::core::Token;

/// Trait for converting a token back to the template text it came from
pub trait ToTemplateString {
    fn to_template_string(&self) -> String;
}

impl ToTemplateString for Token {
    fn to_template_string(&self) -> String {
        // Secondary tokens (aliases, the else half of #ifelse) have empty raw text
        self.raw.clone()
    }
}

/// Detokenize a stream of tokens into a string
///
/// For tokens produced by a clean lex this reproduces the template exactly.
pub fn detokenize(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.to_template_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stache::ast::SourcePosition;
    use crate::stache::token::TokenKind;

    #[test]
    fn test_detokenize_skips_secondary_tokens() {
        let position = SourcePosition::default();
        let tokens = vec![
            Token::new(TokenKind::CollectionOpen, "{{#each xs AS x}}", "xs", 0..17, position),
            Token::new(TokenKind::Alias, "", "x", 14..15, position),
            Token::new(TokenKind::CollectionClose, "{{/each}}", "#eachx", 17..26, position),
        ];
        assert_eq!(detokenize(&tokens), "{{#each xs AS x}}{{/each}}");
    }
}

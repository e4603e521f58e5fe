//! Tag body splitting
//!
//!     Helpers that cut a tag body into the pieces the tokenizer classifies on. They
//!     never raise diagnostics; they return what they found and leave the decision to
//!     the caller. Offsets are byte offsets relative to the string passed in.

use super::classify::{is_data_char, is_whitespace};
use crate::stache::token::ScopeBehavior;

/// A tag body cut into sigil, keyword and payload
///
///     {{#each items AS item}}  ->  sigil '#', keyword "each", rest " items AS item"
///     {{#eachItem}}            ->  sigil '#', no keyword,     rest "eachItem"
///     {{name}}                 ->  no sigil,  no keyword,     rest "name"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagParts<'a> {
    pub sigil: Option<char>,
    pub keyword: Option<&'a str>,
    pub rest: &'a str,
    /// Offset of `rest` within the body
    pub rest_offset: usize,
}

impl TagParts<'_> {
    /// Case-insensitive keyword comparison
    pub fn is(&self, sigil: char, keyword: &str) -> bool {
        self.sigil == Some(sigil)
            && self
                .keyword
                .is_some_and(|k| k.eq_ignore_ascii_case(keyword))
    }
}

/// Split a tag body. A keyword is a run of ASCII letters right after the sigil that is
/// followed by whitespace or the end of the body.
pub fn split_tag(body: &str) -> TagParts<'_> {
    let sigil = body
        .chars()
        .next()
        .filter(|c| matches!(c, '#' | '^' | '/' | '&' | '!'));
    let after_sigil = sigil.map_or(0, char::len_utf8);
    let tail = &body[after_sigil..];

    let word_len = tail
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    let at_boundary = tail[word_len..]
        .chars()
        .next()
        .map_or(true, is_whitespace);

    if sigil.is_some() && word_len > 0 && at_boundary {
        TagParts {
            sigil,
            keyword: Some(&tail[..word_len]),
            rest: &tail[word_len..],
            rest_offset: after_sigil + word_len,
        }
    } else {
        TagParts {
            sigil,
            keyword: None,
            rest: tail,
            rest_offset: after_sigil,
        }
    }
}

/// A trimmed payload and where it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trimmed<'a> {
    pub text: &'a str,
    pub offset: usize,
}

/// Trim whitespace from both ends, keeping track of the start offset
pub fn trim_with_offset(text: &str, offset: usize) -> Trimmed<'_> {
    let start = text.len() - text.trim_start_matches(is_whitespace).len();
    Trimmed {
        text: text[start..].trim_end_matches(is_whitespace),
        offset: offset + start,
    }
}

/// Result of looking for a trailing `AS name`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasSplit<'a> {
    /// Text before the alias clause, trimmed
    pub head: &'a str,
    pub alias: Option<&'a str>,
    /// Offset of the alias name within the input
    pub alias_offset: usize,
}

/// Split a trailing `<ws>AS<ws>name` (any case of `AS`, name made of ASCII letters)
pub fn split_alias(text: &str) -> AliasSplit<'_> {
    let none = AliasSplit {
        head: text,
        alias: None,
        alias_offset: 0,
    };

    let name_len = text
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    if name_len == 0 {
        return none;
    }
    let name_start = text.len() - name_len;

    let before_name = &text[..name_start];
    let keyword = before_name.trim_end_matches(is_whitespace);
    if keyword.len() == before_name.len() || keyword.len() < 2 {
        return none;
    }
    let keyword_start = keyword.len() - 2;
    if !keyword.is_char_boundary(keyword_start)
        || !keyword[keyword_start..].eq_ignore_ascii_case("as")
    {
        return none;
    }

    let head = &keyword[..keyword_start];
    let trimmed_head = head.trim_end_matches(is_whitespace);
    if trimmed_head.len() == head.len() {
        return none;
    }

    AliasSplit {
        head: trimmed_head,
        alias: Some(&text[name_start..]),
        alias_offset: name_start,
    }
}

/// Strip a trailing ` NoScope` / ` WithScope` modifier from an aliased each expression
pub fn split_scope_behavior(text: &str) -> (&str, Option<ScopeBehavior>) {
    for (word, behavior) in [
        ("noscope", ScopeBehavior::DoNotScope),
        ("withscope", ScopeBehavior::ScopeAnyway),
    ] {
        if text.len() <= word.len() {
            continue;
        }
        let split = text.len() - word.len();
        if !text.is_char_boundary(split) || !text[split..].eq_ignore_ascii_case(word) {
            continue;
        }
        let head = &text[..split];
        let trimmed = head.trim_end_matches(is_whitespace);
        if trimmed.len() < head.len() {
            return (trimmed, Some(behavior));
        }
    }
    (text, None)
}

/// The pieces of `{{#include Name With expr}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeParts<'a> {
    pub name: &'a str,
    /// Context expression after `With`, trimmed
    pub context: Option<Trimmed<'a>>,
    /// Anything after the name that is not a `With` clause
    pub trailing: Option<&'a str>,
}

/// Split the payload after `include`; `offset` is the payload's position in the body
pub fn split_include(payload: &str, offset: usize) -> IncludeParts<'_> {
    let payload = trim_with_offset(payload, offset);
    let name_len: usize = payload
        .text
        .chars()
        .take_while(|c| is_data_char(*c))
        .map(char::len_utf8)
        .sum();
    let name = &payload.text[..name_len];
    let after = &payload.text[name_len..];

    if after.is_empty() {
        return IncludeParts {
            name,
            context: None,
            trailing: None,
        };
    }

    let after_ws = after.trim_start_matches(is_whitespace);
    let has_gap = after_ws.len() < after.len();
    let with_len = 4;
    let is_with = has_gap
        && after_ws.len() >= with_len
        && after_ws.is_char_boundary(with_len)
        && after_ws[..with_len].eq_ignore_ascii_case("with")
        && after_ws[with_len..].starts_with(is_whitespace);

    if is_with {
        let context_start = payload.text.len() - after_ws.len() + with_len;
        let context = trim_with_offset(
            &payload.text[context_start..],
            payload.offset + context_start,
        );
        IncludeParts {
            name,
            context: (!context.text.is_empty()).then_some(context),
            trailing: None,
        }
    } else {
        IncludeParts {
            name,
            context: None,
            trailing: Some(after.trim()),
        }
    }
}

/// Problems with a `name = expr` assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentError {
    MissingName,
    MissingEquals,
    MissingExpression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub name: &'a str,
    pub expression: Trimmed<'a>,
}

/// Split `name = expr`; `offset` is the payload's position in the body
pub fn split_assignment(payload: &str, offset: usize) -> Result<Assignment<'_>, AssignmentError> {
    let payload = trim_with_offset(payload, offset);
    let name_len: usize = payload
        .text
        .chars()
        .take_while(|c| is_data_char(*c))
        .map(char::len_utf8)
        .sum();
    if name_len == 0 {
        return Err(AssignmentError::MissingName);
    }

    let after = &payload.text[name_len..];
    let after_ws = after.trim_start_matches(is_whitespace);
    let Some(expression_text) = after_ws.strip_prefix('=') else {
        return Err(AssignmentError::MissingEquals);
    };

    let expression_start = payload.text.len() - expression_text.len();
    let expression = trim_with_offset(expression_text, payload.offset + expression_start);
    if expression.text.is_empty() {
        return Err(AssignmentError::MissingExpression);
    }

    Ok(Assignment {
        name: &payload.text[..name_len],
        expression,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#each items", Some('#'), Some("each"), " items")]
    #[case("#eachItem", Some('#'), Some("eachItem"), "")]
    #[case("#each.item", Some('#'), None, "each.item")]
    #[case("/each", Some('/'), Some("each"), "")]
    #[case("#IF a", Some('#'), Some("IF"), " a")]
    #[case("name", None, None, "name")]
    #[case("&name", Some('&'), Some("name"), "")]
    #[case("! note", Some('!'), None, " note")]
    #[case("#a.b", Some('#'), None, "a.b")]
    fn test_split_tag(
        #[case] body: &str,
        #[case] sigil: Option<char>,
        #[case] keyword: Option<&str>,
        #[case] rest: &str,
    ) {
        let parts = split_tag(body);
        assert_eq!(parts.sigil, sigil);
        assert_eq!(parts.keyword, keyword);
        assert_eq!(parts.rest, rest);
        assert_eq!(&body[parts.rest_offset..], rest);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert!(split_tag("#Each xs").is('#', "each"));
        assert!(!split_tag("#each xs").is('/', "each"));
    }

    #[rstest]
    #[case("items AS item", "items", Some("item"))]
    #[case("items as item", "items", Some("item"))]
    #[case("items  aS   item", "items", Some("item"))]
    #[case("items", "items", None)]
    #[case("itemsAS item", "itemsAS item", None)]
    #[case("items AS item2", "items AS item2", None)]
    #[case("AS item", "AS item", None)]
    fn test_split_alias(#[case] text: &str, #[case] head: &str, #[case] alias: Option<&str>) {
        let split = split_alias(text);
        assert_eq!(split.head, head);
        assert_eq!(split.alias, alias);
        if let Some(alias) = alias {
            assert_eq!(&text[split.alias_offset..], alias);
        }
    }

    #[test]
    fn test_split_scope_behavior() {
        assert_eq!(
            split_scope_behavior("items NoScope"),
            ("items", Some(ScopeBehavior::DoNotScope))
        );
        assert_eq!(
            split_scope_behavior("items withscope"),
            ("items", Some(ScopeBehavior::ScopeAnyway))
        );
        assert_eq!(split_scope_behavior("itemsNoScope"), ("itemsNoScope", None));
    }

    #[test]
    fn test_split_include() {
        let parts = split_include(" Card With person.card", 8);
        assert_eq!(parts.name, "Card");
        let context = parts.context.unwrap();
        assert_eq!(context.text, "person.card");
        assert_eq!(context.offset, 8 + " Card With ".len());

        let parts = split_include(" Card", 0);
        assert_eq!(parts.name, "Card");
        assert!(parts.context.is_none());
        assert!(parts.trailing.is_none());

        let parts = split_include(" Card junk", 0);
        assert_eq!(parts.trailing, Some("junk"));
    }

    #[test]
    fn test_split_assignment() {
        let assignment = split_assignment(" total = a + 1", 4).unwrap();
        assert_eq!(assignment.name, "total");
        assert_eq!(assignment.expression.text, "a + 1");
        assert_eq!(assignment.expression.offset, 4 + " total = ".len());

        assert_eq!(split_assignment(" = 1", 0), Err(AssignmentError::MissingName));
        assert_eq!(split_assignment(" x 1", 0), Err(AssignmentError::MissingEquals));
        assert_eq!(split_assignment(" x = ", 0), Err(AssignmentError::MissingExpression));
    }

    #[test]
    fn test_trim_with_offset() {
        let trimmed = trim_with_offset("  abc \n", 10);
        assert_eq!(trimmed.text, "abc");
        assert_eq!(trimmed.offset, 12);
    }
}

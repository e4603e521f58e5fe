//! Tag span scanner
//!
//!     Finds every `{{body}}` and `{{{body}}}` in a template, left to right. A body is one
//!     or more characters that are not braces. At each `{` the double form is tried first,
//!     then the triple form; if neither closes, scanning resumes one byte later, so
//!     `{{{{a}}` yields the tag `{{a}}` preceded by two bytes of content.
//!
//!     Braces are ASCII, so the scan works on bytes without splitting UTF-8 sequences.

use std::ops::Range;

/// Location of one tag in the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpan {
    pub start: usize,
    pub end: usize,
    /// Number of braces on each side, 2 or 3
    pub braces: usize,
}

impl TagSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Range of the text between the braces
    pub fn body(&self) -> Range<usize> {
        self.start + self.braces..self.end - self.braces
    }

    pub fn is_triple(&self) -> bool {
        self.braces == 3
    }
}

/// Iterator over the tag spans of a template
pub struct TagSpans<'src> {
    bytes: &'src [u8],
    cursor: usize,
}

impl<'src> TagSpans<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            bytes: source.as_bytes(),
            cursor: 0,
        }
    }

    fn match_at(&self, start: usize) -> Option<TagSpan> {
        [2, 3]
            .into_iter()
            .find_map(|braces| self.match_with(start, braces))
    }

    fn match_with(&self, start: usize, braces: usize) -> Option<TagSpan> {
        let bytes = self.bytes;
        let open = bytes.get(start..start + braces)?;
        if !open.iter().all(|b| *b == b'{') {
            return None;
        }

        let body_start = start + braces;
        let body_len = bytes[body_start..]
            .iter()
            .take_while(|b| **b != b'{' && **b != b'}')
            .count();
        if body_len == 0 {
            return None;
        }

        let close_start = body_start + body_len;
        let close = bytes.get(close_start..close_start + braces)?;
        if !close.iter().all(|b| *b == b'}') {
            return None;
        }

        Some(TagSpan {
            start,
            end: close_start + braces,
            braces,
        })
    }
}

impl Iterator for TagSpans<'_> {
    type Item = TagSpan;

    fn next(&mut self) -> Option<TagSpan> {
        while self.cursor < self.bytes.len() {
            let offset = self.bytes[self.cursor..].iter().position(|b| *b == b'{')?;
            let start = self.cursor + offset;
            match self.match_at(start) {
                Some(span) => {
                    self.cursor = span.end;
                    return Some(span);
                }
                None => self.cursor = start + 1,
            }
        }
        None
    }
}

/// Collect every tag span in `source`
pub fn find_tags(source: &str) -> Vec<TagSpan> {
    TagSpans::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_texts(source: &str) -> Vec<&str> {
        find_tags(source)
            .into_iter()
            .map(|span| &source[span.range()])
            .collect()
    }

    #[test]
    fn test_double_and_triple() {
        assert_eq!(
            tag_texts("Hello {{name}} and {{{raw}}}!"),
            vec!["{{name}}", "{{{raw}}}"]
        );
    }

    #[test]
    fn test_body_may_not_contain_braces() {
        assert_eq!(tag_texts("{{a{b}}"), vec![] as Vec<&str>);
        assert_eq!(tag_texts("{{}}"), vec![] as Vec<&str>);
    }

    #[test]
    fn test_resumes_after_failed_open() {
        let source = "{{{{a}}";
        let spans = find_tags(source);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 2);
        assert_eq!(&source[spans[0].body()], "a");
    }

    #[test]
    fn test_extra_closing_brace_is_content() {
        let source = "{{a}}}";
        let spans = find_tags(source);
        assert_eq!(spans, vec![TagSpan { start: 0, end: 5, braces: 2 }]);
    }

    #[test]
    fn test_multibyte_content() {
        assert_eq!(tag_texts("über {{x}} ünd"), vec!["{{x}}"]);
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(tag_texts("{{a"), vec![] as Vec<&str>);
        assert_eq!(tag_texts("{{a}"), vec![] as Vec<&str>);
    }
}

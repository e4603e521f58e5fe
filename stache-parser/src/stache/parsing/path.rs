//! Path accumulation
//!
//!     Path characters are pushed one at a time while the expression parser walks a tag
//!     body. Once the path ends it is compiled into segments:
//!
//!         a.b.c        Data a, Data b, Data c
//!         ~a           Root, Data a
//!         ../../a      Parent, Parent, Data a
//!         $.a          Parent, Data a
//!         .  or  ?     Current
//!
//!     When the path is followed by `(`, the last data segment is taken as the formatter
//!     name instead.

use crate::stache::ast::{PathKind, PathSegment};
use crate::stache::lexing::classify::is_data_char;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathBuilder {
    text: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `/` only belongs to a path directly after `..`; anywhere else it is an operator
    pub fn accepts_slash(&self) -> bool {
        self.text.ends_with("..")
    }

    fn at_segment_start(&self) -> bool {
        self.text.is_empty() || self.text.ends_with(['.', '/', '~'])
    }

    pub fn push(&mut self, c: char) -> Result<(), String> {
        match c {
            '~' if !self.text.is_empty() => {
                return Err("'~' is only allowed at the start of a path".to_string())
            }
            '/' if !self.accepts_slash() => {
                return Err("'/' is only allowed after '..'".to_string())
            }
            '$' | '?' if !self.at_segment_start() => {
                return Err(format!("'{}' must stand alone as a path segment", c))
            }
            c if is_data_char(c) && self.text.ends_with(['$', '?']) => {
                return Err("expected '.' after a context selector".to_string())
            }
            _ => {}
        }
        self.text.push(c);
        Ok(())
    }

    /// Compile the accumulated text into path segments
    pub fn compile(&self) -> Result<Vec<PathSegment>, String> {
        compile_path(&self.text)
    }

    /// Compile the text before a `(`: the last segment names the formatter
    pub fn compile_call(&self) -> Result<(Vec<PathSegment>, String), String> {
        let text = self.text.as_str();
        let split = text.rfind(['.', '/', '~']);

        let (head, formatter) = match split {
            None => ("", text),
            Some(index) if text[index..].starts_with('.') => (&text[..index], &text[index + 1..]),
            // keep the `~` or drop the `/` of `../`
            Some(index) if text[index..].starts_with('~') => (&text[..=index], &text[index + 1..]),
            Some(index) => (&text[..index], &text[index + 1..]),
        };

        if formatter.is_empty() {
            return Err("expected the name of a formatter before '('".to_string());
        }
        if !formatter.chars().all(is_data_char) {
            return Err(format!("'{}' is not a valid formatter name", formatter));
        }

        let segments = if head.is_empty() {
            Vec::new()
        } else {
            compile_path(head)?
        };
        Ok((segments, formatter.to_string()))
    }
}

fn compile_path(text: &str) -> Result<Vec<PathSegment>, String> {
    if text.is_empty() {
        return Err("empty path".to_string());
    }
    if text == "." || text == "?" {
        return Ok(vec![PathSegment::marker(text, PathKind::Current)]);
    }

    let mut segments = Vec::new();
    let mut rest = text;

    if let Some(tail) = rest.strip_prefix('~') {
        segments.push(PathSegment::marker("~", PathKind::Root));
        rest = tail.strip_prefix('.').unwrap_or(tail);
    }

    loop {
        if let Some(tail) = rest.strip_prefix("../") {
            segments.push(PathSegment::marker("..", PathKind::Parent));
            rest = tail;
        } else if rest == ".." {
            segments.push(PathSegment::marker("..", PathKind::Parent));
            rest = "";
        } else {
            break;
        }
    }

    if segments.is_empty() {
        if let Some(tail) = rest.strip_prefix('.') {
            rest = tail;
        }
    }

    if rest.is_empty() {
        return if segments.is_empty() {
            Err("empty path".to_string())
        } else {
            Ok(segments)
        };
    }

    for part in rest.split('.') {
        let segment = match part {
            "" => return Err(format!("empty segment in path '{}'", text)),
            "$" => PathSegment::marker("$", PathKind::Parent),
            "?" => PathSegment::marker("?", PathKind::Current),
            part if part.chars().all(is_data_char) => PathSegment::data(part),
            part => return Err(format!("invalid path segment '{}'", part)),
        };
        segments.push(segment);
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn build(text: &str) -> PathBuilder {
        let mut builder = PathBuilder::new();
        for c in text.chars() {
            builder.push(c).unwrap();
        }
        builder
    }

    fn kinds(segments: &[PathSegment]) -> Vec<(String, PathKind)> {
        segments.iter().map(|s| (s.name.clone(), s.kind)).collect()
    }

    #[rstest]
    #[case("a.b.c", vec![("a", PathKind::Data), ("b", PathKind::Data), ("c", PathKind::Data)])]
    #[case("~a", vec![("~", PathKind::Root), ("a", PathKind::Data)])]
    #[case("~", vec![("~", PathKind::Root)])]
    #[case("../../a", vec![("..", PathKind::Parent), ("..", PathKind::Parent), ("a", PathKind::Data)])]
    #[case("$.a", vec![("$", PathKind::Parent), ("a", PathKind::Data)])]
    #[case(".", vec![(".", PathKind::Current)])]
    #[case("?", vec![("?", PathKind::Current)])]
    #[case(".a", vec![("a", PathKind::Data)])]
    fn test_compile(#[case] text: &str, #[case] expected: Vec<(&str, PathKind)>) {
        let segments = build(text).compile().unwrap();
        let expected: Vec<(String, PathKind)> = expected
            .into_iter()
            .map(|(n, k)| (n.to_string(), k))
            .collect();
        assert_eq!(kinds(&segments), expected);
    }

    #[rstest]
    #[case("a.")]
    #[case("a..b")]
    fn test_compile_rejects_empty_segments(#[case] text: &str) {
        assert!(build(text).compile().is_err());
    }

    #[test]
    fn test_push_rejections() {
        let mut builder = build("a");
        assert!(builder.push('~').is_err());
        assert!(builder.push('/').is_err());
        assert!(builder.push('$').is_err());

        let mut builder = build("$");
        assert!(builder.push('a').is_err());
        assert!(build("..").accepts_slash());
    }

    #[test]
    fn test_compile_call() {
        let (segments, formatter) = build("a.b").compile_call().unwrap();
        assert_eq!(kinds(&segments), vec![("a".to_string(), PathKind::Data)]);
        assert_eq!(formatter, "b");

        let (segments, formatter) = build("f").compile_call().unwrap();
        assert!(segments.is_empty());
        assert_eq!(formatter, "f");

        let (segments, formatter) = build("../f").compile_call().unwrap();
        assert_eq!(kinds(&segments), vec![("..".to_string(), PathKind::Parent)]);
        assert_eq!(formatter, "f");

        let (segments, _) = build("~f").compile_call().unwrap();
        assert_eq!(kinds(&segments), vec![("~".to_string(), PathKind::Root)]);
    }

    #[test]
    fn test_compile_call_needs_a_name() {
        assert!(build(".").compile_call().is_err());
        assert!(build("a.").compile_call().is_err());
        assert!(PathBuilder::new().compile_call().is_err());
    }
}

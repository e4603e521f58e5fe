//! Expression parser
//!
//!     Turns one tag body into an [`Expression`]. Bodies that are a plain dotted path (no
//!     `(`, no operator character, no leading quote) take a fast path straight through a
//!     [`PathBuilder`]. Everything else runs through an explicit-stack state machine.
//!
//! The Machine
//!
//!     Nodes live in an arena and are addressed by index. Node 0 is the root list that
//!     collects top-level follow-up expressions. Every node under construction is attached
//!     to its parent through a [`Slot`]: an owner node plus a position, where the position
//!     is an argument index for a formatter call, an item index for a list, and 0/1 for the
//!     left/right operand of an operator. Rewriting a parent link is therefore a single
//!     slot replacement.
//!
//!     The frame stack holds two kinds of frames:
//!
//!         ArgumentStart   about to read one optionally `[named]` formatter argument
//!         Expression      filling a slot; its stage says how far it got:
//!                             Operand     waiting for the first character of an operand
//!                             Path        accumulating path characters
//!                             Arguments   a formatter call whose arguments are open
//!                             Finished    a complete operand, waiting for `.`, `,`, `)`
//!                                         or an operator
//!
//!     A finished operand followed by:
//!
//!         `.`         starts a follow-up. If the slot owner is already a list the next
//!                     item is appended, otherwise the operand is promoted in place to a
//!                     one-item list and the follow-up becomes its second item.
//!         `,` / `)`   ends the argument. The frame is popped and the character is handled
//!                     again by the frame below, which ends up at the call's `Arguments`
//!                     stage. At the top level both are errors.
//!         operator    if the frame is itself the right operand of an operator it is popped
//!                     and the operator is handled by the frame below. Otherwise the operand
//!                     becomes the left side of a new operator node that replaces it in its
//!                     slot, and a frame for the right operand is pushed.
//!
//!     The operator rule gives strict left-to-right evaluation with no precedence between
//!     distinct operators: `1 + 2 * 3` is `(1 + 2) * 3`.

use super::literals::{scan_number, scan_string};
use super::path::PathBuilder;
use crate::stache::ast::{
    Argument, Diagnostic, DiagnosticSink, Expression, ExpressionList, NumberLiteral, Operator,
    OperatorExpression, PathExpression, PathSegment, StringLiteral,
};
use crate::stache::lexing::classify::{
    is_argument_terminator, is_data_char, is_digit, is_operator_char, is_path_char,
    is_path_start_char, is_string_delimiter, is_whitespace,
};
use crate::stache::lexing::tags::trim_with_offset;

type NodeId = usize;

const ROOT: NodeId = 0;

/// Parse `text`, whose first byte sits at absolute offset `origin` in the template
///
/// On failure the first problem is reported to `sink` and `None` is returned.
pub fn parse_expression(
    text: &str,
    origin: usize,
    sink: &mut DiagnosticSink<'_>,
) -> Option<Expression> {
    let body = trim_with_offset(text, origin);
    if body.text.is_empty() {
        sink.push_at(
            origin,
            Diagnostic::invalid_path(text).expected("an expression"),
        );
        return None;
    }

    let result = if is_simple_path(body.text) {
        tracing::trace!(expression = body.text, "fast path");
        parse_simple(body.text)
    } else {
        tracing::trace!(expression = body.text, "general path");
        Machine::new(body.text).run()
    };

    match result {
        Ok(expression) => Some(expression),
        Err(error) => {
            sink.push_at(body.offset + error.offset, error.diagnostic);
            None
        }
    }
}

/// Parse an expression on its own, outside of any template
pub fn parse_standalone(text: &str) -> Result<Expression, Vec<Diagnostic>> {
    let mut sink = DiagnosticSink::new(text);
    match parse_expression(text, 0, &mut sink) {
        Some(expression) if sink.is_empty() => Ok(expression),
        _ => Err(sink.into_vec()),
    }
}

fn is_simple_path(text: &str) -> bool {
    !text.contains('(')
        && !text.chars().any(is_operator_char)
        && !text.starts_with(is_string_delimiter)
}

fn parse_simple(text: &str) -> Result<Expression, ParseError> {
    if text.starts_with(is_digit) {
        let (number, end) =
            scan_number(text, 0).map_err(|message| ParseError::syntax(0, message, text))?;
        if end == text.len() {
            return Ok(Expression::Number(number));
        }
        // `1.x` is a follow-up on a literal
        return Machine::new(text).run();
    }

    let mut builder = PathBuilder::new();
    for (index, c) in text.char_indices() {
        if !is_path_char(c) {
            return Err(ParseError::syntax(
                index,
                format!("unexpected '{}' in path", c),
                text,
            ));
        }
        builder
            .push(c)
            .map_err(|message| ParseError::syntax(index, message, text))?;
    }

    let segments = builder
        .compile()
        .map_err(|message| ParseError::syntax(0, message, text))?;
    Ok(Expression::Path(PathExpression {
        segments,
        ..Default::default()
    }))
}

/// A diagnostic and the offset inside the expression it belongs to
#[derive(Debug)]
struct ParseError {
    offset: usize,
    diagnostic: Diagnostic,
}

impl ParseError {
    fn syntax(offset: usize, message: impl Into<String>, text: &str) -> Self {
        Self {
            offset,
            diagnostic: Diagnostic::syntax(message).actual(text),
        }
    }

    fn expected(mut self, expected: &str) -> Self {
        self.diagnostic = self.diagnostic.expected(expected);
        self
    }
}

#[derive(Debug)]
enum Node {
    Path(PathNode),
    Number(NumberLiteral),
    String(StringLiteral),
    List(Vec<NodeId>),
    Operator {
        operator: Operator,
        left: NodeId,
        right: Option<NodeId>,
    },
}

#[derive(Debug, Default)]
struct PathNode {
    builder: PathBuilder,
    segments: Vec<PathSegment>,
    formatter: Option<String>,
    arguments: Vec<(Option<String>, NodeId)>,
    /// Offset of the first path character
    start: usize,
}

/// Where a node hangs in its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    owner: NodeId,
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Operand,
    Path(NodeId),
    Arguments(NodeId),
    Finished(NodeId),
}

#[derive(Debug, Clone)]
enum Frame {
    ArgumentStart {
        call: NodeId,
    },
    Expression {
        slot: Slot,
        /// Argument name for a `[name]value` argument
        name: Option<String>,
        stage: Stage,
    },
}

struct Machine<'t> {
    text: &'t str,
    pos: usize,
    nodes: Vec<Node>,
    frames: Vec<Frame>,
}

impl<'t> Machine<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            pos: 0,
            nodes: vec![Node::List(Vec::new())],
            frames: vec![Frame::Expression {
                slot: Slot {
                    owner: ROOT,
                    index: 0,
                },
                name: None,
                stage: Stage::Operand,
            }],
        }
    }

    fn run(mut self) -> Result<Expression, ParseError> {
        while let Some(c) = self.peek() {
            self.step(c)?;
        }
        self.finish()?;
        self.into_expression()
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn advance(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::syntax(self.pos, message, self.text)
    }

    fn step(&mut self, c: char) -> Result<(), ParseError> {
        let (slot, name, stage) = match self.frames.last() {
            Some(Frame::ArgumentStart { call }) => {
                let call = *call;
                return self.argument_start(call, c);
            }
            Some(Frame::Expression { slot, name, stage }) => (*slot, name.clone(), *stage),
            None => return Err(self.error("unexpected text after the end of the expression")),
        };

        match stage {
            Stage::Operand => self.operand(slot, name, c),
            Stage::Path(id) => self.path_char(id, c),
            Stage::Arguments(id) => self.arguments(id, c),
            Stage::Finished(id) => self.finished(slot, id, c),
        }
    }

    fn argument_start(&mut self, call: NodeId, c: char) -> Result<(), ParseError> {
        if is_whitespace(c) {
            self.advance(c);
            return Ok(());
        }

        let mut name = None;
        if c == '[' {
            let close = self.text[self.pos..]
                .find(']')
                .ok_or_else(|| self.error("argument name is missing its closing ']'"))?;
            let raw = self.text[self.pos + 1..self.pos + close].trim();
            if raw.is_empty() || !raw.chars().all(is_data_char) {
                return Err(self
                    .error(format!("'{}' is not a valid argument name", raw))
                    .expected("[name]"));
            }
            name = Some(raw.to_string());
            self.pos += close + 1;
        }

        let index = match &self.nodes[call] {
            Node::Path(path) => path.arguments.len(),
            _ => 0,
        };
        self.replace_top(Frame::Expression {
            slot: Slot { owner: call, index },
            name,
            stage: Stage::Operand,
        });
        Ok(())
    }

    fn operand(&mut self, slot: Slot, name: Option<String>, c: char) -> Result<(), ParseError> {
        if is_whitespace(c) {
            self.advance(c);
            return Ok(());
        }

        if is_string_delimiter(c) {
            let (literal, end) = scan_string(self.text, self.pos)
                .map_err(|message| self.error(message))?;
            let id = self.alloc(Node::String(literal));
            self.place(slot, id, name);
            self.pos = end;
            self.set_stage(Stage::Finished(id));
        } else if is_digit(c) {
            let (literal, end) = scan_number(self.text, self.pos)
                .map_err(|message| self.error(message))?;
            let id = self.alloc(Node::Number(literal));
            self.place(slot, id, name);
            self.pos = end;
            self.set_stage(Stage::Finished(id));
        } else if is_path_start_char(c) {
            let id = self.alloc(Node::Path(PathNode {
                start: self.pos,
                ..Default::default()
            }));
            self.place(slot, id, name);
            self.set_stage(Stage::Path(id));
        } else {
            return Err(self
                .error(format!("expected an expression but found '{}'", c))
                .expected("a path, string or number"));
        }
        Ok(())
    }

    fn path_char(&mut self, id: NodeId, c: char) -> Result<(), ParseError> {
        if c == '(' {
            return self.open_call(id);
        }

        let accepts_slash = self.path(id).is_some_and(|p| p.builder.accepts_slash());
        let ends_path = (c == '/' && !accepts_slash)
            || (c != '/' && is_operator_char(c))
            || is_whitespace(c)
            || (c != '.' && is_argument_terminator(c));
        if ends_path {
            // the terminator is handled again once the path is finished
            self.finish_path(id)?;
            self.set_stage(Stage::Finished(id));
            return Ok(());
        }

        if !is_path_char(c) {
            return Err(self.error(format!("unexpected '{}' in path", c)));
        }
        let pos = self.pos;
        let text = self.text;
        if let Some(path) = self.path_mut(id) {
            path.builder
                .push(c)
                .map_err(|message| ParseError::syntax(pos, message, text))?;
        }
        self.advance(c);
        Ok(())
    }

    fn finish_path(&mut self, id: NodeId) -> Result<(), ParseError> {
        let text = self.text;
        if let Some(path) = self.path_mut(id) {
            let start = path.start;
            path.segments = path
                .builder
                .compile()
                .map_err(|message| ParseError::syntax(start, message, text))?;
        }
        Ok(())
    }

    fn open_call(&mut self, id: NodeId) -> Result<(), ParseError> {
        let pos = self.pos;
        let text = self.text;
        if let Some(path) = self.path_mut(id) {
            let (segments, formatter) = path.builder.compile_call().map_err(|message| {
                ParseError::syntax(pos, message, text).expected("name of a formatter")
            })?;
            tracing::trace!(formatter = %formatter, "formatter call");
            path.segments = segments;
            path.formatter = Some(formatter);
        }

        self.pos += 1;
        self.set_stage(Stage::Arguments(id));
        self.skip_whitespace();
        if !matches!(self.peek(), Some(')') | None) {
            self.frames.push(Frame::ArgumentStart { call: id });
        }
        Ok(())
    }

    fn arguments(&mut self, id: NodeId, c: char) -> Result<(), ParseError> {
        match c {
            c if is_whitespace(c) => self.advance(c),
            ',' => {
                self.advance(c);
                self.frames.push(Frame::ArgumentStart { call: id });
            }
            ')' => {
                self.advance(c);
                self.set_stage(Stage::Finished(id));
            }
            _ => return Err(self.error("expected ',' or ')'").expected(")")),
        }
        Ok(())
    }

    fn finished(&mut self, slot: Slot, id: NodeId, c: char) -> Result<(), ParseError> {
        match c {
            c if is_whitespace(c) => {
                self.advance(c);
                Ok(())
            }
            '.' => {
                self.advance(c);
                self.follow_up(slot, id);
                Ok(())
            }
            c if is_argument_terminator(c) && slot.owner == ROOT => Err(if c == ')' {
                self.error("found ')' without a matching '('")
            } else {
                self.error("',' is only allowed between formatter arguments")
            }),
            c if is_argument_terminator(c) => {
                // the argument is complete; the enclosing call handles the character
                self.frames.pop();
                Ok(())
            }
            '(' if self.path(id).is_some_and(|p| p.formatter.is_some()) => Err(ParseError {
                offset: self.pos,
                diagnostic: Diagnostic::ambiguous(
                    "expected the name of a formatter but found another '('; is a '.' missing before the second formatter?",
                )
                .expected("name of a formatter")
                .actual(self.text),
            }),
            c if is_operator_char(c) => self.apply_operator(slot, id),
            _ => Err(self
                .error(format!("unexpected '{}' after a complete expression", c))
                .expected("an operator, '.', ',' or ')'")),
        }
    }

    fn follow_up(&mut self, slot: Slot, id: NodeId) {
        let next = if matches!(self.nodes[slot.owner], Node::List(_)) {
            Slot {
                owner: slot.owner,
                index: slot.index + 1,
            }
        } else {
            let list = self.alloc(Node::List(vec![id]));
            self.place(slot, list, None);
            tracing::trace!(node = id, list, "promoted to expression list");
            Slot {
                owner: list,
                index: 1,
            }
        };

        self.replace_top(Frame::Expression {
            slot: next,
            name: None,
            stage: Stage::Operand,
        });
    }

    fn apply_operator(&mut self, slot: Slot, id: NodeId) -> Result<(), ParseError> {
        let Some((operator, len)) = Operator::match_prefix(&self.text[self.pos..]) else {
            let symbol: String = self.text[self.pos..]
                .chars()
                .take_while(|c| is_operator_char(*c))
                .collect();
            return Err(self.error(format!("unknown operator '{}'", symbol)));
        };

        if matches!(self.nodes[slot.owner], Node::Operator { .. }) {
            // right operand complete; the operator's own frame takes the next one
            self.frames.pop();
            return Ok(());
        }

        let wrapped = self.alloc(Node::Operator {
            operator,
            left: id,
            right: None,
        });
        self.place(slot, wrapped, None);
        self.pos += len;
        self.set_stage(Stage::Finished(wrapped));
        tracing::trace!(operator = %operator, left = id, "operator");

        if operator.is_binary() {
            self.frames.push(Frame::Expression {
                slot: Slot {
                    owner: wrapped,
                    index: 1,
                },
                name: None,
                stage: Stage::Operand,
            });
        }
        Ok(())
    }

    /// Close a path left open by the end of input, then check nothing else is pending
    fn finish(&mut self) -> Result<(), ParseError> {
        if let Some(Frame::Expression {
            stage: Stage::Path(id),
            ..
        }) = self.frames.last()
        {
            let id = *id;
            self.finish_path(id)?;
            self.set_stage(Stage::Finished(id));
        }

        for frame in self.frames.iter().rev() {
            match frame {
                Frame::ArgumentStart { call }
                | Frame::Expression {
                    stage: Stage::Arguments(call),
                    ..
                } => {
                    let start = self.path(*call).map_or(0, |p| p.start);
                    return Err(ParseError {
                        offset: start,
                        diagnostic: Diagnostic::syntax(format!(
                            "formatter call '{}' is never closed",
                            &self.text[start..]
                        ))
                        .expected(")")
                        .actual(&self.text[start..]),
                    });
                }
                Frame::Expression {
                    stage: Stage::Operand,
                    ..
                } => {
                    return Err(ParseError::syntax(
                        self.text.len(),
                        "expected an expression before the end of the tag",
                        self.text,
                    ))
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn into_expression(mut self) -> Result<Expression, ParseError> {
        let items = match std::mem::replace(&mut self.nodes[ROOT], Node::List(Vec::new())) {
            Node::List(items) => items,
            _ => Vec::new(),
        };

        match items.as_slice() {
            [] => Err(ParseError::syntax(0, "empty expression", self.text)),
            [single] => Ok(self.build(*single)),
            _ => Ok(Expression::List(ExpressionList {
                items: items.iter().map(|id| self.build(*id)).collect(),
            })),
        }
    }

    /// Move node `id` and its descendants out of the arena
    fn build(&mut self, id: NodeId) -> Expression {
        match std::mem::replace(&mut self.nodes[id], Node::List(Vec::new())) {
            Node::Path(path) => Expression::Path(PathExpression {
                segments: path.segments,
                formatter: path.formatter,
                arguments: path
                    .arguments
                    .into_iter()
                    .map(|(name, value)| Argument {
                        name,
                        value: self.build(value),
                    })
                    .collect(),
            }),
            Node::Number(number) => Expression::Number(number),
            Node::String(string) => Expression::String(string),
            Node::List(items) => Expression::List(ExpressionList {
                items: items.into_iter().map(|item| self.build(item)).collect(),
            }),
            Node::Operator {
                operator,
                left,
                right,
            } => Expression::Operator(OperatorExpression {
                operator,
                left: Box::new(self.build(left)),
                right: right.map(|right| Box::new(self.build(right))),
            }),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Put `id` into `slot`, appending when the slot is one past the end
    fn place(&mut self, slot: Slot, id: NodeId, name: Option<String>) {
        match &mut self.nodes[slot.owner] {
            Node::Path(path) => match path.arguments.get_mut(slot.index) {
                Some(argument) => argument.1 = id,
                None => path.arguments.push((name, id)),
            },
            Node::List(items) => match items.get_mut(slot.index) {
                Some(item) => *item = id,
                None => items.push(id),
            },
            Node::Operator { left, right, .. } => {
                if slot.index == 0 {
                    *left = id;
                } else {
                    *right = Some(id);
                }
            }
            Node::Number(_) | Node::String(_) => {}
        }
    }

    fn path(&self, id: NodeId) -> Option<&PathNode> {
        match &self.nodes[id] {
            Node::Path(path) => Some(path),
            _ => None,
        }
    }

    fn path_mut(&mut self, id: NodeId) -> Option<&mut PathNode> {
        match &mut self.nodes[id] {
            Node::Path(path) => Some(path),
            _ => None,
        }
    }

    fn set_stage(&mut self, next: Stage) {
        if let Some(Frame::Expression { stage, .. }) = self.frames.last_mut() {
            *stage = next;
        }
    }

    fn replace_top(&mut self, frame: Frame) {
        if let Some(top) = self.frames.last_mut() {
            *top = frame;
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| is_whitespace(*c)) {
            self.advance(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stache::ast::{DiagnosticKind, Number, PathKind};
    use rstest::rstest;

    fn parse(text: &str) -> Expression {
        parse_standalone(text).unwrap_or_else(|errors| panic!("{text}: {errors:?}"))
    }

    fn parse_err(text: &str) -> Diagnostic {
        parse_standalone(text)
            .expect_err(text)
            .into_iter()
            .next()
            .unwrap()
    }

    fn names(path: &PathExpression) -> Vec<&str> {
        path.segment_names()
    }

    #[test]
    fn test_dotted_path() {
        let expression = parse("a.b.c");
        let path = expression.as_path().unwrap();
        assert_eq!(names(path), vec!["a", "b", "c"]);
        assert_eq!(path.formatter, None);
        assert!(path.arguments.is_empty());
    }

    #[test]
    fn test_call_with_positional_arguments() {
        let expression = parse("a.b(c,d)");
        let path = expression.as_path().unwrap();
        assert_eq!(names(path), vec!["a"]);
        assert_eq!(path.formatter.as_deref(), Some("b"));
        let args: Vec<String> = path.arguments.iter().map(|a| a.value.to_string()).collect();
        assert_eq!(args, vec!["c", "d"]);
        assert!(path.arguments.iter().all(|a| a.name.is_none()));
    }

    #[test]
    fn test_call_followed_by_path() {
        let expression = parse("a().b");
        let list = expression.as_list().unwrap();
        assert_eq!(list.items.len(), 2);

        let first = list.items[0].as_path().unwrap();
        assert!(first.segments.is_empty());
        assert_eq!(first.formatter.as_deref(), Some("a"));
        assert!(first.arguments.is_empty());

        assert_eq!(names(list.items[1].as_path().unwrap()), vec!["b"]);
    }

    #[test]
    fn test_named_arguments() {
        let expression = parse("f([x]1,[y]2)");
        let path = expression.as_path().unwrap();
        let named: Vec<(Option<&str>, Number)> = path
            .arguments
            .iter()
            .map(|a| (a.name.as_deref(), a.value.as_number().unwrap().value))
            .collect();
        assert_eq!(
            named,
            vec![
                (Some("x"), Number::Integer(1)),
                (Some("y"), Number::Integer(2))
            ]
        );
    }

    #[test]
    fn test_operators_apply_left_to_right() {
        let expression = parse("1+2*3");
        let outer = expression.as_operator().unwrap();
        assert_eq!(outer.operator, Operator::Multiply);
        assert_eq!(outer.right.as_ref().unwrap().to_string(), "3");

        let inner = outer.left.as_operator().unwrap();
        assert_eq!(inner.operator, Operator::Add);
        assert_eq!(inner.left.to_string(), "1");
        assert_eq!(inner.right.as_ref().unwrap().to_string(), "2");
    }

    #[test]
    fn test_operator_inside_argument() {
        let expression = parse("f(a + 1, b)");
        let path = expression.as_path().unwrap();
        assert_eq!(path.arguments.len(), 2);
        assert_eq!(
            path.arguments[0].value.as_operator().unwrap().operator,
            Operator::Add
        );
        assert_eq!(path.arguments[1].value.to_string(), "b");
    }

    #[test]
    fn test_dot_continues_a_path_argument() {
        let expression = parse("f(a.b, c)");
        let path = expression.as_path().unwrap();
        assert_eq!(path.arguments.len(), 2);
        assert_eq!(names(path.arguments[0].value.as_path().unwrap()), vec!["a", "b"]);
        assert_eq!(path.arguments[1].value.to_string(), "c");
    }

    #[test]
    fn test_unary_invert() {
        let expression = parse("a! && b");
        let and = expression.as_operator().unwrap();
        assert_eq!(and.operator, Operator::And);
        let invert = and.left.as_operator().unwrap();
        assert_eq!(invert.operator, Operator::Invert);
        assert!(invert.right.is_none());
    }

    #[test]
    fn test_follow_up_inside_argument_promotes_to_list() {
        let expression = parse("f(a().b, c)");
        let path = expression.as_path().unwrap();
        let list = path.arguments[0].value.as_list().unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].to_string(), "a()");
        assert_eq!(path.arguments[1].value.to_string(), "c");
    }

    #[test]
    fn test_follow_up_keeps_argument_name() {
        let expression = parse("f([n]'x'.ToUpper())");
        let argument = &expression.as_path().unwrap().arguments[0];
        assert_eq!(argument.name.as_deref(), Some("n"));
        assert!(argument.value.as_list().is_some());
    }

    #[test]
    fn test_nested_calls() {
        let expression = parse("a.f(b.g(1, 'two'), [k]~c)");
        assert_eq!(expression.to_string(), "a.f(b.g(1, 'two'), [k]~c)");
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("'text'").as_string().unwrap().value, "text");
        assert_eq!(parse("1.5").as_number().unwrap().value, Number::Float(1.5));
        assert_eq!(parse("42").as_number().unwrap().value, Number::Integer(42));
    }

    #[test]
    fn test_literal_follow_up() {
        let expression = parse("'text'.ToUpper()");
        let list = expression.as_list().unwrap();
        assert_eq!(list.items[0].as_string().unwrap().value, "text");
        assert_eq!(
            list.items[1].as_path().unwrap().formatter.as_deref(),
            Some("ToUpper")
        );
    }

    #[test]
    fn test_parent_path_with_operator() {
        let expression = parse("../a / 2");
        let divide = expression.as_operator().unwrap();
        assert_eq!(divide.operator, Operator::Divide);
        let path = divide.left.as_path().unwrap();
        assert_eq!(path.segments[0].kind, PathKind::Parent);
    }

    #[rstest]
    #[case("a.b.c")]
    #[case("a.b(c, d)")]
    #[case("a().b")]
    #[case("f([x]1, [y]2)")]
    #[case("x + 1 * y")]
    #[case("~root.list.Count() > 0")]
    #[case("'a\\'b'")]
    fn test_display_round_trips(#[case] text: &str) {
        let expression = parse(text);
        assert_eq!(parse(&expression.to_string()), expression);
    }

    #[rstest]
    #[case("f(a")]
    #[case("f(a,")]
    #[case("a.b(")]
    fn test_unterminated_call(#[case] text: &str) {
        let diagnostic = parse_err(text);
        assert_eq!(diagnostic.kind, DiagnosticKind::SyntaxError);
        assert_eq!(diagnostic.expected, ")");
    }

    #[test]
    fn test_second_call_without_dot_is_ambiguous() {
        let diagnostic = parse_err("a()()");
        assert_eq!(diagnostic.kind, DiagnosticKind::AmbiguousExpression);
        assert_eq!(diagnostic.offset, 3);
    }

    #[rstest]
    #[case("a +")]
    #[case("a = b")]
    #[case("a)")]
    #[case("a, b")]
    #[case(".(x)")]
    #[case("a b")]
    #[case("f(,)")]
    #[case("'open")]
    fn test_syntax_errors(#[case] text: &str) {
        assert_eq!(parse_err(text).kind, DiagnosticKind::SyntaxError);
    }

    #[test]
    fn test_error_offset_is_absolute() {
        let template = "{{#if a +}}";
        let mut sink = DiagnosticSink::new(template);
        assert!(parse_expression("a +", 6, &mut sink).is_none());
        assert_eq!(sink.items()[0].offset, 9);
    }
}

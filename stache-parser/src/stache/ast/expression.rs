//! Expression tree for tag bodies
//!
//!     Everything between the braces of a value tag or after the keyword of a block tag is
//!     an expression. Five node shapes cover the grammar:
//!
//!         a.b.c                 Path with three data segments
//!         a.b(c, [n]2)          Path `a` calling formatter `b` with two arguments
//!         a().b                 List of two follow-up expressions
//!         'text' / 1.5          String and number literals
//!         x + 1                 Operator with a left and right operand
//!
//!     The tree owns its children directly. `Display` renders the canonical source form,
//!     so `expr.to_string()` can be re-parsed into an equal tree.

use serde::Serialize;
use std::fmt;

/// One parsed expression
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    Path(PathExpression),
    Number(NumberLiteral),
    String(StringLiteral),
    List(ExpressionList),
    Operator(OperatorExpression),
}

impl Expression {
    pub fn as_path(&self) -> Option<&PathExpression> {
        match self {
            Expression::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ExpressionList> {
        match self {
            Expression::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<&OperatorExpression> {
        match self {
            Expression::Operator(operator) => Some(operator),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumberLiteral> {
        match self {
            Expression::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringLiteral> {
        match self {
            Expression::String(string) => Some(string),
            _ => None,
        }
    }

    /// Short name of the node shape, used by tree renderers
    pub fn node_type(&self) -> &'static str {
        match self {
            Expression::Path(_) => "Path",
            Expression::Number(_) => "Number",
            Expression::String(_) => "String",
            Expression::List(_) => "List",
            Expression::Operator(_) => "Operator",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Path(path) => path.fmt(f),
            Expression::Number(number) => number.fmt(f),
            Expression::String(string) => string.fmt(f),
            Expression::List(list) => list.fmt(f),
            Expression::Operator(operator) => operator.fmt(f),
        }
    }
}

/// How a path segment resolves against the data context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// A named member lookup
    Data,
    /// `..` or `$`: step out to the enclosing context
    Parent,
    /// `~`: the outermost context
    Root,
    /// `.` or `?`: the current context itself
    Current,
}

/// A single step of a path
///
/// Non-data segments keep the marker they were written with as their name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PathSegment {
    pub name: String,
    pub kind: PathKind,
}

impl PathSegment {
    pub fn data(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PathKind::Data,
        }
    }

    pub fn marker(name: &str, kind: PathKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// A path, optionally followed by a formatter call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathExpression {
    pub segments: Vec<PathSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
}

impl PathExpression {
    pub fn is_call(&self) -> bool {
        self.formatter.is_some()
    }

    /// Segment names in order
    pub fn segment_names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut previous: Option<&str> = None;
        for segment in &self.segments {
            let separator = match previous {
                None | Some("~") => "",
                Some("..") => "/",
                Some(_) => ".",
            };
            write!(f, "{}{}", separator, segment.name)?;
            previous = Some(segment.name.as_str());
        }

        if let Some(formatter) = &self.formatter {
            if !self.segments.is_empty() {
                write!(f, ".")?;
            }
            write!(f, "{}(", formatter)?;
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", argument)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// One formatter argument, optionally named with `[name]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: Expression,
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "[{}]{}", name, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{}", value),
            Number::Float(value) => write!(f, "{}", value),
        }
    }
}

/// A numeric literal and the text it was read from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberLiteral {
    pub raw: String,
    pub value: Number,
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A quoted string literal, stored unescaped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringLiteral {
    pub value: String,
    /// The quote character that delimited the literal, `'` or `"`
    pub delimiter: char,
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.delimiter)?;
        for c in self.value.chars() {
            if c == self.delimiter {
                write!(f, "\\")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "{}", self.delimiter)
    }
}

/// Chained expressions, each evaluated on the result of the previous one
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpressionList {
    pub items: Vec<Expression>,
}

impl fmt::Display for ExpressionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Pow,
    Remainder,
    ShiftLeft,
    ShiftRight,
    Equals,
    Unequals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    And,
    Or,
    Invert,
}

impl Operator {
    pub const ALL: [Operator; 17] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Pow,
        Operator::Remainder,
        Operator::ShiftLeft,
        Operator::ShiftRight,
        Operator::Equals,
        Operator::Unequals,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::And,
        Operator::Or,
        Operator::Invert,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Pow => "^",
            Operator::Remainder => "%",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
            Operator::Equals => "==",
            Operator::Unequals => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Invert => "!",
        }
    }

    /// Whether the operator takes a right operand
    pub fn is_binary(self) -> bool {
        self != Operator::Invert
    }

    /// Longest operator symbol at the start of `text`, with its byte length
    pub fn match_prefix(text: &str) -> Option<(Operator, usize)> {
        let longest = Self::ALL
            .iter()
            .filter(|op| op.symbol().len() == 2)
            .chain(Self::ALL.iter().filter(|op| op.symbol().len() == 1))
            .find(|op| text.starts_with(op.symbol()))?;
        Some((*longest, longest.symbol().len()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An operator applied to the expression before it and, if binary, the one after
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorExpression {
    pub operator: Operator,
    pub left: Box<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<Expression>>,
}

impl fmt::Display for OperatorExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.right {
            Some(right) => write!(f, "{} {} {}", self.left, self.operator, right),
            None => write!(f, "{}{}", self.left, self.operator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(names: &[&str]) -> PathExpression {
        PathExpression {
            segments: names.iter().map(|n| PathSegment::data(*n)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_match_prefix_prefers_two_characters() {
        assert_eq!(Operator::match_prefix("== b"), Some((Operator::Equals, 2)));
        assert_eq!(Operator::match_prefix("!= b"), Some((Operator::Unequals, 2)));
        assert_eq!(Operator::match_prefix("<= b"), Some((Operator::LessOrEqual, 2)));
        assert_eq!(Operator::match_prefix("<< b"), Some((Operator::ShiftLeft, 2)));
        assert_eq!(Operator::match_prefix("< b"), Some((Operator::LessThan, 1)));
        assert_eq!(Operator::match_prefix("!"), Some((Operator::Invert, 1)));
        assert_eq!(Operator::match_prefix("= b"), None);
        assert_eq!(Operator::match_prefix("& b"), None);
    }

    #[test]
    fn test_display_path_markers() {
        let mut expr = path(&["a"]);
        expr.segments.insert(0, PathSegment::marker("~", PathKind::Root));
        assert_eq!(expr.to_string(), "~a");

        let mut expr = path(&["b"]);
        expr.segments.insert(0, PathSegment::marker("..", PathKind::Parent));
        expr.segments.insert(0, PathSegment::marker("..", PathKind::Parent));
        assert_eq!(expr.to_string(), "../../b");
    }

    #[test]
    fn test_display_call_with_named_argument() {
        let mut expr = path(&["a"]);
        expr.formatter = Some("b".into());
        expr.arguments = vec![
            Argument {
                name: None,
                value: Expression::Path(path(&["c"])),
            },
            Argument {
                name: Some("n".into()),
                value: Expression::String(StringLiteral {
                    value: "it's".into(),
                    delimiter: '\'',
                }),
            },
        ];
        assert_eq!(expr.to_string(), r"a.b(c, [n]'it\'s')");
    }

    #[test]
    fn test_display_operator() {
        let expr = OperatorExpression {
            operator: Operator::Add,
            left: Box::new(Expression::Path(path(&["x"]))),
            right: Some(Box::new(Expression::Number(NumberLiteral {
                raw: "1".into(),
                value: Number::Integer(1),
            }))),
        };
        assert_eq!(expr.to_string(), "x + 1");
    }
}

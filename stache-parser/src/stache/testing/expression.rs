//! Fluent assertions over expressions

use crate::stache::ast::{Expression, Operator, PathExpression, PathKind};

pub fn assert_expression(expression: &Expression) -> ExpressionAssertion<'_> {
    ExpressionAssertion {
        expression,
        context: "expression".to_string(),
    }
}

pub struct ExpressionAssertion<'a> {
    expression: &'a Expression,
    context: String,
}

impl<'a> ExpressionAssertion<'a> {
    fn mismatch(&self, expected: &str) -> ! {
        panic!(
            "{}: Expected {}, found {} ({})",
            self.context,
            expected,
            self.expression.node_type(),
            self.expression
        )
    }

    /// Assert the canonical source text
    pub fn renders(self, expected: &str) -> Self {
        assert_eq!(
            self.expression.to_string(),
            expected,
            "{}: Expected '{}', found '{}'",
            self.context,
            expected,
            self.expression
        );
        self
    }

    pub fn assert_path(self) -> PathAssertion<'a> {
        match self.expression {
            Expression::Path(path) => PathAssertion {
                path,
                context: self.context,
            },
            _ => self.mismatch("Path"),
        }
    }

    pub fn assert_operator(self) -> OperatorAssertion<'a> {
        match self.expression {
            Expression::Operator(operator) => OperatorAssertion {
                operator: operator.operator,
                left: &operator.left,
                right: operator.right.as_deref(),
                context: self.context,
            },
            _ => self.mismatch("Operator"),
        }
    }

    pub fn number(self, expected: &str) -> Self {
        match self.expression {
            Expression::Number(number) => assert_eq!(
                number.raw, expected,
                "{}: Expected number {}, found {}",
                self.context, expected, number.raw
            ),
            _ => self.mismatch("Number"),
        }
        self
    }

    pub fn string(self, expected: &str) -> Self {
        match self.expression {
            Expression::String(string) => assert_eq!(
                string.value, expected,
                "{}: Expected string {:?}, found {:?}",
                self.context, expected, string.value
            ),
            _ => self.mismatch("String"),
        }
        self
    }

    pub fn item_count(self, expected: usize) -> Self {
        match self.expression {
            Expression::List(list) => assert_eq!(
                list.items.len(),
                expected,
                "{}: Expected {} list items, found {}",
                self.context,
                expected,
                list.items.len()
            ),
            _ => self.mismatch("List"),
        }
        self
    }

    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ExpressionAssertion<'a>),
    {
        let items = match self.expression {
            Expression::List(list) => &list.items,
            _ => self.mismatch("List"),
        };
        assert!(
            index < items.len(),
            "{}: list index {} out of bounds ({} items)",
            self.context,
            index,
            items.len()
        );
        assertion(ExpressionAssertion {
            expression: &items[index],
            context: format!("{}.items[{}]", self.context, index),
        });
        self
    }
}

pub struct PathAssertion<'a> {
    path: &'a PathExpression,
    context: String,
}

impl<'a> PathAssertion<'a> {
    /// Assert segment names, markers included (`~`, `..`, `$`, `.`)
    pub fn segments(self, expected: &[&str]) -> Self {
        assert_eq!(
            self.path.segment_names(),
            expected,
            "{}: Expected segments {:?}",
            self.context,
            expected
        );
        self
    }

    pub fn kinds(self, expected: &[PathKind]) -> Self {
        let actual: Vec<PathKind> = self.path.segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            actual, expected,
            "{}: Expected segment kinds {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    pub fn formatter(self, expected: &str) -> Self {
        assert_eq!(
            self.path.formatter.as_deref(),
            Some(expected),
            "{}: Expected formatter '{}', found {:?}",
            self.context,
            expected,
            self.path.formatter
        );
        self
    }

    pub fn no_formatter(self) -> Self {
        assert!(
            self.path.formatter.is_none(),
            "{}: Expected no formatter, found {:?}",
            self.context,
            self.path.formatter
        );
        self
    }

    pub fn argument_count(self, expected: usize) -> Self {
        assert_eq!(
            self.path.arguments.len(),
            expected,
            "{}: Expected {} arguments, found {}",
            self.context,
            expected,
            self.path.arguments.len()
        );
        self
    }

    /// Assert the name of argument `index` and hand its value to `assertion`
    pub fn argument<F>(self, index: usize, name: Option<&str>, assertion: F) -> Self
    where
        F: FnOnce(ExpressionAssertion<'a>),
    {
        let arguments = &self.path.arguments;
        assert!(
            index < arguments.len(),
            "{}: argument index {} out of bounds ({} arguments)",
            self.context,
            index,
            arguments.len()
        );
        let argument = &arguments[index];
        assert_eq!(
            argument.name.as_deref(),
            name,
            "{}: Expected argument {} to be named {:?}",
            self.context,
            index,
            name
        );
        assertion(ExpressionAssertion {
            expression: &argument.value,
            context: format!("{}.arguments[{}]", self.context, index),
        });
        self
    }
}

pub struct OperatorAssertion<'a> {
    operator: Operator,
    left: &'a Expression,
    right: Option<&'a Expression>,
    context: String,
}

impl<'a> OperatorAssertion<'a> {
    pub fn operator(self, expected: Operator) -> Self {
        assert_eq!(
            self.operator, expected,
            "{}: Expected operator {}, found {}",
            self.context, expected, self.operator
        );
        self
    }

    pub fn left<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ExpressionAssertion<'a>),
    {
        assertion(ExpressionAssertion {
            expression: self.left,
            context: format!("{}.left", self.context),
        });
        self
    }

    pub fn right<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ExpressionAssertion<'a>),
    {
        let Some(right) = self.right else {
            panic!("{}: Expected a right operand, found none", self.context);
        };
        assertion(ExpressionAssertion {
            expression: right,
            context: format!("{}.right", self.context),
        });
        self
    }

    pub fn unary(self) -> Self {
        assert!(
            self.right.is_none(),
            "{}: Expected a unary operator",
            self.context
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stache::testing::parse_expr;

    #[test]
    fn test_call_with_named_arguments() {
        let expression = parse_expr("f([x]1, [y]2)");
        assert_expression(&expression)
            .assert_path()
            .segments(&[])
            .formatter("f")
            .argument_count(2)
            .argument(0, Some("x"), |arg| {
                arg.number("1");
            })
            .argument(1, Some("y"), |arg| {
                arg.number("2");
            });
    }

    #[test]
    fn test_left_to_right_operators() {
        let expression = parse_expr("1 + 2 * 3");
        assert_expression(&expression)
            .assert_operator()
            .operator(Operator::Multiply)
            .left(|left| {
                left.assert_operator().operator(Operator::Add);
            })
            .right(|right| {
                right.number("3");
            });
    }

    #[test]
    #[should_panic(expected = "expression: Expected Path, found Number")]
    fn test_mismatch_names_the_node() {
        let expression = parse_expr("42");
        assert_expression(&expression).assert_path();
    }
}

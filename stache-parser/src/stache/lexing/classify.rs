//! Character classifiers
//!
//! Pure predicates over single characters. `.` is both a path separator and an argument
//! terminator, and `/` is both a path character (in `../`) and an operator; callers
//! disambiguate by parser state.

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

pub fn is_string_delimiter(c: char) -> bool {
    c == '\'' || c == '"'
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Characters allowed in a member name
pub fn is_data_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_path_char(c: char) -> bool {
    is_data_char(c) || matches!(c, '.' | '~' | '$' | '/' | '?')
}

/// Characters that may begin a path expression
pub fn is_path_start_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '_' | '.' | '~' | '$' | '?')
}

pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '^' | '%' | '<' | '>' | '=' | '!' | '&' | '|'
    )
}

pub fn is_argument_terminator(c: char) -> bool {
    matches!(c, ',' | '.' | ')')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('a', true)]
    #[case('Z', true)]
    #[case('_', true)]
    #[case('7', true)]
    #[case('.', true)]
    #[case('~', true)]
    #[case('$', true)]
    #[case('/', true)]
    #[case('?', true)]
    #[case('(', false)]
    #[case(' ', false)]
    #[case('+', false)]
    fn test_is_path_char(#[case] c: char, #[case] expected: bool) {
        assert_eq!(is_path_char(c), expected);
    }

    #[test]
    fn test_dual_role_characters() {
        assert!(is_path_char('.') && is_argument_terminator('.'));
        assert!(is_path_char('/') && is_operator_char('/'));
        assert!(!is_path_start_char('1'));
        assert!(!is_path_start_char('/'));
    }

    #[test]
    fn test_operator_chars() {
        for c in "+-*/^%<>=!&|".chars() {
            assert!(is_operator_char(c), "{c} should be an operator char");
        }
        assert!(!is_operator_char('.'));
    }
}

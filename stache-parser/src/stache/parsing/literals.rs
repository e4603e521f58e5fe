//! Number and string literal scanners
//!
//! Both scanners start at a byte offset inside an expression body and return the literal
//! together with the offset just past it. Errors are plain messages; the expression
//! parser places them.

use crate::stache::ast::{Number, NumberLiteral, StringLiteral};
use crate::stache::lexing::classify::{is_data_char, is_digit};

/// Scan a number starting at `start`
///
/// At most one `.` is taken, and only when a digit follows it, so `1.5` is a float while
/// `1.ToString()` is the integer `1` followed by a formatter call.
pub fn scan_number(text: &str, start: usize) -> Result<(NumberLiteral, usize), String> {
    let bytes = text.as_bytes();
    let mut end = start;
    let mut is_float = false;

    while end < bytes.len() {
        let c = bytes[end] as char;
        if is_digit(c) {
            end += 1;
        } else if c == '.'
            && !is_float
            && bytes.get(end + 1).is_some_and(|b| b.is_ascii_digit())
        {
            is_float = true;
            end += 1;
        } else {
            break;
        }
    }

    let raw = &text[start..end];
    if text[end..].chars().next().is_some_and(is_data_char) {
        return Err(format!("could not parse the number '{}'", raw));
    }

    let value = if is_float {
        raw.parse::<f64>()
            .map(Number::Float)
            .map_err(|_| format!("could not parse the number '{}'", raw))?
    } else {
        raw.parse::<i64>()
            .map(Number::Integer)
            .map_err(|_| format!("the number '{}' is out of range", raw))?
    };

    Ok((
        NumberLiteral {
            raw: raw.to_string(),
            value,
        },
        end,
    ))
}

/// Scan a quoted string whose opening delimiter is at `start`
///
/// A backslash escapes the active delimiter; any other backslash is kept as written.
pub fn scan_string(text: &str, start: usize) -> Result<(StringLiteral, usize), String> {
    let mut chars = text[start..].char_indices();
    let delimiter = match chars.next() {
        Some((_, c)) => c,
        None => return Err("expected a string literal".to_string()),
    };

    let mut value = String::new();
    let mut escaped = false;
    for (index, c) in chars {
        if escaped {
            if c != delimiter {
                value.push('\\');
            }
            value.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == delimiter {
            let end = start + index + c.len_utf8();
            return Ok((StringLiteral { value, delimiter }, end));
        } else {
            value.push(c);
        }
    }

    Err(format!(
        "string literal starting with {} is never closed",
        delimiter
    ))
}

//! Internal errors and source excerpts

use super::range::SourcePosition;
use thiserror::Error;

/// A broken invariant inside the parser itself
///
/// These never describe a mistake in the template. When one is raised the parse is
/// abandoned and no diagnostics or tree are returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    /// The lexer cursor moved past the end of the tag it was processing
    #[error("internal index location error: cursor at {offset} is past the tag ending at {span_end}")]
    OffsetRegression { offset: usize, span_end: usize },
    /// Blocks were still open on the build stack after the last token
    #[error("build stack is unbalanced after the last token, still open: {}", .open.join(", "))]
    UnbalancedBuildStack { open: Vec<String> },
}

/// Format source code context around a position
///
/// Shows 2 lines before the position, its line with a >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &str, position: SourcePosition) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = position.line.saturating_sub(1);

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, line) in lines
        .iter()
        .enumerate()
        .take(end_line)
        .skip(start_line)
    {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }

    context
}

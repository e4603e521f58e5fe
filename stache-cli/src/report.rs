//! Diagnostic output on stderr

use stache_parser::stache::ast::format_source_context;
use stache_parser::stache::Diagnostic;
use std::process::ExitCode;

pub struct Reporter<'a> {
    path: &'a str,
    source: &'a str,
    show_source: bool,
}

impl<'a> Reporter<'a> {
    pub fn new(path: &'a str, source: &'a str, show_source: bool) -> Self {
        Self {
            path,
            source,
            show_source,
        }
    }

    /// Render one diagnostic as it is printed
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut text = format!("{}:{}", self.path, diagnostic);
        if !diagnostic.expected.is_empty() {
            text.push_str(&format!(" (expected {})", diagnostic.expected));
        }
        text.push('\n');
        if self.show_source {
            text.push_str(&format_source_context(self.source, diagnostic.position));
        }
        text
    }

    /// Print `diagnostics` and pick the exit status
    pub fn report(&self, diagnostics: &[Diagnostic]) -> ExitCode {
        if diagnostics.is_empty() {
            return ExitCode::SUCCESS;
        }
        for diagnostic in diagnostics {
            eprint!("{}", self.render(diagnostic));
        }
        eprintln!(
            "{}: {} problem{} found",
            self.path,
            diagnostics.len(),
            if diagnostics.len() == 1 { "" } else { "s" }
        );
        ExitCode::from(1)
    }
}

//! Compile diagnostics as reported to callers.
//!
//! The compiler reports [`Diagnostic`]s with byte spans into the generated
//! unit. [`CompileDiagnostics`] resolves them to line/column entries once,
//! and can re-express the entries that fall inside the snippet relative to
//! the snippet itself, so callers never need to know how units are laid out.

use std::fmt;
use std::sync::Arc;

use snip_diagnostic::emitter::{summary, TextEmitter};
use snip_diagnostic::span_utils::LineOffsetTable;
use snip_diagnostic::{Diagnostic, ErrorCode, Severity};

/// One reported issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    /// 1-based line; snippet-relative when `in_snippet` is set.
    pub line: u32,
    /// 1-based column in characters.
    pub column: u32,
    pub in_snippet: bool,
}

impl fmt::Display for DiagnosticEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] ", self.severity, self.code)?;
        if self.in_snippet {
            write!(f, "{}:{}", self.line, self.column)?;
        } else {
            write!(f, "generated code {}:{}", self.line, self.column)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Ordered diagnostics of one failed compilation.
#[derive(Clone, Debug)]
pub struct CompileDiagnostics {
    unit_name: Arc<str>,
    source: Arc<str>,
    diagnostics: Vec<Diagnostic>,
    entries: Vec<DiagnosticEntry>,
}

impl CompileDiagnostics {
    /// Resolve `diagnostics` against the unit text they were reported on.
    pub fn new(unit_name: Arc<str>, source: Arc<str>, diagnostics: Vec<Diagnostic>) -> Self {
        let table = LineOffsetTable::build(&source);
        let entries = diagnostics
            .iter()
            .map(|diagnostic| {
                let (line, column) = diagnostic
                    .primary_span()
                    .map_or((1, 1), |span| table.span_start(&source, span));
                DiagnosticEntry {
                    severity: diagnostic.severity,
                    code: diagnostic.code,
                    message: diagnostic.message.clone(),
                    line,
                    column,
                    in_snippet: false,
                }
            })
            .collect();
        CompileDiagnostics {
            unit_name,
            source,
            diagnostics,
            entries,
        }
    }

    /// Re-express entries inside lines `first_line..first_line + line_count`
    /// of the unit relative to the snippet that starts at `first_line`.
    #[must_use]
    pub fn relative_to_snippet(mut self, first_line: u32, line_count: u32) -> Self {
        let end = first_line.saturating_add(line_count);
        for entry in &mut self.entries {
            if !entry.in_snippet && entry.line >= first_line && entry.line < end {
                entry.line = entry.line - first_line + 1;
                entry.in_snippet = true;
            }
        }
        self
    }

    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    /// The underlying diagnostics, with spans into the unit text.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.entries.iter().filter(|e| e.severity == Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One line per entry followed by the summary line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        let errors = self.errors().count();
        out.push_str(&summary(errors, self.entries.len() - errors));
        out
    }

    /// Full rendering with source excerpts from the generated unit.
    pub fn render_detailed(&self) -> String {
        TextEmitter::new(&self.unit_name, &self.source).render_all(&self.diagnostics)
    }
}

impl fmt::Display for CompileDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render().trim_end())
    }
}

impl std::error::Error for CompileDiagnostics {}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use snip_diagnostic::{expected_expression, unknown_symbol};
    use snip_ir::Span;

    use super::*;

    const SOURCE: &str = "final class S {\n    static int evaluate(int a) {\nreturn a + ;\n    }\n}\n";

    fn diagnostics() -> CompileDiagnostics {
        // `;` on line 3 and `S` on line 1
        let semi = u32::try_from(SOURCE.find(" ;").unwrap()).unwrap() + 1;
        CompileDiagnostics::new(
            Arc::from("S"),
            Arc::from(SOURCE),
            vec![
                expected_expression(Span::new(semi, semi + 1), ";"),
                Diagnostic::warning(ErrorCode::W2001)
                    .with_message("unreachable statement")
                    .with_label(Span::new(12, 13), "here"),
            ],
        )
    }

    #[test]
    fn test_entries_in_unit_coordinates() {
        let diags = diagnostics();
        assert_eq!(diags.len(), 2);
        let first = &diags.entries()[0];
        assert_eq!((first.line, first.column, first.in_snippet), (3, 12, false));
        assert_eq!(first.code, ErrorCode::E1002);
        assert!(diags.has_errors());
        assert_eq!(diags.errors().count(), 1);
    }

    #[test]
    fn test_relative_to_snippet() {
        let diags = diagnostics().relative_to_snippet(3, 1);
        let first = &diags.entries()[0];
        assert_eq!((first.line, first.column, first.in_snippet), (1, 12, true));
        let second = &diags.entries()[1];
        assert_eq!((second.line, second.in_snippet), (1, false));
    }

    #[test]
    fn test_render_plain() {
        let diags = diagnostics().relative_to_snippet(3, 1);
        assert_eq!(
            diags.render(),
            "error[E1002] 1:12: expected expression, found `;`\n\
             warning[W2001] generated code 1:13: unreachable statement\n\
             error: aborting due to 1 previous error; 1 warning emitted\n"
        );
    }

    #[test]
    fn test_render_detailed_uses_unit_text() {
        let diags = CompileDiagnostics::new(
            Arc::from("S"),
            Arc::from(SOURCE),
            vec![unknown_symbol(Span::new(12, 13), "S")],
        );
        let text = diags.render_detailed();
        assert!(text.starts_with("error[E2001]: cannot find symbol `S`\n --> S:1:13\n"));
    }
}

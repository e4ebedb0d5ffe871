//! Plain-text diagnostic rendering.
//!
//! Output follows the familiar compiler layout:
//!
//! ```text
//! error[E1002]: expected expression, found `;`
//!  --> Snippet$1:4:13
//!   |
//! 4 |         a + ;
//!   |             ^ expected expression here
//!   = note: ...
//! ```

use std::fmt::Write;

use snip_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label};

/// Renders diagnostics for one source text.
pub struct TextEmitter<'a> {
    origin: &'a str,
    source: &'a str,
    table: LineOffsetTable,
}

impl<'a> TextEmitter<'a> {
    /// `origin` names the source in `-->` lines (a unit name or file path).
    pub fn new(origin: &'a str, source: &'a str) -> Self {
        TextEmitter {
            origin,
            source,
            table: LineOffsetTable::build(source),
        }
    }

    /// Render one diagnostic, ending with a blank line.
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}[{}]: {}",
            diagnostic.severity, diagnostic.code, diagnostic.message
        );

        if let Some(span) = diagnostic.primary_span() {
            let (line, col) = self.table.span_start(self.source, span);
            let _ = writeln!(out, " --> {}:{line}:{col}", self.origin);
        }

        for label in &diagnostic.labels {
            self.render_label(&mut out, label);
        }

        for note in &diagnostic.notes {
            let _ = writeln!(out, "  = note: {note}");
        }

        out.push('\n');
        out
    }

    /// Render every diagnostic followed by a summary line.
    pub fn render_all(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.render(diagnostic));
        }
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics.len() - errors;
        out.push_str(&summary(errors, warnings));
        out
    }

    fn render_label(&self, out: &mut String, label: &Label) {
        let (line, col) = self.table.span_start(self.source, label.span);
        let Some(text) = self.table.line_text(self.source, line) else {
            return;
        };
        let gutter = line.to_string();
        let pad = " ".repeat(gutter.len());
        let marker = if label.is_primary { '^' } else { '-' };
        let width = self.underline_width(label.span, line, text);

        let _ = writeln!(out, "{pad} |");
        let _ = writeln!(out, "{gutter} | {text}");
        let _ = writeln!(
            out,
            "{pad} | {}{} {}",
            " ".repeat((col - 1) as usize),
            marker.to_string().repeat(width),
            label.message
        );
    }

    /// Characters to underline, clipped to the label's first line.
    fn underline_width(&self, span: Span, line: u32, text: &str) -> usize {
        let (end_line, end_col) = self.table.offset_to_line_col(self.source, span.end);
        let (_, start_col) = self.table.offset_to_line_col(self.source, span.start);
        let end_col = if end_line == line {
            end_col
        } else {
            u32::try_from(text.chars().count()).unwrap_or(u32::MAX - 1) + 1
        };
        (end_col.saturating_sub(start_col) as usize).max(1)
    }
}

fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// One-line error/warning summary, empty when there is nothing to report.
pub fn summary(errors: usize, warnings: usize) -> String {
    match (errors, warnings) {
        (0, 0) => String::new(),
        (0, w) => format!("warning: {w} warning{} emitted\n", plural_s(w)),
        (1, 0) => "error: aborting due to previous error\n".to_string(),
        (e, 0) => format!("error: aborting due to {e} previous errors\n"),
        (e, w) => format!(
            "error: aborting due to {e} previous error{}; {w} warning{} emitted\n",
            plural_s(e),
            plural_s(w)
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use snip_ir::Span;

    use super::*;
    use crate::{expected_expression, ErrorCode};

    #[test]
    fn test_render_primary_label() {
        let source = "class A {\n    a + ;\n}";
        let emitter = TextEmitter::new("A", source);
        let diag = expected_expression(Span::new(18, 19), ";");

        assert_eq!(
            emitter.render(&diag),
            "error[E1002]: expected expression, found `;`\n \
             --> A:2:9\n  \
             |\n\
             2 |     a + ;\n  \
             |         ^ expected expression here\n\n"
        );
    }

    #[test]
    fn test_render_multi_char_underline_and_note() {
        let source = "return count;";
        let emitter = TextEmitter::new("S", source);
        let diag = Diagnostic::error(ErrorCode::E2001)
            .with_message("cannot find symbol `count`")
            .with_label(Span::new(7, 12), "not found in this scope")
            .with_note("declare it as a parameter or constant");

        let text = emitter.render(&diag);
        assert!(text.contains(" --> S:1:8\n"));
        assert!(text.contains("  |        ^^^^^ not found in this scope\n"));
        assert!(text.contains("  = note: declare it as a parameter or constant\n"));
    }

    #[test]
    fn test_secondary_label_uses_dashes() {
        let source = "var a = 1; var a = 2;";
        let emitter = TextEmitter::new("S", source);
        let diag = crate::already_defined(Span::new(15, 16), Span::new(4, 5), "a");
        let text = emitter.render(&diag);
        assert!(text.contains("^ redefined here"));
        assert!(text.contains("- first defined here"));
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary(0, 0), "");
        assert_eq!(summary(1, 0), "error: aborting due to previous error\n");
        assert_eq!(summary(3, 0), "error: aborting due to 3 previous errors\n");
        assert_eq!(summary(0, 2), "warning: 2 warnings emitted\n");
        assert_eq!(
            summary(2, 1),
            "error: aborting due to 2 previous errors; 1 warning emitted\n"
        );
    }

    #[test]
    fn test_render_all_appends_summary() {
        let source = "x";
        let emitter = TextEmitter::new("S", source);
        let diags = vec![expected_expression(Span::new(0, 1), "x")];
        assert!(emitter
            .render_all(&diags)
            .ends_with("error: aborting due to previous error\n"));
    }
}

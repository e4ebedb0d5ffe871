use pretty_assertions::assert_eq;
use snip_ir::Span;

use super::*;

#[test]
fn test_builder_collects_labels_and_notes() {
    let diag = Diagnostic::error(ErrorCode::E2004)
        .with_message("cannot assign a value to final variable `x`")
        .with_label(Span::new(20, 21), "assignment here")
        .with_secondary_label(Span::new(4, 5), "declared final here")
        .with_note("constants are fixed when the unit is loaded");

    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_span(), Some(Span::new(20, 21)));
    assert_eq!(diag.notes, vec!["constants are fixed when the unit is loaded".to_string()]);
    assert!(diag.is_error());
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::W2001).with_message("unreachable statement");
    assert_eq!(diag.severity, Severity::Warning);
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn test_display() {
    let diag = expected_expression(Span::new(3, 4), ";");
    assert_eq!(
        diag.to_string(),
        "error[E1002]: expected expression, found `;`"
    );
}

#[test]
fn test_unclosed_delimiter_labels() {
    let diag = unclosed_delimiter(Span::new(0, 1), Span::new(9, 9), '(');
    assert_eq!(diag.code, ErrorCode::E1003);
    assert_eq!(diag.labels[0], Label::primary(Span::new(9, 9), "expected `)`"));
    assert!(!diag.labels[1].is_primary);
}

#[test]
fn test_already_defined_points_at_both_sites() {
    let diag = already_defined(Span::new(30, 31), Span::new(10, 11), "a");
    assert_eq!(diag.code, ErrorCode::E2002);
    assert_eq!(diag.primary_span(), Some(Span::new(30, 31)));
    assert_eq!(diag.labels[1].span, Span::new(10, 11));
}

#[test]
fn test_severity_display() {
    assert_eq!(Severity::Error.to_string(), "error");
    assert_eq!(Severity::Warning.to_string(), "warning");
    assert_eq!(Severity::Note.to_string(), "note");
    assert_eq!(Severity::Help.to_string(), "help");
}

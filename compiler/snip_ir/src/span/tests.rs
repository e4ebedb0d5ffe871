use super::*;

#[test]
fn test_span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn test_span_merge_reversed_order() {
    let a = Span::new(20, 30);
    let b = Span::new(10, 25);
    let merged = a.merge(b);
    assert_eq!(merged, Span::new(10, 30));
}

#[test]
fn test_span_contains_span() {
    let outer = Span::new(10, 40);
    assert!(outer.contains_span(Span::new(10, 40)));
    assert!(outer.contains_span(Span::new(12, 20)));
    assert!(!outer.contains_span(Span::new(5, 20)));
}

#[test]
fn test_span_try_from_range_start_too_large() {
    let large_start = u32::MAX as usize + 1;
    let result = Span::try_from_range(large_start..large_start + 10);
    assert!(matches!(result, Err(SpanError::StartTooLarge(_))));
}

#[test]
fn test_span_from_range_saturates() {
    let large = u32::MAX as usize + 5;
    let span = Span::from_range(3..large);
    assert_eq!(span.start, 3);
    assert_eq!(span.end, u32::MAX);
}

#[test]
fn test_span_point_is_empty() {
    let point = Span::point(42);
    assert!(point.is_empty());
    assert_eq!(point.len(), 0);
}

#[test]
fn test_span_debug_display() {
    let span = Span::new(100, 200);
    assert_eq!(format!("{span:?}"), "100..200");
    assert_eq!(format!("{span}"), "100..200");
}

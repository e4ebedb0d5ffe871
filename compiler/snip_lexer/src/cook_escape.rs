//! Escape processing for string and character literals.
//!
//! Supported escapes: `\b` `\s` `\t` `\n` `\f` `\r` `\"` `\'` `\\`, octal
//! escapes `\0` through `\377`, and `\uXXXX` (one or more `u`s). Invalid
//! escapes push a diagnostic and are dropped from the cooked text.

use snip_diagnostic::{Diagnostic, ErrorCode};
use snip_ir::Span;

fn resolve_simple_escape(c: char) -> Option<char> {
    match c {
        'b' => Some('\u{8}'),
        's' => Some(' '),
        't' => Some('\t'),
        'n' => Some('\n'),
        'f' => Some('\u{c}'),
        'r' => Some('\r'),
        '"' => Some('"'),
        '\'' => Some('\''),
        '\\' => Some('\\'),
        _ => None,
    }
}

fn invalid_escape(span: Span, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0005)
        .with_message(message)
        .with_label(span, "invalid escape sequence")
}

/// Unescape the content between a literal's quotes.
///
/// `base_offset` is the byte offset of `content` in the source, used to point
/// diagnostics at the offending escape.
pub(crate) fn unescape(content: &str, base_offset: u32, errors: &mut Vec<Diagnostic>) -> String {
    if !content.contains('\\') {
        return content.to_string();
    }

    let offset_of = |i: usize| base_offset.saturating_add(u32::try_from(i).unwrap_or(u32::MAX));
    let mut result = String::with_capacity(content.len());
    let mut chars = content.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let Some((j, escaped)) = chars.next() else {
            errors.push(invalid_escape(
                Span::new(offset_of(i), offset_of(i + 1)),
                "incomplete escape sequence",
            ));
            break;
        };

        if let Some(resolved) = resolve_simple_escape(escaped) {
            result.push(resolved);
        } else if escaped.is_digit(8) {
            // Up to three octal digits, the first at most `3` when three are used.
            let mut value = escaped.to_digit(8).unwrap_or(0);
            let max_digits = if escaped <= '3' { 3 } else { 2 };
            let mut digits = 1;
            while digits < max_digits {
                match chars.peek().and_then(|(_, d)| d.to_digit(8)) {
                    Some(d) => {
                        value = value * 8 + d;
                        digits += 1;
                        chars.next();
                    }
                    None => break,
                }
            }
            result.push(char::from_u32(value).unwrap_or('\0'));
        } else if escaped == 'u' {
            while chars.peek().is_some_and(|(_, c)| *c == 'u') {
                chars.next();
            }
            let mut value = 0u32;
            let mut end = j + 1;
            let mut valid = true;
            for _ in 0..4 {
                match chars.peek().copied() {
                    Some((k, d)) if d.is_ascii_hexdigit() => {
                        value = value * 16 + d.to_digit(16).unwrap_or(0);
                        end = k + 1;
                        chars.next();
                    }
                    _ => {
                        valid = false;
                        break;
                    }
                }
            }
            let span = Span::new(offset_of(i), offset_of(end));
            if !valid {
                errors.push(invalid_escape(span, "unicode escape needs four hex digits"));
                continue;
            }
            match char::from_u32(value) {
                Some(ch) => result.push(ch),
                None => errors.push(invalid_escape(
                    span,
                    format!("unicode escape `\\u{value:04X}` is not a character"),
                )),
            }
        } else {
            errors.push(invalid_escape(
                Span::new(offset_of(i), offset_of(j + escaped.len_utf8())),
                format!("unknown escape sequence `\\{escaped}`"),
            ));
        }
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn cook(content: &str) -> (String, usize) {
        let mut errors = Vec::new();
        let text = unescape(content, 0, &mut errors);
        (text, errors.len())
    }

    #[test]
    fn test_no_escapes() {
        assert_eq!(cook("plain text"), ("plain text".to_string(), 0));
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(
            cook(r#"a\tb\nc\"d\'e\\f\sg\b\f\r"#),
            ("a\tb\nc\"d'e\\f g\u{8}\u{c}\r".to_string(), 0)
        );
    }

    #[test]
    fn test_octal_escapes() {
        assert_eq!(cook(r"\0"), ("\0".to_string(), 0));
        assert_eq!(cook(r"\101"), ("A".to_string(), 0));
        assert_eq!(cook(r"\377"), ("\u{ff}".to_string(), 0));
        // `\477` is `\47` followed by `7`.
        assert_eq!(cook(r"\477"), ("'7".to_string(), 0));
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(cook(r"\u0041\u00e9"), ("Aé".to_string(), 0));
        assert_eq!(cook(r"\uuu0041"), ("A".to_string(), 0));
    }

    #[test]
    fn test_invalid_escapes_are_reported() {
        assert_eq!(cook(r"\q").1, 1);
        assert_eq!(cook(r"\u12").1, 1);
        assert_eq!(cook(r"\uD800").1, 1);
    }

    #[test]
    fn test_error_span_points_at_escape() {
        let mut errors = Vec::new();
        unescape(r"ab\qc", 10, &mut errors);
        assert_eq!(errors[0].primary_span(), Some(Span::new(12, 14)));
        assert_eq!(errors[0].code, ErrorCode::E0005);
    }
}

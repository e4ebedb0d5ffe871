//! Numeric parsing helpers for literals with underscore separators.

/// Parse an unsigned integer skipping underscores, without allocation.
///
/// Returns `None` on an invalid digit or on overflow of `u64`.
#[inline]
pub(crate) fn parse_int_skip_underscores(s: &str, radix: u32) -> Option<u64> {
    let mut result: u64 = 0;
    let mut any_digit = false;
    for c in s.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix)?;
        result = result.checked_mul(u64::from(radix))?;
        result = result.checked_add(u64::from(digit))?;
        any_digit = true;
    }
    any_digit.then_some(result)
}

/// Strip underscores only when present.
#[inline]
pub(crate) fn strip_underscores(s: &str) -> std::borrow::Cow<'_, str> {
    if s.contains('_') {
        std::borrow::Cow::Owned(s.replace('_', ""))
    } else {
        std::borrow::Cow::Borrowed(s)
    }
}

/// Whether the mantissa of a floating literal has a non-zero digit.
pub(crate) fn has_nonzero_mantissa(s: &str) -> bool {
    s.chars()
        .take_while(|c| !matches!(c, 'e' | 'E'))
        .any(|c| matches!(c, '1'..='9'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_skip_underscores() {
        assert_eq!(parse_int_skip_underscores("123", 10), Some(123));
        assert_eq!(parse_int_skip_underscores("1_000_000", 10), Some(1_000_000));
        assert_eq!(parse_int_skip_underscores("ff", 16), Some(255));
        assert_eq!(parse_int_skip_underscores("17", 8), Some(15));
        assert_eq!(parse_int_skip_underscores("101", 2), Some(5));
    }

    #[test]
    fn test_parse_int_rejects() {
        assert_eq!(parse_int_skip_underscores("", 10), None);
        assert_eq!(parse_int_skip_underscores("__", 10), None);
        assert_eq!(parse_int_skip_underscores("19", 8), None);
        assert_eq!(parse_int_skip_underscores("99999999999999999999", 10), None);
    }

    #[test]
    fn test_nonzero_mantissa() {
        assert!(has_nonzero_mantissa("0.001"));
        assert!(!has_nonzero_mantissa("0.0e10"));
        assert!(!has_nonzero_mantissa("000"));
    }
}

//! Property-based tests for the lexer.

use proptest::prelude::*;
use snip_lexer::{lex, TokenKind};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Lexing never panics and always ends with exactly one Eof.
    #[test]
    fn lexer_no_panic(input in ".{0,120}") {
        let (tokens, _errors) = lex(&input);
        let eofs = tokens.kinds().filter(|k| **k == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1);
        prop_assert_eq!(tokens.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }

    /// Token spans are ordered, non-overlapping and inside the source.
    #[test]
    fn spans_are_ordered(input in "[ -~\n]{0,120}") {
        let (tokens, _errors) = lex(&input);
        let len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        let mut previous_end = 0;
        for token in &tokens.tokens {
            prop_assert!(token.span.start >= previous_end, "overlap at {:?}", token);
            prop_assert!(token.span.end <= len);
            previous_end = token.span.end;
        }
    }

    /// Every non-negative `int` written in decimal reads back as itself.
    #[test]
    fn decimal_int_round_trips(n in 0..=i32::MAX) {
        let (tokens, errors) = lex(&n.to_string());
        prop_assert!(errors.is_empty());
        prop_assert_eq!(&tokens.tokens[0].kind, &TokenKind::Int(n));
    }

    /// Hex spelling of any `int` bit pattern reads back as the same value.
    #[test]
    fn hex_int_is_bit_pattern(n in any::<i32>()) {
        let (tokens, errors) = lex(&format!("0x{n:X}"));
        prop_assert!(errors.is_empty());
        prop_assert_eq!(&tokens.tokens[0].kind, &TokenKind::Int(n));
    }

    /// Plain string content is preserved verbatim.
    #[test]
    fn plain_strings_round_trip(s in "[a-zA-Z0-9_ .,]{0,30}") {
        let (tokens, errors) = lex(&format!("\"{s}\""));
        prop_assert!(errors.is_empty());
        prop_assert_eq!(&tokens.tokens[0].kind, &TokenKind::Str(s.as_str().into()));
    }
}

//! Identifier rules shared by the lexer and the unit builder.

/// Words the lexer reserves; none of them may name a parameter or constant.
pub const KEYWORDS: &[&str] = &[
    "boolean",
    "byte",
    "char",
    "class",
    "double",
    "else",
    "false",
    "final",
    "float",
    "if",
    "instanceof",
    "int",
    "long",
    "new",
    "null",
    "return",
    "short",
    "static",
    "this",
    "true",
    "var",
    "void",
];

/// Whether `word` is reserved by the snippet language.
#[inline]
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Whether `word` is a valid, non-reserved identifier.
///
/// Identifiers start with an ASCII letter, `_` or `$` and continue with
/// ASCII letters, digits, `_` or `$`.
pub fn is_valid_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') && !is_keyword(word)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("a"));
        assert!(is_valid_identifier("_tmp"));
        assert!(is_valid_identifier("$x1"));
        assert!(is_valid_identifier("camelCase"));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1a"));
        assert!(!is_valid_identifier("a-b"));
        assert!(!is_valid_identifier("a b"));
        assert!(!is_valid_identifier("héllo"));
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        for keyword in KEYWORDS {
            assert!(is_keyword(keyword));
            assert!(!is_valid_identifier(keyword), "{keyword} accepted");
        }
    }
}

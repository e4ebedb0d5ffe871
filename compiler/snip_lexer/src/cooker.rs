//! Converts raw logos tokens into cooked [`TokenKind`]s.
//!
//! Cooking resolves literal values: integer radix and range, floating-point
//! precision, escapes in strings and characters. Every problem is pushed as
//! a diagnostic and the token becomes [`TokenKind::Error`] so the parser can
//! keep going.

use std::sync::Arc;

use snip_diagnostic::{Diagnostic, ErrorCode};
use snip_ir::Span;

use crate::cook_escape::unescape;
use crate::parse_helpers::{has_nonzero_mantissa, parse_int_skip_underscores, strip_underscores};
use crate::raw_token::RawToken;
use crate::TokenKind;

const INT_MIN_MAGNITUDE: u64 = 1 << 31;
const LONG_MIN_MAGNITUDE: u64 = 1 << 63;

pub(crate) struct TokenCooker<'e> {
    errors: &'e mut Vec<Diagnostic>,
}

impl<'e> TokenCooker<'e> {
    pub(crate) fn new(errors: &'e mut Vec<Diagnostic>) -> Self {
        TokenCooker { errors }
    }

    pub(crate) fn cook(&mut self, raw: RawToken, slice: &str, span: Span) -> TokenKind {
        match raw {
            RawToken::HexInt => self.cook_int(slice, span, 16),
            RawToken::BinInt => self.cook_int(slice, span, 2),
            RawToken::DecInt => self.cook_int(slice, span, 10),
            RawToken::Float => self.cook_float(slice, span),
            RawToken::Str => {
                let text = unescape(inner(slice), span.start + 1, self.errors);
                TokenKind::Str(Arc::from(text))
            }
            RawToken::Char => self.cook_char(slice, span),
            RawToken::UnterminatedStr => self.error(
                Diagnostic::error(ErrorCode::E0001)
                    .with_message("unterminated string literal")
                    .with_label(span, "missing closing `\"`"),
            ),
            RawToken::UnterminatedChar => self.error(
                Diagnostic::error(ErrorCode::E0004)
                    .with_message("unterminated character literal")
                    .with_label(span, "missing closing `'`"),
            ),
            RawToken::Ident => TokenKind::Ident(Arc::from(slice)),

            // Keywords
            RawToken::Class => TokenKind::Class,
            RawToken::Else => TokenKind::Else,
            RawToken::False => TokenKind::False,
            RawToken::Final => TokenKind::Final,
            RawToken::If => TokenKind::If,
            RawToken::InstanceOf => TokenKind::InstanceOf,
            RawToken::New => TokenKind::New,
            RawToken::Null => TokenKind::Null,
            RawToken::Return => TokenKind::Return,
            RawToken::Static => TokenKind::Static,
            RawToken::This => TokenKind::This,
            RawToken::True => TokenKind::True,
            RawToken::Var => TokenKind::Var,
            RawToken::Void => TokenKind::Void,

            // Type keywords
            RawToken::BooleanType => TokenKind::BooleanType,
            RawToken::ByteType => TokenKind::ByteType,
            RawToken::ShortType => TokenKind::ShortType,
            RawToken::CharType => TokenKind::CharType,
            RawToken::IntType => TokenKind::IntType,
            RawToken::LongType => TokenKind::LongType,
            RawToken::FloatType => TokenKind::FloatType,
            RawToken::DoubleType => TokenKind::DoubleType,

            // Symbols
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Question => TokenKind::Question,
            RawToken::Colon => TokenKind::Colon,

            // Operators
            RawToken::Eq => TokenKind::Eq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::Gt => TokenKind::Gt,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Shl => TokenKind::Shl,
            RawToken::Shr => TokenKind::Shr,
            RawToken::UShr => TokenKind::UShr,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::Amp => TokenKind::Amp,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::Caret => TokenKind::Caret,
        }
    }

    /// Report a character no token starts with.
    pub(crate) fn invalid_character(&mut self, slice: &str, span: Span) -> TokenKind {
        self.error(
            Diagnostic::error(ErrorCode::E0002)
                .with_message(format!("invalid character `{}`", slice.escape_debug()))
                .with_label(span, "not valid here"),
        )
    }

    fn error(&mut self, diagnostic: Diagnostic) -> TokenKind {
        self.errors.push(diagnostic);
        TokenKind::Error
    }

    fn number_error(&mut self, span: Span, message: &str) -> TokenKind {
        self.error(
            Diagnostic::error(ErrorCode::E0003)
                .with_message(message.to_string())
                .with_label(span, "invalid number literal"),
        )
    }

    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_possible_truncation,
        reason = "non-decimal literals denote two's complement bit patterns"
    )]
    fn cook_int(&mut self, slice: &str, span: Span, radix: u32) -> TokenKind {
        let is_long = slice.ends_with(['l', 'L']);
        let digits = if is_long {
            &slice[..slice.len() - 1]
        } else {
            slice
        };
        if digits.ends_with('_') {
            return self.number_error(span, "illegal underscore at end of number");
        }

        let (body, radix) = match radix {
            16 | 2 => (&digits[2..], radix),
            _ if digits.len() > 1 && digits.starts_with('0') => (&digits[1..], 8),
            _ => (digits, 10),
        };
        if radix != 10 && radix != 8 && body.starts_with('_') {
            return self.number_error(span, "illegal underscore after radix prefix");
        }
        if radix == 8 && body.contains(['8', '9']) {
            return self.number_error(span, "invalid digit in octal literal");
        }

        let Some(value) = parse_int_skip_underscores(body, radix) else {
            return self.number_error(span, "integer number too large");
        };

        match (is_long, radix) {
            (false, 10) if value < INT_MIN_MAGNITUDE => TokenKind::Int(value as i32),
            (false, 10) if value == INT_MIN_MAGNITUDE => TokenKind::IntMinMagnitude,
            (false, _) if radix != 10 && value <= u64::from(u32::MAX) => {
                TokenKind::Int(value as u32 as i32)
            }
            (true, 10) if value < LONG_MIN_MAGNITUDE => TokenKind::Long(value as i64),
            (true, 10) if value == LONG_MIN_MAGNITUDE => TokenKind::LongMinMagnitude,
            (true, _) if radix != 10 => TokenKind::Long(value as i64),
            _ => self.number_error(span, "integer number too large"),
        }
    }

    fn cook_float(&mut self, slice: &str, span: Span) -> TokenKind {
        let (body, is_float) = match slice.as_bytes().last() {
            Some(b'f' | b'F') => (&slice[..slice.len() - 1], true),
            Some(b'd' | b'D') => (&slice[..slice.len() - 1], false),
            _ => (slice, false),
        };
        let text = strip_underscores(body);
        let nonzero = has_nonzero_mantissa(&text);

        if is_float {
            match text.parse::<f32>() {
                Ok(v) if v.is_infinite() => {
                    self.number_error(span, "floating-point number too large")
                }
                Ok(v) if v == 0.0 && nonzero => {
                    self.number_error(span, "floating-point number too small")
                }
                Ok(v) => TokenKind::Float(v.to_bits()),
                Err(_) => self.number_error(span, "malformed floating-point literal"),
            }
        } else {
            match text.parse::<f64>() {
                Ok(v) if v.is_infinite() => {
                    self.number_error(span, "floating-point number too large")
                }
                Ok(v) if v == 0.0 && nonzero => {
                    self.number_error(span, "floating-point number too small")
                }
                Ok(v) => TokenKind::Double(v.to_bits()),
                Err(_) => self.number_error(span, "malformed floating-point literal"),
            }
        }
    }

    fn cook_char(&mut self, slice: &str, span: Span) -> TokenKind {
        let text = unescape(inner(slice), span.start + 1, self.errors);
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => TokenKind::Char(c),
            (None, _) if slice.contains('\\') => TokenKind::Error,
            (None, _) => self.error(
                Diagnostic::error(ErrorCode::E0004)
                    .with_message("empty character literal")
                    .with_label(span, "expected one character"),
            ),
            (Some(_), Some(_)) => self.error(
                Diagnostic::error(ErrorCode::E0004)
                    .with_message("character literal may only contain one character")
                    .with_label(span, "use a string literal for text")
                    .with_note("string literals use double quotes"),
            ),
        }
    }
}

/// Content between the quotes of a terminated literal.
fn inner(slice: &str) -> &str {
    slice.get(1..slice.len().saturating_sub(1)).unwrap_or("")
}

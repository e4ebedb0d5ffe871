//! Cooked token types produced by [`lex`](crate::lex).

use std::fmt;
use std::sync::Arc;

use snip_ir::{PrimitiveKind, Span};

/// A token with its span in the source.
#[derive(Clone, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // === Literals ===
    /// `int` literal: `42`, `0x2A`, `0b101`, `017`
    Int(i32),
    /// `long` literal: `42L`
    Long(i64),
    /// Decimal `2147483648`, which is only valid as the operand of unary minus.
    IntMinMagnitude,
    /// Decimal `9223372036854775808L`, which is only valid as the operand of
    /// unary minus.
    LongMinMagnitude,
    /// `float` literal, stored as bits: `1.5f`
    Float(u32),
    /// `double` literal, stored as bits: `1.5`, `1e3`, `2d`
    Double(u64),
    /// `char` literal: `'a'`, `'\n'`
    Char(char),
    /// String literal with escapes resolved.
    Str(Arc<str>),

    Ident(Arc<str>),

    // === Keywords ===
    Class,
    Else,
    False,
    Final,
    If,
    InstanceOf,
    New,
    Null,
    Return,
    Static,
    This,
    True,
    Var,
    Void,

    // === Type Keywords ===
    BooleanType, // boolean
    ByteType,    // byte
    ShortType,   // short
    CharType,    // char
    IntType,     // int
    LongType,    // long
    FloatType,   // float
    DoubleType,  // double

    // === Symbols ===
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Semicolon, // ;
    Comma,     // ,
    Dot,       // .
    Question,  // ?
    Colon,     // :

    // === Operators ===
    Eq,       // =
    EqEq,     // ==
    NotEq,    // !=
    Lt,       // <
    LtEq,     // <=
    Gt,       // >
    GtEq,     // >=
    Shl,      // <<
    Shr,      // >>
    UShr,     // >>>
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Percent,  // %
    Bang,     // !
    Tilde,    // ~
    Amp,      // &
    AmpAmp,   // &&
    Pipe,     // |
    PipePipe, // ||
    Caret,    // ^

    Eof,

    /// A malformed token; a diagnostic has already been reported for it.
    Error,
}

impl TokenKind {
    /// The primitive kind named by a type keyword.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TokenKind::BooleanType => Some(PrimitiveKind::Boolean),
            TokenKind::ByteType => Some(PrimitiveKind::Byte),
            TokenKind::ShortType => Some(PrimitiveKind::Short),
            TokenKind::CharType => Some(PrimitiveKind::Char),
            TokenKind::IntType => Some(PrimitiveKind::Int),
            TokenKind::LongType => Some(PrimitiveKind::Long),
            TokenKind::FloatType => Some(PrimitiveKind::Float),
            TokenKind::DoubleType => Some(PrimitiveKind::Double),
            _ => None,
        }
    }

    /// Check if this token is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_)
                | TokenKind::Long(_)
                | TokenKind::IntMinMagnitude
                | TokenKind::LongMinMagnitude
                | TokenKind::Float(_)
                | TokenKind::Double(_)
                | TokenKind::Char(_)
                | TokenKind::Str(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// Check if this token can start an expression.
    pub fn can_start_expr(&self) -> bool {
        self.is_literal()
            || matches!(
                self,
                TokenKind::Ident(_)
                    | TokenKind::LParen
                    | TokenKind::Minus
                    | TokenKind::Plus
                    | TokenKind::Bang
                    | TokenKind::Tilde
                    | TokenKind::Error
            )
    }

    /// Get a display name for the token, used in "found `...`" messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) | TokenKind::IntMinMagnitude => "integer",
            TokenKind::Long(_) | TokenKind::LongMinMagnitude => "long",
            TokenKind::Float(_) => "float",
            TokenKind::Double(_) => "double",
            TokenKind::Char(_) => "char",
            TokenKind::Str(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Class => "class",
            TokenKind::Else => "else",
            TokenKind::False => "false",
            TokenKind::Final => "final",
            TokenKind::If => "if",
            TokenKind::InstanceOf => "instanceof",
            TokenKind::New => "new",
            TokenKind::Null => "null",
            TokenKind::Return => "return",
            TokenKind::Static => "static",
            TokenKind::This => "this",
            TokenKind::True => "true",
            TokenKind::Var => "var",
            TokenKind::Void => "void",
            TokenKind::BooleanType => "boolean",
            TokenKind::ByteType => "byte",
            TokenKind::ShortType => "short",
            TokenKind::CharType => "char",
            TokenKind::IntType => "int",
            TokenKind::LongType => "long",
            TokenKind::FloatType => "float",
            TokenKind::DoubleType => "double",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::UShr => ">>>",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::Caret => "^",
            TokenKind::Eof => "end of input",
            TokenKind::Error => "invalid token",
        }
    }
}

/// Token list ending with a single [`TokenKind::Eof`].
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    pub tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over token kinds, for tests and debugging.
    pub fn kinds(&self) -> impl Iterator<Item = &TokenKind> {
        self.tokens.iter().map(|t| &t.kind)
    }
}

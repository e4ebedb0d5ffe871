//! Raw tokens recognized by logos, before literal cooking.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*(?:[^*]|\*[^/])*\*/")]
pub(crate) enum RawToken {
    // === Keywords ===
    #[token("class")]
    Class,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("final")]
    Final,
    #[token("if")]
    If,
    #[token("instanceof")]
    InstanceOf,
    #[token("new")]
    New,
    #[token("null")]
    Null,
    #[token("return")]
    Return,
    #[token("static")]
    Static,
    #[token("this")]
    This,
    #[token("true")]
    True,
    #[token("var")]
    Var,
    #[token("void")]
    Void,

    // === Type keywords ===
    #[token("boolean")]
    BooleanType,
    #[token("byte")]
    ByteType,
    #[token("short")]
    ShortType,
    #[token("char")]
    CharType,
    #[token("int")]
    IntType,
    #[token("long")]
    LongType,
    #[token("float")]
    FloatType,
    #[token("double")]
    DoubleType,

    // === Symbols ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // === Operators ===
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    UShr,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("&&")]
    AmpAmp,
    #[token("|")]
    Pipe,
    #[token("||")]
    PipePipe,
    #[token("^")]
    Caret,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    HexInt,

    #[regex(r"0[bB][01_]+[lL]?")]
    BinInt,

    /// Decimal, or octal when written with a leading zero.
    #[regex(r"[0-9][0-9_]*[lL]?")]
    DecInt,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fFdD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[fFdD]")]
    Float,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedStr,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,

    #[regex(r"'([^'\\\n]|\\.)*")]
    UnterminatedChar,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

//! Lexer for the Snip snippet language.
//!
//! Tokenization runs in two layers:
//! - `raw_token`: a `logos` DFA recognizing token shapes, skipping whitespace
//!   and comments
//! - `cooker`: resolves literal values and reports malformed literals
//!
//! [`lex`] never fails: problems become [`Diagnostic`]s and the offending
//! token becomes [`TokenKind::Error`].

mod cook_escape;
mod cooker;
mod parse_helpers;
mod raw_token;
mod token;

use logos::Logos;
use snip_diagnostic::Diagnostic;
use snip_ir::Span;

use cooker::TokenCooker;
use raw_token::RawToken;
pub use token::{Token, TokenKind, TokenList};

/// Lex source text into tokens ending with [`TokenKind::Eof`].
pub fn lex(source: &str) -> (TokenList, Vec<Diagnostic>) {
    let mut errors = Vec::new();
    let mut result = TokenList::new();
    let mut cooker = TokenCooker::new(&mut errors);
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();
        let kind = match token_result {
            Ok(raw) => cooker.cook(raw, slice, span),
            Err(()) => cooker.invalid_character(slice, span),
        };
        result.tokens.push(Token::new(kind, span));
    }

    let eof = u32::try_from(source.len()).unwrap_or(u32::MAX);
    result.tokens.push(Token::new(TokenKind::Eof, Span::point(eof)));

    (result, errors)
}

//! Parser for Snip compilation units.
//!
//! A recursive descent parser that:
//! - Allocates all expressions in the unit's [`ExprArena`]
//! - Numbers local declarations in source order for frame layout
//! - Recovers at `;` and `}` so one pass reports every syntax error

mod expr;
mod items;
mod stmt;

use std::sync::Arc;

use snip_diagnostic::{expected_token, unclosed_delimiter, Diagnostic, ErrorCode};
use snip_ir::{Expr, ExprArena, ExprId, ExprKind, Span, Unit};
use snip_lexer::{lex, Token, TokenKind, TokenList};

/// Result of parsing a compilation unit.
#[derive(Debug)]
pub struct ParseResult {
    /// `None` when the text is too malformed to yield a class with a method.
    pub unit: Option<Unit>,
    /// Lexer and parser diagnostics, in source order per phase.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Lex and parse a compilation unit.
pub fn parse_unit(source: &str) -> ParseResult {
    let (tokens, mut diagnostics) = lex(source);
    let mut result = Parser::new(&tokens).parse_unit();
    diagnostics.append(&mut result.diagnostics);
    result.diagnostics = diagnostics;
    result
}

static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

/// Parser state.
pub struct Parser<'t> {
    tokens: &'t [Token],
    arena: ExprArena,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    /// Local declarations seen so far; the next one gets this number.
    local_count: u32,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t TokenList) -> Self {
        Parser {
            tokens: &tokens.tokens,
            arena: ExprArena::new(),
            pos: 0,
            diagnostics: Vec::new(),
            local_count: 0,
        }
    }

    /// Parse a complete compilation unit.
    pub fn parse_unit(mut self) -> ParseResult {
        let unit = match self.unit() {
            Ok(unit) => Some(unit),
            Err(diag) => {
                self.diagnostics.push(diag);
                None
            }
        };
        ParseResult {
            unit,
            diagnostics: self.diagnostics,
        }
    }

    /// Parse a single expression followed by end of input.
    pub fn parse_expression(mut self) -> (ExprId, ExprArena, Vec<Diagnostic>) {
        let expr = match self.expression() {
            Ok(id) => {
                if !self.at_end() {
                    let diag = snip_diagnostic::unexpected_token(
                        self.current_span(),
                        "end of input",
                        &self.found(),
                    );
                    self.diagnostics.push(diag);
                }
                id
            }
            Err(diag) => {
                self.diagnostics.push(diag);
                self.arena
                    .alloc(Expr::new(ExprKind::Error, self.current_span()))
            }
        };
        (expr, self.arena, self.diagnostics)
    }

    // ===== Token access =====

    fn current(&self) -> &'t Token {
        self.tokens
            .get(self.pos)
            .or(self.tokens.last())
            .unwrap_or(&EOF_TOKEN)
    }

    fn current_kind(&self) -> &'t TokenKind {
        &self.current().kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn peek_kind(&self, offset: usize) -> &'t TokenKind {
        self.tokens
            .get(self.pos + offset)
            .or(self.tokens.last())
            .map_or(&EOF_TOKEN.kind, |t| &t.kind)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Consume the current token and return its span.
    fn advance(&mut self) -> Span {
        let span = self.current_span();
        if !self.at_end() {
            self.pos += 1;
        }
        span
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    /// Consume the current token if it matches.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Span, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(expected_token(
                self.current_span(),
                kind.display_name(),
                &self.found(),
            ))
        }
    }

    /// Expect the closing delimiter of a pair opened at `open`.
    fn expect_closing(
        &mut self,
        open: Span,
        kind: &TokenKind,
        delimiter: char,
    ) -> Result<Span, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.at_end() {
            Err(unclosed_delimiter(open, self.current_span(), delimiter))
        } else {
            Err(expected_token(
                self.current_span(),
                kind.display_name(),
                &self.found(),
            ))
        }
    }

    fn ident(&mut self, what: &str) -> Result<(Arc<str>, Span), Diagnostic> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let name = Arc::clone(name);
            return Ok((name, self.advance()));
        }
        Err(Diagnostic::error(ErrorCode::E1004)
            .with_message(format!("expected {what}, found `{}`", self.found()))
            .with_label(self.current_span(), format!("expected {what}")))
    }

    /// Source-like text of the current token for "found `...`" messages.
    fn found(&self) -> String {
        match self.current_kind() {
            TokenKind::Ident(name) => name.to_string(),
            TokenKind::Int(value) => value.to_string(),
            TokenKind::Long(value) => format!("{value}L"),
            TokenKind::Char(c) => format!("'{}'", c.escape_default()),
            TokenKind::Str(_) => "string literal".to_string(),
            other => other.display_name().to_string(),
        }
    }
}

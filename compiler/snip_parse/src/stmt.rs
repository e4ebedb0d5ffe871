//! Statement parsing.

use std::sync::Arc;

use snip_diagnostic::{expected_token, Diagnostic};
use snip_ir::{ensure_sufficient_stack, Span, Stmt, StmtKind, TypeRef};
use snip_lexer::TokenKind;

use crate::Parser;

impl Parser<'_> {
    /// Parse statements up to (not including) a closing `}` or end of input.
    ///
    /// With `allow_tail`, a final expression without `;` becomes
    /// [`StmtKind::Tail`], the implicit result of the method.
    pub(crate) fn statements(&mut self, allow_tail: bool) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            match self.statement(allow_tail) {
                Ok(stmt) => stmts.push(stmt),
                Err(diag) => {
                    self.diagnostics.push(diag);
                    self.recover_to_statement_end();
                }
            }
        }
        stmts
    }

    fn statement(&mut self, allow_tail: bool) -> Result<Stmt, Diagnostic> {
        ensure_sufficient_stack(|| self.statement_inner(allow_tail))
    }

    fn statement_inner(&mut self, allow_tail: bool) -> Result<Stmt, Diagnostic> {
        let start = self.current_span();
        match self.current_kind() {
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                let end = self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::new(StmtKind::Return(value), start.merge(end)))
            }
            TokenKind::Var => {
                self.advance();
                self.local(start, None)
            }
            TokenKind::If => self.if_statement(),
            TokenKind::LBrace => {
                self.advance();
                let stmts = self.statements(false);
                let end = self.expect_closing(start, &TokenKind::RBrace, '{')?;
                Ok(Stmt::new(StmtKind::Block(stmts), start.merge(end)))
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::new(StmtKind::Block(Vec::new()), start))
            }
            _ if self.at_typed_local() => {
                let (ty, _) = self.parse_type()?;
                self.local(start, Some(ty))
            }
            _ => {
                let expr = self.expression()?;
                let span = start.merge(self.arena.span(expr));
                if self.check(&TokenKind::Semicolon) {
                    let end = self.advance();
                    Ok(Stmt::new(StmtKind::Expr(expr), span.merge(end)))
                } else if allow_tail && matches!(self.current_kind(), TokenKind::RBrace | TokenKind::Eof) {
                    Ok(Stmt::new(StmtKind::Tail(expr), span))
                } else {
                    Err(expected_token(self.current_span(), ";", &self.found()))
                }
            }
        }
    }

    /// `name = init;` after `var` or a declared type.
    fn local(&mut self, start: Span, ty: Option<TypeRef>) -> Result<Stmt, Diagnostic> {
        let (name, _): (Arc<str>, Span) = self.ident("variable name")?;
        self.expect(&TokenKind::Eq)?;
        let init = self.expression()?;
        let end = self.expect(&TokenKind::Semicolon)?;

        let decl = self.local_count;
        self.local_count += 1;
        Ok(Stmt::new(
            StmtKind::Local {
                decl,
                name,
                ty,
                init,
            },
            start.merge(end),
        ))
    }

    /// `if (cond) stmt (else stmt)?`
    fn if_statement(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.advance();
        let open = self.expect(&TokenKind::LParen)?;
        let cond = self.expression()?;
        self.expect_closing(open, &TokenKind::RParen, '(')?;

        let then_branch = self.statement(false)?;
        let mut span = start.merge(then_branch.span);
        let else_branch = if self.eat(&TokenKind::Else) {
            let stmt = self.statement(false)?;
            span = span.merge(stmt.span);
            Some(Box::new(stmt))
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                cond,
                then_branch: Box::new(then_branch),
                else_branch,
            },
            span,
        ))
    }

    /// Skip past the next `;` at this nesting level, or up to a `}` that
    /// closes the enclosing block.
    fn recover_to_statement_end(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }
}

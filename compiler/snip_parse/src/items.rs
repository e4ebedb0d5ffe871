//! Unit-level parsing: class header, constant fields, the method, types.

use std::sync::Arc;

use snip_diagnostic::{unexpected_token, Diagnostic, ErrorCode};
use snip_ir::{FieldDecl, MethodDecl, ParamDecl, Span, TypeRef, Unit};
use snip_lexer::TokenKind;

use crate::Parser;

enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

impl Parser<'_> {
    /// `final? class Name { member* }`
    pub(crate) fn unit(&mut self) -> Result<Unit, Diagnostic> {
        self.eat(&TokenKind::Final);
        self.expect(&TokenKind::Class)?;
        let (name, name_span) = self.ident("class name")?;
        let open = self.expect(&TokenKind::LBrace)?;

        let mut fields = Vec::new();
        let mut method: Option<MethodDecl> = None;
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            match self.member() {
                Ok(Member::Field(field)) => fields.push(field),
                Ok(Member::Method(decl)) => {
                    if method.is_some() {
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E1006)
                                .with_message("a unit declares exactly one method")
                                .with_label(decl.span, "second method declared here"),
                        );
                    } else {
                        method = Some(decl);
                    }
                }
                Err(diag) => {
                    self.diagnostics.push(diag);
                    self.recover_to_member_end();
                }
            }
        }
        self.expect_closing(open, &TokenKind::RBrace, '{')?;

        if !self.at_end() {
            self.diagnostics.push(unexpected_token(
                self.current_span(),
                "end of input",
                &self.found(),
            ));
        }

        let Some(method) = method else {
            return Err(Diagnostic::error(ErrorCode::E1006)
                .with_message(format!("unit `{name}` declares no method"))
                .with_label(name_span, "expected a static method in this class"));
        };

        Ok(Unit {
            name,
            name_span,
            fields,
            method,
            local_count: self.local_count,
            arena: std::mem::take(&mut self.arena),
        })
    }

    /// `static final Type name (= init)? ;` or `static Type name(params) { body }`
    fn member(&mut self) -> Result<Member, Diagnostic> {
        let start = self.expect(&TokenKind::Static)?;

        if self.eat(&TokenKind::Final) {
            let (ty, _) = self.parse_type()?;
            let (name, _) = self.ident("constant name")?;
            let init = if self.eat(&TokenKind::Eq) {
                Some(self.expression()?)
            } else {
                None
            };
            let end = self.expect(&TokenKind::Semicolon)?;
            return Ok(Member::Field(FieldDecl {
                name,
                ty,
                init,
                span: start.merge(end),
            }));
        }

        let (result, _) = self.parse_type()?;
        let (name, _) = self.ident("method name")?;
        let open = self.expect(&TokenKind::LParen)?;
        let params = self.params()?;
        self.expect_closing(open, &TokenKind::RParen, '(')?;

        let brace = self.expect(&TokenKind::LBrace)?;
        let body = self.statements(true);
        let end = self.expect_closing(brace, &TokenKind::RBrace, '{')?;

        Ok(Member::Method(MethodDecl {
            name,
            result,
            params,
            body,
            span: start.merge(end),
        }))
    }

    fn params(&mut self) -> Result<Vec<ParamDecl>, Diagnostic> {
        let mut params = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            let (ty, ty_span) = self.parse_type()?;
            let (name, name_span) = self.ident("parameter name")?;
            params.push(ParamDecl {
                name,
                ty,
                span: ty_span.merge(name_span),
            });
            if !self.eat(&TokenKind::Comma) {
                return Ok(params);
            }
        }
    }

    /// A primitive keyword or a dotted qualified name.
    pub(crate) fn parse_type(&mut self) -> Result<(TypeRef, Span), Diagnostic> {
        if let Some(kind) = self.current_kind().primitive_kind() {
            let span = self.advance();
            return Ok((TypeRef::Primitive(kind), span));
        }

        let TokenKind::Ident(first) = self.current_kind() else {
            return Err(Diagnostic::error(ErrorCode::E1005)
                .with_message(format!("expected type, found `{}`", self.found()))
                .with_label(self.current_span(), "expected type"));
        };
        let mut name = first.to_string();
        let mut span = self.advance();

        while self.check(&TokenKind::Dot) && matches!(self.peek_kind(1), TokenKind::Ident(_)) {
            self.advance();
            let (segment, segment_span) = self.ident("type name")?;
            name.push('.');
            name.push_str(&segment);
            span = span.merge(segment_span);
        }

        Ok((TypeRef::Named(Arc::from(name)), span))
    }

    /// Whether the tokens ahead read `Type name`, starting a typed local.
    pub(crate) fn at_typed_local(&self) -> bool {
        if self.current_kind().primitive_kind().is_some() {
            return true;
        }
        if !matches!(self.current_kind(), TokenKind::Ident(_)) {
            return false;
        }
        let mut offset = 1;
        while matches!(self.peek_kind(offset), TokenKind::Dot)
            && matches!(self.peek_kind(offset + 1), TokenKind::Ident(_))
        {
            offset += 2;
        }
        matches!(self.peek_kind(offset), TokenKind::Ident(_))
    }

    /// Skip to the end of a malformed member: past its `;`, or past the
    /// `}` closing its body. Stops before the class's closing brace.
    fn recover_to_member_end(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
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

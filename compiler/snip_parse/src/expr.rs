//! Expression parsing: operators, casts, member access and calls.
//!
//! Precedence, loosest first: assignment, `?:`, then the binary levels of
//! [`BinaryOp::precedence`] with `instanceof` alongside the relational
//! operators, then prefix operators and casts, then postfix member access.

use snip_diagnostic::{expected_expression, Diagnostic, ErrorCode};
use snip_ir::{
    ensure_sufficient_stack, BinaryOp, Expr, ExprId, ExprKind, Literal, Span, TypeRef, UnaryOp,
};
use snip_lexer::TokenKind;

use crate::Parser;

/// Binding strength of `instanceof`, the relational level.
const INSTANCEOF_PRECEDENCE: u8 = 7;

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::PipePipe => BinaryOp::Or,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::UShr => BinaryOp::UShr,
        _ => return None,
    })
}

/// Tokens that may follow `(Name)` for it to read as a reference cast.
///
/// `+` and `-` are excluded so `(a) - b` stays a subtraction.
fn starts_cast_operand(kind: &TokenKind) -> bool {
    kind.is_literal()
        || matches!(
            kind,
            TokenKind::Ident(_) | TokenKind::LParen | TokenKind::Bang | TokenKind::Tilde
        )
}

impl Parser<'_> {
    /// Parse any expression.
    pub(crate) fn expression(&mut self) -> Result<ExprId, Diagnostic> {
        ensure_sufficient_stack(|| self.assignment())
    }

    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc(Expr::new(kind, span))
    }

    fn span_of(&self, id: ExprId) -> Span {
        self.arena.span(id)
    }

    /// `target = value`, right-associative.
    fn assignment(&mut self) -> Result<ExprId, Diagnostic> {
        let target = self.conditional()?;
        if !self.eat(&TokenKind::Eq) {
            return Ok(target);
        }
        let value = self.expression()?;
        let span = self.span_of(target).merge(self.span_of(value));
        Ok(self.alloc(ExprKind::Assign { target, value }, span))
    }

    /// `cond ? then_expr : else_expr`
    fn conditional(&mut self) -> Result<ExprId, Diagnostic> {
        let cond = self.binary(1)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(cond);
        }
        let then_expr = self.expression()?;
        self.expect(&TokenKind::Colon)?;
        let else_expr = ensure_sufficient_stack(|| self.conditional())?;
        let span = self.span_of(cond).merge(self.span_of(else_expr));
        Ok(self.alloc(
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            },
            span,
        ))
    }

    /// Left-associative binary operators binding at least as tight as
    /// `min_prec`.
    fn binary(&mut self, min_prec: u8) -> Result<ExprId, Diagnostic> {
        let mut left = self.unary()?;
        loop {
            if self.check(&TokenKind::InstanceOf) && INSTANCEOF_PRECEDENCE >= min_prec {
                self.advance();
                let (ty, ty_span) = self.parse_type()?;
                let span = self.span_of(left).merge(ty_span);
                left = self.alloc(ExprKind::InstanceOf { operand: left, ty }, span);
                continue;
            }

            let Some(op) = binary_op(self.current_kind()) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let right = ensure_sufficient_stack(|| self.binary(prec + 1))?;
            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(ExprKind::Binary { op, left, right }, span);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<ExprId, Diagnostic> {
        ensure_sufficient_stack(|| self.unary_inner())
    }

    fn unary_inner(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.current_span();
        let op = match self.current_kind() {
            TokenKind::Minus => match self.peek_kind(1) {
                TokenKind::IntMinMagnitude => {
                    self.advance();
                    let end = self.advance();
                    return Ok(self.alloc(
                        ExprKind::Literal(Literal::Int(i32::MIN)),
                        start.merge(end),
                    ));
                }
                TokenKind::LongMinMagnitude => {
                    self.advance();
                    let end = self.advance();
                    return Ok(self.alloc(
                        ExprKind::Literal(Literal::Long(i64::MIN)),
                        start.merge(end),
                    ));
                }
                _ => Some(UnaryOp::Neg),
            },
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = self.unary()?;
            let span = start.merge(self.span_of(operand));
            return Ok(self.alloc(ExprKind::Unary { op, operand }, span));
        }

        if self.check(&TokenKind::LParen) {
            if let Some(cast) = self.cast(start)? {
                return Ok(cast);
            }
        }

        self.postfix()
    }

    /// `(int) operand` or `(com.acme.Entity) operand`; `None` when the
    /// parenthesis opens a grouped expression instead.
    fn cast(&mut self, start: Span) -> Result<Option<ExprId>, Diagnostic> {
        if let Some(kind) = self.peek_kind(1).primitive_kind() {
            if !matches!(self.peek_kind(2), TokenKind::RParen) {
                return Ok(None);
            }
            self.advance();
            self.advance();
            self.advance();
            let operand = self.unary()?;
            let span = start.merge(self.span_of(operand));
            return Ok(Some(self.alloc(
                ExprKind::Cast {
                    ty: TypeRef::Primitive(kind),
                    operand,
                },
                span,
            )));
        }

        if !matches!(self.peek_kind(1), TokenKind::Ident(_)) {
            return Ok(None);
        }
        let mut offset = 2;
        while matches!(self.peek_kind(offset), TokenKind::Dot)
            && matches!(self.peek_kind(offset + 1), TokenKind::Ident(_))
        {
            offset += 2;
        }
        if !matches!(self.peek_kind(offset), TokenKind::RParen)
            || !starts_cast_operand(self.peek_kind(offset + 1))
        {
            return Ok(None);
        }

        self.advance();
        let (ty, _) = self.parse_type()?;
        self.expect(&TokenKind::RParen)?;
        let operand = self.unary()?;
        let span = start.merge(self.span_of(operand));
        Ok(Some(self.alloc(ExprKind::Cast { ty, operand }, span)))
    }

    /// `primary ('.' name ('(' args ')')?)*`
    fn postfix(&mut self) -> Result<ExprId, Diagnostic> {
        let mut expr = self.primary()?;
        while self.eat(&TokenKind::Dot) {
            let (name, name_span) = self.ident("member name")?;
            let start = self.span_of(expr);
            if self.check(&TokenKind::LParen) {
                let open = self.advance();
                let args = self.arguments()?;
                let end = self.expect_closing(open, &TokenKind::RParen, '(')?;
                expr = self.alloc(
                    ExprKind::MethodCall {
                        receiver: expr,
                        method: name,
                        args,
                    },
                    start.merge(end),
                );
            } else {
                expr = self.alloc(
                    ExprKind::Field {
                        receiver: expr,
                        name,
                    },
                    start.merge(name_span),
                );
            }
        }
        Ok(expr)
    }

    fn arguments(&mut self) -> Result<Vec<ExprId>, Diagnostic> {
        let mut args = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if !self.eat(&TokenKind::Comma) {
                return Ok(args);
            }
        }
    }

    fn primary(&mut self) -> Result<ExprId, Diagnostic> {
        let span = self.current_span();
        let literal = match self.current_kind() {
            TokenKind::Int(v) => Literal::Int(*v),
            TokenKind::Long(v) => Literal::Long(*v),
            TokenKind::Float(bits) => Literal::Float(f32::from_bits(*bits)),
            TokenKind::Double(bits) => Literal::Double(f64::from_bits(*bits)),
            TokenKind::Char(c) => Literal::Char(*c),
            TokenKind::Str(s) => Literal::Str(s.clone()),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Null => Literal::Null,

            TokenKind::IntMinMagnitude | TokenKind::LongMinMagnitude => {
                return Err(Diagnostic::error(ErrorCode::E0003)
                    .with_message("integer number too large")
                    .with_label(span, "only valid as the operand of unary `-`"));
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                if self.check(&TokenKind::LParen) {
                    return Err(Diagnostic::error(ErrorCode::E1001)
                        .with_message(format!("cannot call `{name}` without a receiver"))
                        .with_label(span, "methods are called as `receiver.name(...)`"));
                }
                return Ok(self.alloc(ExprKind::Ident(name), span));
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect_closing(span, &TokenKind::RParen, '(')?;
                return Ok(inner);
            }
            TokenKind::This => {
                return Err(Diagnostic::error(ErrorCode::E1002)
                    .with_message("`this` is not available in a static method")
                    .with_label(span, "no enclosing instance"));
            }
            TokenKind::Error => {
                self.advance();
                return Ok(self.alloc(ExprKind::Error, span));
            }
            _ => return Err(expected_expression(span, &self.found())),
        };
        self.advance();
        Ok(self.alloc(ExprKind::Literal(literal), span))
    }
}

//! Expression nodes and the arena that owns them.

use std::fmt;
use std::sync::Arc;

use super::operators::{BinaryOp, UnaryOp};
use crate::{Span, TypeRef};

/// Index of an expression in an [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        ExprId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Literal constants as written in source.
#[derive(Clone, PartialEq, Debug)]
pub enum Literal {
    Null,
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Arc<str>),
}

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression variants.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    Literal(Literal),

    /// A bare name: parameter, local variable or constant.
    Ident(Arc<str>),

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    Unary {
        op: UnaryOp,
        operand: ExprId,
    },

    /// `cond ? then_expr : else_expr`
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },

    /// `receiver.name` without a call.
    Field {
        receiver: ExprId,
        name: Arc<str>,
    },

    /// `receiver.method(args)`
    MethodCall {
        receiver: ExprId,
        method: Arc<str>,
        args: Vec<ExprId>,
    },

    /// `(ty) operand`
    Cast {
        ty: TypeRef,
        operand: ExprId,
    },

    /// `operand instanceof ty`
    InstanceOf {
        operand: ExprId,
        ty: TypeRef,
    },

    /// `target = value`; the target must resolve to a variable.
    Assign {
        target: ExprId,
        value: ExprId,
    },

    /// Placeholder produced during error recovery.
    Error,
}

/// Arena owning every expression of one unit.
#[derive(Clone, Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        ExprArena { exprs: Vec::new() }
    }

    /// Allocate an expression and return its id.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = u32::try_from(self.exprs.len()).unwrap_or(u32::MAX);
        self.exprs.push(expr);
        ExprId::new(id)
    }

    /// Get an expression by id.
    ///
    /// Ids are only produced by [`alloc`](Self::alloc) on the same arena.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.get(id).kind
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.get(id).span
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Iterate over all expressions with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs
            .iter()
            .enumerate()
            .map(|(i, expr)| (ExprId::new(u32::try_from(i).unwrap_or(u32::MAX)), expr))
    }
}

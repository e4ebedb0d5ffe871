//! Syntax tree of a compilation unit.
//!
//! A unit is a `final class` with constant fields and exactly one static
//! method:
//!
//! ```text
//! final class Snippet$3 {
//!     static final String x = "Hello";
//!     static final com.acme.Entity e;
//!     static boolean evaluate(String a) {
//!         return a.equals(x);
//!     }
//! }
//! ```
//!
//! Statements are small and owned (`Box` for nested branches); expressions
//! live in the unit's [`ExprArena`].

mod expr;
mod operators;

use std::sync::Arc;

pub use expr::{Expr, ExprArena, ExprId, ExprKind, Literal};
pub use operators::{BinaryOp, UnaryOp};

use crate::{Span, TypeRef};

/// A parsed compilation unit.
#[derive(Clone, Debug)]
pub struct Unit {
    pub name: Arc<str>,
    pub name_span: Span,
    pub fields: Vec<FieldDecl>,
    pub method: MethodDecl,
    /// Number of local variable declarations in the method body.
    pub local_count: u32,
    pub arena: ExprArena,
}

/// `static final Type name = init;` or, without initializer, an external
/// binding supplied when the unit is loaded.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: Arc<str>,
    pub ty: TypeRef,
    pub init: Option<ExprId>,
    pub span: Span,
}

impl FieldDecl {
    /// Whether the value comes from the loader rather than an initializer.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.init.is_none()
    }
}

/// `static Result name(params) { body }`
#[derive(Clone, Debug)]
pub struct MethodDecl {
    pub name: Arc<str>,
    pub result: TypeRef,
    pub params: Vec<ParamDecl>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub name: Arc<str>,
    pub ty: TypeRef,
    pub span: Span,
}

/// Statement node.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    /// `return;` or `return expr;`
    Return(Option<ExprId>),

    /// `var name = init;` or `Type name = init;`
    ///
    /// `decl` numbers declarations in source order across the whole body.
    Local {
        decl: u32,
        name: Arc<str>,
        ty: Option<TypeRef>,
        init: ExprId,
    },

    /// `expr;`
    Expr(ExprId),

    /// A trailing expression without `;` closing the method body; its value
    /// is the method's result.
    Tail(ExprId),

    If {
        cond: ExprId,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    Block(Vec<Stmt>),
}

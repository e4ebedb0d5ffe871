//! Snip IR - shared data structures for the Snip evaluator.
//!
//! This crate contains the types every other phase agrees on:
//! - [`Span`] for byte ranges into a generated compilation unit
//! - [`TypeRef`] for declared parameter, result and constant types
//! - The syntax tree of a compilation unit ([`ast`]), with expressions
//!   flattened into an [`ExprArena`] and addressed by [`ExprId`]
//! - The name-resolution side table produced by the compiler ([`resolve`])
//!
//! # Design Philosophy
//!
//! - **Flatten expressions**: no `Box<Expr>`, children are `ExprId(u32)` indices
//! - **Resolve once**: identifiers are mapped to frame slots or constant fields
//!   at compile time so the interpreter never looks names up by string

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod ident;
pub mod resolve;
mod span;
mod stack;
mod ty;

pub use ast::{
    BinaryOp, Expr, ExprArena, ExprId, ExprKind, FieldDecl, Literal, MethodDecl, ParamDecl, Stmt,
    StmtKind, UnaryOp, Unit,
};
pub use ident::{is_keyword, is_valid_identifier, KEYWORDS};
pub use resolve::{Binding, ResolutionTable};
pub use span::{Span, SpanError};
pub use stack::ensure_sufficient_stack;
pub use ty::{PrimitiveKind, TypeRef};

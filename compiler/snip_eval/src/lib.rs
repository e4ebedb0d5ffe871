//! Snip Eval - runtime for compiled snippet units.
//!
//! This crate provides the values snippets compute with and the
//! tree-walking interpreter that runs a unit's method.
//!
//! # Architecture
//!
//! - [`Value`]: unboxed primitives, shared strings and host objects
//! - [`HostClass`] / [`ClassBuilder`]: reference types implemented in Rust
//! - [`LinkedTypes`]: the classes a loaded unit refers to, by name
//! - `evaluate_binary` / `evaluate_unary`: direct enum-based operator dispatch
//! - `call_method` / `get_field`: built-in and host member dispatch
//! - [`Interpreter`]: executes statements over a per-invocation frame

mod class;
mod conversion;
pub mod errors;
mod host;
mod interpreter;
mod methods;
mod operators;
mod unary_operators;
mod value;

pub use class::{BuiltinClass, ClassRef, LinkedTypes};
pub use conversion::{
    assign_convert, cast, convert_primitive, instance_of, is_assignable, is_type_assignable,
};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use host::{ClassBuilder, HostClass, HostData, HostType, ObjectRef};
pub use interpreter::Interpreter;
pub use methods::{call_method, get_field, BUILTIN_METHODS};
pub use operators::evaluate_binary;
pub use unary_operators::evaluate_unary;
pub use value::Value;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

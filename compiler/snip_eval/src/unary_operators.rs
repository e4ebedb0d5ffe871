//! Unary operator implementations for the interpreter.
//!
//! `-`, `+` and `~` apply unary numeric promotion: `byte`, `short` and
//! `char` become `int`. Negating the minimum `int` or `long` wraps to itself.

use snip_ir::UnaryOp;

use crate::errors::{invalid_unary_op, EvalResult};
use crate::value::Value;

/// Evaluate a unary operation.
#[allow(
    clippy::needless_pass_by_value,
    reason = "callers hand over freshly evaluated operands"
)]
pub fn evaluate_unary(value: Value, op: UnaryOp) -> EvalResult {
    match (op, &value) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),

        (UnaryOp::Neg, Value::Long(n)) => Ok(Value::Long(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Neg, Value::Double(f)) => Ok(Value::Double(-f)),
        (UnaryOp::Neg, other) => promote_int(other)
            .map(|n| Value::Int(n.wrapping_neg()))
            .ok_or_else(|| invalid_unary_op(op, &value)),

        (UnaryOp::Plus, Value::Long(_) | Value::Float(_) | Value::Double(_)) => Ok(value.clone()),
        (UnaryOp::Plus, other) => promote_int(other)
            .map(Value::Int)
            .ok_or_else(|| invalid_unary_op(op, &value)),

        (UnaryOp::BitNot, Value::Long(n)) => Ok(Value::Long(!n)),
        (UnaryOp::BitNot, other) => promote_int(other)
            .map(|n| Value::Int(!n))
            .ok_or_else(|| invalid_unary_op(op, &value)),

        (UnaryOp::Not, _) => Err(invalid_unary_op(op, &value)),
    }
}

/// Unary numeric promotion of the `int`-sized integral kinds.
fn promote_int(value: &Value) -> Option<i32> {
    match value {
        Value::Byte(n) => Some(i32::from(*n)),
        Value::Short(n) => Some(i32::from(*n)),
        Value::Char(c) => i32::try_from(u32::from(*c)).ok(),
        Value::Int(n) => Some(*n),
        _ => None,
    }
}

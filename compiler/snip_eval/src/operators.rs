//! Binary operator implementations for the interpreter.
//!
//! Operands go through binary numeric promotion first: if either side is
//! `double` both are `double`, else `float`, else `long`, else `int`. The
//! smaller integral kinds (`byte`, `short`, `char`) never survive
//! arithmetic. Integer `+ - *` wrap in two's complement, as does
//! `MIN / -1`; only `/` and `%` by zero fail.
//!
//! `&&` and `||` are short-circuited by the interpreter; they reach this
//! module only with two evaluated booleans.

use snip_ir::{BinaryOp, PrimitiveKind};

use crate::errors::{division_by_zero, invalid_binary_op, EvalResult};
use crate::value::Value;

/// Division with zero guard; `op` only runs for a non-zero divisor.
#[inline]
fn checked_div<T, F>(is_zero: bool, op: F, wrap: fn(T) -> Value) -> EvalResult
where
    F: FnOnce() -> T,
{
    if is_zero {
        Err(division_by_zero())
    } else {
        Ok(wrap(op()))
    }
}

/// Operand pair after binary numeric promotion.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Promoted {
    Int(i32, i32),
    Long(i64, i64),
    Float(f32, f32),
    Double(f64, f64),
}

/// Apply binary numeric promotion, or `None` if either side is not numeric.
fn promote(left: &Value, right: &Value) -> Option<Promoted> {
    let lk = left.primitive_kind().filter(|k| k.is_numeric())?;
    let rk = right.primitive_kind().filter(|k| k.is_numeric())?;
    let either = |kind| lk == kind || rk == kind;

    let promoted = if either(PrimitiveKind::Double) {
        Promoted::Double(left.as_f64()?, right.as_f64()?)
    } else if either(PrimitiveKind::Float) {
        Promoted::Float(to_f32(left)?, to_f32(right)?)
    } else if either(PrimitiveKind::Long) {
        Promoted::Long(left.as_integral()?, right.as_integral()?)
    } else {
        Promoted::Int(to_i32(left)?, to_i32(right)?)
    };
    Some(promoted)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "integral to float conversion rounds, as the language specifies"
)]
fn to_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Float(v) => Some(*v),
        other => other.as_integral().map(|v| v as f32),
    }
}

/// Integral value of an `int`-sized or smaller kind.
fn to_i32(value: &Value) -> Option<i32> {
    match value {
        Value::Long(_) => None,
        other => other.as_integral().and_then(|v| i32::try_from(v).ok()),
    }
}

// Direct Dispatch Function

/// Evaluate a binary operation on two evaluated operands.
#[allow(
    clippy::needless_pass_by_value,
    reason = "callers hand over freshly evaluated operands"
)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    let result = match op {
        BinaryOp::Add if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) => {
            Some(Ok(Value::string(format!("{left}{right}"))))
        }
        BinaryOp::Eq => equality(&left, &right).map(|eq| Ok(Value::Bool(eq))),
        BinaryOp::NotEq => equality(&left, &right).map(|eq| Ok(Value::Bool(!eq))),
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => eval_shift(&left, &right, op),
        _ => match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
            _ => match promote(&left, &right) {
                Some(Promoted::Int(a, b)) => eval_int_binary(a, b, op),
                Some(Promoted::Long(a, b)) => eval_long_binary(a, b, op),
                Some(Promoted::Float(a, b)) => eval_float_binary(a, b, op),
                Some(Promoted::Double(a, b)) => eval_double_binary(a, b, op),
                None => None,
            },
        },
    };
    result.unwrap_or_else(|| Err(invalid_binary_op(op, &left, &right)))
}

/// `==` semantics, or `None` when the operands cannot be compared.
///
/// Numbers compare after promotion, booleans by value, strings by content,
/// host objects by identity. `null` equals only `null`. A boolean never
/// compares with a number.
fn equality(left: &Value, right: &Value) -> Option<bool> {
    if let Some(promoted) = promote(left, right) {
        #[allow(clippy::float_cmp, reason = "`==` on floating values is exact")]
        let eq = match promoted {
            Promoted::Int(a, b) => a == b,
            Promoted::Long(a, b) => a == b,
            Promoted::Float(a, b) => a == b,
            Promoted::Double(a, b) => a == b,
        };
        return Some(eq);
    }
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a == b),
        (Value::Null, Value::Null) => Some(true),
        (Value::Str(a), Value::Str(b)) => Some(a == b),
        (Value::Object(a), Value::Object(b)) => Some(a.ptr_eq(b)),
        // Both primitive but not promotable: boolean against a number.
        (l, r) if l.primitive_kind().is_some() && r.primitive_kind().is_some() => None,
        _ => Some(false),
    }
}

// Type-Specific Evaluation Functions
//
// Each returns `None` when the operator does not apply to the operand type.

fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> Option<EvalResult> {
    let value = match op {
        BinaryOp::And | BinaryOp::BitAnd => a & b,
        BinaryOp::Or | BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        _ => return None,
    };
    Some(Ok(Value::Bool(value)))
}

fn eval_int_binary(a: i32, b: i32, op: BinaryOp) -> Option<EvalResult> {
    let result = match op {
        BinaryOp::Add => Ok(Value::Int(a.wrapping_add(b))),
        BinaryOp::Sub => Ok(Value::Int(a.wrapping_sub(b))),
        BinaryOp::Mul => Ok(Value::Int(a.wrapping_mul(b))),
        BinaryOp::Div => checked_div(b == 0, || a.wrapping_div(b), Value::Int),
        BinaryOp::Rem => checked_div(b == 0, || a.wrapping_rem(b), Value::Int),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::BitAnd => Ok(Value::Int(a & b)),
        BinaryOp::BitOr => Ok(Value::Int(a | b)),
        BinaryOp::BitXor => Ok(Value::Int(a ^ b)),
        _ => return None,
    };
    Some(result)
}

fn eval_long_binary(a: i64, b: i64, op: BinaryOp) -> Option<EvalResult> {
    let result = match op {
        BinaryOp::Add => Ok(Value::Long(a.wrapping_add(b))),
        BinaryOp::Sub => Ok(Value::Long(a.wrapping_sub(b))),
        BinaryOp::Mul => Ok(Value::Long(a.wrapping_mul(b))),
        BinaryOp::Div => checked_div(b == 0, || a.wrapping_div(b), Value::Long),
        BinaryOp::Rem => checked_div(b == 0, || a.wrapping_rem(b), Value::Long),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::BitAnd => Ok(Value::Long(a & b)),
        BinaryOp::BitOr => Ok(Value::Long(a | b)),
        BinaryOp::BitXor => Ok(Value::Long(a ^ b)),
        _ => return None,
    };
    Some(result)
}

/// IEEE arithmetic: division by zero yields an infinity or NaN.
fn eval_float_binary(a: f32, b: f32, op: BinaryOp) -> Option<EvalResult> {
    let value = match op {
        BinaryOp::Add => Value::Float(a + b),
        BinaryOp::Sub => Value::Float(a - b),
        BinaryOp::Mul => Value::Float(a * b),
        BinaryOp::Div => Value::Float(a / b),
        BinaryOp::Rem => Value::Float(a % b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        _ => return None,
    };
    Some(Ok(value))
}

fn eval_double_binary(a: f64, b: f64, op: BinaryOp) -> Option<EvalResult> {
    let value = match op {
        BinaryOp::Add => Value::Double(a + b),
        BinaryOp::Sub => Value::Double(a - b),
        BinaryOp::Mul => Value::Double(a * b),
        BinaryOp::Div => Value::Double(a / b),
        BinaryOp::Rem => Value::Double(a % b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        _ => return None,
    };
    Some(Ok(value))
}

/// Shifts take the type of the (promoted) left operand; the count is masked
/// to 5 bits for `int` and 6 bits for `long`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "shift counts are masked and unsigned shifts reinterpret bits"
)]
fn eval_shift(left: &Value, right: &Value, op: BinaryOp) -> Option<EvalResult> {
    let count = right.as_integral()?;
    let value = if let Value::Long(a) = left {
        let n = (count & 0x3f) as u32;
        Value::Long(match op {
            BinaryOp::Shl => a.wrapping_shl(n),
            BinaryOp::Shr => a.wrapping_shr(n),
            _ => ((*a as u64) >> n) as i64,
        })
    } else {
        let a = to_i32(left)?;
        let n = (count & 0x1f) as u32;
        Value::Int(match op {
            BinaryOp::Shl => a.wrapping_shl(n),
            BinaryOp::Shr => a.wrapping_shr(n),
            _ => ((a as u32) >> n) as i32,
        })
    };
    Some(Ok(value))
}


//! Methods of the primitive kinds, available through their boxed types
//! (`Integer.intValue`, `Double.compareTo`, ...).

use std::cmp::Ordering;

use snip_ir::PrimitiveKind;

use crate::conversion::convert_primitive;
use crate::errors::{no_such_method, wrong_arg_type, EvalResult};
use crate::value::Value;

pub(super) fn dispatch_primitive_method(receiver: &Value, method: &str, args: &[Value]) -> EvalResult {
    let Some(kind) = receiver.primitive_kind() else {
        return Err(no_such_method(method, receiver.type_name(), args.len()));
    };
    let type_name = kind.boxed_name();

    match (method, args) {
        ("equals", [other]) => Ok(Value::Bool(receiver.equals(other))),
        ("hashCode", []) => Ok(Value::Int(receiver.hash_code())),
        ("toString", []) => Ok(Value::string(receiver.to_string())),
        ("compareTo", [other]) => {
            if other.primitive_kind() != Some(kind) {
                return Err(wrong_arg_type(method, type_name, other));
            }
            Ok(Value::Int(compare(receiver, other)))
        }
        ("booleanValue", []) if kind == PrimitiveKind::Boolean => Ok(receiver.clone()),
        ("charValue", []) if kind == PrimitiveKind::Char => Ok(receiver.clone()),
        (_, []) if kind.is_numeric() && kind != PrimitiveKind::Char => match value_target(method) {
            Some(target) => convert_primitive(receiver, target),
            None => Err(no_such_method(method, type_name, 0)),
        },
        _ => Err(no_such_method(method, type_name, args.len())),
    }
}

/// Target kind of the `xxxValue` accessors of `Number`.
fn value_target(method: &str) -> Option<PrimitiveKind> {
    match method {
        "byteValue" => Some(PrimitiveKind::Byte),
        "shortValue" => Some(PrimitiveKind::Short),
        "intValue" => Some(PrimitiveKind::Int),
        "longValue" => Some(PrimitiveKind::Long),
        "floatValue" => Some(PrimitiveKind::Float),
        "doubleValue" => Some(PrimitiveKind::Double),
        _ => None,
    }
}

/// `compareTo` between two values of the same kind.
///
/// `char`, `short` and `byte` return the difference; the other kinds return
/// -1, 0 or 1. Floating values use a total order in which `-0.0 < 0.0` and
/// NaN is greater than every other value and equal to itself.
fn compare(left: &Value, right: &Value) -> i32 {
    let ordering = match (left, right) {
        (Value::Char(a), Value::Char(b)) => {
            return i32::try_from(i64::from(u32::from(*a)) - i64::from(u32::from(*b))).unwrap_or(0);
        }
        (Value::Short(a), Value::Short(b)) => return i32::from(*a) - i32::from(*b),
        (Value::Byte(a), Value::Byte(b)) => return i32::from(*a) - i32::from(*b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Long(a), Value::Long(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => total_cmp(f64::from(*a), f64::from(*b)),
        (Value::Double(a), Value::Double(b)) => total_cmp(*a, *b),
        _ => Ordering::Equal,
    };
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

fn total_cmp(a: f64, b: f64) -> Ordering {
    let canonical = |x: f64| if x.is_nan() { f64::NAN } else { x };
    canonical(a).total_cmp(&canonical(b))
}

//! Argument validation and shared utility functions.

use crate::errors::{null_dereference, wrong_arg_type, EvalError};
use crate::value::Value;

/// Built-in methods by receiver type, name and arity.
///
/// `Number` stands for every numeric kind. Sorted by type, then method.
pub const BUILTIN_METHODS: &[(&str, &str, usize)] = &[
    ("Boolean", "booleanValue", 0),
    ("Boolean", "compareTo", 1),
    ("Boolean", "equals", 1),
    ("Boolean", "hashCode", 0),
    ("Boolean", "toString", 0),
    ("Character", "charValue", 0),
    ("Character", "compareTo", 1),
    ("Character", "equals", 1),
    ("Character", "hashCode", 0),
    ("Character", "toString", 0),
    ("Number", "byteValue", 0),
    ("Number", "compareTo", 1),
    ("Number", "doubleValue", 0),
    ("Number", "equals", 1),
    ("Number", "floatValue", 0),
    ("Number", "hashCode", 0),
    ("Number", "intValue", 0),
    ("Number", "longValue", 0),
    ("Number", "shortValue", 0),
    ("Number", "toString", 0),
    ("String", "charAt", 1),
    ("String", "compareTo", 1),
    ("String", "compareToIgnoreCase", 1),
    ("String", "concat", 1),
    ("String", "contains", 1),
    ("String", "endsWith", 1),
    ("String", "equals", 1),
    ("String", "equalsIgnoreCase", 1),
    ("String", "hashCode", 0),
    ("String", "indexOf", 1),
    ("String", "indexOf", 2),
    ("String", "isBlank", 0),
    ("String", "isEmpty", 0),
    ("String", "lastIndexOf", 1),
    ("String", "length", 0),
    ("String", "repeat", 1),
    ("String", "replace", 2),
    ("String", "startsWith", 1),
    ("String", "startsWith", 2),
    ("String", "strip", 0),
    ("String", "substring", 1),
    ("String", "substring", 2),
    ("String", "toLowerCase", 0),
    ("String", "toString", 0),
    ("String", "toUpperCase", 0),
    ("String", "trim", 0),
];

/// Extract an `int` argument; `byte`, `short` and `char` widen.
pub(super) fn int_arg(method: &str, value: &Value) -> Result<i32, EvalError> {
    match value {
        Value::Byte(n) => Ok(i32::from(*n)),
        Value::Short(n) => Ok(i32::from(*n)),
        Value::Char(c) => i32::try_from(u32::from(*c)).map_err(|_| wrong_arg_type(method, "int", value)),
        Value::Int(n) => Ok(*n),
        _ => Err(wrong_arg_type(method, "int", value)),
    }
}

/// Extract a `String` argument; `null` is a null dereference.
pub(super) fn str_arg<'a>(method: &str, value: &'a Value) -> Result<&'a str, EvalError> {
    match value {
        Value::Str(s) => Ok(s),
        Value::Null => Err(null_dereference(method)),
        _ => Err(wrong_arg_type(method, "String", value)),
    }
}

/// Clamp a length or index into `i32`.
#[inline]
pub(super) fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

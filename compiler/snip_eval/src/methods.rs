//! Method dispatch for member calls and field reads.
//!
//! Built-in receivers (`String` and the primitive kinds, which double as
//! their boxed types) dispatch by pattern matching on name and arity. Host
//! objects dispatch to their [`HostClass`](crate::HostClass) first and fall
//! back to the methods every object has: `equals`, `hashCode`, `toString`.

mod helpers;
mod numeric;
mod string;

pub use helpers::BUILTIN_METHODS;

use crate::errors::{no_such_field, no_such_method, null_dereference, EvalResult};
use crate::host::ObjectRef;
use crate::value::Value;

/// Evaluate `receiver.method(args)`.
pub fn call_method(receiver: &Value, method: &str, args: &[Value]) -> EvalResult {
    match receiver {
        Value::Null => Err(null_dereference(method)),
        Value::Str(s) => string::dispatch_string_method(s, method, args),
        Value::Object(object) => dispatch_object_method(object, method, args),
        other => numeric::dispatch_primitive_method(other, method, args),
    }
}

/// Evaluate `receiver.field`.
pub fn get_field(receiver: &Value, field: &str) -> EvalResult {
    match receiver {
        Value::Null => Err(null_dereference(field)),
        Value::Object(object) => object
            .read_field(field)
            .unwrap_or_else(|| Err(no_such_field(field, object.class().name()))),
        other => Err(no_such_field(field, other.type_name())),
    }
}

fn dispatch_object_method(object: &ObjectRef, method: &str, args: &[Value]) -> EvalResult {
    if let Some(result) = object.invoke(method, args) {
        return result;
    }
    match (method, args) {
        ("equals", [other]) => Ok(Value::Bool(
            matches!(other, Value::Object(o) if o.ptr_eq(object)),
        )),
        ("hashCode", []) => Ok(Value::Int(object.identity_hash())),
        ("toString", []) => Ok(Value::string(object.to_string())),
        _ => Err(no_such_method(method, object.class().name(), args.len())),
    }
}

//! Type conversions: casts, assignment conversion and `instanceof`.
//!
//! Assignment conversion (used for locals, assignments, arguments and
//! results) allows identity and widening only. Casts additionally narrow
//! between primitive kinds with the usual truncating semantics and check
//! reference casts against the linked classes.

use snip_ir::{PrimitiveKind, TypeRef};

use crate::class::{BuiltinClass, ClassRef, LinkedTypes};
use crate::errors::{class_cast, EvalError, EvalResult};
use crate::value::Value;

/// Convert `value` for storage in a variable of type `target`, or `None`
/// if the assignment is not allowed.
pub fn assign_convert(value: Value, target: &TypeRef, types: &LinkedTypes) -> Option<Value> {
    match target {
        TypeRef::Primitive(kind) => {
            let source = value.primitive_kind()?;
            if source.widens_to(*kind) {
                convert_primitive(&value, *kind).ok()
            } else {
                None
            }
        }
        TypeRef::Named(name) => {
            let class = types.get(name)?;
            class.admits(&value).then_some(value)
        }
    }
}

/// Whether `value` may be assigned to `target` without conversion failure.
pub fn is_assignable(value: &Value, target: &TypeRef, types: &LinkedTypes) -> bool {
    match target {
        TypeRef::Primitive(kind) => value
            .primitive_kind()
            .is_some_and(|source| source.widens_to(*kind)),
        TypeRef::Named(name) => types.get(name).is_some_and(|class| class.admits(value)),
    }
}

/// Whether an expression of static type `from` may be assigned to `to`.
///
/// Mirrors [`assign_convert`] at the level of types: widening between
/// primitives, boxing into the matching boxed type or `Object`, unboxing
/// followed by widening, and identity between reference types. Returns
/// `None` when the answer depends on the loader, which is the case for two
/// distinct host classes.
pub fn is_type_assignable(from: &TypeRef, to: &TypeRef) -> Option<bool> {
    let builtin = |ty: &TypeRef| ty.qualified_name().and_then(BuiltinClass::from_name);
    let assignable = match (from, to) {
        (TypeRef::Primitive(source), TypeRef::Primitive(target)) => source.widens_to(*target),
        (TypeRef::Primitive(source), TypeRef::Named(_)) => match builtin(to) {
            Some(BuiltinClass::Object) => true,
            Some(BuiltinClass::Boxed(kind)) => kind == *source,
            Some(BuiltinClass::String) | None => false,
        },
        (TypeRef::Named(_), TypeRef::Primitive(target)) => {
            matches!(builtin(from), Some(BuiltinClass::Boxed(kind)) if kind.widens_to(*target))
        }
        (TypeRef::Named(source), TypeRef::Named(target)) => match (builtin(from), builtin(to)) {
            (_, Some(BuiltinClass::Object)) => true,
            (Some(a), Some(b)) => a == b,
            (Some(_), None) | (None, Some(_)) => false,
            (None, None) if source == target => true,
            (None, None) => return None,
        },
    };
    Some(assignable)
}

/// Evaluate `(target) value`.
pub fn cast(value: Value, target: &TypeRef, types: &LinkedTypes) -> EvalResult {
    match target {
        TypeRef::Primitive(kind) => {
            let is_boolean = |k: PrimitiveKind| k == PrimitiveKind::Boolean;
            let compatible = value
                .primitive_kind()
                .is_some_and(|source| is_boolean(source) == is_boolean(*kind));
            if compatible {
                convert_primitive(&value, *kind)
            } else {
                Err(class_cast(value.type_name(), kind.keyword()))
            }
        }
        TypeRef::Named(name) => match types.get(name) {
            Some(class) if class.admits(&value) => Ok(value),
            Some(class) => Err(class_cast(value.type_name(), class.name())),
            None => Err(class_cast(value.type_name(), name)),
        },
    }
}

/// Evaluate `value instanceof target`. `null` is an instance of nothing.
pub fn instance_of(value: &Value, target: &TypeRef, types: &LinkedTypes) -> bool {
    match (value, target) {
        (Value::Null, _) => false,
        (_, TypeRef::Primitive(kind)) => value.primitive_kind() == Some(*kind),
        (_, TypeRef::Named(name)) => types
            .get(name)
            .is_some_and(|class: ClassRef| class.admits(value)),
    }
}

/// Convert a primitive value to another primitive kind.
///
/// Narrowing truncates to the low bits; floating to integral conversion
/// rounds toward zero, saturates at the target's range and maps NaN to 0.
/// A `char` must be a Unicode scalar value, so surrogate code units are
/// rejected.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "primitive conversions truncate and round by definition"
)]
pub fn convert_primitive(value: &Value, target: PrimitiveKind) -> EvalResult {
    if value.primitive_kind() == Some(target) {
        return Ok(value.clone());
    }
    if let Value::Bool(b) = value {
        return if target == PrimitiveKind::Boolean {
            Ok(Value::Bool(*b))
        } else {
            Err(class_cast("boolean", target.keyword()))
        };
    }

    // Integral sources convert through i64, floating sources through f64.
    let converted = match (value, target) {
        (Value::Float(_) | Value::Double(_), _) => {
            let f = value.as_f64().unwrap_or_default();
            match target {
                PrimitiveKind::Byte => Value::Byte(f as i32 as i8),
                PrimitiveKind::Short => Value::Short(f as i32 as i16),
                PrimitiveKind::Char => char_from_unit(f as i32 as u16)?,
                PrimitiveKind::Int => Value::Int(f as i32),
                PrimitiveKind::Long => Value::Long(f as i64),
                PrimitiveKind::Float => Value::Float(f as f32),
                PrimitiveKind::Double => Value::Double(f),
                PrimitiveKind::Boolean => return Err(class_cast(value.type_name(), "boolean")),
            }
        }
        _ => {
            let Some(n) = value.as_integral() else {
                return Err(class_cast(value.type_name(), target.keyword()));
            };
            match target {
                PrimitiveKind::Byte => Value::Byte(n as i8),
                PrimitiveKind::Short => Value::Short(n as i16),
                PrimitiveKind::Char => char_from_unit(n as u16)?,
                PrimitiveKind::Int => Value::Int(n as i32),
                PrimitiveKind::Long => Value::Long(n),
                PrimitiveKind::Float => Value::Float(n as f32),
                PrimitiveKind::Double => Value::Double(n as f64),
                PrimitiveKind::Boolean => return Err(class_cast(value.type_name(), "boolean")),
            }
        }
    };
    Ok(converted)
}

fn char_from_unit(unit: u16) -> Result<Value, EvalError> {
    char::from_u32(u32::from(unit))
        .map(Value::Char)
        .ok_or_else(|| EvalError::new(format!("U+{unit:04X} is a surrogate and not a valid char")))
}

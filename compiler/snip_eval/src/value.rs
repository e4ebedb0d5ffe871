//! Runtime values.
//!
//! Primitive kinds are stored unboxed; strings are shared immutable text;
//! everything else is a host object. The boxed reference types (`Integer`,
//! `Double`, ...) have no separate representation: a primitive value stored
//! in an `Object` slot simply stays a primitive value.

use std::fmt;
use std::sync::Arc;

use snip_ir::PrimitiveKind;

use crate::host::ObjectRef;

/// A runtime value. Cheap to clone; `Send + Sync`.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Arc<str>),
    Object(ObjectRef),
}

impl Value {
    /// Create a string value.
    pub fn string(text: impl Into<Arc<str>>) -> Self {
        Value::Str(text.into())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The primitive kind of an unboxed value.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Bool(_) => Some(PrimitiveKind::Boolean),
            Value::Byte(_) => Some(PrimitiveKind::Byte),
            Value::Short(_) => Some(PrimitiveKind::Short),
            Value::Char(_) => Some(PrimitiveKind::Char),
            Value::Int(_) => Some(PrimitiveKind::Int),
            Value::Long(_) => Some(PrimitiveKind::Long),
            Value::Float(_) => Some(PrimitiveKind::Float),
            Value::Double(_) => Some(PrimitiveKind::Double),
            Value::Null | Value::Str(_) | Value::Object(_) => None,
        }
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "String",
            Value::Object(object) => object.class().name(),
            other => other.primitive_kind().map_or("?", PrimitiveKind::keyword),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Integral value widened to `i64`, for `byte`, `short`, `char`, `int`
    /// and `long`.
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Char(c) => Some(i64::from(u32::from(*c))),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Any numeric value as `f64`.
    #[allow(
        clippy::cast_precision_loss,
        reason = "long to double conversion rounds, as the language specifies"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            other => other.as_integral().map(|v| v as f64),
        }
    }

    /// Value equality as the `equals` method defines it: same kind and same
    /// value for primitives and strings, identity for host objects.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Hash code as the `hashCode` method defines it.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        reason = "hash codes fold wider values into 32 bits"
    )]
    pub fn hash_code(&self) -> i32 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => {
                if *b {
                    1231
                } else {
                    1237
                }
            }
            Value::Byte(v) => i32::from(*v),
            Value::Short(v) => i32::from(*v),
            Value::Char(c) => u32::from(*c) as i32,
            Value::Int(v) => *v,
            Value::Long(v) => (*v ^ ((*v as u64) >> 32) as i64) as i32,
            Value::Float(v) => v.to_bits() as i32,
            Value::Double(v) => {
                let bits = v.to_bits();
                (bits ^ (bits >> 32)) as i32
            }
            Value::Str(s) => s
                .encode_utf16()
                .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit))),
            Value::Object(object) => object.identity_hash(),
        }
    }
}

/// Structural equality for tests and assertions; host objects compare by
/// identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

// Conversions from Rust types, for building argument lists.

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Short(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// String conversion as used by concatenation and `toString`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&format_floating(f64::from(*v), &v.to_string())),
            Value::Double(v) => f.write_str(&format_floating(*v, &v.to_string())),
            Value::Str(s) => f.write_str(s),
            Value::Object(object) => write!(f, "{object}"),
        }
    }
}

/// Format a floating value the way the language prints it: `1.0`, `0.5`,
/// `1.0E10`, `NaN`, `-Infinity`.
///
/// `shortest` is Rust's shortest round-trip rendering at the value's own
/// precision, so `float` values print without `f64` noise.
fn format_floating(value: f64, shortest: &str) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        if shortest.contains('.') {
            shortest.to_string()
        } else {
            format!("{shortest}.0")
        }
    } else {
        scientific(shortest)
    }
}

/// Rewrite a plain decimal rendering as `d.dddE±n`.
fn scientific(plain: &str) -> String {
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    // Position of the decimal point relative to the first significant digit.
    let all: String = format!("{int_part}{frac_part}");
    let first = all.find(|c: char| c != '0').unwrap_or(0);
    let significant = all[first..].trim_end_matches('0');
    let exponent = i64::try_from(int_part.len()).unwrap_or(0) - i64::try_from(first).unwrap_or(0) - 1;

    let (lead, rest) = significant.split_at(significant.len().min(1));
    let rest = if rest.is_empty() { "0" } else { rest };
    format!("{sign}{lead}.{rest}E{exponent}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

//! Runtime errors raised while a snippet executes.
//!
//! [`EvalErrorKind`] carries the structured fault category; factory
//! functions such as [`division_by_zero`] build an [`EvalError`] with both
//! the kind and its rendered message. The interpreter attaches the span of
//! the innermost failing expression.

use std::fmt;

use snip_ir::{BinaryOp, Span, UnaryOp};

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed fault category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,

    // Access
    NullDereference {
        member: String,
    },
    IndexOutOfBounds {
        index: i64,
        length: usize,
    },
    NoSuchMethod {
        method: String,
        type_name: String,
        arity: usize,
    },
    NoSuchField {
        field: String,
        type_name: String,
    },

    // Type/Operator
    InvalidBinaryOp {
        op: BinaryOp,
        left: String,
        right: String,
    },
    InvalidUnaryOp {
        op: UnaryOp,
        operand: String,
    },
    ClassCast {
        from: String,
        to: String,
    },
    WrongArgumentType {
        method: String,
        expected: String,
        got: String,
    },

    /// A host method reported a failure.
    HostFailure {
        message: String,
    },

    /// Errors without a structured category.
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    /// Short stable name of the fault category.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DivisionByZero => "division-by-zero",
            Self::NullDereference { .. } => "null-dereference",
            Self::IndexOutOfBounds { .. } => "index-out-of-bounds",
            Self::NoSuchMethod { .. } => "no-such-method",
            Self::NoSuchField { .. } => "no-such-field",
            Self::InvalidBinaryOp { .. } | Self::InvalidUnaryOp { .. } => "bad-operand",
            Self::ClassCast { .. } => "class-cast",
            Self::WrongArgumentType { .. } => "wrong-argument-type",
            Self::HostFailure { .. } => "host-failure",
            Self::Custom { .. } => "runtime-error",
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Arithmetic
            Self::DivisionByZero => write!(f, "division by zero"),

            // Access
            Self::NullDereference { member } => {
                write!(f, "cannot access `{member}` on a null reference")
            }
            Self::IndexOutOfBounds { index, length } => {
                write!(f, "index {index} out of bounds for length {length}")
            }
            Self::NoSuchMethod {
                method,
                type_name,
                arity,
            } => {
                let arg_word = if *arity == 1 { "argument" } else { "arguments" };
                write!(
                    f,
                    "no method `{method}` taking {arity} {arg_word} on type {type_name}"
                )
            }
            Self::NoSuchField { field, type_name } => {
                write!(f, "no field `{field}` on type {type_name}")
            }

            // Type/Operator
            Self::InvalidBinaryOp { op, left, right } => write!(
                f,
                "operator `{}` cannot be applied to {left} and {right}",
                op.as_symbol()
            ),
            Self::InvalidUnaryOp { op, operand } => write!(
                f,
                "operator `{}` cannot be applied to {operand}",
                op.as_symbol()
            ),
            Self::ClassCast { from, to } => write!(f, "{from} cannot be cast to {to}"),
            Self::WrongArgumentType {
                method,
                expected,
                got,
            } => write!(f, "{method} expects {expected}, got {got}"),

            Self::HostFailure { message } | Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured fault category.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory-made
    /// errors.
    pub message: String,
    /// Span of the failing expression, in unit coordinates.
    pub span: Option<Span>,
}

impl EvalError {
    /// Create an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        EvalError {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            span: None,
        }
    }

    /// Create an error from a structured kind.
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
        }
    }

    /// Attach a span unless one is already set, so the innermost location
    /// wins as the error propagates outwards.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Factory functions

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn null_dereference(member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NullDereference {
        member: member.to_string(),
    })
}

#[cold]
pub fn index_out_of_bounds(index: i64, length: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, length })
}

#[cold]
pub fn no_such_method(method: &str, type_name: &str, arity: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchMethod {
        method: method.to_string(),
        type_name: type_name.to_string(),
        arity,
    })
}

#[cold]
pub fn no_such_field(field: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchField {
        field: field.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn invalid_binary_op(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp {
        op,
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    })
}

#[cold]
pub fn invalid_unary_op(op: UnaryOp, operand: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp {
        op,
        operand: operand.type_name().to_string(),
    })
}

#[cold]
pub fn class_cast(from: &str, to: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ClassCast {
        from: from.to_string(),
        to: to.to_string(),
    })
}

#[cold]
pub fn wrong_arg_type(method: &str, expected: &str, got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WrongArgumentType {
        method: method.to_string(),
        expected: expected.to_string(),
        got: got.type_name().to_string(),
    })
}

/// Failure reported by a host method.
#[cold]
pub fn host_failure(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::HostFailure {
        message: message.into(),
    })
}

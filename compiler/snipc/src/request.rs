//! Evaluation requests.
//!
//! A request is everything needed to build one evaluator: the snippet text,
//! the declared result type, the ordered parameters and the constants the
//! snippet may refer to. Requests are immutable once built and are checked
//! by the [`SourceUnitBuilder`](crate::SourceUnitBuilder), not here.

use std::sync::Arc;

use snip_eval::Value;
use snip_ir::TypeRef;

/// A named constant with its declared type and runtime value.
#[derive(Clone, Debug)]
pub struct Constant {
    pub name: Arc<str>,
    pub ty: TypeRef,
    pub value: Value,
}

/// Immutable description of one evaluator.
///
/// ```text
/// let request = EvaluationRequest::new("a.equals(x)", TypeRef::BOOLEAN)
///     .param("a", TypeRef::string())
///     .constant("x", TypeRef::string(), Value::from("Hello World"));
/// ```
#[derive(Clone, Debug)]
pub struct EvaluationRequest {
    snippet: Arc<str>,
    result_type: TypeRef,
    parameter_names: Vec<Arc<str>>,
    parameter_types: Vec<TypeRef>,
    constants: Vec<Constant>,
}

impl EvaluationRequest {
    pub fn new(snippet: impl Into<Arc<str>>, result_type: TypeRef) -> Self {
        EvaluationRequest {
            snippet: snippet.into(),
            result_type,
            parameter_names: Vec::new(),
            parameter_types: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Build a request from parallel name and type lists.
    ///
    /// The lists are kept as given; a length mismatch is reported when the
    /// request is built into a unit.
    pub fn from_parts<N, C>(
        snippet: impl Into<Arc<str>>,
        result_type: TypeRef,
        parameter_names: impl IntoIterator<Item = N>,
        parameter_types: impl IntoIterator<Item = TypeRef>,
        constants: impl IntoIterator<Item = (C, Value)>,
    ) -> Self
    where
        N: Into<Arc<str>>,
        C: Into<Arc<str>>,
    {
        EvaluationRequest {
            snippet: snippet.into(),
            result_type,
            parameter_names: parameter_names.into_iter().map(Into::into).collect(),
            parameter_types: parameter_types.into_iter().collect(),
            constants: constants
                .into_iter()
                .map(|(name, value)| Constant {
                    name: name.into(),
                    ty: type_of_value(&value),
                    value,
                })
                .collect(),
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<Arc<str>>, ty: TypeRef) -> Self {
        self.parameter_names.push(name.into());
        self.parameter_types.push(ty);
        self
    }

    /// Append a constant with an explicit declared type.
    #[must_use]
    pub fn constant(mut self, name: impl Into<Arc<str>>, ty: TypeRef, value: impl Into<Value>) -> Self {
        self.constants.push(Constant {
            name: name.into(),
            ty,
            value: value.into(),
        });
        self
    }

    /// Append a constant typed after its value.
    #[must_use]
    pub fn constant_value(self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        let value = value.into();
        let ty = type_of_value(&value);
        self.constant(name, ty, value)
    }

    #[inline]
    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    #[inline]
    pub fn result_type(&self) -> &TypeRef {
        &self.result_type
    }

    pub fn parameter_names(&self) -> &[Arc<str>] {
        &self.parameter_names
    }

    pub fn parameter_types(&self) -> &[TypeRef] {
        &self.parameter_types
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }
}

/// The declared type a constant gets when only its value is known.
///
/// Primitives keep their kind, strings are `String`, host objects are typed
/// by their class and `null` is an `Object`.
pub fn type_of_value(value: &Value) -> TypeRef {
    match value {
        Value::Null => TypeRef::object(),
        Value::Str(_) => TypeRef::string(),
        Value::Object(object) => TypeRef::named(object.class().name()),
        primitive => primitive
            .primitive_kind()
            .map_or_else(TypeRef::object, TypeRef::Primitive),
    }
}

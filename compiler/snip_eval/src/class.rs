//! Classes as the interpreter sees them after linking.
//!
//! Every named type in a unit resolves to a [`ClassRef`]: either one of
//! the built-in types every loader knows, or a [`HostClass`] registered
//! with a loader. [`LinkedTypes`] is the per-unit table the loader fills
//! while linking; casts, `instanceof` and assignment conversion consult it.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use snip_ir::{PrimitiveKind, TypeRef};

use crate::host::HostClass;
use crate::value::Value;

/// Built-in reference types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinClass {
    /// The root type; admits every value.
    Object,
    String,
    /// `Integer`, `Character`, ... admitting the matching primitive.
    Boxed(PrimitiveKind),
}

impl BuiltinClass {
    /// Look up a built-in by simple or `java.lang`-qualified name.
    pub fn from_name(name: &str) -> Option<Self> {
        let simple = name.strip_prefix("java.lang.").unwrap_or(name);
        match simple {
            "Object" => Some(BuiltinClass::Object),
            "String" => Some(BuiltinClass::String),
            other => PrimitiveKind::from_boxed_name(other).map(BuiltinClass::Boxed),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinClass::Object => "Object",
            BuiltinClass::String => "String",
            BuiltinClass::Boxed(kind) => kind.boxed_name(),
        }
    }
}

/// A resolved reference type.
#[derive(Clone, Debug)]
pub enum ClassRef {
    Builtin(BuiltinClass),
    Host(Arc<HostClass>),
}

impl ClassRef {
    pub fn name(&self) -> &str {
        match self {
            ClassRef::Builtin(builtin) => builtin.name(),
            ClassRef::Host(class) => class.name(),
        }
    }

    /// Whether `value` may be stored in a variable of this type.
    ///
    /// `null` is admitted by every reference type.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) | (ClassRef::Builtin(BuiltinClass::Object), _) => true,
            (ClassRef::Builtin(BuiltinClass::String), Value::Str(_)) => true,
            (ClassRef::Builtin(BuiltinClass::Boxed(kind)), value) => {
                value.primitive_kind() == Some(*kind)
            }
            (ClassRef::Host(class), Value::Object(object)) => {
                Arc::ptr_eq(class, object.class()) || object.class().is_subclass_of(class.name())
            }
            _ => false,
        }
    }
}

/// Named types of one loaded unit, resolved by its loader.
#[derive(Clone, Debug, Default)]
pub struct LinkedTypes {
    classes: FxHashMap<Arc<str>, ClassRef>,
}

impl LinkedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<Arc<str>>, class: ClassRef) {
        self.classes.insert(name.into(), class);
    }

    /// Look up a named type; built-ins resolve even when not linked.
    pub fn get(&self, name: &str) -> Option<ClassRef> {
        self.classes
            .get(name)
            .cloned()
            .or_else(|| BuiltinClass::from_name(name).map(ClassRef::Builtin))
    }

    /// Resolve the class of a reference type; `None` for primitives and
    /// unknown names.
    pub fn class_of(&self, ty: &TypeRef) -> Option<ClassRef> {
        ty.qualified_name().and_then(|name| self.get(name))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

//! Declared types of parameters, results, constants and locals.
//!
//! A [`TypeRef`] is either one of the eight primitive kinds or a named
//! reference type identified by its qualified name. Named types are not
//! resolved here; loaders map names to classes when a unit is linked.

use std::fmt;
use std::sync::Arc;

use crate::ident::is_valid_identifier;

/// The primitive kinds of the snippet language.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Every primitive kind, in widening order.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Source keyword for this kind.
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Look up a kind by its source keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Name of the boxed reference type that wraps this kind.
    pub const fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Char => "Character",
            PrimitiveKind::Int => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
        }
    }

    /// Look up a kind by the name of its boxed reference type.
    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.boxed_name() == name)
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Boolean)
    }

    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte
                | PrimitiveKind::Short
                | PrimitiveKind::Char
                | PrimitiveKind::Int
                | PrimitiveKind::Long
        )
    }

    /// Whether a value of `self` may be assigned to `target` without a cast.
    ///
    /// Identity plus the widening primitive conversions:
    /// `byte → short → int → long → float → double` and `char → int`.
    pub const fn widens_to(self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::{Boolean, Byte, Char, Double, Float, Int, Long, Short};
        match (self, target) {
            (Boolean, Boolean)
            | (Byte, Byte | Short | Int | Long | Float | Double)
            | (Short, Short | Int | Long | Float | Double)
            | (Char, Char | Int | Long | Float | Double)
            | (Int, Int | Long | Float | Double)
            | (Long, Long | Float | Double)
            | (Float, Float | Double)
            | (Double, Double) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A semantic type descriptor.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRef {
    /// One of the eight primitive kinds.
    Primitive(PrimitiveKind),
    /// A reference type, by qualified name (`String`, `com.acme.Entity`).
    Named(Arc<str>),
}

impl TypeRef {
    pub const BOOLEAN: TypeRef = TypeRef::Primitive(PrimitiveKind::Boolean);
    pub const BYTE: TypeRef = TypeRef::Primitive(PrimitiveKind::Byte);
    pub const SHORT: TypeRef = TypeRef::Primitive(PrimitiveKind::Short);
    pub const CHAR: TypeRef = TypeRef::Primitive(PrimitiveKind::Char);
    pub const INT: TypeRef = TypeRef::Primitive(PrimitiveKind::Int);
    pub const LONG: TypeRef = TypeRef::Primitive(PrimitiveKind::Long);
    pub const FLOAT: TypeRef = TypeRef::Primitive(PrimitiveKind::Float);
    pub const DOUBLE: TypeRef = TypeRef::Primitive(PrimitiveKind::Double);

    /// A named reference type.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        TypeRef::Named(name.into())
    }

    /// The built-in `String` type.
    pub fn string() -> Self {
        TypeRef::named("String")
    }

    /// The built-in `Object` type, assignable from every value.
    pub fn object() -> Self {
        TypeRef::named("Object")
    }

    /// Parse a type from its source spelling: a primitive keyword or a
    /// dotted qualified name. Returns `None` when the text cannot be
    /// rendered as a declaration.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(kind) = PrimitiveKind::from_keyword(text) {
            return Some(TypeRef::Primitive(kind));
        }
        let ty = TypeRef::named(text);
        ty.is_renderable().then_some(ty)
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    #[inline]
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeRef::Primitive(kind) => Some(*kind),
            TypeRef::Named(_) => None,
        }
    }

    /// Qualified name of a reference type.
    #[inline]
    pub fn qualified_name(&self) -> Option<&str> {
        match self {
            TypeRef::Primitive(_) => None,
            TypeRef::Named(name) => Some(name),
        }
    }

    /// Whether this type can be written as a declaration in a unit.
    ///
    /// Primitive kinds always can; named types need every dot-separated
    /// segment to be a valid, non-reserved identifier.
    pub fn is_renderable(&self) -> bool {
        match self {
            TypeRef::Primitive(_) => true,
            TypeRef::Named(name) => name.split('.').all(is_valid_identifier),
        }
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => f.write_str(kind.keyword()),
            TypeRef::Named(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

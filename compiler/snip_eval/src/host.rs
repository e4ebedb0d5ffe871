//! Host classes: reference types implemented in Rust and exposed to
//! snippets.
//!
//! A [`HostClass`] is built once with a [`ClassBuilder`] and describes a
//! Rust type `T` to the interpreter: its qualified name, declared
//! supertypes, accessor fields and methods keyed by name and arity.
//! Instances are [`ObjectRef`]s sharing the class and the instance data.
//!
//! ```text
//! let entity = ClassBuilder::<Entity>::new("com.acme.Entity")
//!     .method("getName", 0, |this, _| Ok(Value::from(this.name.as_str())))
//!     .build();
//! let object = entity.instance(Entity { name: "Hello World".into() });
//! ```
//!
//! Every loaded unit receives its own copy of each host constant: loading
//! calls [`ObjectRef::fork`], which clones the instance data through `T`'s
//! `Clone` impl. Types with interior mutability decide what a copy means by
//! implementing `Clone` themselves.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::errors::{host_failure, EvalError, EvalResult};
use crate::value::Value;

/// Instance data of a host object.
///
/// Implemented for every `Clone + Send + Sync` type; `fork` is the clone
/// used when a unit is loaded. `Arc<dyn HostData>` satisfies the blanket
/// impl too, so call these through `&dyn HostData`, never on the `Arc`.
pub trait HostData: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn fork(&self) -> Arc<dyn HostData>;
}

impl<T: Any + Clone + Send + Sync> HostData for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fork(&self) -> Arc<dyn HostData> {
        Arc::new(self.clone())
    }
}

type MethodFn = dyn Fn(&dyn HostData, &[Value]) -> EvalResult + Send + Sync;
type FieldFn = dyn Fn(&dyn HostData) -> EvalResult + Send + Sync;

/// A host-registered reference type.
pub struct HostClass {
    name: Arc<str>,
    supertypes: Vec<Arc<str>>,
    methods: FxHashMap<Arc<str>, Vec<(usize, Box<MethodFn>)>>,
    fields: FxHashMap<Arc<str>, Box<FieldFn>>,
}

impl HostClass {
    /// Fully qualified name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared supertypes, by qualified name.
    pub fn supertypes(&self) -> &[Arc<str>] {
        &self.supertypes
    }

    /// Whether an instance of this class is an instance of `name`.
    pub fn is_subclass_of(&self, name: &str) -> bool {
        &*self.name == name || self.supertypes.iter().any(|s| &**s == name)
    }

    pub fn has_method(&self, name: &str, arity: usize) -> bool {
        self.methods
            .get(name)
            .is_some_and(|overloads| overloads.iter().any(|(a, _)| *a == arity))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Invoke method `name` with `args.len()` arguments, or `None` if the
    /// class has no such method.
    pub(crate) fn invoke(
        &self,
        data: &dyn HostData,
        name: &str,
        args: &[Value],
    ) -> Option<EvalResult> {
        let overloads = self.methods.get(name)?;
        let (_, method) = overloads.iter().find(|(arity, _)| *arity == args.len())?;
        Some(method(data, args))
    }

    /// Read accessor field `name`, or `None` if the class has no such field.
    pub(crate) fn read_field(&self, data: &dyn HostData, name: &str) -> Option<EvalResult> {
        self.fields.get(name).map(|getter| getter(data))
    }
}

impl fmt::Debug for HostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<String> = self
            .methods
            .iter()
            .flat_map(|(name, overloads)| overloads.iter().map(move |(a, _)| format!("{name}/{a}")))
            .collect();
        methods.sort();
        let mut fields: Vec<&str> = self.fields.keys().map(|k| &**k).collect();
        fields.sort_unstable();
        f.debug_struct("HostClass")
            .field("name", &self.name)
            .field("supertypes", &self.supertypes)
            .field("methods", &methods)
            .field("fields", &fields)
            .finish()
    }
}

/// Builder for a [`HostClass`] describing the Rust type `T`.
pub struct ClassBuilder<T> {
    class: HostClass,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Clone + Send + Sync> ClassBuilder<T> {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        ClassBuilder {
            class: HostClass {
                name: name.into(),
                supertypes: Vec::new(),
                methods: FxHashMap::default(),
                fields: FxHashMap::default(),
            },
            _marker: PhantomData,
        }
    }

    /// Declare a supertype; instances pass `instanceof` and casts for it.
    #[must_use]
    pub fn supertype(mut self, name: impl Into<Arc<str>>) -> Self {
        self.class.supertypes.push(name.into());
        self
    }

    /// Add a method taking `arity` arguments. A later registration with the
    /// same name and arity replaces the earlier one.
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<Arc<str>>, arity: usize, f: F) -> Self
    where
        F: Fn(&T, &[Value]) -> EvalResult + Send + Sync + 'static,
    {
        let class_name = Arc::clone(&self.class.name);
        let call: Box<MethodFn> = Box::new(move |data: &dyn HostData, args: &[Value]| {
            match data.as_any().downcast_ref::<T>() {
                Some(this) => f(this, args),
                None => Err(not_an_instance(&class_name)),
            }
        });
        let overloads = self.class.methods.entry(name.into()).or_default();
        overloads.retain(|(a, _)| *a != arity);
        overloads.push((arity, call));
        self
    }

    /// Add an infallible zero-argument method.
    #[must_use]
    pub fn getter<F>(self, name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.method(name, 0, move |this, _| Ok(f(this)))
    }

    /// Add an accessor field, read with `receiver.name`.
    #[must_use]
    pub fn field<F>(mut self, name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let class_name = Arc::clone(&self.class.name);
        let getter: Box<FieldFn> = Box::new(move |data: &dyn HostData| {
            match data.as_any().downcast_ref::<T>() {
                Some(this) => Ok(f(this)),
                None => Err(not_an_instance(&class_name)),
            }
        });
        self.class.fields.insert(name.into(), getter);
        self
    }

    pub fn build(self) -> HostType<T> {
        HostType {
            class: Arc::new(self.class),
            _marker: PhantomData,
        }
    }
}

#[cold]
fn not_an_instance(class_name: &str) -> EvalError {
    host_failure(format!("receiver is not an instance of {class_name}"))
}

/// A built host class together with the Rust type of its instances.
pub struct HostType<T> {
    class: Arc<HostClass>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Clone + Send + Sync> HostType<T> {
    /// Wrap `value` as an instance of this class.
    pub fn instance(&self, value: T) -> ObjectRef {
        ObjectRef {
            class: Arc::clone(&self.class),
            data: Arc::new(value),
        }
    }

    /// Wrap `value` as a [`Value::Object`].
    pub fn value(&self, value: T) -> Value {
        Value::Object(self.instance(value))
    }

    pub fn class(&self) -> &Arc<HostClass> {
        &self.class
    }
}

impl<T> Clone for HostType<T> {
    fn clone(&self) -> Self {
        HostType {
            class: Arc::clone(&self.class),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for HostType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HostType").field(&self.class.name).finish()
    }
}

/// Reference to a host object.
#[derive(Clone)]
pub struct ObjectRef {
    class: Arc<HostClass>,
    data: Arc<dyn HostData>,
}

impl ObjectRef {
    #[inline]
    pub fn class(&self) -> &Arc<HostClass> {
        &self.class
    }

    /// Borrow the instance data as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.data).as_any().downcast_ref::<T>()
    }

    /// An independent copy of this object: same class, cloned data.
    #[must_use]
    pub fn fork(&self) -> ObjectRef {
        ObjectRef {
            class: Arc::clone(&self.class),
            data: (*self.data).fork(),
        }
    }

    /// Whether both references point at the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Identity-based hash code.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "identity hash codes keep the low 32 bits of the address"
    )]
    pub fn identity_hash(&self) -> i32 {
        let addr = Arc::as_ptr(&self.data).cast::<()>() as usize;
        (addr >> 4) as i32
    }

    pub(crate) fn invoke(&self, name: &str, args: &[Value]) -> Option<EvalResult> {
        self.class.invoke(&*self.data, name, args)
    }

    pub(crate) fn read_field(&self, name: &str) -> Option<EvalResult> {
        self.class.read_field(&*self.data, name)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}", self.class.name, self.identity_hash())
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({self})")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

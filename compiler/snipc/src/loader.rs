//! Isolated loading of compiled units.
//!
//! An [`IsolatedLoader`] owns two namespaces: host classes and named
//! bindings. Lookups try the loader itself, then its parent chain, and
//! finally the built-in types every chain shares. Parents are fixed at
//! creation, so chains are finite and acyclic.
//!
//! Loading links every type the unit names, resolves constants without
//! initializer from the request or the chain, runs the remaining
//! initializers and forks host objects, so each [`LoadedUnit`] owns its
//! constants outright and never aliases another load's state.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use snip_eval::{
    assign_convert, BuiltinClass, ClassRef, EvalError, EvalResult, HostClass, HostType,
    Interpreter, LinkedTypes, Value,
};
use snip_ir::{ExprKind, Stmt, StmtKind, TypeRef, Unit};
use thiserror::Error;
use tracing::debug;

use crate::compile::CompiledArtifact;

/// Symbol resolution failures while loading a unit.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot resolve class `{name}` referenced by unit `{unit}`")]
    UnresolvedClass { name: Arc<str>, unit: Arc<str> },

    #[error("no binding for constant `{name}` of unit `{unit}`")]
    UnresolvedBinding { name: Arc<str>, unit: Arc<str> },

    #[error("constant `{name}` of type {expected} cannot hold a {found} value")]
    IncompatibleBinding {
        name: Arc<str>,
        expected: String,
        found: String,
    },

    #[error("initializer of constant `{name}` failed: {source}")]
    Initializer {
        name: Arc<str>,
        #[source]
        source: EvalError,
    },
}

impl LoadError {
    /// The class or constant that could not be loaded.
    pub fn symbol(&self) -> &str {
        match self {
            LoadError::UnresolvedClass { name, .. }
            | LoadError::UnresolvedBinding { name, .. }
            | LoadError::IncompatibleBinding { name, .. }
            | LoadError::Initializer { name, .. } => name,
        }
    }
}

/// A symbol-resolution context, optionally delegating to a parent.
///
/// Cloning is cheap and yields a handle to the same loader.
#[derive(Clone)]
pub struct IsolatedLoader {
    inner: Arc<LoaderInner>,
}

struct LoaderInner {
    name: Arc<str>,
    parent: Option<IsolatedLoader>,
    classes: RwLock<FxHashMap<Arc<str>, Arc<HostClass>>>,
    bindings: RwLock<FxHashMap<Arc<str>, Value>>,
    loaded: AtomicUsize,
}

impl IsolatedLoader {
    /// A root loader with no parent.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::create(name.into(), None)
    }

    /// A loader that delegates to `parent` for symbols it lacks.
    pub fn with_parent(parent: &IsolatedLoader, name: impl Into<Arc<str>>) -> Self {
        Self::create(name.into(), Some(parent.clone()))
    }

    fn create(name: Arc<str>, parent: Option<IsolatedLoader>) -> Self {
        IsolatedLoader {
            inner: Arc::new(LoaderInner {
                name,
                parent,
                classes: RwLock::new(FxHashMap::default()),
                bindings: RwLock::new(FxHashMap::default()),
                loaded: AtomicUsize::new(0),
            }),
        }
    }

    /// The process-wide default root, created on first use.
    pub fn system() -> &'static IsolatedLoader {
        static SYSTEM: OnceLock<IsolatedLoader> = OnceLock::new();
        SYSTEM.get_or_init(|| IsolatedLoader::new("system"))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn parent(&self) -> Option<&IsolatedLoader> {
        self.inner.parent.as_ref()
    }

    /// This loader followed by its parents, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &IsolatedLoader> {
        std::iter::successors(Some(self), |loader| loader.parent())
    }

    /// Number of loaders in the chain, this one included.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Units loaded through this loader.
    pub fn loaded_units(&self) -> usize {
        self.inner.loaded.load(Ordering::Relaxed)
    }

    /// Whether both handles refer to the same loader.
    pub fn ptr_eq(&self, other: &IsolatedLoader) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register a host class under its qualified name.
    pub fn define_class(&self, class: Arc<HostClass>) {
        debug!(loader = %self.inner.name, class = class.name(), "define class");
        let name: Arc<str> = Arc::from(class.name());
        self.inner.classes.write().insert(name, class);
    }

    /// Register the class of a built host type.
    pub fn define<T>(&self, ty: &HostType<T>)
    where
        T: std::any::Any + Clone + Send + Sync,
    {
        self.define_class(Arc::clone(ty.class()));
    }

    /// Register a named value that units may bind constants to.
    pub fn define_binding(&self, name: impl Into<Arc<str>>, value: impl Into<Value>) {
        let name = name.into();
        debug!(loader = %self.inner.name, binding = %name, "define binding");
        self.inner.bindings.write().insert(name, value.into());
    }

    /// Resolve a class: own namespace, then parents, then built-ins.
    pub fn find_class(&self, name: &str) -> Option<ClassRef> {
        self.ancestors()
            .find_map(|loader| loader.inner.classes.read().get(name).cloned())
            .map(ClassRef::Host)
            .or_else(|| BuiltinClass::from_name(name).map(ClassRef::Builtin))
    }

    /// Resolve a named binding: own namespace, then parents.
    pub fn find_binding(&self, name: &str) -> Option<Value> {
        self.ancestors()
            .find_map(|loader| loader.inner.bindings.read().get(name).cloned())
    }

    /// Link and initialize `artifact`.
    ///
    /// `bindings` supplies values for constants declared without an
    /// initializer; constants missing there are looked up in the chain.
    pub fn load(
        &self,
        artifact: &Arc<CompiledArtifact>,
        bindings: &[(Arc<str>, Value)],
    ) -> Result<LoadedUnit, LoadError> {
        let unit = artifact.unit();
        let types = self.link(artifact.name(), unit)?;

        let mut fields: Vec<Value> = Vec::with_capacity(unit.fields.len());
        for field in &unit.fields {
            let value = match field.init {
                Some(init) => Interpreter::new(unit, artifact.table(), &fields, &types)
                    .eval(init)
                    .map_err(|source| LoadError::Initializer {
                        name: Arc::clone(&field.name),
                        source,
                    })?,
                None => bindings
                    .iter()
                    .find(|(name, _)| *name == field.name)
                    .map(|(_, value)| value.clone())
                    .or_else(|| self.find_binding(&field.name))
                    .ok_or_else(|| LoadError::UnresolvedBinding {
                        name: Arc::clone(&field.name),
                        unit: Arc::clone(artifact.name()),
                    })?,
            };
            fields.push(convert_field(&field.name, fork(value), &field.ty, &types)?);
        }

        self.inner.loaded.fetch_add(1, Ordering::Relaxed);
        debug!(
            loader = %self.inner.name,
            unit = %artifact.name(),
            classes = types.len(),
            constants = fields.len(),
            "loaded unit"
        );
        Ok(LoadedUnit {
            artifact: Arc::clone(artifact),
            fields,
            types,
            loader: self.clone(),
        })
    }

    /// Resolve every named type the unit mentions.
    fn link(&self, unit_name: &Arc<str>, unit: &Unit) -> Result<LinkedTypes, LoadError> {
        let mut types = LinkedTypes::new();
        for name in referenced_types(unit) {
            let class = self
                .find_class(&name)
                .ok_or_else(|| LoadError::UnresolvedClass {
                    name: Arc::clone(&name),
                    unit: Arc::clone(unit_name),
                })?;
            types.insert(name, class);
        }
        Ok(types)
    }
}

impl fmt::Debug for IsolatedLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IsolatedLoader")
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(IsolatedLoader::name))
            .field("classes", &self.inner.classes.read().len())
            .field("bindings", &self.inner.bindings.read().len())
            .field("loaded", &self.loaded_units())
            .finish()
    }
}

/// An independent copy of host objects; other values are immutable.
fn fork(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(object.fork()),
        other => other,
    }
}

fn convert_field(
    name: &Arc<str>,
    value: Value,
    ty: &TypeRef,
    types: &LinkedTypes,
) -> Result<Value, LoadError> {
    let found = value.type_name().to_string();
    assign_convert(value, ty, types).ok_or_else(|| LoadError::IncompatibleBinding {
        name: Arc::clone(name),
        expected: ty.to_string(),
        found,
    })
}

/// Named types in declaration order, each once.
fn referenced_types(unit: &Unit) -> Vec<Arc<str>> {
    fn stmt_types<'u>(stmts: &'u [Stmt], out: &mut Vec<&'u TypeRef>) {
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::Local { ty: Some(ty), .. } => out.push(ty),
                StmtKind::If {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    stmt_types(std::slice::from_ref(&**then_branch), out);
                    if let Some(else_branch) = else_branch {
                        stmt_types(std::slice::from_ref(&**else_branch), out);
                    }
                }
                StmtKind::Block(stmts) => stmt_types(stmts, out),
                _ => {}
            }
        }
    }

    let method = &unit.method;
    let mut all: Vec<&TypeRef> = unit.fields.iter().map(|f| &f.ty).collect();
    all.extend(method.params.iter().map(|p| &p.ty));
    all.push(&method.result);
    stmt_types(&method.body, &mut all);
    all.extend(unit.arena.iter().filter_map(|(_, expr)| match &expr.kind {
        ExprKind::Cast { ty, .. } | ExprKind::InstanceOf { ty, .. } => Some(ty),
        _ => None,
    }));

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    all.into_iter()
        .filter_map(TypeRef::qualified_name)
        .filter(|name| seen.insert(name))
        .map(Arc::from)
        .collect()
}

/// A unit linked and initialized by one loader.
pub struct LoadedUnit {
    artifact: Arc<CompiledArtifact>,
    fields: Vec<Value>,
    types: LinkedTypes,
    loader: IsolatedLoader,
}

impl LoadedUnit {
    pub fn name(&self) -> &str {
        self.artifact.name()
    }

    pub fn artifact(&self) -> &Arc<CompiledArtifact> {
        &self.artifact
    }

    pub fn types(&self) -> &LinkedTypes {
        &self.types
    }

    /// The loader that produced this unit.
    pub fn loader(&self) -> &IsolatedLoader {
        &self.loader
    }

    /// Value of constant `name`.
    pub fn constant(&self, name: &str) -> Option<&Value> {
        let index = self
            .artifact
            .unit()
            .fields
            .iter()
            .position(|f| &*f.name == name)?;
        self.fields.get(index)
    }

    /// Run the unit's method with arguments already converted to the
    /// parameter types.
    pub fn invoke(&self, args: Vec<Value>) -> EvalResult {
        Interpreter::new(
            self.artifact.unit(),
            self.artifact.table(),
            &self.fields,
            &self.types,
        )
        .invoke(args)
    }
}

impl fmt::Debug for LoadedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedUnit")
            .field("name", &self.name())
            .field("loader", &self.loader.name())
            .field("constants", &self.fields)
            .finish()
    }
}

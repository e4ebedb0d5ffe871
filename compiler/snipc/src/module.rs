//! Component wiring.
//!
//! A [`Module`] maps capabilities to providers: a type (or a name) is bound
//! either to a ready instance or to a factory that builds it on first use
//! and is cached afterwards. Factories receive a [`Resolver`] to fetch their
//! own dependencies, which is also where dependency cycles are caught.
//! There is no implicit construction; anything not bound is an error.
//!
//! ```text
//! let mut module = EvaluatorModule::default().build();
//! module.bind_named(UNIT_PREFIX, Arc::<str>::from("Query"));
//! let factory = module.get::<EvaluatorFactory>()?;
//! ```

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::compile::{Compiler, TreeCompiler};
use crate::config::FactoryConfig;
use crate::factory::EvaluatorFactory;
use crate::loader::IsolatedLoader;

/// Name of the `Arc<str>` binding holding the unit name prefix.
pub const UNIT_PREFIX: &str = "snip.unit_prefix";
/// Name of the `bool` binding enabling unit logging.
pub const LOG_UNITS: &str = "snip.log_units";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModuleError {
    #[error("{type_name} is not registered")]
    NotRegistered { type_name: &'static str },

    #[error("{type_name} `{name}` is not registered")]
    NamedNotRegistered {
        name: Arc<str>,
        type_name: &'static str,
    },

    #[error("binding `{key}` does not hold a {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("dependency cycle: {path}")]
    Cycle { path: String },

    #[error("factory for `{key}` failed: {message}")]
    Factory { key: String, message: String },
}

impl ModuleError {
    /// Error for a factory that cannot build its value.
    #[cold]
    pub fn factory(key: impl Into<String>, message: impl Into<String>) -> Self {
        ModuleError::Factory {
            key: key.into(),
            message: message.into(),
        }
    }
}

type Shared = Arc<dyn Any + Send + Sync>;
type FactoryFn = dyn Fn(&Resolver<'_>) -> Result<Shared, ModuleError> + Send + Sync;

#[derive(Clone, PartialEq, Eq, Hash)]
enum Key {
    Type(TypeId, &'static str),
    Named(Arc<str>),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Type(_, name) => f.write_str(name),
            Key::Named(name) => write!(f, "@{name}"),
        }
    }
}

#[derive(Clone)]
enum Provider {
    Instance(Shared),
    Factory(Arc<FactoryFn>),
}

/// Explicit registry of instances and factories.
#[derive(Default)]
pub struct Module {
    providers: FxHashMap<Key, Provider>,
    /// Values built by factories.
    cache: RwLock<FxHashMap<Key, Shared>>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(&mut self, key: Key, provider: Provider) -> &mut Self {
        self.providers.insert(key, provider);
        self.cache.get_mut().clear();
        self
    }

    /// Bind `T` to an instance; [`get`](Self::get) returns clones of it.
    pub fn bind_instance<T>(&mut self, value: T) -> &mut Self
    where
        T: Any + Clone + Send + Sync,
    {
        self.bind(type_key::<T>(), Provider::Instance(Arc::new(value)))
    }

    /// Bind `T` to a factory invoked at most once, on first request.
    pub fn bind_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Clone + Send + Sync,
        F: Fn(&Resolver<'_>) -> Result<T, ModuleError> + Send + Sync + 'static,
    {
        self.bind(type_key::<T>(), Provider::Factory(erase(factory)))
    }

    /// Bind `name` to an instance.
    pub fn bind_named<T>(&mut self, name: impl Into<Arc<str>>, value: T) -> &mut Self
    where
        T: Any + Clone + Send + Sync,
    {
        self.bind(Key::Named(name.into()), Provider::Instance(Arc::new(value)))
    }

    /// Bind `name` to a factory invoked at most once, on first request.
    pub fn bind_named_factory<T, F>(&mut self, name: impl Into<Arc<str>>, factory: F) -> &mut Self
    where
        T: Any + Clone + Send + Sync,
        F: Fn(&Resolver<'_>) -> Result<T, ModuleError> + Send + Sync + 'static,
    {
        self.bind(Key::Named(name.into()), Provider::Factory(erase(factory)))
    }

    /// Let `extension` add its bindings.
    pub fn install(&mut self, extension: &dyn Extension) -> &mut Self {
        extension.add_support(self);
        self
    }

    pub fn get<T>(&self) -> Result<T, ModuleError>
    where
        T: Any + Clone + Send + Sync,
    {
        Resolver::new(self).get()
    }

    pub fn get_named<T>(&self, name: &str) -> Result<T, ModuleError>
    where
        T: Any + Clone + Send + Sync,
    {
        Resolver::new(self).get_named(name)
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.providers.contains_key(&type_key::<T>())
    }

    pub fn contains_named(&self, name: &str) -> bool {
        self.providers.contains_key(&Key::Named(Arc::from(name)))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.providers.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("Module")
            .field("bindings", &keys)
            .field("built", &self.cache.read().len())
            .finish()
    }
}

fn type_key<T: Any>() -> Key {
    Key::Type(TypeId::of::<T>(), type_name::<T>())
}

fn erase<T, F>(factory: F) -> Arc<FactoryFn>
where
    T: Any + Clone + Send + Sync,
    F: Fn(&Resolver<'_>) -> Result<T, ModuleError> + Send + Sync + 'static,
{
    Arc::new(move |resolver: &Resolver<'_>| factory(resolver).map(|value| Arc::new(value) as Shared))
}

/// Resolution context handed to factories.
///
/// Tracks the chain of bindings under construction so a factory that
/// (indirectly) requests itself fails instead of recursing.
pub struct Resolver<'m> {
    module: &'m Module,
    building: RefCell<Vec<Key>>,
}

impl<'m> Resolver<'m> {
    fn new(module: &'m Module) -> Self {
        Resolver {
            module,
            building: RefCell::new(Vec::new()),
        }
    }

    pub fn get<T>(&self) -> Result<T, ModuleError>
    where
        T: Any + Clone + Send + Sync,
    {
        let key = type_key::<T>();
        let shared = self.resolve(&key, || ModuleError::NotRegistered {
            type_name: type_name::<T>(),
        })?;
        downcast(&key, &shared)
    }

    pub fn get_named<T>(&self, name: &str) -> Result<T, ModuleError>
    where
        T: Any + Clone + Send + Sync,
    {
        let key = Key::Named(Arc::from(name));
        let shared = self.resolve(&key, || ModuleError::NamedNotRegistered {
            name: Arc::from(name),
            type_name: type_name::<T>(),
        })?;
        downcast(&key, &shared)
    }

    fn resolve(
        &self,
        key: &Key,
        missing: impl FnOnce() -> ModuleError,
    ) -> Result<Shared, ModuleError> {
        let factory = match self.module.providers.get(key) {
            None => return Err(missing()),
            Some(Provider::Instance(value)) => return Ok(Arc::clone(value)),
            Some(Provider::Factory(factory)) => Arc::clone(factory),
        };
        if let Some(value) = self.module.cache.read().get(key) {
            return Ok(Arc::clone(value));
        }

        {
            let mut building = self.building.borrow_mut();
            if building.contains(key) {
                let path = building
                    .iter()
                    .chain(std::iter::once(key))
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(ModuleError::Cycle { path });
            }
            building.push(key.clone());
        }
        let built = factory(self);
        self.building.borrow_mut().pop();

        let value = built?;
        let mut cache = self.module.cache.write();
        Ok(Arc::clone(cache.entry(key.clone()).or_insert(value)))
    }
}

fn downcast<T: Any + Clone>(key: &Key, shared: &Shared) -> Result<T, ModuleError> {
    shared
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| ModuleError::TypeMismatch {
            key: key.to_string(),
            expected: type_name::<T>(),
        })
}

/// A bundle of bindings added to a module explicitly.
pub trait Extension {
    fn add_support(&self, module: &mut Module);
}

/// Default bindings for evaluator creation.
///
/// Binds the unit prefix and logging flag by name, and factories for
/// [`FactoryConfig`], the compiler, the loader and [`EvaluatorFactory`].
/// The loader is the system loader unless one is supplied.
#[derive(Clone, Debug, Default)]
pub struct EvaluatorModule {
    loader: Option<IsolatedLoader>,
    config: FactoryConfig,
}

impl EvaluatorModule {
    #[must_use]
    pub fn with_loader(mut self, loader: IsolatedLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: FactoryConfig) -> Self {
        self.config = config;
        self
    }

    /// A new module with these bindings installed.
    pub fn build(&self) -> Module {
        let mut module = Module::new();
        module.install(self);
        module
    }
}

impl Extension for EvaluatorModule {
    fn add_support(&self, module: &mut Module) {
        let loader = self.loader.clone();
        module
            .bind_named(UNIT_PREFIX, Arc::clone(&self.config.unit_prefix))
            .bind_named(LOG_UNITS, self.config.log_units)
            .bind_factory(|r: &Resolver<'_>| {
                Ok(FactoryConfig {
                    unit_prefix: r.get_named::<Arc<str>>(UNIT_PREFIX)?,
                    log_units: r.get_named::<bool>(LOG_UNITS)?,
                })
            })
            .bind_factory(|_: &Resolver<'_>| Ok(Arc::new(TreeCompiler) as Arc<dyn Compiler>))
            .bind_factory(move |_: &Resolver<'_>| {
                Ok(loader
                    .clone()
                    .unwrap_or_else(|| IsolatedLoader::system().clone()))
            })
            .bind_factory(|r: &Resolver<'_>| {
                Ok(EvaluatorFactory::with_parts(
                    r.get::<Arc<dyn Compiler>>()?,
                    r.get::<IsolatedLoader>()?,
                    r.get::<FactoryConfig>()?,
                ))
            });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

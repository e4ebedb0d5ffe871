//! The evaluator pipeline.
//!
//! ```text
//! Building ──► Compiling ──► Loading ──► Ready
//!     │            │            │
//!     └────────────┴────────────┴──► Failed(reason)
//! ```
//!
//! Each stage either hands its output to the next or stops the pipeline
//! with the error of that stage. Only `Ready` produces an evaluator.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use snip_eval::Value;
use snip_ir::TypeRef;
use tracing::{debug, debug_span};

use crate::builder::{SourceArtifact, SourceUnitBuilder};
use crate::compile::{Compiler, TreeCompiler};
use crate::config::FactoryConfig;
use crate::error::Error;
use crate::evaluator::Evaluator;
use crate::loader::IsolatedLoader;
use crate::module::{Module, ModuleError};
use crate::request::EvaluationRequest;

/// Pipeline stages.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Stage {
    Building,
    Compiling,
    Loading,
    Ready,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Building => "building",
            Stage::Compiling => "compiling",
            Stage::Loading => "loading",
            Stage::Ready => "ready",
        })
    }
}

/// Creates evaluators from requests.
#[derive(Clone)]
pub struct EvaluatorFactory {
    compiler: Arc<dyn Compiler>,
    loader: IsolatedLoader,
    builder: SourceUnitBuilder,
    config: FactoryConfig,
}

impl EvaluatorFactory {
    /// A factory loading through `loader` with the default compiler.
    pub fn new(loader: IsolatedLoader) -> Self {
        Self::with_parts(Arc::new(TreeCompiler), loader, FactoryConfig::default())
    }

    pub fn with_parts(
        compiler: Arc<dyn Compiler>,
        loader: IsolatedLoader,
        config: FactoryConfig,
    ) -> Self {
        EvaluatorFactory {
            compiler,
            loader,
            builder: SourceUnitBuilder::new(Arc::clone(&config.unit_prefix)),
            config,
        }
    }

    /// Build a factory from the bindings of `module`.
    pub fn from_module(module: &Module) -> Result<Self, ModuleError> {
        Ok(Self::with_parts(
            module.get::<Arc<dyn Compiler>>()?,
            module.get::<IsolatedLoader>()?,
            module.get::<FactoryConfig>()?,
        ))
    }

    pub fn loader(&self) -> &IsolatedLoader {
        &self.loader
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Create an evaluator that loads through this factory's loader.
    pub fn create_evaluator(&self, request: &EvaluationRequest) -> Result<Evaluator, Error> {
        self.create_evaluator_in(request, &self.loader)
    }

    /// Positional form: parallel parameter lists and untyped constants.
    pub fn create<'a>(
        &self,
        snippet: &str,
        result_type: TypeRef,
        parameter_names: &[&str],
        parameter_types: &[TypeRef],
        constants: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<Evaluator, Error> {
        let request = EvaluationRequest::from_parts(
            snippet,
            result_type,
            parameter_names.iter().copied(),
            parameter_types.iter().cloned(),
            constants,
        );
        self.create_evaluator(&request)
    }

    /// Positional form with constants given as a map.
    pub fn create_with_map(
        &self,
        snippet: &str,
        result_type: TypeRef,
        parameter_names: &[&str],
        parameter_types: &[TypeRef],
        constants: &FxHashMap<Arc<str>, Value>,
    ) -> Result<Evaluator, Error> {
        // Sorted so the generated unit does not depend on hash order.
        let mut constants: Vec<(&str, Value)> = constants
            .iter()
            .map(|(name, value)| (&**name, value.clone()))
            .collect();
        constants.sort_by(|a, b| a.0.cmp(b.0));
        self.create(snippet, result_type, parameter_names, parameter_types, constants)
    }

    /// Create an evaluator that loads through `loader` instead of this
    /// factory's own.
    pub fn create_evaluator_in(
        &self,
        request: &EvaluationRequest,
        loader: &IsolatedLoader,
    ) -> Result<Evaluator, Error> {
        let span = debug_span!("create_evaluator", loader = loader.name());
        let _guard = span.enter();

        let mut stage = Stage::Building;
        let result = self.run(request, loader, &mut stage);
        match &result {
            Ok(evaluator) => debug!(stage = %Stage::Ready, unit = evaluator.name()),
            Err(err) => debug!(failed_in = %stage, kind = err.kind_name(), "{err}"),
        }
        result
    }

    fn run(
        &self,
        request: &EvaluationRequest,
        loader: &IsolatedLoader,
        stage: &mut Stage,
    ) -> Result<Evaluator, Error> {
        debug!(stage = %stage, params = request.parameter_names().len());
        let source = self.builder.build(request)?;
        if self.config.log_units {
            debug!(unit = %source.unit_name, "generated unit:\n{}", source.text);
        }

        *stage = Stage::Compiling;
        debug!(stage = %stage, unit = %source.unit_name);
        let artifact = self
            .compiler
            .compile(&source.unit_name, &source.text)
            .map_err(|diagnostics| remap(&source, diagnostics))?;

        *stage = Stage::Loading;
        debug!(stage = %stage, unit = %source.unit_name);
        let unit = loader.load(&artifact, &source.external_bindings)?;

        Ok(Evaluator::new(unit))
    }
}

impl Default for EvaluatorFactory {
    /// A factory over the process-wide system loader.
    fn default() -> Self {
        EvaluatorFactory::new(IsolatedLoader::system().clone())
    }
}

impl fmt::Debug for EvaluatorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluatorFactory")
            .field("loader", &self.loader)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn remap(source: &SourceArtifact, diagnostics: crate::CompileDiagnostics) -> Error {
    Error::Compile(diagnostics.relative_to_snippet(source.snippet_line, source.snippet_lines))
}

//! Snip - evaluate small source snippets as functions.
//!
//! A snippet such as `return a + b;` is turned into an [`Evaluator`] that
//! can be invoked any number of times with positional arguments. Creating
//! one runs a fixed pipeline:
//!
//! 1. [`SourceUnitBuilder`] wraps the snippet in a synthetic unit with one
//!    `evaluate` method and one constant per request constant
//! 2. a [`Compiler`] parses and resolves the unit, reporting
//!    [`CompileDiagnostics`] relative to the snippet
//! 3. an [`IsolatedLoader`] links the unit's types and binds its constants
//! 4. the resulting [`Evaluator`] checks arguments and runs the unit
//!
//! [`EvaluatorFactory`] drives these stages; [`Module`] wires factories
//! from explicit bindings. Every failure is one [`Error`] variant.

mod builder;
pub mod commands;
mod compile;
mod config;
mod diagnostics;
mod error;
mod evaluator;
mod factory;
mod loader;
mod module;
mod request;

use std::sync::Once;

pub use builder::{SourceArtifact, SourceUnitBuilder, ENTRY_POINT};
pub use compile::{CompiledArtifact, Compiler, TreeCompiler};
pub use config::FactoryConfig;
pub use diagnostics::{CompileDiagnostics, DiagnosticEntry};
pub use error::Error;
pub use evaluator::Evaluator;
pub use factory::{EvaluatorFactory, Stage};
pub use loader::{IsolatedLoader, LoadError, LoadedUnit};
pub use module::{
    EvaluatorModule, Extension, Module, ModuleError, Resolver, LOG_UNITS, UNIT_PREFIX,
};
pub use request::{type_of_value, Constant, EvaluationRequest};

pub use snip_eval::{ClassBuilder, EvalError, EvalErrorKind, HostType, ObjectRef, Value};
pub use snip_ir::{PrimitiveKind, TypeRef};

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical `tracing` subscriber on stderr.
///
/// Does nothing unless `SNIP_LOG` holds a filter (`SNIP_LOG=snipc=debug`);
/// later calls are no-ops.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_env("SNIP_LOG") else {
            return;
        };
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}

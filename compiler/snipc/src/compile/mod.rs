//! Compilation of generated units.
//!
//! [`Compiler`] is the seam between the factory and a backend. The shipped
//! backend, [`TreeCompiler`], lexes and parses the unit and resolves every
//! name to a frame slot or constant field; the result is interpreted by the
//! loaded unit. Everything happens in memory and no state is shared between
//! calls, so one compiler serves any number of threads.

mod resolve;

use std::fmt;
use std::sync::Arc;

use snip_diagnostic::Diagnostic;
use snip_ir::{ResolutionTable, TypeRef, Unit};
use snip_parse::parse_unit;
use tracing::{trace, warn};

use crate::diagnostics::CompileDiagnostics;

/// A compiled unit: syntax tree, name resolution and non-fatal warnings.
pub struct CompiledArtifact {
    name: Arc<str>,
    unit: Unit,
    table: ResolutionTable,
    warnings: Vec<Diagnostic>,
}

impl CompiledArtifact {
    /// The unit's qualified name.
    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    #[inline]
    pub fn table(&self) -> &ResolutionTable {
        &self.table
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn result_type(&self) -> &TypeRef {
        &self.unit.method.result
    }

    pub fn parameter_types(&self) -> impl ExactSizeIterator<Item = &TypeRef> {
        self.unit.method.params.iter().map(|p| &p.ty)
    }
}

impl fmt::Debug for CompiledArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledArtifact")
            .field("name", &self.name)
            .field("fields", &self.unit.fields.len())
            .field("params", &self.unit.method.params.len())
            .field("frame_size", &self.table.frame_size())
            .field("warnings", &self.warnings.len())
            .finish()
    }
}

/// Turns unit text into a compiled artifact.
pub trait Compiler: Send + Sync {
    /// Compile the unit `source`, which must declare a class named
    /// `unit_name`.
    fn compile(
        &self,
        unit_name: &str,
        source: &str,
    ) -> Result<Arc<CompiledArtifact>, CompileDiagnostics>;
}

/// Lexer, parser and resolver over the snippet language.
#[derive(Copy, Clone, Debug, Default)]
pub struct TreeCompiler;

impl TreeCompiler {
    pub fn new() -> Self {
        TreeCompiler
    }
}

impl Compiler for TreeCompiler {
    fn compile(
        &self,
        unit_name: &str,
        source: &str,
    ) -> Result<Arc<CompiledArtifact>, CompileDiagnostics> {
        trace!(unit = unit_name, source, "compiling");
        let failed =
            |diagnostics| CompileDiagnostics::new(Arc::from(unit_name), Arc::from(source), diagnostics);

        let parsed = parse_unit(source);
        let has_errors = parsed.has_errors();
        let (Some(unit), false) = (parsed.unit, has_errors) else {
            return Err(failed(parsed.diagnostics));
        };

        let mut diagnostics = parsed.diagnostics;
        let table = resolve::resolve(&unit, unit_name, &mut diagnostics);
        if diagnostics.iter().any(Diagnostic::is_error) {
            return Err(failed(diagnostics));
        }

        for warning in &diagnostics {
            warn!(unit = unit_name, code = %warning.code, "{}", warning.message);
        }

        Ok(Arc::new(CompiledArtifact {
            name: Arc::clone(&unit.name),
            unit,
            table,
            warnings: diagnostics,
        }))
    }
}

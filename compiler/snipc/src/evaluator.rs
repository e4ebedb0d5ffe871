//! Ready-to-run evaluators.

use std::fmt;
use std::sync::Arc;

use snip_eval::{assign_convert, Value};
use snip_ir::TypeRef;
use tracing::trace;

use crate::error::{argument_mismatch, internal, Error};
use crate::loader::LoadedUnit;

/// A compiled and loaded snippet, invocable any number of times from any
/// number of threads.
///
/// Constants were bound when the unit was loaded; each call only supplies
/// the parameters, positionally.
#[derive(Clone)]
pub struct Evaluator {
    unit: Arc<LoadedUnit>,
    result_type: TypeRef,
    parameter_types: Arc<[TypeRef]>,
}

impl Evaluator {
    pub(crate) fn new(unit: LoadedUnit) -> Self {
        let artifact = unit.artifact();
        let result_type = artifact.result_type().clone();
        let parameter_types = artifact.parameter_types().cloned().collect();
        Evaluator {
            unit: Arc::new(unit),
            result_type,
            parameter_types,
        }
    }

    /// Run the snippet with `args` bound to its parameters.
    ///
    /// Arguments must match the declared parameters in number and be
    /// assignable to their types; otherwise nothing runs and
    /// [`Error::ArgumentMismatch`] is returned.
    pub fn evaluate(&self, args: &[Value]) -> Result<Value, Error> {
        if args.len() != self.parameter_types.len() {
            return Err(argument_mismatch(format!(
                "expected {} argument(s), got {}",
                self.parameter_types.len(),
                args.len()
            )));
        }

        let types = self.unit.types();
        let converted = args
            .iter()
            .zip(self.parameter_types.iter())
            .enumerate()
            .map(|(index, (arg, ty))| {
                assign_convert(arg.clone(), ty, types).ok_or_else(|| {
                    argument_mismatch(format!(
                        "argument {index} is a {}, which cannot be assigned to {ty}",
                        arg.type_name()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        trace!(unit = self.unit.name(), "evaluate");
        let result = self.unit.invoke(converted)?;

        let found = result.type_name().to_string();
        assign_convert(result, &self.result_type, types).ok_or_else(|| {
            internal(format!(
                "unit `{}` produced a {found} where {} was declared",
                self.unit.name(),
                self.result_type
            ))
        })
    }

    /// Name of the loaded unit.
    pub fn name(&self) -> &str {
        self.unit.name()
    }

    pub fn result_type(&self) -> &TypeRef {
        &self.result_type
    }

    pub fn parameter_types(&self) -> &[TypeRef] {
        &self.parameter_types
    }

    pub fn unit(&self) -> &LoadedUnit {
        &self.unit
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("unit", &self.unit.name())
            .field("result_type", &self.result_type)
            .field("parameter_types", &self.parameter_types)
            .finish()
    }
}

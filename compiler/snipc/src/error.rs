//! Error taxonomy of the evaluator pipeline.

use snip_eval::EvalError;
use thiserror::Error;

use crate::diagnostics::CompileDiagnostics;
use crate::factory::Stage;
use crate::loader::LoadError;

/// Every way creating or invoking an evaluator can fail.
///
/// Each variant is raised by exactly one stage and surfaced to the caller
/// unchanged; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The request cannot be rendered as a unit: bad identifiers, duplicate
    /// names, parameter lists of different lengths or unrenderable types.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The generated unit did not compile.
    #[error("compilation failed\n{0}")]
    Compile(#[from] CompileDiagnostics),

    /// The compiled unit could not be linked in its loader.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// `evaluate` was called with the wrong number or types of arguments.
    #[error("argument mismatch: {0}")]
    ArgumentMismatch(String),

    /// The snippet raised a runtime fault.
    #[error("evaluation failed: {0}")]
    EvaluationFailure(#[from] EvalError),

    /// Two stages disagree about a type; never caused by the snippet alone.
    #[error("internal error: {0}")]
    InternalError(String),
}

impl Error {
    /// The factory stage that raised this error, or `None` for invocation
    /// errors of a ready evaluator.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::MalformedRequest(_) => Some(Stage::Building),
            Error::Compile(_) => Some(Stage::Compiling),
            Error::Load(_) => Some(Stage::Loading),
            Error::ArgumentMismatch(_) | Error::EvaluationFailure(_) | Error::InternalError(_) => {
                None
            }
        }
    }

    /// Stable kebab-case name of the error kind, for logs and the CLI.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::MalformedRequest(_) => "malformed-request",
            Error::Compile(_) => "compile-diagnostics",
            Error::Load(_) => "load-error",
            Error::ArgumentMismatch(_) => "argument-mismatch",
            Error::EvaluationFailure(_) => "evaluation-failure",
            Error::InternalError(_) => "internal-error",
        }
    }
}

#[cold]
pub(crate) fn malformed(message: impl Into<String>) -> Error {
    Error::MalformedRequest(message.into())
}

#[cold]
pub(crate) fn argument_mismatch(message: impl Into<String>) -> Error {
    Error::ArgumentMismatch(message.into())
}

#[cold]
pub(crate) fn internal(message: impl Into<String>) -> Error {
    Error::InternalError(message.into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use snip_eval::errors::division_by_zero;

    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            malformed("duplicate identifier `a`").to_string(),
            "malformed request: duplicate identifier `a`"
        );
        assert_eq!(
            Error::from(division_by_zero()).to_string(),
            "evaluation failed: division by zero"
        );
    }

    #[test]
    fn test_stage_and_kind() {
        assert_eq!(malformed("x").stage(), Some(Stage::Building));
        assert_eq!(argument_mismatch("x").stage(), None);
        assert_eq!(internal("x").kind_name(), "internal-error");
    }
}

//! Factory configuration.

use std::sync::Arc;

/// Knobs of an [`EvaluatorFactory`](crate::EvaluatorFactory).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Prefix of generated unit names; units are named `<prefix>$<n>`.
    pub unit_prefix: Arc<str>,
    /// Log the full text of every generated unit at `debug` level.
    pub log_units: bool,
}

impl FactoryConfig {
    pub const DEFAULT_UNIT_PREFIX: &'static str = "Snippet";

    #[must_use]
    pub fn with_unit_prefix(mut self, prefix: impl Into<Arc<str>>) -> Self {
        self.unit_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_log_units(mut self, log_units: bool) -> Self {
        self.log_units = log_units;
        self
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        FactoryConfig {
            unit_prefix: Arc::from(Self::DEFAULT_UNIT_PREFIX),
            log_units: false,
        }
    }
}

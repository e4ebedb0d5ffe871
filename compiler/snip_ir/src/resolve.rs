//! Name resolution results.
//!
//! The compiler maps every identifier expression to either a frame slot
//! (parameters first, then locals in declaration order) or a constant field
//! of the unit. The interpreter consults this table instead of names.

use crate::ExprId;

/// What an identifier refers to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Binding {
    /// Frame slot of a parameter or local variable.
    Slot(u32),
    /// Index into the unit's constant fields.
    Field(u32),
}

/// Side table from identifier expressions to their bindings.
#[derive(Clone, Debug, Default)]
pub struct ResolutionTable {
    bindings: Vec<Option<Binding>>,
    param_count: u32,
    local_count: u32,
}

impl ResolutionTable {
    /// Create a table for a unit with `expr_count` expressions.
    pub fn new(expr_count: usize, param_count: u32, local_count: u32) -> Self {
        ResolutionTable {
            bindings: vec![None; expr_count],
            param_count,
            local_count,
        }
    }

    /// Record the binding of an identifier expression.
    pub fn record(&mut self, id: ExprId, binding: Binding) {
        if let Some(entry) = self.bindings.get_mut(id.index()) {
            *entry = Some(binding);
        }
    }

    /// Look up the binding of an identifier expression.
    #[inline]
    pub fn get(&self, id: ExprId) -> Option<Binding> {
        self.bindings.get(id.index()).copied().flatten()
    }

    /// Frame slot holding local declaration number `decl`.
    #[inline]
    pub fn local_slot(&self, decl: u32) -> u32 {
        self.param_count + decl
    }

    #[inline]
    pub fn param_count(&self) -> u32 {
        self.param_count
    }

    /// Slots needed for one invocation: parameters plus locals.
    #[inline]
    pub fn frame_size(&self) -> usize {
        (self.param_count + self.local_count) as usize
    }

    /// Number of identifiers that were resolved.
    pub fn resolved_count(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_some()).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let mut table = ResolutionTable::new(4, 2, 1);
        table.record(ExprId::new(1), Binding::Slot(0));
        table.record(ExprId::new(3), Binding::Field(0));

        assert_eq!(table.get(ExprId::new(0)), None);
        assert_eq!(table.get(ExprId::new(1)), Some(Binding::Slot(0)));
        assert_eq!(table.get(ExprId::new(3)), Some(Binding::Field(0)));
        assert_eq!(table.resolved_count(), 2);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut table = ResolutionTable::new(1, 0, 0);
        table.record(ExprId::new(7), Binding::Slot(0));
        assert_eq!(table.get(ExprId::new(7)), None);
    }

    #[test]
    fn test_frame_layout() {
        let table = ResolutionTable::new(0, 2, 3);
        assert_eq!(table.local_slot(0), 2);
        assert_eq!(table.local_slot(2), 4);
        assert_eq!(table.frame_size(), 5);
    }
}

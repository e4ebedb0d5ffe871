//! Name resolution and flow checks.
//!
//! Parameters and locals live in lexical scopes and resolve to frame
//! slots; constants resolve to field indices and may only refer to
//! constants declared before them. Locals may shadow constants but not
//! other variables. Alongside resolution the pass checks that the method
//! cannot complete without a value, that returned expressions whose type is
//! declared (literals, variables, constants, casts) fit the result type, and
//! flags statements after a `return`.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use snip_diagnostic::{
    already_defined, incompatible_types, unknown_symbol, Diagnostic, ErrorCode,
};
use snip_eval::is_type_assignable;
use snip_ir::{
    ensure_sufficient_stack, Binding, ExprId, ExprKind, Literal, ResolutionTable, Span, Stmt,
    StmtKind, TypeRef, Unit,
};

/// Resolve every identifier of `unit`, appending problems to `diagnostics`.
pub(super) fn resolve(
    unit: &Unit,
    unit_name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> ResolutionTable {
    let params = u32::try_from(unit.method.params.len()).unwrap_or(u32::MAX);
    let mut resolver = Resolver {
        unit,
        table: ResolutionTable::new(unit.arena.len(), params, unit.local_count),
        diagnostics,
        fields: FxHashMap::default(),
        slot_types: FxHashMap::default(),
        scopes: Vec::new(),
    };

    if &*unit.name != unit_name {
        resolver.diagnostics.push(
            Diagnostic::error(ErrorCode::E2006)
                .with_message(format!(
                    "unit is named `{}` but `{unit_name}` was expected",
                    unit.name
                ))
                .with_label(unit.name_span, "unexpected unit name"),
        );
    }

    resolver.fields();
    resolver.method();
    resolver.table
}

struct Local {
    name: Arc<str>,
    slot: u32,
    span: Span,
}

struct Resolver<'a> {
    unit: &'a Unit,
    table: ResolutionTable,
    diagnostics: &'a mut Vec<Diagnostic>,
    /// Constants declared so far: name to (index, declaration span).
    fields: FxHashMap<Arc<str>, (u32, Span)>,
    /// Declared type of each parameter and typed local, by frame slot.
    slot_types: FxHashMap<u32, TypeRef>,
    scopes: Vec<Vec<Local>>,
}

/// Type of an expression as far as it is known without inference.
enum StaticType {
    Null,
    Known(TypeRef),
}

impl Resolver<'_> {
    fn fields(&mut self) {
        let unit = self.unit;
        for (index, field) in unit.fields.iter().enumerate() {
            if let Some(init) = field.init {
                self.expr(init);
            }
            if let Some((_, previous)) = self.fields.get(&field.name) {
                let diag = already_defined(field.span, *previous, &field.name);
                self.diagnostics.push(diag);
                continue;
            }
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            self.fields
                .insert(Arc::clone(&field.name), (index, field.span));
        }
    }

    fn method(&mut self) {
        let unit = self.unit;
        let method = &unit.method;

        self.scopes.push(Vec::new());
        for (slot, param) in method.params.iter().enumerate() {
            let slot = u32::try_from(slot).unwrap_or(u32::MAX);
            self.declare(&param.name, slot, param.span);
            self.slot_types.insert(slot, param.ty.clone());
        }
        self.block(&method.body);
        self.scopes.pop();

        if method.body.iter().all(completes_normally) {
            let end = Span::new(method.span.end.saturating_sub(1), method.span.end);
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E2005)
                    .with_message("missing return statement")
                    .with_label(end, format!("`{}` can end without a value", method.name))
                    .with_note("end the snippet with an expression or a `return`"),
            );
        }
    }

    fn block(&mut self, stmts: &[Stmt]) {
        self.scopes.push(Vec::new());
        let mut reachable = true;
        let mut warned = false;
        for stmt in stmts {
            if !reachable && !warned && !is_empty(stmt) {
                self.diagnostics.push(
                    Diagnostic::warning(ErrorCode::W2001)
                        .with_message("unreachable statement")
                        .with_label(stmt.span, "this statement is never executed"),
                );
                warned = true;
            }
            self.stmt(stmt);
            reachable = reachable && completes_normally(stmt);
        }
        self.scopes.pop();
    }

    fn stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| self.stmt_inner(stmt));
    }

    fn stmt_inner(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Return(Some(expr)) | StmtKind::Tail(expr) => {
                self.expr(*expr);
                self.check_result(*expr);
            }
            StmtKind::Expr(expr) => self.expr(*expr),
            StmtKind::Return(None) => {
                let result = &self.unit.method.result;
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E2007)
                        .with_message("missing return value")
                        .with_label(stmt.span, format!("expected a value of type {result}")),
                );
            }
            StmtKind::Local {
                decl,
                name,
                ty,
                init,
            } => {
                // The initializer cannot see the variable it initializes.
                self.expr(*init);
                let slot = self.table.local_slot(*decl);
                self.declare(name, slot, stmt.span);
                if let Some(ty) = ty {
                    self.slot_types.insert(slot, ty.clone());
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(*cond);
                self.block(std::slice::from_ref(&**then_branch));
                if let Some(else_branch) = else_branch {
                    self.block(std::slice::from_ref(&**else_branch));
                }
            }
            StmtKind::Block(stmts) => self.block(stmts),
        }
    }

    /// Report a returned expression that can never fit the result type.
    fn check_result(&mut self, expr: ExprId) {
        let unit = self.unit;
        let result = &unit.method.result;
        let (fits, found) = match self.static_type(expr) {
            Some(StaticType::Null) => (!result.is_primitive(), "<null>".to_string()),
            Some(StaticType::Known(ty)) => match is_type_assignable(&ty, result) {
                Some(fits) => (fits, ty.to_string()),
                None => return,
            },
            None => return,
        };
        if !fits {
            let diag = incompatible_types(unit.arena.span(expr), &found, &result.to_string());
            self.diagnostics.push(diag);
        }
    }

    fn static_type(&self, id: ExprId) -> Option<StaticType> {
        let unit = self.unit;
        let known = |ty: &TypeRef| StaticType::Known(ty.clone());
        match unit.arena.kind(id) {
            ExprKind::Literal(literal) => Some(match literal {
                Literal::Null => StaticType::Null,
                Literal::Bool(_) => known(&TypeRef::BOOLEAN),
                Literal::Char(_) => known(&TypeRef::CHAR),
                Literal::Int(_) => known(&TypeRef::INT),
                Literal::Long(_) => known(&TypeRef::LONG),
                Literal::Float(_) => known(&TypeRef::FLOAT),
                Literal::Double(_) => known(&TypeRef::DOUBLE),
                Literal::Str(_) => StaticType::Known(TypeRef::string()),
            }),
            ExprKind::Ident(_) => match self.table.get(id)? {
                Binding::Slot(slot) => self.slot_types.get(&slot).map(known),
                Binding::Field(index) => unit.fields.get(index as usize).map(|f| known(&f.ty)),
            },
            ExprKind::Cast { ty, .. } => Some(known(ty)),
            ExprKind::InstanceOf { .. } => Some(known(&TypeRef::BOOLEAN)),
            _ => None,
        }
    }

    fn declare(&mut self, name: &Arc<str>, slot: u32, span: Span) {
        if let Some(previous) = self.lookup_local(name) {
            let diag = already_defined(span, previous.span, name);
            self.diagnostics.push(diag);
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(Local {
                name: Arc::clone(name),
                slot,
                span,
            });
        }
    }

    fn lookup_local(&self, name: &str) -> Option<&Local> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|local| &*local.name == name)
    }

    fn lookup(&self, name: &str) -> Option<Binding> {
        if let Some(local) = self.lookup_local(name) {
            return Some(Binding::Slot(local.slot));
        }
        self.fields
            .get(name)
            .map(|(index, _)| Binding::Field(*index))
    }

    fn expr(&mut self, id: ExprId) {
        ensure_sufficient_stack(|| self.expr_inner(id));
    }

    fn expr_inner(&mut self, id: ExprId) {
        let unit = self.unit;
        match unit.arena.kind(id) {
            ExprKind::Literal(_) | ExprKind::Error => {}
            ExprKind::Ident(name) => self.ident(id, name),
            ExprKind::Binary { left, right, .. } => {
                self.expr(*left);
                self.expr(*right);
            }
            ExprKind::Unary { operand, .. }
            | ExprKind::Cast { operand, .. }
            | ExprKind::InstanceOf { operand, .. } => self.expr(*operand),
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.expr(*cond);
                self.expr(*then_expr);
                self.expr(*else_expr);
            }
            ExprKind::Field { receiver, .. } => self.expr(*receiver),
            ExprKind::MethodCall { receiver, args, .. } => {
                self.expr(*receiver);
                for arg in args {
                    self.expr(*arg);
                }
            }
            ExprKind::Assign { target, value } => {
                self.expr(*value);
                self.assign_target(*target);
            }
        }
    }

    fn ident(&mut self, id: ExprId, name: &str) {
        if let Some(binding) = self.lookup(name) {
            self.table.record(id, binding);
            return;
        }
        let span = self.unit.arena.span(id);
        let mut diag = unknown_symbol(span, name);
        if self.scopes.is_empty() && self.unit.fields.iter().any(|f| &*f.name == name) {
            diag = diag.with_note("constants may only refer to constants declared before them");
        }
        self.diagnostics.push(diag);
    }

    fn assign_target(&mut self, target: ExprId) {
        let unit = self.unit;
        let span = unit.arena.span(target);
        let ExprKind::Ident(name) = unit.arena.kind(target) else {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E2003)
                    .with_message("invalid assignment target")
                    .with_label(span, "expected a variable"),
            );
            return;
        };
        match self.lookup(name) {
            Some(Binding::Slot(slot)) => self.table.record(target, Binding::Slot(slot)),
            Some(Binding::Field(_)) => {
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E2004)
                        .with_message(format!("cannot assign a value to constant `{name}`"))
                        .with_label(span, "constants are final"),
                );
            }
            None => self.diagnostics.push(unknown_symbol(span, name)),
        }
    }
}

/// Whether execution can continue past `stmt`.
fn completes_normally(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) | StmtKind::Tail(_) => false,
        StmtKind::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => completes_normally(then_branch) || completes_normally(else_branch),
        StmtKind::Block(stmts) => stmts.iter().all(completes_normally),
        StmtKind::If { .. } | StmtKind::Local { .. } | StmtKind::Expr(_) => true,
    }
}

fn is_empty(stmt: &Stmt) -> bool {
    matches!(&stmt.kind, StmtKind::Block(stmts) if stmts.is_empty())
}

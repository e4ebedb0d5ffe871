//! Tree-walking interpreter for one loaded unit.
//!
//! An [`Interpreter`] borrows everything immutable about the unit (syntax
//! tree, resolution table, constant values, linked classes) and owns only
//! its frame, so one loaded unit can be run by any number of threads at
//! once, each with its own interpreter.

use snip_ir::{
    ensure_sufficient_stack, BinaryOp, Binding, ExprId, ExprKind, Literal, ResolutionTable, Stmt,
    StmtKind, TypeRef, Unit,
};
use tracing::trace;

use crate::class::LinkedTypes;
use crate::conversion::{assign_convert, cast, instance_of};
use crate::errors::{class_cast, null_dereference, EvalError, EvalResult};
use crate::methods::{call_method, get_field};
use crate::operators::evaluate_binary;
use crate::unary_operators::evaluate_unary;
use crate::value::Value;

/// How a statement completed.
enum Flow {
    Normal,
    Return(Value),
}

/// Executes the method of a unit, or evaluates single expressions of it.
pub struct Interpreter<'a> {
    unit: &'a Unit,
    table: &'a ResolutionTable,
    fields: &'a [Value],
    types: &'a LinkedTypes,
    /// Parameters first, then locals in declaration order.
    frame: Vec<Value>,
    /// Declared type of each slot; `None` for untyped references.
    slot_types: Vec<Option<TypeRef>>,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter over `unit`.
    ///
    /// `fields` holds the values of the unit's constants that are already
    /// initialized, in declaration order.
    pub fn new(
        unit: &'a Unit,
        table: &'a ResolutionTable,
        fields: &'a [Value],
        types: &'a LinkedTypes,
    ) -> Self {
        let size = table.frame_size();
        Interpreter {
            unit,
            table,
            fields,
            types,
            frame: vec![Value::Null; size],
            slot_types: vec![None; size],
        }
    }

    /// Run the unit's method with `args` bound to its parameters.
    ///
    /// Arguments must already be converted to the parameter types. The
    /// returned value is converted to the declared result type where a
    /// widening conversion applies.
    pub fn invoke(mut self, args: Vec<Value>) -> EvalResult {
        let unit = self.unit;
        let method = &unit.method;
        trace!(unit = %unit.name, args = args.len(), "invoke");

        for (slot, (param, arg)) in method.params.iter().zip(args).enumerate() {
            self.store(slot, arg, Some(param.ty.clone()));
        }

        match self.exec_block(&method.body)? {
            Flow::Return(value) => {
                Ok(assign_convert(value.clone(), &method.result, self.types).unwrap_or(value))
            }
            Flow::Normal => Err(EvalError::new(format!(
                "method `{}` completed without returning a value",
                method.name
            ))
            .with_span(method.span)),
        }
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow, EvalError> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<Flow, EvalError> {
        match &stmt.kind {
            StmtKind::Return(Some(expr)) | StmtKind::Tail(expr) => {
                let value = self.eval(*expr)?;
                self.check_unboxing(&value, &self.unit.method.result, *expr)?;
                Ok(Flow::Return(value))
            }
            StmtKind::Return(None) => Ok(Flow::Return(Value::Null)),
            StmtKind::Local { decl, ty, init, .. } => {
                let value = self.eval(*init)?;
                let slot = self.table.local_slot(*decl) as usize;
                let (value, slot_type) = match ty {
                    Some(ty) => (self.convert_for(value, ty, *init)?, Some(ty.clone())),
                    // `var` takes the type of its initializer.
                    None => {
                        let inferred = value.primitive_kind().map(TypeRef::Primitive);
                        (value, inferred)
                    }
                };
                self.store(slot, value, slot_type);
                Ok(Flow::Normal)
            }
            StmtKind::Expr(expr) => self.eval(*expr).map(|_| Flow::Normal),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_condition(*cond)? {
                    self.exec(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::Block(stmts) => self.exec_block(stmts),
        }
    }

    fn store(&mut self, slot: usize, value: Value, ty: Option<TypeRef>) {
        let entries = (self.frame.get_mut(slot), self.slot_types.get_mut(slot));
        if let (Some(entry), Some(entry_ty)) = entries {
            *entry = value;
            *entry_ty = ty;
        }
    }

    /// Evaluate an expression.
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id))
            .map_err(|err| err.with_span(self.unit.arena.span(id)))
    }

    fn eval_inner(&mut self, id: ExprId) -> EvalResult {
        let unit = self.unit;
        match unit.arena.kind(id) {
            ExprKind::Literal(literal) => Ok(literal_value(literal)),
            ExprKind::Ident(name) => self.read_variable(id, name),
            ExprKind::Binary { op, left, right } => match op {
                BinaryOp::And => {
                    Ok(Value::Bool(self.eval_condition(*left)? && self.eval_condition(*right)?))
                }
                BinaryOp::Or => {
                    Ok(Value::Bool(self.eval_condition(*left)? || self.eval_condition(*right)?))
                }
                _ => {
                    let left = self.eval(*left)?;
                    let right = self.eval(*right)?;
                    evaluate_binary(left, right, *op)
                }
            },
            ExprKind::Unary { op, operand } => {
                let value = self.eval(*operand)?;
                evaluate_unary(value, *op)
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                if self.eval_condition(*cond)? {
                    self.eval(*then_expr)
                } else {
                    self.eval(*else_expr)
                }
            }
            ExprKind::Field { receiver, name } => {
                let receiver = self.eval(*receiver)?;
                get_field(&receiver, name)
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.eval(*receiver)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(*arg))
                    .collect::<Result<Vec<_>, _>>()?;
                call_method(&receiver, method, &args)
            }
            ExprKind::Cast { ty, operand } => {
                let value = self.eval(*operand)?;
                cast(value, ty, self.types)
            }
            ExprKind::InstanceOf { operand, ty } => {
                let value = self.eval(*operand)?;
                Ok(Value::Bool(instance_of(&value, ty, self.types)))
            }
            ExprKind::Assign { target, value } => self.assign(*target, *value),
            ExprKind::Error => Err(EvalError::new("cannot evaluate a malformed expression")),
        }
    }

    fn read_variable(&self, id: ExprId, name: &str) -> EvalResult {
        match self.table.get(id) {
            Some(Binding::Slot(slot)) => self
                .frame
                .get(slot as usize)
                .cloned()
                .ok_or_else(|| EvalError::new(format!("`{name}` has no frame slot"))),
            Some(Binding::Field(index)) => self
                .fields
                .get(index as usize)
                .cloned()
                .ok_or_else(|| EvalError::new(format!("constant `{name}` is not initialized"))),
            None => Err(EvalError::new(format!("unresolved name `{name}`"))),
        }
    }

    fn assign(&mut self, target: ExprId, value: ExprId) -> EvalResult {
        let Some(Binding::Slot(slot)) = self.table.get(target) else {
            return Err(EvalError::new("invalid assignment target"));
        };
        let slot = slot as usize;
        let value = self.eval(value)?;
        let value = match self.slot_types.get(slot).cloned().flatten() {
            Some(ty) => self.convert_for(value, &ty, target)?,
            None => value,
        };
        if let Some(entry) = self.frame.get_mut(slot) {
            *entry = value.clone();
        }
        Ok(value)
    }

    /// Assignment conversion of the value of expression `id` to `ty`.
    fn convert_for(&self, value: Value, ty: &TypeRef, id: ExprId) -> EvalResult {
        self.check_unboxing(&value, ty, id)?;
        let from = value.type_name().to_string();
        assign_convert(value, ty, self.types)
            .ok_or_else(|| class_cast(&from, &ty.to_string()).with_span(self.unit.arena.span(id)))
    }

    /// A `null` reaching a primitive type is an unboxing of `null`.
    fn check_unboxing(&self, value: &Value, ty: &TypeRef, id: ExprId) -> Result<(), EvalError> {
        match (value, ty) {
            (Value::Null, TypeRef::Primitive(kind)) => Err(null_dereference(&format!(
                "{kind}Value"
            ))
            .with_span(self.unit.arena.span(id))),
            _ => Ok(()),
        }
    }

    fn eval_condition(&mut self, id: ExprId) -> Result<bool, EvalError> {
        let value = self.eval(id)?;
        value.as_bool().ok_or_else(|| {
            class_cast(value.type_name(), "boolean").with_span(self.unit.arena.span(id))
        })
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Char(c) => Value::Char(*c),
        Literal::Int(n) => Value::Int(*n),
        Literal::Long(n) => Value::Long(*n),
        Literal::Float(f) => Value::Float(*f),
        Literal::Double(f) => Value::Double(*f),
        Literal::Str(s) => Value::Str(s.clone()),
    }
}

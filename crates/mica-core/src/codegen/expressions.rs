//! Expression lowering.
//!
//! Every evaluation returns an [`IrValue`] naming the Yul variable(s) that
//! hold the result. Array index and `.length` reads consult the loop cache
//! stack first; a hit substitutes the hoisted value instead of re-emitting
//! the length and slot computation.

use super::{IrValue, YulGenerator};
use crate::ast::expression::{
    Assignment, AssignmentOp, BinaryOp, Call, CallKind, Expression, ExpressionKind, Identifier,
    Literal, UnaryOp,
};
use crate::ast::types::{DataLocation, MagicKind, Type};
use crate::ast::Ident;
use crate::errors::{CodegenError, Result};
use crate::span::Span;

fn binary_builtin(op: BinaryOp, lhs: &str, rhs: &str) -> String {
    match op {
        BinaryOp::Add => format!("add({lhs}, {rhs})"),
        BinaryOp::Subtract => format!("sub({lhs}, {rhs})"),
        BinaryOp::Multiply => format!("mul({lhs}, {rhs})"),
        BinaryOp::Divide => format!("div({lhs}, {rhs})"),
        BinaryOp::Modulo => format!("mod({lhs}, {rhs})"),
        BinaryOp::Equal => format!("eq({lhs}, {rhs})"),
        BinaryOp::NotEqual => format!("iszero(eq({lhs}, {rhs}))"),
        BinaryOp::LessThan => format!("lt({lhs}, {rhs})"),
        BinaryOp::LessThanOrEqual => format!("iszero(gt({lhs}, {rhs}))"),
        BinaryOp::GreaterThan => format!("gt({lhs}, {rhs})"),
        BinaryOp::GreaterThanOrEqual => format!("iszero(lt({lhs}, {rhs}))"),
        BinaryOp::And => format!("and({lhs}, {rhs})"),
        BinaryOp::Or => format!("or({lhs}, {rhs})"),
    }
}

fn compound_builtin(op: AssignmentOp) -> &'static str {
    match op {
        AssignmentOp::Assign => "",
        AssignmentOp::AddAssign => "add",
        AssignmentOp::SubtractAssign => "sub",
        AssignmentOp::MultiplyAssign => "mul",
        AssignmentOp::DivideAssign => "div",
    }
}

impl YulGenerator {
    pub(crate) fn evaluate_expression(&mut self, expression: &Expression) -> Result<IrValue> {
        match &expression.kind {
            ExpressionKind::Identifier(identifier) => {
                self.evaluate_identifier(identifier, &expression.ty, expression.span)
            }
            ExpressionKind::Literal(Literal::Number(n)) => {
                let var = self.fresh_var();
                self.emit_line(&format!("let {var} := {n}"));
                Ok(IrValue::new(var, expression.ty.clone()))
            }
            ExpressionKind::Literal(Literal::Boolean(b)) => {
                let var = self.fresh_var();
                self.emit_line(&format!("let {var} := {}", u64::from(*b)));
                Ok(IrValue::new(var, expression.ty.clone()))
            }
            ExpressionKind::Binary(op, lhs, rhs) => {
                let lhs = self.evaluate_expression(lhs)?;
                let rhs = self.evaluate_expression(rhs)?;
                let var = self.fresh_var();
                self.emit_line(&format!(
                    "let {var} := {}",
                    binary_builtin(*op, lhs.name(), rhs.name())
                ));
                Ok(IrValue::new(var, expression.ty.clone()))
            }
            ExpressionKind::Unary(op, operand) => {
                self.evaluate_unary(*op, operand, &expression.ty, expression.span)
            }
            ExpressionKind::Assignment(assignment) => {
                self.evaluate_assignment(assignment, expression.span)
            }
            ExpressionKind::Member(base, member) => {
                self.evaluate_member(base, member, &expression.ty, expression.span)
            }
            ExpressionKind::Index(base, index) => {
                self.evaluate_index_read(base, index, &expression.ty, expression.span)
            }
            ExpressionKind::Call(call) => self.evaluate_call(call, &expression.ty, expression.span),
            ExpressionKind::Tuple(components) => match components.as_slice() {
                [single] => self.evaluate_expression(single),
                _ => Err(CodegenError::unsupported(
                    expression.span,
                    "multi-component tuples",
                )),
            },
            ExpressionKind::Conditional(condition, then_expr, else_expr) => {
                let condition = self.evaluate_expression(condition)?;
                let var = self.fresh_var();
                self.emit_line(&format!("let {var} := 0"));
                self.emit_line(&format!("switch {}", condition.name()));
                self.emit_line("case 0 {");
                self.indent_level += 1;
                let else_value = self.evaluate_expression(else_expr)?;
                self.emit_line(&format!("{var} := {}", else_value.name()));
                self.indent_level -= 1;
                self.emit_line("}");
                self.emit_line("default {");
                self.indent_level += 1;
                let then_value = self.evaluate_expression(then_expr)?;
                self.emit_line(&format!("{var} := {}", then_value.name()));
                self.indent_level -= 1;
                self.emit_line("}");
                Ok(IrValue::new(var, expression.ty.clone()))
            }
        }
    }

    fn evaluate_identifier(
        &mut self,
        identifier: &Identifier,
        ty: &Type,
        span: Span,
    ) -> Result<IrValue> {
        match self.state_slot(&identifier.name) {
            Some(slot) => match ty {
                Type::Array(array) if array.location == DataLocation::Storage => {
                    let stem = self.fresh_var();
                    self.emit_line(&format!("let {stem}_slot := {slot}"));
                    Ok(IrValue::new(stem, ty.clone()))
                }
                Type::Array(_) => Err(CodegenError::internal(format!(
                    "state variable `{}` is an array outside storage",
                    identifier.name
                ))),
                Type::Mapping(_, _) => {
                    // Mappings have a slot but no materialized value.
                    let stem = self.fresh_var();
                    self.emit_line(&format!("let {stem}_slot := {slot}"));
                    Ok(IrValue::new(stem, ty.clone()))
                }
                _ => {
                    let var = self.fresh_var();
                    self.emit_line(&format!("let {var} := sload({slot})"));
                    Ok(IrValue::new(var, ty.clone()))
                }
            },
            None => match ty {
                Type::Magic(_) => Err(CodegenError::unsupported(
                    span,
                    "built-in context objects outside a member access",
                )),
                // Locals and parameters live in Yul variables named after
                // their source names, reference types via suffixed parts.
                _ => Ok(IrValue::new(identifier.name.clone(), ty.clone())),
            },
        }
    }

    fn evaluate_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expression,
        ty: &Type,
        span: Span,
    ) -> Result<IrValue> {
        match op {
            UnaryOp::Not => {
                let value = self.evaluate_expression(operand)?;
                let var = self.fresh_var();
                self.emit_line(&format!("let {var} := iszero({})", value.name()));
                Ok(IrValue::new(var, ty.clone()))
            }
            UnaryOp::Negate => {
                let value = self.evaluate_expression(operand)?;
                let var = self.fresh_var();
                self.emit_line(&format!("let {var} := sub(0, {})", value.name()));
                Ok(IrValue::new(var, ty.clone()))
            }
            UnaryOp::Increment | UnaryOp::Decrement => {
                let ExpressionKind::Identifier(identifier) = &operand.kind else {
                    return Err(CodegenError::unsupported(
                        span,
                        "increment of a non-identifier expression",
                    ));
                };
                if self.state_slot(&identifier.name).is_some() {
                    return Err(CodegenError::unsupported(
                        span,
                        "increment of a state variable",
                    ));
                }
                let builtin = if op == UnaryOp::Increment { "add" } else { "sub" };
                let name = &identifier.name;
                self.emit_line(&format!("{name} := {builtin}({name}, 1)"));
                Ok(IrValue::new(name.clone(), ty.clone()))
            }
        }
    }

    fn evaluate_assignment(&mut self, assignment: &Assignment, span: Span) -> Result<IrValue> {
        match &assignment.lhs.kind {
            ExpressionKind::Identifier(identifier) => {
                self.evaluate_named_assignment(assignment, identifier, span)
            }
            ExpressionKind::Index(base, index) => {
                if !assignment.op.is_plain() {
                    return Err(CodegenError::unsupported(
                        span,
                        "compound assignment to an array element",
                    ));
                }
                let rhs = self.evaluate_expression(&assignment.rhs)?;
                let (pointer, location) = self.array_element_pointer(base, index, span)?;
                match location {
                    DataLocation::Storage => {
                        self.emit_line(&format!("sstore({pointer}, {})", rhs.name()));
                    }
                    DataLocation::Memory => {
                        self.emit_line(&format!("mstore({pointer}, {})", rhs.name()));
                    }
                    DataLocation::Calldata => {
                        return Err(CodegenError::unsupported(
                            span,
                            "assignment to a calldata array element",
                        ))
                    }
                }
                Ok(rhs)
            }
            _ => Err(CodegenError::unsupported(
                span,
                "assignment to this expression form",
            )),
        }
    }

    fn evaluate_named_assignment(
        &mut self,
        assignment: &Assignment,
        identifier: &Identifier,
        span: Span,
    ) -> Result<IrValue> {
        let lhs_ty = &assignment.lhs.ty;
        match self.state_slot(&identifier.name) {
            Some(slot) => {
                if lhs_ty.is_array() {
                    if !assignment.op.is_plain() {
                        return Err(CodegenError::unsupported(
                            span,
                            "compound assignment to an array",
                        ));
                    }
                    let rhs = self.evaluate_expression(&assignment.rhs)?;
                    let source = if assignment.rhs.ty.data_stored_in(DataLocation::Storage) {
                        rhs.slot()?
                    } else {
                        rhs.mpos()?
                    };
                    let target = self.evaluate_expression(&assignment.lhs)?;
                    self.emit_line(&format!(
                        "copy_array_to_storage({}, {source})",
                        target.slot()?
                    ));
                    Ok(rhs)
                } else {
                    let rhs = self.evaluate_expression(&assignment.rhs)?;
                    if assignment.op.is_plain() {
                        self.emit_line(&format!("sstore({slot}, {})", rhs.name()));
                        Ok(rhs)
                    } else {
                        let builtin = compound_builtin(assignment.op);
                        let var = self.fresh_var();
                        self.emit_line(&format!(
                            "let {var} := {builtin}(sload({slot}), {})",
                            rhs.name()
                        ));
                        self.emit_line(&format!("sstore({slot}, {var})"));
                        Ok(IrValue::new(var, lhs_ty.clone()))
                    }
                }
            }
            None => {
                let name = &identifier.name;
                let rhs = self.evaluate_expression(&assignment.rhs)?;
                match lhs_ty {
                    Type::Array(array) => {
                        if !assignment.op.is_plain() {
                            return Err(CodegenError::unsupported(
                                span,
                                "compound assignment to an array",
                            ));
                        }
                        match array.location {
                            DataLocation::Storage => {
                                self.emit_line(&format!("{name}_slot := {}", rhs.slot()?));
                            }
                            DataLocation::Memory => {
                                self.emit_line(&format!("{name}_mpos := {}", rhs.mpos()?));
                            }
                            DataLocation::Calldata => {
                                return Err(CodegenError::unsupported(
                                    span,
                                    "assignment to a calldata array",
                                ))
                            }
                        }
                        Ok(rhs)
                    }
                    _ => {
                        if assignment.op.is_plain() {
                            self.emit_line(&format!("{name} := {}", rhs.name()));
                        } else {
                            let builtin = compound_builtin(assignment.op);
                            self.emit_line(&format!("{name} := {builtin}({name}, {})", rhs.name()));
                        }
                        Ok(IrValue::new(name.clone(), lhs_ty.clone()))
                    }
                }
            }
        }
    }

    fn evaluate_member(
        &mut self,
        base: &Expression,
        member: &Ident,
        ty: &Type,
        span: Span,
    ) -> Result<IrValue> {
        if member.node == "length" && base.ty.is_array() {
            return self.array_length_value(base, span);
        }
        if let Type::Magic(kind) = &base.ty {
            let builtin = match (kind, member.node.as_str()) {
                (MagicKind::Message, "value") => "callvalue()",
                (MagicKind::Message, "sender") => "caller()",
                (MagicKind::Block, "timestamp") => "timestamp()",
                (MagicKind::Block, "number") => "number()",
                (MagicKind::Transaction, "origin") => "origin()",
                _ => {
                    return Err(CodegenError::unsupported(
                        span,
                        format!("built-in member `{}`", member.node),
                    ))
                }
            };
            let var = self.fresh_var();
            self.emit_line(&format!("let {var} := {builtin}"));
            return Ok(IrValue::new(var, ty.clone()));
        }
        Err(CodegenError::unsupported(
            span,
            format!("member access `{}`", member.node),
        ))
    }

    /// Produces the length of `base` as a value, preferring the loop cache.
    fn array_length_value(&mut self, base: &Expression, span: Span) -> Result<IrValue> {
        if let Some((length, _)) = self.cache_hit(base)? {
            return Ok(IrValue::new(length, Type::uint256()));
        }
        let array = base
            .ty
            .as_array()
            .ok_or_else(|| CodegenError::internal("length access on a non-array"))?
            .clone();
        let value = self.evaluate_expression(base)?;
        let var = self.fresh_var();
        match array.location {
            DataLocation::Storage => {
                if array.dynamically_sized {
                    let slot = value.slot()?;
                    self.emit_line(&format!("let {var} := sload({slot})"));
                } else {
                    let length = array.length.ok_or_else(|| {
                        CodegenError::internal("statically sized array without a length")
                    })?;
                    self.emit_line(&format!("let {var} := {length}"));
                }
            }
            DataLocation::Memory => {
                let mpos = value.mpos()?;
                self.emit_line(&format!("let {var} := mload({mpos})"));
            }
            DataLocation::Calldata => {
                return Err(CodegenError::unsupported(span, "calldata array length"))
            }
        }
        Ok(IrValue::new(var, Type::uint256()))
    }

    /// Emits the bounds check for `base[index]` and returns the element's
    /// location expression plus where it lives. Cached bases reuse the
    /// hoisted length and slot; everything else recomputes in place.
    pub(crate) fn array_element_pointer(
        &mut self,
        base: &Expression,
        index: &Expression,
        span: Span,
    ) -> Result<(String, DataLocation)> {
        let array = base
            .ty
            .as_array()
            .ok_or_else(|| CodegenError::unsupported(span, "indexing a non-array"))?
            .clone();
        let index = self.evaluate_expression(index)?;

        let (length_ref, position) = match self.cache_hit(base)? {
            Some((length, position)) => (length, position),
            None => {
                let value = self.evaluate_expression(base)?;
                match array.location {
                    DataLocation::Storage => {
                        let slot = value.slot()?;
                        let length_ref = if array.dynamically_sized {
                            let var = self.fresh_var();
                            self.emit_line(&format!("let {var} := sload({slot})"));
                            var
                        } else {
                            array
                                .length
                                .ok_or_else(|| {
                                    CodegenError::internal(
                                        "statically sized array without a length",
                                    )
                                })?
                                .to_string()
                        };
                        (length_ref, slot)
                    }
                    DataLocation::Memory => {
                        let mpos = value.mpos()?;
                        let var = self.fresh_var();
                        self.emit_line(&format!("let {var} := mload({mpos})"));
                        (var, mpos)
                    }
                    DataLocation::Calldata => {
                        return Err(CodegenError::unsupported(span, "calldata array indexing"))
                    }
                }
            }
        };

        self.emit_line(&format!(
            "if iszero(lt({}, {length_ref})) {{ panic_error_0x32() }}",
            index.name()
        ));
        let pointer = match array.location {
            DataLocation::Storage => {
                format!("add(array_dataslot({position}), {})", index.name())
            }
            DataLocation::Memory => {
                format!("add(add({position}, 0x20), mul({}, 0x20))", index.name())
            }
            DataLocation::Calldata => {
                return Err(CodegenError::unsupported(span, "calldata array indexing"))
            }
        };
        Ok((pointer, array.location))
    }

    fn evaluate_index_read(
        &mut self,
        base: &Expression,
        index: &Expression,
        ty: &Type,
        span: Span,
    ) -> Result<IrValue> {
        let (pointer, location) = self.array_element_pointer(base, index, span)?;
        let var = self.fresh_var();
        match location {
            DataLocation::Storage => self.emit_line(&format!("let {var} := sload({pointer})")),
            DataLocation::Memory => self.emit_line(&format!("let {var} := mload({pointer})")),
            DataLocation::Calldata => {
                return Err(CodegenError::unsupported(span, "calldata array indexing"))
            }
        }
        Ok(IrValue::new(var, ty.clone()))
    }

    fn evaluate_call(&mut self, call: &Call, ty: &Type, span: Span) -> Result<IrValue> {
        if call.kind == CallKind::TypeConversion {
            let argument = call.arguments.first().ok_or_else(|| {
                CodegenError::internal("type conversion without an argument")
            })?;
            let value = self.evaluate_expression(argument)?;
            return Ok(IrValue::new(value.name().to_string(), ty.clone()));
        }

        // Storage array resizing built-ins.
        if let ExpressionKind::Member(base, member) = &call.callee.kind {
            if base.ty.data_stored_in(DataLocation::Storage) && base.ty.is_array() {
                match member.node.as_str() {
                    "push" => {
                        let argument = call.arguments.first().ok_or_else(|| {
                            CodegenError::unsupported(span, "push without a value")
                        })?;
                        let value = self.evaluate_expression(argument)?;
                        let target = self.evaluate_expression(base)?;
                        self.emit_line(&format!(
                            "array_push({}, {})",
                            target.slot()?,
                            value.name()
                        ));
                        return Ok(IrValue::new(String::new(), Type::Unit));
                    }
                    "pop" => {
                        let target = self.evaluate_expression(base)?;
                        self.emit_line(&format!("array_pop({})", target.slot()?));
                        return Ok(IrValue::new(String::new(), Type::Unit));
                    }
                    _ => {}
                }
            }
        }

        let mut argument_names = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            let value = self.evaluate_expression(argument)?;
            argument_names.push(value.name().to_string());
        }
        let arguments = argument_names.join(", ");

        let callee_name = match &call.callee.kind {
            ExpressionKind::Identifier(identifier) => format!("fun_{}", identifier.name),
            ExpressionKind::Member(_, member) => format!("external_{}", member.node),
            _ => return Err(CodegenError::unsupported(span, "call to this expression form")),
        };

        let returns_value = call
            .callee
            .ty
            .as_function()
            .map(|function| !function.returns.is_empty())
            .unwrap_or(false);
        if returns_value {
            let var = self.fresh_var();
            self.emit_line(&format!("let {var} := {callee_name}({arguments})"));
            Ok(IrValue::new(var, ty.clone()))
        } else {
            self.emit_line(&format!("{callee_name}({arguments})"));
            Ok(IrValue::new(String::new(), Type::Unit))
        }
    }
}

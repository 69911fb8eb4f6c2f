//! Generic read-only AST traversal.
//!
//! Passes implement [`Visitor`] and get called back at pre-order
//! (`visit_*`, return `false` to skip the subtree) and post-order
//! (`end_visit_*`) hook points while a `walk_*` function drives the
//! recursion.

use super::expression::{Expression, ExpressionKind};
use super::statement::{Block, InlineAssembly, Statement};

pub trait Visitor<'ast> {
    fn visit_statement(&mut self, _statement: &'ast Statement) -> bool {
        true
    }

    fn end_visit_statement(&mut self, _statement: &'ast Statement) {}

    fn visit_block(&mut self, _block: &'ast Block) -> bool {
        true
    }

    fn end_visit_block(&mut self, _block: &'ast Block) {}

    fn visit_inline_assembly(&mut self, _assembly: &'ast InlineAssembly) {}

    fn visit_expression(&mut self, _expression: &'ast Expression) -> bool {
        true
    }

    fn end_visit_expression(&mut self, _expression: &'ast Expression) {}
}

pub fn walk_statement<'ast, V: Visitor<'ast>>(visitor: &mut V, statement: &'ast Statement) {
    if !visitor.visit_statement(statement) {
        return;
    }

    match statement {
        Statement::Block(block) => walk_block(visitor, block),
        Statement::VariableDeclaration(decl) => {
            if let Some(init) = &decl.initializer {
                walk_expression(visitor, init);
            }
        }
        Statement::Expression(expr) => walk_expression(visitor, expr),
        Statement::If(if_stmt) => {
            walk_expression(visitor, &if_stmt.condition);
            walk_block(visitor, &if_stmt.then_block);
            if let Some(else_block) = &if_stmt.else_block {
                walk_block(visitor, else_block);
            }
        }
        Statement::For(for_stmt) => {
            if let Some(init) = &for_stmt.init {
                walk_statement(visitor, init);
            }
            if let Some(condition) = &for_stmt.condition {
                walk_expression(visitor, condition);
            }
            if let Some(post) = &for_stmt.post {
                walk_expression(visitor, post);
            }
            walk_block(visitor, &for_stmt.body);
        }
        Statement::While(while_stmt) => {
            walk_expression(visitor, &while_stmt.condition);
            walk_block(visitor, &while_stmt.body);
        }
        Statement::InlineAssembly(assembly) => visitor.visit_inline_assembly(assembly),
        Statement::Return(value, _) => {
            if let Some(value) = value {
                walk_expression(visitor, value);
            }
        }
        Statement::Break(_) | Statement::Continue(_) => {}
    }

    visitor.end_visit_statement(statement);
}

pub fn walk_block<'ast, V: Visitor<'ast>>(visitor: &mut V, block: &'ast Block) {
    if !visitor.visit_block(block) {
        return;
    }
    for statement in &block.statements {
        walk_statement(visitor, statement);
    }
    visitor.end_visit_block(block);
}

pub fn walk_expression<'ast, V: Visitor<'ast>>(visitor: &mut V, expression: &'ast Expression) {
    if !visitor.visit_expression(expression) {
        return;
    }

    match &expression.kind {
        ExpressionKind::Identifier(_) | ExpressionKind::Literal(_) => {}
        ExpressionKind::Binary(_, lhs, rhs) => {
            walk_expression(visitor, lhs);
            walk_expression(visitor, rhs);
        }
        ExpressionKind::Unary(_, operand) => walk_expression(visitor, operand),
        ExpressionKind::Assignment(assignment) => {
            walk_expression(visitor, &assignment.lhs);
            walk_expression(visitor, &assignment.rhs);
        }
        ExpressionKind::Member(base, _) => walk_expression(visitor, base),
        ExpressionKind::Index(base, index) => {
            walk_expression(visitor, base);
            walk_expression(visitor, index);
        }
        ExpressionKind::Call(call) => {
            walk_expression(visitor, &call.callee);
            for argument in &call.arguments {
                walk_expression(visitor, argument);
            }
        }
        ExpressionKind::Conditional(condition, then_expr, else_expr) => {
            walk_expression(visitor, condition);
            walk_expression(visitor, then_expr);
            walk_expression(visitor, else_expr);
        }
        ExpressionKind::Tuple(components) => {
            for component in components {
                walk_expression(visitor, component);
            }
        }
    }

    visitor.end_visit_expression(expression);
}

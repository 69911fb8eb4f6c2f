//! Whole-loop safety analysis for storage array caching.
//!
//! One read-only traversal of the loop that answers a single question: is
//! every operation in this loop compatible with treating array identities,
//! lengths and slots as loop-invariant? A single violation anywhere
//! disqualifies the entire loop.

use super::Loop;
use crate::ast::expression::{CallKind, Expression, ExpressionKind};
use crate::ast::statement::{InlineAssembly, Statement};
use crate::ast::types::{DataLocation, MagicKind, Type};
use crate::ast::visit::Visitor;

pub struct SafetyChecker {
    safe: bool,
}

impl SafetyChecker {
    /// Returns true only if no disqualifying construct is found anywhere
    /// in the loop.
    pub fn check(loop_: &Loop<'_>) -> bool {
        let mut checker = SafetyChecker { safe: true };
        loop_.walk(&mut checker);
        checker.safe
    }

    /// `push`/`pop` on a dynamically sized storage array changes that
    /// array's length and storage layout.
    fn is_storage_array_resize(base: &Expression, member: &str) -> bool {
        if member != "push" && member != "pop" {
            return false;
        }
        match base.ty.as_array() {
            Some(array) => array.dynamically_sized && array.stored_in(DataLocation::Storage),
            None => false,
        }
    }
}

impl<'ast> Visitor<'ast> for SafetyChecker {
    fn visit_statement(&mut self, _statement: &'ast Statement) -> bool {
        // Verdict is final once set; skip the rest of the loop.
        self.safe
    }

    fn visit_inline_assembly(&mut self, _assembly: &'ast InlineAssembly) {
        // Unknowable side effects.
        self.safe = false;
    }

    fn visit_expression(&mut self, expression: &'ast Expression) -> bool {
        if !self.safe {
            return false;
        }
        if let ExpressionKind::Member(base, member) = &expression.kind {
            if Self::is_storage_array_resize(base, &member.node) {
                self.safe = false;
                return false;
            }
        }
        true
    }

    fn end_visit_expression(&mut self, expression: &'ast Expression) {
        match &expression.kind {
            // A call is judged solely by its declared mutability; the
            // callee's body is never inspected.
            ExpressionKind::Call(call) if call.kind == CallKind::Function => {
                if let Some(function) = call.callee.ty.as_function() {
                    if !function.mutability.is_view_or_pure() {
                        self.safe = false;
                    }
                }
            }
            ExpressionKind::Call(_) => {}
            // Reading the incoming call's attached value signals a code
            // path able to trigger reentrant external calls.
            ExpressionKind::Member(base, member) => {
                if base.ty == Type::Magic(MagicKind::Message) && member.node == "value" {
                    self.safe = false;
                }
            }
            // Assigning to a storage array replaces its identity wholesale.
            ExpressionKind::Assignment(assignment) => {
                if assignment.lhs.ty.data_stored_in(DataLocation::Storage)
                    && assignment.lhs.ty.is_array()
                {
                    self.safe = false;
                }
            }
            _ => {}
        }
    }
}

//! Canonical structural rendering of expressions.
//!
//! Two distinct subtrees with the same fingerprint denote the same source
//! location for caching purposes. The rendering is deterministic and
//! stable across repeated calls, and is the only equality key the
//! optimizer uses; node identity is never consulted.

use super::expression::{Expression, ExpressionKind, Literal};

pub fn fingerprint(expression: &Expression) -> String {
    match &expression.kind {
        ExpressionKind::Identifier(identifier) => identifier.name.clone(),
        ExpressionKind::Literal(Literal::Number(value)) => value.to_string(),
        ExpressionKind::Literal(Literal::Boolean(value)) => value.to_string(),
        ExpressionKind::Binary(op, lhs, rhs) => {
            format!("{} {} {}", fingerprint(lhs), op.symbol(), fingerprint(rhs))
        }
        ExpressionKind::Unary(op, operand) => {
            format!("{}{}", op.symbol(), fingerprint(operand))
        }
        ExpressionKind::Assignment(assignment) => format!(
            "{} {} {}",
            fingerprint(&assignment.lhs),
            assignment.op.symbol(),
            fingerprint(&assignment.rhs)
        ),
        ExpressionKind::Member(base, member) => {
            format!("{}.{}", fingerprint(base), member.node)
        }
        ExpressionKind::Index(base, index) => {
            format!("{}[{}]", fingerprint(base), fingerprint(index))
        }
        ExpressionKind::Call(call) => {
            let arguments: Vec<String> = call.arguments.iter().map(fingerprint).collect();
            format!("{}({})", fingerprint(&call.callee), arguments.join(","))
        }
        ExpressionKind::Conditional(condition, then_expr, else_expr) => format!(
            "{} ? {} : {}",
            fingerprint(condition),
            fingerprint(then_expr),
            fingerprint(else_expr)
        ),
        ExpressionKind::Tuple(components) => {
            let components: Vec<String> = components.iter().map(fingerprint).collect();
            format!("({})", components.join(", "))
        }
    }
}

mod common;

use common::*;
use mica_core::ast::types::StateMutability;
use mica_core::optimizer::safety::SafetyChecker;
use mica_core::optimizer::Loop;

#[test]
fn read_only_loop_is_safe() {
    let loop_ = counting_loop(
        length_of(var("arr", storage_array_ty())),
        vec![expr_stmt(assign(
            var("s", mica_core::ast::types::Type::uint256()),
            index(var("arr", storage_array_ty()), var("i", mica_core::ast::types::Type::uint256())),
        ))],
    );
    assert!(
        SafetyChecker::check(&Loop::For(&loop_)),
        "a loop that only reads array elements must be eligible"
    );
}

#[test]
fn push_on_storage_array_disqualifies() {
    let loop_ = counting_loop(
        num(10),
        vec![expr_stmt(push_call(var("arr", storage_array_ty()), num(1)))],
    );
    assert!(
        !SafetyChecker::check(&Loop::For(&loop_)),
        "push changes the array length mid-loop"
    );
}

#[test]
fn push_member_on_memory_array_is_not_a_resize() {
    use mica_core::ast::expression::{Expression, ExpressionKind};
    use mica_core::ast::types::Type;
    use mica_core::Span;

    let member = Expression::new(
        ExpressionKind::Member(Box::new(var("m", memory_array_ty())), ident("push")),
        Type::Unit,
        Span::DUMMY,
    );
    let loop_ = counting_loop(num(10), vec![expr_stmt(member)]);
    assert!(SafetyChecker::check(&Loop::For(&loop_)));
}

#[test]
fn push_member_on_storage_array_disqualifies_even_uncalled() {
    use mica_core::ast::expression::{Expression, ExpressionKind};
    use mica_core::ast::types::Type;
    use mica_core::Span;

    let member = Expression::new(
        ExpressionKind::Member(Box::new(var("arr", storage_array_ty())), ident("push")),
        Type::Unit,
        Span::DUMMY,
    );
    let loop_ = counting_loop(num(10), vec![expr_stmt(member)]);
    assert!(!SafetyChecker::check(&Loop::For(&loop_)));
}

#[test]
fn state_mutating_call_disqualifies() {
    let loop_ = counting_loop(
        num(10),
        vec![expr_stmt(call_with_mutability(
            "mutate",
            StateMutability::NonPayable,
        ))],
    );
    assert!(
        !SafetyChecker::check(&Loop::For(&loop_)),
        "a call judged by declared mutability may write storage"
    );
}

#[test]
fn view_and_pure_calls_are_safe() {
    for mutability in [StateMutability::View, StateMutability::Pure] {
        let loop_ = counting_loop(
            num(10),
            vec![expr_stmt(call_with_mutability("probe", mutability))],
        );
        assert!(
            SafetyChecker::check(&Loop::For(&loop_)),
            "{mutability:?} calls cannot modify storage"
        );
    }
}

#[test]
fn msg_value_read_disqualifies() {
    let loop_ = counting_loop(
        num(10),
        vec![expr_stmt(assign(
            var("s", mica_core::ast::types::Type::uint256()),
            msg_value(),
        ))],
    );
    assert!(!SafetyChecker::check(&Loop::For(&loop_)));
}

#[test]
fn disqualifier_in_condition_counts() {
    // The whole loop is inspected, not just the body.
    let loop_ = counting_loop(msg_value(), Vec::new());
    assert!(!SafetyChecker::check(&Loop::For(&loop_)));
}

#[test]
fn inline_assembly_disqualifies() {
    let loop_ = counting_loop(num(10), vec![asm("sstore(0, 1)")]);
    assert!(
        !SafetyChecker::check(&Loop::For(&loop_)),
        "assembly effects are unknowable"
    );
}

#[test]
fn storage_array_assignment_disqualifies() {
    let loop_ = counting_loop(
        num(10),
        vec![expr_stmt(assign(
            var("p", storage_pointer_ty()),
            var("q", storage_pointer_ty()),
        ))],
    );
    assert!(
        !SafetyChecker::check(&Loop::For(&loop_)),
        "re-pointing a storage array reference invalidates cached identity"
    );
}

#[test]
fn scalar_assignment_is_safe() {
    let ty = mica_core::ast::types::Type::uint256();
    let loop_ = counting_loop(
        num(10),
        vec![expr_stmt(assign(var("s", ty.clone()), var("i", ty)))],
    );
    assert!(SafetyChecker::check(&Loop::For(&loop_)));
}

#[test]
fn while_loops_are_checked_too() {
    let loop_ = while_loop(
        lt(var("i", mica_core::ast::types::Type::uint256()), num(10)),
        block(vec![asm("pop(0)")]),
    );
    assert!(!SafetyChecker::check(&Loop::While(&loop_)));
}

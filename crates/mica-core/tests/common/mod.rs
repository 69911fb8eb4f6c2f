#![allow(dead_code)]

//! Shared AST builders for integration tests.
//!
//! Constructs type-checked nodes directly, the way the checker would hand
//! them to code generation.

use mica_core::ast::expression::{
    Assignment, AssignmentOp, BinaryOp, Call, CallKind, Expression, ExpressionKind, Identifier,
    Literal, UnaryOp,
};
use mica_core::ast::statement::{
    Block, ForStatement, IfStatement, InlineAssembly, Statement, VariableDeclaration,
    WhileStatement,
};
use mica_core::ast::types::{
    ArrayType, DataLocation, FunctionType, MagicKind, StateMutability, Type,
};
use mica_core::ast::{Function, Ident, Spanned};
use mica_core::Span;

/// Span given to loops built by these helpers.
pub const LOOP_SPAN: Span = Span::new(100, 500);
/// A declaration site lexically before [`LOOP_SPAN`].
pub const BEFORE_LOOP: Span = Span::new(10, 20);
/// A declaration site lexically inside [`LOOP_SPAN`].
pub const INSIDE_LOOP: Span = Span::new(150, 160);

pub fn ident(name: &str) -> Ident {
    Spanned::new(name.to_string(), Span::DUMMY)
}

pub fn storage_array_ty() -> Type {
    Type::Array(ArrayType {
        element: Box::new(Type::uint256()),
        location: DataLocation::Storage,
        dynamically_sized: true,
        length: None,
        is_pointer: false,
    })
}

pub fn storage_pointer_ty() -> Type {
    Type::Array(ArrayType {
        element: Box::new(Type::uint256()),
        location: DataLocation::Storage,
        dynamically_sized: true,
        length: None,
        is_pointer: true,
    })
}

pub fn static_storage_array_ty(length: u64) -> Type {
    Type::Array(ArrayType {
        element: Box::new(Type::uint256()),
        location: DataLocation::Storage,
        dynamically_sized: false,
        length: Some(length),
        is_pointer: false,
    })
}

pub fn memory_array_ty() -> Type {
    Type::Array(ArrayType {
        element: Box::new(Type::uint256()),
        location: DataLocation::Memory,
        dynamically_sized: true,
        length: None,
        is_pointer: true,
    })
}

pub fn var(name: &str, ty: Type) -> Expression {
    var_declared_at(name, ty, BEFORE_LOOP)
}

pub fn var_declared_at(name: &str, ty: Type, decl_span: Span) -> Expression {
    Expression::new(
        ExpressionKind::Identifier(Identifier {
            name: name.to_string(),
            decl_span,
        }),
        ty,
        Span::DUMMY,
    )
}

pub fn num(value: u64) -> Expression {
    Expression::new(
        ExpressionKind::Literal(Literal::Number(value)),
        Type::uint256(),
        Span::DUMMY,
    )
}

pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Expression {
    let ty = match op {
        BinaryOp::Add
        | BinaryOp::Subtract
        | BinaryOp::Multiply
        | BinaryOp::Divide
        | BinaryOp::Modulo => Type::uint256(),
        _ => Type::bool(),
    };
    Expression::new(
        ExpressionKind::Binary(op, Box::new(lhs), Box::new(rhs)),
        ty,
        Span::DUMMY,
    )
}

pub fn lt(lhs: Expression, rhs: Expression) -> Expression {
    binary(BinaryOp::LessThan, lhs, rhs)
}

pub fn index(base: Expression, idx: Expression) -> Expression {
    Expression::new(
        ExpressionKind::Index(Box::new(base), Box::new(idx)),
        Type::uint256(),
        Span::DUMMY,
    )
}

pub fn length_of(base: Expression) -> Expression {
    Expression::new(
        ExpressionKind::Member(Box::new(base), ident("length")),
        Type::uint256(),
        Span::DUMMY,
    )
}

pub fn assign(lhs: Expression, rhs: Expression) -> Expression {
    assignment(lhs, AssignmentOp::Assign, rhs)
}

pub fn assignment(lhs: Expression, op: AssignmentOp, rhs: Expression) -> Expression {
    let ty = lhs.ty.clone();
    Expression::new(
        ExpressionKind::Assignment(Box::new(Assignment { lhs, op, rhs })),
        ty,
        Span::DUMMY,
    )
}

pub fn increment(name: &str) -> Expression {
    Expression::new(
        ExpressionKind::Unary(
            UnaryOp::Increment,
            Box::new(var(name, Type::uint256())),
        ),
        Type::uint256(),
        Span::DUMMY,
    )
}

pub fn msg_value() -> Expression {
    Expression::new(
        ExpressionKind::Member(
            Box::new(Expression::new(
                ExpressionKind::Identifier(Identifier {
                    name: "msg".to_string(),
                    decl_span: Span::DUMMY,
                }),
                Type::Magic(MagicKind::Message),
                Span::DUMMY,
            )),
            ident("value"),
        ),
        Type::uint256(),
        Span::DUMMY,
    )
}

fn function_ty(mutability: StateMutability, returns: Vec<Type>) -> Type {
    Type::Function(FunctionType {
        parameters: Vec::new(),
        returns,
        mutability,
    })
}

/// Call to a free function with the given mutability and no return value.
pub fn call_with_mutability(name: &str, mutability: StateMutability) -> Expression {
    Expression::new(
        ExpressionKind::Call(Box::new(Call {
            callee: var(name, function_ty(mutability, Vec::new())),
            arguments: Vec::new(),
            kind: CallKind::Function,
        })),
        Type::Unit,
        Span::DUMMY,
    )
}

/// `base.push(value)` on a dynamically sized storage array.
pub fn push_call(base: Expression, value: Expression) -> Expression {
    Expression::new(
        ExpressionKind::Call(Box::new(Call {
            callee: Expression::new(
                ExpressionKind::Member(Box::new(base), ident("push")),
                function_ty(StateMutability::NonPayable, Vec::new()),
                Span::DUMMY,
            ),
            arguments: vec![value],
            kind: CallKind::Function,
        })),
        Type::Unit,
        Span::DUMMY,
    )
}

pub fn expr_stmt(expr: Expression) -> Statement {
    Statement::Expression(expr)
}

pub fn decl(name: &str, ty: Type, initializer: Option<Expression>) -> Statement {
    Statement::VariableDeclaration(VariableDeclaration {
        name: ident(name),
        ty,
        initializer,
        span: Span::DUMMY,
    })
}

pub fn decl_at(name: &str, ty: Type, initializer: Option<Expression>, span: Span) -> Statement {
    Statement::VariableDeclaration(VariableDeclaration {
        name: ident(name),
        ty,
        initializer,
        span,
    })
}

pub fn block(statements: Vec<Statement>) -> Block {
    Block {
        statements,
        span: Span::DUMMY,
    }
}

pub fn nested_block(statements: Vec<Statement>) -> Statement {
    Statement::Block(block(statements))
}

pub fn if_stmt(condition: Expression, then_block: Block) -> Statement {
    Statement::If(IfStatement {
        condition,
        then_block,
        else_block: None,
        span: Span::DUMMY,
    })
}

pub fn asm(code: &str) -> Statement {
    Statement::InlineAssembly(InlineAssembly {
        code: code.to_string(),
        span: Span::DUMMY,
    })
}

pub fn for_loop(
    init: Option<Statement>,
    condition: Option<Expression>,
    post: Option<Expression>,
    body: Block,
) -> ForStatement {
    ForStatement {
        init,
        condition,
        post,
        body,
        span: LOOP_SPAN,
    }
}

pub fn while_loop(condition: Expression, body: Block) -> WhileStatement {
    WhileStatement {
        condition,
        body,
        span: LOOP_SPAN,
    }
}

/// `for (let i := 0; i < <limit>; i++) { <body> }`
pub fn counting_loop(limit: Expression, body: Vec<Statement>) -> ForStatement {
    for_loop(
        Some(decl("i", Type::uint256(), Some(num(0)))),
        Some(lt(var("i", Type::uint256()), limit)),
        Some(increment("i")),
        block(body),
    )
}

pub fn function_with(statements: Vec<Statement>) -> Function {
    Function {
        name: ident("f"),
        body: block(statements),
        span: Span::DUMMY,
    }
}

/// Number of non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

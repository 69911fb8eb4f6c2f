use super::types::Type;
use super::Ident;
use crate::span::Span;

/// Type-annotated expression. Every expression reaching code generation
/// carries its resolved type.
#[derive(Debug, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub ty: Type,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, ty: Type, span: Span) -> Self {
        Expression { kind, ty, span }
    }
}

#[derive(Debug, Clone)]
pub enum ExpressionKind {
    Identifier(Identifier),
    Literal(Literal),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
    Unary(UnaryOp, Box<Expression>),
    Assignment(Box<Assignment>),
    Member(Box<Expression>, Ident),
    Index(Box<Expression>, Box<Expression>),
    Call(Box<Call>),
    Conditional(Box<Expression>, Box<Expression>, Box<Expression>),
    /// Parenthesized expression or tuple of components.
    Tuple(Vec<Expression>),
}

/// Name reference, resolved to its declaration site.
#[derive(Debug, Clone)]
pub struct Identifier {
    pub name: String,
    /// Span of the declaration this name resolves to.
    pub decl_span: Span,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub lhs: Expression,
    pub op: AssignmentOp,
    pub rhs: Expression,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub callee: Expression,
    pub arguments: Vec<Expression>,
    pub kind: CallKind,
}

/// What a call expression actually is after type checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Function,
    TypeConversion,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(u64),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Increment,
    Decrement,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOp {
    Assign,         // =
    AddAssign,      // +=
    SubtractAssign, // -=
    MultiplyAssign, // *=
    DivideAssign,   // /=
}

impl AssignmentOp {
    /// True for plain `=`, false for compound operators.
    pub fn is_plain(self) -> bool {
        matches!(self, AssignmentOp::Assign)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AssignmentOp::Assign => "=",
            AssignmentOp::AddAssign => "+=",
            AssignmentOp::SubtractAssign => "-=",
            AssignmentOp::MultiplyAssign => "*=",
            AssignmentOp::DivideAssign => "/=",
        }
    }
}

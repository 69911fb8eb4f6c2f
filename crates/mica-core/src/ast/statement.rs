use super::expression::Expression;
use super::types::Type;
use super::Ident;
use crate::span::Span;

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Block(Block),
    VariableDeclaration(VariableDeclaration),
    Expression(Expression),
    If(IfStatement),
    For(Box<ForStatement>),
    While(Box<WhileStatement>),
    InlineAssembly(InlineAssembly),
    Return(Option<Expression>, Span),
    Break(Span),
    Continue(Span),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Block(b) => b.span,
            Statement::VariableDeclaration(d) => d.span,
            Statement::Expression(e) => e.span,
            Statement::If(i) => i.span,
            Statement::For(f) => f.span,
            Statement::While(w) => w.span,
            Statement::InlineAssembly(a) => a.span,
            Statement::Return(_, span) | Statement::Break(span) | Statement::Continue(span) => {
                *span
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub name: Ident,
    pub ty: Type,
    pub initializer: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStatement {
    pub init: Option<Statement>,
    pub condition: Option<Expression>,
    pub post: Option<Expression>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Block,
    pub span: Span,
}

/// Embedded low-level assembly. Opaque to every analysis; its effects are
/// unknowable.
#[derive(Debug, Clone)]
pub struct InlineAssembly {
    pub code: String,
    pub span: Span,
}

pub mod expression;
pub mod fingerprint;
pub mod statement;
pub mod types;
pub mod visit;

use crate::span::Span;
use types::Type;

/// Wrapper for AST nodes with span information
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Spanned { node, span }
    }
}

/// Identifier
pub type Ident = Spanned<String>;

/// A contract after type checking: state variables with assigned storage
/// slots, plus the functions to lower.
#[derive(Debug, Clone)]
pub struct Contract {
    pub name: Ident,
    pub state_variables: Vec<StateVariable>,
    pub functions: Vec<Function>,
    pub span: Span,
}

/// State variable with its storage slot as assigned by the layout phase.
#[derive(Debug, Clone)]
pub struct StateVariable {
    pub name: Ident,
    pub ty: Type,
    pub slot: u64,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: Ident,
    pub body: statement::Block,
    pub span: Span,
}

use crate::span::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// A bookkeeping invariant inside the compiler was violated. This is a
    /// bug in the compiler itself, never a problem with the input program,
    /// and aborts code generation.
    #[error("internal compiler error: {0}")]
    Internal(String),

    #[error("unsupported construct at {span}: {message}")]
    Unsupported { span: Span, message: String },
}

impl CodegenError {
    pub fn internal(message: impl Into<String>) -> Self {
        CodegenError::Internal(message.into())
    }

    pub fn unsupported(span: Span, message: impl Into<String>) -> Self {
        CodegenError::Unsupported {
            span,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodegenError>;

//! Core compiler library for the Mica contract language.
//!
//! The crate lowers type-checked contract ASTs to Yul. Its centerpiece is
//! the storage array loop caching optimization: loops that provably cannot
//! change which storage arrays their names refer to get each array's
//! length and slot computed once before the loop instead of once per
//! iteration.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod optimizer;
pub mod span;

pub use codegen::{IrValue, YulGenerator};
pub use config::{CodegenOptions, OptimizationLevel};
pub use errors::{CodegenError, Result};
pub use span::Span;

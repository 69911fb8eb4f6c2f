//! Storage array loop caching.
//!
//! For a loop whose body provably cannot change which storage arrays its
//! names refer to, the expensive per-iteration computation of an array's
//! length and storage slot is hoisted to a single point before the loop.
//! Three phases run per loop, in order:
//!
//! 1. [`safety::SafetyChecker`] decides whether the loop is eligible at all;
//! 2. [`collector::CandidateCollector`] determines which array base
//!    expressions qualify for caching;
//! 3. [`access::generate_cached_accesses`] emits each candidate's length
//!    and slot computation exactly once and publishes them in a
//!    [`LoopCache`] for the rest of the loop's code generation.
//!
//! Every loop gets a fresh, independently owned cache that is discarded
//! when the loop's generation ends; nested loops run their own attempt and
//! never touch an outer loop's state.

pub mod access;
pub mod collector;
pub mod safety;

use crate::ast::expression::Expression;
use crate::ast::fingerprint::fingerprint;
use crate::ast::statement::{Block, ForStatement, WhileStatement};
use crate::ast::visit::{self, Visitor};
use crate::errors::{CodegenError, Result};
use crate::span::Span;
use rustc_hash::{FxHashMap, FxHashSet};

/// The loop statement under analysis.
#[derive(Debug, Clone, Copy)]
pub enum Loop<'ast> {
    For(&'ast ForStatement),
    While(&'ast WhileStatement),
}

impl<'ast> Loop<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Loop::For(f) => f.span,
            Loop::While(w) => w.span,
        }
    }

    pub fn body(&self) -> &'ast Block {
        match self {
            Loop::For(f) => &f.body,
            Loop::While(w) => &w.body,
        }
    }

    /// Drives a visitor over every part of the loop, in lexical order.
    pub fn walk<V: Visitor<'ast>>(&self, visitor: &mut V) {
        match self {
            Loop::For(f) => {
                if let Some(init) = &f.init {
                    visit::walk_statement(visitor, init);
                }
                if let Some(condition) = &f.condition {
                    visit::walk_expression(visitor, condition);
                }
                if let Some(post) = &f.post {
                    visit::walk_expression(visitor, post);
                }
                visit::walk_block(visitor, &f.body);
            }
            Loop::While(w) => {
                visit::walk_expression(visitor, &w.condition);
                visit::walk_block(visitor, &w.body);
            }
        }
    }
}

/// Cached length/slot values for one loop's optimization attempt.
///
/// The active registry records which array base fingerprints are currently
/// cacheable; the length and slot maps record the generated value names
/// once the access generator has run. All three are keyed by the canonical
/// expression fingerprint and torn down together when the loop's
/// generation concludes.
#[derive(Debug, Default)]
pub struct LoopCache {
    active: FxHashSet<String>,
    lengths: FxHashMap<String, String>,
    slots: FxHashMap<String, String>,
}

impl LoopCache {
    pub fn new() -> Self {
        LoopCache::default()
    }

    /// Whether the given fingerprint is currently cacheable.
    pub fn is_cached(&self, fp: &str) -> bool {
        self.active.contains(fp)
    }

    /// Name of the hoisted length value for `base`.
    ///
    /// Asking for an expression that never went through collection and
    /// access generation is a bookkeeping bug in the compiler, reported as
    /// [`CodegenError::Internal`].
    pub fn length_var(&self, base: &Expression) -> Result<&str> {
        let fp = fingerprint(base);
        self.lengths.get(&fp).map(String::as_str).ok_or_else(|| {
            CodegenError::internal(format!("array length was never generated for `{fp}`"))
        })
    }

    /// Name of the hoisted slot (or memory position) value for `base`.
    pub fn slot_var(&self, base: &Expression) -> Result<&str> {
        let fp = fingerprint(base);
        self.slots.get(&fp).map(String::as_str).ok_or_else(|| {
            CodegenError::internal(format!("array slot was never generated for `{fp}`"))
        })
    }

    pub(crate) fn register(&mut self, fp: String) {
        self.active.insert(fp);
    }

    /// Removes the fingerprint from the registry and both value maps.
    pub(crate) fn remove(&mut self, fp: &str) {
        self.active.remove(fp);
        self.lengths.remove(fp);
        self.slots.remove(fp);
    }

    pub(crate) fn record_length(&mut self, fp: String, var: String) {
        self.lengths.insert(fp, var);
    }

    pub(crate) fn record_slot(&mut self, fp: String, var: String) {
        self.slots.insert(fp, var);
    }
}

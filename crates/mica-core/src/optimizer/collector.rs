//! Candidate collection for storage array caching.
//!
//! Walks an eligible loop and produces the ordered set of array base
//! expressions whose length and slot are safe to compute once before the
//! loop. The collector maintains a stack of lexical scope frames: a base
//! discovered inside a nested block never outlives that block, and a base
//! whose name is reassigned mid-loop is evicted for the rest of the loop.

use super::{Loop, LoopCache};
use crate::ast::expression::{Assignment, Expression, ExpressionKind};
use crate::ast::fingerprint::fingerprint;
use crate::ast::statement::Block;
use crate::ast::types::DataLocation;
use crate::ast::visit::Visitor;
use crate::span::Span;
use rustc_hash::FxHashSet;
use tracing::trace;

/// One lexical scope: the fingerprints first observed while it was open,
/// and the corresponding base expressions in discovery order.
#[derive(Default)]
struct ScopeFrame<'ast> {
    inserted: FxHashSet<String>,
    order: Vec<&'ast Expression>,
}

pub struct CandidateCollector<'ast> {
    cache: LoopCache,
    scopes: Vec<ScopeFrame<'ast>>,
    /// Fingerprints invalidated by reassignment; barred from
    /// re-qualifying, otherwise a hoisted value would go stale.
    evicted: FxHashSet<String>,
    loop_span: Span,
    block_depth: usize,
}

impl<'ast> CandidateCollector<'ast> {
    /// Collects cacheable array bases from `loop_`. Only meaningful when
    /// the safety check passed.
    ///
    /// Returns the cache seeded with the surviving registry plus the
    /// candidates in discovery order; an empty candidate list means the
    /// loop is left unoptimized.
    pub fn collect(loop_: &Loop<'ast>) -> (LoopCache, Vec<&'ast Expression>) {
        let mut collector = CandidateCollector {
            cache: LoopCache::new(),
            scopes: vec![ScopeFrame::default()],
            evicted: FxHashSet::default(),
            loop_span: loop_.span(),
            block_depth: 0,
        };
        loop_.walk(&mut collector);

        let survivors = collector.scopes.pop().unwrap_or_default();
        (collector.cache, survivors.order)
    }

    fn add_candidate(&mut self, base: &'ast Expression) {
        let fp = fingerprint(base);
        trace!(base = %fp, "storage array access is cacheable");
        self.cache.register(fp.clone());
        if let Some(frame) = self.scopes.last_mut() {
            frame.inserted.insert(fp);
            frame.order.push(base);
        }
    }

    /// Evicts a reassigned base from the registry and from whichever open
    /// frame recorded its insertion.
    fn evict(&mut self, fp: &str) {
        trace!(base = %fp, "reassignment invalidates cached array");
        self.cache.remove(fp);
        for frame in self.scopes.iter_mut().rev() {
            if frame.inserted.remove(fp) {
                frame.order.retain(|expr| fingerprint(expr) != fp);
                break;
            }
        }
        self.evicted.insert(fp.to_string());
    }

    fn qualifies(&self, fp: &str) -> bool {
        !self.cache.is_cached(fp) && !self.evicted.contains(fp)
    }

    fn note_index_access(&mut self, base: &'ast Expression) {
        let Some(array) = base.ty.as_array() else {
            return;
        };
        if !array.stored_in(DataLocation::Storage) {
            return;
        }
        // Only directly named arrays have a statically fixed identity.
        let ExpressionKind::Identifier(identifier) = &base.kind else {
            return;
        };
        // A storage pointer declared inside the loop body could be
        // re-pointed each iteration; only pointers declared strictly
        // before the loop are loop-invariant.
        if array.is_pointer && !identifier.decl_span.precedes(self.loop_span) {
            return;
        }
        if self.qualifies(&fingerprint(base)) {
            self.add_candidate(base);
        }
    }

    fn note_length_access(&mut self, base: &'ast Expression) {
        let Some(array) = base.ty.as_array() else {
            return;
        };
        if !matches!(base.kind, ExpressionKind::Identifier(_)) {
            return;
        }
        // Pointer-typed array references are never cacheable for length.
        if array.is_pointer {
            return;
        }
        if !array.stored_in(DataLocation::Storage) {
            return;
        }
        if self.qualifies(&fingerprint(base)) {
            self.add_candidate(base);
        }
    }

    fn note_assignment(&mut self, assignment: &'ast Assignment) {
        if !assignment.op.is_plain() {
            return;
        }
        let lhs = fingerprint(&assignment.lhs);
        if !self.cache.is_cached(&lhs) {
            return;
        }
        // `a = a` does not change what the name denotes.
        if lhs == fingerprint(&assignment.rhs) {
            return;
        }
        self.evict(&lhs);
    }
}

impl<'ast> Visitor<'ast> for CandidateCollector<'ast> {
    fn visit_block(&mut self, _block: &'ast Block) -> bool {
        self.block_depth += 1;
        // The loop body itself is the top-level frame, pushed at
        // construction; only blocks nested within it open a new frame.
        if self.block_depth > 1 {
            self.scopes.push(ScopeFrame::default());
        }
        true
    }

    fn end_visit_block(&mut self, _block: &'ast Block) {
        if self.block_depth > 1 {
            if let Some(frame) = self.scopes.pop() {
                for fp in &frame.inserted {
                    self.cache.remove(fp);
                }
            }
        }
        self.block_depth -= 1;
    }

    fn end_visit_expression(&mut self, expression: &'ast Expression) {
        match &expression.kind {
            ExpressionKind::Index(base, _) => self.note_index_access(base),
            ExpressionKind::Member(base, member) if member.node == "length" => {
                self.note_length_access(base)
            }
            ExpressionKind::Assignment(assignment) => self.note_assignment(assignment),
            _ => {}
        }
    }
}

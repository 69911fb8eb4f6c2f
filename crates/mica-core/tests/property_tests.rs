mod common;

use common::*;
use mica_core::ast::fingerprint::fingerprint;
use mica_core::ast::types::{ArrayType, DataLocation, Type};
use mica_core::optimizer::collector::CandidateCollector;
use mica_core::optimizer::Loop;
use proptest::prelude::*;

proptest! {
    /// The qualification decision for a single access depends only on the
    /// data location, pointer-ness, declaration position and access kind.
    #[test]
    fn qualification_follows_the_guard_table(
        is_pointer in any::<bool>(),
        declared_before in any::<bool>(),
        via_index in any::<bool>(),
        in_storage in any::<bool>(),
    ) {
        let ty = Type::Array(ArrayType {
            element: Box::new(Type::uint256()),
            location: if in_storage {
                DataLocation::Storage
            } else {
                DataLocation::Memory
            },
            dynamically_sized: true,
            length: None,
            is_pointer,
        });
        let decl_span = if declared_before { BEFORE_LOOP } else { INSIDE_LOOP };
        let base = var_declared_at("a", ty, decl_span);
        let access = if via_index {
            index(base, num(0))
        } else {
            length_of(base)
        };
        let loop_ = counting_loop(num(10), vec![expr_stmt(access)]);
        let (_, candidates) = CandidateCollector::collect(&Loop::For(&loop_));

        let expected = in_storage
            && if via_index {
                !is_pointer || declared_before
            } else {
                !is_pointer
            };
        prop_assert_eq!(candidates.len(), usize::from(expected));
    }

    /// Cache identity is structural: where a node was written never
    /// changes its fingerprint.
    #[test]
    fn fingerprints_ignore_spans(name in "[a-z]{1,8}", idx in 0u64..100) {
        let a = index(
            var_declared_at(&name, storage_array_ty(), BEFORE_LOOP),
            num(idx),
        );
        let b = index(
            var_declared_at(&name, storage_array_ty(), INSIDE_LOOP),
            num(idx),
        );
        prop_assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn distinct_names_never_collide(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        prop_assume!(a != b);
        prop_assert_ne!(
            fingerprint(&var(&a, storage_array_ty())),
            fingerprint(&var(&b, storage_array_ty()))
        );
    }

    /// However many times a base is accessed, it is hoisted at most once.
    #[test]
    fn repeated_accesses_never_duplicate_candidates(accesses in 1usize..8) {
        let body = (0..accesses)
            .map(|i| {
                expr_stmt(index(var("arr", storage_array_ty()), num(i as u64)))
            })
            .collect();
        let loop_ = counting_loop(num(10), body);
        let (_, candidates) = CandidateCollector::collect(&Loop::For(&loop_));
        prop_assert_eq!(candidates.len(), 1);
    }
}

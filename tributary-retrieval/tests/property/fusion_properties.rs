use proptest::prelude::*;

use test_fixtures::hit;
use tributary_core::config::FusionWeights;
use tributary_core::models::{Modality, RetrievedHit};
use tributary_retrieval::{availability_weights, fuse, ModalityHits};

fn arb_list(modality: Modality) -> impl Strategy<Value = Vec<RetrievedHit>> {
    prop::collection::vec(0u8..20, 0..12).prop_map(move |ids| {
        let n = ids.len();
        ids.into_iter()
            .enumerate()
            .map(|(i, id)| hit(&format!("doc-{id}"), modality, (n - i) as f64))
            .collect()
    })
}

fn arb_lists() -> impl Strategy<Value = Vec<ModalityHits>> {
    (
        arb_list(Modality::Dense),
        arb_list(Modality::VectorDb),
        arb_list(Modality::Lexical),
    )
        .prop_map(|(d, v, l)| {
            vec![
                ModalityHits::new(Modality::Dense, d),
                ModalityHits::new(Modality::VectorDb, v),
                ModalityHits::new(Modality::Lexical, l),
            ]
        })
}

// ── Determinism ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn fusing_twice_is_identical(lists in arb_lists(), top_k in 1usize..10) {
        let weights = FusionWeights::default();
        let first = fuse(&lists, &weights, 60, top_k);
        let second = fuse(&lists, &weights, 60, top_k);
        prop_assert_eq!(first, second);
    }
}

// ── Shape ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn output_bounded_and_sorted(lists in arb_lists(), top_k in 0usize..10) {
        let fused = fuse(&lists, &FusionWeights::default(), 60, top_k);
        prop_assert!(fused.len() <= 2 * top_k);
        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn keys_are_unique(lists in arb_lists(), top_k in 1usize..20) {
        let fused = fuse(&lists, &FusionWeights::default(), 60, top_k);
        let mut keys: Vec<String> = fused.iter().map(|h| h.key().to_string()).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), before);
    }
}

// ── Availability weights ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn available_weights_sum_to_one(lists in arb_lists()) {
        let weights = availability_weights(&FusionWeights::default(), &lists);
        let any_available = lists.iter().any(|l| !l.hits.is_empty());
        if any_available {
            prop_assert!((weights.total() - 1.0).abs() < 1e-9);
        } else {
            prop_assert_eq!(weights.total(), 0.0);
        }
        for list in &lists {
            if list.hits.is_empty() {
                prop_assert_eq!(weights.get(list.modality), 0.0);
            }
        }
    }

    #[test]
    fn empty_modality_contributes_nothing(
        dense in arb_list(Modality::Dense),
        lexical in arb_list(Modality::Lexical),
        top_k in 1usize..10,
    ) {
        let weights = FusionWeights::default();
        let with_empty = vec![
            ModalityHits::new(Modality::Dense, dense.clone()),
            ModalityHits::new(Modality::VectorDb, Vec::new()),
            ModalityHits::new(Modality::Lexical, lexical.clone()),
        ];
        let without = vec![
            ModalityHits::new(Modality::Dense, dense),
            ModalityHits::new(Modality::Lexical, lexical),
        ];
        prop_assert_eq!(
            fuse(&with_empty, &weights, 60, top_k),
            fuse(&without, &weights, 60, top_k)
        );
    }
}

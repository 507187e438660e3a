use criterion::{criterion_group, criterion_main, Criterion};

use test_fixtures::hit;
use tributary_core::config::FusionWeights;
use tributary_core::models::{Modality, RetrievedHit};
use tributary_retrieval::{fuse, ModalityHits};

/// `n` hits whose ids overlap with the other modalities every `stride` ranks.
fn make_list(modality: Modality, n: usize, stride: usize) -> Vec<RetrievedHit> {
    (0..n)
        .map(|i| {
            let id = if i % stride == 0 {
                format!("shared-{i}")
            } else {
                format!("{modality}-{i}")
            };
            hit(&id, modality, (n - i) as f64)
        })
        .collect()
}

fn bench_fuse_three_lists(c: &mut Criterion) {
    let lists = vec![
        ModalityHits::new(Modality::Dense, make_list(Modality::Dense, 100, 3)),
        ModalityHits::new(Modality::VectorDb, make_list(Modality::VectorDb, 100, 3)),
        ModalityHits::new(Modality::Lexical, make_list(Modality::Lexical, 100, 3)),
    ];
    let weights = FusionWeights::default();

    c.bench_function("fuse_3x100_top_12", |b| {
        b.iter(|| fuse(&lists, &weights, 60, 12));
    });
}

fn bench_fuse_one_modality(c: &mut Criterion) {
    let lists = vec![
        ModalityHits::new(Modality::Dense, Vec::new()),
        ModalityHits::new(Modality::VectorDb, Vec::new()),
        ModalityHits::new(Modality::Lexical, make_list(Modality::Lexical, 500, 1)),
    ];
    let weights = FusionWeights::default();

    c.bench_function("fuse_lexical_only_500", |b| {
        b.iter(|| fuse(&lists, &weights, 60, 50));
    });
}

criterion_group!(benches, bench_fuse_three_lists, bench_fuse_one_modality);
criterion_main!(benches);

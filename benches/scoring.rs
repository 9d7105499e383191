//! Benchmarks for batch assembly and the scoring forward pass.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kbp_reader::batch::BatchAssembler;
use kbp_reader::config::ReaderConfig;
use kbp_reader::model::ScoringModel;
use kbp_reader::preprocess::TriplePreprocessor;
use kbp_reader::qa::QaSetting;
use kbp_reader::scoring::ScoringRegistry;
use kbp_reader::triple::IndexedTriple;
use kbp_reader::vocab::Vocabulary;

fn synthetic_questions(n: usize) -> Vec<QaSetting> {
    (0..n)
        .map(|i| QaSetting::new(format!("e{} r{} e{}", i % 997, i % 13, (i * 7) % 991)))
        .collect()
}

fn setup(n: usize) -> (Arc<Vocabulary>, Vec<IndexedTriple>) {
    let questions = synthetic_questions(n);
    let vocab = Arc::new(Vocabulary::from_questions(&questions).unwrap());
    let positives = TriplePreprocessor::new(Arc::clone(&vocab))
        .preprocess(&questions, false)
        .unwrap();
    (vocab, positives)
}

fn bench_create_batch(c: &mut Criterion) {
    let (vocab, positives) = setup(1_000);
    let config = ReaderConfig::default();
    let mut assembler = BatchAssembler::new(&config, vocab.num_entities());

    c.bench_function("create_batch_1k", |bench| {
        bench.iter(|| black_box(assembler.create_batch(&positives, false, true)))
    });
}

fn bench_score(c: &mut Criterion) {
    let (vocab, positives) = setup(1_000);
    let registry = ScoringRegistry::with_builtins();

    for name in ["DistMult", "ComplEx", "TransE"] {
        let config = ReaderConfig::new(128, name);
        let model = ScoringModel::new(&config, &vocab, &registry).unwrap();
        let batch = BatchAssembler::new(&config, vocab.num_entities())
            .create_batch(&positives, false, false);

        c.bench_function(&format!("score_3k_{name}_128"), |bench| {
            bench.iter(|| black_box(model.score(batch.question.view()).unwrap()))
        });
    }
}

criterion_group!(benches, bench_create_batch, bench_score);
criterion_main!(benches);

//! End-to-end integration tests for the kbp reader.
//!
//! These tests exercise the full pipeline from vocabulary construction
//! through batching, scoring, loss and answer conversion, validating that
//! the components agree on indices, row order and labels.

use kbp_reader::batch::{BatchAssembler, Port};
use kbp_reader::config::ReaderConfig;
use kbp_reader::error::{KbpError, ScoreError, TripleError};
use kbp_reader::loss;
use kbp_reader::model::ScoringModel;
use kbp_reader::output;
use kbp_reader::preprocess::TriplePreprocessor;
use kbp_reader::qa::{Answer, QaSetting};
use kbp_reader::reader::Reader;
use kbp_reader::scoring::ScoringRegistry;
use kbp_reader::vocab::Vocabulary;
use std::sync::Arc;

fn data(questions: &[&str]) -> Vec<(QaSetting, Vec<Answer>)> {
    questions
        .iter()
        .map(|q| (QaSetting::new(*q), vec![Answer::new(*q, 1.0)]))
        .collect()
}

fn questions(texts: &[&str]) -> Vec<QaSetting> {
    texts.iter().map(|q| QaSetting::new(*q)).collect()
}

#[test]
fn two_triple_scenario() {
    let training = data(&["a r b", "c r d"]);
    let vocab = Arc::new(Vocabulary::build(&training).unwrap());
    assert_eq!(vocab.num_entities(), 4);
    assert_eq!(vocab.num_predicates(), 1);

    let pre = TriplePreprocessor::new(Arc::clone(&vocab));
    let positives = pre
        .preprocess(&questions(&["a r b", "c r d"]), false)
        .unwrap();
    assert_eq!(positives.len(), 2);

    let config = ReaderConfig::new(8, "DistMult");
    let mut assembler = BatchAssembler::new(&config, vocab.num_entities());
    let batch = assembler.create_batch(&positives, false, true);
    assert_eq!(batch.len(), 6);
    assert_eq!(batch.question.shape(), &[6, 3]);
    assert_eq!(batch.target.as_ref().unwrap().to_vec(), vec![1, 1, 0, 0, 0, 0]);
    assert_eq!(batch.ports(), vec![Port::Question, Port::Target]);

    // rows 2,3 corrupt the first positive, rows 4,5 the second
    let q = &batch.question;
    assert_eq!((q[[2, 1]], q[[2, 2]]), (0, 1));
    assert_eq!((q[[3, 0]], q[[3, 1]]), (0, 0));
    assert_eq!((q[[4, 1]], q[[4, 2]]), (0, 3));
    assert_eq!((q[[5, 0]], q[[5, 1]]), (2, 0));

    let model = ScoringModel::new(&config, &vocab, &ScoringRegistry::with_builtins()).unwrap();
    let logits = model.score(batch.question.view()).unwrap();
    assert_eq!(logits.len(), 6);

    let l = loss::sigmoid_cross_entropy(batch.target.as_ref().unwrap().view(), logits.view())
        .unwrap();
    assert!(l.is_finite() && l > 0.0);
}

#[test]
fn every_builtin_function_scores_a_batch() {
    let training = data(&["a r b", "b r c", "c s a", "d s b"]);
    for name in ScoringRegistry::with_builtins().names() {
        let mut reader = Reader::setup_from_data(
            ReaderConfig::new(6, name),
            &training,
            &ScoringRegistry::with_builtins(),
        )
        .unwrap();
        let out = reader
            .training_output(&questions(&["a r b", "d s b"]))
            .unwrap();
        assert_eq!(out.logits.len(), 2 * 3, "{name}");
        assert!(out.logits.iter().all(|x| x.is_finite()), "{name}");
        assert!(out.loss.is_finite(), "{name}");
    }
}

#[test]
fn entity_norms_stay_bounded_after_large_updates() {
    let training = data(&["a r b", "c r d", "e s a"]);
    let mut reader = Reader::setup_from_data(
        ReaderConfig::new(5, "DistMult"),
        &training,
        &ScoringRegistry::with_builtins(),
    )
    .unwrap();

    // Simulate an aggressive optimizer step.
    reader
        .model_mut()
        .entity_embeddings_mut()
        .mapv_inplace(|v| v * 100.0);

    for i in 0..reader.vocabulary().num_entities() {
        let v = reader.model().entity_vector(i).unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!(norm <= 1.0 + 1e-5, "entity {i} norm {norm}");
    }
}

#[test]
fn gradient_step_on_logits_lowers_the_loss() {
    let training = data(&["a r b", "c r d", "b s c"]);
    let mut reader = Reader::setup_from_data(
        ReaderConfig {
            seed: 9,
            ..ReaderConfig::new(4, "DistMult")
        },
        &training,
        &ScoringRegistry::with_builtins(),
    )
    .unwrap();

    let out = reader.training_output(&questions(&["a r b"])).unwrap();
    let target = out.batch.target.as_ref().unwrap();
    let stepped = &out.logits - &(&out.logit_grad * 10.0);
    let after = loss::sigmoid_cross_entropy(target.view(), stepped.view()).unwrap();
    assert!(after < out.loss, "before={} after={after}", out.loss);
}

#[test]
fn evaluation_batches_ignore_num_negative() {
    let training = data(&["a r b", "c r d"]);
    let mut reader = Reader::setup_from_data(
        ReaderConfig {
            num_negative: 7,
            ..ReaderConfig::new(4, "TransE")
        },
        &training,
        &ScoringRegistry::with_builtins(),
    )
    .unwrap();
    let qs = questions(&["a r d", "c r b", "a r b"]);
    let batch = reader.create_batch(&qs, true, true).unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(batch.target.unwrap().to_vec(), vec![1, 1, 1]);

    let answers = reader.predict(&qs).unwrap();
    let texts: Vec<&str> = answers.iter().map(|a| a.text.as_str()).collect();
    assert_eq!(texts, vec!["a r d", "c r b", "a r b"]);
}

#[test]
fn same_seed_gives_identical_training_batches() {
    let training = data(&["a r b", "c r d", "e r f"]);
    let make = || {
        Reader::setup_from_data(
            ReaderConfig {
                num_negative: 3,
                ..ReaderConfig::new(4, "DistMult")
            },
            &training,
            &ScoringRegistry::with_builtins(),
        )
        .unwrap()
    };
    let (mut a, mut b) = (make(), make());
    let qs = questions(&["a r b", "e r f"]);
    for _ in 0..3 {
        let x = a.training_output(&qs).unwrap();
        let y = b.training_output(&qs).unwrap();
        assert_eq!(x.batch, y.batch);
        assert_eq!(x.logits, y.logits);
    }
}

#[test]
fn output_converter_aligns_with_logits() {
    let qs = questions(&["x p y", "y p z"]);
    let logits = ndarray::array![0.25f32, -0.75];
    let answers = output::convert(&qs, logits.view());
    assert_eq!(answers[0], Answer::new("x p y", 0.25));
    assert_eq!(answers[1], Answer::new("y p z", -0.75));
}

#[test]
fn errors_surface_with_diagnostic_codes() {
    use miette::Diagnostic;

    let err = Vocabulary::build(&data(&["a r"])).unwrap_err();
    assert!(matches!(
        err,
        KbpError::Triple(TripleError::Malformed { tokens: 2, .. })
    ));
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("kbp::triple::malformed".to_string())
    );

    let err = Reader::setup_from_data(
        ReaderConfig::new(4, "Nope"),
        &data(&["a r b"]),
        &ScoringRegistry::with_builtins(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        KbpError::Score(ScoreError::UnregisteredScoringFunction { .. })
    ));
    assert!(err.help().is_some());
}

// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # kbp-reader
//!
//! Knowledge-base population reader: turns `subject predicate object` triples
//! into a trainable plausibility-scoring pipeline.
//!
//! ## Architecture
//!
//! - **Vocabulary** (`vocab`): frozen, lexicographically ordered token ↔ index maps
//! - **Preprocessing** (`preprocess`): question text → indexed triples
//! - **Batching** (`batch`): seeded negative sampling and dense `[batch, 3]` arrays
//! - **Scoring** (`model`, `scoring`): embedding lookups with unit-norm entity
//!   rows, delegated to a scoring function chosen by name
//! - **Kernels** (`kernel`): runtime-dispatched AVX2/generic reductions
//! - **Loss** (`loss`): numerically stable sigmoid cross-entropy
//! - **Output** (`output`): logits → answers
//!
//! ## Library usage
//!
//! ```no_run
//! use kbp_reader::config::ReaderConfig;
//! use kbp_reader::qa::QaSetting;
//! use kbp_reader::reader::Reader;
//! use kbp_reader::scoring::ScoringRegistry;
//!
//! let data = vec![
//!     (QaSetting::new("Sun is-a Star"), vec![]),
//!     (QaSetting::new("Moon orbits Earth"), vec![]),
//! ];
//! let mut reader = Reader::setup_from_data(
//!     ReaderConfig::new(32, "DistMult"),
//!     &data,
//!     &ScoringRegistry::with_builtins(),
//! )
//! .unwrap();
//!
//! let step = reader.training_output(&[QaSetting::new("Sun is-a Star")]).unwrap();
//! println!("loss = {}", step.loss);
//!
//! let answers = reader.predict(&[QaSetting::new("Moon is-a Star")]).unwrap();
//! println!("{}: {}", answers[0].text, answers[0].score);
//! ```

pub mod batch;
pub mod config;
pub mod embedding;
pub mod error;
pub mod kernel;
pub mod loss;
pub mod model;
pub mod output;
pub mod preprocess;
pub mod qa;
pub mod reader;
pub mod scoring;
pub mod triple;
pub mod vocab;

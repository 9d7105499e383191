//! Negative sampling and batch assembly.
//!
//! For every positive triple `(s, p, o)` the [`BatchAssembler`] synthesizes
//! `num_negative` pairs of corrupted triples `(s', p, o)` and `(s, p, o')`,
//! with `s'` and `o'` drawn uniformly from the whole entity range. Corrupted
//! triples are not checked against the known facts, so an occasional
//! "negative" may in fact be true.
//!
//! The random source belongs to the assembler and is seeded at construction;
//! two assemblers built with the same seed produce identical batches.

use ndarray::{Array1, Array2};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::ReaderConfig;
use crate::triple::IndexedTriple;

/// Named channels exchanged with the surrounding training framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    /// Indexed triples, shape `[batch, 3]`.
    Question,
    /// Binary labels, shape `[batch]`.
    Target,
    /// Pre-sigmoid scores, shape `[batch]`.
    Logits,
    /// Scalar training loss.
    Loss,
}

impl Port {
    pub fn name(self) -> &'static str {
        match self {
            Port::Question => "question",
            Port::Target => "target",
            Port::Logits => "logits",
            Port::Loss => "loss",
        }
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A dense numeric batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// `[batch, 3]` rows of `(subject, predicate, object)` indices.
    pub question: Array2<i64>,
    /// `[batch]` labels: 1 for true triples, 0 for corruptions.
    pub target: Option<Array1<i64>>,
}

impl Batch {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.question.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The channels this batch carries.
    pub fn ports(&self) -> Vec<Port> {
        match self.target {
            Some(_) => vec![Port::Question, Port::Target],
            None => vec![Port::Question],
        }
    }

    fn from_triples(triples: &[IndexedTriple], target: Option<Vec<i64>>) -> Self {
        let question = Array2::from_shape_fn((triples.len(), 3), |(i, j)| triples[i].to_row()[j]);
        Self {
            question,
            target: target.map(Array1::from),
        }
    }
}

/// Corrupts positive triples and packs them into [`Batch`]es.
#[derive(Debug, Clone)]
pub struct BatchAssembler {
    rng: StdRng,
    num_entities: usize,
    num_negative: usize,
}

impl BatchAssembler {
    /// Create an assembler sampling from `num_entities` entities, seeded from
    /// the config.
    pub fn new(config: &ReaderConfig, num_entities: usize) -> Self {
        Self::with_rng(
            StdRng::seed_from_u64(config.seed),
            num_entities,
            config.num_negative,
        )
    }

    /// Create an assembler around an injected random source.
    ///
    /// # Panics
    ///
    /// Panics if `num_entities` is zero.
    pub fn with_rng(rng: StdRng, num_entities: usize, num_negative: usize) -> Self {
        assert!(num_entities > 0, "entity range must not be empty");
        Self {
            rng,
            num_entities,
            num_negative,
        }
    }

    pub fn num_negative(&self) -> usize {
        self.num_negative
    }

    /// Draw a uniformly random entity index.
    fn random_entity(&mut self) -> usize {
        self.rng.gen_range(0..self.num_entities)
    }

    /// Assemble a batch from positive triples.
    ///
    /// Positives come first in their original order, followed by the
    /// corruptions of each positive in turn (subject-corrupted, then
    /// object-corrupted). In evaluation mode no corruptions are added.
    pub fn create_batch(
        &mut self,
        positives: &[IndexedTriple],
        is_eval: bool,
        with_answers: bool,
    ) -> Batch {
        let negatives_per_positive = if is_eval { 0 } else { 2 * self.num_negative };
        let capacity = positives.len() * (1 + negatives_per_positive);

        let mut triples = Vec::with_capacity(capacity);
        triples.extend_from_slice(positives);
        let mut target = with_answers.then(|| {
            let mut t = Vec::with_capacity(capacity);
            t.resize(positives.len(), 1i64);
            t
        });

        if !is_eval {
            for &positive in positives {
                for _ in 0..self.num_negative {
                    let subject = self.random_entity();
                    let object = self.random_entity();
                    triples.push(positive.with_subject(subject));
                    triples.push(positive.with_object(object));
                    if let Some(t) = target.as_mut() {
                        t.extend_from_slice(&[0, 0]);
                    }
                }
            }
        }

        tracing::debug!(
            positives = positives.len(),
            rows = triples.len(),
            is_eval,
            with_answers,
            "assembled batch"
        );
        Batch::from_triples(&triples, target)
    }
}

//! Embedding-based triple scoring model.
//!
//! The [`ScoringModel`] owns one entity table and one predicate table, both
//! sized from the frozen vocabulary at construction. A forward pass looks up
//! the subject and object rows (clamped to unit L2 norm), the predicate row
//! (unclamped), and hands them to the configured [`ScoringFunction`].

use std::sync::Arc;

use ndarray::{Array1, ArrayView2, ArrayViewMut2};
use rand::Rng;
use rand::SeedableRng;

use crate::config::ReaderConfig;
use crate::embedding::EmbeddingTable;
use crate::error::{KbpResult, ScoreError};
use crate::kernel::{self, ScoreKernel};
use crate::scoring::{ScoringFunction, ScoringRegistry};
use crate::vocab::Vocabulary;

/// Maximum L2 norm of an entity row as seen by the scoring function.
pub const ENTITY_MAX_NORM: f32 = 1.0;

/// Entity/predicate embeddings plus the scoring function that combines them.
pub struct ScoringModel {
    entities: EmbeddingTable,
    predicates: EmbeddingTable,
    function: Arc<dyn ScoringFunction>,
    kernel: Box<dyn ScoreKernel>,
    repr_dim: usize,
}

impl ScoringModel {
    /// Build a model seeded from `config.seed`.
    pub fn new(
        config: &ReaderConfig,
        vocab: &Vocabulary,
        registry: &ScoringRegistry,
    ) -> KbpResult<Self> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, vocab, registry, &mut rng)
    }

    /// Build a model drawing its initial embeddings from `rng`.
    ///
    /// The scoring function is resolved and checked against the dimension
    /// before any table is allocated.
    pub fn with_rng(
        config: &ReaderConfig,
        vocab: &Vocabulary,
        registry: &ScoringRegistry,
        rng: &mut impl Rng,
    ) -> KbpResult<Self> {
        config.validate()?;
        let function = registry.get(&config.model_name)?;
        function.check_dim(config.repr_dim)?;

        let kernel = kernel::best_kernel();
        tracing::info!(
            isa = %kernel.isa_level(),
            function = function.name(),
            dim = config.repr_dim,
            entities = vocab.num_entities(),
            predicates = vocab.num_predicates(),
            "initializing scoring model"
        );

        let entities = EmbeddingTable::xavier_uniform(vocab.num_entities(), config.repr_dim, rng);
        let predicates =
            EmbeddingTable::xavier_uniform(vocab.num_predicates(), config.repr_dim, rng);

        Ok(Self {
            entities,
            predicates,
            function,
            kernel,
            repr_dim: config.repr_dim,
        })
    }

    pub fn repr_dim(&self) -> usize {
        self.repr_dim
    }

    /// Name of the scoring function in use.
    pub fn function_name(&self) -> &str {
        self.function.name()
    }

    pub fn entity_embeddings(&self) -> ArrayView2<'_, f32> {
        self.entities.view()
    }

    pub fn predicate_embeddings(&self) -> ArrayView2<'_, f32> {
        self.predicates.view()
    }

    /// Entity table for the optimizer's in-place updates.
    pub fn entity_embeddings_mut(&mut self) -> ArrayViewMut2<'_, f32> {
        self.entities.view_mut()
    }

    /// Predicate table for the optimizer's in-place updates.
    pub fn predicate_embeddings_mut(&mut self) -> ArrayViewMut2<'_, f32> {
        self.predicates.view_mut()
    }

    /// The entity row the scoring function sees: norm-clamped to
    /// [`ENTITY_MAX_NORM`].
    pub fn entity_vector(&self, index: usize) -> KbpResult<Vec<f32>> {
        let index = check_index(index as i64, &self.entities, "entity", 0)?;
        let mut out = vec![0.0; self.repr_dim];
        self.entities.lookup_into(index, Some(ENTITY_MAX_NORM), self.kernel.as_ref(), &mut out);
        Ok(out)
    }

    /// Score every `(subject, predicate, object)` row of `question`.
    ///
    /// Returns one logit per row, in row order.
    pub fn score(&self, question: ArrayView2<'_, i64>) -> KbpResult<Array1<f32>> {
        if question.ncols() != 3 {
            return Err(ScoreError::InvalidBatchShape {
                columns: question.ncols(),
            }
            .into());
        }

        let kernel = self.kernel.as_ref();
        let mut subject = vec![0.0f32; self.repr_dim];
        let mut predicate = vec![0.0f32; self.repr_dim];
        let mut object = vec![0.0f32; self.repr_dim];
        let mut logits = Vec::with_capacity(question.nrows());

        for (row, triple) in question.rows().into_iter().enumerate() {
            let s = check_index(triple[0], &self.entities, "entity", row)?;
            let p = check_index(triple[1], &self.predicates, "predicate", row)?;
            let o = check_index(triple[2], &self.entities, "entity", row)?;

            self.entities.lookup_into(s, Some(ENTITY_MAX_NORM), kernel, &mut subject);
            self.predicates.lookup_into(p, None, kernel, &mut predicate);
            self.entities.lookup_into(o, Some(ENTITY_MAX_NORM), kernel, &mut object);

            logits.push(self.function.score(kernel, &subject, &predicate, &object));
        }

        Ok(Array1::from(logits))
    }
}

fn check_index(
    index: i64,
    table: &EmbeddingTable,
    name: &'static str,
    row: usize,
) -> Result<usize, ScoreError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < table.rows())
        .ok_or(ScoreError::IndexOutOfRange {
            table: name,
            index,
            rows: table.rows(),
            row,
        })
}

impl std::fmt::Debug for ScoringModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringModel")
            .field("function", &self.function.name())
            .field("repr_dim", &self.repr_dim)
            .field("entities", &self.entities.rows())
            .field("predicates", &self.predicates.rows())
            .field("isa", &self.kernel.isa_level())
            .finish()
    }
}

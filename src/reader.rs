//! The reader: vocabulary, preprocessing, batching, scoring and output
//! conversion wired together.
//!
//! A [`Reader`] is created once from the training data, which freezes the
//! vocabulary and allocates the embedding tables. Afterwards it serves
//! training batches (with corruptions, targets, logits and loss) and
//! inference requests (answers with scores).

use std::sync::Arc;

use ndarray::Array1;

use crate::batch::{Batch, BatchAssembler};
use crate::config::ReaderConfig;
use crate::error::{KbpResult, LossError};
use crate::loss;
use crate::model::ScoringModel;
use crate::output;
use crate::preprocess::TriplePreprocessor;
use crate::qa::{Answer, QaSetting};
use crate::scoring::ScoringRegistry;
use crate::vocab::Vocabulary;

/// Forward values of one training batch.
#[derive(Debug, Clone)]
pub struct TrainingOutput {
    /// The assembled batch, positives followed by corruptions.
    pub batch: Batch,
    /// One logit per batch row.
    pub logits: Array1<f32>,
    /// Mean sigmoid cross-entropy over the batch.
    pub loss: f32,
    /// d(loss)/d(logit) per row, for the optimizer.
    pub logit_grad: Array1<f32>,
}

/// Knowledge-base population reader.
#[derive(Debug)]
pub struct Reader {
    config: ReaderConfig,
    vocab: Arc<Vocabulary>,
    preprocessor: TriplePreprocessor,
    assembler: BatchAssembler,
    model: ScoringModel,
}

impl Reader {
    /// Build the vocabulary from `data` and construct every component.
    pub fn setup_from_data<'a, I>(
        config: ReaderConfig,
        data: I,
        registry: &ScoringRegistry,
    ) -> KbpResult<Self>
    where
        I: IntoIterator<Item = &'a (QaSetting, Vec<Answer>)>,
    {
        config.validate()?;
        let vocab = Arc::new(Vocabulary::build(data)?);
        Self::with_vocabulary(config, vocab, registry)
    }

    /// Construct the components around an already built vocabulary.
    pub fn with_vocabulary(
        config: ReaderConfig,
        vocab: Arc<Vocabulary>,
        registry: &ScoringRegistry,
    ) -> KbpResult<Self> {
        let model = ScoringModel::new(&config, &vocab, registry)?;
        let preprocessor = TriplePreprocessor::new(Arc::clone(&vocab));
        let assembler = BatchAssembler::new(&config, vocab.num_entities());
        Ok(Self {
            config,
            vocab,
            preprocessor,
            assembler,
            model,
        })
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// The published vocabulary.
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    /// Mutable model access for the optimizer.
    pub fn model_mut(&mut self) -> &mut ScoringModel {
        &mut self.model
    }

    /// Index `questions` and assemble them into a batch.
    pub fn create_batch(
        &mut self,
        questions: &[QaSetting],
        is_eval: bool,
        with_answers: bool,
    ) -> KbpResult<Batch> {
        let triples = self.preprocessor.preprocess(questions, is_eval)?;
        Ok(self.assembler.create_batch(&triples, is_eval, with_answers))
    }

    /// Assemble a training batch and compute its logits, loss and logit
    /// gradient.
    pub fn training_output(&mut self, questions: &[QaSetting]) -> KbpResult<TrainingOutput> {
        let batch = self.create_batch(questions, false, true)?;
        let logits = self.model.score(batch.question.view())?;
        let target = batch.target.as_ref().ok_or(LossError::MissingTargets)?;
        let loss = loss::sigmoid_cross_entropy(target.view(), logits.view())?;
        let logit_grad = loss::sigmoid_cross_entropy_grad(target.view(), logits.view())?;
        Ok(TrainingOutput {
            batch,
            logits,
            loss,
            logit_grad,
        })
    }

    /// Score `questions` and return one answer per question, in order.
    pub fn predict(&mut self, questions: &[QaSetting]) -> KbpResult<Vec<Answer>> {
        let batch = self.create_batch(questions, true, false)?;
        let logits = self.model.score(batch.question.view())?;
        Ok(output::convert(questions, logits.view()))
    }
}

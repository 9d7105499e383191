//! Maps question texts to indexed triples against a frozen vocabulary.

use std::sync::Arc;

use crate::error::KbpResult;
use crate::qa::QaSetting;
use crate::triple::{IndexedTriple, RawTriple};
use crate::vocab::Vocabulary;

/// Converts questions into [`IndexedTriple`]s.
#[derive(Debug, Clone)]
pub struct TriplePreprocessor {
    vocab: Arc<Vocabulary>,
}

impl TriplePreprocessor {
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    /// The vocabulary this preprocessor resolves tokens against.
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }

    /// Index a single question.
    pub fn index(&self, question: &QaSetting) -> KbpResult<IndexedTriple> {
        let raw = RawTriple::parse(&question.question)?;
        Ok(IndexedTriple::new(
            self.vocab.entity_index(raw.subject)?,
            self.vocab.predicate_index(raw.predicate)?,
            self.vocab.entity_index(raw.object)?,
        ))
    }

    /// Index every question, preserving order.
    ///
    /// Training and evaluation are indexed identically; `_is_eval` is part of
    /// the reader contract only.
    pub fn preprocess(
        &self,
        questions: &[QaSetting],
        _is_eval: bool,
    ) -> KbpResult<Vec<IndexedTriple>> {
        questions.iter().map(|q| self.index(q)).collect()
    }
}

//! Vocabulary: bidirectional token ↔ index mapping for entities and predicates.
//!
//! The [`Vocabulary`] is built exactly once from the training set and is
//! immutable afterwards. Indices are dense (`0..len`) and assigned in
//! lexicographic token order, so the same training set always yields the
//! same assignment. Tokens unseen at build time are lookup errors; the
//! vocabulary never grows.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{KbpResult, VocabError};
use crate::qa::{Answer, QaSetting};
use crate::triple::RawTriple;

/// One direction-pair of the vocabulary (entities or predicates).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TokenIndex {
    /// Forward map: token → index.
    token_to_index: HashMap<String, usize>,
    /// Reverse table: index → token.
    index_to_token: Vec<String>,
}

impl TokenIndex {
    fn from_sorted(tokens: BTreeSet<&str>) -> Self {
        let index_to_token: Vec<String> = tokens.into_iter().map(str::to_string).collect();
        let token_to_index = index_to_token
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self {
            token_to_index,
            index_to_token,
        }
    }

    fn from_table(index_to_token: Vec<String>) -> Result<Self, VocabError> {
        let mut token_to_index = HashMap::with_capacity(index_to_token.len());
        for (i, token) in index_to_token.iter().enumerate() {
            if token_to_index.insert(token.clone(), i).is_some() {
                return Err(VocabError::DuplicateToken {
                    token: token.clone(),
                });
            }
        }
        Ok(Self {
            token_to_index,
            index_to_token,
        })
    }
}

/// Frozen entity and predicate index mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyTables", into = "VocabularyTables")]
pub struct Vocabulary {
    entities: TokenIndex,
    predicates: TokenIndex,
}

/// Serialized form: the two index → token tables.
#[derive(Serialize, Deserialize)]
struct VocabularyTables {
    entities: Vec<String>,
    predicates: Vec<String>,
}

impl TryFrom<VocabularyTables> for Vocabulary {
    type Error = VocabError;

    fn try_from(tables: VocabularyTables) -> Result<Self, Self::Error> {
        if tables.entities.is_empty() || tables.predicates.is_empty() {
            return Err(VocabError::EmptyVocabulary);
        }
        Ok(Self {
            entities: TokenIndex::from_table(tables.entities)?,
            predicates: TokenIndex::from_table(tables.predicates)?,
        })
    }
}

impl From<Vocabulary> for VocabularyTables {
    fn from(vocab: Vocabulary) -> Self {
        Self {
            entities: vocab.entities.index_to_token,
            predicates: vocab.predicates.index_to_token,
        }
    }
}

impl Vocabulary {
    /// Build the vocabulary from `(question, answers)` training pairs.
    ///
    /// Answers are not inspected; only the question triples contribute.
    pub fn build<'a, I>(data: I) -> KbpResult<Self>
    where
        I: IntoIterator<Item = &'a (QaSetting, Vec<Answer>)>,
    {
        Self::from_questions(data.into_iter().map(|(q, _)| q))
    }

    /// Build the vocabulary from bare questions.
    pub fn from_questions<'a, I>(questions: I) -> KbpResult<Self>
    where
        I: IntoIterator<Item = &'a QaSetting>,
    {
        let mut entities = BTreeSet::new();
        let mut predicates = BTreeSet::new();

        for qa in questions {
            let triple = RawTriple::parse(&qa.question)?;
            entities.insert(triple.subject);
            entities.insert(triple.object);
            predicates.insert(triple.predicate);
        }

        if entities.is_empty() {
            return Err(VocabError::EmptyVocabulary.into());
        }

        let vocab = Self {
            entities: TokenIndex::from_sorted(entities),
            predicates: TokenIndex::from_sorted(predicates),
        };
        tracing::info!(
            entities = vocab.num_entities(),
            predicates = vocab.num_predicates(),
            "built vocabulary"
        );
        Ok(vocab)
    }

    /// Index of an entity token.
    pub fn entity_index(&self, token: &str) -> Result<usize, VocabError> {
        self.entities
            .token_to_index
            .get(token)
            .copied()
            .ok_or_else(|| VocabError::UnknownEntity {
                token: token.to_string(),
            })
    }

    /// Index of a predicate token.
    pub fn predicate_index(&self, token: &str) -> Result<usize, VocabError> {
        self.predicates
            .token_to_index
            .get(token)
            .copied()
            .ok_or_else(|| VocabError::UnknownPredicate {
                token: token.to_string(),
            })
    }

    /// Entity token for an index.
    pub fn entity(&self, index: usize) -> Option<&str> {
        self.entities.index_to_token.get(index).map(String::as_str)
    }

    /// Predicate token for an index.
    pub fn predicate(&self, index: usize) -> Option<&str> {
        self.predicates.index_to_token.get(index).map(String::as_str)
    }

    /// The published entity → index mapping.
    pub fn entity_to_index(&self) -> &HashMap<String, usize> {
        &self.entities.token_to_index
    }

    /// The published predicate → index mapping.
    pub fn predicate_to_index(&self) -> &HashMap<String, usize> {
        &self.predicates.token_to_index
    }

    pub fn num_entities(&self) -> usize {
        self.entities.index_to_token.len()
    }

    pub fn num_predicates(&self) -> usize {
        self.predicates.index_to_token.len()
    }

    /// Export both tables as pretty-printed JSON.
    pub fn to_json(&self) -> KbpResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            VocabError::Export {
                message: e.to_string(),
            }
            .into()
        })
    }
}

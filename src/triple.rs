//! Raw and indexed triples.
//!
//! A [`RawTriple`] borrows its three tokens from the question text; an
//! [`IndexedTriple`] holds indices into a specific [`Vocabulary`] snapshot.
//!
//! [`Vocabulary`]: crate::vocab::Vocabulary

use serde::{Deserialize, Serialize};

use crate::error::TripleError;

/// A `(subject, predicate, object)` triple of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawTriple<'a> {
    pub subject: &'a str,
    pub predicate: &'a str,
    pub object: &'a str,
}

impl<'a> RawTriple<'a> {
    /// Split `text` on whitespace into exactly three tokens.
    ///
    /// Input with any other token count is rejected, never truncated.
    pub fn parse(text: &'a str) -> Result<Self, TripleError> {
        let mut tokens = text.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
            (Some(subject), Some(predicate), Some(object), None) => Ok(Self {
                subject,
                predicate,
                object,
            }),
            _ => Err(TripleError::Malformed {
                text: text.to_string(),
                tokens: text.split_whitespace().count(),
            }),
        }
    }
}

/// A triple of vocabulary indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexedTriple {
    pub subject: usize,
    pub predicate: usize,
    pub object: usize,
}

impl IndexedTriple {
    pub fn new(subject: usize, predicate: usize, object: usize) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Replace the subject, keeping predicate and object.
    pub fn with_subject(self, subject: usize) -> Self {
        Self { subject, ..self }
    }

    /// Replace the object, keeping subject and predicate.
    pub fn with_object(self, object: usize) -> Self {
        Self { object, ..self }
    }

    /// The triple as an `[s, p, o]` row.
    pub fn to_row(self) -> [i64; 3] {
        [
            self.subject as i64,
            self.predicate as i64,
            self.object as i64,
        ]
    }
}

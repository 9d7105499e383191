//! Question and answer records exchanged with the dataset loader and the
//! downstream evaluator.

use serde::{Deserialize, Serialize};

/// A question whose text is a whitespace-separated `subject predicate object`
/// triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaSetting {
    /// The raw triple text.
    pub question: String,
}

impl QaSetting {
    /// Create a question from its raw text.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// An answer pairing a question's text with a plausibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// The original question text.
    pub text: String,
    /// Pre-sigmoid plausibility score (higher = more plausible).
    pub score: f32,
}

impl Answer {
    /// Create an answer with the given score.
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }

    /// The score squashed to `(0, 1)`.
    pub fn probability(&self) -> f32 {
        crate::loss::sigmoid(self.score)
    }
}

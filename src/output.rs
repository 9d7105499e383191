//! Converts scored batches back into answer records.

use ndarray::ArrayView1;

use crate::qa::{Answer, QaSetting};

/// Pair each question with its logit.
///
/// `questions` and `logits` must have the same length; the caller guarantees
/// this. Order is preserved and nothing is filtered or ranked.
pub fn convert(questions: &[QaSetting], logits: ArrayView1<'_, f32>) -> Vec<Answer> {
    debug_assert_eq!(questions.len(), logits.len());
    questions
        .iter()
        .zip(logits.iter())
        .map(|(q, &score)| Answer::new(q.question.clone(), score))
        .collect()
}

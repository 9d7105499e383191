//! Binary cross-entropy on logits.
//!
//! Per element, with logit `x` and label `z`:
//!
//! ```text
//! max(x, 0) - x * z + ln(1 + exp(-|x|))
//! ```
//!
//! which equals `-z ln σ(x) - (1 - z) ln(1 - σ(x))` without overflowing for
//! large `|x|`.

use ndarray::{Array1, ArrayView1};

use crate::error::{KbpResult, LossError};

/// Logistic function.
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

fn check_lengths(targets: usize, logits: usize) -> Result<(), LossError> {
    if targets != logits {
        return Err(LossError::LengthMismatch { targets, logits });
    }
    if logits == 0 {
        return Err(LossError::EmptyBatch);
    }
    Ok(())
}

/// Mean sigmoid cross-entropy of `logits` against 0/1 `targets`.
pub fn sigmoid_cross_entropy(
    targets: ArrayView1<'_, i64>,
    logits: ArrayView1<'_, f32>,
) -> KbpResult<f32> {
    check_lengths(targets.len(), logits.len())?;

    let total: f64 = targets
        .iter()
        .zip(logits.iter())
        .map(|(&z, &x)| {
            let x = x as f64;
            let z = z as f64;
            x.max(0.0) - x * z + (-x.abs()).exp().ln_1p()
        })
        .sum();
    let loss = (total / logits.len() as f64) as f32;

    tracing::debug!(rows = logits.len(), loss, "computed training loss");
    Ok(loss)
}

/// Gradient of [`sigmoid_cross_entropy`] with respect to each logit:
/// `(σ(x) - z) / n`.
pub fn sigmoid_cross_entropy_grad(
    targets: ArrayView1<'_, i64>,
    logits: ArrayView1<'_, f32>,
) -> KbpResult<Array1<f32>> {
    check_lengths(targets.len(), logits.len())?;

    let n = logits.len() as f32;
    Ok(targets
        .iter()
        .zip(logits.iter())
        .map(|(&z, &x)| (sigmoid(x) - z as f32) / n)
        .collect())
}

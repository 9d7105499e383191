//! Dense embedding tables.
//!
//! An [`EmbeddingTable`] holds one `repr_dim`-wide row per vocabulary entry.
//! Rows are read by the forward pass and written only by the external
//! optimizer through [`EmbeddingTable::view_mut`].

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::kernel::ScoreKernel;

/// A `[rows, dim]` matrix of `f32` embeddings.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingTable {
    data: Array2<f32>,
}

impl EmbeddingTable {
    /// Glorot/Xavier-uniform initialization: every entry is drawn from
    /// `U(-limit, limit)` with `limit = sqrt(6 / (rows + dim))`.
    pub fn xavier_uniform(rows: usize, dim: usize, rng: &mut impl Rng) -> Self {
        let limit = (6.0 / (rows + dim).max(1) as f32).sqrt();
        let dist = Uniform::new_inclusive(-limit, limit);
        Self {
            data: Array2::from_shape_fn((rows, dim), |_| dist.sample(rng)),
        }
    }

    /// Wrap existing values.
    pub fn from_array(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn dim(&self) -> usize {
        self.data.ncols()
    }

    /// A raw, unclamped row.
    pub fn row(&self, index: usize) -> ArrayView1<'_, f32> {
        self.data.row(index)
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Mutable access for gradient updates.
    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, f32> {
        self.data.view_mut()
    }

    /// Copy row `index` into `out`, rescaling it onto the ball of radius
    /// `max_norm` when its L2 norm exceeds `max_norm`. Rows already inside
    /// the ball are copied unchanged. The stored row is never modified.
    ///
    /// `index` must be `< rows()` and `out.len()` must equal `dim()`.
    pub fn lookup_into(
        &self,
        index: usize,
        max_norm: Option<f32>,
        kernel: &dyn ScoreKernel,
        out: &mut [f32],
    ) {
        debug_assert_eq!(out.len(), self.dim());
        for (o, &v) in out.iter_mut().zip(self.data.row(index).iter()) {
            *o = v;
        }
        if let Some(max_norm) = max_norm {
            let norm = kernel.l2_norm(out);
            if norm > max_norm {
                let scale = max_norm / norm;
                out.iter_mut().for_each(|v| *v *= scale);
            }
        }
    }
}

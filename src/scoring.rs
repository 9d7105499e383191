//! Pluggable triple scoring functions.
//!
//! A scoring function maps `(subject, predicate, object)` embedding rows to a
//! single pre-sigmoid logit. Functions are looked up by name in a
//! [`ScoringRegistry`]; the model resolves its function once at construction
//! and fails there if the name is unknown.
//!
//! | Name | Score | Notes |
//! |------|-------|-------|
//! | `DistMult` | `Σ s·p·o` | symmetric in s and o |
//! | `ComplEx` | `Re(Σ s·p·conj(o))` | rows split into real/imaginary halves |
//! | `TransE` | `-‖s + p - o‖₂` | relations as translations |

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ScoreError;
use crate::kernel::ScoreKernel;

/// A named strategy turning three embedding rows into a logit.
pub trait ScoringFunction: Send + Sync {
    /// Registry key.
    fn name(&self) -> &str;

    /// Reject embedding dimensions this function cannot interpret.
    fn check_dim(&self, _dim: usize) -> Result<(), ScoreError> {
        Ok(())
    }

    /// Score one triple. All three rows have the model's dimension.
    fn score(
        &self,
        kernel: &dyn ScoreKernel,
        subject: &[f32],
        predicate: &[f32],
        object: &[f32],
    ) -> f32;
}

/// Diagonal bilinear scoring: elementwise triple product, summed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistMult;

impl ScoringFunction for DistMult {
    fn name(&self) -> &str {
        "DistMult"
    }

    fn score(&self, kernel: &dyn ScoreKernel, s: &[f32], p: &[f32], o: &[f32]) -> f32 {
        kernel.triple_dot(s, p, o)
    }
}

/// Complex bilinear scoring. The first half of each row holds real parts,
/// the second half imaginary parts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplEx;

impl ScoringFunction for ComplEx {
    fn name(&self) -> &str {
        "ComplEx"
    }

    fn check_dim(&self, dim: usize) -> Result<(), ScoreError> {
        if dim % 2 != 0 {
            return Err(ScoreError::IncompatibleDimension {
                name: self.name().to_string(),
                dim,
                reason: "complex embeddings need an even dimension".into(),
            });
        }
        Ok(())
    }

    fn score(&self, kernel: &dyn ScoreKernel, s: &[f32], p: &[f32], o: &[f32]) -> f32 {
        let half = s.len() / 2;
        let (s_re, s_im) = s.split_at(half);
        let (p_re, p_im) = p.split_at(half);
        let (o_re, o_im) = o.split_at(half);
        kernel.triple_dot(s_re, p_re, o_re)
            + kernel.triple_dot(s_im, p_re, o_im)
            + kernel.triple_dot(s_re, p_im, o_im)
            - kernel.triple_dot(s_im, p_im, o_re)
    }
}

/// Translational scoring: negated Euclidean distance between `s + p` and `o`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransE;

impl ScoringFunction for TransE {
    fn name(&self) -> &str {
        "TransE"
    }

    fn score(&self, kernel: &dyn ScoreKernel, s: &[f32], p: &[f32], o: &[f32]) -> f32 {
        -kernel.translation_sq_dist(s, p, o).sqrt()
    }
}

/// Name → scoring function lookup table.
#[derive(Clone)]
pub struct ScoringRegistry {
    functions: HashMap<String, Arc<dyn ScoringFunction>>,
}

impl ScoringRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// A registry holding `DistMult`, `ComplEx` and `TransE`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DistMult));
        registry.register(Arc::new(ComplEx));
        registry.register(Arc::new(TransE));
        registry
    }

    /// Register a function under its own name, returning any function it
    /// replaced.
    pub fn register(
        &mut self,
        function: Arc<dyn ScoringFunction>,
    ) -> Option<Arc<dyn ScoringFunction>> {
        self.functions.insert(function.name().to_string(), function)
    }

    /// Resolve a function by exact name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn ScoringFunction>, ScoreError> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| ScoreError::UnregisteredScoringFunction {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for ScoringRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for ScoringRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

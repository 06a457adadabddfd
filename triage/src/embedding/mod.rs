//! Embedding adapter — the external text-to-vector capability.
//!
//! The pipeline only depends on the [`Embedder`] trait: an order-preserving
//! batch call that returns one fixed-length vector per message. The shipped
//! implementation is a deterministic hash embedder; a real sentence-encoder
//! service can be substituted behind the same contract.

mod hashing;

pub use hashing::HashingEmbedder;

use std::sync::Arc;

use crate::error::TriageResult;

/// Shared reference to an embedder, constructed once per process and
/// passed by reference into the pipeline.
pub type SharedEmbedder = Arc<dyn Embedder>;

/// External embedding capability.
pub trait Embedder: Send + Sync {
    /// Embed a batch of messages. The output is index-aligned with the
    /// input: `vectors[i]` corresponds to `messages[i]`.
    fn embed(&self, messages: &[String]) -> TriageResult<Vec<Vec<f32>>>;

    /// Fixed output dimension of every vector this embedder produces.
    fn dimension(&self) -> usize;

    /// Identifier for logging.
    fn id(&self) -> &str;
}

/// Cosine similarity between two vectors. Zero-norm inputs yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Cosine distance (`1 - similarity`), the metric the cluster engine uses.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

//! FNV-1a hash-based embedder.
//!
//! Deterministic, non-semantic embeddings computed from lexical overlap
//! only — no model files, no inference. Messages about the same failure
//! keywords land close under cosine distance, which is all the cluster
//! engine needs, and determinism makes every run reproducible.

use super::Embedder;
use crate::error::TriageResult;

/// FNV-1a offset basis (64-bit).
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a prime (64-bit).
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Default embedding dimension.
const DEFAULT_DIMENSION: usize = 256;

/// Tokens shorter than this are filtered out.
const MIN_TOKEN_LEN: usize = 2;

/// Deterministic bag-of-words hash embedder.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create an embedder with a custom dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Embed a single message.
    pub fn embed_one(&self, message: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];

        for token in tokenize(message) {
            let hash = fnv1a_hash(token.as_bytes());
            let index = (hash as usize) % self.dimension;
            let sign = if (hash >> 63) == 1 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }

        l2_normalize(&mut vector);
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, messages: &[String]) -> TriageResult<Vec<Vec<f32>>> {
        Ok(messages.iter().map(|m| self.embed_one(m)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn id(&self) -> &str {
        "fnv1a-hash"
    }
}

fn fnv1a_hash(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Lowercased alphanumeric tokens, short tokens filtered.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

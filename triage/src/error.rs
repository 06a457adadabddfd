//! Error taxonomy for the triage pipeline.
//!
//! The split mirrors the failure policy of the batch run: missing ticket
//! sources and clustering failures abort the run, per-cluster failures are
//! isolated to their cluster, and persistence failures are reported without
//! aborting anything.

use thiserror::Error;

/// Result type alias for triage operations
pub type TriageResult<T> = Result<T, TriageError>;

/// Error type for triage pipeline operations
#[derive(Debug, Error)]
pub enum TriageError {
    /// A required ingestion source is absent. Fatal for tickets; the
    /// auxiliary signal falls back to its default instead of raising this.
    #[error("missing resource: {0}")]
    MissingResource(String),

    /// Input that could not be parsed into the expected shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Tickets and embedding vectors are not index-aligned.
    #[error("embedding mismatch: {tickets} tickets vs {vectors} vectors")]
    EmbeddingMismatch { tickets: usize, vectors: usize },

    /// Processing of a single cluster failed. Isolated by the pipeline:
    /// logged with the offending label and excluded from the run output.
    #[error("cluster {label} failed: {message}")]
    ClusterFailure { label: String, message: String },

    /// An artifact write failed. Reported to the operator; never aborts
    /// the run and never touches previously persisted artifacts.
    #[error("persistence failure for {path}: {source}")]
    Persistence {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TriageError {
    /// Wrap any error as a per-cluster failure for the given label.
    pub fn for_cluster(label: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Self::ClusterFailure {
            label: label.to_string(),
            message: err.to_string(),
        }
    }
}

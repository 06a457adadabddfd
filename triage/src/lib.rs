//! Support Triage Pipeline Library
//!
//! This library implements a single-pass batch pipeline that turns a raw
//! stream of support tickets into a structured operations report:
//!
//! - Density-based clustering of semantically similar tickets
//! - Per-cluster semantic classification (stage + root cause + confidence)
//! - Counterfactual explanations for the rejected hypotheses
//! - Deterministic decision/risk mapping with a production-impact override
//! - Automation-restraint reporting (what the system deliberately withholds)
//! - Trend analysis of an auxiliary system signal
//! - Conditional repro-pack generation for engineering handoff
//! - A strict multi-gate global alert across the whole run
//!
//! All decisions are deterministic — the shipped semantic classifier is a
//! keyword rule ladder behind a swappable trait, and the embedding adapter
//! is dependency-injected so a real model can replace the hash-based
//! fallback without touching callers.

pub mod analysis;
pub mod cluster;
pub mod decision;
pub mod embedding;
pub mod error;
pub mod insight;
pub mod pipeline;
pub mod report;
pub mod repro;
pub mod signal;
pub mod ticket;
pub mod trajectory;

// Re-export key pipeline types
pub use pipeline::{Pipeline, PipelineConfig, RunOutcome};

// Re-export key analysis types
pub use analysis::{
    Classification, ClusterAnalysis, CounterfactualEntry, KeywordClassifier, RootCause,
    SemanticClassifier, Stage,
};

// Re-export key clustering types
pub use cluster::{Cluster, ClusterEngine, ClusterLabel};

// Re-export key decision types
pub use decision::{decide, report_restraint, Decision, Restraint, RiskLevel};

// Re-export key artifact types
pub use insight::{GlobalInsight, InsightVerdict};
pub use report::{ClusterReport, ReproPackRef, Timeline};
pub use repro::{ReproPack, ReproPackStore, ReproType};

// Re-export ingestion types
pub use embedding::{Embedder, HashingEmbedder, SharedEmbedder};
pub use error::{TriageError, TriageResult};
pub use signal::SystemSignal;
pub use ticket::{Ticket, TicketStore};
pub use trajectory::{TrendForecast, Trajectory};

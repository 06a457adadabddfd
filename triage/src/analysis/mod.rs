//! Per-cluster semantic analysis: classification and counterfactuals.

mod classifier;
mod counterfactual;

pub use classifier::{Classification, KeywordClassifier, SemanticClassifier};
pub use counterfactual::{rejected_alternatives, CounterfactualEntry};

use serde::{Deserialize, Serialize};

use crate::cluster::{Cluster, ClusterLabel};

/// Inferred point in a merchant's integration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SetupAuth,
    Integration,
    LiveScale,
    /// Noise clusters only — outliers are never attributed a stage.
    Indeterminate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetupAuth => write!(f, "Stage 1: Setup & Auth"),
            Self::Integration => write!(f, "Stage 2: Integration"),
            Self::LiveScale => write!(f, "Stage 3: Live / Scale"),
            Self::Indeterminate => write!(f, "Various / Indeterminate"),
        }
    }
}

/// Inferred category of underlying problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootCause {
    MerchantConfig,
    DocumentationGap,
    PlatformIssue,
    /// Noise clusters only.
    MixedIssues,
}

impl RootCause {
    /// The three candidate causes the classifier can actually select.
    pub const CANDIDATES: [RootCause; 3] = [
        RootCause::PlatformIssue,
        RootCause::DocumentationGap,
        RootCause::MerchantConfig,
    ];

    pub fn is_platform(&self) -> bool {
        matches!(self, Self::PlatformIssue)
    }
}

impl std::fmt::Display for RootCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MerchantConfig => write!(f, "Merchant Configuration Error"),
            Self::DocumentationGap => write!(f, "Documentation Gap"),
            Self::PlatformIssue => write!(f, "Platform Issue / Regression"),
            Self::MixedIssues => write!(f, "Mixed / Uncorrelated Issues"),
        }
    }
}

/// Immutable analysis derived from one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterAnalysis {
    /// Human-facing cluster name ("Cluster 0", "Isolated / Rare Issues").
    pub cluster_name: String,
    pub label: ClusterLabel,
    pub stage: Stage,
    pub root_cause: RootCause,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub reasoning: String,
    pub ticket_count: usize,
}

/// Confidence ceiling applied to noise clusters.
const NOISE_CONFIDENCE_CAP: f64 = 0.3;

/// Analyze a cluster with the given classifier.
///
/// The noise path overrides the classifier unconditionally: outliers are
/// never attributed a specific root cause, regardless of keyword content.
pub fn analyze_cluster(cluster: &Cluster, classifier: &dyn SemanticClassifier) -> ClusterAnalysis {
    if cluster.label.is_noise() {
        return ClusterAnalysis {
            cluster_name: cluster.label.title(),
            label: cluster.label,
            stage: Stage::Indeterminate,
            root_cause: RootCause::MixedIssues,
            confidence: NOISE_CONFIDENCE_CAP,
            reasoning: "Tickets lack strong semantic similarity (outliers).".to_string(),
            ticket_count: cluster.members.len(),
        };
    }

    let classification = classifier.classify(&cluster.combined_text());
    ClusterAnalysis {
        cluster_name: cluster.label.title(),
        label: cluster.label,
        stage: classification.stage,
        root_cause: classification.root_cause,
        confidence: classification.confidence,
        reasoning: classification.reasoning,
        ticket_count: cluster.members.len(),
    }
}

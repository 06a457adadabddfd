//! Semantic classifier — a swappable capability.
//!
//! The shipped implementation is a deterministic keyword rule ladder
//! (first matching rule wins). Production deployments may substitute a
//! learned model behind the same `text -> Classification` contract.

use serde::{Deserialize, Serialize};

use super::{RootCause, Stage};

/// Structured inference for one cluster's combined text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub stage: Stage,
    pub root_cause: RootCause,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Fixed human-readable justification for the matched rule.
    pub reasoning: String,
}

/// Maps cluster text to a structured inference.
pub trait SemanticClassifier: Send + Sync {
    /// Classify already-lowercased cluster text.
    fn classify(&self, text: &str) -> Classification;
}

/// Keyword rule-ladder classifier. Rules form a strict priority list.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl SemanticClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Classification {
        if ["production", "500", "outage"].iter().any(|w| text.contains(w)) {
            return Classification {
                stage: Stage::LiveScale,
                root_cause: RootCause::PlatformIssue,
                confidence: 0.92,
                reasoning: "Keywords '500 error' and 'production' indicate a server-side \
                            failure affecting live traffic."
                    .to_string(),
            };
        }

        if ["docs", "example", "how to"].iter().any(|w| text.contains(w)) {
            return Classification {
                stage: Stage::Integration,
                root_cause: RootCause::DocumentationGap,
                confidence: 0.85,
                reasoning: "Users are requesting examples and schema definitions, implying \
                            missing information in developer guides."
                    .to_string(),
            };
        }

        if text.contains("checkout") && !text.contains("error") {
            return Classification {
                stage: Stage::Integration,
                root_cause: RootCause::MerchantConfig,
                confidence: 0.75,
                reasoning: "Questions regarding checkout implementation logic suggest \
                            implementation hurdles, not platform bugs."
                    .to_string(),
            };
        }

        Classification {
            stage: Stage::SetupAuth,
            root_cause: RootCause::MerchantConfig,
            confidence: 0.65,
            reasoning: "The user is struggling with initial API key validation, which is \
                        typical during setup."
                .to_string(),
        }
    }
}

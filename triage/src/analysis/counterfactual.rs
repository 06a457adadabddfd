//! Counterfactual generator — "why not X?" arguments.
//!
//! For every candidate root cause the classifier did not select, this
//! produces the specific ground on which it was rejected. The reason text
//! is the explainability contract: tests assert it verbatim.

use serde::{Deserialize, Serialize};

use super::RootCause;

/// One rejected alternative hypothesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterfactualEntry {
    pub hypothesis: RootCause,
    pub reason_rejected: String,
}

/// Generate the rejected alternatives for a cluster.
///
/// `cluster_text` must be the lowercased combined member text. The
/// selected cause never appears in the output.
pub fn rejected_alternatives(
    selected: RootCause,
    cluster_text: &str,
) -> Vec<CounterfactualEntry> {
    let mut alternatives = Vec::new();

    if selected != RootCause::PlatformIssue {
        let reason = if !cluster_text.contains("500") && !cluster_text.contains("outage") {
            "No server-side error codes (5xx) or 'outage' keywords detected in ticket text."
        } else {
            "Symptoms appeared isolated to specific configuration rather than global failure."
        };
        alternatives.push(CounterfactualEntry {
            hypothesis: RootCause::PlatformIssue,
            reason_rejected: reason.to_string(),
        });
    }

    if selected != RootCause::DocumentationGap {
        let reason = if !cluster_text.contains("example") && !cluster_text.contains("docs") {
            "Users are reporting errors, not asking for clarification or missing links."
        } else {
            "Documentation exists, but user implementation contradicts the schema."
        };
        alternatives.push(CounterfactualEntry {
            hypothesis: RootCause::DocumentationGap,
            reason_rejected: reason.to_string(),
        });
    }

    if selected != RootCause::MerchantConfig {
        alternatives.push(CounterfactualEntry {
            hypothesis: RootCause::MerchantConfig,
            reason_rejected: "Issue persists across multiple merchants or affects internal \
                              systems, ruling out individual config."
                .to_string(),
        });
    }

    alternatives
}

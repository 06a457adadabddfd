//! Global insight aggregator — the cross-cluster critical alert.
//!
//! A cluster qualifies as a severe alert only when five independent gates
//! all hold; this is a strict AND with no partial-credit scoring. One
//! qualifying cluster is enough to raise the run-level critical verdict.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{ClusterAnalysis, Stage};

/// Minimum cluster size for a severe alert.
const MIN_SEVERE_TICKETS: usize = 3;

/// Minimum confidence for a severe alert.
const MIN_SEVERE_CONFIDENCE: f64 = 0.7;

/// Run-level verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightVerdict {
    /// At least one verified production outage pattern.
    Critical,
    /// Standard support volume, no platform outage detected.
    Operational,
}

/// Cross-cluster health verdict for one run. Recomputed fresh each run,
/// never persisted as an entity of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalInsight {
    pub verdict: InsightVerdict,
    /// The clusters that passed all five gates.
    pub severe_alerts: Vec<ClusterAnalysis>,
    pub recommendation: String,
}

impl GlobalInsight {
    pub fn is_critical(&self) -> bool {
        self.verdict == InsightVerdict::Critical
    }
}

/// Whether one analysis passes all five severity gates.
fn qualifies(analysis: &ClusterAnalysis) -> bool {
    !analysis.label.is_noise()
        && analysis.ticket_count >= MIN_SEVERE_TICKETS
        && analysis.stage == Stage::LiveScale
        && analysis.confidence >= MIN_SEVERE_CONFIDENCE
        && analysis.root_cause.is_platform()
}

/// Scan all per-cluster analyses and produce the run verdict.
pub fn generate_global_insight(analyses: &[ClusterAnalysis]) -> GlobalInsight {
    let severe_alerts: Vec<ClusterAnalysis> = analyses
        .iter()
        .filter(|a| qualifies(a))
        .cloned()
        .collect();

    if severe_alerts.is_empty() {
        info!("global health check: operational, no critical platform outages detected");
        return GlobalInsight {
            verdict: InsightVerdict::Operational,
            severe_alerts,
            recommendation: "Monitoring standard support volume.".to_string(),
        };
    }

    warn!(
        outages = severe_alerts.len(),
        "global health check: verified production outage(s) detected"
    );
    GlobalInsight {
        verdict: InsightVerdict::Critical,
        severe_alerts,
        recommendation: "FREEZE DEPLOYMENTS & PAGE ON-CALL ENGINEERING.".to_string(),
    }
}

//! Run output artifact — the contract the presentation layer reads.
//!
//! The serialized shape is frozen: any field rename here is a breaking
//! change for the dashboard. Reports are ordered by cluster label so
//! identical runs produce identical artifacts.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{ClusterAnalysis, CounterfactualEntry};
use crate::cluster::Cluster;
use crate::decision::{Decision, Restraint};
use crate::error::{TriageError, TriageResult};
use crate::repro::ReproPack;

/// The Observe → Reason → Decide → Act trace for one cluster.
///
/// Key casing is part of the frozen contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(rename = "Observe")]
    pub observe: String,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Decide")]
    pub decide: String,
    #[serde(rename = "Act")]
    pub act: String,
}

/// Pointer to a persisted repro pack, embedded in the cluster report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproPackRef {
    pub id: String,
    pub path: String,
    pub repro_type: String,
    pub trigger_reasons: Vec<String>,
}

/// One per-cluster entry of the run output artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
    pub id: String,
    pub title: String,
    pub stage: String,
    pub root_cause: String,
    pub confidence: f64,
    pub risk: String,
    pub ticket_ids: Vec<u64>,
    pub merchants: Vec<u64>,
    pub timeline: Timeline,
    pub restraint: Restraint,
    pub repro_pack: Option<ReproPackRef>,
    pub counterfactuals: Vec<CounterfactualEntry>,
}

impl ClusterReport {
    /// Assemble the report entry for one fully-processed cluster.
    pub fn assemble(
        cluster: &Cluster,
        analysis: &ClusterAnalysis,
        counterfactuals: Vec<CounterfactualEntry>,
        decision: &Decision,
        restraint: Restraint,
        repro: Option<(&ReproPack, &Path)>,
    ) -> Self {
        let ticket_ids: Vec<u64> = cluster.members.iter().map(|t| t.id).collect();
        let merchants: Vec<u64> = cluster
            .members
            .iter()
            .map(|t| t.merchant_id)
            .collect::<BTreeSet<u64>>()
            .into_iter()
            .collect();

        let act = match &repro {
            Some((pack, _)) => format!(
                "Generated {} repro pack {} for engineering handoff.",
                pack.repro_type, pack.incident_id
            ),
            None => format!("Withheld: {}", restraint.action_not_taken),
        };

        let timeline = Timeline {
            observe: format!(
                "Observed {} related ticket(s) grouped as {}.",
                cluster.members.len(),
                analysis.cluster_name
            ),
            reason: analysis.reasoning.clone(),
            decide: decision.recommended_action.clone(),
            act,
        };

        let repro_pack = repro.map(|(pack, path)| ReproPackRef {
            id: pack.incident_id.clone(),
            path: path.display().to_string(),
            repro_type: pack.repro_type.to_string(),
            trigger_reasons: pack.trigger_reasons.clone(),
        });

        Self {
            id: cluster.label.to_string(),
            title: analysis.cluster_name.clone(),
            stage: analysis.stage.to_string(),
            root_cause: analysis.root_cause.to_string(),
            confidence: analysis.confidence,
            risk: decision.risk_level.to_string(),
            ticket_ids,
            merchants,
            timeline,
            restraint,
            repro_pack,
            counterfactuals,
        }
    }
}

/// Persist the ordered report list as the run output artifact.
pub fn write_run_artifact(reports: &[ClusterReport], path: impl AsRef<Path>) -> TriageResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json).map_err(|source| TriageError::Persistence {
        path: path.display().to_string(),
        source,
    })?;
    info!(clusters = reports.len(), path = %path.display(), "run artifact written");
    Ok(())
}

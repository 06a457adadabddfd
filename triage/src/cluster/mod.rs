//! Clustering — grouping tickets by semantic similarity.
//!
//! Labels are a tagged variant rather than a sentinel integer: `Noise` is
//! a first-class, representable case because both the classifier and the
//! global aggregator special-case it.

mod engine;

pub use engine::ClusterEngine;

use serde::{Deserialize, Serialize};

use crate::ticket::Ticket;

/// Label of one cluster within a run.
///
/// Ordering puts numbered clusters first (ascending) and `Noise` last,
/// which is the deterministic order run output is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterLabel {
    /// An ordinary dense cluster, numbered from 0 in discovery order.
    Numbered(u32),
    /// The single bucket for tickets no dense core could reach.
    Noise,
}

impl ClusterLabel {
    /// Human-facing cluster title.
    pub fn title(&self) -> String {
        match self {
            Self::Numbered(n) => format!("Cluster {n}"),
            Self::Noise => "Isolated / Rare Issues".to_string(),
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, Self::Noise)
    }
}

impl std::fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numbered(n) => write!(f, "cluster-{n}"),
            Self::Noise => write!(f, "noise"),
        }
    }
}

/// A labeled group of tickets judged semantically similar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub label: ClusterLabel,
    /// Member tickets in ingestion order.
    pub members: Vec<Ticket>,
}

impl Cluster {
    /// Concatenated lower-cased member text, the classifier input.
    pub fn combined_text(&self) -> String {
        self.members
            .iter()
            .map(|t| t.message.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

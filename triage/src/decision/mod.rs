//! Decision engine and restraint reporting.

mod engine;
mod restraint;

pub use engine::decide;
pub use restraint::{confidence_from_value, normalize_confidence, report_restraint};

use serde::{Deserialize, Serialize};

/// Risk level assigned to a cluster. Ordering reflects severity, which is
/// what makes the production override provably monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    HighProductionImpact,
}

impl RiskLevel {
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High | Self::HighProductionImpact)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::HighProductionImpact => write!(f, "High (Production Impact)"),
        }
    }
}

/// Action and risk derived from one cluster analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub recommended_action: String,
    pub risk_level: RiskLevel,
}

/// An automated action the system could take but deliberately does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restraint {
    pub action_not_taken: String,
    pub reason: String,
}

//! Trajectory analyzer — two-point trend over a signal history.
//!
//! Intentionally insensitive to intermediate history shape: the verdict
//! depends only on the difference between the last and first points.

use serde::{Deserialize, Serialize};

/// Short-term trend classification of a signal history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trajectory {
    InsufficientData,
    Stable,
    RisingTrend,
    Recovering,
    RapidEscalation,
}

impl std::fmt::Display for Trajectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientData => write!(f, "Insufficient Data"),
            Self::Stable => write!(f, "Stable"),
            Self::RisingTrend => write!(f, "Rising Trend"),
            Self::Recovering => write!(f, "Recovering"),
            Self::RapidEscalation => write!(f, "Rapid Escalation (Critical)"),
        }
    }
}

/// Trend verdict plus the near-term ticket-volume prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendForecast {
    pub trajectory: Trajectory,
    pub prediction: String,
}

/// Threshold on `last - first` separating a rapid escalation from an
/// ordinary rise.
const ESCALATION_DELTA: f64 = 10.0;

/// Classify the short-term trend of a signal history.
pub fn analyze_signal_trend(history: &[f64]) -> TrendForecast {
    if history.len() < 2 {
        return TrendForecast {
            trajectory: Trajectory::InsufficientData,
            prediction: "Monitor".to_string(),
        };
    }

    let diff = history[history.len() - 1] - history[0];

    let (trajectory, prediction) = if diff > ESCALATION_DELTA {
        (
            Trajectory::RapidEscalation,
            "Expect surge in high-priority tickets within 15-30 minutes.",
        )
    } else if diff > 0.0 {
        (
            Trajectory::RisingTrend,
            "Minor increase in support volume likely.",
        )
    } else if diff < 0.0 {
        (
            Trajectory::Recovering,
            "Incident potentially resolving; ticket volume should taper.",
        )
    } else {
        (Trajectory::Stable, "No change expected in ticket volume.")
    };

    TrendForecast {
        trajectory,
        prediction: prediction.to_string(),
    }
}

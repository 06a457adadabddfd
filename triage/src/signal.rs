//! Auxiliary system-signal ingestion.
//!
//! The signal is optional context (e.g. an error-rate gauge feeding the
//! trajectory analyzer). Absence of the backing file is not an error:
//! the pipeline proceeds with an empty default signal.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A monitoring signal snapshot with short-term history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSignal {
    /// Signal name (e.g. "error_rate_5xx").
    pub name: String,
    /// Most recent observed value.
    pub current_value: f64,
    /// Ordered history of recent values, oldest first.
    pub history: Vec<f64>,
    /// Human-readable window the history covers.
    pub time_window: String,
}

impl Default for SystemSignal {
    fn default() -> Self {
        Self {
            name: "none".to_string(),
            current_value: 0.0,
            history: Vec::new(),
            time_window: "n/a".to_string(),
        }
    }
}

impl SystemSignal {
    /// Load a signal from a JSON file, never failing.
    ///
    /// Accepts both the current shape (`name` + `current_value`) and the
    /// legacy shape (`signal` + `value`); `current_value` wins when both
    /// value keys are present. Missing or unreadable files yield the
    /// default signal with a warning.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "signal file unavailable, using default");
                return Self::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "signal file unparseable, using default");
                Self::default()
            }
        }
    }

    /// Build a signal from a loosely-shaped JSON value.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();

        let name = value
            .get("name")
            .or_else(|| value.get("signal"))
            .and_then(Value::as_str)
            .unwrap_or(&defaults.name)
            .to_string();

        // `current_value` takes precedence over the legacy `value` key.
        let current_value = value
            .get("current_value")
            .or_else(|| value.get("value"))
            .and_then(Value::as_f64)
            .unwrap_or(defaults.current_value);

        let history = value
            .get("history")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default();

        let time_window = value
            .get("time_window")
            .and_then(Value::as_str)
            .unwrap_or(&defaults.time_window)
            .to_string();

        Self {
            name,
            current_value,
            history,
            time_window,
        }
    }
}

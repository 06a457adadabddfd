//! Restraint reporter — the automated action the system withholds.
//!
//! Every cluster report states one action the system could take but
//! deliberately does not, and why. Confidence handling is fail-open: a
//! malformed value becomes 0.5 before the rules run, never an error.

use serde_json::Value;

use super::{Restraint, RiskLevel};

/// Confidence threshold below which merchant-facing automation is withheld.
const CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Default substituted for malformed confidence values.
const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Clamp a confidence value into `[0, 1]`, substituting the fail-open
/// default for non-finite input.
pub fn normalize_confidence(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return FALLBACK_CONFIDENCE;
    }
    confidence.clamp(0.0, 1.0)
}

/// Parse a confidence out of a loosely-typed JSON value.
///
/// Accepts plain numbers, numeric strings, and legacy percentage strings
/// like `"92%"`. Anything else yields the fail-open default.
pub fn confidence_from_value(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if let Some(percent) = trimmed.strip_suffix('%') {
                percent.trim().parse::<f64>().ok().map(|p| p / 100.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    normalize_confidence(parsed.unwrap_or(FALLBACK_CONFIDENCE))
}

/// State the automated action this risk/confidence pair rules out.
pub fn report_restraint(risk: RiskLevel, confidence: f64) -> Restraint {
    let confidence = normalize_confidence(confidence);

    if risk.is_high() {
        return Restraint {
            action_not_taken: "Automated rollback of deployment".to_string(),
            reason: "Risk is critical but requires human approval.".to_string(),
        };
    }

    if confidence < CONFIDENCE_THRESHOLD {
        return Restraint {
            action_not_taken: "Automated email to affected merchants".to_string(),
            reason: format!(
                "Confidence {confidence:.2} is below the {CONFIDENCE_THRESHOLD:.2} threshold \
                 for merchant-facing automation."
            ),
        };
    }

    Restraint {
        action_not_taken: "Escalation to executive stakeholders".to_string(),
        reason: "Severity does not meet SLA threshold.".to_string(),
    }
}

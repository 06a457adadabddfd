//! Repro pack — a structured artifact giving engineers reproduction
//! context for a suspected platform issue.
//!
//! Generation is gated by the caller: only Live/Scale platform clusters
//! with confidence at or above the threshold produce a pack. Packs are
//! immutable once created and carry a globally-unique incident id.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::analysis::{ClusterAnalysis, Stage};
use crate::signal::SystemSignal;
use crate::ticket::Ticket;
use crate::trajectory::analyze_signal_trend;

/// Confidence gate for repro generation.
pub const CONFIDENCE_GATE: f64 = 0.8;

/// Cluster size below which a pack is only a preliminary signal.
const PRELIMINARY_SIZE: usize = 5;

/// Maximum length of one sample error message.
const SAMPLE_TRUNCATE: usize = 120;

/// Whether a pack carries a heuristic early signal or a full repro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReproType {
    Preliminary,
    Full,
}

impl std::fmt::Display for ReproType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preliminary => write!(f, "preliminary"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Signal context captured into the pack at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemContext {
    pub signal_name: String,
    pub current_value: f64,
    pub trend: String,
}

/// The persisted handoff artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproPack {
    /// Globally unique incident id (`INC-` + 8 uppercase hex).
    pub incident_id: String,
    pub repro_type: ReproType,
    pub trigger_reasons: Vec<String>,
    pub suspected_stage: String,
    pub suspected_root_cause: String,
    pub confidence: f64,
    pub affected_merchants: BTreeSet<u64>,
    pub affected_endpoints: Vec<String>,
    pub sample_error_messages: BTreeSet<String>,
    pub repro_steps: Vec<String>,
    pub sample_payload: Value,
    pub system_context: SystemContext,
    pub generated_at: DateTime<Utc>,
}

/// The caller-enforced generation gate.
pub fn should_generate(analysis: &ClusterAnalysis) -> bool {
    analysis.stage == Stage::LiveScale
        && analysis.root_cause.is_platform()
        && analysis.confidence >= CONFIDENCE_GATE
}

impl ReproPack {
    /// Build a pack from a qualifying analysis, its member tickets, and
    /// the current system signal.
    pub fn generate(analysis: &ClusterAnalysis, tickets: &[Ticket], signal: &SystemSignal) -> Self {
        let incident_id = new_incident_id();

        let cluster_size = tickets.len();
        let repro_type = if cluster_size < PRELIMINARY_SIZE {
            ReproType::Preliminary
        } else {
            ReproType::Full
        };

        let affected_merchants: BTreeSet<u64> = tickets.iter().map(|t| t.merchant_id).collect();

        let combined_text = tickets
            .iter()
            .map(|t| t.message.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        let affected_endpoints = vec![guess_endpoint(&combined_text).to_string()];

        let sample_error_messages: BTreeSet<String> = tickets
            .iter()
            .filter(|t| looks_like_error(&t.message))
            .map(|t| truncate(&t.message, SAMPLE_TRUNCATE))
            .collect();

        let repro_steps = build_repro_steps(
            repro_type,
            &affected_endpoints[0],
            &affected_merchants,
        );

        let mut trigger_reasons = vec![
            "High confidence platform regression".to_string(),
            "Production environment (Stage 3)".to_string(),
        ];
        if repro_type == ReproType::Full {
            trigger_reasons.push(format!("Significant cluster size ({cluster_size} tickets)"));
        }
        if affected_merchants.len() > 1 {
            trigger_reasons.push("Multiple merchants affected".to_string());
        }

        Self {
            incident_id,
            repro_type,
            trigger_reasons,
            suspected_stage: analysis.stage.to_string(),
            suspected_root_cause: analysis.root_cause.to_string(),
            confidence: analysis.confidence,
            affected_merchants,
            affected_endpoints,
            sample_error_messages,
            repro_steps,
            sample_payload: json!({
                "items": [{ "id": "sku_123", "qty": 1 }],
                "currency": "USD",
                "context": "generated_by_agent",
            }),
            system_context: SystemContext {
                signal_name: signal.name.clone(),
                current_value: signal.current_value,
                trend: analyze_signal_trend(&signal.history).trajectory.to_string(),
            },
            generated_at: Utc::now(),
        }
    }
}

/// Generate a fresh incident id, unique across clusters and runs.
fn new_incident_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("INC-{suffix}")
}

/// Endpoint guess by keyword priority; first match wins.
fn guess_endpoint(combined_text: &str) -> &'static str {
    if combined_text.contains("checkout") {
        "POST /api/v1/checkout"
    } else if combined_text.contains("payment") {
        "POST /api/v1/payments"
    } else if combined_text.contains("cart") {
        "POST /api/v1/carts"
    } else {
        "GET /api/status (Fallback)"
    }
}

fn looks_like_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    message.contains("500") || lower.contains("error") || lower.contains("timeout")
}

fn truncate(message: &str, limit: usize) -> String {
    message.chars().take(limit).collect()
}

fn build_repro_steps(
    repro_type: ReproType,
    endpoint: &str,
    merchants: &BTreeSet<u64>,
) -> Vec<String> {
    let merchant_list: Vec<String> = merchants.iter().map(u64::to_string).collect();
    let merchant_list = merchant_list.join(", ");

    match repro_type {
        ReproType::Preliminary => vec![
            "NOTE: EARLY SIGNAL (Low Volume). Steps are heuristic.".to_string(),
            format!("1. Check logs for merchants: [{merchant_list}]."),
            format!("2. Monitor {endpoint} for latency spikes."),
            "3. Attempt manual reproduction using sample payload.".to_string(),
        ],
        ReproType::Full => {
            let example = merchants
                .iter()
                .next()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "ID 101".to_string());
            vec![
                format!("1. Authenticate as one of the affected merchants (e.g., {example})."),
                format!("2. Construct a standard payload for {endpoint}."),
                "3. Send request and monitor for HTTP 500 or Timeout > 5000ms.".to_string(),
                "4. Correlate request ID with system logs.".to_string(),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RootCause;
    use crate::cluster::ClusterLabel;
    use std::collections::HashSet;

    fn analysis(stage: Stage, root_cause: RootCause, confidence: f64) -> ClusterAnalysis {
        ClusterAnalysis {
            cluster_name: "Cluster 0".to_string(),
            label: ClusterLabel::Numbered(0),
            stage,
            root_cause,
            confidence,
            reasoning: "test".to_string(),
            ticket_count: 3,
        }
    }

    fn tickets(specs: &[(u64, u64, &str)]) -> Vec<Ticket> {
        specs
            .iter()
            .map(|(id, merchant_id, message)| Ticket {
                id: *id,
                merchant_id: *merchant_id,
                message: (*message).to_string(),
            })
            .collect()
    }

    #[test]
    fn test_gate_fires_only_on_all_three_conditions() {
        // Triggering case.
        assert!(should_generate(&analysis(
            Stage::LiveScale,
            RootCause::PlatformIssue,
            0.92
        )));
        // Wrong stage.
        assert!(!should_generate(&analysis(
            Stage::Integration,
            RootCause::PlatformIssue,
            0.92
        )));
        // Wrong cause.
        assert!(!should_generate(&analysis(
            Stage::LiveScale,
            RootCause::DocumentationGap,
            0.92
        )));
        // Confidence just under the gate.
        assert!(!should_generate(&analysis(
            Stage::LiveScale,
            RootCause::PlatformIssue,
            0.79
        )));
        // Boundary confidence passes.
        assert!(should_generate(&analysis(
            Stage::LiveScale,
            RootCause::PlatformIssue,
            0.8
        )));
    }

    #[test]
    fn test_repro_type_boundary_at_five_tickets() {
        let a = analysis(Stage::LiveScale, RootCause::PlatformIssue, 0.92);
        let signal = SystemSignal::default();

        let four = tickets(&[
            (1, 1, "500 a"),
            (2, 1, "500 b"),
            (3, 2, "500 c"),
            (4, 2, "500 d"),
        ]);
        assert_eq!(
            ReproPack::generate(&a, &four, &signal).repro_type,
            ReproType::Preliminary
        );

        let five = tickets(&[
            (1, 1, "500 a"),
            (2, 1, "500 b"),
            (3, 2, "500 c"),
            (4, 2, "500 d"),
            (5, 3, "500 e"),
        ]);
        assert_eq!(
            ReproPack::generate(&a, &five, &signal).repro_type,
            ReproType::Full
        );
    }

    #[test]
    fn test_endpoint_priority_checkout_first() {
        let a = analysis(Stage::LiveScale, RootCause::PlatformIssue, 0.92);
        let signal = SystemSignal::default();

        // "checkout" beats "payment" and "cart" even when all appear.
        let all = tickets(&[(1, 1, "payment failed in cart checkout with 500")]);
        let pack = ReproPack::generate(&a, &all, &signal);
        assert_eq!(pack.affected_endpoints, vec!["POST /api/v1/checkout"]);

        let payment = tickets(&[(1, 1, "payment 500 in production")]);
        let pack = ReproPack::generate(&a, &payment, &signal);
        assert_eq!(pack.affected_endpoints, vec!["POST /api/v1/payments"]);

        let cart = tickets(&[(1, 1, "cart API timeout")]);
        let pack = ReproPack::generate(&a, &cart, &signal);
        assert_eq!(pack.affected_endpoints, vec!["POST /api/v1/carts"]);

        let other = tickets(&[(1, 1, "site is down, 500 everywhere")]);
        let pack = ReproPack::generate(&a, &other, &signal);
        assert_eq!(pack.affected_endpoints, vec!["GET /api/status (Fallback)"]);
    }

    #[test]
    fn test_error_samples_deduplicated_and_truncated() {
        let a = analysis(Stage::LiveScale, RootCause::PlatformIssue, 0.92);
        let signal = SystemSignal::default();
        let long = format!("500 {}", "x".repeat(300));

        let t = tickets(&[
            (1, 1, "500 on checkout"),
            (2, 2, "500 on checkout"),
            (3, 3, &long),
            (4, 4, "where are the docs"),
        ]);
        let pack = ReproPack::generate(&a, &t, &signal);

        // Duplicate collapses; the docs question is not an error sample.
        assert_eq!(pack.sample_error_messages.len(), 2);
        assert!(pack
            .sample_error_messages
            .iter()
            .all(|m| m.chars().count() <= 120));
    }

    #[test]
    fn test_trigger_reasons_conditional_entries() {
        let a = analysis(Stage::LiveScale, RootCause::PlatformIssue, 0.92);
        let signal = SystemSignal::default();

        // Small single-merchant cluster: only the two base reasons.
        let small = tickets(&[(1, 7, "500 a"), (2, 7, "500 b")]);
        let pack = ReproPack::generate(&a, &small, &signal);
        assert_eq!(
            pack.trigger_reasons,
            vec![
                "High confidence platform regression",
                "Production environment (Stage 3)",
            ]
        );

        // Large multi-merchant cluster appends both conditional reasons.
        let large = tickets(&[
            (1, 1, "500 a"),
            (2, 2, "500 b"),
            (3, 3, "500 c"),
            (4, 4, "500 d"),
            (5, 5, "500 e"),
        ]);
        let pack = ReproPack::generate(&a, &large, &signal);
        assert!(pack
            .trigger_reasons
            .contains(&"Significant cluster size (5 tickets)".to_string()));
        assert!(pack
            .trigger_reasons
            .contains(&"Multiple merchants affected".to_string()));
    }

    #[test]
    fn test_incident_ids_unique_across_calls() {
        let a = analysis(Stage::LiveScale, RootCause::PlatformIssue, 0.92);
        let signal = SystemSignal::default();
        let t = tickets(&[(1, 1, "500")]);

        let ids: HashSet<String> = (0..200)
            .map(|_| ReproPack::generate(&a, &t, &signal).incident_id)
            .collect();
        assert_eq!(ids.len(), 200);
        assert!(ids.iter().all(|id| id.starts_with("INC-") && id.len() == 12));
    }

    #[test]
    fn test_system_context_captures_signal_trend() {
        let a = analysis(Stage::LiveScale, RootCause::PlatformIssue, 0.92);
        let signal = SystemSignal {
            name: "error_rate_5xx".to_string(),
            current_value: 42.0,
            history: vec![2.0, 15.0, 42.0],
            time_window: "last 30 min".to_string(),
        };
        let pack = ReproPack::generate(&a, &tickets(&[(1, 1, "500")]), &signal);

        assert_eq!(pack.system_context.signal_name, "error_rate_5xx");
        assert_eq!(pack.system_context.current_value, 42.0);
        assert_eq!(pack.system_context.trend, "Rapid Escalation (Critical)");
    }

    #[test]
    fn test_preliminary_steps_flag_early_signal() {
        let a = analysis(Stage::LiveScale, RootCause::PlatformIssue, 0.92);
        let pack = ReproPack::generate(
            &a,
            &tickets(&[(1, 1, "checkout 500"), (2, 2, "checkout 500 again")]),
            &SystemSignal::default(),
        );
        assert!(pack.repro_steps[0].contains("EARLY SIGNAL"));
        assert!(pack.repro_steps[2].contains("POST /api/v1/checkout"));
    }
}

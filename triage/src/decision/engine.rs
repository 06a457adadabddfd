//! Deterministic mapping from {stage, root cause} to {action, risk}.

use crate::analysis::{RootCause, Stage};

use super::{Decision, RiskLevel};

const ACTION_STANDARD_GUIDE: &str = "Send standard configuration guide.";
const ACTION_DOC_TICKET: &str = "Create internal ticket to update docs + Notify merchant.";
const ACTION_ESCALATE_ENGINEERING: &str = "ESCALATE to Engineering immediately.";
const ACTION_MANUAL_TRIAGE: &str = "Route tickets to standard support workflow (Manual Triage).";
const ACTION_SENIOR_SUPPORT: &str = "Escalate to Senior Support (Production Config Check).";

/// Map an analysis to a recommended action and risk level.
///
/// The Live/Scale override runs after the base mapping and is monotonic:
/// it only ever raises severity. The manual-triage routing survives the
/// override — mixed clusters stay in the manual workflow even when a
/// production stage forces the risk up.
pub fn decide(stage: Stage, root_cause: RootCause) -> Decision {
    let (mut action, mut risk) = match root_cause {
        RootCause::DocumentationGap => (ACTION_DOC_TICKET, RiskLevel::Medium),
        RootCause::PlatformIssue => (ACTION_ESCALATE_ENGINEERING, RiskLevel::High),
        RootCause::MixedIssues => (ACTION_MANUAL_TRIAGE, RiskLevel::Medium),
        RootCause::MerchantConfig => (ACTION_STANDARD_GUIDE, RiskLevel::Low),
    };

    if stage == Stage::LiveScale && risk != RiskLevel::High {
        risk = RiskLevel::HighProductionImpact;
        if action != ACTION_MANUAL_TRIAGE {
            action = ACTION_SENIOR_SUPPORT;
        }
    }

    Decision {
        recommended_action: action.to_string(),
        risk_level: risk,
    }
}

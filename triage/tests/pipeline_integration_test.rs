//! End-to-end pipeline scenarios: production outage escalation and a
//! benign documentation question.

use std::sync::Arc;

use triage::{
    decide, report::write_run_artifact, HashingEmbedder, KeywordClassifier, Pipeline,
    PipelineConfig, RiskLevel, RootCause, SemanticClassifier, Stage, SystemSignal, Ticket,
};

fn ticket(id: u64, merchant_id: u64, message: &str) -> Ticket {
    Ticket {
        id,
        merchant_id,
        message: message.to_string(),
    }
}

fn pipeline(repro_dir: &std::path::Path) -> Pipeline {
    Pipeline::new(
        Arc::new(HashingEmbedder::default()),
        Arc::new(KeywordClassifier),
        PipelineConfig {
            max_parallel_workers: 4,
            repro_dir: repro_dir.to_path_buf(),
        },
    )
}

#[tokio::test]
async fn production_outage_cluster_generates_repro_and_alert() {
    let dir = tempfile::tempdir().unwrap();
    let tickets = vec![
        ticket(1, 1, "500 error on checkout in production"),
        ticket(2, 2, "another 500 in production checkout"),
        ticket(3, 2, "production outage checkout 500"),
    ];
    let signal = SystemSignal {
        name: "error_rate_5xx".to_string(),
        current_value: 42.0,
        history: vec![2.0, 15.0, 42.0],
        time_window: "last 30 min".to_string(),
    };

    let outcome = pipeline(dir.path()).run(tickets, signal).await.unwrap();

    // One real cluster, not noise.
    assert_eq!(outcome.reports.len(), 1);
    let report = &outcome.reports[0];
    assert_eq!(report.id, "cluster-0");
    assert_eq!(report.stage, "Stage 3: Live / Scale");
    assert_eq!(report.root_cause, "Platform Issue / Regression");
    assert_eq!(report.confidence, 0.92);
    assert_eq!(report.risk, "High");
    assert_eq!(report.merchants, vec![1, 2]);

    // Repro pack: preliminary (3 < 5 tickets), checkout endpoint, persisted.
    let pack_ref = report.repro_pack.as_ref().expect("repro pack expected");
    assert_eq!(pack_ref.repro_type, "preliminary");
    assert!(pack_ref
        .trigger_reasons
        .contains(&"Multiple merchants affected".to_string()));
    let raw = std::fs::read_to_string(&pack_ref.path).unwrap();
    let pack: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        pack["affected_endpoints"][0].as_str().unwrap(),
        "POST /api/v1/checkout"
    );
    assert_eq!(pack["incident_id"].as_str().unwrap(), pack_ref.id);

    // All five alert gates hold, so the run verdict is critical.
    assert!(outcome.insight.is_critical());
    assert_eq!(outcome.insight.severe_alerts.len(), 1);

    // The counterfactuals exclude the selected cause and explain the rest.
    assert_eq!(report.counterfactuals.len(), 2);
    assert!(report
        .counterfactuals
        .iter()
        .all(|e| e.hypothesis != RootCause::PlatformIssue));
}

#[tokio::test]
async fn single_docs_question_stays_benign() {
    // Classification and decision for the docs question are exact.
    let text = "where can i find the api docs example for schema?";
    let classification = KeywordClassifier.classify(text);
    assert_eq!(classification.stage, Stage::Integration);
    assert_eq!(classification.root_cause, RootCause::DocumentationGap);
    assert_eq!(classification.confidence, 0.85);

    let decision = decide(classification.stage, classification.root_cause);
    assert_eq!(
        decision.recommended_action,
        "Create internal ticket to update docs + Notify merchant."
    );
    assert_eq!(decision.risk_level, RiskLevel::Medium);

    // A full run over the lone ticket produces no repro pack and no alert.
    let dir = tempfile::tempdir().unwrap();
    let tickets = vec![ticket(1, 9, "where can I find the API docs example for schema?")];
    let outcome = pipeline(dir.path())
        .run(tickets, SystemSignal::default())
        .await
        .unwrap();

    assert!(outcome.reports.iter().all(|r| r.repro_pack.is_none()));
    assert!(!outcome.insight.is_critical());
    // No second ticket reaches the density threshold, so the lone ticket
    // is reported as an isolated outlier rather than dropped.
    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.reports[0].id, "noise");
    assert_eq!(outcome.reports[0].ticket_ids, vec![1]);
}

#[tokio::test]
async fn run_artifact_survives_serialization_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let tickets = vec![
        ticket(1, 1, "500 error on checkout in production"),
        ticket(2, 2, "another 500 in production checkout"),
        ticket(3, 2, "production outage checkout 500"),
        ticket(4, 5, "how do I rotate my API keys"),
    ];
    let outcome = pipeline(dir.path())
        .run(tickets, SystemSignal::default())
        .await
        .unwrap();

    let artifact = dir.path().join("analysis_output.json");
    write_run_artifact(&outcome.reports, &artifact).unwrap();

    let raw = std::fs::read_to_string(&artifact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), outcome.reports.len());

    // Deterministic ordering: numbered clusters first, noise last.
    let last = entries.last().unwrap();
    assert_eq!(last["id"].as_str().unwrap(), "noise");
    assert_eq!(
        last["root_cause"].as_str().unwrap(),
        "Mixed / Uncorrelated Issues"
    );
    assert_eq!(last["timeline"]["Decide"].as_str().unwrap(),
        "Route tickets to standard support workflow (Manual Triage).");
}

#[tokio::test]
async fn identical_runs_produce_identical_reports() {
    let tickets = vec![
        ticket(1, 1, "500 error on checkout in production"),
        ticket(2, 2, "another 500 in production checkout"),
        ticket(3, 2, "production outage checkout 500"),
        ticket(4, 5, "how do I rotate my API keys"),
    ];

    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let first = pipeline(dir_a.path())
        .run(tickets.clone(), SystemSignal::default())
        .await
        .unwrap();
    let second = pipeline(dir_b.path())
        .run(tickets, SystemSignal::default())
        .await
        .unwrap();

    let shape = |outcome: &triage::RunOutcome| -> Vec<(String, String, Vec<u64>)> {
        outcome
            .reports
            .iter()
            .map(|r| (r.id.clone(), r.root_cause.clone(), r.ticket_ids.clone()))
            .collect()
    };
    assert_eq!(shape(&first), shape(&second));
}

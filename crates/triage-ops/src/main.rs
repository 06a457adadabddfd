use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use triage::{
    report::write_run_artifact, ClusterEngine, HashingEmbedder, KeywordClassifier, Pipeline,
    PipelineConfig, SystemSignal, TicketStore,
};

/// Batch triage over a snapshot of support tickets.
#[derive(Debug, Parser)]
#[command(name = "triage-ops", version, about)]
struct Args {
    /// Ticket snapshot to analyze (JSON array).
    #[arg(long, default_value = "tickets.json")]
    tickets: PathBuf,

    /// Auxiliary system signal file (optional; a neutral signal is used
    /// when the file is missing or malformed).
    #[arg(long, default_value = "system_signals.json")]
    signal: PathBuf,

    /// Where the run artifact is written.
    #[arg(long, default_value = "analysis_output.json")]
    output: PathBuf,

    /// Directory repro packs are persisted into.
    #[arg(long, default_value = "repro_packs")]
    repro_dir: PathBuf,

    /// Upper bound on concurrently processed clusters.
    #[arg(long, default_value_t = 4)]
    max_workers: usize,

    /// Density threshold; lower it to 1 for small demo datasets where
    /// every ticket should form its own cluster.
    #[arg(long, default_value_t = ClusterEngine::DEFAULT_MIN_NEIGHBORS)]
    min_neighbors: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let store = TicketStore::load(&args.tickets)
        .with_context(|| format!("loading tickets from {}", args.tickets.display()))?;
    info!(tickets = store.tickets().len(), path = %args.tickets.display(), "tickets loaded");

    let signal = SystemSignal::load(&args.signal);
    info!(signal = %signal.name, value = signal.current_value, "system signal ready");

    let pipeline = Pipeline::new(
        Arc::new(HashingEmbedder::default()),
        Arc::new(KeywordClassifier),
        PipelineConfig {
            max_parallel_workers: args.max_workers,
            repro_dir: args.repro_dir.clone(),
        },
    )
    .with_engine(ClusterEngine::new(
        ClusterEngine::DEFAULT_EPS,
        args.min_neighbors,
    ));

    let outcome = pipeline.run(store.into_tickets(), signal).await?;

    for report in &outcome.reports {
        info!(
            cluster = %report.id,
            tickets = report.ticket_ids.len(),
            root_cause = %report.root_cause,
            risk = %report.risk,
            repro = report.repro_pack.is_some(),
            "cluster processed"
        );
    }

    info!(trend = %outcome.forecast.trajectory, "signal trend: {}", outcome.forecast.prediction);

    if outcome.insight.is_critical() {
        warn!(
            severe_clusters = outcome.insight.severe_alerts.len(),
            "{}", outcome.insight.recommendation
        );
    } else {
        info!("{}", outcome.insight.recommendation);
    }

    write_run_artifact(&outcome.reports, &args.output)
        .with_context(|| format!("writing run artifact to {}", args.output.display()))?;
    info!(path = %args.output.display(), "triage run complete");

    Ok(())
}

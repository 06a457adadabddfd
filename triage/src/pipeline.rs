//! The batch pipeline — one run over a fixed snapshot of tickets.
//!
//! Fan-out/fan-in topology: clustering happens up front, then every
//! cluster is processed by an independent worker task (classification,
//! counterfactuals, decision, restraint, conditional repro pack). Workers
//! share no mutable state; results are merged and sorted by cluster label
//! so the output is deterministic regardless of completion order.
//!
//! ## Partial failure policy
//!
//! A failure (or panic) in one cluster's worker is logged with the
//! offending label and excluded from the output; the remaining clusters
//! and the global aggregation still complete. Only errors outside the
//! per-cluster loop (ingestion, embedding, clustering) abort the run.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::analysis::{analyze_cluster, rejected_alternatives, ClusterAnalysis, SemanticClassifier};
use crate::cluster::{Cluster, ClusterEngine, ClusterLabel};
use crate::decision::{decide, report_restraint};
use crate::embedding::SharedEmbedder;
use crate::error::TriageResult;
use crate::insight::{generate_global_insight, GlobalInsight};
use crate::report::ClusterReport;
use crate::repro::{should_generate, ReproPack, ReproPackStore};
use crate::signal::SystemSignal;
use crate::ticket::Ticket;
use crate::trajectory::{analyze_signal_trend, TrendForecast};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on concurrently processed clusters.
    pub max_parallel_workers: usize,
    /// Directory repro packs are persisted into.
    pub repro_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_parallel_workers: 4,
            repro_dir: PathBuf::from("repro_packs"),
        }
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Per-cluster report entries, ordered by cluster label.
    pub reports: Vec<ClusterReport>,
    /// Per-cluster analyses, same order as `reports`.
    pub analyses: Vec<ClusterAnalysis>,
    /// Cross-cluster verdict over the surviving analyses.
    pub insight: GlobalInsight,
    /// Trend forecast of the auxiliary signal.
    pub forecast: TrendForecast,
}

/// The batch triage pipeline.
///
/// The embedder and classifier are injected once at construction and
/// shared by reference — no ambient global model state.
pub struct Pipeline {
    embedder: SharedEmbedder,
    classifier: Arc<dyn SemanticClassifier>,
    engine: ClusterEngine,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        embedder: SharedEmbedder,
        classifier: Arc<dyn SemanticClassifier>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            classifier,
            engine: ClusterEngine::default(),
            config,
        }
    }

    /// Override the cluster engine (e.g. demo mode with `min_neighbors=1`).
    pub fn with_engine(mut self, engine: ClusterEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Execute one batch run over a ticket snapshot.
    pub async fn run(&self, tickets: Vec<Ticket>, signal: SystemSignal) -> TriageResult<RunOutcome> {
        let messages: Vec<String> = tickets.iter().map(|t| t.message.clone()).collect();
        let embeddings = self.embedder.embed(&messages)?;
        info!(
            tickets = tickets.len(),
            embedder = self.embedder.id(),
            "embeddings generated"
        );

        let clusters = self.engine.cluster(&tickets, &embeddings)?;
        info!(clusters = clusters.len(), "clustering complete");

        let signal = Arc::new(signal);
        let store = Arc::new(ReproPackStore::new(&self.config.repro_dir));
        let sem = Arc::new(Semaphore::new(self.config.max_parallel_workers.max(1)));
        let mut join_set: JoinSet<(ClusterLabel, ClusterAnalysis, ClusterReport)> = JoinSet::new();

        for cluster in clusters {
            let classifier = Arc::clone(&self.classifier);
            let signal = Arc::clone(&signal);
            let store = Arc::clone(&store);
            let sem = Arc::clone(&sem);

            join_set.spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed");
                let label = cluster.label;
                let (analysis, report) =
                    process_cluster(&cluster, classifier.as_ref(), &signal, &store);
                (label, analysis, report)
            });
        }

        let mut processed: Vec<(ClusterLabel, ClusterAnalysis, ClusterReport)> = Vec::new();
        while let Some(res) = join_set.join_next().await {
            match res {
                Ok(entry) => processed.push(entry),
                Err(e) => {
                    // Worker panicked — isolate the loss, keep the run alive.
                    warn!(error = %e, "cluster worker failed; excluding it from output");
                }
            }
        }

        processed.sort_by_key(|(label, _, _)| *label);

        let analyses: Vec<ClusterAnalysis> =
            processed.iter().map(|(_, a, _)| a.clone()).collect();
        let reports: Vec<ClusterReport> =
            processed.into_iter().map(|(_, _, r)| r).collect();

        let insight = generate_global_insight(&analyses);
        let forecast = analyze_signal_trend(&signal.history);

        Ok(RunOutcome {
            reports,
            analyses,
            insight,
            forecast,
        })
    }
}

/// Process one cluster end to end. Pure and deterministic except for the
/// repro pack write, whose failure is reported and absorbed here.
fn process_cluster(
    cluster: &Cluster,
    classifier: &dyn SemanticClassifier,
    signal: &SystemSignal,
    store: &ReproPackStore,
) -> (ClusterAnalysis, ClusterReport) {
    let analysis = analyze_cluster(cluster, classifier);
    let counterfactuals = rejected_alternatives(analysis.root_cause, &cluster.combined_text());
    let decision = decide(analysis.stage, analysis.root_cause);
    let restraint = report_restraint(decision.risk_level, analysis.confidence);

    let repro = if should_generate(&analysis) {
        let pack = ReproPack::generate(&analysis, &cluster.members, signal);
        match store.persist(&pack) {
            Ok(path) => Some((pack, path)),
            Err(e) => {
                warn!(label = %cluster.label, error = %e, "repro pack persistence failed");
                None
            }
        }
    } else {
        None
    };

    let report = ClusterReport::assemble(
        cluster,
        &analysis,
        counterfactuals,
        &decision,
        restraint,
        repro.as_ref().map(|(pack, path)| (pack, path.as_path())),
    );

    (analysis, report)
}

// Bucket Checker - Bounded pool of probe workers
//
// `concurrency` long-lived workers pull candidates from the probe queue. A
// worker only dequeues when it is idle, so a saturated pool stops draining
// the queue and upstream queues absorb the burst.

use super::context::PipelineContext;
use super::probe::{BucketProbe, Finding};
use super::types::ProbeCandidate;
use colored::Colorize;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// What happened to one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Found(Vec<Finding>),
    NotFound,
    Failed,
    Cancelled,
}

/// Highlighted line emitted for a positive finding
pub fn success_line(candidate: &ProbeCandidate, findings: &[Finding]) -> String {
    let kinds = findings
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{} {} [{}]", "SUCCESS".green().bold(), candidate, kinds)
}

/// Checker stage
pub struct BucketChecker {
    ctx: Arc<PipelineContext>,
    probe: Arc<dyn BucketProbe>,
    concurrency: usize,
}

impl BucketChecker {
    /// Create a checker running at most `concurrency` probes at once (min 1)
    pub fn new(ctx: Arc<PipelineContext>, probe: Arc<dyn BucketProbe>, concurrency: usize) -> Self {
        Self {
            ctx,
            probe,
            concurrency: concurrency.max(1),
        }
    }

    /// Run the worker pool until the pipeline is cancelled
    pub async fn run(self) {
        info!(
            "Starting to process permutations with {} probe worker(s)....",
            self.concurrency
        );

        let mut workers = JoinSet::new();
        for id in 0..self.concurrency {
            self.spawn_worker(&mut workers, id);
        }

        // A worker only ends early when a probe panicked; keep the pool full
        let mut next_id = self.concurrency;
        while let Some(result) = workers.join_next().await {
            if let Err(e) = result {
                warn!("Probe worker failed: {}", e);
                if !self.ctx.is_shutdown() {
                    self.spawn_worker(&mut workers, next_id);
                    next_id += 1;
                }
            }
        }

        info!("Bucket checker stopped");
    }

    fn spawn_worker(&self, workers: &mut JoinSet<()>, id: usize) {
        let ctx = Arc::clone(&self.ctx);
        let probe = Arc::clone(&self.probe);
        workers.spawn(Self::worker(id, ctx, probe));
    }

    async fn worker(id: usize, ctx: Arc<PipelineContext>, probe: Arc<dyn BucketProbe>) {
        let cancel = ctx.cancel_token().clone();

        while let Some(candidate) = ctx.candidates.get(&cancel).await {
            if Self::check(&ctx, probe.as_ref(), &candidate).await == CheckOutcome::Cancelled {
                break;
            }
        }

        debug!("Probe worker {} stopped", id);
    }

    /// Probe one candidate, log the result and update counters
    pub async fn check(
        ctx: &PipelineContext,
        probe: &dyn BucketProbe,
        candidate: &ProbeCandidate,
    ) -> CheckOutcome {
        let result = tokio::select! {
            _ = ctx.cancel_token().cancelled() => return CheckOutcome::Cancelled,
            result = probe.probe(candidate.as_str()) => result,
        };

        let outcome = match result {
            Ok(findings) if !findings.is_empty() => {
                ctx.stats.increment_found();
                info!("{}", success_line(candidate, &findings));
                CheckOutcome::Found(findings)
            }
            Ok(_) => {
                debug!("No bucket for {}", candidate);
                CheckOutcome::NotFound
            }
            Err(e) => {
                ctx.stats.increment_probe_errors();
                warn!("{}", e);
                CheckOutcome::Failed
            }
        };

        ctx.stats.increment_checked();
        outcome
    }
}

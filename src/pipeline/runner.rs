// Pipeline Runner - Wires the four stages and the reporter together
//
// ingestor -> events -> normalizer -> domains -> feeder -> candidates -> checker

use super::checker::BucketChecker;
use super::context::PipelineContext;
use super::feeder::PermutationFeeder;
use super::ingestor::StreamIngestor;
use super::normalizer::DomainNormalizer;
use super::probe::BucketProbe;
use super::reporter::{self, MetricsReporter};
use super::suffix::SuffixResolver;
use super::transport::TransportEvent;
use crate::config::PipelineConfig;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info};

/// A configured pipeline, ready to consume a certificate stream
pub struct Pipeline {
    config: PipelineConfig,
    ctx: Arc<PipelineContext>,
    resolver: Arc<dyn SuffixResolver>,
    probe: Arc<dyn BucketProbe>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        resolver: Arc<dyn SuffixResolver>,
        probe: Arc<dyn BucketProbe>,
    ) -> Self {
        let ctx = Arc::new(PipelineContext::with_queue_capacity(config.queue_capacity));
        Self {
            config,
            ctx,
            resolver,
            probe,
        }
    }

    /// Shared context, for shutdown and inspection
    pub fn context(&self) -> Arc<PipelineContext> {
        Arc::clone(&self.ctx)
    }

    /// Run every stage until the context is cancelled.
    ///
    /// The ingestor stopping on its own (transport gone) does not stop the
    /// other stages; they keep draining until shutdown.
    pub async fn run(self, events: mpsc::Receiver<TransportEvent>) {
        let mut stages = JoinSet::new();

        stages.spawn(StreamIngestor::new(self.context()).run(events));
        stages.spawn(DomainNormalizer::new(self.context(), Arc::clone(&self.resolver)).run());
        stages.spawn(PermutationFeeder::new(self.context()).run());
        stages.spawn(
            BucketChecker::new(
                self.context(),
                Arc::clone(&self.probe),
                self.config.probe_concurrency,
            )
            .run(),
        );

        if let Some(interval) = self.config.report_interval() {
            stages.spawn(MetricsReporter::new(self.context(), interval).run());
        }

        while let Some(result) = stages.join_next().await {
            if let Err(e) = result {
                error!("Pipeline stage failed: {}", e);
            }
        }

        reporter::log_final(&self.ctx.snapshot(), self.ctx.stats.get_probe_rate());
        info!("Pipeline stopped");
    }

    /// Run until Ctrl-C
    pub async fn run_until_signal(self, events: mpsc::Receiver<TransportEvent>) {
        let ctx = self.context();
        tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("Shutdown signal received");
            ctx.shutdown();
        });

        self.run(events).await;
    }
}

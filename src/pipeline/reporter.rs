// Metrics Reporter - Periodic queue depth / counter logging

use super::context::PipelineContext;
use super::stats::Stats;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Default reporting cadence
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);

pub struct MetricsReporter {
    ctx: Arc<PipelineContext>,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(ctx: Arc<PipelineContext>, interval: Duration) -> Self {
        Self { ctx, interval }
    }

    pub async fn run(self) {
        let cancel = self.ctx.cancel_token().clone();
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => log_snapshot(&self.ctx.snapshot()),
            }
        }
    }
}

/// Log queue depths and counters
pub fn log_snapshot(stats: &Stats) {
    info!("events queue size: {}", stats.event_queue);
    info!("domains queue size: {}", stats.domain_queue);
    info!("candidates queue size: {}", stats.probe_queue);
    info!(
        "Checked: {} Found: {} Probe errors: {} Dropped: {}",
        stats.checked, stats.found, stats.probe_errors, stats.dropped
    );
}

/// Log the full statistics block once, at shutdown
pub fn log_final(stats: &Stats, probe_rate: f64) {
    info!("=== Pipeline Statistics ===");
    info!("Ingested:           {}", stats.ingested);
    info!("Decode errors:      {}", stats.decode_errors);
    info!("Rejected:           {}", stats.rejected);
    info!("Internationalized:  {}", stats.internationalized);
    info!("IDNA errors:        {}", stats.idna_errors);
    info!("Unresolved:         {}", stats.unresolved);
    info!("Normalized:         {}", stats.normalized);
    info!("Candidates:         {}", stats.candidates);
    info!("Checked:            {}", stats.checked);
    info!("Found:              {}", stats.found);
    info!("Probe errors:       {}", stats.probe_errors);
    info!("Dropped:            {}", stats.dropped);
    info!("Probe rate:         {:.2} probes/sec", probe_rate);
    info!("Uptime:             {} seconds", stats.uptime_secs);
}

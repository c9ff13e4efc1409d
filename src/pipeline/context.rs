// Pipeline Context - State shared by every stage
//
// Built once per run and handed to each stage behind an Arc.

use super::queue::Queue;
use super::stats::{Stats, StatsTracker};
use super::types::{DomainRecord, ProbeCandidate, RawEvent};
use tokio_util::sync::CancellationToken;

/// Queues, counters and the shutdown signal for one pipeline run
pub struct PipelineContext {
    /// Ingestor -> normalizer
    pub events: Queue<RawEvent>,
    /// Normalizer -> feeder
    pub domains: Queue<DomainRecord>,
    /// Feeder -> checker
    pub candidates: Queue<ProbeCandidate>,
    pub stats: StatsTracker,
    cancel: CancellationToken,
}

impl PipelineContext {
    /// Create a context with unbounded queues
    pub fn new() -> Self {
        Self::with_queue_capacity(0)
    }

    /// Create a context whose queues are soft-capped at `capacity` (0 = unbounded)
    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            events: Queue::with_capacity("events", capacity),
            domains: Queue::with_capacity("domains", capacity),
            candidates: Queue::with_capacity("candidates", capacity),
            stats: StatsTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Token observed at every blocking point
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Ask every stage to stop
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Counters plus current queue depths
    pub fn snapshot(&self) -> Stats {
        let mut stats = self.stats.get_snapshot();
        stats.event_queue = self.events.len();
        stats.domain_queue = self.domains.len();
        stats.probe_queue = self.candidates.len();
        stats.dropped = self.events.dropped() + self.domains.dropped() + self.candidates.dropped();
        stats
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}

// Pipeline Statistics Tracker
//
// Lock-free counters shared by every stage, plus a serializable snapshot

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Point-in-time view of pipeline statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Hostnames pushed by the ingestor
    pub ingested: u64,
    /// Stream messages that failed to decode
    pub decode_errors: u64,
    /// Hostnames rejected by the noise filters
    pub rejected: u64,
    /// Internationalized hostnames discarded
    pub internationalized: u64,
    /// Non-ASCII hostnames IDNA could not convert
    pub idna_errors: u64,
    /// Hostnames without a registrable domain
    pub unresolved: u64,
    /// Domain records produced
    pub normalized: u64,
    /// Probe candidates produced
    pub candidates: u64,
    /// Candidates probed (success or not)
    pub checked: u64,
    /// Candidates with at least one positive finding
    pub found: u64,
    /// Probes that ended in an error
    pub probe_errors: u64,
    /// Current depth of the event queue
    pub event_queue: usize,
    /// Current depth of the domain queue
    pub domain_queue: usize,
    /// Current depth of the probe queue
    pub probe_queue: usize,
    /// Elements dropped across all queues
    pub dropped: u64,
    /// Seconds since the tracker was created
    pub uptime_secs: u64,
}

#[derive(Default)]
struct Counters {
    ingested: AtomicU64,
    decode_errors: AtomicU64,
    rejected: AtomicU64,
    internationalized: AtomicU64,
    idna_errors: AtomicU64,
    unresolved: AtomicU64,
    normalized: AtomicU64,
    candidates: AtomicU64,
    checked: AtomicU64,
    found: AtomicU64,
    probe_errors: AtomicU64,
}

/// Thread-safe statistics tracker
#[derive(Clone)]
pub struct StatsTracker {
    counters: Arc<Counters>,
    start_time: Instant,
}

impl StatsTracker {
    /// Create a new statistics tracker
    pub fn new() -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            start_time: Instant::now(),
        }
    }

    pub fn increment_ingested(&self) {
        self.counters.ingested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_decode_errors(&self) {
        self.counters.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.counters.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_internationalized(&self) {
        self.counters.internationalized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_idna_errors(&self) {
        self.counters.idna_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_unresolved(&self) {
        self.counters.unresolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_normalized(&self) {
        self.counters.normalized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_candidates(&self) {
        self.counters.candidates.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one finished probe. Returns the new total.
    pub fn increment_checked(&self) -> u64 {
        self.counters.checked.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn increment_found(&self) {
        self.counters.found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_probe_errors(&self) {
        self.counters.probe_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Candidates probed so far
    pub fn checked(&self) -> u64 {
        self.counters.checked.load(Ordering::Relaxed)
    }

    /// Candidates with a positive finding so far
    pub fn found(&self) -> u64 {
        self.counters.found.load(Ordering::Relaxed)
    }

    /// Snapshot of the counters. Queue depths are left at zero; the pipeline
    /// context fills them in.
    pub fn get_snapshot(&self) -> Stats {
        let c = &self.counters;
        Stats {
            ingested: c.ingested.load(Ordering::Relaxed),
            decode_errors: c.decode_errors.load(Ordering::Relaxed),
            rejected: c.rejected.load(Ordering::Relaxed),
            internationalized: c.internationalized.load(Ordering::Relaxed),
            idna_errors: c.idna_errors.load(Ordering::Relaxed),
            unresolved: c.unresolved.load(Ordering::Relaxed),
            normalized: c.normalized.load(Ordering::Relaxed),
            candidates: c.candidates.load(Ordering::Relaxed),
            checked: c.checked.load(Ordering::Relaxed),
            found: c.found.load(Ordering::Relaxed),
            probe_errors: c.probe_errors.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
            ..Default::default()
        }
    }

    /// Probes completed per second since start
    pub fn get_probe_rate(&self) -> f64 {
        let elapsed_secs = self.start_time.elapsed().as_secs_f64();
        if elapsed_secs > 0.0 {
            self.checked() as f64 / elapsed_secs
        } else {
            0.0
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

// Stage Queue - Typed FIFO handing elements between pipeline stages
//
// Producers never block. Consumers suspend on an empty queue until an element
// arrives or the pipeline is cancelled.

use super::Result;
use crate::error::PipelineError;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Outcome of a `put`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// Element was appended
    Queued,
    /// Soft cap reached, element was discarded
    Dropped,
}

impl PutOutcome {
    pub fn is_dropped(self) -> bool {
        self == PutOutcome::Dropped
    }
}

/// Unbounded (optionally soft-capped) multi-producer multi-consumer FIFO
pub struct Queue<T> {
    name: &'static str,
    items: Mutex<VecDeque<T>>,
    available: Notify,
    /// 0 means unbounded
    capacity: usize,
    dropped: AtomicU64,
}

impl<T> Queue<T> {
    /// Create an unbounded queue
    pub fn new(name: &'static str) -> Self {
        Self::with_capacity(name, 0)
    }

    /// Create a queue that discards new elements once `capacity` are buffered.
    /// A capacity of 0 leaves the queue unbounded.
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    /// Queue name used in logs and errors
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Append an element. Never blocks.
    pub fn put(&self, item: T) -> PutOutcome {
        {
            let mut items = self.lock();
            if self.capacity > 0 && items.len() >= self.capacity {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return PutOutcome::Dropped;
            }
            items.push_back(item);
        }
        self.available.notify_one();
        PutOutcome::Queued
    }

    /// Pop the oldest element without waiting
    pub fn try_get(&self) -> Result<T> {
        self.lock()
            .pop_front()
            .ok_or(PipelineError::QueueEmpty { queue: self.name })
    }

    /// Wait for the oldest element.
    ///
    /// Returns `None` once `cancel` fires; elements still buffered at that
    /// point stay in the queue.
    pub async fn get(&self, cancel: &CancellationToken) -> Option<T> {
        loop {
            if let Some(item) = self.lock().pop_front() {
                return Some(item);
            }

            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register interest before re-checking so a put between the
            // check and the await is not missed.
            notified.as_mut().enable();

            if let Some(item) = self.lock().pop_front() {
                return Some(item);
            }

            tokio::select! {
                _ = cancel.cancelled() => return None,
                _ = &mut notified => {}
            }
        }
    }

    /// Wait at most `timeout` for an element
    pub async fn get_timeout(&self, timeout: Duration) -> Result<T> {
        let cancel = CancellationToken::new();
        match tokio::time::timeout(timeout, self.get(&cancel)).await {
            Ok(Some(item)) => Ok(item),
            _ => Err(PipelineError::QueueEmpty { queue: self.name }),
        }
    }

    /// Number of buffered elements
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements discarded because the soft cap was reached
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<T>> {
        // A poisoned lock only means another holder panicked mid-push/pop;
        // the deque itself is still consistent.
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

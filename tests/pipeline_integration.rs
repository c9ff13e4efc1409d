// Copyright (c) 2025 Marc Rivero López
// Licensed under GPLv3. See LICENSE file for details.

//! Pipeline Integration Tests
//!
//! Drives the full four-stage pipeline from raw certstream messages to the
//! bucket probe. The transport is replaced by a channel and the probe by a
//! recorder, everything else is the real code.

use async_trait::async_trait;
use certbucket::pipeline::{
    BucketProbe, Finding, Pipeline, PipelineContext, SuffixDatabase, TransportEvent,
};
use certbucket::PipelineConfig;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Level;
use tracing::subscriber::DefaultGuard;

const LIST: &str = "// ===BEGIN ICANN DOMAINS===\ncom\norg\nio\nuk\nco.uk\n// ===END ICANN DOMAINS===\n";

/// Records every candidate and tracks how many probes overlap
#[derive(Default)]
struct RecordingProbe {
    seen: Mutex<Vec<String>>,
    positive: Vec<&'static str>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingProbe {
    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl BucketProbe for RecordingProbe {
    async fn probe(&self, candidate: &str) -> certbucket::pipeline::Result<Vec<Finding>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.seen.lock().unwrap().push(candidate.to_string());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.positive.iter().any(|p| *p == candidate) {
            Ok(vec![Finding::Public])
        } else {
            Ok(Vec::new())
        }
    }
}

fn cert_message(cn: &str) -> TransportEvent {
    TransportEvent::Message(
        serde_json::json!({
            "message_type": "certificate_update",
            "data": { "leaf_cert": { "subject": { "CN": cn } } }
        })
        .to_string(),
    )
}

/// Log lines written by the pipeline during one test
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Route tracing output into a buffer for the current thread. The test
/// runtime is single threaded, so every stage logs through it.
fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

struct Harness {
    tx: mpsc::Sender<TransportEvent>,
    ctx: Arc<PipelineContext>,
    handle: JoinHandle<()>,
}

fn start(probe: Arc<RecordingProbe>, concurrency: usize) -> Harness {
    let config = PipelineConfig {
        probe_concurrency: concurrency,
        report_interval_secs: 0,
        ..Default::default()
    };
    let resolver = Arc::new(SuffixDatabase::parse(LIST).unwrap());
    let pipeline = Pipeline::new(config, resolver, probe);
    let ctx = pipeline.context();

    let (tx, rx) = mpsc::channel(1024);
    let handle = tokio::spawn(pipeline.run(rx));

    Harness { tx, ctx, handle }
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

async fn stop(harness: Harness) {
    harness.ctx.shutdown();
    tokio::time::timeout(Duration::from_secs(5), harness.handle)
        .await
        .expect("pipeline should stop after shutdown")
        .unwrap();
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn test_subdomain_becomes_registrable_candidate() {
    let probe = Arc::new(RecordingProbe::default());
    let harness = start(Arc::clone(&probe), 1);

    harness.tx.send(cert_message("shop.example.com")).await.unwrap();

    let ctx = Arc::clone(&harness.ctx);
    wait_for(|| ctx.stats.checked() == 1).await;

    assert_eq!(probe.seen(), vec!["example.com"]);
    let stats = ctx.snapshot();
    assert_eq!(stats.ingested, 1);
    assert_eq!(stats.normalized, 1);
    assert_eq!(stats.candidates, 1);

    stop(harness).await;
}

#[tokio::test]
async fn test_filtered_names_never_reach_the_probe() {
    let (logs, _guard) = capture_logs();
    let probe = Arc::new(RecordingProbe::default());
    let harness = start(Arc::clone(&probe), 1);

    for cn in [
        "*.example.com",
        "xn--something.com",
        "café.example.com",
        "edge.cloudflaressl.com",
        "\u{0300}a.example.com",
    ] {
        harness.tx.send(cert_message(cn)).await.unwrap();
    }
    // Sentinel: once it is probed, everything before it has been handled
    harness.tx.send(cert_message("sentinel.io")).await.unwrap();

    let ctx = Arc::clone(&harness.ctx);
    wait_for(|| ctx.stats.checked() == 1).await;

    assert_eq!(probe.seen(), vec!["sentinel.io"]);
    let stats = ctx.snapshot();
    assert_eq!(stats.ingested, 6);
    assert_eq!(stats.rejected, 3);
    assert_eq!(stats.internationalized, 1);
    assert_eq!(stats.idna_errors, 1);
    assert_eq!(stats.normalized, 1);

    let output = logs.contents();
    assert!(
        output.contains("café.example.com is xn--caf-dma.example.com (punycode)"),
        "missing internationalized name log in:\n{}",
        output
    );

    stop(harness).await;
}

#[tokio::test]
async fn test_positive_finding_is_reported() {
    let (logs, _guard) = capture_logs();
    let probe = Arc::new(RecordingProbe {
        positive: vec!["leaky-bucket.com"],
        ..Default::default()
    });
    let harness = start(Arc::clone(&probe), 1);

    harness.tx.send(cert_message("www.leaky-bucket.com")).await.unwrap();

    let ctx = Arc::clone(&harness.ctx);
    wait_for(|| ctx.stats.checked() >= 1).await;

    assert_eq!(ctx.stats.found(), 1);
    let output = logs.contents();
    let line = output
        .lines()
        .find(|line| line.contains("SUCCESS"))
        .unwrap_or_else(|| panic!("no success line in:\n{}", output));
    assert!(line.contains("leaky-bucket.com [PUBLIC]"));

    stop(harness).await;
}

// ============================================================================
// Ordering, duplicates and concurrency
// ============================================================================

#[tokio::test]
async fn test_single_worker_preserves_order() {
    let probe = Arc::new(RecordingProbe::default());
    let harness = start(Arc::clone(&probe), 1);

    let names = ["a.alpha.com", "b.beta.org", "c.gamma.io", "d.delta.co.uk"];
    for cn in names {
        harness.tx.send(cert_message(cn)).await.unwrap();
    }

    let ctx = Arc::clone(&harness.ctx);
    wait_for(|| ctx.stats.checked() == 4).await;

    assert_eq!(
        probe.seen(),
        vec!["alpha.com", "beta.org", "gamma.io", "delta.co.uk"]
    );

    stop(harness).await;
}

#[tokio::test]
async fn test_duplicates_are_probed_again() {
    let probe = Arc::new(RecordingProbe::default());
    let harness = start(Arc::clone(&probe), 1);

    harness.tx.send(cert_message("shop.example.com")).await.unwrap();
    harness.tx.send(cert_message("shop.example.com")).await.unwrap();

    let ctx = Arc::clone(&harness.ctx);
    wait_for(|| ctx.stats.checked() == 2).await;

    assert_eq!(probe.seen(), vec!["example.com", "example.com"]);

    stop(harness).await;
}

#[tokio::test]
async fn test_probe_concurrency_is_bounded() {
    let probe = Arc::new(RecordingProbe {
        delay: Duration::from_millis(10),
        ..Default::default()
    });
    let harness = start(Arc::clone(&probe), 3);

    for i in 0..50 {
        harness
            .tx
            .send(cert_message(&format!("www.host{}.com", i)))
            .await
            .unwrap();
    }

    let ctx = Arc::clone(&harness.ctx);
    wait_for(|| ctx.stats.checked() == 50).await;

    let max = probe.max_in_flight.load(Ordering::SeqCst);
    assert!(max <= 3, "at most 3 probes may overlap, saw {}", max);
    assert!(max >= 1);
    assert_eq!(probe.seen().len(), 50);

    stop(harness).await;
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_shutdown_with_open_transport() {
    let probe = Arc::new(RecordingProbe::default());
    let harness = start(probe, 2);

    // Sender is still alive, so only cancellation can end the run
    assert!(!harness.ctx.is_shutdown());
    stop(harness).await;
}

#[tokio::test]
async fn test_closed_transport_keeps_draining() {
    let probe = Arc::new(RecordingProbe::default());
    let harness = start(Arc::clone(&probe), 1);

    harness.tx.send(cert_message("api.example.io")).await.unwrap();
    let Harness { tx, ctx, handle } = harness;
    drop(tx);

    let stats_ctx = Arc::clone(&ctx);
    wait_for(|| stats_ctx.stats.checked() == 1).await;
    assert!(!handle.is_finished());

    ctx.shutdown();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("pipeline should stop after shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_decode_errors_are_counted_not_fatal() {
    let probe = Arc::new(RecordingProbe::default());
    let harness = start(Arc::clone(&probe), 1);

    harness
        .tx
        .send(TransportEvent::Message("{broken".to_string()))
        .await
        .unwrap();
    harness.tx.send(cert_message("ok.example.org")).await.unwrap();

    let ctx = Arc::clone(&harness.ctx);
    wait_for(|| ctx.stats.checked() == 1).await;

    assert_eq!(ctx.snapshot().decode_errors, 1);
    assert_eq!(probe.seen(), vec!["example.org"]);

    stop(harness).await;
}

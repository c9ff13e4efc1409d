// Stream Ingestor - Pulls subject CNs off the certificate stream
//
// Deliberately minimal: every extracted name goes onto the event queue and
// all filtering happens in the normalizer.

use super::context::PipelineContext;
use super::transport::TransportEvent;
use super::types::RawEvent;
use super::Result;
use crate::error::PipelineError;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Certstream message type carrying a certificate
const CERTIFICATE_UPDATE: &str = "certificate_update";

/// Extract `data.leaf_cert.subject.CN` from a certstream message.
///
/// `Ok(None)` covers the benign cases: heartbeats, other message types and
/// certificates without a CN. Anything malformed is an error.
pub fn extract_common_name(message: &str) -> Result<Option<RawEvent>> {
    let value: Value = serde_json::from_str(message).map_err(|e| PipelineError::Decode {
        message: e.to_string(),
    })?;

    if let Some(kind) = value.get("message_type").and_then(Value::as_str)
        && kind != CERTIFICATE_UPDATE
    {
        return Ok(None);
    }

    match value.pointer("/data/leaf_cert/subject/CN") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(cn)) => Ok(Some(cn.clone())),
        Some(other) => Err(PipelineError::Decode {
            message: format!("subject CN is not a string: {}", other),
        }),
    }
}

/// Ingestor stage
pub struct StreamIngestor {
    ctx: Arc<PipelineContext>,
}

impl StreamIngestor {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Self { ctx }
    }

    /// Consume transport events until the transport closes or the pipeline is cancelled
    pub async fn run(self, mut events: mpsc::Receiver<TransportEvent>) {
        info!("Starting to stream certs....");
        let cancel = self.ctx.cancel_token().clone();

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => event,
            };

            match event {
                Some(event) => self.handle(event),
                None => {
                    warn!("Certificate stream closed");
                    break;
                }
            }
        }

        info!("Stream ingestor stopped");
    }

    pub fn handle(&self, event: TransportEvent) {
        match event {
            TransportEvent::Message(message) => match extract_common_name(&message) {
                Ok(Some(cn)) => {
                    self.ctx.stats.increment_ingested();
                    let events = &self.ctx.events;
                    if events.put(cn).is_dropped() {
                        warn!("{} queue full, dropping certificate", events.name());
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    self.ctx.stats.increment_decode_errors();
                    error!("{}", e);
                }
            },
            TransportEvent::Error(e) => error!("{}", e),
        }
    }
}

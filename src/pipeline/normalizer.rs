// Domain Normalizer - Filters raw CNs and resolves registrable domains
//
// Pops raw hostnames from the event queue and pushes DomainRecords to the
// domain queue. Nothing in this stage is fatal.

use super::context::PipelineContext;
use super::suffix::SuffixResolver;
use super::types::DomainRecord;
use super::Result;
use crate::error::PipelineError;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Issuer pattern seen in CDN wildcard certificates; pure noise for bucket discovery
pub const CDN_NOISE_MARKER: &str = "cloudflaressl";

/// ASCII-compatible encoding prefix of an already punycoded label
pub const ACE_PREFIX: &str = "xn--";

/// Why a hostname was filtered out before resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Empty,
    CdnNoise,
    AcePrefix,
    Wildcard,
    LeadingDot,
}

/// Result of normalizing one raw hostname
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(DomainRecord),
    Rejected(RejectReason),
    /// ASCII form differs from the raw name
    Internationalized { original: String, ascii: String },
    /// No registrable domain below the public suffix
    Unresolved(String),
    /// IDNA conversion failed; the name is discarded
    Unconvertible(String),
}

/// Cheap substring/prefix filters applied before any conversion
pub fn reject_reason(name: &str) -> Option<RejectReason> {
    if name.is_empty() {
        Some(RejectReason::Empty)
    } else if name.contains(CDN_NOISE_MARKER) {
        Some(RejectReason::CdnNoise)
    } else if name.contains(ACE_PREFIX) {
        Some(RejectReason::AcePrefix)
    } else if name.starts_with("*.") {
        Some(RejectReason::Wildcard)
    } else if name.starts_with('.') {
        Some(RejectReason::LeadingDot)
    } else {
        None
    }
}

/// Convert a hostname to its ASCII-compatible form.
///
/// Pure-ASCII names are returned untouched, so only names that actually need
/// IDNA processing can come back different from the input.
pub fn to_ascii(name: &str) -> Result<String> {
    if name.is_ascii() {
        return Ok(name.to_string());
    }

    idna::domain_to_ascii(name).map_err(|e| PipelineError::Idna {
        name: name.to_string(),
        details: format!("{:?}", e),
    })
}

/// Run the full normalization sequence for one hostname
pub fn normalize(raw: &str, resolver: &dyn SuffixResolver) -> Verdict {
    if let Some(reason) = reject_reason(raw) {
        return Verdict::Rejected(reason);
    }

    // A non-ASCII name that cannot be converted has no usable ASCII form
    let ascii = match to_ascii(raw) {
        Ok(ascii) => ascii,
        Err(e) => return Verdict::Unconvertible(e.to_string()),
    };

    if ascii != raw {
        return Verdict::Internationalized {
            original: raw.to_string(),
            ascii,
        };
    }

    match resolver.resolve(&ascii) {
        Some(parts) => Verdict::Accepted(DomainRecord {
            canonical_name: ascii,
            registrable_domain: parts.domain,
            suffix: parts.suffix,
            original_name: raw.to_string(),
        }),
        None => Verdict::Unresolved(ascii),
    }
}

/// Normalizer stage
pub struct DomainNormalizer {
    ctx: Arc<PipelineContext>,
    resolver: Arc<dyn SuffixResolver>,
}

impl DomainNormalizer {
    pub fn new(ctx: Arc<PipelineContext>, resolver: Arc<dyn SuffixResolver>) -> Self {
        Self { ctx, resolver }
    }

    /// Process events until the pipeline is cancelled
    pub async fn run(self) {
        info!("Starting to process queue....");
        let cancel = self.ctx.cancel_token().clone();

        while let Some(raw) = self.ctx.events.get(&cancel).await {
            self.handle(&raw);
        }

        info!("Domain normalizer stopped");
    }

    /// Normalize one hostname and forward it if accepted
    pub fn handle(&self, raw: &str) {
        let stats = &self.ctx.stats;

        match normalize(raw, self.resolver.as_ref()) {
            Verdict::Accepted(record) => {
                stats.increment_normalized();
                let domains = &self.ctx.domains;
                if domains.put(record).is_dropped() {
                    warn!("{} queue full, dropped {}", domains.name(), raw);
                }
            }
            Verdict::Rejected(reason) => {
                stats.increment_rejected();
                debug!("Rejected {:?}: {:?}", raw, reason);
            }
            Verdict::Internationalized { original, ascii } => {
                stats.increment_internationalized();
                info!(
                    "{} is {} (punycode); object storage does not support internationalized bucket names",
                    original, ascii
                );
            }
            Verdict::Unconvertible(message) => {
                stats.increment_idna_errors();
                error!("{}", message);
            }
            Verdict::Unresolved(name) => {
                stats.increment_unresolved();
                debug!("No registrable domain for {}", name);
            }
        }
    }
}

// Permutation Feeder - Turns domain records into bucket-name candidates
//
// Currently emits exactly one candidate per record (`<domain>.<suffix>`).
// This is the place to add prefix/suffix permutation strategies.

use super::context::PipelineContext;
use super::types::{DomainRecord, ProbeCandidate};
use std::sync::Arc;
use tracing::{info, warn};

/// Bucket-name candidates for one domain record
pub fn permutations(record: &DomainRecord) -> Vec<ProbeCandidate> {
    vec![ProbeCandidate::from(record)]
}

/// Feeder stage
pub struct PermutationFeeder {
    ctx: Arc<PipelineContext>,
}

impl PermutationFeeder {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Self { ctx }
    }

    pub async fn run(self) {
        info!("Starting to generate permutations....");
        let cancel = self.ctx.cancel_token().clone();

        while let Some(record) = self.ctx.domains.get(&cancel).await {
            self.handle(&record);
        }

        info!("Permutation feeder stopped");
    }

    pub fn handle(&self, record: &DomainRecord) {
        let candidates = &self.ctx.candidates;
        for candidate in permutations(record) {
            self.ctx.stats.increment_candidates();
            if candidates.put(candidate).is_dropped() {
                warn!(
                    "{} queue full, dropped candidate for {}",
                    candidates.name(),
                    record.canonical_name
                );
            }
        }
    }
}

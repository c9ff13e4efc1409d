// Certificate-to-bucket pipeline
//
// Four stages coupled by typed queues: the ingestor reads subject CNs off the
// certificate stream, the normalizer filters and resolves them, the feeder
// derives bucket-name candidates and the checker probes them with bounded
// concurrency.

pub mod checker;
pub mod context;
pub mod feeder;
pub mod ingestor;
pub mod normalizer;
pub mod probe;
pub mod queue;
pub mod reporter;
pub mod runner;
pub mod stats;
pub mod suffix;
pub mod transport;
pub mod types;

pub use checker::BucketChecker;
pub use context::PipelineContext;
pub use feeder::PermutationFeeder;
pub use ingestor::StreamIngestor;
pub use normalizer::DomainNormalizer;
pub use probe::{BucketProbe, Finding, S3Probe};
pub use queue::Queue;
pub use reporter::MetricsReporter;
pub use runner::Pipeline;
pub use stats::{Stats, StatsTracker};
pub use suffix::{DomainParts, SuffixDatabase, SuffixResolver};
pub use transport::{CertstreamClient, TransportEvent};
pub use types::{DomainRecord, ProbeCandidate, RawEvent};

use crate::error::PipelineError;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

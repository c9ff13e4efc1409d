// Pipeline Configuration
//
// Loaded from TOML; every field has a default so a partial file is valid.

use crate::error::PipelineError;
use crate::pipeline::probe::{DEFAULT_PROBE_TIMEOUT, DEFAULT_S3_ENDPOINT};
use crate::pipeline::reporter::DEFAULT_REPORT_INTERVAL;
use crate::pipeline::transport::{DEFAULT_RECONNECT_DELAY, DEFAULT_STREAM_URL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the Public Suffix List
pub const DEFAULT_SUFFIX_LIST_PATH: &str = "./public_suffix_list.dat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Certstream websocket URL
    pub stream_url: String,

    /// Seconds to wait before reconnecting to the stream
    pub reconnect_delay_secs: u64,

    /// Public Suffix List file, loaded once at startup
    pub suffix_list_path: PathBuf,

    /// Soft cap per queue (0 = unbounded)
    pub queue_capacity: usize,

    /// Simultaneous outbound probes
    pub probe_concurrency: usize,

    /// Metrics cadence in seconds (0 disables the reporter)
    pub report_interval_secs: u64,

    /// S3-compatible endpoint probed with path-style requests
    pub probe_endpoint: String,

    /// Per-probe timeout in seconds
    pub probe_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stream_url: DEFAULT_STREAM_URL.to_string(),
            reconnect_delay_secs: DEFAULT_RECONNECT_DELAY.as_secs(),
            suffix_list_path: PathBuf::from(DEFAULT_SUFFIX_LIST_PATH),
            queue_capacity: 0,
            probe_concurrency: 1,
            report_interval_secs: DEFAULT_REPORT_INTERVAL.as_secs(),
            probe_endpoint: DEFAULT_S3_ENDPOINT.to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
        }
    }
}

impl PipelineConfig {
    /// Create config from file
    pub fn from_file(path: &str) -> Result<Self, PipelineError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| PipelineError::FileSystemError {
                path: path.to_string(),
                source,
            })?;
        let config: PipelineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Create example config file
    pub fn create_example(path: &str) -> Result<(), PipelineError> {
        let config = Self::default();
        let toml = toml::to_string_pretty(&config)?;
        std::fs::write(path, toml).map_err(|source| PipelineError::FileSystemError {
            path: path.to_string(),
            source,
        })?;
        Ok(())
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.probe_concurrency == 0 {
            return Err(PipelineError::ConfigError {
                message: "probe_concurrency must be at least 1".to_string(),
            });
        }

        if self.probe_timeout_secs == 0 {
            return Err(PipelineError::ConfigError {
                message: "probe_timeout_secs must be at least 1".to_string(),
            });
        }

        let stream = url::Url::parse(&self.stream_url)?;
        if !matches!(stream.scheme(), "ws" | "wss") {
            return Err(PipelineError::ConfigError {
                message: format!("stream_url must be ws:// or wss://, got {}", self.stream_url),
            });
        }

        let endpoint = url::Url::parse(&self.probe_endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(PipelineError::ConfigError {
                message: format!(
                    "probe_endpoint must be http:// or https://, got {}",
                    self.probe_endpoint
                ),
            });
        }

        Ok(())
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// `None` when the reporter is disabled
    pub fn report_interval(&self) -> Option<Duration> {
        (self.report_interval_secs > 0).then(|| Duration::from_secs(self.report_interval_secs))
    }
}

// Certstream pipeline arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use clap::Args;
use std::path::PathBuf;

/// Certificate stream to bucket probe pipeline options
///
/// Every flag overrides the matching field of the TOML configuration file
/// (or the built-in default when no file is given).
#[derive(Args, Debug, Clone, Default)]
pub struct CertstreamArgs {
    /// Pipeline configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write an example configuration file and exit
    #[arg(long = "config-example", value_name = "FILE")]
    pub config_example: Option<PathBuf>,

    /// Certstream websocket URL
    #[arg(long = "stream-url", value_name = "URL")]
    pub stream_url: Option<String>,

    /// Public Suffix List file
    #[arg(long = "suffix-list", value_name = "FILE")]
    pub suffix_list: Option<PathBuf>,

    /// Soft cap per queue, 0 for unbounded
    #[arg(long = "queue-capacity", value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Simultaneous bucket probes
    #[arg(short = 'n', long = "probe-concurrency", value_name = "N")]
    pub probe_concurrency: Option<usize>,

    /// Metrics interval in seconds, 0 to disable
    #[arg(long = "report-interval", value_name = "SECONDS")]
    pub report_interval: Option<u64>,

    /// S3-compatible endpoint to probe
    #[arg(long = "probe-endpoint", value_name = "URL")]
    pub probe_endpoint: Option<String>,

    /// Per-probe timeout in seconds
    #[arg(long = "probe-timeout", value_name = "SECONDS")]
    pub probe_timeout: Option<u64>,
}

impl CertstreamArgs {
    /// Resolve the effective configuration: file (or defaults), then flags
    pub fn to_config(&self) -> Result<PipelineConfig, PipelineError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(&path.to_string_lossy())?,
            None => PipelineConfig::default(),
        };

        if let Some(url) = &self.stream_url {
            config.stream_url = url.clone();
        }
        if let Some(path) = &self.suffix_list {
            config.suffix_list_path = path.clone();
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(n) = self.probe_concurrency {
            config.probe_concurrency = n;
        }
        if let Some(secs) = self.report_interval {
            config.report_interval_secs = secs;
        }
        if let Some(endpoint) = &self.probe_endpoint {
            config.probe_endpoint = endpoint.clone();
        }
        if let Some(secs) = self.probe_timeout {
            config.probe_timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

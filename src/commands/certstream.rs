// CertstreamCommand - Certificate stream to bucket probe pipeline
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::cli::CertstreamArgs;
use crate::config::PipelineConfig;
use crate::pipeline::{CertstreamClient, Pipeline, S3Probe, SuffixDatabase};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// CertstreamCommand runs the pipeline against the live certificate stream
///
/// This command is responsible for:
/// - Resolving the configuration from file and flags
/// - Loading the Public Suffix List (fatal if missing)
/// - Connecting the websocket transport and running until Ctrl-C
pub struct CertstreamCommand {
    args: CertstreamArgs,
}

impl CertstreamCommand {
    /// Create a new CertstreamCommand with the given arguments
    pub fn new(args: CertstreamArgs) -> Self {
        Self { args }
    }
}

#[async_trait]
impl Command for CertstreamCommand {
    async fn execute(&self) -> Result<()> {
        if let Some(path) = &self.args.config_example {
            let path = path.to_string_lossy();
            PipelineConfig::create_example(&path)?;
            info!("Example configuration written to {}", path);
            return Ok(());
        }

        let config = self.args.to_config()?;

        let suffixes = SuffixDatabase::load(&config.suffix_list_path)?;
        let probe = S3Probe::new(&config.probe_endpoint, config.probe_timeout())?;

        info!(
            "Probing {} with {} concurrent request(s)",
            config.probe_endpoint, config.probe_concurrency
        );

        let client = CertstreamClient::new(config.stream_url.clone(), config.reconnect_delay());
        let pipeline = Pipeline::new(config, Arc::new(suffixes), Arc::new(probe));
        let events = client.spawn(pipeline.context().cancel_token().clone());

        pipeline.run_until_signal(events).await;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "CertstreamCommand"
    }
}

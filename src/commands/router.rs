// CommandRouter - Routes CLI arguments to appropriate Command
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::{CertstreamCommand, Command, IdleCommand};
use crate::cli::Commands;
use crate::{Args, PipelineError, Result};

/// CommandRouter determines which Command to execute based on CLI arguments
///
/// Routing follows the subcommand; with no subcommand the idle command
/// prints a hint and exits.
pub struct CommandRouter;

impl CommandRouter {
    /// Route CLI arguments to the appropriate Command
    pub fn route(args: Args) -> Result<Box<dyn Command>> {
        Self::validate_routing(&args)?;

        match args.command {
            Some(Commands::Certstream(cs)) => Ok(Box::new(CertstreamCommand::new(cs))),
            None => Ok(Box::new(IdleCommand)),
        }
    }

    /// Check if the given arguments represent a valid command configuration
    pub fn validate_routing(args: &Args) -> Result<()> {
        if let Some(Commands::Certstream(cs)) = &args.command {
            if cs.probe_concurrency == Some(0) {
                return Err(PipelineError::InvalidInput {
                    message: "--probe-concurrency must be at least 1".to_string(),
                }
                .into());
            }

            if cs.probe_timeout == Some(0) {
                return Err(PipelineError::InvalidInput {
                    message: "--probe-timeout must be at least 1 second".to_string(),
                }
                .into());
            }

            if cs.config_example.is_some() && cs.config.is_some() {
                return Err(PipelineError::InvalidInput {
                    message: "Cannot use --config-example with --config".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

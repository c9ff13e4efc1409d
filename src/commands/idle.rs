// IdleCommand - Runs when no subcommand was given
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::Result;
use async_trait::async_trait;
use tracing::info;

/// Points the user at `--help` and exits successfully
pub struct IdleCommand;

#[async_trait]
impl Command for IdleCommand {
    async fn execute(&self) -> Result<()> {
        info!("No mode selected. Check help: certbucket --help");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "IdleCommand"
    }
}

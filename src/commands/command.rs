// Command trait - Defines the interface for all command implementations
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use async_trait::async_trait;

/// Command trait - Defines the interface for all command implementations
///
/// Each operational mode of certbucket is a command object that checks its
/// own preconditions and runs to completion (or until interrupted).
#[async_trait]
pub trait Command: Send + Sync {
    /// Execute the command asynchronously
    ///
    /// # Errors
    /// Startup failures (bad configuration, unreadable suffix list) are
    /// returned; failures while the pipeline runs are logged and counted.
    async fn execute(&self) -> Result<()>;

    /// Get a human-readable name for this command (for logging/debugging)
    fn name(&self) -> &'static str;
}

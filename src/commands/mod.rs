// Commands module - Command Pattern implementation
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

mod command;
mod router;

// Individual command implementations
mod certstream;
mod idle;

pub use command::Command;
pub use router::CommandRouter;

// Re-export individual commands for testing purposes
pub use certstream::CertstreamCommand;
pub use idle::IdleCommand;

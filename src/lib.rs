// certbucket - Finds exposed object-storage buckets from the certificate stream
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

//! certbucket watches the public certificate stream, reduces every subject
//! name to its registrable domain and probes object storage for a bucket of
//! the same name.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use crate::cli::Args;
pub use crate::config::PipelineConfig;
pub use crate::error::PipelineError;
pub use crate::pipeline::Pipeline;

/// Result type for certbucket operations
pub type Result<T> = anyhow::Result<T>;

/// Error type for certbucket operations
pub use anyhow::Error;

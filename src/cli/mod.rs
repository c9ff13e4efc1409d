// CLI module - Command line interface and argument parsing
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::{Parser, Subcommand};

mod certstream_args;

pub use certstream_args::CertstreamArgs;

/// certbucket - find exposed storage buckets from newly issued certificates
///
/// Without a subcommand nothing runs; use `certstream` to start the pipeline.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "certbucket", author, version)]
#[command(about = "Finds exposed object-storage buckets from the certificate stream", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Operational modes
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Use the certificate stream to find buckets in real time
    Certstream(CertstreamArgs),
}

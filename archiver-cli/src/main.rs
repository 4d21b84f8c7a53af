//! Binary crate for the weather archiver.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Wiring configuration into the core pipeline
//! - Human-friendly output formatting

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}

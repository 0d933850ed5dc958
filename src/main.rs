//! Command-line entry point for the points-to-questions pipeline.

mod cli;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}

use std::path::{Path, PathBuf};

use clap::Parser;
use p2q::domain::segment_non_empty;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Segment a summary file into ordered points")]
pub struct Segment {
    /// The summary file to segment
    input: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "list")]
    format: OutputFormat,

    /// Suppress the trailing count line
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    List,
    Json,
}

impl Segment {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, _root: &Path) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.input).map_err(|e| {
            anyhow::anyhow!("Failed to read summary file {}: {e}", self.input.display())
        })?;

        let points = segment_non_empty(&content)?;

        match self.format {
            OutputFormat::List => {
                for point in &points {
                    println!("{}. {}", point.ordinal(), point.text());
                }
                if !self.quiet {
                    println!("\n{}", format!("{} points", points.len()).dim());
                }
            }
            OutputFormat::Json => {
                use serde_json::json;

                let output: Vec<_> = points
                    .iter()
                    .map(|point| {
                        json!({
                            "ordinal": point.ordinal().get(),
                            "text": point.text(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }

        Ok(())
    }
}

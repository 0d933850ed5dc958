use std::path::{Path, PathBuf};

use clap::Parser;
use p2q::{ComparisonTable, Config, RunStore};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Merge runs into a side-by-side comparison table")]
pub struct Compare {
    /// The runs to compare, primary first (all discovered runs when omitted)
    runs: Vec<String>,

    /// Write the table to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "markdown")]
    format: TableFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum TableFormat {
    #[default]
    Markdown,
    Html,
    Json,
}

impl Compare {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, root: &Path, config: &Config) -> anyhow::Result<()> {
        let store = RunStore::new(root);

        let mut names = if self.runs.is_empty() {
            store.discover_runs()
        } else {
            self.runs.clone()
        };
        if names.is_empty() {
            anyhow::bail!("no runs found in {}", root.display());
        }

        // The configured primary run anchors row order, so it goes first.
        if let Some(primary) = &config.primary_run {
            if let Some(position) = names.iter().position(|name| name == primary) {
                let primary = names.remove(position);
                names.insert(0, primary);
            }
        }

        let mut runs = names.iter().map(|name| store.load_run(name));
        let primary = runs.next().expect("names is non-empty")?;
        let mut table = ComparisonTable::new(primary.into());
        for run in runs {
            table.add_run(run?.into());
        }

        let rendered = match self.format {
            TableFormat::Markdown => table.to_markdown(),
            TableFormat::Html => table.to_html(),
            TableFormat::Json => {
                use serde_json::json;

                let names = table.run_names();
                let rows: Vec<_> = table
                    .rows()
                    .into_iter()
                    .map(|row| {
                        let cells: Vec<_> = names
                            .iter()
                            .zip(&row.cells)
                            .map(|(name, blocks)| json!({ "run": name, "blocks": blocks }))
                            .collect();
                        json!({
                            "number": row.number,
                            "point": row.point,
                            "cells": cells,
                        })
                    })
                    .collect();
                serde_json::to_string_pretty(&rows)?
            }
        };

        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered).map_err(|e| {
                    anyhow::anyhow!("Failed to write comparison table to {}: {e}", path.display())
                })?;
                eprintln!("{}", format!("Wrote {}", path.display()).dim());
            }
            None => println!("{rendered}"),
        }

        Ok(())
    }
}

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use p2q::domain::segment_non_empty;
use p2q::{ItemLabel, PointToLabelsMap, RunStore};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Rebuild a run's mapping file from its questions file")]
pub struct Map {
    /// The run whose questions file to align
    run: String,

    /// The summary file the questions were generated from
    #[arg(long, short)]
    input: PathBuf,
}

impl Map {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.input).map_err(|e| {
            anyhow::anyhow!("Failed to read summary file {}: {e}", self.input.display())
        })?;
        let points = segment_non_empty(&content)?;

        let store = RunStore::new(root);
        let stored = store.load_run(&self.run)?;
        if stored.blocks.is_empty() {
            anyhow::bail!(
                "run '{}' has no question blocks in {}",
                self.run,
                root.display()
            );
        }

        // Question labels carry their point ordinal, so grouping them by
        // ordinal reattaches each block to its source point.
        let mut labels = stored
            .blocks
            .keys()
            .map(|key| {
                key.parse::<ItemLabel>()
                    .with_context(|| format!("question label '{key}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        labels.sort_unstable();

        let mut map = PointToLabelsMap::new();
        for point in &points {
            let matched: Vec<ItemLabel> = labels
                .iter()
                .copied()
                .filter(|label| label.ordinal() == point.ordinal())
                .collect();
            if !matched.is_empty() {
                map.push(point.text().to_string(), matched);
            }
        }

        store.save_mapping(&self.run, &map)?;

        let orphaned = labels
            .iter()
            .filter(|label| label.ordinal().get() > points.len())
            .count();
        if orphaned > 0 {
            eprintln!(
                "{}",
                format!("{orphaned} label(s) point past the last segmented point").warning()
            );
        }

        println!(
            "Mapped {} of {} points for run '{}'",
            map.len(),
            points.len(),
            self.run
        );

        Ok(())
    }
}

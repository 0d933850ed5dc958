use std::path::Path;

use clap::Parser;
use p2q::domain::{compare_answers, validate_blocks};
use p2q::{Config, RunStore, ValidationReport};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check runs for malformed question blocks")]
pub struct Validate {
    /// The runs to validate (all discovered runs when omitted)
    runs: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    format: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Validate {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, root: &Path, config: &Config) -> anyhow::Result<()> {
        let store = RunStore::new(root);

        let names = if self.runs.is_empty() {
            store.discover_runs()
        } else {
            self.runs.clone()
        };
        if names.is_empty() {
            anyhow::bail!("no runs found in {}", root.display());
        }

        let mut loaded = Vec::with_capacity(names.len());
        for name in &names {
            loaded.push(store.load_run(name)?);
        }

        let reports: Vec<_> = loaded
            .iter()
            .map(|run| validate_blocks(&run.blocks, config.expected_items()))
            .collect();

        // Answer letters should agree across runs covering the same labels.
        let mut disagreements = Vec::new();
        for other in &loaded[1..] {
            for mismatch in compare_answers(&loaded[0].blocks, &other.blocks) {
                disagreements.push(format!("{} vs {}: {mismatch}", loaded[0].name, other.name));
            }
        }

        match self.format {
            OutputFormat::Table => self.output_table(&names, &reports, &disagreements),
            OutputFormat::Json => Self::output_json(&names, &reports, &disagreements)?,
        }

        if reports.iter().any(|report| !report.is_valid()) {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_table(
        &self,
        names: &[String],
        reports: &[ValidationReport],
        disagreements: &[String],
    ) {
        if self.quiet {
            for (name, report) in names.iter().zip(reports) {
                for error in &report.errors {
                    eprintln!("{name}: {error}");
                }
            }
            return;
        }

        for (name, report) in names.iter().zip(reports) {
            println!("{name}: {} blocks checked", report.checked);
            for error in &report.errors {
                println!("  {}", format!("✗ {error}").error());
            }
            for warning in &report.warnings {
                println!("  {}", format!("⚠ {warning}").warning());
            }
            if report.is_valid() && report.warnings.is_empty() {
                println!("  {}", "✓ all checks passed".success());
            }
        }

        if !disagreements.is_empty() {
            println!();
            println!(
                "{}",
                format!(
                    "⚠ {} answer disagreements between runs:",
                    disagreements.len()
                )
                .warning()
            );
            for disagreement in disagreements {
                println!("  • {disagreement}");
            }
        }

        let total_errors: usize = reports.iter().map(|r| r.errors.len()).sum();
        if total_errors > 0 {
            println!(
                "\n{}",
                format!("Summary: {total_errors} errors found").warning()
            );
        }
    }

    fn output_json(
        names: &[String],
        reports: &[ValidationReport],
        disagreements: &[String],
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let runs: Vec<_> = names
            .iter()
            .zip(reports)
            .map(|(name, report)| {
                json!({
                    "run": name,
                    "checked": report.checked,
                    "errors": report.errors,
                    "warnings": report.warnings,
                })
            })
            .collect();

        let output = json!({
            "status": if reports.iter().all(ValidationReport::is_valid) {
                "valid"
            } else {
                "errors_found"
            },
            "runs": runs,
            "answer_disagreements": disagreements,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

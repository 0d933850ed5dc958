use std::path::{Path, PathBuf};

mod compare;
mod map;
mod segment;
mod terminal;
mod validate;

use clap::ArgAction;
use compare::Compare;
use map::Map;
use p2q::LabelMode;
use segment::Segment;
use tracing::instrument;
use validate::Validate;

const CONFIG_FILE: &str = "p2q.toml";

/// Loads the configuration from the root directory, falling back to
/// defaults when no config file exists.
fn load_config(root: &Path) -> anyhow::Result<p2q::Config> {
    let path = root.join(CONFIG_FILE);
    if path.exists() {
        p2q::Config::load(&path).map_err(|e| anyhow::anyhow!("{e}"))
    } else {
        Ok(p2q::Config::default())
    }
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The directory holding run files and configuration
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Segment a summary file into ordered points
    Segment(Segment),

    /// Rebuild a run's mapping file from its questions file
    Map(Map),

    /// Check runs for malformed question blocks
    Validate(Validate),

    /// Merge runs into a side-by-side comparison table
    Compare(Compare),

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Segment(command) => command.run(root)?,
            Self::Map(command) => command.run(root)?,
            Self::Validate(command) => {
                let config = load_config(root)?;
                command.run(root, &config)?;
            }
            Self::Compare(command) => {
                let config = load_config(root)?;
                command.run(root, &config)?;
            }
            Self::Config(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Config {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);

        match self.command {
            ConfigCommand::Show => {
                let config = load_config(root)?;

                println!("Configuration:");
                println!("  expected_items: {}", config.expected_items());
                println!(
                    "  label_mode: {}",
                    match config.label_mode {
                        LabelMode::Single => "single",
                        LabelMode::Lettered => "lettered",
                    }
                );
                match &config.primary_run {
                    Some(primary) => println!("  primary_run: {primary}"),
                    None => println!("  primary_run: (first run given)"),
                }
            }
            ConfigCommand::Set { key, value } => {
                let mut config = load_config(root)?;

                match key.as_str() {
                    "expected_items" => {
                        let count = value
                            .parse::<usize>()
                            .map_err(|_| anyhow::anyhow!("Value must be a positive integer"))?;
                        config.set_expected_items(count);
                    }
                    "label_mode" => {
                        config.label_mode = match value.as_str() {
                            "single" => LabelMode::Single,
                            "lettered" => LabelMode::Lettered,
                            _ => anyhow::bail!("Value must be 'single' or 'lettered'"),
                        };
                    }
                    "primary_run" => {
                        config.primary_run = if value.is_empty() { None } else { Some(value) };
                    }
                    _ => {
                        return Err(anyhow::anyhow!(
                            "Unknown configuration key: '{key}'\nSupported keys: expected_items, \
                             label_mode, primary_run",
                        ));
                    }
                }

                config
                    .save(&config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("Updated {key}");
            }
        }

        Ok(())
    }
}

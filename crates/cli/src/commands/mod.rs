//! CLI commands for the tick-prediction engine.

pub mod replay;
pub mod simulate;

pub use replay::{run_replay, ReplayArgs};
pub use simulate::{run_simulate, SimulateArgs};

use anyhow::Result;
use tick_oracle_core::{AppConfig, ConfigLoader};
use tick_oracle_engine::{ReportFormatter, RunSummary};

/// Loads configuration, falling back to defaults when the file is absent.
fn load_config(path: &str) -> Result<AppConfig> {
    let config = ConfigLoader::load_from(path)?;
    tracing::debug!(?config, "Effective configuration");
    Ok(config)
}

/// Prints a run summary to stdout as text or pretty JSON.
fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", ReportFormatter::format(summary));
    }
    Ok(())
}

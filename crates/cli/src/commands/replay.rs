//! Replay command.
//!
//! Feeds recorded ticks from a CSV file (`timestamp_ms,price,volume` with
//! optional `bid,ask` columns) through a fresh engine.

use anyhow::Result;
use clap::Args;
use tick_oracle_engine::{CsvTickSource, PredictionEngine, PredictionRunner};

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// CSV file of recorded ticks
    #[arg(short, long)]
    pub data: String,

    /// Symbol label (defaults to the configured simulation symbol)
    #[arg(long)]
    pub symbol: Option<String>,

    /// Issue a prediction every N ticks
    #[arg(long)]
    pub predict_every: Option<usize>,

    /// Fixed prediction horizon (defaults to the adaptive horizon)
    #[arg(long)]
    pub horizon_ms: Option<i64>,

    /// Emit the final summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs the replay command.
///
/// # Errors
/// Returns an error if configuration is invalid, the tick file cannot be
/// read, or the run fails.
pub async fn run_replay(args: ReplayArgs) -> Result<()> {
    let mut config = super::load_config(&args.config)?;
    if let Some(every) = args.predict_every {
        config.runner.predict_every = every;
    }
    if args.horizon_ms.is_some() {
        config.runner.horizon_ms = args.horizon_ms;
    }
    let symbol = args.symbol.unwrap_or(config.simulation.symbol);

    let source = CsvTickSource::from_path(symbol.clone(), &args.data)?;
    if source.skipped() > 0 {
        tracing::warn!(skipped = source.skipped(), "Some rows were rejected");
    }
    tracing::info!(
        symbol = %symbol,
        ticks = source.remaining(),
        file = %args.data,
        "Starting replay"
    );

    let engine = PredictionEngine::new(symbol, config.engine)?;
    let summary = PredictionRunner::new(source, engine, config.runner).run().await?;
    super::print_summary(&summary, args.json)
}

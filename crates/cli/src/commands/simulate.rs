//! Simulate command.
//!
//! Drives an engine from a seeded random walk. With `--follow` the engine runs
//! behind an actor and every created or resolved prediction is printed as it
//! happens.

use anyhow::Result;
use clap::Args;
use tick_oracle_core::{AppConfig, EngineEvent, RunnerConfig, TickSource};
use tick_oracle_engine::{
    EngineRegistry, PredictionEngine, PredictionRunner, ReportFormatter, SyntheticTickSource,
};
use tokio::sync::broadcast::error::RecvError;

/// Arguments for the simulate command.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Symbol label for the synthetic feed
    #[arg(long)]
    pub symbol: Option<String>,

    /// Number of ticks to generate
    #[arg(long)]
    pub ticks: Option<usize>,

    /// RNG seed; the same seed replays the same walk
    #[arg(long)]
    pub seed: Option<u64>,

    /// Mean per-tick return (e.g. 0.0001)
    #[arg(long, allow_hyphen_values = true)]
    pub drift: Option<f64>,

    /// Std-dev of per-tick returns (e.g. 0.0008)
    #[arg(long)]
    pub volatility: Option<f64>,

    /// Milliseconds between ticks
    #[arg(long)]
    pub interval_ms: Option<i64>,

    /// Issue a prediction every N ticks
    #[arg(long)]
    pub predict_every: Option<usize>,

    /// Fixed prediction horizon (defaults to the adaptive horizon)
    #[arg(long)]
    pub horizon_ms: Option<i64>,

    /// Print events as predictions are created and resolved
    #[arg(long)]
    pub follow: bool,

    /// Emit the final summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl SimulateArgs {
    /// Overrides configured values with the flags that were given.
    fn apply(&self, config: &mut AppConfig) {
        let sim = &mut config.simulation;
        if let Some(symbol) = &self.symbol {
            sim.symbol.clone_from(symbol);
        }
        if let Some(ticks) = self.ticks {
            sim.ticks = ticks;
        }
        if let Some(seed) = self.seed {
            sim.seed = seed;
        }
        if let Some(drift) = self.drift {
            sim.drift = drift;
        }
        if let Some(volatility) = self.volatility {
            sim.volatility = volatility;
        }
        if let Some(interval) = self.interval_ms {
            sim.tick_interval_ms = interval;
        }

        let runner = &mut config.runner;
        if let Some(every) = self.predict_every {
            runner.predict_every = every;
        }
        if self.horizon_ms.is_some() {
            runner.horizon_ms = self.horizon_ms;
        }
    }
}

/// Runs the simulate command.
///
/// # Errors
/// Returns an error if configuration is invalid or the run fails.
pub async fn run_simulate(args: SimulateArgs) -> Result<()> {
    let mut config = super::load_config(&args.config)?;
    args.apply(&mut config);
    let AppConfig {
        engine: engine_config,
        runner: runner_config,
        simulation: sim,
    } = config;
    let start_ms = chrono::Utc::now().timestamp_millis();

    tracing::info!(
        symbol = %sim.symbol,
        ticks = sim.ticks,
        seed = sim.seed,
        "Starting simulation"
    );

    let source = SyntheticTickSource::new(sim.clone(), start_ms);
    let engine = PredictionEngine::new(sim.symbol.clone(), engine_config)?;

    if args.follow {
        return follow(source, engine, &runner_config).await;
    }

    let summary = PredictionRunner::new(source, engine, runner_config).run().await?;
    super::print_summary(&summary, args.json)
}

async fn follow(
    mut source: SyntheticTickSource,
    engine: PredictionEngine,
    runner: &RunnerConfig,
) -> Result<()> {
    let registry = EngineRegistry::new();
    let handle = registry.spawn(engine).await?;
    let mut events = handle.subscribe();

    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(EngineEvent::PredictionCreated { prediction, .. }) => {
                    println!("+ {}", ReportFormatter::format_prediction(&prediction));
                }
                Ok(EngineEvent::PredictionResolved { prediction, .. }) => {
                    println!("= {}", ReportFormatter::format_prediction(&prediction));
                }
                Ok(EngineEvent::Reset { symbol }) => println!("reset {symbol}"),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Event printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut accepted = 0_usize;
    while let Some(tick) = source.next_tick().await? {
        handle.process_tick(tick).await?;
        accepted += 1;
        if runner.predict_every > 0 && accepted % runner.predict_every == 0 {
            handle.generate_prediction(runner.horizon_ms).await?;
        }
    }

    let stats = handle.stats().await?;
    registry.shutdown_all().await?;
    // The printer ends once every event sender is gone
    drop(handle);
    let _ = printer.await;

    println!(
        "\n{} ticks, {} resolved, accuracy {:.2}%, best streak {}",
        accepted, stats.total_predictions, stats.accuracy, stats.best_streak
    );
    Ok(())
}

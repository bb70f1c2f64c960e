use clap::{Parser, Subcommand};

mod commands;

use commands::{ReplayArgs, SimulateArgs};

#[derive(Parser)]
#[command(name = "tick-oracle")]
#[command(about = "Adaptive short-horizon tick prediction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine against a seeded synthetic random walk
    Simulate(SimulateArgs),
    /// Replay recorded ticks from a CSV file through the engine
    Replay(ReplayArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate(args) => commands::run_simulate(args).await?,
        Commands::Replay(args) => commands::run_replay(args).await?,
    }

    Ok(())
}

//! Adaptive tick-prediction engine.
//!
//! A [`PredictionEngine`] ingests ticks for one symbol, issues short-horizon
//! directional forecasts, resolves them against later ticks, and feeds every
//! outcome back into its [`LearningState`] to retune confidence scaling,
//! forecast horizon, and momentum bias.
//!
//! [`EngineActor`] and [`EngineRegistry`] serialize access for async callers;
//! [`PredictionRunner`] drives an engine from any [`TickSource`](tick_oracle_core::TickSource).

pub mod actor;
pub mod commands;
pub mod engine;
pub mod feed;
pub mod generator;
pub mod handle;
pub mod learning;
pub mod ledger;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod runner;

pub use actor::EngineActor;
pub use commands::EngineCommand;
pub use engine::PredictionEngine;
pub use feed::{CsvTickSource, SyntheticTickSource, VecTickSource};
pub use generator::PredictionGenerator;
pub use handle::EngineHandle;
pub use learning::{LearningState, MultiLevelSummary, Outcome};
pub use ledger::PredictionLedger;
pub use registry::EngineRegistry;
pub use report::ReportFormatter;
pub use runner::{PredictionRunner, RunSummary};

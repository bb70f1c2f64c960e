//! Drives one engine from a tick source.

use crate::engine::PredictionEngine;
use crate::learning::LearningState;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tick_oracle_core::{Prediction, PredictionStats, RunnerConfig, TickSource};

/// Outcome of a complete run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub symbol: String,
    pub ticks_processed: u64,
    pub ticks_dropped: u64,
    pub predictions_made: u64,
    pub predictions_resolved: u64,
    /// Predictions still waiting for a tick past their expiry
    pub pending_at_end: usize,
    pub first_tick_ms: Option<i64>,
    pub last_tick_ms: Option<i64>,
    pub first_price: Option<f64>,
    pub last_price: Option<f64>,
    pub stats: PredictionStats,
    pub final_state: LearningState,
    /// Most recent predictions, newest first
    pub recent: Vec<Prediction>,
}

/// Number of recent predictions kept in a [`RunSummary`].
pub const SUMMARY_RECENT: usize = 10;

pub struct PredictionRunner<S>
where
    S: TickSource,
{
    source: S,
    engine: PredictionEngine,
    config: RunnerConfig,
}

impl<S> PredictionRunner<S>
where
    S: TickSource,
{
    /// Creates a runner that feeds `source` into `engine`.
    ///
    /// # Arguments
    ///
    /// * `source` - Tick feed, consumed until exhausted
    /// * `engine` - Engine owned by the runner for the whole run
    /// * `config` - Prediction cadence and optional fixed horizon
    ///
    /// # Returns
    /// A new `PredictionRunner`; call [`Self::run`] to start feeding ticks.
    #[must_use]
    pub const fn new(source: S, engine: PredictionEngine, config: RunnerConfig) -> Self {
        Self {
            source,
            engine,
            config,
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &PredictionEngine {
        &self.engine
    }

    /// Feeds every tick from the source into the engine, issuing a
    /// prediction after every `predict_every` accepted ticks.
    ///
    /// # Errors
    /// Returns an error if the source fails or the configured horizon
    /// override is not positive.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let symbol = self.engine.symbol().to_string();
        tracing::info!(
            symbol = %symbol,
            source = self.source.symbol(),
            predict_every = self.config.predict_every,
            "Starting prediction run"
        );

        let mut processed = 0_u64;
        let mut dropped = 0_u64;
        let mut made = 0_u64;
        let mut resolved = 0_u64;
        let mut first: Option<(i64, f64)> = None;
        let mut last: Option<(i64, f64)> = None;

        while let Some(tick) = self.source.next_tick().await? {
            if !tick.has_valid_price() {
                dropped += 1;
                continue;
            }

            resolved += self.engine.process_tick(tick).len() as u64;
            processed += 1;
            first.get_or_insert((tick.timestamp_ms, tick.price));
            last = Some((tick.timestamp_ms, tick.price));

            let every = self.config.predict_every as u64;
            if every > 0
                && processed % every == 0
                && self.engine.generate_prediction(self.config.horizon_ms)?.is_some()
            {
                made += 1;
            }
        }

        let stats = self.engine.stats();
        tracing::info!(
            symbol = %symbol,
            ticks = processed,
            predictions = made,
            resolved,
            accuracy = stats.accuracy,
            "Prediction run complete"
        );

        Ok(RunSummary {
            symbol,
            ticks_processed: processed,
            ticks_dropped: dropped,
            predictions_made: made,
            predictions_resolved: resolved,
            pending_at_end: self.engine.pending_predictions().len(),
            first_tick_ms: first.map(|(ts, _)| ts),
            last_tick_ms: last.map(|(ts, _)| ts),
            first_price: first.map(|(_, p)| p),
            last_price: last.map(|(_, p)| p),
            stats,
            final_state: self.engine.state(),
            recent: self.engine.recent_predictions(SUMMARY_RECENT),
        })
    }
}

//! Per-symbol prediction engine.
//!
//! [`PredictionEngine`] owns the tick buffer, prediction ledger, and learning
//! state for one symbol. Every operation runs to completion synchronously;
//! expiry is only checked inside [`PredictionEngine::process_tick`], so a
//! prediction whose horizon elapses during a feed gap resolves against the
//! next tick that arrives.

use crate::generator::PredictionGenerator;
use crate::learning::LearningState;
use crate::ledger::PredictionLedger;
use crate::resolver;
use std::fmt;
use std::sync::Arc;
use tick_oracle_core::{
    ConfigError, CrossAssetSignal, EngineConfig, EngineError, Prediction, PredictionStats, Tick,
};
use tick_oracle_signals::TickBuffer;

pub struct PredictionEngine {
    symbol: String,
    config: EngineConfig,
    buffer: TickBuffer,
    ledger: PredictionLedger,
    learning: LearningState,
    generator: PredictionGenerator,
    cross_asset: Option<Arc<dyn CrossAssetSignal>>,
    ticks_seen: u64,
}

impl fmt::Debug for PredictionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionEngine")
            .field("symbol", &self.symbol)
            .field("ticks", &self.buffer.len())
            .field("predictions", &self.ledger.len())
            .field("cross_asset", &self.cross_asset.as_ref().map(|c| c.name().to_string()))
            .finish_non_exhaustive()
    }
}

impl PredictionEngine {
    /// Creates an engine for `symbol`.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if `config` fails validation.
    pub fn new(symbol: impl Into<String>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            symbol: symbol.into(),
            buffer: TickBuffer::new(config.buffer_capacity),
            ledger: PredictionLedger::new(config.max_resolved_history),
            learning: LearningState::new(&config),
            generator: PredictionGenerator::default(),
            cross_asset: None,
            ticks_seen: 0,
            config,
        })
    }

    /// Attaches a cross-asset collaborator whose multiplier scales confidence.
    #[must_use]
    pub fn with_cross_asset(mut self, signal: Arc<dyn CrossAssetSignal>) -> Self {
        self.cross_asset = Some(signal);
        self
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ingests a tick and resolves every prediction it makes due.
    ///
    /// The volatility regime is refreshed from the buffer before any
    /// prediction is scored. Returns the predictions resolved by this tick.
    /// Ticks with a non-finite or non-positive price are dropped.
    pub fn process_tick(&mut self, tick: Tick) -> Vec<Prediction> {
        if !tick.has_valid_price() {
            tracing::warn!(symbol = %self.symbol, price = tick.price, "Dropping tick with invalid price");
            return Vec::new();
        }

        self.buffer.append(tick);
        self.ticks_seen += 1;

        let resolved =
            resolver::sweep(&mut self.ledger, &mut self.learning, &self.buffer, &self.config);
        if !resolved.is_empty() {
            tracing::debug!(
                symbol = %self.symbol,
                resolved = resolved.len(),
                accuracy = self.learning.accuracy,
                streak = self.learning.streak,
                "Resolved predictions"
            );
        }
        resolved
    }

    /// Issues a forecast from the current buffer.
    ///
    /// Uses the adaptive horizon unless `horizon_ms` overrides it. Returns
    /// `Ok(None)` while fewer than `min_ticks_for_prediction` ticks are buffered.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidHorizon` if the override is not positive.
    pub fn generate_prediction(
        &mut self,
        horizon_ms: Option<i64>,
    ) -> Result<Option<Prediction>, EngineError> {
        let horizon_ms = match horizon_ms {
            Some(h) if h <= 0 => return Err(EngineError::InvalidHorizon(h)),
            Some(h) => h,
            None => self.learning.adaptive_horizon_ms,
        };

        let Some(prediction) = self.generator.generate(
            &self.buffer,
            &self.learning,
            &self.config,
            horizon_ms,
            self.cross_asset_factor(),
        ) else {
            return Ok(None);
        };

        tracing::info!(
            symbol = %self.symbol,
            id = %prediction.id,
            direction = %prediction.predicted_direction,
            confidence = prediction.confidence,
            horizon_ms,
            "Prediction created"
        );
        self.ledger.insert(prediction.clone());
        Ok(Some(prediction))
    }

    fn cross_asset_factor(&self) -> Option<f64> {
        let source = self.cross_asset.as_ref()?;
        let factor = source.confidence_multiplier(&self.symbol)?;
        if factor.is_finite() && factor > 0.0 {
            Some(factor)
        } else {
            tracing::warn!(
                symbol = %self.symbol,
                source = source.name(),
                factor,
                "Ignoring invalid cross-asset multiplier"
            );
            None
        }
    }

    /// Snapshot of the learning state.
    #[must_use]
    pub fn state(&self) -> LearningState {
        self.learning.clone()
    }

    #[must_use]
    pub fn stats(&self) -> PredictionStats {
        self.learning.stats()
    }

    /// Unresolved predictions, soonest expiry first.
    #[must_use]
    pub fn pending_predictions(&self) -> Vec<Prediction> {
        self.ledger.pending()
    }

    /// Up to `count` predictions, newest first.
    #[must_use]
    pub fn recent_predictions(&self, count: usize) -> Vec<Prediction> {
        self.ledger.recent(count)
    }

    /// Clears buffer, ledger, and learning state back to their initial values.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.ledger.clear();
        self.learning = LearningState::new(&self.config);
        self.ticks_seen = 0;
        tracing::info!(symbol = %self.symbol, "Engine reset");
    }

    /// Number of ticks currently buffered.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.buffer.len()
    }

    /// Ticks accepted since construction or the last reset.
    #[must_use]
    pub const fn ticks_seen(&self) -> u64 {
        self.ticks_seen
    }

    #[must_use]
    pub fn latest_tick(&self) -> Option<Tick> {
        self.buffer.latest().copied()
    }
}

//! The engine's mutable feedback state.
//!
//! Every resolved prediction is folded in through [`LearningState::record_outcome`].
//! Updates are incremental: each is a deterministic function of the previous
//! state and a single outcome, with no batch recomputation.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tick_oracle_core::{
    Direction, DirectionBreakdown, EngineConfig, MultiLevelAccuracy, PredictionStats,
    VolatilityState,
};

pub const MIN_CONFIDENCE_MULTIPLIER: f64 = 0.6;
pub const MAX_CONFIDENCE_MULTIPLIER: f64 = 1.5;
pub const INITIAL_CONFIDENCE_MULTIPLIER: f64 = 1.0;

/// Recent accuracy (percent) above which confidence is scaled up.
pub const HIGH_RECENT_ACCURACY: f64 = 70.0;
/// Recent accuracy (percent) below which confidence is scaled down.
pub const LOW_RECENT_ACCURACY: f64 = 45.0;

/// Composite score above which the horizon shortens.
pub const FAST_COMPOSITE: f64 = 65.0;
/// Composite score below which the horizon lengthens.
pub const SLOW_COMPOSITE: f64 = 45.0;

pub const MOMENTUM_BIAS_DECAY: f64 = 0.9;

/// Neutral prior for percentages with no samples yet.
const NEUTRAL_PCT: f64 = 50.0;

/// One resolved prediction, as seen by the learner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub predicted: Direction,
    pub actual: Direction,
    pub confidence: f64,
    pub levels: MultiLevelAccuracy,
    pub resolved_at_ms: i64,
}

impl Outcome {
    #[must_use]
    pub fn was_correct(&self) -> bool {
        self.predicted == self.actual
    }
}

/// Running means of the per-prediction accuracy dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiLevelSummary {
    /// Direction hit rate (percent)
    pub direction_accuracy: f64,
    pub magnitude_accuracy: f64,
    pub timing_accuracy: f64,
    /// `|avg predicted confidence - observed accuracy|`, lower is better
    pub confidence_calibration: f64,
    pub composite_score: f64,
    /// Change of the composite mean caused by the latest outcome
    pub composite_trend: f64,
    pub avg_predicted_confidence: f64,
    pub samples: u64,
}

impl Default for MultiLevelSummary {
    fn default() -> Self {
        Self {
            direction_accuracy: NEUTRAL_PCT,
            magnitude_accuracy: NEUTRAL_PCT,
            timing_accuracy: NEUTRAL_PCT,
            confidence_calibration: 0.0,
            composite_score: NEUTRAL_PCT,
            composite_trend: 0.0,
            avg_predicted_confidence: NEUTRAL_PCT,
            samples: 0,
        }
    }
}

impl MultiLevelSummary {
    fn update(&mut self, levels: &MultiLevelAccuracy, confidence: f64, observed_accuracy: f64) {
        self.samples += 1;
        let n = self.samples as f64;
        let mean = |avg: f64, x: f64| avg + (x - avg) / n;

        let previous_composite = self.composite_score;
        self.direction_accuracy = mean(self.direction_accuracy, levels.direction);
        self.magnitude_accuracy = mean(self.magnitude_accuracy, levels.magnitude);
        self.timing_accuracy = mean(self.timing_accuracy, levels.timing);
        self.composite_score = mean(self.composite_score, levels.composite);
        self.avg_predicted_confidence = mean(self.avg_predicted_confidence, confidence);

        self.composite_trend = self.composite_score - previous_composite;
        self.confidence_calibration = (self.avg_predicted_confidence - observed_accuracy).abs();
    }
}

/// Accuracy, streaks, and the adaptive parameters steering new forecasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningState {
    pub total_predictions: u64,
    pub correct_predictions: u64,
    /// Percent correct over all outcomes
    pub accuracy: f64,
    pub streak: u32,
    pub best_streak: u32,
    /// Percent correct over the trailing outcome window
    pub recent_accuracy: f64,
    pub confidence_multiplier: f64,
    pub adaptive_horizon_ms: i64,
    pub volatility_state: VolatilityState,
    pub momentum_bias: f64,
    pub multi_level: MultiLevelSummary,
    pub per_direction: DirectionBreakdown,
    /// Timestamp of the tick that last changed this state
    pub last_update_ms: Option<i64>,
    recent_outcomes: VecDeque<bool>,
    recent_window: usize,
}

impl LearningState {
    /// Initial state for an engine built with `config`.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let recent_window = config.recent_window.max(1);
        Self {
            total_predictions: 0,
            correct_predictions: 0,
            accuracy: 0.0,
            streak: 0,
            best_streak: 0,
            recent_accuracy: NEUTRAL_PCT,
            confidence_multiplier: INITIAL_CONFIDENCE_MULTIPLIER,
            adaptive_horizon_ms: config
                .initial_horizon_ms
                .clamp(config.min_horizon_ms, config.max_horizon_ms),
            volatility_state: VolatilityState::default(),
            momentum_bias: 0.0,
            multi_level: MultiLevelSummary::default(),
            per_direction: DirectionBreakdown::default(),
            last_update_ms: None,
            recent_outcomes: VecDeque::with_capacity(recent_window),
            recent_window,
        }
    }

    /// Trailing outcomes, oldest first.
    pub fn recent_outcomes(&self) -> impl Iterator<Item = bool> + '_ {
        self.recent_outcomes.iter().copied()
    }

    /// Refreshes the market regime seen by the generator.
    pub fn observe_volatility(&mut self, state: VolatilityState, at_ms: i64) {
        if self.volatility_state != state {
            tracing::debug!(from = %self.volatility_state, to = %state, "Volatility regime changed");
        }
        self.volatility_state = state;
        self.last_update_ms = Some(at_ms);
    }

    /// Folds one resolved prediction into the state.
    pub fn record_outcome(&mut self, outcome: &Outcome, config: &EngineConfig) {
        let correct = outcome.was_correct();

        self.total_predictions += 1;
        if correct {
            self.correct_predictions += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
        self.accuracy = self.correct_predictions as f64 / self.total_predictions as f64 * 100.0;

        self.recent_outcomes.push_back(correct);
        while self.recent_outcomes.len() > self.recent_window {
            self.recent_outcomes.pop_front();
        }
        self.recent_accuracy = recent_pct(&self.recent_outcomes);

        self.per_direction.record(outcome.predicted, correct);
        self.multi_level
            .update(&outcome.levels, outcome.confidence, self.accuracy);

        self.adjust_confidence_multiplier(config);
        self.adjust_horizon(config);
        self.adjust_momentum_bias(outcome, config);

        self.last_update_ms = Some(outcome.resolved_at_ms);
    }

    fn adjust_confidence_multiplier(&mut self, config: &EngineConfig) {
        let step = config.learning_rate * 0.1;
        if self.recent_accuracy > HIGH_RECENT_ACCURACY {
            self.confidence_multiplier =
                (self.confidence_multiplier + step).min(MAX_CONFIDENCE_MULTIPLIER);
        } else if self.recent_accuracy < LOW_RECENT_ACCURACY {
            self.confidence_multiplier =
                (self.confidence_multiplier - step).max(MIN_CONFIDENCE_MULTIPLIER);
        }
    }

    fn adjust_horizon(&mut self, config: &EngineConfig) {
        let composite = self.multi_level.composite_score;
        if composite > FAST_COMPOSITE {
            self.adaptive_horizon_ms =
                (self.adaptive_horizon_ms - config.horizon_step_ms).max(config.min_horizon_ms);
        } else if composite < SLOW_COMPOSITE {
            self.adaptive_horizon_ms =
                (self.adaptive_horizon_ms + config.horizon_step_ms).min(config.max_horizon_ms);
        }
    }

    fn adjust_momentum_bias(&mut self, outcome: &Outcome, config: &EngineConfig) {
        self.momentum_bias = match (outcome.was_correct(), outcome.actual) {
            (true, Direction::Up) => (self.momentum_bias + config.learning_rate).min(1.0),
            (true, Direction::Down) => (self.momentum_bias - config.learning_rate).max(-1.0),
            _ => self.momentum_bias * MOMENTUM_BIAS_DECAY,
        };
    }

    /// Summary view for the stats query.
    #[must_use]
    pub fn stats(&self) -> PredictionStats {
        PredictionStats {
            total_predictions: self.total_predictions,
            accuracy: self.accuracy,
            recent_accuracy: self.recent_accuracy,
            current_streak: self.streak,
            best_streak: self.best_streak,
            per_direction: self.per_direction,
        }
    }
}

fn recent_pct(outcomes: &VecDeque<bool>) -> f64 {
    if outcomes.is_empty() {
        return NEUTRAL_PCT;
    }
    let correct = outcomes.iter().filter(|&&c| c).count();
    correct as f64 / outcomes.len() as f64 * 100.0
}

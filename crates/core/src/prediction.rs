//! Forecast records and their multi-level accuracy scores.

use crate::signal::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionId(Uuid);

impl PredictionId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Weights of the composite accuracy score.
pub const DIRECTION_WEIGHT: f64 = 0.40;
pub const MAGNITUDE_WEIGHT: f64 = 0.25;
pub const TIMING_WEIGHT: f64 = 0.15;
pub const CONFIDENCE_WEIGHT: f64 = 0.20;

/// Per-prediction accuracy scored along four dimensions (each 0..100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiLevelAccuracy {
    /// 100 if the direction was right, 0 otherwise
    pub direction: f64,
    /// Closeness of the predicted move size to the actual move size
    pub magnitude: f64,
    /// Closeness of the resolution time to the intended horizon
    pub timing: f64,
    /// Calibration of the stated confidence against the outcome
    pub confidence: f64,
    /// Weighted blend of the four scores
    pub composite: f64,
}

impl MultiLevelAccuracy {
    /// Builds the score set, deriving the composite from the four components.
    #[must_use]
    pub fn new(direction: f64, magnitude: f64, timing: f64, confidence: f64) -> Self {
        let composite = DIRECTION_WEIGHT * direction
            + MAGNITUDE_WEIGHT * magnitude
            + TIMING_WEIGHT * timing
            + CONFIDENCE_WEIGHT * confidence;
        Self {
            direction,
            magnitude,
            timing,
            confidence,
            composite,
        }
    }
}

/// Lifecycle of a prediction. Both resolved states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionStatus {
    Pending,
    ResolvedCorrect,
    ResolvedIncorrect,
}

/// A short-horizon directional forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: PredictionId,
    /// Timestamp (epoch ms) of the tick the forecast was made on
    pub created_at_ms: i64,
    pub predicted_direction: Direction,
    /// Self-reported certainty, always within [25, 95]
    pub confidence: f64,
    pub horizon_ms: i64,
    pub price_at_creation: f64,
    pub target_price: f64,
    /// Fixed at creation as `created_at_ms + horizon_ms`
    pub expires_at_ms: i64,
    pub resolved: bool,
    pub was_correct: Option<bool>,
    pub actual_direction: Option<Direction>,
    pub actual_price: Option<f64>,
    /// Timestamp of the tick that resolved this forecast
    pub resolved_at_ms: Option<i64>,
    pub accuracy_levels: Option<MultiLevelAccuracy>,
}

impl Prediction {
    /// Creates a pending prediction with a fresh id.
    #[must_use]
    pub fn pending(
        created_at_ms: i64,
        predicted_direction: Direction,
        confidence: f64,
        horizon_ms: i64,
        price_at_creation: f64,
        target_price: f64,
    ) -> Self {
        Self {
            id: PredictionId::new_v4(),
            created_at_ms,
            predicted_direction,
            confidence,
            horizon_ms,
            price_at_creation,
            target_price,
            expires_at_ms: created_at_ms.saturating_add(horizon_ms),
            resolved: false,
            was_correct: None,
            actual_direction: None,
            actual_price: None,
            resolved_at_ms: None,
            accuracy_levels: None,
        }
    }

    /// Returns true once the horizon has elapsed at `now_ms`.
    #[must_use]
    pub const fn is_due(&self, now_ms: i64) -> bool {
        !self.resolved && self.expires_at_ms <= now_ms
    }

    /// Predicted move size in percent of the creation price.
    #[must_use]
    pub fn predicted_move_pct(&self) -> f64 {
        if self.price_at_creation <= 0.0 {
            return 0.0;
        }
        ((self.target_price - self.price_at_creation) / self.price_at_creation * 100.0).abs()
    }

    #[must_use]
    pub const fn status(&self) -> PredictionStatus {
        match (self.resolved, self.was_correct) {
            (true, Some(true)) => PredictionStatus::ResolvedCorrect,
            (true, _) => PredictionStatus::ResolvedIncorrect,
            (false, _) => PredictionStatus::Pending,
        }
    }

    /// Records the outcome. Returns false (and changes nothing) if the
    /// prediction was already resolved.
    pub fn resolve(
        &mut self,
        actual_direction: Direction,
        actual_price: f64,
        resolved_at_ms: i64,
        accuracy_levels: MultiLevelAccuracy,
    ) -> bool {
        if self.resolved {
            return false;
        }
        self.resolved = true;
        self.was_correct = Some(self.predicted_direction == actual_direction);
        self.actual_direction = Some(actual_direction);
        self.actual_price = Some(actual_price);
        self.resolved_at_ms = Some(resolved_at_ms);
        self.accuracy_levels = Some(accuracy_levels);
        true
    }
}

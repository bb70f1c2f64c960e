//! Weighted blend of the extracted signals.
//!
//! The blend folds the learned momentum bias in as a fourth input, so the
//! engine's feedback loop shifts forecasts without touching the extractors.

use crate::extractor::SignalSnapshot;
use serde::{Deserialize, Serialize};
use tick_oracle_core::Direction;

/// Blended values beyond this magnitude are directional.
pub const DIRECTION_THRESHOLD: f64 = 0.15;

/// Weights of each input in the blended signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub momentum: f64,
    pub micro_trend: f64,
    pub volume: f64,
    pub momentum_bias: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            momentum: 0.35,
            micro_trend: 0.30,
            volume: 0.20,
            momentum_bias: 0.15,
        }
    }
}

/// Result of blending one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedSignal {
    /// Weighted sum, nominally in [-1, 1]
    pub value: f64,
    pub direction: Direction,
}

impl BlendedSignal {
    /// Absolute signal strength.
    #[must_use]
    pub fn strength(&self) -> f64 {
        self.value.abs()
    }
}

impl SignalWeights {
    /// Combines a snapshot with the current momentum bias.
    #[must_use]
    pub fn blend(&self, snapshot: &SignalSnapshot, momentum_bias: f64) -> BlendedSignal {
        let value = self.momentum * snapshot.momentum
            + self.micro_trend * snapshot.micro_trend
            + self.volume * snapshot.volume
            + self.momentum_bias * momentum_bias;

        let value = if value.is_finite() { value } else { 0.0 };

        BlendedSignal {
            value,
            direction: Direction::from_threshold(value, DIRECTION_THRESHOLD),
        }
    }
}

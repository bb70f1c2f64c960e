//! Turns the current buffer and learning state into a forecast.

use crate::learning::LearningState;
use tick_oracle_core::{Direction, EngineConfig, Prediction};
use tick_oracle_signals::{BlendedSignal, SignalSnapshot, SignalWeights, SignalWindows, TickBuffer};

pub const MIN_CONFIDENCE: f64 = 25.0;
pub const MAX_CONFIDENCE: f64 = 95.0;
/// Confidence points added per unit of signal strength.
pub const SIGNAL_CONFIDENCE_SCALE: f64 = 40.0;
/// Streak length from which the streak boost applies.
pub const STREAK_BOOST_FROM: u32 = 5;
pub const STREAK_BOOST_PER_WIN: f64 = 0.02;

/// Inputs to the confidence computation besides the signal.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInputs {
    pub base: f64,
    pub multiplier: f64,
    pub volatility_factor: f64,
    pub streak: u32,
    /// External factor, already validated
    pub cross_asset: Option<f64>,
}

impl ConfidenceInputs {
    #[must_use]
    pub fn from_state(config: &EngineConfig, state: &LearningState, cross_asset: Option<f64>) -> Self {
        Self {
            base: config.base_confidence,
            multiplier: state.confidence_multiplier,
            volatility_factor: state.volatility_state.confidence_factor(),
            streak: state.streak,
            cross_asset,
        }
    }
}

/// Confidence for a blended signal, clamped to [25, 95].
#[must_use]
pub fn confidence(signal: &BlendedSignal, inputs: &ConfidenceInputs) -> f64 {
    let mut confidence = inputs.base + signal.strength() * SIGNAL_CONFIDENCE_SCALE;
    confidence *= inputs.multiplier;
    confidence *= inputs.volatility_factor;
    if inputs.streak >= STREAK_BOOST_FROM {
        confidence *= 1.0 + f64::from(inputs.streak) * STREAK_BOOST_PER_WIN;
    }
    if let Some(factor) = inputs.cross_asset {
        confidence *= factor;
    }

    if confidence.is_finite() {
        confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    } else {
        MIN_CONFIDENCE
    }
}

/// Price the forecast expects after `horizon_ms`. Never negative.
#[must_use]
pub fn target_price(price: f64, direction: Direction, volatility: f64, horizon_ms: i64) -> f64 {
    let expected_move = volatility * (horizon_ms as f64 / 1000.0);
    let target = price * (1.0 + direction.sign() * expected_move);
    if target.is_finite() {
        target.max(0.0)
    } else {
        price
    }
}

/// Builds predictions from buffer contents. Stateless apart from weights.
#[derive(Debug, Clone, Default)]
pub struct PredictionGenerator {
    weights: SignalWeights,
}

impl PredictionGenerator {
    /// Produces a pending prediction, or `None` while the buffer holds fewer
    /// than `min_ticks_for_prediction` ticks. `horizon_ms` must already be
    /// validated as positive.
    #[must_use]
    pub fn generate(
        &self,
        buffer: &TickBuffer,
        state: &LearningState,
        config: &EngineConfig,
        horizon_ms: i64,
        cross_asset: Option<f64>,
    ) -> Option<Prediction> {
        if buffer.len() < config.min_ticks_for_prediction {
            return None;
        }
        let latest = *buffer.latest()?;

        let snapshot = SignalSnapshot::extract(buffer, SignalWindows::from(config));
        let signal = self.weights.blend(&snapshot, state.momentum_bias);
        let inputs = ConfidenceInputs::from_state(config, state, cross_asset);
        let confidence = confidence(&signal, &inputs);
        let target = target_price(latest.price, signal.direction, snapshot.volatility, horizon_ms);

        tracing::trace!(
            signal = signal.value,
            momentum = snapshot.momentum,
            micro_trend = snapshot.micro_trend,
            volume = snapshot.volume,
            "Blended signal"
        );

        Some(Prediction::pending(
            latest.timestamp_ms,
            signal.direction,
            confidence,
            horizon_ms,
            latest.price,
            target,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tick_oracle_core::{Tick, VolatilityState};

    fn inputs() -> ConfidenceInputs {
        ConfidenceInputs {
            base: 50.0,
            multiplier: 1.0,
            volatility_factor: 1.0,
            streak: 0,
            cross_asset: None,
        }
    }

    fn signal(value: f64) -> BlendedSignal {
        BlendedSignal {
            value,
            direction: Direction::from_threshold(value, 0.15),
        }
    }

    fn rising_buffer(n: usize) -> TickBuffer {
        let mut buffer = TickBuffer::new(500);
        let mut price = 100.0;
        for i in 0..n {
            buffer.append(Tick::new(price, 1.0, i as i64 * 100));
            price *= 1.001;
        }
        buffer
    }

    // ============================================
    // Confidence Tests
    // ============================================

    #[test]
    fn confidence_scales_with_signal() {
        assert!((confidence(&signal(0.0), &inputs()) - 50.0).abs() < 1e-9);
        assert!((confidence(&signal(0.5), &inputs()) - 70.0).abs() < 1e-9);
        assert!((confidence(&signal(-0.5), &inputs()) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_applies_regime_factor() {
        let extreme = ConfidenceInputs {
            volatility_factor: VolatilityState::Extreme.confidence_factor(),
            ..inputs()
        };
        assert!((confidence(&signal(0.5), &extreme) - 49.0).abs() < 1e-9);

        let low = ConfidenceInputs {
            volatility_factor: VolatilityState::Low.confidence_factor(),
            ..inputs()
        };
        assert!((confidence(&signal(0.5), &low) - 77.0).abs() < 1e-9);
    }

    #[test]
    fn streak_boost_starts_at_five() {
        let four = ConfidenceInputs {
            streak: 4,
            ..inputs()
        };
        assert!((confidence(&signal(0.0), &four) - 50.0).abs() < 1e-9);

        let five = ConfidenceInputs {
            streak: 5,
            ..inputs()
        };
        assert!((confidence(&signal(0.0), &five) - 55.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_clamped() {
        let hot = ConfidenceInputs {
            multiplier: 1.5,
            streak: 30,
            ..inputs()
        };
        assert!((confidence(&signal(1.0), &hot) - MAX_CONFIDENCE).abs() < f64::EPSILON);

        let cold = ConfidenceInputs {
            base: 10.0,
            multiplier: 0.6,
            volatility_factor: 0.7,
            ..inputs()
        };
        assert!((confidence(&signal(0.0), &cold) - MIN_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn cross_asset_factor_multiplies() {
        let boosted = ConfidenceInputs {
            cross_asset: Some(1.2),
            ..inputs()
        };
        assert!((confidence(&signal(0.0), &boosted) - 60.0).abs() < 1e-9);
    }

    // ============================================
    // Target Price Tests
    // ============================================

    #[test]
    fn target_moves_with_direction() {
        assert!((target_price(100.0, Direction::Up, 0.01, 2_000) - 102.0).abs() < 1e-9);
        assert!((target_price(100.0, Direction::Down, 0.01, 2_000) - 98.0).abs() < 1e-9);
        assert!((target_price(100.0, Direction::Flat, 0.01, 2_000) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn target_never_negative() {
        assert!(target_price(100.0, Direction::Down, 0.5, 10_000).abs() < f64::EPSILON);
    }

    // ============================================
    // Generation Tests
    // ============================================

    #[test]
    fn generate_requires_minimum_ticks() {
        let config = EngineConfig::default();
        let state = LearningState::new(&config);
        let generator = PredictionGenerator::default();

        assert!(generator
            .generate(&rising_buffer(9), &state, &config, 1_000, None)
            .is_none());
        assert!(generator
            .generate(&rising_buffer(10), &state, &config, 1_000, None)
            .is_some());
    }

    #[test]
    fn generate_on_rising_prices_predicts_up() {
        let config = EngineConfig::default();
        let state = LearningState::new(&config);
        let buffer = rising_buffer(20);

        let prediction = PredictionGenerator::default()
            .generate(&buffer, &state, &config, 1_000, None)
            .unwrap();

        let latest = buffer.latest().unwrap();
        assert_eq!(prediction.predicted_direction, Direction::Up);
        assert!(prediction.confidence > config.base_confidence);
        assert_eq!(prediction.created_at_ms, latest.timestamp_ms);
        assert_eq!(prediction.expires_at_ms, latest.timestamp_ms + 1_000);
        assert!((prediction.price_at_creation - latest.price).abs() < f64::EPSILON);
        assert!(prediction.target_price >= prediction.price_at_creation);
        assert!(!prediction.resolved);
    }

    #[test]
    fn generate_gives_unique_ids() {
        let config = EngineConfig::default();
        let state = LearningState::new(&config);
        let buffer = rising_buffer(20);
        let generator = PredictionGenerator::default();

        let a = generator.generate(&buffer, &state, &config, 1_000, None).unwrap();
        let b = generator.generate(&buffer, &state, &config, 1_000, None).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.predicted_direction, b.predicted_direction);
        assert!((a.confidence - b.confidence).abs() < f64::EPSILON);
    }
}

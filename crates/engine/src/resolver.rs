//! Scores expired predictions against the observed price.

use crate::learning::{LearningState, Outcome};
use crate::ledger::PredictionLedger;
use tick_oracle_core::{Direction, EngineConfig, MultiLevelAccuracy, Prediction};
use tick_oracle_signals::{volatility_regime, TickBuffer};

/// Predicted moves smaller than this (percent) count as "no move".
const ZERO_MOVE_PCT: f64 = 1e-9;
/// Magnitude score for correctly expecting no move.
const FLAT_MAGNITUDE_SCORE: f64 = 80.0;
/// Elapsed-time tolerance as a fraction of the horizon.
const TIMING_TOLERANCE: f64 = 0.3;

/// Percent change from `from` to `to`; 0 when `from` is not positive.
#[must_use]
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from <= 0.0 {
        return 0.0;
    }
    (to - from) / from * 100.0
}

/// Direction of an observed move with a symmetric flat deadband (percent).
#[must_use]
pub fn actual_direction(change_pct: f64, deadband_pct: f64) -> Direction {
    Direction::from_threshold(change_pct, deadband_pct)
}

/// How close the observed move size came to the predicted one.
#[must_use]
pub fn magnitude_score(predicted_pct: f64, actual_pct: f64, deadband_pct: f64) -> f64 {
    let predicted = predicted_pct.abs();
    let actual = actual_pct.abs();

    if predicted < ZERO_MOVE_PCT {
        return if actual <= deadband_pct {
            FLAT_MAGNITUDE_SCORE
        } else {
            0.0
        };
    }
    (100.0 - (actual - predicted).abs() / predicted * 100.0).max(0.0)
}

/// Rewards resolutions close to the intended horizon.
#[must_use]
pub fn timing_score(elapsed_ms: i64, horizon_ms: i64) -> f64 {
    if horizon_ms <= 0 {
        return 0.0;
    }
    let horizon = horizon_ms as f64;
    let miss = elapsed_ms.saturating_sub(horizon_ms).saturating_abs() as f64;
    (100.0 - miss / (TIMING_TOLERANCE * horizon) * 50.0).clamp(0.0, 100.0)
}

/// Stated confidence when right, its complement when wrong.
#[must_use]
pub fn confidence_score(confidence: f64, correct: bool) -> f64 {
    if correct {
        confidence
    } else {
        100.0 - confidence
    }
}

/// Full verdict on one prediction at the given price and time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub actual_direction: Direction,
    pub levels: MultiLevelAccuracy,
}

/// Scores `prediction` as if resolved at `price` and `now_ms`.
#[must_use]
pub fn score(prediction: &Prediction, price: f64, now_ms: i64, deadband_pct: f64) -> Verdict {
    let change = percent_change(prediction.price_at_creation, price);
    let actual = actual_direction(change, deadband_pct);
    let correct = actual == prediction.predicted_direction;

    let levels = MultiLevelAccuracy::new(
        if correct { 100.0 } else { 0.0 },
        magnitude_score(prediction.predicted_move_pct(), change, deadband_pct),
        timing_score(
            now_ms.saturating_sub(prediction.created_at_ms),
            prediction.horizon_ms,
        ),
        confidence_score(prediction.confidence, correct),
    );

    Verdict {
        actual_direction: actual,
        levels,
    }
}

/// Runs after each accepted tick.
///
/// Refreshes the volatility regime from `buffer`, resolves every due
/// prediction against the newest tick, feeds each outcome into `learning`,
/// and prunes the ledger. Returns the newly resolved predictions in
/// resolution order.
pub fn sweep(
    ledger: &mut PredictionLedger,
    learning: &mut LearningState,
    buffer: &TickBuffer,
    config: &EngineConfig,
) -> Vec<Prediction> {
    let mut resolved = Vec::new();
    let Some(tick) = buffer.latest().copied() else {
        return resolved;
    };

    if let Some(regime) = volatility_regime(buffer, config.volatility_window) {
        learning.observe_volatility(regime, tick.timestamp_ms);
    }

    for id in ledger.due(tick.timestamp_ms) {
        let Some(prediction) = ledger.get(&id) else {
            continue;
        };
        let verdict = score(prediction, tick.price, tick.timestamp_ms, config.flat_deadband_pct);

        let Some(prediction) = ledger.resolve(
            &id,
            verdict.actual_direction,
            tick.price,
            tick.timestamp_ms,
            verdict.levels,
        ) else {
            continue;
        };

        let outcome = Outcome {
            predicted: prediction.predicted_direction,
            actual: verdict.actual_direction,
            confidence: prediction.confidence,
            levels: verdict.levels,
            resolved_at_ms: tick.timestamp_ms,
        };
        tracing::debug!(
            id = %prediction.id,
            predicted = %outcome.predicted,
            actual = %outcome.actual,
            composite = verdict.levels.composite,
            "Prediction resolved"
        );
        resolved.push(prediction.clone());
        learning.record_outcome(&outcome, config);
    }

    let pruned = ledger.prune();
    if pruned > 0 {
        tracing::trace!(pruned, "Pruned resolved predictions");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use tick_oracle_core::{Tick, VolatilityState};

    fn buffer_of(ticks: &[Tick]) -> TickBuffer {
        let mut buffer = TickBuffer::new(100);
        for tick in ticks {
            buffer.append(*tick);
        }
        buffer
    }

    // ============================================
    // Scoring Function Tests
    // ============================================

    #[test]
    fn percent_change_basic() {
        assert!((percent_change(100.0, 102.0) - 2.0).abs() < 1e-9);
        assert!((percent_change(100.0, 99.0) + 1.0).abs() < 1e-9);
        assert!(percent_change(0.0, 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deadband_classifies_small_moves_flat() {
        assert_eq!(actual_direction(0.02, 0.01), Direction::Up);
        assert_eq!(actual_direction(-0.02, 0.01), Direction::Down);
        assert_eq!(actual_direction(0.005, 0.01), Direction::Flat);
        assert_eq!(actual_direction(0.01, 0.01), Direction::Flat);
    }

    #[test]
    fn magnitude_exact_hit_scores_100() {
        assert!((magnitude_score(1.0, 1.0, 0.01) - 100.0).abs() < 1e-9);
        assert!((magnitude_score(1.0, -1.0, 0.01) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn magnitude_degrades_linearly_and_floors_at_zero() {
        assert!((magnitude_score(1.0, 1.5, 0.01) - 50.0).abs() < 1e-9);
        assert!(magnitude_score(1.0, 3.0, 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn magnitude_with_no_predicted_move() {
        assert!((magnitude_score(0.0, 0.005, 0.01) - 80.0).abs() < 1e-9);
        assert!(magnitude_score(0.0, 0.5, 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn timing_peaks_at_horizon() {
        assert!((timing_score(1_000, 1_000) - 100.0).abs() < 1e-9);
        // 150ms late on a 1000ms horizon: 100 - 150/300*50 = 75
        assert!((timing_score(1_150, 1_000) - 75.0).abs() < 1e-9);
        assert!((timing_score(850, 1_000) - 75.0).abs() < 1e-9);
        assert!(timing_score(5_000, 1_000).abs() < f64::EPSILON);
    }

    #[test]
    fn timing_rejects_degenerate_horizon() {
        assert!(timing_score(100, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn confidence_score_is_calibration_check() {
        assert!((confidence_score(80.0, true) - 80.0).abs() < f64::EPSILON);
        assert!((confidence_score(80.0, false) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_combines_levels() {
        let prediction = Prediction::pending(0, Direction::Up, 70.0, 1_000, 100.0, 101.0);
        let verdict = score(&prediction, 101.0, 1_000, 0.01);

        assert_eq!(verdict.actual_direction, Direction::Up);
        assert!((verdict.levels.direction - 100.0).abs() < 1e-9);
        assert!((verdict.levels.magnitude - 100.0).abs() < 1e-6);
        assert!((verdict.levels.timing - 100.0).abs() < 1e-9);
        assert!((verdict.levels.confidence - 70.0).abs() < 1e-9);
        // 40 + 25 + 15 + 14
        assert!((verdict.levels.composite - 94.0).abs() < 1e-6);
    }

    // ============================================
    // Sweep Tests
    // ============================================

    #[test]
    fn sweep_resolves_only_due_predictions() {
        let config = EngineConfig::default();
        let mut ledger = PredictionLedger::new(config.max_resolved_history);
        let mut learning = LearningState::new(&config);

        let due = ledger.insert(Prediction::pending(0, Direction::Up, 60.0, 1_000, 100.0, 100.5));
        let later = ledger.insert(Prediction::pending(0, Direction::Up, 60.0, 5_000, 100.0, 100.5));

        let buffer = buffer_of(&[Tick::new(102.0, 1.0, 1_500)]);
        let resolved = sweep(&mut ledger, &mut learning, &buffer, &config);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, due);
        assert_eq!(resolved[0].was_correct, Some(true));
        assert!(!ledger.get(&later).unwrap().resolved);
        assert_eq!(learning.total_predictions, 1);
        assert_eq!(learning.streak, 1);
        assert_eq!(learning.last_update_ms, Some(1_500));
    }

    #[test]
    fn sweep_never_resolves_twice() {
        let config = EngineConfig::default();
        let mut ledger = PredictionLedger::new(config.max_resolved_history);
        let mut learning = LearningState::new(&config);
        ledger.insert(Prediction::pending(0, Direction::Down, 60.0, 1_000, 100.0, 99.5));

        let mut buffer = buffer_of(&[Tick::new(99.0, 1.0, 1_000)]);
        let first = sweep(&mut ledger, &mut learning, &buffer, &config);
        buffer.append(Tick::new(98.0, 1.0, 2_000));
        let second = sweep(&mut ledger, &mut learning, &buffer, &config);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(learning.total_predictions, 1);
    }

    #[test]
    fn sweep_prunes_resolved_history() {
        let config = EngineConfig {
            max_resolved_history: 3,
            ..EngineConfig::default()
        };
        let mut ledger = PredictionLedger::new(config.max_resolved_history);
        let mut learning = LearningState::new(&config);
        for i in 0..5 {
            ledger.insert(Prediction::pending(i, Direction::Up, 60.0, 1_000, 100.0, 100.5));
        }
        ledger.insert(Prediction::pending(0, Direction::Up, 60.0, 60_000, 100.0, 100.5));

        let buffer = buffer_of(&[Tick::new(101.0, 1.0, 2_000)]);
        let resolved = sweep(&mut ledger, &mut learning, &buffer, &config);

        assert_eq!(resolved.len(), 5);
        assert_eq!(ledger.resolved_count(), 3);
        assert_eq!(ledger.pending_count(), 1);
        assert_eq!(learning.total_predictions, 5);
    }

    #[test]
    fn sweep_on_empty_buffer_is_a_no_op() {
        let config = EngineConfig::default();
        let mut ledger = PredictionLedger::new(config.max_resolved_history);
        let mut learning = LearningState::new(&config);
        ledger.insert(Prediction::pending(0, Direction::Up, 60.0, 1_000, 100.0, 100.5));

        let resolved = sweep(&mut ledger, &mut learning, &TickBuffer::new(10), &config);

        assert!(resolved.is_empty());
        assert_eq!(ledger.pending_count(), 1);
        assert_eq!(learning.last_update_ms, None);
    }

    #[test]
    fn sweep_refreshes_volatility_regime() {
        let config = EngineConfig::default();
        let mut ledger = PredictionLedger::new(config.max_resolved_history);
        let mut learning = LearningState::new(&config);

        // A single tick leaves the starting regime untouched
        let mut buffer = buffer_of(&[Tick::new(100.0, 1.0, 0)]);
        sweep(&mut ledger, &mut learning, &buffer, &config);
        assert_eq!(learning.volatility_state, VolatilityState::Medium);

        for (i, price) in [102.0, 100.47, 102.48, 100.94].into_iter().enumerate() {
            buffer.append(Tick::new(price, 1.0, (i as i64 + 1) * 100));
        }
        sweep(&mut ledger, &mut learning, &buffer, &config);
        assert_eq!(learning.volatility_state, VolatilityState::Extreme);
        assert_eq!(learning.last_update_ms, Some(400));

        for i in 5..60 {
            buffer.append(Tick::new(100.94, 1.0, i * 100));
        }
        sweep(&mut ledger, &mut learning, &buffer, &config);
        assert_eq!(learning.volatility_state, VolatilityState::Low);
    }

    #[test]
    fn scoring_survives_extreme_timestamps() {
        let prediction =
            Prediction::pending(i64::MIN + 1_900, Direction::Up, 60.0, 1_000, 100.0, 100.5);
        let verdict = score(&prediction, 101.0, i64::MAX, 0.01);

        assert_eq!(verdict.actual_direction, Direction::Up);
        assert!(verdict.levels.timing.abs() < f64::EPSILON);
        assert!(verdict.levels.composite.is_finite());

        assert!(timing_score(i64::MIN, 1_000).abs() < f64::EPSILON);
        assert!(timing_score(i64::MAX, 1_000).abs() < f64::EPSILON);
    }
}

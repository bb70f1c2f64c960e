//! Aggregate prediction statistics exposed by the engine.

use crate::signal::Direction;
use serde::{Deserialize, Serialize};

/// Resolution counters for one predicted direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionStats {
    pub total: u64,
    pub correct: u64,
    /// Percent correct (0..100); 0 when nothing was resolved
    pub accuracy: f64,
}

impl DirectionStats {
    /// Adds one resolved outcome and refreshes the accuracy.
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
        self.accuracy = self.correct as f64 / self.total as f64 * 100.0;
    }
}

/// Counters split by the direction that was predicted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionBreakdown {
    pub up: DirectionStats,
    pub down: DirectionStats,
    pub flat: DirectionStats,
}

impl DirectionBreakdown {
    #[must_use]
    pub const fn get(&self, direction: Direction) -> &DirectionStats {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Flat => &self.flat,
        }
    }

    pub fn record(&mut self, predicted: Direction, correct: bool) {
        let stats = match predicted {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Flat => &mut self.flat,
        };
        stats.record(correct);
    }
}

/// Summary returned by the engine's stats query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub total_predictions: u64,
    /// Percent correct over all resolved predictions
    pub accuracy: f64,
    /// Percent correct over the trailing outcome window
    pub recent_accuracy: f64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub per_direction: DirectionBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_stats_record_updates_accuracy() {
        let mut stats = DirectionStats::default();
        stats.record(true);
        stats.record(false);
        stats.record(true);
        stats.record(true);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.correct, 3);
        assert!((stats.accuracy - 75.0).abs() < 1e-9);
    }

    #[test]
    fn breakdown_routes_by_predicted_direction() {
        let mut breakdown = DirectionBreakdown::default();
        breakdown.record(Direction::Up, true);
        breakdown.record(Direction::Down, false);
        breakdown.record(Direction::Down, true);

        assert_eq!(breakdown.get(Direction::Up).total, 1);
        assert_eq!(breakdown.get(Direction::Down).total, 2);
        assert_eq!(breakdown.get(Direction::Down).correct, 1);
        assert_eq!(breakdown.get(Direction::Flat).total, 0);
        assert!(breakdown.get(Direction::Flat).accuracy.abs() < f64::EPSILON);
    }
}

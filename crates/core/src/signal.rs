//! Directional and regime enums shared by the signal extractors and the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a forecast or of an observed price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Price expected (or observed) to rise
    Up,
    /// Price expected (or observed) to fall
    Down,
    /// Move inside the flat deadband
    Flat,
}

impl Direction {
    /// All variants, in reporting order.
    pub const ALL: [Self; 3] = [Self::Up, Self::Down, Self::Flat];

    /// +1 for Up, -1 for Down, 0 for Flat.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
            Self::Flat => 0.0,
        }
    }

    /// Classifies a signed value against a symmetric threshold.
    ///
    /// Values strictly above `threshold` are Up, strictly below `-threshold`
    /// are Down, everything else (including NaN) is Flat.
    #[must_use]
    pub fn from_threshold(value: f64, threshold: f64) -> Self {
        if value > threshold {
            Self::Up
        } else if value < -threshold {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        };
        f.write_str(label)
    }
}

/// Volatility regime derived from the standard deviation of tick returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VolatilityState {
    Low,
    #[default]
    Medium,
    High,
    Extreme,
}

impl VolatilityState {
    /// Upper bound (exclusive) of the Low regime.
    pub const LOW_CEILING: f64 = 0.0005;
    /// Upper bound (exclusive) of the Medium regime.
    pub const MEDIUM_CEILING: f64 = 0.002;
    /// Upper bound (exclusive) of the High regime.
    pub const HIGH_CEILING: f64 = 0.005;

    /// Maps a raw volatility (std-dev of returns) to a regime.
    #[must_use]
    pub fn classify(volatility: f64) -> Self {
        if volatility < Self::LOW_CEILING {
            Self::Low
        } else if volatility < Self::MEDIUM_CEILING {
            Self::Medium
        } else if volatility < Self::HIGH_CEILING {
            Self::High
        } else {
            Self::Extreme
        }
    }

    /// Multiplicative confidence adjustment for this regime.
    #[must_use]
    pub const fn confidence_factor(self) -> f64 {
        match self {
            Self::Low => 1.1,
            Self::Medium | Self::High => 1.0,
            Self::Extreme => 0.7,
        }
    }
}

impl fmt::Display for VolatilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Extreme => "extreme",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // Direction Tests
    // ============================================

    #[test]
    fn direction_from_threshold_boundaries_are_flat() {
        assert_eq!(Direction::from_threshold(0.15, 0.15), Direction::Flat);
        assert_eq!(Direction::from_threshold(-0.15, 0.15), Direction::Flat);
        assert_eq!(Direction::from_threshold(0.1501, 0.15), Direction::Up);
        assert_eq!(Direction::from_threshold(-0.1501, 0.15), Direction::Down);
        assert_eq!(Direction::from_threshold(f64::NAN, 0.15), Direction::Flat);
    }

    #[test]
    fn direction_serializes_to_json() {
        let json = serde_json::to_string(&Direction::Up).unwrap();
        assert_eq!(json, "\"Up\"");

        let dir: Direction = serde_json::from_str("\"Flat\"").unwrap();
        assert_eq!(dir, Direction::Flat);
    }

    #[test]
    fn direction_display_is_lowercase() {
        assert_eq!(Direction::Down.to_string(), "down");
    }

    // ============================================
    // VolatilityState Tests
    // ============================================

    #[test]
    fn volatility_classify_regimes() {
        assert_eq!(VolatilityState::classify(0.0), VolatilityState::Low);
        assert_eq!(VolatilityState::classify(0.0004), VolatilityState::Low);
        assert_eq!(VolatilityState::classify(0.0005), VolatilityState::Medium);
        assert_eq!(VolatilityState::classify(0.0019), VolatilityState::Medium);
        assert_eq!(VolatilityState::classify(0.002), VolatilityState::High);
        assert_eq!(VolatilityState::classify(0.0049), VolatilityState::High);
        assert_eq!(VolatilityState::classify(0.005), VolatilityState::Extreme);
        assert_eq!(VolatilityState::classify(0.5), VolatilityState::Extreme);
    }

    #[test]
    fn volatility_confidence_factors() {
        assert!((VolatilityState::Low.confidence_factor() - 1.1).abs() < f64::EPSILON);
        assert!((VolatilityState::Medium.confidence_factor() - 1.0).abs() < f64::EPSILON);
        assert!((VolatilityState::Extreme.confidence_factor() - 0.7).abs() < f64::EPSILON);
    }
}

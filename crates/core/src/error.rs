//! Boundary errors for the prediction engine.
//!
//! The compute path itself never fails; these errors are raised only where
//! caller input crosses into the engine (ticks, configuration, horizons).

use thiserror::Error;

/// A tick that violates the feed contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TickError {
    #[error("Tick price must be finite and positive, got {0}")]
    InvalidPrice(f64),

    #[error("Tick volume must be finite and non-negative, got {0}")]
    InvalidVolume(f64),

    #[error("Tick quote must be finite and positive, got {0}")]
    InvalidQuote(f64),
}

/// An engine configuration that cannot be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors surfaced by engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Prediction horizon must be positive, got {0}ms")]
    InvalidHorizon(i64),

    #[error("Engine for {0} is not running")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_error_messages_include_value() {
        let err = TickError::InvalidPrice(-1.5);
        assert!(err.to_string().contains("-1.5"));

        let err = TickError::InvalidVolume(f64::NAN);
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn engine_error_invalid_horizon_message() {
        let err = EngineError::InvalidHorizon(-500);
        assert_eq!(
            err.to_string(),
            "Prediction horizon must be positive, got -500ms"
        );
    }

    #[test]
    fn config_error_invalid_message() {
        let err = ConfigError::Invalid("min_horizon_ms must be positive".to_string());
        assert!(err.to_string().contains("min_horizon_ms"));
    }
}

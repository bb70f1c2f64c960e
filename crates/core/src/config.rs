use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Tunables of one prediction engine. Fixed for the engine's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_min_horizon_ms")]
    pub min_horizon_ms: i64,
    #[serde(default = "default_max_horizon_ms")]
    pub max_horizon_ms: i64,
    /// Starting point of every confidence computation (0..100)
    #[serde(default = "default_base_confidence")]
    pub base_confidence: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,
    #[serde(default = "default_momentum_window")]
    pub momentum_window: usize,
    #[serde(default = "default_min_ticks_for_prediction")]
    pub min_ticks_for_prediction: usize,

    /// Adaptive horizon before any outcome has been observed
    #[serde(default = "default_initial_horizon_ms")]
    pub initial_horizon_ms: i64,
    /// Amount the adaptive horizon moves per outcome
    #[serde(default = "default_horizon_step_ms")]
    pub horizon_step_ms: i64,
    /// Moves within +/- this percent resolve as Flat
    #[serde(default = "default_flat_deadband_pct")]
    pub flat_deadband_pct: f64,
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Resolved predictions kept in the ledger
    #[serde(default = "default_max_resolved_history")]
    pub max_resolved_history: usize,
    /// Outcomes in the trailing accuracy window
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
}

const fn default_min_horizon_ms() -> i64 {
    1_000
}

const fn default_max_horizon_ms() -> i64 {
    30_000
}

const fn default_base_confidence() -> f64 {
    50.0
}

const fn default_learning_rate() -> f64 {
    0.15
}

const fn default_volatility_window() -> usize {
    50
}

const fn default_momentum_window() -> usize {
    20
}

const fn default_min_ticks_for_prediction() -> usize {
    10
}

const fn default_initial_horizon_ms() -> i64 {
    5_000
}

const fn default_horizon_step_ms() -> i64 {
    500
}

const fn default_flat_deadband_pct() -> f64 {
    0.01 // 0.01%
}

const fn default_buffer_capacity() -> usize {
    500
}

const fn default_max_resolved_history() -> usize {
    100
}

const fn default_recent_window() -> usize {
    20
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_horizon_ms: default_min_horizon_ms(),
            max_horizon_ms: default_max_horizon_ms(),
            base_confidence: default_base_confidence(),
            learning_rate: default_learning_rate(),
            volatility_window: default_volatility_window(),
            momentum_window: default_momentum_window(),
            min_ticks_for_prediction: default_min_ticks_for_prediction(),
            initial_horizon_ms: default_initial_horizon_ms(),
            horizon_step_ms: default_horizon_step_ms(),
            flat_deadband_pct: default_flat_deadband_pct(),
            buffer_capacity: default_buffer_capacity(),
            max_resolved_history: default_max_resolved_history(),
            recent_window: default_recent_window(),
        }
    }
}

impl EngineConfig {
    /// Checks the configuration for values the engine cannot work with.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_horizon_ms <= 0 {
            return Err(invalid(format!(
                "min_horizon_ms must be positive, got {}",
                self.min_horizon_ms
            )));
        }
        if self.max_horizon_ms < self.min_horizon_ms {
            return Err(invalid(format!(
                "max_horizon_ms ({}) must be >= min_horizon_ms ({})",
                self.max_horizon_ms, self.min_horizon_ms
            )));
        }
        if !(self.min_horizon_ms..=self.max_horizon_ms).contains(&self.initial_horizon_ms) {
            return Err(invalid(format!(
                "initial_horizon_ms ({}) must lie within [{}, {}]",
                self.initial_horizon_ms, self.min_horizon_ms, self.max_horizon_ms
            )));
        }
        if self.horizon_step_ms < 0 {
            return Err(invalid(format!(
                "horizon_step_ms must be non-negative, got {}",
                self.horizon_step_ms
            )));
        }
        if !(0.0..=100.0).contains(&self.base_confidence) {
            return Err(invalid(format!(
                "base_confidence must be in [0, 100], got {}",
                self.base_confidence
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(invalid(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if self.volatility_window < 2 || self.momentum_window < 2 {
            return Err(invalid(
                "volatility_window and momentum_window must be at least 2".to_string(),
            ));
        }
        if self.min_ticks_for_prediction == 0 {
            return Err(invalid("min_ticks_for_prediction must be positive".to_string()));
        }
        if self.buffer_capacity < self.min_ticks_for_prediction {
            return Err(invalid(format!(
                "buffer_capacity ({}) must hold min_ticks_for_prediction ({})",
                self.buffer_capacity, self.min_ticks_for_prediction
            )));
        }
        if !(self.flat_deadband_pct.is_finite() && self.flat_deadband_pct >= 0.0) {
            return Err(invalid(format!(
                "flat_deadband_pct must be finite and non-negative, got {}",
                self.flat_deadband_pct
            )));
        }
        if self.recent_window == 0 {
            return Err(invalid("recent_window must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

/// How a runner drives an engine from a tick source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Generate a prediction after every N ingested ticks
    #[serde(default = "default_predict_every")]
    pub predict_every: usize,
    /// Fixed horizon override; `None` uses the engine's adaptive horizon
    #[serde(default)]
    pub horizon_ms: Option<i64>,
}

const fn default_predict_every() -> usize {
    5
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            predict_every: default_predict_every(),
            horizon_ms: None,
        }
    }
}

/// Parameters of the synthetic random-walk feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_ticks")]
    pub ticks: usize,
    #[serde(default = "default_start_price")]
    pub start_price: f64,
    /// Mean per-tick return
    #[serde(default)]
    pub drift: f64,
    /// Std-dev of per-tick returns
    #[serde(default = "default_tick_volatility")]
    pub volatility: f64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: i64,
    #[serde(default = "default_base_volume")]
    pub base_volume: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_symbol() -> String {
    "BTCUSD".to_string()
}

const fn default_ticks() -> usize {
    2_000
}

const fn default_start_price() -> f64 {
    50_000.0
}

const fn default_tick_volatility() -> f64 {
    0.0008
}

const fn default_tick_interval_ms() -> i64 {
    250
}

const fn default_base_volume() -> f64 {
    1.0
}

const fn default_seed() -> u64 {
    42
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            ticks: default_ticks(),
            start_price: default_start_price(),
            drift: 0.0,
            volatility: default_tick_volatility(),
            tick_interval_ms: default_tick_interval_ms(),
            base_volume: default_base_volume(),
            seed: default_seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.min_horizon_ms, 1_000);
        assert_eq!(config.max_horizon_ms, 30_000);
        assert!((config.base_confidence - 50.0).abs() < f64::EPSILON);
        assert!((config.learning_rate - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.volatility_window, 50);
        assert_eq!(config.momentum_window, 20);
        assert_eq!(config.min_ticks_for_prediction, 10);
        assert_eq!(config.buffer_capacity, 500);
        assert_eq!(config.max_resolved_history, 100);
        assert_eq!(config.recent_window, 20);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_horizons() {
        let config = EngineConfig {
            min_horizon_ms: 5_000,
            max_horizon_ms: 1_000,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_horizon_ms"));
    }

    #[test]
    fn validate_rejects_initial_horizon_outside_bounds() {
        let config = EngineConfig {
            initial_horizon_ms: 60_000,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_learning_rate() {
        let config = EngineConfig {
            learning_rate: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_tiny_windows() {
        let config = EngineConfig {
            momentum_window: 1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_buffer_smaller_than_min_ticks() {
        let config = EngineConfig {
            buffer_capacity: 5,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"learning_rate":0.3}"#).unwrap();
        assert!((config.learning_rate - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.max_horizon_ms, 30_000);
    }

    #[test]
    fn app_config_default_sections() {
        let config = AppConfig::default();
        assert_eq!(config.runner.predict_every, 5);
        assert!(config.runner.horizon_ms.is_none());
        assert_eq!(config.simulation.symbol, "BTCUSD");
    }
}

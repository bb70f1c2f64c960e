//! Realized volatility of tick-to-tick returns.

use tick_oracle_core::{Tick, VolatilityState};

/// Per-tick returns `(p[i] - p[i-1]) / p[i-1]`, skipping pairs whose base
/// price cannot be divided by.
#[must_use]
pub fn returns(ticks: &[Tick]) -> Vec<f64> {
    ticks
        .windows(2)
        .filter(|pair| pair[0].has_valid_price())
        .map(|pair| (pair[1].price - pair[0].price) / pair[0].price)
        .filter(|r| r.is_finite())
        .collect()
}

/// Population standard deviation of per-tick returns.
///
/// Returns 0 with fewer than two ticks.
#[must_use]
pub fn volatility(ticks: &[Tick]) -> f64 {
    if ticks.len() < 2 {
        return 0.0;
    }
    let returns = returns(ticks);
    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Maps a raw volatility value to its regime.
#[must_use]
pub fn classify(volatility: f64) -> VolatilityState {
    VolatilityState::classify(volatility)
}

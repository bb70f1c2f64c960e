//! Pure signal extractors over a tick window.
//!
//! Every extractor returns a neutral value (0) when its window holds too few
//! ticks, so callers never need to special-case a cold buffer.

mod micro_trend;
mod momentum;
mod volatility;
mod volume;

pub use micro_trend::{micro_trend, MICRO_TREND_TICKS};
pub use momentum::momentum;
pub use volatility::{classify, returns, volatility};
pub use volume::{volume_signal, SPIKE_RATIO, SPIKE_SIGNAL, VOLUME_TICKS};

use crate::buffer::TickBuffer;
use serde::{Deserialize, Serialize};
use tick_oracle_core::{EngineConfig, VolatilityState};

/// Window lengths used when extracting a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalWindows {
    pub momentum: usize,
    pub volatility: usize,
}

impl Default for SignalWindows {
    fn default() -> Self {
        Self {
            momentum: 20,
            volatility: 50,
        }
    }
}

impl From<&EngineConfig> for SignalWindows {
    fn from(config: &EngineConfig) -> Self {
        Self {
            momentum: config.momentum_window,
            volatility: config.volatility_window,
        }
    }
}

/// All four signals read from one buffer state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub momentum: f64,
    pub volatility: f64,
    pub micro_trend: f64,
    pub volume: f64,
}

/// Regime of the newest `window` ticks.
///
/// Returns `None` while fewer than two ticks are buffered, leaving the
/// caller's current regime in place.
#[must_use]
pub fn volatility_regime(buffer: &TickBuffer, window: usize) -> Option<VolatilityState> {
    if buffer.len() < 2 {
        return None;
    }
    Some(classify(volatility(&buffer.window(window))))
}

impl SignalSnapshot {
    /// Extracts every signal from the buffer. Read-only.
    #[must_use]
    pub fn extract(buffer: &TickBuffer, windows: SignalWindows) -> Self {
        let longest = windows
            .momentum
            .max(windows.volatility)
            .max(MICRO_TREND_TICKS)
            .max(VOLUME_TICKS);
        let ticks = buffer.window(longest);
        let tail = |n: usize| &ticks[ticks.len().saturating_sub(n)..];

        let snapshot = Self {
            momentum: momentum(tail(windows.momentum)),
            volatility: volatility(tail(windows.volatility)),
            micro_trend: micro_trend(tail(MICRO_TREND_TICKS)),
            volume: volume_signal(tail(VOLUME_TICKS)),
        };
        tracing::trace!(?snapshot, ticks = ticks.len(), "Signals extracted");
        snapshot
    }
}

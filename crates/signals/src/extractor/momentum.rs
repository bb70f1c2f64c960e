//! Price momentum over the momentum window.

use tick_oracle_core::Tick;

/// Percent change that saturates the momentum signal.
const MOMENTUM_SCALE: f64 = 100.0;

/// Normalized momentum in [-1, 1].
///
/// `(last - first) / first`, scaled by 100 and clamped, so a 1% move over the
/// window saturates the signal. Fewer than two ticks, or a non-positive first
/// price, yields 0.
#[must_use]
pub fn momentum(ticks: &[Tick]) -> f64 {
    let (Some(first), Some(last)) = (ticks.first(), ticks.last()) else {
        return 0.0;
    };
    if ticks.len() < 2 || !first.has_valid_price() {
        return 0.0;
    }

    let change = (last.price - first.price) / first.price;
    if !change.is_finite() {
        return 0.0;
    }
    (change * MOMENTUM_SCALE).clamp(-1.0, 1.0)
}

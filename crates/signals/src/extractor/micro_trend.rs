//! Direction count over the last few ticks.

use tick_oracle_core::Tick;

/// Ticks inspected by the micro-trend signal.
pub const MICRO_TREND_TICKS: usize = 5;

/// `(ups - downs) / 4` over the last five ticks, in [-1, 1].
///
/// Only strictly increasing or decreasing consecutive pairs count. Fewer than
/// five ticks yields 0.
#[must_use]
pub fn micro_trend(ticks: &[Tick]) -> f64 {
    if ticks.len() < MICRO_TREND_TICKS {
        return 0.0;
    }
    let recent = &ticks[ticks.len() - MICRO_TREND_TICKS..];

    let (ups, downs) = recent
        .windows(2)
        .fold((0_i32, 0_i32), |(ups, downs), pair| {
            if pair[1].price > pair[0].price {
                (ups + 1, downs)
            } else if pair[1].price < pair[0].price {
                (ups, downs + 1)
            } else {
                (ups, downs)
            }
        });

    f64::from(ups - downs) / (MICRO_TREND_TICKS - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(prices: &[f64]) -> Vec<Tick> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Tick::new(p, 1.0, i as i64 * 100))
            .collect()
    }

    #[test]
    fn micro_trend_needs_five_ticks() {
        assert!(micro_trend(&ticks(&[1.0, 2.0, 3.0, 4.0])).abs() < f64::EPSILON);
    }

    #[test]
    fn micro_trend_all_up_is_one() {
        let t = micro_trend(&ticks(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        assert!((t - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn micro_trend_all_down_is_minus_one() {
        let t = micro_trend(&ticks(&[5.0, 4.0, 3.0, 2.0, 1.0]));
        assert!((t + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn micro_trend_ignores_flat_pairs() {
        // up, flat, flat, up => 2/4
        let t = micro_trend(&ticks(&[1.0, 2.0, 2.0, 2.0, 3.0]));
        assert!((t - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn micro_trend_uses_only_last_five() {
        // Early decline is outside the window
        let t = micro_trend(&ticks(&[9.0, 8.0, 7.0, 1.0, 2.0, 3.0, 4.0, 5.0]));
        assert!((t - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn micro_trend_oscillation_cancels() {
        let t = micro_trend(&ticks(&[1.0, 2.0, 1.0, 2.0, 1.0]));
        assert!(t.abs() < f64::EPSILON);
    }
}

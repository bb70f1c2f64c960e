//! Volume spike detection.

use tick_oracle_core::Tick;

/// Ticks used for the average volume.
pub const VOLUME_TICKS: usize = 10;
/// Latest volume must exceed the average by this factor to count as a spike.
pub const SPIKE_RATIO: f64 = 1.5;
/// Magnitude of the signal emitted on a spike.
pub const SPIKE_SIGNAL: f64 = 0.5;

/// ±0.5 when the latest volume spikes above the 10-tick average, signed by
/// the latest price change; 0 otherwise or with fewer than ten ticks.
#[must_use]
pub fn volume_signal(ticks: &[Tick]) -> f64 {
    if ticks.len() < VOLUME_TICKS {
        return 0.0;
    }
    let recent = &ticks[ticks.len() - VOLUME_TICKS..];

    let avg_volume = recent.iter().map(|t| t.volume).sum::<f64>() / VOLUME_TICKS as f64;
    if !avg_volume.is_finite() || avg_volume <= 0.0 {
        return 0.0;
    }

    let latest = &recent[VOLUME_TICKS - 1];
    if latest.volume <= avg_volume * SPIKE_RATIO {
        return 0.0;
    }

    let previous = &recent[VOLUME_TICKS - 2];
    let price_change = latest.price - previous.price;
    if price_change > 0.0 {
        SPIKE_SIGNAL
    } else if price_change < 0.0 {
        -SPIKE_SIGNAL
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(data: &[(f64, f64)]) -> Vec<Tick> {
        data.iter()
            .enumerate()
            .map(|(i, &(p, v))| Tick::new(p, v, i as i64 * 100))
            .collect()
    }

    fn flat_volume_then(last: (f64, f64)) -> Vec<Tick> {
        let mut data: Vec<(f64, f64)> = (0..9).map(|_| (100.0, 1.0)).collect();
        data.push(last);
        ticks(&data)
    }

    #[test]
    fn volume_signal_needs_ten_ticks() {
        let data: Vec<(f64, f64)> = (0..9).map(|i| (100.0 + f64::from(i), 10.0)).collect();
        assert!(volume_signal(&ticks(&data)).abs() < f64::EPSILON);
    }

    #[test]
    fn volume_spike_with_rising_price_is_positive() {
        let signal = volume_signal(&flat_volume_then((101.0, 10.0)));
        assert!((signal - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn volume_spike_with_falling_price_is_negative() {
        let signal = volume_signal(&flat_volume_then((99.0, 10.0)));
        assert!((signal + 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn volume_spike_with_unchanged_price_is_zero() {
        let signal = volume_signal(&flat_volume_then((100.0, 10.0)));
        assert!(signal.abs() < f64::EPSILON);
    }

    #[test]
    fn constant_volume_is_zero() {
        let signal = volume_signal(&flat_volume_then((101.0, 1.0)));
        assert!(signal.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_volume_is_neutral() {
        let signal = volume_signal(&ticks(&[(100.0, 0.0); 10]));
        assert!(signal.abs() < f64::EPSILON);
    }
}

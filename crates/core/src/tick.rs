//! Market tick type shared by feeds, buffers, and the engine.

use crate::error::TickError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped market observation.
///
/// Ticks are immutable once created and ordered by arrival. Timestamps are
/// epoch milliseconds as delivered by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Last traded (or mid) price
    pub price: f64,
    /// Traded volume attributed to this tick
    pub volume: f64,
    /// Epoch milliseconds
    pub timestamp_ms: i64,
    /// Best bid, when the feed provides quotes
    #[serde(default)]
    pub bid: Option<f64>,
    /// Best ask, when the feed provides quotes
    #[serde(default)]
    pub ask: Option<f64>,
}

impl Tick {
    /// Creates a tick without quotes and without validation.
    ///
    /// Use [`Tick::try_new`] for data arriving from an untrusted feed.
    #[must_use]
    pub const fn new(price: f64, volume: f64, timestamp_ms: i64) -> Self {
        Self {
            price,
            volume,
            timestamp_ms,
            bid: None,
            ask: None,
        }
    }

    /// Creates a tick, rejecting values that violate the feed contract.
    ///
    /// # Errors
    /// Returns error if price is not finite and positive, or volume is not
    /// finite and non-negative.
    pub fn try_new(price: f64, volume: f64, timestamp_ms: i64) -> Result<Self, TickError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(TickError::InvalidPrice(price));
        }
        if !volume.is_finite() || volume < 0.0 {
            return Err(TickError::InvalidVolume(volume));
        }
        Ok(Self::new(price, volume, timestamp_ms))
    }

    /// Attaches best bid/ask quotes.
    ///
    /// # Errors
    /// Returns error if either quote is not finite and positive.
    pub fn with_quotes(mut self, bid: f64, ask: f64) -> Result<Self, TickError> {
        for quote in [bid, ask] {
            if !quote.is_finite() || quote <= 0.0 {
                return Err(TickError::InvalidQuote(quote));
            }
        }
        self.bid = Some(bid);
        self.ask = Some(ask);
        Ok(self)
    }

    /// Returns true if the price can safely be used as a divisor.
    #[must_use]
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    /// Mid price from the quotes, if both sides are present.
    #[must_use]
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// Quoted spread (ask - bid), if both sides are present.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Timestamp as a UTC datetime, if representable.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }
}

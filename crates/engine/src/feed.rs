//! Tick sources for driving an engine.
//!
//! - [`CsvTickSource`] replays recorded ticks from a file.
//! - [`SyntheticTickSource`] generates a seeded random walk.
//! - [`VecTickSource`] serves ticks from memory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use tick_oracle_core::{SimulationConfig, Tick, TickError, TickSource};

/// In-memory tick source.
#[derive(Debug, Clone)]
pub struct VecTickSource {
    symbol: String,
    ticks: VecDeque<Tick>,
}

impl VecTickSource {
    #[must_use]
    pub fn new(symbol: impl Into<String>, ticks: Vec<Tick>) -> Self {
        Self {
            symbol: symbol.into(),
            ticks: ticks.into(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

#[async_trait]
impl TickSource for VecTickSource {
    async fn next_tick(&mut self) -> Result<Option<Tick>> {
        Ok(self.ticks.pop_front())
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// Replays ticks recorded as CSV with a `timestamp_ms,price,volume[,bid,ask]` header.
///
/// Rows are sorted by timestamp on load. Rows with invalid prices, volumes,
/// or quotes are skipped.
#[derive(Debug, Clone)]
pub struct CsvTickSource {
    inner: VecTickSource,
    skipped: usize,
}

impl CsvTickSource {
    /// Loads every tick from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened
    /// - A row cannot be parsed into numbers
    pub fn from_path(symbol: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open tick file {}", path.display()))?;
        Self::from_reader(symbol, file)
            .with_context(|| format!("Failed to read tick file {}", path.display()))
    }

    /// Loads every tick from any CSV reader.
    ///
    /// # Errors
    /// Returns an error if a row cannot be parsed into numbers.
    pub fn from_reader(symbol: impl Into<String>, reader: impl io::Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut ticks = Vec::new();
        let mut skipped = 0;

        for (line, result) in reader.deserialize::<Tick>().enumerate() {
            let row = result.with_context(|| format!("Malformed tick on data row {}", line + 1))?;
            match validate(row) {
                Ok(tick) => ticks.push(tick),
                Err(e) => {
                    tracing::warn!(row = line + 1, error = %e, "Skipping invalid tick");
                    skipped += 1;
                }
            }
        }

        ticks.sort_by_key(|t| t.timestamp_ms);
        tracing::info!(ticks = ticks.len(), skipped, "Loaded tick file");

        Ok(Self {
            inner: VecTickSource::new(symbol, ticks),
            skipped,
        })
    }

    /// Rows rejected while loading.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

fn validate(row: Tick) -> Result<Tick, TickError> {
    let tick = Tick::try_new(row.price, row.volume, row.timestamp_ms)?;
    match (row.bid, row.ask) {
        (Some(bid), Some(ask)) => tick.with_quotes(bid, ask),
        _ => Ok(tick),
    }
}

#[async_trait]
impl TickSource for CsvTickSource {
    async fn next_tick(&mut self) -> Result<Option<Tick>> {
        self.inner.next_tick().await
    }

    fn symbol(&self) -> &str {
        self.inner.symbol()
    }
}

/// Probability that a synthetic tick carries a volume spike.
const VOLUME_SPIKE_PROBABILITY: f64 = 0.05;
const VOLUME_SPIKE_FACTOR: f64 = 3.0;
/// Half-spread of synthetic quotes as a fraction of price.
const HALF_SPREAD: f64 = 0.00005;
/// Synthetic prices never fall below this fraction of the start price.
const PRICE_FLOOR_FRACTION: f64 = 0.01;

/// Seeded geometric random walk. The same seed always yields the same ticks.
#[derive(Debug, Clone)]
pub struct SyntheticTickSource {
    config: SimulationConfig,
    rng: ChaCha8Rng,
    price: f64,
    timestamp_ms: i64,
    emitted: usize,
}

impl SyntheticTickSource {
    /// Creates a walk starting at `config.start_price`, with the first tick
    /// stamped `start_ms`.
    #[must_use]
    pub fn new(config: SimulationConfig, start_ms: i64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            price: config.start_price,
            timestamp_ms: start_ms,
            emitted: 0,
            config,
        }
    }

    /// Standard normal sample via Box-Muller.
    fn gaussian(&mut self) -> f64 {
        let u1: f64 = 1.0 - self.rng.gen::<f64>();
        let u2: f64 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    fn step(&mut self) -> Tick {
        if self.emitted > 0 {
            let shock = self.config.drift + self.config.volatility * self.gaussian();
            let floor = self.config.start_price * PRICE_FLOOR_FRACTION;
            self.price = (self.price * (1.0 + shock)).max(floor);
            self.timestamp_ms += self.config.tick_interval_ms.max(1);
        }

        let mut volume = self.config.base_volume * (0.5 + self.rng.gen::<f64>());
        if self.rng.gen_bool(VOLUME_SPIKE_PROBABILITY) {
            volume *= VOLUME_SPIKE_FACTOR;
        }

        self.emitted += 1;
        let half_spread = self.price * HALF_SPREAD;
        Tick {
            price: self.price,
            volume,
            timestamp_ms: self.timestamp_ms,
            bid: Some(self.price - half_spread),
            ask: Some(self.price + half_spread),
        }
    }
}

#[async_trait]
impl TickSource for SyntheticTickSource {
    async fn next_tick(&mut self) -> Result<Option<Tick>> {
        if self.emitted >= self.config.ticks {
            return Ok(None);
        }
        Ok(Some(self.step()))
    }

    fn symbol(&self) -> &str {
        &self.config.symbol
    }
}

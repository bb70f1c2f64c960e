use crate::tick::Tick;
use anyhow::Result;
use async_trait::async_trait;

/// Feed adapter supplying ticks for one symbol at its own cadence.
///
/// Timestamps should be monotonic non-decreasing; the engine does not
/// reorder ticks.
#[async_trait]
pub trait TickSource: Send + Sync {
    /// Returns the next tick, or `None` once the feed is exhausted.
    async fn next_tick(&mut self) -> Result<Option<Tick>>;

    fn symbol(&self) -> &str;
}

/// Optional cross-asset collaborator contributing a confidence multiplier
/// derived from correlated markets.
pub trait CrossAssetSignal: Send + Sync {
    /// Multiplier applied to forecast confidence for `symbol`, if any.
    fn confidence_multiplier(&self, symbol: &str) -> Option<f64>;

    fn name(&self) -> &str;
}

use crate::actor::EngineActor;
use crate::engine::PredictionEngine;
use crate::handle::EngineHandle;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tick_oracle_core::EngineConfig;
use tokio::sync::RwLock;

/// Running engines keyed by symbol. One engine per symbol, never shared.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    engines: Arc<RwLock<HashMap<String, EngineHandle>>>,
}

impl EngineRegistry {
    /// Creates an empty engine registry.
    ///
    /// # Returns
    /// A new `EngineRegistry` with no engines running.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and spawns an engine for `symbol`.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Market the engine forecasts
    /// * `config` - Engine tunables, validated before the actor starts
    ///
    /// # Returns
    /// A handle to the newly running engine.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or a replaced engine
    /// cannot be shut down.
    pub async fn spawn_engine(
        &self,
        symbol: impl Into<String>,
        config: EngineConfig,
    ) -> Result<EngineHandle> {
        let engine = PredictionEngine::new(symbol, config)?;
        self.spawn(engine).await
    }

    /// Spawns an actor for a prebuilt engine, replacing any engine already
    /// registered under the same symbol.
    ///
    /// # Arguments
    ///
    /// * `engine` - Engine to move into the actor, e.g. one carrying a
    ///   cross-asset collaborator
    ///
    /// # Returns
    /// A handle to the newly running engine.
    ///
    /// # Errors
    /// Returns an error if the replaced engine cannot be shut down.
    pub async fn spawn(&self, engine: PredictionEngine) -> Result<EngineHandle> {
        let symbol = engine.symbol().to_string();
        let handle = EngineActor::spawn(engine);

        let previous = self
            .engines
            .write()
            .await
            .insert(symbol.clone(), handle.clone());
        if let Some(previous) = previous {
            tracing::info!(symbol = %symbol, "Replacing running engine");
            if previous.is_running() {
                previous.shutdown().await?;
            }
        }

        Ok(handle)
    }

    /// Looks up the running engine for `symbol`.
    ///
    /// # Returns
    /// A cloned handle, or `None` if no engine is registered for `symbol`.
    #[must_use]
    pub async fn get(&self, symbol: &str) -> Option<EngineHandle> {
        self.engines.read().await.get(symbol).cloned()
    }

    /// Removes and shuts down the engine for `symbol`.
    ///
    /// # Errors
    /// Returns an error if the engine cannot be shut down.
    pub async fn remove(&self, symbol: &str) -> Result<()> {
        let removed = self.engines.write().await.remove(symbol);
        if let Some(handle) = removed {
            handle.shutdown().await?;
        }
        Ok(())
    }

    /// Registered symbols, sorted.
    #[must_use]
    pub async fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.engines.read().await.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Shuts down every registered engine.
    ///
    /// # Errors
    /// Returns an error if any engine shutdown fails.
    pub async fn shutdown_all(&self) -> Result<()> {
        let handles: Vec<EngineHandle> = self.engines.write().await.drain().map(|(_, h)| h).collect();
        for handle in handles {
            if handle.is_running() {
                handle.shutdown().await?;
            }
        }
        Ok(())
    }
}

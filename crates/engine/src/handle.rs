use crate::commands::EngineCommand;
use crate::learning::LearningState;
use anyhow::Result;
use tick_oracle_core::{EngineError, EngineEvent, Prediction, PredictionStats, Tick};
use tokio::sync::{broadcast, mpsc, oneshot};

/// Cloneable front end of a running [`EngineActor`](crate::actor::EngineActor).
#[derive(Clone, Debug)]
pub struct EngineHandle {
    symbol: String,
    tx: mpsc::Sender<EngineCommand>,
    event_tx: broadcast::Sender<EngineEvent>,
}

impl EngineHandle {
    /// Creates a handle over an actor's channels.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Symbol of the engine behind the actor
    /// * `tx` - Sender half of the actor's command queue
    /// * `event_tx` - Event broadcaster, used to hand out subscriptions
    ///
    /// # Returns
    /// A new `EngineHandle`. Usually obtained from
    /// [`EngineActor::spawn`](crate::actor::EngineActor::spawn) instead.
    #[must_use]
    pub const fn new(
        symbol: String,
        tx: mpsc::Sender<EngineCommand>,
        event_tx: broadcast::Sender<EngineEvent>,
    ) -> Self {
        Self {
            symbol,
            tx,
            event_tx,
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Receives created, resolved, and reset events from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Returns true while the actor is still accepting commands.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    async fn send(&self, cmd: EngineCommand) -> Result<(), EngineError> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| EngineError::Unavailable(self.symbol.clone()))
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> EngineCommand + Send,
    ) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await?;
        rx.await
            .map_err(|_| EngineError::Unavailable(self.symbol.clone()))
    }

    /// Ingests a tick and returns the predictions it resolved.
    ///
    /// # Errors
    /// Returns an error if the actor has stopped.
    pub async fn process_tick(&self, tick: Tick) -> Result<Vec<Prediction>> {
        Ok(self
            .request(|reply| EngineCommand::ProcessTick { tick, reply })
            .await?)
    }

    /// Issues a forecast, optionally with a fixed horizon.
    ///
    /// # Errors
    /// Returns an error if the actor has stopped or the horizon is not positive.
    pub async fn generate_prediction(&self, horizon_ms: Option<i64>) -> Result<Option<Prediction>> {
        let result = self
            .request(|reply| EngineCommand::Generate { horizon_ms, reply })
            .await?;
        Ok(result?)
    }

    /// # Errors
    /// Returns an error if the actor has stopped.
    pub async fn state(&self) -> Result<LearningState> {
        Ok(self.request(EngineCommand::GetState).await?)
    }

    /// # Errors
    /// Returns an error if the actor has stopped.
    pub async fn stats(&self) -> Result<PredictionStats> {
        Ok(self.request(EngineCommand::GetStats).await?)
    }

    /// # Errors
    /// Returns an error if the actor has stopped.
    pub async fn pending_predictions(&self) -> Result<Vec<Prediction>> {
        Ok(self.request(EngineCommand::GetPending).await?)
    }

    /// # Errors
    /// Returns an error if the actor has stopped.
    pub async fn recent_predictions(&self, count: usize) -> Result<Vec<Prediction>> {
        Ok(self
            .request(|reply| EngineCommand::GetRecent { count, reply })
            .await?)
    }

    /// # Errors
    /// Returns an error if the actor has stopped.
    pub async fn tick_count(&self) -> Result<usize> {
        Ok(self.request(EngineCommand::GetTickCount).await?)
    }

    /// # Errors
    /// Returns an error if the actor has stopped.
    pub async fn latest_tick(&self) -> Result<Option<Tick>> {
        Ok(self.request(EngineCommand::GetLatestTick).await?)
    }

    /// # Errors
    /// Returns an error if the actor has stopped.
    pub async fn reset(&self) -> Result<()> {
        Ok(self.send(EngineCommand::Reset).await?)
    }

    /// Stops the actor after it drains commands queued before this one.
    ///
    /// # Errors
    /// Returns an error if the actor has already stopped.
    pub async fn shutdown(&self) -> Result<()> {
        Ok(self.send(EngineCommand::Shutdown).await?)
    }
}

//! Serialized access to one engine from many async callers.
//!
//! The actor owns its [`PredictionEngine`] and applies commands strictly in
//! arrival order, so the read-modify-write steps of resolution and learning
//! never interleave.

use crate::commands::EngineCommand;
use crate::engine::PredictionEngine;
use crate::handle::EngineHandle;
use tick_oracle_core::EngineEvent;
use tokio::sync::{broadcast, mpsc};

/// Capacity of the command queue per engine.
pub const COMMAND_BUFFER: usize = 32;
/// Events retained for slow subscribers before they lag.
pub const EVENT_BUFFER: usize = 256;

pub struct EngineActor {
    engine: PredictionEngine,
    rx: mpsc::Receiver<EngineCommand>,
    event_tx: broadcast::Sender<EngineEvent>,
}

impl EngineActor {
    /// Creates an actor around `engine` that serves commands from `rx`.
    ///
    /// # Arguments
    ///
    /// * `engine` - Engine owned exclusively by this actor
    /// * `rx` - Command queue fed by the engine's handles
    /// * `event_tx` - Broadcast channel for created, resolved and reset events
    ///
    /// # Returns
    /// An idle `EngineActor`; nothing is processed until [`Self::run`] is awaited.
    #[must_use]
    pub const fn new(
        engine: PredictionEngine,
        rx: mpsc::Receiver<EngineCommand>,
        event_tx: broadcast::Sender<EngineEvent>,
    ) -> Self {
        Self {
            engine,
            rx,
            event_tx,
        }
    }

    /// Spawns an actor for `engine` on the current runtime.
    ///
    /// # Returns
    /// A cloneable `EngineHandle` wired to the actor's command and event channels.
    #[must_use]
    pub fn spawn(engine: PredictionEngine) -> EngineHandle {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);
        let handle = EngineHandle::new(engine.symbol().to_string(), tx, event_tx.clone());

        let actor = Self::new(engine, rx, event_tx);
        tokio::spawn(actor.run());
        handle
    }

    /// Processes commands until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        let symbol = self.engine.symbol().to_string();
        tracing::info!(symbol = %symbol, "Engine actor started");

        while let Some(cmd) = self.rx.recv().await {
            match cmd {
                EngineCommand::ProcessTick { tick, reply } => {
                    let resolved = self.engine.process_tick(tick);
                    for prediction in &resolved {
                        self.publish(EngineEvent::PredictionResolved {
                            symbol: symbol.clone(),
                            prediction: prediction.clone(),
                        });
                    }
                    let _ = reply.send(resolved);
                }
                EngineCommand::Generate { horizon_ms, reply } => {
                    let result = self.engine.generate_prediction(horizon_ms);
                    if let Ok(Some(prediction)) = &result {
                        self.publish(EngineEvent::PredictionCreated {
                            symbol: symbol.clone(),
                            prediction: prediction.clone(),
                        });
                    }
                    let _ = reply.send(result);
                }
                EngineCommand::GetState(reply) => {
                    let _ = reply.send(self.engine.state());
                }
                EngineCommand::GetStats(reply) => {
                    let _ = reply.send(self.engine.stats());
                }
                EngineCommand::GetPending(reply) => {
                    let _ = reply.send(self.engine.pending_predictions());
                }
                EngineCommand::GetRecent { count, reply } => {
                    let _ = reply.send(self.engine.recent_predictions(count));
                }
                EngineCommand::GetTickCount(reply) => {
                    let _ = reply.send(self.engine.tick_count());
                }
                EngineCommand::GetLatestTick(reply) => {
                    let _ = reply.send(self.engine.latest_tick());
                }
                EngineCommand::Reset => {
                    self.engine.reset();
                    self.publish(EngineEvent::Reset {
                        symbol: symbol.clone(),
                    });
                }
                EngineCommand::Shutdown => {
                    tracing::info!(symbol = %symbol, "Engine actor shutting down");
                    break;
                }
            }
        }

        tracing::debug!(symbol = %symbol, "Engine actor stopped");
    }

    fn publish(&self, event: EngineEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

use crate::learning::LearningState;
use tick_oracle_core::{EngineError, Prediction, PredictionStats, Tick};
use tokio::sync::oneshot;

/// Messages accepted by an [`EngineActor`](crate::actor::EngineActor).
///
/// Queries carry a `oneshot` sender for the reply.
#[derive(Debug)]
pub enum EngineCommand {
    ProcessTick {
        tick: Tick,
        reply: oneshot::Sender<Vec<Prediction>>,
    },
    Generate {
        horizon_ms: Option<i64>,
        reply: oneshot::Sender<Result<Option<Prediction>, EngineError>>,
    },
    GetState(oneshot::Sender<LearningState>),
    GetStats(oneshot::Sender<PredictionStats>),
    GetPending(oneshot::Sender<Vec<Prediction>>),
    GetRecent {
        count: usize,
        reply: oneshot::Sender<Vec<Prediction>>,
    },
    GetTickCount(oneshot::Sender<usize>),
    GetLatestTick(oneshot::Sender<Option<Tick>>),
    Reset,
    Shutdown,
}

use crate::prediction::Prediction;
use serde::{Deserialize, Serialize};

/// Notifications published by a running engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineEvent {
    PredictionCreated {
        symbol: String,
        prediction: Prediction,
    },
    PredictionResolved {
        symbol: String,
        prediction: Prediction,
    },
    Reset {
        symbol: String,
    },
}

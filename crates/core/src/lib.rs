pub mod config;
pub mod config_loader;
pub mod error;
pub mod events;
pub mod prediction;
pub mod signal;
pub mod stats;
pub mod tick;
pub mod traits;

pub use config::{AppConfig, EngineConfig, RunnerConfig, SimulationConfig};
pub use config_loader::ConfigLoader;
pub use error::{ConfigError, EngineError, TickError};
pub use events::EngineEvent;
pub use prediction::{MultiLevelAccuracy, Prediction, PredictionId, PredictionStatus};
pub use signal::{Direction, VolatilityState};
pub use stats::{DirectionBreakdown, DirectionStats, PredictionStats};
pub use tick::Tick;
pub use traits::{CrossAssetSignal, TickSource};

pub mod buffer;
pub mod composite;
pub mod extractor;

pub use buffer::{TickBuffer, DEFAULT_CAPACITY};
pub use composite::{BlendedSignal, SignalWeights, DIRECTION_THRESHOLD};
pub use extractor::{
    classify, micro_trend, momentum, returns, volatility, volatility_regime, volume_signal,
    SignalSnapshot, SignalWindows,
};

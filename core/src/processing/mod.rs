pub mod analyzer;
pub mod rms;
pub mod rolling;
pub mod stage;

pub use analyzer::{analyze, analyze_multi_channel, Analyzer};
pub use rms::{rms, RmsEstimator};
pub use rolling::{MultiChannelRollingBuffer, RollingWindow, RollingWindowBuffer};
pub use stage::AnalysisStage;

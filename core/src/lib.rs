//! Time-domain dynamics of sampled signals: RMS amplitude and zero-crossing
//! rate over timestamped samples.
//!
//! RMS is taken over a window aligned to whole cycles of the fundamental,
//! which is itself estimated from the negative-going zero-crossing rate. A
//! fixed-capacity rolling window keeps the most recent samples of a stream
//! so they can be re-analyzed cheaply, and a recurrence-based sine generator
//! provides synthetic input.

pub mod generator;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod sample;
pub mod telemetry;

pub use generator::generate_sine_wave;
pub use math::{CrossingHelper, StatsHelper, WindowHelper};
pub use prelude::{
    AnalysisConfig, ChannelAnalysis, CrossingMode, ProcessingStage, StageError, StageInput,
    StageOutput, StageResult,
};
pub use processing::{
    analyze, analyze_multi_channel, rms, AnalysisStage, Analyzer, MultiChannelRollingBuffer,
    RmsEstimator, RollingWindowBuffer,
};
pub use sample::{MultiChannelSample, Sample};

use crate::sample::{span_seconds, MultiChannelSample, Sample};
use serde::{Deserialize, Serialize};

/// Default lower bound of whole cycles before the RMS window is cycle-aligned.
pub const DEFAULT_MIN_CYCLES: u32 = 1;
/// Default upper bound of whole cycles kept in the RMS window.
pub const DEFAULT_MAX_CYCLES: u32 = 1000;

/// Transitions counted when the zero-crossing rate doubles as a frequency estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrossingMode {
    /// Positive-to-negative transitions only (one per cycle).
    #[default]
    Negative,
    /// Every sign change (two per cycle).
    Full,
}

/// Shared configuration for the analysis stages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fewer whole cycles than this and RMS covers the entire sequence.
    pub min_cycles: u32,
    /// Cap on the number of trailing whole cycles used for RMS.
    pub max_cycles: u32,
    pub crossing_mode: CrossingMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_cycles: DEFAULT_MIN_CYCLES,
            max_cycles: DEFAULT_MAX_CYCLES,
            crossing_mode: CrossingMode::Negative,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> StageResult<()> {
        if self.min_cycles == 0 {
            return Err(StageError::InvalidInput(
                "min_cycles must be at least 1".into(),
            ));
        }
        if self.max_cycles < self.min_cycles {
            return Err(StageError::InvalidInput(format!(
                "max_cycles ({}) must not be below min_cycles ({})",
                self.max_cycles, self.min_cycles
            )));
        }
        Ok(())
    }
}

/// Input payload for a processing stage.
#[derive(Debug, Clone)]
pub enum StageInput {
    Single(Vec<Sample>),
    Multi(Vec<MultiChannelSample>),
}

impl StageInput {
    pub fn len(&self) -> usize {
        match self {
            StageInput::Single(samples) => samples.len(),
            StageInput::Multi(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seconds covered by the batch, `None` below two samples.
    pub fn span_seconds(&self) -> Option<f64> {
        match self {
            StageInput::Single(samples) => span_seconds(samples),
            StageInput::Multi(samples) if samples.len() > 1 => samples
                .first()
                .zip(samples.last())
                .map(|(first, last)| last.time - first.time),
            StageInput::Multi(_) => None,
        }
    }
}

/// RMS amplitude and zero-crossing rate of one channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ChannelAnalysis {
    pub rms: f64,
    pub zcr: f64,
}

impl ChannelAnalysis {
    pub fn new(rms: f64, zcr: f64) -> Self {
        Self { rms, zcr }
    }
}

/// Output produced by each stage.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub channels: Vec<ChannelAnalysis>,
    pub metadata: StageMetadata,
}

/// Metadata used for chaining stages and telemetry.
#[derive(Debug, Clone, Default)]
pub struct StageMetadata {
    pub sample_count: usize,
    pub span_seconds: Option<f64>,
    pub notes: Vec<String>,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("channel mismatch at sample {index}: expected {expected} channels, got {actual}")]
    ChannelMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing object-oriented signal-processing stages.
pub trait ProcessingStage {
    fn initialize(&mut self, config: &AnalysisConfig) -> StageResult<()>;
    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput>;
    fn cleanup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.min_cycles, 1);
        assert_eq!(config.max_cycles, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_inverted_cycle_bounds() {
        let config = AnalysisConfig {
            min_cycles: 10,
            max_cycles: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StageError::InvalidInput(_))
        ));

        let zero = AnalysisConfig {
            min_cycles: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn config_fills_missing_fields_from_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"crossing_mode":"full"}"#).unwrap();
        assert_eq!(config.crossing_mode, CrossingMode::Full);
        assert_eq!(config.max_cycles, DEFAULT_MAX_CYCLES);
    }

    #[test]
    fn input_span_matches_for_both_shapes() {
        let single = StageInput::Single(vec![Sample::new(0.5, 1.0), Sample::new(2.0, -1.0)]);
        let multi = StageInput::Multi(vec![
            MultiChannelSample::new(0.5, vec![1.0, 0.0]),
            MultiChannelSample::new(2.0, vec![-1.0, 0.0]),
        ]);
        assert_eq!(single.span_seconds(), Some(1.5));
        assert_eq!(multi.span_seconds(), Some(1.5));

        assert_eq!(StageInput::Single(vec![Sample::new(1.0, 0.0)]).span_seconds(), None);
        assert_eq!(
            StageInput::Multi(vec![MultiChannelSample::new(1.0, vec![0.0])]).span_seconds(),
            None
        );
        assert_eq!(StageInput::Multi(Vec::new()).span_seconds(), None);
    }
}

use crate::math::crossing::CrossingHelper;
use crate::prelude::{AnalysisConfig, ChannelAnalysis, CrossingMode, StageResult};
use crate::processing::rms::RmsEstimator;
use crate::sample::{deinterleave, MultiChannelSample, Sample};
use crate::telemetry::log::LogManager;

/// Pairs a zero-crossing frequency estimate with the cycle-aligned RMS it drives.
///
/// RMS quality therefore depends on the crossing rate being a fair estimate of
/// the fundamental; noisy signals that cross zero many times per cycle will
/// shrink the window accordingly.
#[derive(Debug, Clone)]
pub struct Analyzer {
    estimator: RmsEstimator,
    crossing_mode: CrossingMode,
    logger: LogManager,
}

impl Analyzer {
    pub fn new(config: &AnalysisConfig) -> StageResult<Self> {
        Ok(Self {
            estimator: RmsEstimator::new(config)?,
            crossing_mode: config.crossing_mode,
            logger: LogManager::new(),
        })
    }

    /// Crossing rate in the configured mode.
    pub fn zero_crossing_rate(&self, samples: &[Sample]) -> f64 {
        match self.crossing_mode {
            CrossingMode::Negative => CrossingHelper::negative_zero_crossing_rate(samples),
            CrossingMode::Full => CrossingHelper::zero_crossing_rate(samples),
        }
    }

    /// Fundamental frequency implied by a crossing rate in the configured mode.
    pub fn frequency_from_rate(&self, zcr: f64) -> f64 {
        match self.crossing_mode {
            CrossingMode::Negative => zcr,
            CrossingMode::Full => zcr / 2.0,
        }
    }

    pub fn analyze(&self, samples: &[Sample]) -> ChannelAnalysis {
        let zcr = self.zero_crossing_rate(samples);
        let rms = self
            .estimator
            .estimate(samples, self.frequency_from_rate(zcr));
        ChannelAnalysis::new(rms, zcr)
    }

    /// Analyzes every channel independently, returning results in channel order.
    pub fn analyze_multi_channel(
        &self,
        samples: &[MultiChannelSample],
    ) -> StageResult<Vec<ChannelAnalysis>> {
        let channels = deinterleave(samples)?;
        self.logger.detail(&format!(
            "analyzing {} channels over {} samples",
            channels.len(),
            samples.len()
        ));

        let results: Vec<ChannelAnalysis> = channels
            .iter()
            .map(|channel| self.analyze(channel))
            .collect();

        self.logger
            .detail(&format!("produced {} channel results", results.len()));
        Ok(results)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            estimator: RmsEstimator::default(),
            crossing_mode: CrossingMode::default(),
            logger: LogManager::new(),
        }
    }
}

/// Negative-going crossing rate and the RMS it implies, with default settings.
pub fn analyze(samples: &[Sample]) -> ChannelAnalysis {
    Analyzer::default().analyze(samples)
}

pub fn analyze_multi_channel(samples: &[MultiChannelSample]) -> StageResult<Vec<ChannelAnalysis>> {
    Analyzer::default().analyze_multi_channel(samples)
}

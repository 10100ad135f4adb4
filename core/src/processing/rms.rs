use crate::math::stats::StatsHelper;
use crate::math::window::WindowHelper;
use crate::prelude::{AnalysisConfig, StageResult};
use crate::sample::{span_seconds, Sample};

/// RMS over a window aligned to whole cycles of an estimated fundamental.
///
/// With fewer than `min_cycles` cycles of history the whole sequence is used;
/// otherwise the trailing `min(cycles, max_cycles)` periods are kept so a
/// partial cycle at either end cannot bias the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RmsEstimator {
    min_cycles: u32,
    max_cycles: u32,
}

impl RmsEstimator {
    pub fn new(config: &AnalysisConfig) -> StageResult<Self> {
        config.validate()?;
        Ok(Self {
            min_cycles: config.min_cycles,
            max_cycles: config.max_cycles,
        })
    }

    /// Selects the samples the estimate is computed over.
    ///
    /// Empty when `samples` is empty, `frequency` is zero, or the cycle count
    /// is undefined (NaN). A negative frequency never reaches a whole cycle, so
    /// it falls back to the full sequence; an infinite one narrows the window
    /// to the samples at the newest timestamp.
    pub fn analysis_window<'a>(&self, samples: &'a [Sample], frequency: f64) -> &'a [Sample] {
        if samples.is_empty() || frequency == 0.0 {
            return &samples[..0];
        }

        let period = 1.0 / frequency;
        let duration = span_seconds(samples).unwrap_or(0.0);
        let whole_cycles = (duration / period).floor();

        if whole_cycles.is_nan() {
            return &samples[..0];
        }
        if whole_cycles < self.min_cycles as f64 {
            return samples;
        }

        let cycles = whole_cycles.min(self.max_cycles as f64);
        WindowHelper::keep_x_seconds(samples, cycles * period)
    }

    pub fn estimate(&self, samples: &[Sample], frequency: f64) -> f64 {
        StatsHelper::rms(self.analysis_window(samples, frequency))
    }
}

impl Default for RmsEstimator {
    fn default() -> Self {
        let config = AnalysisConfig::default();
        Self {
            min_cycles: config.min_cycles,
            max_cycles: config.max_cycles,
        }
    }
}

/// RMS with the default cycle bounds.
pub fn rms(samples: &[Sample], frequency: f64) -> f64 {
    RmsEstimator::default().estimate(samples, frequency)
}

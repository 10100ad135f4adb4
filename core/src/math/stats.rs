use crate::sample::Sample;
use std::f64::consts::SQRT_2;

pub struct StatsHelper;

impl StatsHelper {
    /// Quadratic mean of the sample values; zero for an empty sequence.
    pub fn rms(samples: &[Sample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|s| s.value * s.value).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    /// RMS derived from the largest magnitude, exact only for a pure sinusoid.
    pub fn peak_rms(samples: &[Sample]) -> f64 {
        Self::peak(samples) / SQRT_2
    }

    pub fn peak(samples: &[Sample]) -> f64 {
        samples.iter().map(|s| s.value.abs()).fold(0.0, f64::max)
    }
}

use crate::prelude::{StageError, StageResult};
use crate::sample::Sample;
use std::f64::consts::PI;

/// Upper bound on a single generated sequence (about 2 GiB of samples).
pub const MAX_GENERATED_SAMPLES: usize = 1 << 27;

/// Generates `floor(duration * sample_rate)` samples of
/// `amplitude * sin(2π · frequency · t)` starting at `t = 0`.
///
/// Values come from the recurrence `y[n] = 2cos(ωΔt)·y[n-1] - y[n-2]` instead
/// of one `sin` call per sample. Rounding error accumulates slowly, which is
/// negligible for test-length signals but grows over very long runs.
pub fn generate_sine_wave(
    frequency: f64,
    amplitude: f64,
    duration: f64,
    sample_rate: u32,
) -> StageResult<Vec<Sample>> {
    if sample_rate == 0 {
        return Err(StageError::InvalidInput(
            "sample rate must be positive".into(),
        ));
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(StageError::InvalidInput(format!(
            "duration must be a non-negative number of seconds, got {}",
            duration
        )));
    }
    if !frequency.is_finite() || !amplitude.is_finite() {
        return Err(StageError::InvalidInput(
            "frequency and amplitude must be finite".into(),
        ));
    }

    let requested = (duration * sample_rate as f64).floor();
    if requested > MAX_GENERATED_SAMPLES as f64 {
        return Err(StageError::InvalidInput(format!(
            "{} s at {} Hz needs {} samples, limit is {}",
            duration, sample_rate, requested, MAX_GENERATED_SAMPLES
        )));
    }
    let sample_count = requested as usize;
    let time_step = 1.0 / sample_rate as f64;
    let angular_step = 2.0 * PI * frequency * time_step;
    let coefficient = 2.0 * angular_step.cos();

    let mut samples: Vec<Sample> = Vec::new();
    samples.try_reserve_exact(sample_count).map_err(|err| {
        StageError::InvalidInput(format!("cannot allocate {} samples: {}", sample_count, err))
    })?;
    for index in 0..sample_count {
        let value = match index {
            0 => 0.0,
            1 => amplitude * angular_step.sin(),
            _ => coefficient * samples[index - 1].value - samples[index - 2].value,
        };
        samples.push(Sample::new(index as f64 * time_step, value));
    }

    Ok(samples)
}

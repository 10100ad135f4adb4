use crate::sample::Sample;

pub struct WindowHelper;

impl WindowHelper {
    /// Returns the longest suffix whose first sample lies no earlier than
    /// `seconds` before the newest sample.
    ///
    /// Negative or NaN `seconds` is treated as zero, which keeps only the
    /// samples sharing the newest timestamp. The scan runs forward from the
    /// oldest sample since the cutoff usually sits near the start.
    pub fn keep_x_seconds(samples: &[Sample], seconds: f64) -> &[Sample] {
        let Some(last) = samples.last() else {
            return samples;
        };
        let seconds = if seconds > 0.0 { seconds } else { 0.0 };
        let cutoff = last.time - seconds;

        match samples.iter().position(|s| s.time >= cutoff) {
            Some(start) => &samples[start..],
            None => &samples[samples.len()..],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(count: usize, step: f64) -> Vec<Sample> {
        (0..count)
            .map(|i| Sample::new(i as f64 * step, i as f64))
            .collect()
    }

    #[test]
    fn empty_sequence_is_returned_unchanged() {
        assert!(WindowHelper::keep_x_seconds(&[], 1.0).is_empty());
    }

    #[test]
    fn keeps_suffix_starting_at_cutoff() {
        let data = ramp(11, 0.5);
        let kept = WindowHelper::keep_x_seconds(&data, 2.0);
        assert_eq!(kept.len(), 5);
        assert_eq!(kept[0].time, 3.0);
        assert_eq!(kept.last(), data.last());
    }

    #[test]
    fn longer_window_keeps_everything() {
        let data = ramp(4, 1.0);
        assert_eq!(WindowHelper::keep_x_seconds(&data, 100.0), &data[..]);
    }

    #[test]
    fn reapplying_same_window_is_idempotent() {
        let data = ramp(50, 0.01);
        let once = WindowHelper::keep_x_seconds(&data, 0.2);
        let twice = WindowHelper::keep_x_seconds(once, 0.2);
        assert_eq!(once, twice);
    }

    #[test]
    fn negative_and_nan_seconds_clamp_to_newest_timestamp() {
        let mut data = ramp(5, 1.0);
        data.push(Sample::new(4.0, 9.0));

        let kept = WindowHelper::keep_x_seconds(&data, -3.0);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|s| s.time == 4.0));

        assert_eq!(WindowHelper::keep_x_seconds(&data, f64::NAN).len(), 2);
    }
}

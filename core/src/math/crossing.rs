use crate::sample::{span_seconds, Sample};

/// Sign-transition counting over a sample sequence.
///
/// A value of exactly zero belongs to both the non-negative and the
/// non-positive side, so a sequence that merely touches zero can register a
/// crossing.
pub struct CrossingHelper;

impl CrossingHelper {
    /// Counts every `>= 0 -> < 0` and `<= 0 -> > 0` transition.
    pub fn count_crossings(samples: &[Sample]) -> usize {
        samples
            .windows(2)
            .filter(|pair| {
                let (prev, cur) = (pair[0].value, pair[1].value);
                (prev >= 0.0 && cur < 0.0) || (prev <= 0.0 && cur > 0.0)
            })
            .count()
    }

    /// Counts only `>= 0 -> < 0` transitions.
    pub fn count_negative_crossings(samples: &[Sample]) -> usize {
        samples
            .windows(2)
            .filter(|pair| pair[0].value >= 0.0 && pair[1].value < 0.0)
            .count()
    }

    /// Crossings per second over the whole sequence.
    pub fn zero_crossing_rate(samples: &[Sample]) -> f64 {
        Self::rate(Self::count_crossings(samples), samples)
    }

    /// Negative-going crossings per second over the whole sequence.
    pub fn negative_zero_crossing_rate(samples: &[Sample]) -> f64 {
        Self::rate(Self::count_negative_crossings(samples), samples)
    }

    // A span that is zero, negative or non-finite yields 0 rather than NaN/inf.
    fn rate(crossings: usize, samples: &[Sample]) -> f64 {
        match span_seconds(samples) {
            Some(span) if span > 0.0 && span.is_finite() => crossings as f64 / span,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64], step: f64) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(i as f64 * step, v))
            .collect()
    }

    #[test]
    fn short_sequences_have_zero_rate() {
        assert_eq!(CrossingHelper::zero_crossing_rate(&[]), 0.0);
        assert_eq!(
            CrossingHelper::negative_zero_crossing_rate(&[Sample::new(0.0, 1.0)]),
            0.0
        );
    }

    #[test]
    fn counts_all_and_negative_transitions() {
        let data = series(&[1.0, -1.0, 1.0, -1.0, 1.0], 0.25);
        assert_eq!(CrossingHelper::count_crossings(&data), 4);
        assert_eq!(CrossingHelper::count_negative_crossings(&data), 2);
        assert_eq!(CrossingHelper::zero_crossing_rate(&data), 4.0);
        assert_eq!(CrossingHelper::negative_zero_crossing_rate(&data), 2.0);
    }

    #[test]
    fn zero_valued_sample_counts_on_both_sides() {
        // 1 -> 0 is not a crossing, 0 -> -1 is; -1 -> 0 is not, 0 -> 1 is.
        let data = series(&[1.0, 0.0, -1.0, 0.0, 1.0], 1.0);
        assert_eq!(CrossingHelper::count_crossings(&data), 2);
        assert_eq!(CrossingHelper::count_negative_crossings(&data), 1);

        let run = series(&[-1.0, 0.0, 0.0, 1.0], 1.0);
        assert_eq!(CrossingHelper::count_crossings(&run), 1);

        // Touching zero without changing sign still registers.
        let touch = series(&[1.0, 0.0, 1.0], 1.0);
        assert_eq!(CrossingHelper::count_crossings(&touch), 1);
        let dip = series(&[-1.0, 0.0, -1.0], 1.0);
        assert_eq!(CrossingHelper::count_negative_crossings(&dip), 1);
    }

    #[test]
    fn zero_span_is_clamped_to_zero_rate() {
        let data = vec![Sample::new(2.0, 1.0), Sample::new(2.0, -1.0)];
        assert_eq!(CrossingHelper::count_negative_crossings(&data), 1);
        assert_eq!(CrossingHelper::negative_zero_crossing_rate(&data), 0.0);
        assert_eq!(CrossingHelper::zero_crossing_rate(&data), 0.0);
    }

    #[test]
    fn constant_zero_has_no_crossings() {
        let data = series(&[0.0; 16], 0.1);
        assert_eq!(CrossingHelper::zero_crossing_rate(&data), 0.0);
        assert_eq!(CrossingHelper::negative_zero_crossing_rate(&data), 0.0);
    }
}

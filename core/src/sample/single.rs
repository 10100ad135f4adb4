use serde::{Deserialize, Serialize};

/// One timestamped reading of a single channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Sample {
    /// Seconds, non-decreasing across a sequence.
    pub time: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Seconds between the oldest and newest sample, `None` below two samples.
pub fn span_seconds(samples: &[Sample]) -> Option<f64> {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) if samples.len() > 1 => Some(last.time - first.time),
        _ => None,
    }
}

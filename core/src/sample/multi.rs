use crate::prelude::{StageError, StageResult};
use crate::sample::single::Sample;
use serde::{Deserialize, Serialize};

/// One time-aligned reading across several channels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MultiChannelSample {
    pub time: f64,
    #[serde(rename = "value")]
    pub values: Vec<f64>,
}

impl MultiChannelSample {
    pub fn new(time: f64, values: Vec<f64>) -> Self {
        Self { time, values }
    }

    pub fn channel_count(&self) -> usize {
        self.values.len()
    }

    pub fn channel(&self, index: usize) -> Option<Sample> {
        self.values
            .get(index)
            .map(|&value| Sample::new(self.time, value))
    }
}

/// Splits a multi-channel sequence into one single-channel sequence per
/// channel, all sharing the original timestamps.
///
/// The first sample fixes the channel count; any later sample carrying a
/// different count is rejected. An empty sequence yields no channels.
pub fn deinterleave(samples: &[MultiChannelSample]) -> StageResult<Vec<Vec<Sample>>> {
    let Some(first) = samples.first() else {
        return Ok(Vec::new());
    };
    let channel_count = first.channel_count();

    let mut channels: Vec<Vec<Sample>> = (0..channel_count)
        .map(|_| Vec::with_capacity(samples.len()))
        .collect();

    for (index, sample) in samples.iter().enumerate() {
        if sample.channel_count() != channel_count {
            return Err(StageError::ChannelMismatch {
                index,
                expected: channel_count,
                actual: sample.channel_count(),
            });
        }
        for (channel, &value) in channels.iter_mut().zip(&sample.values) {
            channel.push(Sample::new(sample.time, value));
        }
    }

    Ok(channels)
}

/// Zips equally long single-channel sequences into a multi-channel one,
/// taking timestamps from the first channel.
pub fn interleave(channels: &[Vec<Sample>]) -> StageResult<Vec<MultiChannelSample>> {
    let Some(reference) = channels.first() else {
        return Ok(Vec::new());
    };

    if let Some((index, channel)) = channels
        .iter()
        .enumerate()
        .find(|(_, channel)| channel.len() != reference.len())
    {
        return Err(StageError::InvalidInput(format!(
            "channel {} has {} samples, expected {}",
            index,
            channel.len(),
            reference.len()
        )));
    }

    Ok(reference
        .iter()
        .enumerate()
        .map(|(row, sample)| {
            let values = channels.iter().map(|channel| channel[row].value).collect();
            MultiChannelSample::new(sample.time, values)
        })
        .collect())
}

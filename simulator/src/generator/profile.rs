use anyhow::{ensure, Context};
use dynamics::sample::interleave;
use dynamics::{generate_sine_wave, MultiChannelSample, Sample};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One synthetic channel: a pure tone before jitter is added.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChannelProfile {
    pub frequency: f64,
    pub amplitude: f64,
}

impl ChannelProfile {
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }
}

/// Configuration for generating synthetic multi-channel signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub channels: Vec<ChannelProfile>,
    pub duration: f64,
    pub sample_rate: u32,
    /// Half-width of the uniform jitter added to every value.
    pub noise: f64,
    pub seed: u64,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            channels: vec![ChannelProfile::new(440.0, 1.0)],
            duration: 1.0,
            sample_rate: 1000,
            noise: 0.0,
            seed: 0,
            description: None,
        }
    }
}

/// Generated samples plus the description they were built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalPayload {
    pub samples: Vec<MultiChannelSample>,
    pub sample_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SignalPayload {
    pub fn channel_count(&self) -> usize {
        self.samples
            .first()
            .map(MultiChannelSample::channel_count)
            .unwrap_or(0)
    }
}

fn build_channel(
    profile: &ChannelProfile,
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> anyhow::Result<Vec<Sample>> {
    let mut samples = generate_sine_wave(
        profile.frequency,
        profile.amplitude,
        config.duration,
        config.sample_rate,
    )
    .with_context(|| format!("generating {} Hz channel", profile.frequency))?;

    if config.noise > 0.0 {
        for sample in samples.iter_mut() {
            sample.value += rng.gen_range(-config.noise..config.noise);
        }
    }

    Ok(samples)
}

pub fn build_payload_from_config(config: &GeneratorConfig) -> anyhow::Result<SignalPayload> {
    ensure!(
        !config.channels.is_empty(),
        "generator needs at least one channel"
    );
    ensure!(
        config.noise.is_finite() && config.noise >= 0.0,
        "noise must be a non-negative number, got {}",
        config.noise
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let channels = config
        .channels
        .iter()
        .map(|profile| build_channel(profile, config, &mut rng))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let samples = interleave(&channels).context("interleaving generated channels")?;

    Ok(SignalPayload {
        samples,
        sample_rate: config.sample_rate,
        description: config.description.clone(),
    })
}

#[cfg(test)]
pub fn build_payload(
    channels: Vec<ChannelProfile>,
    duration: f64,
    sample_rate: u32,
) -> anyhow::Result<SignalPayload> {
    let config = GeneratorConfig {
        channels,
        duration,
        sample_rate,
        ..Default::default()
    };
    build_payload_from_config(&config)
}

use crate::generator::profile::{ChannelProfile, GeneratorConfig};
use anyhow::{ensure, Context};
use dynamics::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub generator: GeneratorConfig,
    pub analysis: AnalysisConfig,
    /// Samples retained by the rolling window in streaming mode.
    pub buffer_capacity: usize,
    /// Analyze the rolling window after this many samples.
    pub report_every: usize,
    pub bridge_port: u16,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            analysis: AnalysisConfig::default(),
            buffer_capacity: 1000,
            report_every: 100,
            bridge_port: 9000,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Pairs each frequency with the amplitude at the same position; missing
    /// amplitudes default to 1.
    pub fn from_args(
        frequencies: &[f64],
        amplitudes: &[f64],
        duration: f64,
        sample_rate: u32,
        buffer_capacity: usize,
        report_every: usize,
    ) -> Self {
        let channels = frequencies
            .iter()
            .enumerate()
            .map(|(index, &frequency)| {
                ChannelProfile::new(frequency, amplitudes.get(index).copied().unwrap_or(1.0))
            })
            .collect();

        Self {
            generator: GeneratorConfig {
                channels,
                duration,
                sample_rate,
                ..Default::default()
            },
            buffer_capacity,
            report_every,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.analysis.validate()?;
        ensure!(self.buffer_capacity > 0, "buffer_capacity must be positive");
        ensure!(self.report_every > 0, "report_every must be positive");
        ensure!(
            !self.generator.channels.is_empty(),
            "at least one generator channel is required"
        );
        Ok(())
    }
}

use crate::generator::profile::SignalPayload;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use dynamics::prelude::{ChannelAnalysis, ProcessingStage, StageInput};
use dynamics::processing::{AnalysisStage, Analyzer, MultiChannelRollingBuffer};
use dynamics::telemetry::{MetricsRecorder, MetricsSnapshot};
use log::debug;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub channels: Vec<ChannelAnalysis>,
    pub sample_count: usize,
    pub span_seconds: Option<f64>,
    pub notes: Vec<String>,
}

/// Rolling-window analysis taken while streaming.
#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    pub tick: usize,
    pub time: f64,
    pub window_len: usize,
    pub channels: Vec<ChannelAnalysis>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Accounts for samples pushed into a live window and analyzed outside
    /// the runner.
    pub fn record_live(&self, samples: usize) {
        self.metrics.record_samples(samples);
        self.metrics.record_analysis();
    }

    /// Analyzes a whole batch at once.
    pub fn execute(&self, input: StageInput) -> anyhow::Result<WorkflowResult> {
        let sample_count = input.len();
        self.metrics.record_samples(sample_count);

        let mut stage = AnalysisStage::new();
        stage
            .initialize(&self.config.analysis)
            .context("initializing analysis stage")?;
        let output = match stage.execute(input) {
            Ok(output) => output,
            Err(err) => {
                self.metrics.record_rejected();
                return Err(err).context("executing analysis stage");
            }
        };
        stage.cleanup();
        self.metrics.record_analysis();

        Ok(WorkflowResult {
            channels: output.channels,
            sample_count,
            span_seconds: output.metadata.span_seconds,
            notes: output.metadata.notes,
        })
    }

    pub fn execute_payload(&self, payload: &SignalPayload) -> anyhow::Result<WorkflowResult> {
        self.execute(StageInput::Multi(payload.samples.clone()))
    }

    /// Replays the payload one sample at a time through a rolling window and
    /// analyzes the window every `report_every` samples.
    pub fn stream(&self, payload: &SignalPayload) -> anyhow::Result<Vec<StreamReport>> {
        let analyzer = Analyzer::new(&self.config.analysis).context("building analyzer")?;
        let mut buffer = MultiChannelRollingBuffer::with_capacity(self.config.buffer_capacity)
            .context("allocating rolling window")?;
        let mut reports = Vec::new();

        for (tick, sample) in payload.samples.iter().enumerate() {
            let time = sample.time;
            buffer.update(sample.clone());
            self.metrics.record_samples(1);

            if (tick + 1) % self.config.report_every == 0 {
                let channels = buffer
                    .analyze_with(&analyzer)
                    .with_context(|| format!("analyzing rolling window at tick {}", tick))?;
                self.metrics.record_analysis();
                debug!(
                    "tick {} window {} -> {:?}",
                    tick,
                    buffer.len(),
                    channels
                );
                reports.push(StreamReport {
                    tick,
                    time,
                    window_len: buffer.len(),
                    channels,
                });
            }
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_payload, ChannelProfile};
    use dynamics::{MultiChannelSample, Sample};

    #[test]
    fn runner_executes_batch_analysis() {
        let cfg = WorkflowConfig::from_args(&[440.0, 150.0], &[1.0, 2.0], 1.0, 2000, 1000, 100);
        let runner = Runner::new(cfg.clone());
        let payload = build_payload(cfg.generator.channels.clone(), 1.0, 2000).unwrap();

        let result = runner.execute_payload(&payload).unwrap();
        assert_eq!(result.channels.len(), 2);
        assert_eq!(result.sample_count, 2000);
        assert!((result.channels[0].zcr - 440.0).abs() < 1.0);
        assert!((result.channels[1].rms - 1.4144).abs() < 1e-4);
        assert_eq!(runner.metrics().analyses, 1);
    }

    #[test]
    fn runner_accepts_single_channel_input() {
        let runner = Runner::new(WorkflowConfig::default());
        let samples: Vec<Sample> = (0..10).map(|i| Sample::new(i as f64, 0.0)).collect();
        let result = runner.execute(StageInput::Single(samples)).unwrap();
        assert_eq!(result.channels, vec![ChannelAnalysis::new(0.0, 0.0)]);
    }

    #[test]
    fn runner_counts_rejected_batches() {
        let runner = Runner::new(WorkflowConfig::default());
        let ragged = vec![
            MultiChannelSample::new(0.0, vec![1.0]),
            MultiChannelSample::new(0.1, vec![1.0, 2.0]),
        ];
        assert!(runner.execute(StageInput::Multi(ragged)).is_err());
        assert_eq!(runner.metrics().rejected, 1);
    }

    #[test]
    fn stream_reports_every_interval_with_bounded_window() {
        let cfg = WorkflowConfig::from_args(&[50.0], &[1.0], 2.0, 1000, 500, 250);
        let runner = Runner::new(cfg);
        let payload = build_payload(vec![ChannelProfile::new(50.0, 1.0)], 2.0, 1000).unwrap();

        let reports = runner.stream(&payload).unwrap();
        assert_eq!(reports.len(), 8);
        assert_eq!(reports[0].window_len, 250);
        assert!(reports[1..].iter().all(|r| r.window_len == 500));

        let last = reports.last().unwrap();
        assert_eq!(last.tick, 1999);
        assert!((last.channels[0].zcr - 50.0).abs() < 1.0);
        assert!((last.channels[0].rms - 0.7071).abs() < 1e-3);
        assert_eq!(runner.metrics().samples_ingested, 2000);
    }
}

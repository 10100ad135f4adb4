use crate::prelude::{
    AnalysisConfig, ProcessingStage, StageError, StageInput, StageMetadata, StageOutput,
    StageResult,
};
use crate::processing::analyzer::Analyzer;
use crate::telemetry::log::LogManager;

/// Stage wrapping the analyzer for single- and multi-channel batches.
pub struct AnalysisStage {
    analyzer: Option<Analyzer>,
    logger: LogManager,
}

impl AnalysisStage {
    pub fn new() -> Self {
        Self {
            analyzer: None,
            logger: LogManager::new(),
        }
    }
}

impl Default for AnalysisStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for AnalysisStage {
    fn initialize(&mut self, config: &AnalysisConfig) -> StageResult<()> {
        self.analyzer = Some(Analyzer::new(config)?);
        Ok(())
    }

    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput> {
        let analyzer = self
            .analyzer
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let sample_count = input.len();
        let span = input.span_seconds();
        let channels = match &input {
            StageInput::Single(samples) => vec![analyzer.analyze(samples)],
            StageInput::Multi(samples) => analyzer.analyze_multi_channel(samples)?,
        };

        let notes = channels
            .iter()
            .enumerate()
            .map(|(index, result)| {
                format!("channel {} RMS {:.4} ZCR {:.2}", index, result.rms, result.zcr)
            })
            .collect::<Vec<_>>();
        for note in &notes {
            self.logger.record(note);
        }

        Ok(StageOutput {
            channels,
            metadata: StageMetadata {
                sample_count,
                span_seconds: span,
                notes,
            },
        })
    }

    fn cleanup(&mut self) {
        self.analyzer = None;
    }
}

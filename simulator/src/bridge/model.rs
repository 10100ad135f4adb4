use crate::workflow::runner::WorkflowResult;
use dynamics::telemetry::MetricsSnapshot;
use dynamics::ChannelAnalysis;
use serde::{Deserialize, Serialize};

/// Latest analysis exposed over the HTTP bridge.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AnalysisModel {
    pub channels: Vec<ChannelAnalysis>,
    pub sample_count: usize,
    pub notes: Vec<String>,
    pub metrics: MetricsSnapshot,
}

impl AnalysisModel {
    pub fn from_result(result: &WorkflowResult, metrics: MetricsSnapshot) -> Self {
        Self {
            channels: result.channels.clone(),
            sample_count: result.sample_count,
            notes: result.notes.clone(),
            metrics,
        }
    }
}

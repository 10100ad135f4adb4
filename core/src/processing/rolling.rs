use crate::prelude::{ChannelAnalysis, StageError, StageResult};
use crate::processing::analyzer::Analyzer;
use crate::sample::{MultiChannelSample, Sample};

/// Fixed-capacity ring of the most recent samples.
///
/// Storage is allocated once; `head` is the next slot to write and `count`
/// the number of retained samples. A full ring overwrites its oldest slot.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    slots: Vec<T>,
    head: usize,
    count: usize,
}

/// Rolling window over single-channel samples.
pub type RollingWindowBuffer = RollingWindow<Sample>;
/// Rolling window over multi-channel samples.
pub type MultiChannelRollingBuffer = RollingWindow<MultiChannelSample>;

impl<T: Clone + Default> RollingWindow<T> {
    pub fn with_capacity(capacity: usize) -> StageResult<Self> {
        if capacity == 0 {
            return Err(StageError::InvalidInput(
                "rolling window capacity must be positive".into(),
            ));
        }
        Ok(Self {
            slots: vec![T::default(); capacity],
            head: 0,
            count: 0,
        })
    }

    /// Inserts a sample, evicting the oldest one once the window is full.
    pub fn update(&mut self, sample: T) {
        let capacity = self.slots.len();
        self.slots[self.head] = sample;
        self.head = (self.head + 1) % capacity;
        if self.count < capacity {
            self.count += 1;
        }
    }

    /// Retained samples, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        let capacity = self.slots.len();
        let start = (self.head + capacity - self.count) % capacity;
        (0..self.count)
            .map(|offset| self.slots[(start + offset) % capacity].clone())
            .collect()
    }

    pub fn latest(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.slots.len();
        Some(&self.slots[(self.head + capacity - 1) % capacity])
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }
}

impl RollingWindow<Sample> {
    /// RMS and crossing rate of the retained samples, `(0, 0)` when empty.
    pub fn analyze_buffer(&self) -> ChannelAnalysis {
        self.analyze_with(&Analyzer::default())
    }

    pub fn analyze_with(&self, analyzer: &Analyzer) -> ChannelAnalysis {
        if self.is_empty() {
            return ChannelAnalysis::default();
        }
        analyzer.analyze(&self.snapshot())
    }
}

impl RollingWindow<MultiChannelSample> {
    pub fn analyze_buffer(&self) -> StageResult<Vec<ChannelAnalysis>> {
        self.analyze_with(&Analyzer::default())
    }

    pub fn analyze_with(&self, analyzer: &Analyzer) -> StageResult<Vec<ChannelAnalysis>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        analyzer.analyze_multi_channel(&self.snapshot())
    }
}

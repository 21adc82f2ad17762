//! Cold-start gate.
//!
//! Rankings and suggestions are withheld until the log holds enough
//! completions to make them meaningful.

use serde::{Deserialize, Serialize};

use crate::storage::LearningConfig;

/// Learning state reported while the gate is closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LearningStatus {
    pub completions: u64,
    pub threshold: u64,
    /// `min(1, completions / threshold)`
    pub progress: f64,
}

impl LearningStatus {
    /// Completions still needed before the gate opens.
    pub fn remaining(&self) -> u64 {
        self.threshold.saturating_sub(self.completions)
    }
}

/// A ranked view that is only authoritative once learning is over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Gated<T> {
    Learning(LearningStatus),
    Ready(T),
}

impl<T> Gated<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Gated::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Gated::Ready(value) => Some(value),
            Gated::Learning(_) => None,
        }
    }
}

/// Threshold check on the total completion count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearningGate {
    threshold: u64,
}

impl LearningGate {
    pub fn new(config: &LearningConfig) -> Self {
        Self {
            threshold: u64::from(config.threshold.max(1)),
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn is_learning(&self, total_completions: u64) -> bool {
        total_completions < self.threshold
    }

    pub fn progress(&self, total_completions: u64) -> f64 {
        (total_completions as f64 / self.threshold as f64).min(1.0)
    }

    pub fn status(&self, total_completions: u64) -> LearningStatus {
        LearningStatus {
            completions: total_completions,
            threshold: self.threshold,
            progress: self.progress(total_completions),
        }
    }

    /// Wrap `value` unless the gate is still closed.
    pub fn gate<T>(&self, total_completions: u64, value: impl FnOnce() -> T) -> Gated<T> {
        if self.is_learning(total_completions) {
            Gated::Learning(self.status(total_completions))
        } else {
            Gated::Ready(value())
        }
    }
}

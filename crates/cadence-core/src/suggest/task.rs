//! Pending tasks supplied by the task-management side.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::completion::TaskCategory;
use crate::error::ValidationError;

/// A task that is not done and not yet scheduled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingTask {
    pub title: String,
    pub category: TaskCategory,
    /// Nothing is suggested before this time of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_start: Option<NaiveTime>,
}

impl PendingTask {
    pub fn new(title: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            title: title.into(),
            category,
            earliest_start: None,
        }
    }

    pub fn not_before(mut self, time: NaiveTime) -> Self {
        self.earliest_start = Some(time);
        self
    }
}

/// Source of pending tasks, pulled when suggestions are generated.
pub trait PendingTaskSource {
    fn pending_tasks(&self) -> Vec<PendingTask>;
}

impl PendingTaskSource for [PendingTask] {
    fn pending_tasks(&self) -> Vec<PendingTask> {
        self.to_vec()
    }
}

impl PendingTaskSource for Vec<PendingTask> {
    fn pending_tasks(&self) -> Vec<PendingTask> {
        self.clone()
    }
}

/// Parse `HH:MM` (or `HH:MM:SS`) into a time of day.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|e| ValidationError::InvalidTime {
            input: input.to_string(),
            message: e.to_string(),
        })
}

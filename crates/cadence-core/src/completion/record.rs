//! Completion records and task categories.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Category of a completed or pending task.
///
/// The set is closed; the scheduling core treats it as an opaque tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    Chores,
    Creative,
    Admin,
    Health,
    Personal,
}

impl TaskCategory {
    /// Every category, in declaration order.
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::Work,
        TaskCategory::Chores,
        TaskCategory::Creative,
        TaskCategory::Admin,
        TaskCategory::Health,
        TaskCategory::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Work => "work",
            TaskCategory::Chores => "chores",
            TaskCategory::Creative => "creative",
            TaskCategory::Admin => "admin",
            TaskCategory::Health => "health",
            TaskCategory::Personal => "personal",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// Immutable fact that a task finished at a given time.
///
/// `completed_at` keeps the UTC offset that was local when the task was
/// completed, so the hour bucket never shifts if the user later travels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRecord {
    pub id: u64,
    pub completed_at: DateTime<FixedOffset>,
    pub category: TaskCategory,
    /// Perceived focus quality in [0, 1]; `None` when the user skipped rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_score: Option<f64>,
}

impl CompletionRecord {
    /// Local hour-of-day bucket (0-23).
    pub fn hour(&self) -> u8 {
        self.completed_at.hour() as u8
    }

    /// Per-record productivity contribution: the focus score, or `neutral`
    /// for unrated completions.
    pub fn contribution(&self, neutral: f64) -> f64 {
        self.focus_score.unwrap_or(neutral)
    }
}

/// Checks that an optional focus score lies in [0, 1].
pub fn validate_focus_score(score: Option<f64>) -> Result<(), ValidationError> {
    match score {
        Some(s) if !(0.0..=1.0).contains(&s) => Err(ValidationError::FocusScoreOutOfRange(s)),
        _ => Ok(()),
    }
}

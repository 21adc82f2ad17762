//! Suggestion output types.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::completion::TaskCategory;

/// How much evidence backs a suggestion.
///
/// Ordering follows declaration order, so sorting ascending puts `High` first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        })
    }
}

/// Which rule picked the suggested hour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionRule {
    /// Best hour from the task category's own history
    CategoryPattern,
    /// Category history too thin; best hour overall
    GlobalPattern,
    /// Category hours all precede the earliest start; best later hour overall
    AfterEarliestStart,
    /// Chosen hour has no samples yet
    Exploratory,
}

impl SuggestionRule {
    /// One-sentence justification for the user.
    pub fn reason(
        &self,
        category: TaskCategory,
        time: NaiveTime,
        score: f64,
        samples: u64,
    ) -> String {
        let clock = time.format("%H:%M");
        let pct = (score * 100.0).round() as u32;
        match self {
            SuggestionRule::CategoryPattern => format!(
                "Your {category} tasks go best around {clock} ({pct}% average focus over {samples} completions)."
            ),
            SuggestionRule::GlobalPattern => format!(
                "Not enough {category} history yet; {clock} is one of your most productive hours ({pct}% average focus)."
            ),
            SuggestionRule::AfterEarliestStart => format!(
                "Your usual {category} hours fall before this task's earliest start; {clock} is one of your most productive hours after it ({pct}% average focus)."
            ),
            SuggestionRule::Exploratory => format!(
                "No completions around {clock} yet; trying an open hour to learn your {category} rhythm."
            ),
        }
    }
}

/// Suggested time of day for one pending task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleSuggestion {
    /// Stable across refreshes while the pending task list is unchanged.
    pub id: Uuid,
    pub task_title: String,
    pub category: TaskCategory,
    pub suggested_time: NaiveTime,
    pub reason: String,
    pub confidence: Confidence,
    pub rule: SuggestionRule,
    /// Samples behind the chosen hour in the profile that ranked it.
    pub hour_samples: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_sorts_high_first() {
        let mut v = vec![Confidence::Low, Confidence::High, Confidence::Medium];
        v.sort();
        assert_eq!(v, vec![Confidence::High, Confidence::Medium, Confidence::Low]);
    }

    #[test]
    fn reasons_are_deterministic() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let a = SuggestionRule::CategoryPattern.reason(TaskCategory::Work, t, 0.9, 6);
        let b = SuggestionRule::CategoryPattern.reason(TaskCategory::Work, t, 0.9, 6);
        assert_eq!(a, b);
        assert_eq!(
            a,
            "Your work tasks go best around 09:00 (90% average focus over 6 completions)."
        );
    }

    #[test]
    fn each_rule_has_distinct_wording() {
        let t = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        let global = SuggestionRule::GlobalPattern.reason(TaskCategory::Creative, t, 0.7, 3);
        let explore = SuggestionRule::Exploratory.reason(TaskCategory::Creative, t, 0.5, 0);
        assert!(global.starts_with("Not enough creative history"));
        assert!(explore.contains("14:30"));
        assert_ne!(global, explore);
        let later = SuggestionRule::AfterEarliestStart.reason(TaskCategory::Creative, t, 0.7, 3);
        assert!(later.starts_with("Your usual creative hours"));
        assert!(!later.contains("Not enough"));
    }
}

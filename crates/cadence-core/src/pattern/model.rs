//! Productivity pattern model derived from the completion log.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::hour::{HourProfile, HourTable};
use crate::completion::{CompletionLog, CompletionRecord, TaskCategory};
use crate::storage::{HistoryWindow, PatternConfig};

/// Completions per category over the whole history.
pub type CategoryTally = BTreeMap<TaskCategory, u64>;

/// Hour scores and category counts computed from one state of the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternModel {
    hours: HourTable,
    category_hours: BTreeMap<TaskCategory, HourTable>,
    breakdown: CategoryTally,
    total_completions: u64,
    config: PatternConfig,
    /// When the model was computed
    pub computed_at: DateTime<Utc>,
}

impl PatternModel {
    /// Model for an empty log: every hour neutral, no categories.
    pub fn empty(config: &PatternConfig, now: DateTime<Utc>) -> Self {
        Self {
            hours: HourTable::neutral(config.neutral_score),
            category_hours: BTreeMap::new(),
            breakdown: CategoryTally::new(),
            total_completions: 0,
            config: config.clone(),
            computed_at: now,
        }
    }

    /// Compute the model from `log`.
    ///
    /// Hour scores and per-category hour tables honour the configured history
    /// window; the category breakdown and total count always cover everything.
    pub fn compute(log: &CompletionLog, config: &PatternConfig, now: DateTime<Utc>) -> Self {
        let windowed: &[CompletionRecord] = match config.history {
            HistoryWindow::AllTime => log.records(),
            HistoryWindow::Trailing => {
                // A window reaching past chrono's range covers the whole log.
                match Duration::try_days(i64::from(config.trailing_days))
                    .and_then(|span| now.checked_sub_signed(span))
                {
                    Some(since) => log.records_since(since),
                    None => log.records(),
                }
            }
        };

        let hours = HourTable::from_records(windowed, config.neutral_score);

        let mut by_category: BTreeMap<TaskCategory, Vec<&CompletionRecord>> = BTreeMap::new();
        for record in windowed {
            by_category.entry(record.category).or_default().push(record);
        }
        let category_hours = by_category
            .into_iter()
            .map(|(category, records)| {
                (
                    category,
                    HourTable::from_records(records, config.neutral_score),
                )
            })
            .collect();

        let mut breakdown = CategoryTally::new();
        for record in log.records() {
            *breakdown.entry(record.category).or_insert(0) += 1;
        }

        let model = Self {
            hours,
            category_hours,
            breakdown,
            total_completions: log.len() as u64,
            config: config.clone(),
            computed_at: now,
        };
        debug_assert_eq!(
            model.breakdown.values().sum::<u64>(),
            model.total_completions,
            "category tally disagrees with log length"
        );
        tracing::debug!(
            total = model.total_completions,
            windowed = windowed.len(),
            categories = model.breakdown.len(),
            "pattern model recomputed"
        );
        model
    }

    /// Productivity score for `hour`; neutral for empty or out-of-range buckets.
    pub fn score(&self, hour: u8) -> f64 {
        self.hours
            .get(hour)
            .map(|p| p.score)
            .unwrap_or(self.config.neutral_score)
    }

    pub fn hour_profile(&self, hour: u8) -> Option<&HourProfile> {
        self.hours.get(hour)
    }

    /// All 24 global hour profiles.
    pub fn hour_profiles(&self) -> &[HourProfile] {
        self.hours.profiles()
    }

    /// Global hour table (windowed).
    pub fn hours(&self) -> &HourTable {
        &self.hours
    }

    /// Awake hours, best first.
    pub fn ranked_hours(&self) -> Vec<HourProfile> {
        self.hours.ranked(self.config.awake_hours())
    }

    /// The `limit` best awake hours.
    pub fn top_productive_hours(&self, limit: usize) -> Vec<u8> {
        self.ranked_hours()
            .into_iter()
            .take(limit)
            .map(|p| p.hour)
            .collect()
    }

    pub fn category_breakdown(&self) -> &CategoryTally {
        &self.breakdown
    }

    /// Hour table for one category, if it has windowed history.
    pub fn category_hours(&self, category: TaskCategory) -> Option<&HourTable> {
        self.category_hours.get(&category)
    }

    /// Windowed completions in `category`.
    pub fn category_samples(&self, category: TaskCategory) -> u64 {
        self.category_hours
            .get(&category)
            .map(HourTable::total_samples)
            .unwrap_or(0)
    }

    /// All completions in the log, regardless of the history window.
    pub fn total_completions(&self) -> u64 {
        self.total_completions
    }

    /// Completions that fed the hour scores.
    pub fn windowed_samples(&self) -> u64 {
        self.hours.total_samples()
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Render the awake-hour profile as an ASCII bar chart.
    pub fn render_ascii_chart(&self) -> String {
        let mut output = String::from("\nProductivity by hour:\n");
        output.push_str(&"─".repeat(50));
        output.push('\n');

        for hour in self.config.awake_hours() {
            let (score, samples) = self
                .hours
                .get(hour)
                .map(|p| (p.score, p.sample_count))
                .unwrap_or((self.config.neutral_score, 0));
            let bar_length = ((score * 30.0) as usize).min(30);
            let bar = "█".repeat(bar_length);
            let empty = " ".repeat(30 - bar_length);

            let evidence = match samples {
                0 => "·",
                1..=4 => "○",
                _ => "●",
            };

            output.push_str(&format!(
                "{:02}:00 {}{}{} {:.0}% ({})\n",
                hour,
                bar,
                empty,
                evidence,
                score * 100.0,
                samples
            ));
        }

        output.push_str(&"─".repeat(50));
        output.push_str("\n● 5+ samples  ○ 1-4  · none\n");
        output
    }
}

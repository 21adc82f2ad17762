//! Suggestion generator.
//!
//! Pure with respect to (pending tasks, pattern model): the same inputs
//! always produce the same suggestions, byte for byte.

use std::collections::HashMap;

use chrono::{NaiveTime, Timelike};
use uuid::Uuid;

use super::suggestion::{Confidence, ScheduleSuggestion, SuggestionRule};
use super::task::PendingTask;
use crate::completion::TaskCategory;
use crate::pattern::{HourProfile, PatternModel};
use crate::storage::SuggestionConfig;

/// Namespace for suggestion ids.
const SUGGESTION_NAMESPACE: Uuid = Uuid::from_u128(0x5c1d_8a5e_3f0b_4c7e_9a61_2d4b_7e80_c3a9);

/// Picks a time of day and confidence tier for each pending task.
#[derive(Debug, Clone)]
pub struct SuggestionGenerator {
    config: SuggestionConfig,
}

struct Pick {
    profile: HourProfile,
    rule: SuggestionRule,
}

impl SuggestionGenerator {
    pub fn new(config: &SuggestionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Suggestions for `tasks`, sorted by confidence (high first), then time,
    /// then title.
    ///
    /// Tasks whose earliest start leaves no awake hour get no suggestion.
    pub fn generate(&self, model: &PatternModel, tasks: &[PendingTask]) -> Vec<ScheduleSuggestion> {
        let mut occurrences: HashMap<(TaskCategory, &str), u32> = HashMap::new();
        let mut suggestions = Vec::with_capacity(tasks.len());

        for task in tasks {
            let ordinal = occurrences
                .entry((task.category, task.title.as_str()))
                .or_insert(0);
            let id = suggestion_id(task, *ordinal);
            *ordinal += 1;

            match self.suggest(model, task, id) {
                Some(suggestion) => suggestions.push(suggestion),
                None => tracing::debug!(
                    title = %task.title,
                    category = %task.category,
                    "no awake hour satisfies earliest start; skipping"
                ),
            }
        }

        suggestions.sort_by(|a, b| {
            a.confidence
                .cmp(&b.confidence)
                .then_with(|| a.suggested_time.cmp(&b.suggested_time))
                .then_with(|| a.task_title.cmp(&b.task_title))
                .then_with(|| a.id.cmp(&b.id))
        });
        tracing::debug!(
            tasks = tasks.len(),
            suggestions = suggestions.len(),
            "suggestions generated"
        );
        suggestions
    }

    fn suggest(&self, model: &PatternModel, task: &PendingTask, id: Uuid) -> Option<ScheduleSuggestion> {
        let category_samples = model.category_samples(task.category);
        let pick = self.pick_hour(model, task, category_samples)?;

        let confidence = match pick.rule {
            SuggestionRule::CategoryPattern => {
                let hour_strong = pick.profile.sample_count >= self.config.strong_hour_samples;
                let category_strong = category_samples >= self.config.strong_category_samples;
                match (hour_strong, category_strong) {
                    (true, true) => Confidence::High,
                    (true, false) | (false, true) => Confidence::Medium,
                    (false, false) => Confidence::Low,
                }
            }
            SuggestionRule::GlobalPattern
            | SuggestionRule::AfterEarliestStart
            | SuggestionRule::Exploratory => Confidence::Low,
        };

        let on_the_hour = NaiveTime::from_hms_opt(
            u32::from(pick.profile.hour),
            u32::from(self.config.default_minute.min(59)),
            0,
        )?;
        let suggested_time = match task.earliest_start {
            Some(earliest) if earliest > on_the_hour => earliest,
            _ => on_the_hour,
        };

        let samples = match pick.rule {
            SuggestionRule::CategoryPattern => category_samples,
            _ => pick.profile.sample_count,
        };
        let reason = pick
            .rule
            .reason(task.category, suggested_time, pick.profile.score, samples);

        Some(ScheduleSuggestion {
            id,
            task_title: task.title.clone(),
            category: task.category,
            suggested_time,
            reason,
            confidence,
            rule: pick.rule,
            hour_samples: pick.profile.sample_count,
        })
    }

    fn pick_hour(&self, model: &PatternModel, task: &PendingTask, category_samples: u64) -> Option<Pick> {
        let awake = model.config().awake_hours();
        let permitted = |hour: u8| {
            task.earliest_start
                .map_or(true, |t| u32::from(hour) >= t.hour())
        };

        let category_known = category_samples >= self.config.min_category_samples;
        if category_known {
            let best = model.category_hours(task.category).and_then(|table| {
                table
                    .ranked(awake.clone())
                    .into_iter()
                    .find(|p| p.sample_count > 0 && permitted(p.hour))
            });
            if let Some(profile) = best {
                return Some(Pick {
                    profile,
                    rule: SuggestionRule::CategoryPattern,
                });
            }
        }

        // Reaching here with a known category means its hours all fall before
        // the earliest start.
        model
            .ranked_hours()
            .into_iter()
            .find(|p| permitted(p.hour))
            .map(|profile| Pick {
                rule: match (profile.sample_count > 0, category_known) {
                    (false, _) => SuggestionRule::Exploratory,
                    (true, true) => SuggestionRule::AfterEarliestStart,
                    (true, false) => SuggestionRule::GlobalPattern,
                },
                profile,
            })
    }
}

fn suggestion_id(task: &PendingTask, ordinal: u32) -> Uuid {
    let key = format!("{}\u{1f}{}\u{1f}{}", task.category, task.title, ordinal);
    Uuid::new_v5(&SUGGESTION_NAMESPACE, key.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionLog, NewCompletion};
    use crate::storage::PatternConfig;
    use chrono::{DateTime, Duration, FixedOffset, Utc};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn now() -> DateTime<Utc> {
        at("2026-06-01T12:00:00+00:00").with_timezone(&Utc)
    }

    fn model_from(entries: &[(u32, TaskCategory, Option<f64>, usize)]) -> PatternModel {
        let mut log = CompletionLog::new();
        for (hour, category, focus, times) in entries {
            for day in 0..*times {
                log.append(
                    NewCompletion {
                        category: *category,
                        completed_at: at(&format!("2026-05-{:02}T{:02}:15:00+00:00", day + 1, hour)),
                        focus_score: *focus,
                    },
                    now(),
                    Duration::minutes(5),
                )
                .unwrap();
            }
        }
        PatternModel::compute(&log, &PatternConfig::default(), now())
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn strong_category_history_gives_high_confidence() {
        let model = model_from(&[
            (9, TaskCategory::Work, Some(0.9), 6),
            (15, TaskCategory::Chores, Some(0.4), 8),
        ]);
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let out = generator.generate(&model, &[PendingTask::new("Write report", TaskCategory::Work)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].suggested_time, time(9, 0));
        assert_eq!(out[0].confidence, Confidence::High);
        assert_eq!(out[0].rule, SuggestionRule::CategoryPattern);
        assert!(out[0].reason.contains("work tasks"));
    }

    #[test]
    fn thin_category_falls_back_to_global_with_low_confidence() {
        let model = model_from(&[
            (10, TaskCategory::Work, Some(0.95), 10),
            (16, TaskCategory::Health, Some(0.6), 2),
        ]);
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let out = generator.generate(&model, &[PendingTask::new("Stretch", TaskCategory::Health)]);
        assert_eq!(out[0].rule, SuggestionRule::GlobalPattern);
        assert_eq!(out[0].suggested_time, time(10, 0));
        assert_eq!(out[0].confidence, Confidence::Low);
    }

    #[test]
    fn medium_when_only_one_evidence_condition_holds() {
        // 4 creative completions: enough for the category rule, not strong
        let model = model_from(&[(11, TaskCategory::Creative, Some(0.8), 4)]);
        let mut config = SuggestionConfig::default();
        config.strong_hour_samples = 3;
        let generator = SuggestionGenerator::new(&config);
        let out = generator.generate(&model, &[PendingTask::new("Sketch", TaskCategory::Creative)]);
        assert_eq!(out[0].rule, SuggestionRule::CategoryPattern);
        assert_eq!(out[0].confidence, Confidence::Medium);
    }

    #[test]
    fn earliest_start_excludes_earlier_hours() {
        let model = model_from(&[
            (9, TaskCategory::Work, Some(0.9), 6),
            (14, TaskCategory::Work, Some(0.7), 6),
        ]);
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let task = PendingTask::new("Review", TaskCategory::Work).not_before(time(12, 0));
        let out = generator.generate(&model, &[task]);
        assert_eq!(out[0].suggested_time, time(14, 0));
    }

    #[test]
    fn earliest_start_after_category_hours_uses_global_hours() {
        let model = model_from(&[
            (9, TaskCategory::Work, Some(0.9), 6),
            (15, TaskCategory::Chores, Some(0.7), 8),
        ]);
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let task = PendingTask::new("Review", TaskCategory::Work).not_before(time(12, 0));
        let out = generator.generate(&model, &[task]);
        assert_eq!(out[0].rule, SuggestionRule::AfterEarliestStart);
        assert_eq!(out[0].suggested_time, time(15, 0));
        assert_eq!(out[0].confidence, Confidence::Low);
        assert!(!out[0].reason.contains("Not enough"));
        assert!(out[0].reason.contains("earliest start"));
    }

    #[test]
    fn earliest_start_within_chosen_hour_is_respected() {
        let model = model_from(&[(14, TaskCategory::Work, Some(0.9), 6)]);
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let task = PendingTask::new("Review", TaskCategory::Work).not_before(time(14, 20));
        let out = generator.generate(&model, &[task]);
        assert_eq!(out[0].suggested_time, time(14, 20));
    }

    #[test]
    fn no_permitted_hour_means_no_suggestion() {
        let model = model_from(&[(9, TaskCategory::Work, Some(0.9), 6)]);
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let task = PendingTask::new("Late", TaskCategory::Work).not_before(time(22, 30));
        assert!(generator.generate(&model, &[task]).is_empty());
    }

    #[test]
    fn empty_model_suggests_exploratory_hours() {
        let model = PatternModel::empty(&PatternConfig::default(), now());
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let out = generator.generate(&model, &[PendingTask::new("Anything", TaskCategory::Admin)]);
        assert_eq!(out[0].rule, SuggestionRule::Exploratory);
        assert_eq!(out[0].suggested_time, time(6, 0));
        assert_eq!(out[0].confidence, Confidence::Low);
    }

    #[test]
    fn zero_tasks_gives_empty_output() {
        let model = model_from(&[(9, TaskCategory::Work, Some(0.9), 6)]);
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        assert!(generator.generate(&model, &[]).is_empty());
    }

    #[test]
    fn output_is_ordered_and_repeatable() {
        let model = model_from(&[
            (9, TaskCategory::Work, Some(0.9), 6),
            (13, TaskCategory::Chores, Some(0.8), 6),
        ]);
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let tasks = vec![
            PendingTask::new("Zebra", TaskCategory::Health),
            PendingTask::new("Dishes", TaskCategory::Chores),
            PendingTask::new("Deck", TaskCategory::Work),
            PendingTask::new("Alpha", TaskCategory::Health),
        ];
        let first = generator.generate(&model, &tasks);
        let second = generator.generate(&model, &tasks);
        assert_eq!(first, second);

        let titles: Vec<&str> = first.iter().map(|s| s.task_title.as_str()).collect();
        assert_eq!(titles, vec!["Deck", "Dishes", "Alpha", "Zebra"]);
        for pair in first.windows(2) {
            assert!(pair[0].confidence <= pair[1].confidence);
            if pair[0].confidence == pair[1].confidence {
                assert!(pair[0].suggested_time <= pair[1].suggested_time);
            }
        }
    }

    #[test]
    fn duplicate_titles_get_distinct_stable_ids() {
        let model = model_from(&[(9, TaskCategory::Work, Some(0.9), 6)]);
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let tasks = vec![
            PendingTask::new("Email", TaskCategory::Admin),
            PendingTask::new("Email", TaskCategory::Admin),
        ];
        let out = generator.generate(&model, &tasks);
        assert_ne!(out[0].id, out[1].id);
        let again = generator.generate(&model, &tasks);
        assert_eq!(
            out.iter().map(|s| s.id).collect::<Vec<_>>(),
            again.iter().map(|s| s.id).collect::<Vec<_>>()
        );
    }
}

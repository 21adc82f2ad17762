//! Property tests for aggregation and ranking.

use cadence_core::{
    CompletionLog, NewCompletion, PatternModel, PendingTask, SuggestionGenerator, TaskCategory,
};
use cadence_core::storage::{PatternConfig, SuggestionConfig};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Timelike, Utc};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn category() -> impl Strategy<Value = TaskCategory> {
    prop::sample::select(TaskCategory::ALL.to_vec())
}

fn completion() -> impl Strategy<Value = NewCompletion> {
    (0u32..60, 0u32..24, 0u32..60, category(), prop::option::of(0.0f64..=1.0)).prop_map(
        |(day, hour, minute, category, focus_score)| {
            let offset = FixedOffset::east_opt(0).unwrap();
            let completed_at = offset
                .with_ymd_and_hms(2026, 3, 1, hour, minute, 0)
                .unwrap()
                + Duration::days(i64::from(day));
            NewCompletion {
                category,
                completed_at,
                focus_score,
            }
        },
    )
}

fn log_of(entries: &[NewCompletion]) -> CompletionLog {
    let mut log = CompletionLog::new();
    for entry in entries {
        log.append(entry.clone(), now(), Duration::minutes(5)).unwrap();
    }
    log
}

proptest! {
    #[test]
    fn score_is_order_independent(
        entries in prop::collection::vec(completion(), 0..80),
        seed in any::<u64>(),
    ) {
        let mut shuffled = entries.clone();
        // deterministic permutation driven by the seed
        let len = shuffled.len();
        if len > 1 {
            for i in 0..len {
                let j = (seed.wrapping_mul(i as u64 + 1) % len as u64) as usize;
                shuffled.swap(i, j);
            }
        }

        let config = PatternConfig::default();
        let a = PatternModel::compute(&log_of(&entries), &config, now());
        let b = PatternModel::compute(&log_of(&shuffled), &config, now());
        for hour in 0..24u8 {
            prop_assert!((a.score(hour) - b.score(hour)).abs() < 1e-9);
            prop_assert_eq!(
                a.hour_profile(hour).unwrap().sample_count,
                b.hour_profile(hour).unwrap().sample_count
            );
        }
        prop_assert_eq!(a.category_breakdown(), b.category_breakdown());
    }

    #[test]
    fn score_matches_mean_and_stays_in_bounds(entries in prop::collection::vec(completion(), 0..80)) {
        let model = PatternModel::compute(&log_of(&entries), &PatternConfig::default(), now());
        for hour in 0..24u8 {
            let contributions: Vec<f64> = entries
                .iter()
                .filter(|e| e.completed_at.hour() as u8 == hour)
                .map(|e| e.focus_score.unwrap_or(0.5))
                .collect();
            let score = model.score(hour);
            prop_assert!((0.0..=1.0).contains(&score));
            if contributions.is_empty() {
                prop_assert_eq!(score, 0.5);
            } else {
                let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
                prop_assert!((score - mean).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn top_hours_are_sorted_and_deterministic(entries in prop::collection::vec(completion(), 0..80)) {
        let log = log_of(&entries);
        let config = PatternConfig::default();
        let model = PatternModel::compute(&log, &config, now());
        let top = model.top_productive_hours(16);
        prop_assert_eq!(&top, &PatternModel::compute(&log, &config, now()).top_productive_hours(16));
        prop_assert_eq!(top.len(), 16);
        for pair in top.windows(2) {
            let a = model.hour_profile(pair[0]).unwrap();
            let b = model.hour_profile(pair[1]).unwrap();
            prop_assert!(
                a.score > b.score
                    || (a.score == b.score && a.sample_count > b.sample_count)
                    || (a.score == b.score && a.sample_count == b.sample_count && a.hour < b.hour)
            );
        }
    }

    #[test]
    fn suggestions_are_pure(
        entries in prop::collection::vec(completion(), 0..80),
        titles in prop::collection::vec(("[a-z]{1,8}", category()), 0..8),
    ) {
        let model = PatternModel::compute(&log_of(&entries), &PatternConfig::default(), now());
        let tasks: Vec<PendingTask> = titles
            .into_iter()
            .map(|(title, category)| PendingTask::new(title, category))
            .collect();
        let generator = SuggestionGenerator::new(&SuggestionConfig::default());
        let first = generator.generate(&model, &tasks);
        let second = generator.generate(&model, &tasks);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), tasks.len());
        for pair in first.windows(2) {
            prop_assert!(pair[0].confidence <= pair[1].confidence);
            if pair[0].confidence == pair[1].confidence {
                prop_assert!(pair[0].suggested_time <= pair[1].suggested_time);
            }
        }
    }
}

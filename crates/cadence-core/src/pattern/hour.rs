//! Hour-of-day buckets and their ranking order.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::completion::CompletionRecord;

/// Number of hour buckets in a day.
pub const HOURS_PER_DAY: usize = 24;

/// Productivity evidence for one hour bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HourProfile {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Completions whose local hour equals `hour`
    pub sample_count: u64,
    /// Mean contribution in [0, 1]; the neutral score when `sample_count == 0`
    pub score: f64,
}

impl HourProfile {
    pub fn neutral(hour: u8, neutral_score: f64) -> Self {
        Self {
            hour,
            sample_count: 0,
            score: neutral_score,
        }
    }
}

/// Ranking order: higher score first, then more samples, then earlier hour.
pub fn compare_rank(a: &HourProfile, b: &HourProfile) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.sample_count.cmp(&a.sample_count))
        .then_with(|| a.hour.cmp(&b.hour))
}

/// All 24 hour buckets built from one set of records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourTable {
    profiles: Vec<HourProfile>,
}

impl HourTable {
    /// Table where every hour holds the neutral score.
    pub fn neutral(neutral_score: f64) -> Self {
        Self {
            profiles: (0..HOURS_PER_DAY as u8)
                .map(|h| HourProfile::neutral(h, neutral_score))
                .collect(),
        }
    }

    /// Bucket `records` by local hour and average their contributions.
    ///
    /// Unrated completions contribute `neutral_score`.
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a CompletionRecord>,
        neutral_score: f64,
    ) -> Self {
        let mut sums = [0.0_f64; HOURS_PER_DAY];
        let mut counts = [0_u64; HOURS_PER_DAY];
        for record in records {
            let h = record.hour() as usize;
            sums[h] += record.contribution(neutral_score);
            counts[h] += 1;
        }

        let profiles = (0..HOURS_PER_DAY)
            .map(|h| {
                if counts[h] == 0 {
                    HourProfile::neutral(h as u8, neutral_score)
                } else {
                    HourProfile {
                        hour: h as u8,
                        sample_count: counts[h],
                        score: (sums[h] / counts[h] as f64).clamp(0.0, 1.0),
                    }
                }
            })
            .collect();
        Self { profiles }
    }

    /// Profile for `hour`, or `None` outside 0-23.
    pub fn get(&self, hour: u8) -> Option<&HourProfile> {
        self.profiles.get(hour as usize)
    }

    pub fn profiles(&self) -> &[HourProfile] {
        &self.profiles
    }

    pub fn total_samples(&self) -> u64 {
        self.profiles.iter().map(|p| p.sample_count).sum()
    }

    /// Profiles within `hours`, best first.
    pub fn ranked(&self, hours: RangeInclusive<u8>) -> Vec<HourProfile> {
        let mut ranked: Vec<HourProfile> = self
            .profiles
            .iter()
            .filter(|p| hours.contains(&p.hour))
            .copied()
            .collect();
        ranked.sort_by(compare_rank);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::TaskCategory;
    use chrono::DateTime;

    fn record(at: &str, focus: Option<f64>) -> CompletionRecord {
        CompletionRecord {
            id: 0,
            completed_at: DateTime::parse_from_rfc3339(at).unwrap(),
            category: TaskCategory::Work,
            focus_score: focus,
        }
    }

    #[test]
    fn empty_table_is_neutral() {
        let table = HourTable::from_records(std::iter::empty(), 0.5);
        assert_eq!(table.profiles().len(), 24);
        assert!(table.profiles().iter().all(|p| p.score == 0.5 && p.sample_count == 0));
    }

    #[test]
    fn unrated_completions_count_at_neutral() {
        let records = vec![
            record("2026-03-10T10:05:00+00:00", Some(1.0)),
            record("2026-03-10T10:40:00+00:00", None),
        ];
        let table = HourTable::from_records(&records, 0.5);
        let ten = table.get(10).unwrap();
        assert_eq!(ten.sample_count, 2);
        assert!((ten.score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn ranking_breaks_ties_by_samples_then_hour() {
        let a = HourProfile { hour: 14, sample_count: 3, score: 0.8 };
        let b = HourProfile { hour: 9, sample_count: 5, score: 0.8 };
        let c = HourProfile { hour: 7, sample_count: 5, score: 0.8 };
        let d = HourProfile { hour: 6, sample_count: 9, score: 0.9 };
        let mut v = vec![a, b, c, d];
        v.sort_by(compare_rank);
        let hours: Vec<u8> = v.iter().map(|p| p.hour).collect();
        assert_eq!(hours, vec![6, 7, 9, 14]);
    }

    #[test]
    fn ranked_respects_window() {
        let records = vec![record("2026-03-10T03:00:00+00:00", Some(1.0))];
        let table = HourTable::from_records(&records, 0.5);
        let ranked = table.ranked(6..=21);
        assert_eq!(ranked.len(), 16);
        assert!(ranked.iter().all(|p| p.hour != 3));
    }

    #[test]
    fn out_of_range_hour_is_none() {
        assert!(HourTable::neutral(0.5).get(24).is_none());
    }
}

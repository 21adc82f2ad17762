//! Append-only ledger of task completions.

use std::collections::HashSet;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::record::{validate_focus_score, CompletionRecord, TaskCategory};
use crate::error::{StorageError, ValidationError};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A completion that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompletion {
    pub category: TaskCategory,
    pub completed_at: DateTime<FixedOffset>,
    pub focus_score: Option<f64>,
}

/// Serializable shape of the completion log.
///
/// `next_id` travels with the records so ids stay unique across a reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogSnapshot {
    pub version: u32,
    pub next_id: u64,
    pub records: Vec<CompletionRecord>,
}

impl Default for LogSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// Completion records ordered by completion instant, oldest first.
///
/// Records are never mutated in place. The log does no aggregation.
#[derive(Debug, Clone)]
pub struct CompletionLog {
    records: Vec<CompletionRecord>,
    next_id: u64,
}

impl Default for CompletionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a log from a snapshot, checking ordering and id uniqueness.
    pub fn from_snapshot(snapshot: LogSnapshot) -> Result<Self, StorageError> {
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StorageError::CorruptSnapshot(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut seen = HashSet::with_capacity(snapshot.records.len());
        for pair in snapshot.records.windows(2) {
            if pair[1].completed_at < pair[0].completed_at {
                return Err(StorageError::CorruptSnapshot(format!(
                    "record {} is out of order",
                    pair[1].id
                )));
            }
        }
        for record in &snapshot.records {
            if !seen.insert(record.id) {
                return Err(StorageError::CorruptSnapshot(format!(
                    "duplicate record id {}",
                    record.id
                )));
            }
            if record.id >= snapshot.next_id {
                return Err(StorageError::CorruptSnapshot(format!(
                    "record id {} is not below next_id {}",
                    record.id, snapshot.next_id
                )));
            }
            if validate_focus_score(record.focus_score).is_err() {
                return Err(StorageError::CorruptSnapshot(format!(
                    "record {} has focus score outside [0, 1]",
                    record.id
                )));
            }
        }

        Ok(Self {
            records: snapshot.records,
            next_id: snapshot.next_id.max(1),
        })
    }

    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            version: SNAPSHOT_VERSION,
            next_id: self.next_id,
            records: self.records.clone(),
        }
    }

    /// Append a completion.
    ///
    /// Rejects timestamps more than `max_future_skew` ahead of `now` and focus
    /// scores outside [0, 1]. On rejection the log is left untouched.
    pub fn append(
        &mut self,
        entry: NewCompletion,
        now: DateTime<Utc>,
        max_future_skew: Duration,
    ) -> Result<&CompletionRecord, ValidationError> {
        if entry.completed_at.with_timezone(&Utc) > now + max_future_skew {
            return Err(ValidationError::FutureTimestamp {
                at: entry.completed_at,
                max_skew_minutes: max_future_skew.num_minutes().max(0) as u32,
            });
        }
        validate_focus_score(entry.focus_score)?;

        let record = CompletionRecord {
            id: self.next_id,
            completed_at: entry.completed_at,
            category: entry.category,
            focus_score: entry.focus_score,
        };
        self.next_id += 1;

        // Backfilled completions land after any record with the same instant.
        let pos = self
            .records
            .partition_point(|r| r.completed_at <= record.completed_at);
        self.records.insert(pos, record);
        Ok(&self.records[pos])
    }

    /// Records completed at or after `since`, oldest first.
    pub fn records_since(&self, since: DateTime<Utc>) -> &[CompletionRecord] {
        let start = self
            .records
            .partition_point(|r| r.completed_at.with_timezone(&Utc) < since);
        &self.records[start..]
    }

    pub fn records(&self) -> &[CompletionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record. The id allocator keeps counting.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

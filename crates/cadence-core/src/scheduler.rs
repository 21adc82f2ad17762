//! Scheduler facade.
//!
//! Owns the completion log and the pattern model derived from it. All
//! mutation goes through [`Scheduler::record_completion`] and
//! [`Scheduler::reset`]; every query reads one immutable model snapshot, so
//! hour scores, rankings and suggestions always agree with each other.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::completion::{CompletionLog, CompletionRecord, LogSnapshot, NewCompletion, TaskCategory};
use crate::error::{Result, ValidationError};
use crate::gate::{Gated, LearningGate, LearningStatus};
use crate::pattern::{CategoryTally, HourProfile, PatternModel};
use crate::storage::{Config, HistoryWindow, SnapshotStore};
use crate::suggest::{PendingTaskSource, ScheduleSuggestion, SuggestionGenerator};

/// Maximum age of a trailing-window model before reads recompute it.
const MAX_STALENESS_SECS: i64 = 5;

struct State {
    log: CompletionLog,
    model: Arc<PatternModel>,
    version: u64,
}

/// Productivity pattern learner and schedule suggester.
pub struct Scheduler {
    config: Config,
    gate: LearningGate,
    generator: SuggestionGenerator,
    state: RwLock<State>,
}

impl Scheduler {
    /// Scheduler with an empty log.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_log(config, CompletionLog::new())
    }

    /// Scheduler restored from a saved snapshot.
    pub fn from_snapshot(config: Config, snapshot: LogSnapshot) -> Result<Self> {
        let log = CompletionLog::from_snapshot(snapshot)?;
        Self::with_log(config, log)
    }

    /// Scheduler restored from `store`, or empty if nothing was saved.
    pub fn load(config: Config, store: &dyn SnapshotStore) -> Result<Self> {
        match store.load()? {
            Some(snapshot) => Self::from_snapshot(config, snapshot),
            None => Self::new(config),
        }
    }

    fn with_log(config: Config, log: CompletionLog) -> Result<Self> {
        config.validate()?;
        let model = PatternModel::compute(&log, &config.pattern, Utc::now());
        tracing::info!(completions = log.len(), "scheduler initialised");
        Ok(Self {
            gate: LearningGate::new(&config.learning),
            generator: SuggestionGenerator::new(&config.suggestions),
            state: RwLock::new(State {
                log,
                model: Arc::new(model),
                version: 0,
            }),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a completed task, timestamped in the caller's local offset.
    pub fn record_completion(
        &self,
        category: TaskCategory,
        completed_at: DateTime<FixedOffset>,
        focus_score: Option<f64>,
    ) -> Result<CompletionRecord> {
        self.record_completion_at(
            NewCompletion {
                category,
                completed_at,
                focus_score,
            },
            Utc::now(),
        )
    }

    /// Record a completion, validating it against `now`.
    ///
    /// On a validation failure the log is unchanged.
    pub fn record_completion_at(
        &self,
        entry: NewCompletion,
        now: DateTime<Utc>,
    ) -> Result<CompletionRecord> {
        let skew = Duration::minutes(i64::from(self.config.validation.max_future_skew_minutes));
        let mut state = self.write();
        let was_learning = self.gate.is_learning(state.log.len() as u64);

        let record = state.log.append(entry, now, skew)?.clone();
        let model = PatternModel::compute(&state.log, &self.config.pattern, now);
        state.model = Arc::new(model);
        state.version += 1;

        let total = state.log.len() as u64;
        tracing::debug!(
            id = record.id,
            category = %record.category,
            hour = record.hour(),
            total,
            "completion recorded"
        );
        if was_learning && !self.gate.is_learning(total) {
            tracing::info!(total, threshold = self.gate.threshold(), "learning complete");
        }
        Ok(record)
    }

    /// Drop every completion. The id allocator keeps counting.
    pub fn reset(&self) {
        let mut state = self.write();
        state.log.clear();
        state.model = Arc::new(PatternModel::empty(&self.config.pattern, Utc::now()));
        state.version += 1;
        tracing::info!("completion log reset");
    }

    /// Current model snapshot.
    ///
    /// Trailing-window models older than a few seconds are recomputed first.
    pub fn model(&self) -> Arc<PatternModel> {
        self.model_at(Utc::now())
    }

    fn model_at(&self, now: DateTime<Utc>) -> Arc<PatternModel> {
        let current = Arc::clone(&self.read().model);
        if !self.is_stale(&current, now) {
            return current;
        }

        let mut state = self.write();
        // Another writer may have refreshed it while we waited.
        if self.is_stale(&state.model, now) {
            let model = PatternModel::compute(&state.log, &self.config.pattern, now);
            state.model = Arc::new(model);
        }
        Arc::clone(&state.model)
    }

    fn is_stale(&self, model: &PatternModel, now: DateTime<Utc>) -> bool {
        self.config.pattern.history == HistoryWindow::Trailing
            && now - model.computed_at > Duration::seconds(MAX_STALENESS_SECS)
    }

    /// Monotonic change counter; bumps on every record and reset.
    pub fn version(&self) -> u64 {
        self.read().version
    }

    pub fn total_completions(&self) -> u64 {
        self.read().log.len() as u64
    }

    pub fn is_learning(&self) -> bool {
        self.gate.is_learning(self.total_completions())
    }

    /// `min(1, completions / threshold)`
    pub fn learning_progress(&self) -> f64 {
        self.gate.progress(self.total_completions())
    }

    pub fn learning_status(&self) -> LearningStatus {
        self.gate.status(self.total_completions())
    }

    /// Productivity score for `hour` (0-23). Always defined.
    pub fn productivity_score(&self, hour: u32) -> Result<f64> {
        if hour > 23 {
            return Err(ValidationError::HourOutOfRange(hour).into());
        }
        Ok(self.model().score(hour as u8))
    }

    /// All 24 hour profiles.
    pub fn hour_profiles(&self) -> Vec<HourProfile> {
        self.model().hour_profiles().to_vec()
    }

    /// Best awake hours, withheld while learning.
    pub fn top_productive_hours(&self, limit: usize) -> Gated<Vec<u8>> {
        let model = self.model();
        self.gate.gate(model.total_completions(), || {
            model.top_productive_hours(limit)
        })
    }

    /// Completions per category, withheld while learning.
    pub fn category_breakdown(&self) -> Gated<CategoryTally> {
        let model = self.model();
        self.gate.gate(model.total_completions(), || {
            model.category_breakdown().clone()
        })
    }

    /// Up to `limit` suggestions for the tasks `source` reports as pending.
    ///
    /// Empty while learning.
    pub fn suggestions<S>(&self, source: &S, limit: usize) -> Vec<ScheduleSuggestion>
    where
        S: PendingTaskSource + ?Sized,
    {
        let model = self.model();
        if self.gate.is_learning(model.total_completions()) {
            return Vec::new();
        }
        let tasks = source.pending_tasks();
        let mut suggestions = self.generator.generate(&model, &tasks);
        suggestions.truncate(limit);
        suggestions
    }

    pub fn render_ascii_chart(&self) -> String {
        self.model().render_ascii_chart()
    }

    /// Serializable copy of the log.
    pub fn snapshot(&self) -> LogSnapshot {
        self.read().log.snapshot()
    }

    /// Save the current log to `store`.
    pub fn persist(&self, store: &dyn SnapshotStore) -> Result<()> {
        let snapshot = self.snapshot();
        store.save(&snapshot)
    }
}

//! # Cadence Core Library
//!
//! This library learns when a user gets things done and suggests when to do
//! what is still pending. Like the CLI built on it, presentation layers are
//! thin: they record completions and poll the read-only query surface.
//!
//! ## Architecture
//!
//! - **Completion log**: Append-only ledger of finished tasks
//! - **Pattern model**: Per-hour productivity scores and per-category counts
//! - **Learning gate**: Cold-start threshold before rankings are served
//! - **Suggestions**: Ranked time-of-day proposals with confidence and reason
//! - **Storage**: SQLite/JSON snapshot stores and TOML configuration
//!
//! ## Key Components
//!
//! - [`Scheduler`]: Facade owning the log and the derived model
//! - [`PatternModel`]: Hour profiles and category breakdown
//! - [`SuggestionGenerator`]: Turns pending tasks into suggestions
//! - [`Database`]: Default snapshot store
//! - [`Config`]: Tunable thresholds and windows

pub mod completion;
pub mod error;
pub mod gate;
pub mod pattern;
pub mod scheduler;
pub mod storage;
pub mod suggest;

pub use completion::{CompletionLog, CompletionRecord, LogSnapshot, NewCompletion, TaskCategory};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use gate::{Gated, LearningGate, LearningStatus};
pub use pattern::{CategoryTally, HourProfile, HourTable, PatternModel};
pub use scheduler::Scheduler;
pub use storage::{Config, Database, HistoryWindow, JsonSnapshotStore, SnapshotStore};
pub use suggest::{
    parse_time_of_day, Confidence, PendingTask, PendingTaskSource, ScheduleSuggestion,
    SuggestionGenerator, SuggestionRule,
};

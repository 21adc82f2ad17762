//! Completion log: the single source of truth for finished tasks.
//!
//! Everything the pattern model learns is derived from these records.

mod log;
mod record;

pub use log::{CompletionLog, LogSnapshot, NewCompletion, SNAPSHOT_VERSION};
pub use record::{validate_focus_score, CompletionRecord, TaskCategory};

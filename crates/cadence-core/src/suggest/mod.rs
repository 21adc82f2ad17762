//! Schedule suggestions for pending tasks.
//!
//! Suggestions are recomputed from scratch on every request and are never
//! stored: they are recommendations, not commitments.

mod generator;
mod suggestion;
mod task;

pub use generator::SuggestionGenerator;
pub use suggestion::{Confidence, ScheduleSuggestion, SuggestionRule};
pub use task::{parse_time_of_day, PendingTask, PendingTaskSource};

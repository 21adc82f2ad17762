//! Productivity pattern learning.
//!
//! This module turns the completion log into per-hour productivity scores
//! and per-category counts, helping users see when they get things done.

mod hour;
mod model;

pub use hour::{compare_rank, HourProfile, HourTable, HOURS_PER_DAY};
pub use model::{CategoryTally, PatternModel};

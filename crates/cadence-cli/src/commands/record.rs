use chrono::{DateTime, FixedOffset, Local};
use clap::Args;

use cadence_core::{parse_time_of_day, TaskCategory, ValidationError};

use crate::context::{CliResult, Session};

#[derive(Args)]
pub struct RecordArgs {
    /// Task category (work, chores, creative, admin, health, personal)
    pub category: String,
    /// Completion time: RFC 3339 or HH:MM today (default: now)
    #[arg(long)]
    pub at: Option<String>,
    /// Focus rating between 0 and 1
    #[arg(long)]
    pub focus: Option<f64>,
    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RecordArgs) -> CliResult {
    let category: TaskCategory = args.category.parse()?;
    let completed_at = match args.at.as_deref() {
        Some(raw) => parse_completion_time(raw)?,
        None => Local::now().fixed_offset(),
    };

    let session = Session::open()?;
    let was_learning = session.scheduler.is_learning();
    let record = session
        .scheduler
        .record_completion(category, completed_at, args.focus)?;
    session.save()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!(
        "Recorded #{}: {} at {}",
        record.id,
        record.category,
        record.completed_at.format("%Y-%m-%d %H:%M")
    );
    let status = session.scheduler.learning_status();
    if status.remaining() > 0 {
        println!(
            "  Learning: {}/{} completions ({} more needed)",
            status.completions,
            status.threshold,
            status.remaining()
        );
    } else if was_learning {
        println!("  Learning complete - suggestions are now available.");
    }
    Ok(())
}

/// RFC 3339 timestamps keep their offset; bare `HH:MM` means today, local time.
pub fn parse_completion_time(raw: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(ts);
    }
    let time = parse_time_of_day(raw)?;
    Local::now()
        .date_naive()
        .and_time(time)
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| ValidationError::InvalidTime {
            input: raw.to_string(),
            message: "does not exist in the local time zone today".to_string(),
        })
}

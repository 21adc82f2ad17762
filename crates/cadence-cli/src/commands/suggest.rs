use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;

use cadence_core::{parse_time_of_day, PendingTask, ValidationError};

use crate::context::{CliResult, Session};

#[derive(Args)]
pub struct SuggestArgs {
    /// Pending task as "title:category" or "title:category@HH:MM" (repeatable)
    #[arg(long = "task")]
    pub tasks: Vec<String>,
    /// TOML file with [[task]] entries (title, category, earliest_start)
    #[arg(long)]
    pub tasks_file: Option<PathBuf>,
    /// Maximum number of suggestions
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Deserialize)]
struct TaskFile {
    #[serde(default)]
    task: Vec<TaskEntry>,
}

#[derive(Deserialize)]
struct TaskEntry {
    title: String,
    category: String,
    earliest_start: Option<String>,
}

impl TaskEntry {
    fn into_task(self) -> Result<PendingTask, ValidationError> {
        let mut task = PendingTask::new(self.title, self.category.parse()?);
        if let Some(raw) = self.earliest_start {
            task = task.not_before(parse_time_of_day(&raw)?);
        }
        Ok(task)
    }
}

/// Parse `title:category[@HH:MM]`. The title may itself contain ':'.
pub fn parse_task_arg(raw: &str) -> Result<PendingTask, ValidationError> {
    let invalid = || ValidationError::InvalidValue {
        field: "task".to_string(),
        message: format!("expected 'title:category[@HH:MM]', got '{raw}'"),
    };

    // '@' only introduces an earliest start when a clock time follows it.
    let (body, earliest) = match raw.rsplit_once('@') {
        Some((body, time)) => match parse_time_of_day(time) {
            Ok(time) => (body, Some(time)),
            Err(_) => (raw, None),
        },
        None => (raw, None),
    };
    let (title, category) = body.rsplit_once(':').ok_or_else(invalid)?;
    let title = title.trim();
    if title.is_empty() {
        return Err(invalid());
    }

    let task = PendingTask::new(title, category.parse()?);
    Ok(match earliest {
        Some(time) => task.not_before(time),
        None => task,
    })
}

fn load_tasks(args: &SuggestArgs) -> CliResult<Vec<PendingTask>> {
    let mut tasks = Vec::new();
    if let Some(path) = &args.tasks_file {
        let content = std::fs::read_to_string(path)?;
        let file: TaskFile = toml::from_str(&content)?;
        for entry in file.task {
            tasks.push(entry.into_task()?);
        }
    }
    for raw in &args.tasks {
        tasks.push(parse_task_arg(raw)?);
    }
    Ok(tasks)
}

pub fn run(args: SuggestArgs) -> CliResult {
    let tasks = load_tasks(&args)?;
    let session = Session::open()?;
    let scheduler = &session.scheduler;
    let suggestions = scheduler.suggestions(&tasks, args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if scheduler.is_learning() {
        let status = scheduler.learning_status();
        println!(
            "Not enough history yet ({}/{} completions). Keep recording completed tasks.",
            status.completions, status.threshold
        );
        return Ok(());
    }
    if suggestions.is_empty() {
        println!("No suggestions.");
        return Ok(());
    }

    println!("\nSuggested times\n");
    println!("{}", "=".repeat(50));
    for s in &suggestions {
        println!(
            "\n{}  {} [{}] ({} confidence)",
            s.suggested_time.format("%H:%M"),
            s.task_title,
            s.category,
            s.confidence
        );
        println!("  {}", s.reason);
    }
    println!("\n{}", "=".repeat(50));
    Ok(())
}

//! Read-only views over the learned patterns.

use cadence_core::{Gated, LearningStatus};

use crate::context::{CliResult, Session};

fn print_learning(status: &LearningStatus) {
    println!(
        "Still learning your rhythm: {}/{} completions ({:.0}%).",
        status.completions,
        status.threshold,
        status.progress * 100.0
    );
    println!(
        "  About {} more completions needed before patterns are shown.",
        status.remaining()
    );
}

pub fn status(json: bool) -> CliResult {
    let session = Session::open()?;
    let scheduler = &session.scheduler;
    let status = scheduler.learning_status();

    if json {
        let value = serde_json::json!({
            "is_learning": scheduler.is_learning(),
            "learning_progress": status.progress,
            "completions": status.completions,
            "threshold": status.threshold,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if scheduler.is_learning() {
        print_learning(&status);
    } else {
        println!("Ready: {} completions analyzed.", status.completions);
    }
    Ok(())
}

pub fn score(hour: Option<u32>, json: bool) -> CliResult {
    let session = Session::open()?;
    let scheduler = &session.scheduler;

    match (hour, json) {
        (Some(hour), true) => {
            let value = serde_json::json!({
                "hour": hour,
                "score": scheduler.productivity_score(hour)?,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        (Some(hour), false) => {
            let score = scheduler.productivity_score(hour)?;
            println!("{hour:02}:00  {:.0}%", score * 100.0);
        }
        (None, true) => {
            println!("{}", serde_json::to_string_pretty(&scheduler.hour_profiles())?);
        }
        (None, false) => {
            println!("{}", scheduler.render_ascii_chart());
            if scheduler.is_learning() {
                print_learning(&scheduler.learning_status());
            }
        }
    }
    Ok(())
}

pub fn hours(limit: usize, json: bool) -> CliResult {
    let session = Session::open()?;
    let top = session.scheduler.top_productive_hours(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&top)?);
        return Ok(());
    }

    match top {
        Gated::Learning(status) => print_learning(&status),
        Gated::Ready(hours) => {
            println!("Most productive hours:");
            for (i, hour) in hours.iter().enumerate() {
                let score = session.scheduler.productivity_score(u32::from(*hour))?;
                println!("  {}. {:02}:00 ({:.0}%)", i + 1, hour, score * 100.0);
            }
        }
    }
    Ok(())
}

pub fn categories(json: bool) -> CliResult {
    let session = Session::open()?;
    let breakdown = session.scheduler.category_breakdown();

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    match breakdown {
        Gated::Learning(status) => print_learning(&status),
        Gated::Ready(tally) => {
            let total: u64 = tally.values().sum();
            println!("Completions by category:");
            for (category, count) in &tally {
                let share = if total > 0 {
                    *count as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                println!("  {:<10} {:>4}  ({:.0}%)", category.to_string(), count, share);
            }
        }
    }
    Ok(())
}

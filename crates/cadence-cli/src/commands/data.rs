use std::path::PathBuf;

use clap::Subcommand;
use cadence_core::{JsonSnapshotStore, Scheduler, SnapshotStore, StorageError};

use crate::context::{CliResult, Session};

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete every recorded completion
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Write the completion log to a JSON file
    Export {
        path: PathBuf,
    },
    /// Replace the completion log with a JSON export
    Import {
        path: PathBuf,
    },
}

pub fn run(action: DataAction) -> CliResult {
    match action {
        DataAction::Reset { yes } => {
            if !yes {
                return Err("refusing to reset without --yes".into());
            }
            let session = Session::open()?;
            let removed = session.scheduler.total_completions();
            session.scheduler.reset();
            session.save()?;
            println!("removed {removed} completions");
        }
        DataAction::Export { path } => {
            let session = Session::open()?;
            let store = JsonSnapshotStore::new(path.clone());
            session.scheduler.persist(&store)?;
            println!(
                "exported {} completions to {}",
                session.scheduler.total_completions(),
                path.display()
            );
        }
        DataAction::Import { path } => {
            let store = JsonSnapshotStore::new(path.clone());
            let snapshot = store.load()?.ok_or_else(|| StorageError::File {
                path: path.clone(),
                message: "file not found".to_string(),
            })?;
            let session = Session::open()?;
            // Validate before touching the database.
            let imported = Scheduler::from_snapshot(session.scheduler.config().clone(), snapshot)?;
            imported.persist(&session.db)?;
            println!("imported {} completions", imported.total_completions());
        }
    }
    Ok(())
}

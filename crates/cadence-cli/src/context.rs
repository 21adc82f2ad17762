//! Loads configuration and the completion log for a command.

use cadence_core::{Config, Database, Scheduler};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Scheduler restored from the default database, plus that database.
pub struct Session {
    pub db: Database,
    pub scheduler: Scheduler,
}

impl Session {
    pub fn open() -> CliResult<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        let scheduler = Scheduler::load(config, &db)?;
        tracing::debug!(
            completions = scheduler.total_completions(),
            learning = scheduler.is_learning(),
            "session opened"
        );
        Ok(Self { db, scheduler })
    }

    /// Write the log back after a mutation.
    pub fn save(&self) -> CliResult {
        self.scheduler.persist(&self.db)?;
        Ok(())
    }
}

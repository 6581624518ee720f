pub mod auth;
pub mod config;
pub mod extension;
pub mod group;
pub mod limits;
pub mod notify;
pub mod seed;

use screentime_core::{Config, CoreError, Database, Workspace};
use serde::Serialize;

pub(crate) type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Stored state for one invocation. Changes are kept only if
/// [`Session::save`] is called.
pub(crate) struct Session {
    db: Database,
    pub workspace: Workspace,
}

impl Session {
    pub fn open() -> Result<Self, CoreError> {
        let config = Config::load()?;
        let db = Database::open()?;
        let workspace = if db.is_initialized()? {
            Workspace::from_snapshot(db.load_snapshot()?, &config)?
        } else {
            Workspace::new(&config)?
        };
        Ok(Self { db, workspace })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn save(&mut self) -> Result<(), CoreError> {
        let snapshot = self.workspace.to_snapshot();
        self.db.save_snapshot(&snapshot)?;
        Ok(())
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

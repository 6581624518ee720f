use screentime_core::{Config, Database, Workspace};

use super::CmdResult;

/// Replaces stored state with the demo data.
pub fn run(force: bool) -> CmdResult {
    let config = Config::load()?;
    let mut db = Database::open()?;
    if db.is_initialized()? && !force {
        return Err("data already exists; pass --force to overwrite".into());
    }

    let workspace = Workspace::seeded_with(&config)?;
    db.save_snapshot(&workspace.to_snapshot())?;
    tracing::info!("demo data loaded");
    println!("seeded: group 'Focus Friends', 3 apps, 6 users");
    Ok(())
}

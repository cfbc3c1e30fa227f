//! Admin smoke entry point.
//!
//! Loads `StoreConfig`, opens the store with migrations applied and prints
//! the current leaderboard.

use anyhow::{Context, Result};
use contest_core::{
    init_logging_from, SqliteTaskRepository, SqliteTeamRepository, StoreConfig, TeamService,
};
use log::info;

fn main() -> Result<()> {
    let mut config = StoreConfig::load().context("failed to load store config")?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        let absolute = std::env::current_dir()
            .context("failed to resolve working directory")?
            .join(log_dir);
        config.log_dir = Some(absolute.display().to_string());
    }
    init_logging_from(&config).context("failed to initialize logging")?;

    println!("contest_core ping={}", contest_core::ping());
    println!("contest_core version={}", contest_core::core_version());

    let conn = config
        .open()
        .with_context(|| format!("failed to open store `{}`", config.database_path))?;
    let service = TeamService::new(
        SqliteTeamRepository::try_new(&conn)?,
        SqliteTaskRepository::try_new(&conn)?,
    );

    let leaderboard = service.leaderboard(None)?;
    info!(
        "event=leaderboard module=cli status=ok teams={}",
        leaderboard.len()
    );
    for (rank, team) in leaderboard.iter().enumerate() {
        println!("{:>3}. {:<30} {:>6}", rank + 1, team, team.points);
    }

    Ok(())
}

//! Contest data store: users, teams, addresses, tasks and scores.
//! This crate is the single source of truth for contest data invariants,
//! including `Team::points` always matching the team's scores.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status, LoggingError};
pub use model::address::{Address, AddressId};
pub use model::score::{Score, ScoreId};
pub use model::state::IndianState;
pub use model::task::{Task, TaskId};
pub use model::team::{Team, TeamId};
pub use model::user::{User, UserId};
pub use model::ValidationError;
pub use repo::address_repo::{AddressRepository, SqliteAddressRepository};
pub use repo::score_repo::{SavedScore, ScoreRepository, SqliteScoreRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::team_repo::{SqliteTeamRepository, TeamListQuery, TeamOrder, TeamRepository};
pub use repo::user_repo::{SqliteUserRepository, UserListQuery, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::score_service::ScoreService;
pub use service::team_service::{generate_passcode, TeamService, TeamServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

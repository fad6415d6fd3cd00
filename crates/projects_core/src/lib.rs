//! Core data access for the project tracker.
//! This crate owns the transactional store and the service surface that
//! console callers use.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, DbConfig, LogConfig};
pub use db::{ConnectionProvider, DbError, SqliteConnectionProvider};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::decimal::{Decimal2, DecimalParseError};
pub use model::project::{Category, Material, Project, ProjectId, Step};
pub use repo::mapper::{RecordBinder, RecordMapper};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::{PersistenceError, PersistenceResult};
pub use service::project_service::{ProjectService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Builds the service stack over the configured SQLite file.
pub fn open_project_service(
    config: &DbConfig,
) -> ProjectService<SqliteProjectRepository<SqliteConnectionProvider>> {
    let provider = SqliteConnectionProvider::new(config.clone());
    ProjectService::new(SqliteProjectRepository::new(provider))
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

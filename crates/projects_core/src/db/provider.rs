//! Per-operation connection provisioning.
//!
//! # Responsibility
//! - Yield an independent, bootstrapped connection for each store operation.
//!
//! # Invariants
//! - Two calls never return the same connection; callers own what they get
//!   and release it by dropping it.

use super::{open_db, DbResult};
use crate::config::DbConfig;
use rusqlite::Connection;

/// Source of fresh database connections.
pub trait ConnectionProvider {
    /// Opens a new connection scoped to one logical operation.
    fn connect(&self) -> DbResult<Connection>;
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    fn connect(&self) -> DbResult<Connection> {
        (**self).connect()
    }
}

/// Provider that opens the configured SQLite file on every call.
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    config: DbConfig,
}

impl SqliteConnectionProvider {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }
}

impl ConnectionProvider for SqliteConnectionProvider {
    fn connect(&self) -> DbResult<Connection> {
        open_db(&self.config)
    }
}

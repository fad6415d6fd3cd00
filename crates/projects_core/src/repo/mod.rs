//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL, row mapping and transaction handling from services.
//!
//! # Invariants
//! - Every repository operation runs in exactly one transaction on one
//!   connection, and rolls back before any failure is returned.
//! - Repository APIs report "no matching row" as `None`/`false`, never as an
//!   error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod mapper;
pub mod project_repo;
mod transaction;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Failure while talking to the backing store.
#[derive(Debug)]
pub enum PersistenceError {
    /// Connection could not be opened or bootstrapped.
    Connect(DbError),
    /// Statement, identity retrieval, begin or commit failed.
    Sqlite(rusqlite::Error),
    /// Persisted row cannot be mapped to a valid record.
    InvalidData(String),
    /// A statement keyed by a unique identity touched more than one row.
    UnexpectedRowCount {
        operation: &'static str,
        affected: usize,
    },
    /// The rollback that followed `cause` failed as well.
    Rollback {
        cause: Box<PersistenceError>,
        rollback: rusqlite::Error,
    },
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect(err) => write!(f, "cannot open database connection: {err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UnexpectedRowCount {
                operation,
                affected,
            } => write!(f, "{operation} affected {affected} rows, expected at most 1"),
            Self::Rollback { cause, rollback } => {
                write!(f, "{cause} (rollback also failed: {rollback})")
            }
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connect(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::UnexpectedRowCount { .. } => None,
            Self::Rollback { cause, .. } => Some(cause.as_ref()),
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Connect(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

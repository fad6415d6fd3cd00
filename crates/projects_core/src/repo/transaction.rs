//! Scoped connection + transaction execution.
//!
//! # Invariants
//! - One connection and one transaction per call, both dropped on return.
//! - Work that fails is rolled back before its error is returned.
//! - A failed begin or commit is logged before its error is returned; a
//!   failed commit is rolled back by `rusqlite::Transaction`'s drop.

use super::{PersistenceError, PersistenceResult};
use crate::db::ConnectionProvider;
use log::{debug, error, warn};
use rusqlite::Transaction;
use std::time::Instant;

/// Runs `work` inside a fresh transaction obtained from `provider`.
///
/// Commits when `work` succeeds, rolls back when it fails.
pub(crate) fn in_transaction<P, T, F>(
    provider: &P,
    operation: &'static str,
    work: F,
) -> PersistenceResult<T>
where
    P: ConnectionProvider + ?Sized,
    F: FnOnce(&Transaction<'_>) -> PersistenceResult<T>,
{
    let started_at = Instant::now();

    let mut conn = provider.connect().map_err(|err| {
        error!(
            "event={} module=repo status=error error_code=connect_failed error={}",
            operation, err
        );
        PersistenceError::Connect(err)
    })?;
    let tx = conn.transaction().map_err(|err| {
        error!(
            "event={} module=repo status=error error_code=begin_failed error={}",
            operation, err
        );
        PersistenceError::Sqlite(err)
    })?;

    match work(&tx) {
        Ok(value) => {
            tx.commit().map_err(|err| {
                error!(
                    "event={} module=repo status=error error_code=commit_failed duration_ms={} error={}",
                    operation,
                    started_at.elapsed().as_millis(),
                    err
                );
                PersistenceError::Sqlite(err)
            })?;
            debug!(
                "event={} module=repo status=ok duration_ms={}",
                operation,
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(cause) => match tx.rollback() {
            Ok(()) => {
                warn!(
                    "event={} module=repo status=rollback duration_ms={} error={}",
                    operation,
                    started_at.elapsed().as_millis(),
                    cause
                );
                Err(cause)
            }
            Err(rollback) => {
                error!(
                    "event={} module=repo status=error error_code=rollback_failed duration_ms={} error={}",
                    operation,
                    started_at.elapsed().as_millis(),
                    rollback
                );
                Err(PersistenceError::Rollback {
                    cause: Box::new(cause),
                    rollback,
                })
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::in_transaction;
    use crate::config::DbConfig;
    use crate::db::{ConnectionProvider, SqliteConnectionProvider};
    use crate::repo::PersistenceError;
    use std::error::Error;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SqliteConnectionProvider) {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqliteConnectionProvider::new(DbConfig::new(dir.path().join("tx.db")));
        (dir, provider)
    }

    fn project_count(provider: &SqliteConnectionProvider) -> i64 {
        provider
            .connect()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM project;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn successful_work_is_committed() {
        let (_dir, provider) = setup();

        let inserted = in_transaction(&provider, "test_commit", |tx| {
            Ok(tx.execute("INSERT INTO project (project_name) VALUES ('kept');", [])?)
        })
        .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(project_count(&provider), 1);
    }

    #[test]
    fn failed_work_is_rolled_back_and_its_error_returned() {
        let (_dir, provider) = setup();

        let err = in_transaction(&provider, "test_rollback", |tx| {
            tx.execute("INSERT INTO project (project_name) VALUES ('dropped');", [])?;
            Err::<(), _>(PersistenceError::InvalidData("stop".to_string()))
        })
        .unwrap_err();

        assert!(matches!(err, PersistenceError::InvalidData(ref message) if message == "stop"));
        assert_eq!(project_count(&provider), 0);
    }

    #[test]
    fn failed_rollback_keeps_the_original_cause() {
        let (_dir, provider) = setup();

        let err = in_transaction(&provider, "test_rollback_failure", |tx| {
            tx.execute_batch("ROLLBACK;")?;
            Err::<(), _>(PersistenceError::InvalidData("stop".to_string()))
        })
        .unwrap_err();

        let PersistenceError::Rollback { cause, .. } = &err else {
            panic!("expected rollback failure, got {err:?}");
        };
        assert!(matches!(cause.as_ref(), PersistenceError::InvalidData(_)));
        assert_eq!(
            err.source().map(ToString::to_string),
            Some("invalid persisted data: stop".to_string())
        );
        assert!(err.to_string().contains("rollback also failed"));
    }

    #[test]
    fn failed_commit_surfaces_as_sqlite_error() {
        let (_dir, provider) = setup();

        let err = in_transaction(&provider, "test_commit_failure", |tx| {
            tx.execute("INSERT INTO project (project_name) VALUES ('lost');", [])?;
            tx.execute_batch("ROLLBACK;")?;
            Ok(())
        })
        .unwrap_err();

        assert!(matches!(err, PersistenceError::Sqlite(_)));
        assert_eq!(project_count(&provider), 0);
    }
}

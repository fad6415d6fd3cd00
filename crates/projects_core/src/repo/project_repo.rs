//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `project` table.
//! - Aggregate categories, steps and materials for the single-project detail
//!   fetch.
//!
//! # Invariants
//! - Each call opens its own connection and transaction; nothing is shared
//!   between calls.
//! - The detail fetch reads the project and all three child collections in
//!   one transaction, so a returned project is never partially populated.
//! - Updates never write `project_id`.
//! - Child rows are removed by schema cascades, not by this module.

use super::mapper::{RecordBinder, RecordMapper};
use super::transaction::in_transaction;
use super::{PersistenceError, PersistenceResult};
use crate::db::ConnectionProvider;
use crate::model::project::{Category, Material, Project, ProjectId, Step};
use log::debug;
use rusqlite::types::ToSql;
use rusqlite::Connection;

/// Repository interface for project persistence.
pub trait ProjectRepository {
    /// Inserts a new project and returns it with the generated id.
    fn insert_project(&self, project: Project) -> PersistenceResult<Project>;
    /// Lists project summaries ordered by name.
    fn fetch_all_projects(&self) -> PersistenceResult<Vec<Project>>;
    /// Gets one project with categories, steps and materials attached.
    fn fetch_project_by_id(&self, project_id: ProjectId) -> PersistenceResult<Option<Project>>;
    /// Replaces all mutable fields; returns whether a row matched.
    fn modify_project_details(&self, project: &Project) -> PersistenceResult<bool>;
    /// Deletes one project; returns whether a row was removed.
    fn delete_project(&self, project_id: ProjectId) -> PersistenceResult<bool>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteProjectRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> ProjectRepository for SqliteProjectRepository<P> {
    fn insert_project(&self, mut project: Project) -> PersistenceResult<Project> {
        let project_id = in_transaction(&self.provider, "project_insert", |tx| {
            tx.execute(
                "INSERT INTO project (
                    project_name,
                    estimated_hours,
                    actual_hours,
                    difficulty,
                    notes
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                project.bind_params().as_slice(),
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        project.project_id = Some(project_id);
        Ok(project)
    }

    fn fetch_all_projects(&self) -> PersistenceResult<Vec<Project>> {
        in_transaction(&self.provider, "project_fetch_all", |tx| {
            query_records(
                tx,
                &format!(
                    "SELECT {}
                     FROM project
                     ORDER BY project_name COLLATE NOCASE ASC, project_id ASC;",
                    Project::COLUMNS
                ),
                &[],
            )
        })
    }

    fn fetch_project_by_id(&self, project_id: ProjectId) -> PersistenceResult<Option<Project>> {
        in_transaction(&self.provider, "project_fetch_by_id", |tx| {
            let Some(mut project) = fetch_project_row(tx, project_id)? else {
                return Ok(None);
            };

            project.categories = fetch_categories(tx, project_id)?;
            project.steps = fetch_steps(tx, project_id)?;
            project.materials = fetch_materials(tx, project_id)?;
            Ok(Some(project))
        })
    }

    fn modify_project_details(&self, project: &Project) -> PersistenceResult<bool> {
        let Some(project_id) = project.project_id else {
            debug!("event=project_update module=repo status=skipped reason=unassigned_id");
            return Ok(false);
        };

        in_transaction(&self.provider, "project_update", |tx| {
            let mut params = project.bind_params();
            params.push(&project_id as &dyn ToSql);

            let changed = tx.execute(
                "UPDATE project
                 SET
                    project_name = ?1,
                    estimated_hours = ?2,
                    actual_hours = ?3,
                    difficulty = ?4,
                    notes = ?5
                 WHERE project_id = ?6;",
                params.as_slice(),
            )?;
            single_row_outcome("project_update", changed)
        })
    }

    fn delete_project(&self, project_id: ProjectId) -> PersistenceResult<bool> {
        in_transaction(&self.provider, "project_delete", |tx| {
            let changed = tx.execute("DELETE FROM project WHERE project_id = ?1;", [project_id])?;
            single_row_outcome("project_delete", changed)
        })
    }
}

fn single_row_outcome(operation: &'static str, affected: usize) -> PersistenceResult<bool> {
    match affected {
        0 => Ok(false),
        1 => Ok(true),
        affected => Err(PersistenceError::UnexpectedRowCount {
            operation,
            affected,
        }),
    }
}

fn fetch_project_row(
    conn: &Connection,
    project_id: ProjectId,
) -> PersistenceResult<Option<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {}
         FROM project
         WHERE project_id = ?1;",
        Project::COLUMNS
    ))?;

    let mut rows = stmt.query([project_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(Project::decode(row)?));
    }

    Ok(None)
}

fn fetch_categories(
    conn: &Connection,
    project_id: ProjectId,
) -> PersistenceResult<Vec<Category>> {
    query_records(
        conn,
        &format!(
            "SELECT {}
             FROM project_category pc
             INNER JOIN category c ON c.category_id = pc.category_id
             WHERE pc.project_id = ?1
             ORDER BY c.category_name COLLATE NOCASE ASC, c.category_id ASC;",
            Category::COLUMNS
        ),
        &[&project_id],
    )
}

fn fetch_steps(conn: &Connection, project_id: ProjectId) -> PersistenceResult<Vec<Step>> {
    query_records(
        conn,
        &format!(
            "SELECT {}
             FROM step
             WHERE project_id = ?1
             ORDER BY step_order ASC, step_id ASC;",
            Step::COLUMNS
        ),
        &[&project_id],
    )
}

fn fetch_materials(
    conn: &Connection,
    project_id: ProjectId,
) -> PersistenceResult<Vec<Material>> {
    query_records(
        conn,
        &format!(
            "SELECT {}
             FROM material
             WHERE project_id = ?1
             ORDER BY material_id ASC;",
            Material::COLUMNS
        ),
        &[&project_id],
    )
}

fn query_records<T: RecordMapper>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> PersistenceResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        records.push(T::decode(row)?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::single_row_outcome;
    use crate::repo::PersistenceError;

    #[test]
    fn single_row_outcome_maps_affected_counts() {
        assert!(!single_row_outcome("project_delete", 0).unwrap());
        assert!(single_row_outcome("project_delete", 1).unwrap());

        let err = single_row_outcome("project_update", 2).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnexpectedRowCount {
                operation: "project_update",
                affected: 2,
            }
        ));
        assert_eq!(
            err.to_string(),
            "project_update affected 2 rows, expected at most 1"
        );
    }
}

//! Fixed-shape row mapping for project records.
//!
//! # Responsibility
//! - Decode one result row into a typed record.
//! - Encode a record's writable fields as ordered statement parameters.
//!
//! # Invariants
//! - `COLUMNS` lists exactly the columns `decode` reads, in select order.
//! - `bind_params` order matches the placeholder order of the write SQL.

use super::{PersistenceError, PersistenceResult};
use crate::model::project::{Category, Material, Project, Step};
use rusqlite::types::ToSql;
use rusqlite::Row;

/// Maps a result row to a record.
pub trait RecordMapper: Sized {
    /// Comma-separated column list selected for this record.
    const COLUMNS: &'static str;

    fn decode(row: &Row<'_>) -> PersistenceResult<Self>;
}

/// Produces ordered statement parameters for a record's writable fields.
pub trait RecordBinder {
    fn bind_params(&self) -> Vec<&dyn ToSql>;
}

impl RecordMapper for Project {
    const COLUMNS: &'static str =
        "project_id, project_name, estimated_hours, actual_hours, difficulty, notes";

    fn decode(row: &Row<'_>) -> PersistenceResult<Self> {
        let difficulty: Option<i64> = row.get("difficulty")?;
        let difficulty = difficulty
            .map(|value| {
                u8::try_from(value).map_err(|_| {
                    PersistenceError::InvalidData(format!(
                        "invalid difficulty `{value}` in project.difficulty"
                    ))
                })
            })
            .transpose()?;

        Ok(Project {
            project_id: Some(row.get("project_id")?),
            project_name: row.get("project_name")?,
            estimated_hours: row.get("estimated_hours")?,
            actual_hours: row.get("actual_hours")?,
            difficulty,
            notes: row.get("notes")?,
            ..Project::default()
        })
    }
}

/// Binds `project_name, estimated_hours, actual_hours, difficulty, notes`.
impl RecordBinder for Project {
    fn bind_params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.project_name as &dyn ToSql,
            &self.estimated_hours as &dyn ToSql,
            &self.actual_hours as &dyn ToSql,
            &self.difficulty as &dyn ToSql,
            &self.notes as &dyn ToSql,
        ]
    }
}

impl RecordMapper for Category {
    const COLUMNS: &'static str = "c.category_id, c.category_name";

    fn decode(row: &Row<'_>) -> PersistenceResult<Self> {
        Ok(Category {
            category_id: row.get("category_id")?,
            category_name: row.get("category_name")?,
        })
    }
}

impl RecordMapper for Step {
    const COLUMNS: &'static str = "step_id, project_id, step_text, step_order";

    fn decode(row: &Row<'_>) -> PersistenceResult<Self> {
        Ok(Step {
            step_id: row.get("step_id")?,
            project_id: row.get("project_id")?,
            step_text: row.get("step_text")?,
            step_order: row.get("step_order")?,
        })
    }
}

impl RecordMapper for Material {
    const COLUMNS: &'static str = "material_id, project_id, material_name, num_required, cost";

    fn decode(row: &Row<'_>) -> PersistenceResult<Self> {
        Ok(Material {
            material_id: row.get("material_id")?,
            project_id: row.get("project_id")?,
            material_name: row.get("material_name")?,
            num_required: row.get("num_required")?,
            cost: row.get("cost")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordBinder, RecordMapper};
    use crate::model::decimal::Decimal2;
    use crate::model::project::Project;
    use crate::repo::PersistenceError;
    use rusqlite::Connection;

    fn decode_project(sql: &str) -> Result<Project, PersistenceError> {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare(sql).unwrap();
        let mut rows = stmt.query([]).unwrap();
        let row = rows.next().unwrap().expect("one row");
        Project::decode(row)
    }

    #[test]
    fn project_decode_reads_every_column() {
        let project = decode_project(
            "SELECT 7 AS project_id, 'Shed' AS project_name, 12.5 AS estimated_hours,
                    '3.25' AS actual_hours, 4 AS difficulty, 'paint it' AS notes",
        )
        .unwrap();

        assert_eq!(project.project_id, Some(7));
        assert_eq!(project.project_name, "Shed");
        assert_eq!(project.estimated_hours, Some(Decimal2::from_hundredths(1250)));
        assert_eq!(project.actual_hours, Some(Decimal2::from_hundredths(325)));
        assert_eq!(project.difficulty, Some(4));
        assert_eq!(project.notes.as_deref(), Some("paint it"));
        assert!(!project.has_details());
    }

    #[test]
    fn project_decode_rejects_out_of_range_difficulty() {
        let err = decode_project(
            "SELECT 1 AS project_id, 'x' AS project_name, NULL AS estimated_hours,
                    NULL AS actual_hours, 300 AS difficulty, NULL AS notes",
        )
        .unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidData(message) if message.contains("300")));
    }

    #[test]
    fn project_bind_params_follow_write_column_order() {
        let mut project = Project::new("Shed");
        project.difficulty = Some(2);
        assert_eq!(project.bind_params().len(), 5);

        let conn = Connection::open_in_memory().unwrap();
        let (name, difficulty): (String, Option<i64>) = conn
            .query_row(
                "SELECT ?1, ?4 WHERE ?2 IS NULL AND ?3 IS NULL AND ?5 IS NULL",
                project.bind_params().as_slice(),
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(name, "Shed");
        assert_eq!(difficulty, Some(2));
    }
}

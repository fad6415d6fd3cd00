//! Project use-case service.
//!
//! # Responsibility
//! - Provide the add/list/get/update/delete surface used by console callers.
//! - Convert absent rows and zero-row writes into `ServiceError::NotFound`.
//!
//! # Invariants
//! - Persistence failures pass through unchanged as `ServiceError::Persistence`.
//! - `add` and `list` never report `NotFound`.
//! - The service holds no state between calls.

use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::PersistenceError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PROJECT_ENTITY: &str = "project";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// No row exists for the requested identity.
    NotFound {
        entity: &'static str,
        id: Option<ProjectId>,
    },
    /// Persistence-layer failure, already rolled back.
    Persistence(PersistenceError),
}

impl ServiceError {
    fn project_not_found(id: Option<ProjectId>) -> Self {
        Self::NotFound {
            entity: PROJECT_ENTITY,
            id,
        }
    }

    /// Returns whether this error reports a missing row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound {
                entity,
                id: Some(id),
            } => write!(f, "{entity} with ID={id} does not exist"),
            Self::NotFound { entity, id: None } => {
                write!(f, "{entity} without an assigned ID does not exist")
            }
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<PersistenceError> for ServiceError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// Project service facade over repository implementations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new project and returns it with its assigned id.
    pub fn add(&self, project: Project) -> ServiceResult<Project> {
        let project = self.repo.insert_project(project)?;
        info!(
            "event=project_add module=service status=ok project_id={}",
            project.project_id.unwrap_or_default()
        );
        Ok(project)
    }

    /// Lists project summaries ordered by name.
    pub fn list(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.fetch_all_projects()?)
    }

    /// Gets one project with its categories, steps and materials.
    pub fn get_by_id(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .fetch_project_by_id(project_id)?
            .ok_or_else(|| ServiceError::project_not_found(Some(project_id)))
    }

    /// Replaces all mutable fields of an existing project.
    pub fn update(&self, project: &Project) -> ServiceResult<()> {
        if !self.repo.modify_project_details(project)? {
            return Err(ServiceError::project_not_found(project.project_id));
        }
        info!(
            "event=project_update module=service status=ok project_id={}",
            project.project_id.unwrap_or_default()
        );
        Ok(())
    }

    /// Deletes one project; its steps, materials and category links cascade.
    pub fn delete_by_id(&self, project_id: ProjectId) -> ServiceResult<()> {
        if !self.repo.delete_project(project_id)? {
            return Err(ServiceError::project_not_found(Some(project_id)));
        }
        info!("event=project_delete module=service status=ok project_id={project_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectService, ServiceError};
    use crate::model::project::{Project, ProjectId};
    use crate::repo::project_repo::ProjectRepository;
    use crate::repo::{PersistenceError, PersistenceResult};
    use std::cell::RefCell;

    /// In-memory repository double that records the last call.
    #[derive(Default)]
    struct StubRepository {
        stored: Option<Project>,
        write_outcome: bool,
        fail: bool,
        calls: RefCell<Vec<&'static str>>,
    }

    impl StubRepository {
        fn check(&self, call: &'static str) -> PersistenceResult<()> {
            self.calls.borrow_mut().push(call);
            if self.fail {
                return Err(PersistenceError::InvalidData("stub failure".to_string()));
            }
            Ok(())
        }
    }

    impl ProjectRepository for StubRepository {
        fn insert_project(&self, mut project: Project) -> PersistenceResult<Project> {
            self.check("insert")?;
            project.project_id = Some(1);
            Ok(project)
        }

        fn fetch_all_projects(&self) -> PersistenceResult<Vec<Project>> {
            self.check("fetch_all")?;
            Ok(self.stored.iter().cloned().collect())
        }

        fn fetch_project_by_id(&self, _: ProjectId) -> PersistenceResult<Option<Project>> {
            self.check("fetch_by_id")?;
            Ok(self.stored.clone())
        }

        fn modify_project_details(&self, _: &Project) -> PersistenceResult<bool> {
            self.check("modify")?;
            Ok(self.write_outcome)
        }

        fn delete_project(&self, _: ProjectId) -> PersistenceResult<bool> {
            self.check("delete")?;
            Ok(self.write_outcome)
        }
    }

    #[test]
    fn absent_and_zero_row_outcomes_become_not_found() {
        let service = ProjectService::new(StubRepository::default());

        let get_err = service.get_by_id(42).unwrap_err();
        assert!(matches!(
            get_err,
            ServiceError::NotFound { entity: "project", id: Some(42) }
        ));
        assert_eq!(get_err.to_string(), "project with ID=42 does not exist");

        let mut project = Project::new("Desk");
        project.project_id = Some(7);
        assert!(matches!(
            service.update(&project),
            Err(ServiceError::NotFound { id: Some(7), .. })
        ));
        assert!(service.delete_by_id(9).unwrap_err().is_not_found());
    }

    #[test]
    fn successful_writes_return_ok() {
        let service = ProjectService::new(StubRepository {
            write_outcome: true,
            ..StubRepository::default()
        });

        let added = service.add(Project::new("Desk")).unwrap();
        assert_eq!(added.project_id, Some(1));
        service.update(&added).unwrap();
        service.delete_by_id(1).unwrap();
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn persistence_errors_pass_through_unchanged() {
        let service = ProjectService::new(StubRepository {
            fail: true,
            ..StubRepository::default()
        });

        for result in [
            service.add(Project::new("Desk")).map(|_| ()),
            service.list().map(|_| ()),
            service.get_by_id(1).map(|_| ()),
            service.delete_by_id(1),
        ] {
            assert!(matches!(
                result,
                Err(ServiceError::Persistence(PersistenceError::InvalidData(_)))
            ));
        }
        assert_eq!(
            service.repo.calls.borrow().as_slice(),
            ["insert", "fetch_all", "fetch_by_id", "delete"]
        );
    }
}

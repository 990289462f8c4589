//! Validation record service

use crate::error::{Action, ServiceError};
use crate::latency::Endpoint;
use crate::services::{check_identity, CrudService, Deleted, ServiceContext};
use bizplan_model::{
    check_score, check_scores, FrameworkId, NewValidationRecord, Patch, ProjectId, RecordKind,
    ValidationId, ValidationRecord,
};

const SERVICE: &str = "ValidationService";

/// Validation records, one per project
#[derive(Debug, Clone)]
pub struct ValidationService {
    crud: CrudService<ValidationRecord>,
}

impl ValidationService {
    /// Create service owning `records`
    #[must_use]
    pub fn new(records: Vec<ValidationRecord>, ctx: ServiceContext) -> Self {
        Self {
            crud: CrudService::new(SERVICE, records, ctx),
        }
    }

    /// Every validation record
    ///
    /// # Errors
    /// `EmptyCollection` when there are none.
    pub async fn get_all(&self) -> Result<Vec<ValidationRecord>, ServiceError> {
        self.crud.get_all().await
    }

    /// Validation record with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, `NotFound` when absent.
    pub async fn get_by_id(&self, id: ValidationId) -> Result<ValidationRecord, ServiceError> {
        self.crud.get_by_id(id).await
    }

    /// Validation record of `project_id`, if one exists
    ///
    /// # Errors
    /// `Validation` for project id 0.
    pub async fn try_get_by_project_id(
        &self,
        project_id: ProjectId,
    ) -> Result<Option<ValidationRecord>, ServiceError> {
        let operation = "try_get_by_project_id";
        check_identity(SERVICE, operation, RecordKind::Project, project_id)?;
        self.crud
            .run(operation, Action::Load, Endpoint::ByProject, move |store| async move {
                Ok(store.find(|r| r.project_id == project_id).await)
            })
            .await
    }

    /// Validation record of `project_id`, persisting the starter scores on
    /// first use
    ///
    /// # Errors
    /// `Validation` for project id 0.
    pub async fn ensure_default(
        &self,
        project_id: ProjectId,
    ) -> Result<ValidationRecord, ServiceError> {
        let operation = "ensure_default";
        check_identity(SERVICE, operation, RecordKind::Project, project_id)?;
        self.crud
            .run(operation, Action::Create, Endpoint::ByProject, move |store| async move {
                let (record, created) = store
                    .find_or_insert_with(
                        |r| r.project_id == project_id,
                        |id, now| ValidationRecord::starter(id, project_id, now),
                    )
                    .await?;
                if created {
                    tracing::info!(
                        project_id = %project_id,
                        validation_id = %record.id,
                        "created default validation record"
                    );
                }
                Ok(record)
            })
            .await
    }

    /// Existing validation record of `project_id`, or the persisted default
    ///
    /// # Errors
    /// `Validation` for project id 0.
    pub async fn get_or_create_by_project_id(
        &self,
        project_id: ProjectId,
    ) -> Result<ValidationRecord, ServiceError> {
        match self.try_get_by_project_id(project_id).await? {
            Some(record) => Ok(record),
            None => self.ensure_default(project_id).await,
        }
    }

    /// Create a validation record from `draft`
    ///
    /// # Errors
    /// `Validation` for project id 0, an invalid score, or a project that
    /// already has a record.
    pub async fn create(
        &self,
        draft: NewValidationRecord,
    ) -> Result<ValidationRecord, ServiceError> {
        let operation = "create";
        let project_id = draft.project_id;
        check_identity(SERVICE, operation, RecordKind::Project, project_id)?;
        self.crud.check_input(operation, check_scores(&draft.scores))?;
        self.crud
            .create_unique_with(
                move |r| r.project_id == project_id,
                format!("Validation data already exists for project {project_id}"),
                move |id, now| ValidationRecord::from_draft(id, draft.clone(), now),
            )
            .await
    }

    /// Merge `patch` into the record with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, an empty patch or an invalid score;
    /// `NotFound` when absent.
    pub async fn update<P>(&self, id: ValidationId, patch: P) -> Result<ValidationRecord, ServiceError>
    where
        P: Patch<ValidationRecord> + Clone + Sync,
    {
        self.crud.update(id, patch).await
    }

    /// Record one section score, making `framework` the active one
    ///
    /// # Errors
    /// `Validation` for id 0, a section outside the framework or a score
    /// above 100; `NotFound` when absent.
    pub async fn set_score(
        &self,
        id: ValidationId,
        framework: FrameworkId,
        section: &str,
        score: u32,
    ) -> Result<ValidationRecord, ServiceError> {
        let operation = "set_score";
        self.crud
            .check_input(operation, check_score(framework, section, score))?;
        let section = section.to_string();
        self.crud
            .modify(operation, id, move |record| {
                record.set_score(framework, &section, score)
            })
            .await
    }

    /// Remove the record with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, `NotFound` when absent.
    pub async fn delete(&self, id: ValidationId) -> Result<Deleted<ValidationRecord>, ServiceError> {
        self.crud.delete(id).await
    }
}

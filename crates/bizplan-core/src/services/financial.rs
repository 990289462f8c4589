//! Financial model service
//!
//! Each project owns at most one financial model. Lookup by project is
//! split in two: [`FinancialService::try_get_by_project_id`] never writes,
//! [`FinancialService::ensure_default`] persists the starter model when the
//! project has none.

use crate::error::{Action, ServiceError};
use crate::latency::Endpoint;
use crate::services::{check_identity, CrudService, Deleted, ServiceContext};
use bizplan_model::{
    FinancialModel, FinancialModelId, NewFinancialModel, Patch, ProjectId, RecordKind,
};

const SERVICE: &str = "FinancialService";

/// Financial models, one per project
#[derive(Debug, Clone)]
pub struct FinancialService {
    crud: CrudService<FinancialModel>,
}

impl FinancialService {
    /// Create service owning `models`
    #[must_use]
    pub fn new(models: Vec<FinancialModel>, ctx: ServiceContext) -> Self {
        Self {
            crud: CrudService::new(SERVICE, models, ctx),
        }
    }

    /// Every financial model
    ///
    /// # Errors
    /// `EmptyCollection` when there are none.
    pub async fn get_all(&self) -> Result<Vec<FinancialModel>, ServiceError> {
        self.crud.get_all().await
    }

    /// Financial model with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, `NotFound` when absent.
    pub async fn get_by_id(&self, id: FinancialModelId) -> Result<FinancialModel, ServiceError> {
        self.crud.get_by_id(id).await
    }

    /// Financial model of `project_id`, if one exists
    ///
    /// # Errors
    /// `Validation` for project id 0.
    pub async fn try_get_by_project_id(
        &self,
        project_id: ProjectId,
    ) -> Result<Option<FinancialModel>, ServiceError> {
        let operation = "try_get_by_project_id";
        check_identity(SERVICE, operation, RecordKind::Project, project_id)?;
        self.crud
            .run(operation, Action::Load, Endpoint::ByProject, move |store| async move {
                Ok(store.find(|m| m.project_id == project_id).await)
            })
            .await
    }

    /// Financial model of `project_id`, persisting the starter model on
    /// first use
    ///
    /// Concurrent callers for the same project all receive the same record.
    ///
    /// # Errors
    /// `Validation` for project id 0.
    pub async fn ensure_default(
        &self,
        project_id: ProjectId,
    ) -> Result<FinancialModel, ServiceError> {
        let operation = "ensure_default";
        check_identity(SERVICE, operation, RecordKind::Project, project_id)?;
        self.crud
            .run(operation, Action::Create, Endpoint::ByProject, move |store| async move {
                let (model, created) = store
                    .find_or_insert_with(
                        |m| m.project_id == project_id,
                        |id, now| FinancialModel::starter(id, project_id, now),
                    )
                    .await?;
                if created {
                    tracing::info!(
                        project_id = %project_id,
                        model_id = %model.id,
                        "created default financial model"
                    );
                }
                Ok(model)
            })
            .await
    }

    /// Existing financial model of `project_id`, or the persisted default
    ///
    /// # Errors
    /// `Validation` for project id 0.
    pub async fn get_or_create_by_project_id(
        &self,
        project_id: ProjectId,
    ) -> Result<FinancialModel, ServiceError> {
        match self.try_get_by_project_id(project_id).await? {
            Some(model) => Ok(model),
            None => self.ensure_default(project_id).await,
        }
    }

    /// Create a financial model from `draft`
    ///
    /// # Errors
    /// `Validation` for project id 0 or a project that already has a model.
    pub async fn create(&self, draft: NewFinancialModel) -> Result<FinancialModel, ServiceError> {
        let project_id = draft.project_id;
        check_identity(SERVICE, "create", RecordKind::Project, project_id)?;
        self.crud
            .create_unique_with(
                move |m| m.project_id == project_id,
                format!("Financial model already exists for project {project_id}"),
                move |id, now| FinancialModel::from_draft(id, draft.clone(), now),
            )
            .await
    }

    /// Merge `patch` into the model with `id`
    ///
    /// A whole [`FinancialModel`] saves wholesale.
    ///
    /// # Errors
    /// `Validation` for id 0, an empty patch or a blank line name;
    /// `NotFound` when absent.
    pub async fn update<P>(
        &self,
        id: FinancialModelId,
        patch: P,
    ) -> Result<FinancialModel, ServiceError>
    where
        P: Patch<FinancialModel> + Clone + Sync,
    {
        self.crud.update(id, patch).await
    }

    /// Remove the model with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, `NotFound` when absent.
    pub async fn delete(
        &self,
        id: FinancialModelId,
    ) -> Result<Deleted<FinancialModel>, ServiceError> {
        self.crud.delete(id).await
    }
}

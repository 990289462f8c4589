//! Project service

use crate::error::ServiceError;
use crate::metrics::{self, ProjectFilter};
use crate::services::{CrudService, Deleted, ServiceContext};
use bizplan_model::{check_plan_section, NewProject, Patch, Project, ProjectId};
use serde_json::Value as JsonValue;

const SERVICE: &str = "ProjectService";

/// Business-plan projects
#[derive(Debug, Clone)]
pub struct ProjectService {
    crud: CrudService<Project>,
}

impl ProjectService {
    /// Create service owning `projects`
    #[must_use]
    pub fn new(projects: Vec<Project>, ctx: ServiceContext) -> Self {
        Self {
            crud: CrudService::new(SERVICE, projects, ctx),
        }
    }

    /// Every project
    ///
    /// # Errors
    /// `EmptyCollection` when there are no projects.
    pub async fn get_all(&self) -> Result<Vec<Project>, ServiceError> {
        self.crud.get_all().await
    }

    /// Project with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, `NotFound` when absent.
    pub async fn get_by_id(&self, id: ProjectId) -> Result<Project, ServiceError> {
        self.crud.get_by_id(id).await
    }

    /// Create a project from `draft`
    ///
    /// # Errors
    /// `Validation` when the name is blank.
    pub async fn create(&self, draft: NewProject) -> Result<Project, ServiceError> {
        self.crud.check_input("create", draft.validate())?;
        let project = self
            .crud
            .create_with(move |id, now| Project::from_draft(id, draft.clone(), now))
            .await?;
        tracing::info!(project_id = %project.id, name = %project.name, "project created");
        Ok(project)
    }

    /// Merge `patch` into the project with `id`
    ///
    /// `patch` is either a [`bizplan_model::ProjectPatch`] or a whole
    /// [`Project`] to save wholesale. The identity never changes.
    ///
    /// # Errors
    /// `Validation` for id 0, an empty patch or a blank name; `NotFound`
    /// when absent.
    pub async fn update<P>(&self, id: ProjectId, patch: P) -> Result<Project, ServiceError>
    where
        P: Patch<Project> + Clone + Sync,
    {
        self.crud.update(id, patch).await
    }

    /// Remove the project with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, `NotFound` when absent.
    pub async fn delete(&self, id: ProjectId) -> Result<Deleted<Project>, ServiceError> {
        self.crud.delete(id).await
    }

    /// Store the content of one plan section
    ///
    /// Completion counters are recomputed from the populated sections.
    ///
    /// # Errors
    /// `Validation` for id 0 or a key outside the plan-section catalog;
    /// `NotFound` when absent.
    pub async fn save_section(
        &self,
        id: ProjectId,
        key: &str,
        content: JsonValue,
    ) -> Result<Project, ServiceError> {
        let operation = "save_section";
        self.crud.check_input(operation, check_plan_section(key))?;

        let key = key.to_string();
        self.crud
            .modify(operation, id, move |project| {
                project.put_section(key.clone(), content.clone());
                Ok(())
            })
            .await
    }

    /// Projects passing every filter and matching `term`
    ///
    /// # Errors
    /// Only policy failures. An empty result is not an error.
    pub async fn find(
        &self,
        filters: Vec<ProjectFilter>,
        term: &str,
    ) -> Result<Vec<Project>, ServiceError> {
        let term = term.to_string();
        self.crud
            .query(move |p| metrics::project_selected(p, &filters, &term))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizplan_model::{ProjectPatch, ProjectStatus};
    use chrono::Utc;
    use serde_json::json;

    fn service() -> ProjectService {
        let seed = Project::from_draft(
            ProjectId(1),
            NewProject::new("Seed", "first").with_status(ProjectStatus::InProgress),
            Utc::now(),
        );
        ProjectService::new(vec![seed], ServiceContext::default())
    }

    #[tokio::test]
    async fn blank_name_rejected_before_create() {
        let svc = service();
        let err = svc.create(NewProject::new("   ", "x")).await.unwrap_err();
        assert_eq!(err, ServiceError::Validation("Project name cannot be empty".into()));
        assert_eq!(svc.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_patch_rejected() {
        let err = service()
            .update(ProjectId(1), ProjectPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Validation("update data is empty".into()));
    }

    #[tokio::test]
    async fn save_section_updates_completion() {
        let svc = service();
        svc.save_section(ProjectId(1), "executive-summary", json!({"content": "Pitch"}))
            .await
            .unwrap();
        let saved = svc
            .save_section(ProjectId(1), "market-analysis", json!({"content": "TAM"}))
            .await
            .unwrap();
        assert_eq!(saved.completed_sections, 2);
        assert_eq!(saved.completion_percentage, 25);
        assert_eq!(svc.get_by_id(ProjectId(1)).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn unknown_section_rejected() {
        let err = service()
            .save_section(ProjectId(1), "appendix", json!("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(msg) if msg.contains("appendix")));
    }

    #[tokio::test]
    async fn find_combines_filters_and_term() {
        let svc = service();
        svc.create(NewProject::new("Bakery", "bread")).await.unwrap();
        let drafts = svc.find(vec![ProjectFilter::Draft], "").await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "Bakery");
        assert!(svc
            .find(vec![ProjectFilter::InProgress], "bread")
            .await
            .unwrap()
            .is_empty());
    }
}

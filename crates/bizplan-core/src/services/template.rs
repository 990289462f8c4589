//! Template gallery service (read-only)

use crate::error::ServiceError;
use crate::services::{CrudService, ServiceContext};
use bizplan_model::{Template, TemplateCategory, TemplateId};

const SERVICE: &str = "TemplateService";

/// Plan templates
#[derive(Debug, Clone)]
pub struct TemplateService {
    crud: CrudService<Template>,
}

impl TemplateService {
    /// Create service owning `templates`
    #[must_use]
    pub fn new(templates: Vec<Template>, ctx: ServiceContext) -> Self {
        Self {
            crud: CrudService::new(SERVICE, templates, ctx),
        }
    }

    /// Every template
    ///
    /// # Errors
    /// `EmptyCollection` when the gallery is empty.
    pub async fn get_all(&self) -> Result<Vec<Template>, ServiceError> {
        self.crud.get_all().await
    }

    /// Template with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, `NotFound` when absent.
    pub async fn get_by_id(&self, id: TemplateId) -> Result<Template, ServiceError> {
        self.crud.get_by_id(id).await
    }

    /// Templates of one category
    ///
    /// # Errors
    /// Only policy failures.
    pub async fn get_by_category(
        &self,
        category: TemplateCategory,
    ) -> Result<Vec<Template>, ServiceError> {
        self.crud.query(move |t| t.category == category).await
    }

    /// Templates flagged as featured
    ///
    /// # Errors
    /// Only policy failures.
    pub async fn get_featured(&self) -> Result<Vec<Template>, ServiceError> {
        self.crud.query(|t| t.featured).await
    }

    /// Templates whose name, description or category contains `term`
    ///
    /// # Errors
    /// Only policy failures.
    pub async fn search(&self, term: &str) -> Result<Vec<Template>, ServiceError> {
        let term = term.trim().to_string();
        self.crud.query(move |t| t.matches(&term)).await
    }
}

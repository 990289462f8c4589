//! Composition root
//!
//! Builds the five services from one set of fixtures and one configuration.
//! Every `Services` value owns independent collections, so tests can build
//! as many isolated instances as they need.

use crate::config::ServiceConfig;
use crate::error::FixtureError;
use crate::fixtures::Fixtures;
use crate::services::{
    AnalyticsService, FinancialService, ProjectService, ServiceContext, TemplateService,
    ValidationService,
};

/// The data services of one application instance
#[derive(Debug, Clone)]
pub struct Services {
    /// Projects
    pub projects: ProjectService,
    /// Financial models
    pub financials: FinancialService,
    /// Template gallery
    pub templates: TemplateService,
    /// Validation records
    pub validation: ValidationService,
    /// Analytics snapshot
    pub analytics: AnalyticsService,
}

impl Services {
    /// Build services over `fixtures` under `config`
    #[must_use]
    pub fn new(fixtures: Fixtures, config: &ServiceConfig) -> Self {
        let ctx = ServiceContext::new(config.policy(), config.latency_profile());
        Self::with_context(fixtures, ctx)
    }

    /// Build services over `fixtures` with an explicit context
    #[must_use]
    pub fn with_context(fixtures: Fixtures, ctx: ServiceContext) -> Self {
        tracing::debug!(
            projects = fixtures.projects.len(),
            financial_models = fixtures.financial_models.len(),
            templates = fixtures.templates.len(),
            validation = fixtures.validation.len(),
            "building services"
        );
        Self {
            projects: ProjectService::new(fixtures.projects, ctx),
            financials: FinancialService::new(fixtures.financial_models, ctx),
            templates: TemplateService::new(fixtures.templates, ctx),
            validation: ValidationService::new(fixtures.validation, ctx),
            analytics: AnalyticsService::new(fixtures.analytics, ctx),
        }
    }

    /// Services over the bundled fixtures
    ///
    /// # Errors
    /// Returns `FixtureError` if the bundled data fails to parse.
    pub fn bundled(config: &ServiceConfig) -> Result<Self, FixtureError> {
        Ok(Self::new(Fixtures::bundled()?, config))
    }
}

//! bizplan Core - in-memory data services for business planning
//!
//! Provides the data layer behind the planning application:
//! - Five services (projects, financial models, templates, validation,
//!   analytics) over in-memory collections
//! - A request policy: timeout around retry with exponential backoff
//! - Injectable simulated latency, zero by default
//! - Derived views (dashboard, validation scores, financial scenarios)
//! - Bundled fixtures and a composition root
//!
//! # Example
//!
//! ```rust,no_run
//! use bizplan_core::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let services = Services::bundled(&ServiceConfig::default())?;
//!
//! let projects = services.projects.get_all().await?;
//! let metrics = bizplan_core::metrics::dashboard(&projects);
//! println!("{} active projects", metrics.active_projects);
//!
//! let model = services.financials.get_or_create_by_project_id(ProjectId(1)).await?;
//! println!("profit: {}", bizplan_core::metrics::financial_totals(&model).profit);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod app;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod latency;
pub mod metrics;
pub mod policy;
pub mod services;
pub mod store;

pub use app::Services;
pub use config::{LatencyMode, RequestPolicyConfig, ServiceConfig};
pub use error::{Action, ConfigError, FixtureError, ServiceError};
pub use fixtures::{FixtureSources, Fixtures};
pub use latency::{Endpoint, Latency, LatencyProfile};
pub use metrics::{DashboardMetrics, FinancialTotals, MonthlyFigure, ProjectFilter, ScenarioOutcome};
pub use policy::RequestPolicy;
pub use services::{
    parse_id, AnalyticsService, CrudService, Deleted, FinancialService, ProjectService,
    ServiceContext, TemplateService, ValidationService,
};
pub use store::Collection;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with bizplan Core
    pub use crate::{
        LatencyProfile, ProjectFilter, RequestPolicy, ServiceConfig, ServiceContext, ServiceError,
        Services,
    };
    pub use bizplan_model::{
        FrameworkId, Identity, NewProject, Project, ProjectId, ProjectPatch, TemplateCategory,
        TimeRange,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

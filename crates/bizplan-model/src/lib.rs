//! bizplan Model - entity types for the planning data layer
//!
//! Defines the records held by the in-memory services:
//! - Projects and the plan-section catalog
//! - Financial models and revenue scenarios
//! - Template gallery entries
//! - Validation records and the framework catalog
//! - The analytics snapshot and reporting windows
//!
//! Each stored entity implements [`Record`]; partial updates implement
//! [`Patch`].
//!
//! # Example
//!
//! ```rust
//! use bizplan_model::{NewProject, Project, ProjectId, ProjectStatus};
//! use chrono::Utc;
//!
//! let draft = NewProject::new("Corner Bakery", "Artisan bread").with_status(ProjectStatus::InProgress);
//! let project = Project::from_draft(ProjectId(1), draft, Utc::now());
//! assert_eq!(project.section_completion(), 0);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod analytics;
pub mod error;
pub mod financial;
pub mod ids;
pub mod project;
pub mod record;
pub mod template;
pub mod validation;

pub use analytics::{AnalyticsSnapshot, ProjectAnalytics, RevenueProjection, TimeRange, UsageStats};
pub use error::ModelError;
pub use financial::{
    FinancialModel, FinancialModelPatch, LineItem, NewFinancialModel, Projections, Scenario,
};
pub use ids::{FinancialModelId, Identity, ProjectId, TemplateId, ValidationId};
pub use project::{
    check_plan_section, plan_section, section_completion, NewProject, PlanSection, Project,
    ProjectPatch, ProjectStatus, PLAN_SECTIONS,
};
pub use record::{Patch, Record, RecordKind};
pub use template::{Difficulty, Template, TemplateCategory};
pub use validation::{
    check_score, check_scores, Framework, FrameworkId, FrameworkSection, NewValidationRecord,
    Priority, Recommendation, SectionScores, ValidationPatch, ValidationRecord, FRAMEWORKS,
};

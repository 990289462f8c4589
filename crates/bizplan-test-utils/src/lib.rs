//! Testing utilities for the bizplan workspace
//!
//! Shared record builders and service setups.

#![allow(missing_docs)]

use bizplan_core::{LatencyProfile, RequestPolicy, ServiceContext, Services};
use bizplan_core::fixtures::Fixtures;
use bizplan_model::{
    AnalyticsSnapshot, FinancialModel, FinancialModelId, NewFinancialModel, NewProject,
    NewValidationRecord, Project, ProjectId, ProjectStatus, RevenueProjection, UsageStats,
    ValidationId, ValidationRecord,
};
use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;

/// Fixed timestamp so fixtures compare equal across runs
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn project(id: u64, name: &str) -> Project {
    Project::from_draft(ProjectId(id), NewProject::new(name, format!("{name} plan")), epoch())
}

pub fn project_with(id: u64, completion: u8, status: ProjectStatus) -> Project {
    let draft = NewProject::new(format!("Project {id}"), "test project")
        .with_status(status)
        .with_completion(completion);
    Project::from_draft(ProjectId(id), draft, epoch())
}

pub fn financial_model(id: u64, project_id: u64) -> FinancialModel {
    FinancialModel::from_draft(
        FinancialModelId(id),
        NewFinancialModel::starter(ProjectId(project_id)),
        epoch(),
    )
}

pub fn validation_record(id: u64, project_id: u64) -> ValidationRecord {
    ValidationRecord::from_draft(
        ValidationId(id),
        NewValidationRecord::new(ProjectId(project_id)),
        epoch(),
    )
}

pub fn analytics_snapshot() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        total_projects: 10.0,
        total_projected_revenue: 1000.0,
        average_completion: 50.0,
        average_validation_score: 70.0,
        trend_labels: vec!["Jan".into(), "Feb".into()],
        validation_trend_data: vec![60.0, 70.0],
        revenue_projection_data: RevenueProjection {
            conservative: vec![100.0, 200.0],
            optimistic: vec![150.0, 300.0],
        },
        usage: UsageStats::default(),
    }
}

/// Small, deterministic data set: 3 projects, 1 financial model for
/// project 1, 1 validation record for project 1
pub fn small_fixtures() -> Fixtures {
    Fixtures {
        projects: vec![
            project_with(1, 40, ProjectStatus::Draft),
            project_with(2, 60, ProjectStatus::InProgress),
            project_with(3, 80, ProjectStatus::Completed),
        ],
        financial_models: vec![financial_model(1, 1)],
        templates: Fixtures::bundled()
            .map(|f| f.templates)
            .unwrap_or_default(),
        validation: vec![validation_record(1, 1)],
        analytics: analytics_snapshot(),
    }
}

/// Context with no latency and no backoff delay
pub fn fast_context() -> ServiceContext {
    ServiceContext::new(
        RequestPolicy::new(Duration::from_secs(10), 3, Duration::ZERO),
        LatencyProfile::none(),
    )
}

pub fn setup_services() -> Services {
    Services::with_context(small_fixtures(), fast_context())
}

pub fn setup_empty_services() -> Services {
    Services::with_context(Fixtures::default(), fast_context())
}

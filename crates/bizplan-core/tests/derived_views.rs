//! Analytics scaling and dashboard figures over service output

use bizplan_core::metrics::{self, ProjectFilter};
use bizplan_core::prelude::*;
use bizplan_core::Fixtures;
use bizplan_model::{AnalyticsSnapshot, ProjectStatus};
use bizplan_test_utils::{fast_context, project_with, setup_services};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

#[tokio::test]
async fn thirty_days_is_the_unscaled_snapshot() {
    let services = setup_services();
    let scaled = services.analytics.get_analytics(TimeRange::Month).await.unwrap();
    assert_eq!(&scaled, services.analytics.snapshot());
}

#[tokio::test]
async fn one_year_scales_totals_by_eight() {
    let services = setup_services();
    let base = services.analytics.snapshot().clone();
    let scaled = services.analytics.get_analytics(TimeRange::Year).await.unwrap();
    assert_eq!(scaled.total_projects, (base.total_projects * 8.0).round());
    assert_eq!(
        scaled.total_projected_revenue,
        (base.total_projected_revenue * 8.0).round()
    );
    assert_eq!(scaled.average_completion, base.average_completion);
}

#[test]
fn unknown_range_is_rejected() {
    assert!("2w".parse::<TimeRange>().is_err());
    assert_eq!("90d".parse::<TimeRange>().unwrap(), TimeRange::Quarter);
}

#[tokio::test]
async fn dashboard_scenario() {
    let services = setup_services();
    let projects = services.projects.get_all().await.unwrap();
    let dashboard = metrics::dashboard(&projects);
    assert_eq!(dashboard.total_projects, 3);
    assert_eq!(dashboard.active_projects, 2);
    assert_eq!(dashboard.average_completion, 60);
}

#[test]
fn empty_dashboard_average_is_zero() {
    assert_eq!(metrics::dashboard(&[]).average_completion, 0);
}

#[tokio::test]
async fn section_saves_move_dashboard_average() {
    let fixtures = Fixtures {
        projects: vec![project_with(1, 0, ProjectStatus::Draft)],
        ..Fixtures::default()
    };
    let services = Services::with_context(fixtures, fast_context());
    for key in ["executive-summary", "company-description", "market-analysis", "organization"] {
        services
            .projects
            .save_section(ProjectId(1), key, json!({ "content": key }))
            .await
            .unwrap();
    }
    let projects = services.projects.get_all().await.unwrap();
    assert_eq!(metrics::average_completion(&projects), 50);
}

#[tokio::test]
async fn bundled_dashboard() {
    let services = Services::bundled(&ServiceConfig::default()).unwrap();
    let projects = services.projects.get_all().await.unwrap();
    let dashboard = metrics::dashboard(&projects);
    assert_eq!(dashboard.total_projects, 4);
    assert_eq!(dashboard.active_projects, 3);
    assert_eq!(dashboard.total_projected_revenue, 2450.0);

    let high = services
        .projects
        .find(vec![ProjectFilter::HighScore], "")
        .await
        .unwrap();
    assert_eq!(high.len(), 2);

    let counts = metrics::category_counts(&services.templates.get_all().await.unwrap());
    assert_eq!(counts[&TemplateCategory::Tech], 2);
    assert_eq!(counts[&TemplateCategory::Manufacturing], 1);
}

#[tokio::test]
async fn project_analytics_reflects_the_record() {
    let services = setup_services();
    let project = services.projects.get_by_id(ProjectId(2)).await.unwrap();
    let summary = services.analytics.project_analytics(&project).await.unwrap();
    assert_eq!(summary.project_id, ProjectId(2));
    assert_eq!(summary.completion_rate, 60);
    assert_eq!(summary.last_activity, project.updated_at);
}

proptest! {
    #[test]
    fn totals_scale_by_factor(total in 0u32..100_000, revenue in 0u32..1_000_000) {
        let snapshot = AnalyticsSnapshot {
            total_projects: f64::from(total),
            total_projected_revenue: f64::from(revenue),
            ..AnalyticsSnapshot::default()
        };
        for range in TimeRange::ALL {
            let scaled = bizplan_core::services::analytics::scale_snapshot(&snapshot, range);
            prop_assert_eq!(scaled.total_projects, (f64::from(total) * range.factor()).round());
            prop_assert_eq!(
                scaled.total_projected_revenue,
                (f64::from(revenue) * range.factor()).round()
            );
        }
    }
}

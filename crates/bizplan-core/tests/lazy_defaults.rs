//! Per-project records created on first use

use bizplan_core::prelude::*;
use bizplan_core::metrics;
use bizplan_model::{FinancialModelId, ValidationId};
use bizplan_test_utils::setup_services;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn existing_model_is_returned_as_is() {
    let services = setup_services();
    let model = services
        .financials
        .get_or_create_by_project_id(ProjectId(1))
        .await
        .unwrap();
    assert_eq!(model.id, FinancialModelId(1));
    assert_eq!(services.financials.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn lookup_alone_never_creates() {
    let services = setup_services();
    assert!(services
        .financials
        .try_get_by_project_id(ProjectId(2))
        .await
        .unwrap()
        .is_none());
    assert!(services
        .validation
        .try_get_by_project_id(ProjectId(2))
        .await
        .unwrap()
        .is_none());
    assert_eq!(services.financials.get_all().await.unwrap().len(), 1);
    assert_eq!(services.validation.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn repeated_lookups_return_the_same_default() {
    let services = setup_services();
    let first = services
        .financials
        .get_or_create_by_project_id(ProjectId(2))
        .await
        .unwrap();
    let second = services
        .financials
        .get_or_create_by_project_id(ProjectId(2))
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first.id, FinancialModelId(2));

    let totals = metrics::financial_totals(&first);
    assert_eq!(totals.revenue, 80_000.0);
    assert_eq!(totals.expenses, 50_000.0);
}

#[tokio::test]
async fn concurrent_first_use_creates_once() {
    let services = setup_services();
    let mut handles = Vec::new();
    for _ in 0..12 {
        let validation = services.validation.clone();
        handles.push(tokio::spawn(async move {
            validation.get_or_create_by_project_id(ProjectId(3)).await
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    assert!(ids.iter().all(|id| *id == ValidationId(2)));
    assert_eq!(services.validation.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn default_validation_scores() {
    let services = setup_services();
    let record = services.validation.ensure_default(ProjectId(7)).await.unwrap();
    assert_eq!(metrics::framework_score(&record, FrameworkId::LeanCanvas), 71);
    assert_eq!(metrics::framework_score(&record, FrameworkId::Swot), 68);
    assert_eq!(metrics::framework_score(&record, FrameworkId::CustomerValidation), 68);
    assert_eq!(metrics::overall_score(&record), 69);
    assert_eq!(record.recommendations.len(), 2);
}

#[tokio::test]
async fn score_updates_feed_framework_average() {
    let services = setup_services();
    let record = services
        .validation
        .get_or_create_by_project_id(ProjectId(1))
        .await
        .unwrap();
    services
        .validation
        .set_score(record.id, FrameworkId::LeanCanvas, "problem", 75)
        .await
        .unwrap();
    let updated = services
        .validation
        .set_score(record.id, FrameworkId::LeanCanvas, "solution", 80)
        .await
        .unwrap();
    assert_eq!(metrics::framework_score(&updated, FrameworkId::LeanCanvas), 78);
    assert_eq!(metrics::framework_score(&updated, FrameworkId::Swot), 0);
    assert_eq!(metrics::overall_score(&updated), 78);
}

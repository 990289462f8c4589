//! Timeout, retry and latency as seen through the services

use bizplan_core::prelude::*;
use bizplan_core::{Action, Endpoint, Fixtures, Latency};
use bizplan_model::RecordKind;
use bizplan_test_utils::small_fixtures;
use std::time::Duration;
use tokio::time::Instant;

fn services(latency: LatencyProfile, fixtures: Fixtures) -> Services {
    let ctx = ServiceContext::new(RequestPolicy::default(), latency);
    Services::with_context(fixtures, ctx)
}

#[tokio::test(start_paused = true)]
async fn empty_collection_is_retried_with_backoff() {
    let services = services(LatencyProfile::none(), Fixtures::default());
    let start = Instant::now();
    let err = services.projects.get_all().await.unwrap_err();

    assert_eq!(
        err,
        ServiceError::EmptyCollection {
            kind: RecordKind::Project
        }
    );
    // Three attempts: 1s then 2s of backoff
    assert!(start.elapsed() >= Duration::from_secs(3));
    assert!(start.elapsed() < Duration::from_secs(7));
    assert_eq!(
        err.user_message(),
        "Failed to load projects. Please try again later."
    );
}

#[tokio::test(start_paused = true)]
async fn not_found_surfaces_on_first_attempt() {
    let latency = LatencyProfile::none().with(Endpoint::Load, Latency::fixed_ms(500));
    let services = services(latency, small_fixtures());
    let start = Instant::now();
    let err = services.projects.get_by_id(ProjectId(50)).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn slow_update_times_out_but_still_lands() {
    let latency = LatencyProfile::none().with(Endpoint::Update, Latency::fixed_ms(15_000));
    let services = services(latency, small_fixtures());
    let patch = ProjectPatch {
        name: Some("Eventually".into()),
        ..ProjectPatch::default()
    };

    let err = services.projects.update(ProjectId(1), patch).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Timeout {
            kind: RecordKind::Project,
            action: Action::Update,
            after: Duration::from_secs(10),
        }
    );
    assert!(!err.is_not_found());
    assert_eq!(
        err.user_message(),
        "Failed to update project: Request timed out. Please check your connection and try again."
    );

    let now = services.projects.get_by_id(ProjectId(1)).await.unwrap();
    assert_eq!(now.name, "Project 1");

    // The detached operation finishes after the caller gave up
    tokio::time::sleep(Duration::from_secs(6)).await;
    let later = services.projects.get_by_id(ProjectId(1)).await.unwrap();
    assert_eq!(later.name, "Eventually");
}

#[tokio::test(start_paused = true)]
async fn simulated_profile_delays_calls() {
    let services = services(LatencyProfile::simulated(), small_fixtures());
    let start = Instant::now();
    services.analytics.get_analytics(TimeRange::Month).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(400));

    let start = Instant::now();
    services.projects.get_by_id(ProjectId(1)).await.unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100) && elapsed <= Duration::from_millis(301));
}

#[tokio::test(start_paused = true)]
async fn config_drives_the_policy() {
    let config = ServiceConfig::new()
        .with_timeout(Duration::from_secs(2))
        .with_max_attempts(1);
    let fixtures = Fixtures {
        projects: Vec::new(),
        ..small_fixtures()
    };
    let services = Services::new(fixtures, &config);

    let start = Instant::now();
    let err = services.projects.get_all().await.unwrap_err();
    assert!(matches!(err, ServiceError::EmptyCollection { .. }));
    assert!(start.elapsed() < Duration::from_secs(1));
}

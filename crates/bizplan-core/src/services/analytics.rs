//! Analytics service
//!
//! Serves one aggregate snapshot, scaled to the requested reporting window
//! at read time. The stored snapshot is never modified.

use crate::error::{Action, ServiceError};
use crate::latency::Endpoint;
use crate::services::ServiceContext;
use bizplan_model::{
    AnalyticsSnapshot, Project, ProjectAnalytics, RecordKind, RevenueProjection, TimeRange,
    UsageStats,
};
use std::sync::Arc;

const SERVICE: &str = "AnalyticsService";

/// Upper bound of percentage series after scaling
const PERCENT_CAP: f64 = 100.0;

/// Scale `snapshot` to `range`
///
/// Totals and both revenue projection series are multiplied by the range
/// factor and rounded. The validation trend uses the damped multiplier
/// `0.8 + factor * 0.2` and is capped at 100. Averages, labels and usage
/// pass through unchanged.
#[must_use]
pub fn scale_snapshot(snapshot: &AnalyticsSnapshot, range: TimeRange) -> AnalyticsSnapshot {
    let factor = range.factor();
    let damped = 0.8 + factor * 0.2;
    let scale = |values: &[f64]| -> Vec<f64> {
        values.iter().map(|v| (v * factor).round()).collect()
    };

    AnalyticsSnapshot {
        total_projects: (snapshot.total_projects * factor).round(),
        total_projected_revenue: (snapshot.total_projected_revenue * factor).round(),
        validation_trend_data: snapshot
            .validation_trend_data
            .iter()
            .map(|v| (v * damped).round().min(PERCENT_CAP))
            .collect(),
        revenue_projection_data: RevenueProjection {
            conservative: scale(&snapshot.revenue_projection_data.conservative),
            optimistic: scale(&snapshot.revenue_projection_data.optimistic),
        },
        ..snapshot.clone()
    }
}

/// Aggregate analytics
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    snapshot: Arc<AnalyticsSnapshot>,
    ctx: ServiceContext,
}

impl AnalyticsService {
    /// Create service serving `snapshot`
    #[must_use]
    pub fn new(snapshot: AnalyticsSnapshot, ctx: ServiceContext) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            ctx,
        }
    }

    /// Unscaled snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &AnalyticsSnapshot {
        &self.snapshot
    }

    async fn read<T, F>(&self, operation: &'static str, view: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: Fn(&AnalyticsSnapshot) -> T + Send + Sync + 'static,
    {
        let snapshot = Arc::clone(&self.snapshot);
        let latency = self.ctx.latency;
        let view = Arc::new(view);
        self.ctx
            .call(SERVICE, operation, RecordKind::Analytics, Action::Load, move || {
                let snapshot = Arc::clone(&snapshot);
                let view = Arc::clone(&view);
                async move {
                    latency.pause(Endpoint::Analytics).await;
                    Ok((*view)(snapshot.as_ref()))
                }
            })
            .await
    }

    /// Snapshot scaled to `range`
    ///
    /// # Errors
    /// Only policy failures.
    pub async fn get_analytics(&self, range: TimeRange) -> Result<AnalyticsSnapshot, ServiceError> {
        self.read("get_analytics", move |snapshot| scale_snapshot(snapshot, range))
            .await
    }

    /// Progress summary of one project
    ///
    /// # Errors
    /// Only policy failures.
    pub async fn project_analytics(
        &self,
        project: &Project,
    ) -> Result<ProjectAnalytics, ServiceError> {
        let summary = ProjectAnalytics {
            project_id: project.id,
            completion_rate: project.completion_percentage,
            validation_score: project.validation_score,
            sections_completed: project.completed_sections,
            total_sections: project.total_sections,
            last_activity: project.updated_at,
        };
        self.read("project_analytics", move |_| summary.clone()).await
    }

    /// Product usage counters
    ///
    /// The project count follows the snapshot total.
    ///
    /// # Errors
    /// Only policy failures.
    pub async fn usage_stats(&self) -> Result<UsageStats, ServiceError> {
        self.read("usage_stats", |snapshot| UsageStats {
            projects_created: snapshot.total_projects.max(0.0).round() as u64,
            ..snapshot.usage.clone()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn snapshot() -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            total_projects: 12.0,
            total_projected_revenue: 2450.0,
            average_completion: 68.0,
            average_validation_score: 74.0,
            trend_labels: vec!["Jan".into(), "Feb".into(), "Mar".into()],
            validation_trend_data: vec![65.0, 85.0, 95.0],
            revenue_projection_data: RevenueProjection {
                conservative: vec![100.0, 150.0],
                optimistic: vec![200.0, 275.0],
            },
            usage: UsageStats {
                projects_created: 0,
                templates_used: 8,
                exports_generated: 15,
                ai_queries_used: 42,
                collaborators_invited: 3,
            },
        }
    }

    #[test]
    fn month_is_unscaled() {
        assert_eq!(scale_snapshot(&snapshot(), TimeRange::Month), snapshot());
    }

    #[test]
    fn year_scales_by_eight() {
        let scaled = scale_snapshot(&snapshot(), TimeRange::Year);
        assert_eq!(scaled.total_projects, 96.0);
        assert_eq!(scaled.total_projected_revenue, 19_600.0);
        assert_eq!(scaled.revenue_projection_data.optimistic, vec![1600.0, 2200.0]);
        // 65 * 2.4 = 156, capped
        assert_eq!(scaled.validation_trend_data, vec![100.0, 100.0, 100.0]);
        assert_eq!(scaled.average_completion, 68.0);
    }

    #[test]
    fn week_damps_trend() {
        let scaled = scale_snapshot(&snapshot(), TimeRange::Week);
        assert_eq!(scaled.total_projects, 4.0);
        // 0.8 + 0.3 * 0.2 = 0.86
        assert_eq!(scaled.validation_trend_data, vec![56.0, 73.0, 82.0]);
        assert_eq!(scaled.revenue_projection_data.conservative, vec![30.0, 45.0]);
    }

    #[tokio::test]
    async fn stored_snapshot_is_untouched() {
        let svc = AnalyticsService::new(snapshot(), ServiceContext::default());
        svc.get_analytics(TimeRange::Quarter).await.unwrap();
        assert_eq!(svc.snapshot(), &snapshot());
    }

    #[tokio::test]
    async fn usage_reports_project_total() {
        let svc = AnalyticsService::new(snapshot(), ServiceContext::default());
        let usage = svc.usage_stats().await.unwrap();
        assert_eq!(usage.projects_created, 12);
        assert_eq!(usage.ai_queries_used, 42);
    }

    proptest! {
        #[test]
        fn trend_never_exceeds_cap(values in proptest::collection::vec(0.0f64..=100.0, 0..12)) {
            let mut snap = snapshot();
            snap.validation_trend_data = values;
            for range in TimeRange::ALL {
                let scaled = scale_snapshot(&snap, range);
                prop_assert!(scaled.validation_trend_data.iter().all(|v| *v <= 100.0));
            }
        }
    }
}

//! Analytics snapshot and time ranges

use crate::error::ModelError;
use crate::ids::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    /// Last 7 days
    #[serde(rename = "7d")]
    Week,
    /// Last 30 days
    #[default]
    #[serde(rename = "30d")]
    Month,
    /// Last 90 days
    #[serde(rename = "90d")]
    Quarter,
    /// Last year
    #[serde(rename = "1y")]
    Year,
}

impl TimeRange {
    /// All ranges, shortest first
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
    ];

    /// Scale applied to snapshot values for this window
    #[inline]
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            TimeRange::Week => 0.3,
            TimeRange::Month => 1.0,
            TimeRange::Quarter => 2.5,
            TimeRange::Year => 8.0,
        }
    }

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
            TimeRange::Year => "1y",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                what: "time range",
                value: s.to_string(),
            })
    }
}

/// Revenue projection series per scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueProjection {
    /// Low scenario
    pub conservative: Vec<f64>,
    /// High scenario
    pub optimistic: Vec<f64>,
}

/// Product usage counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    /// Projects created
    pub projects_created: u64,
    /// Templates used
    pub templates_used: u64,
    /// Exports generated
    pub exports_generated: u64,
    /// Assistant queries used
    pub ai_queries_used: u64,
    /// Collaborators invited
    pub collaborators_invited: u64,
}

/// Aggregate analytics across all projects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    /// Project count
    pub total_projects: f64,
    /// Sum of projected revenue
    pub total_projected_revenue: f64,
    /// Mean completion percentage
    pub average_completion: f64,
    /// Mean validation score
    pub average_validation_score: f64,
    /// Labels of the trend series
    #[serde(default)]
    pub trend_labels: Vec<String>,
    /// Validation score trend (percentages)
    pub validation_trend_data: Vec<f64>,
    /// Revenue projections
    pub revenue_projection_data: RevenueProjection,
    /// Usage counters
    #[serde(default)]
    pub usage: UsageStats,
}

/// Per-project analytics summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalytics {
    /// Project
    pub project_id: ProjectId,
    /// Completion percentage
    pub completion_rate: u8,
    /// Validation score
    pub validation_score: u8,
    /// Sections with content
    pub sections_completed: u32,
    /// Sections in the plan
    pub total_sections: u32,
    /// Last modification
    pub last_activity: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors() {
        assert_eq!(TimeRange::Week.factor(), 0.3);
        assert_eq!(TimeRange::default().factor(), 1.0);
        assert_eq!(TimeRange::Quarter.factor(), 2.5);
        assert_eq!(TimeRange::Year.factor(), 8.0);
    }

    #[test]
    fn parse_wire_names() {
        assert_eq!("1y".parse::<TimeRange>().unwrap(), TimeRange::Year);
        assert!("2w".parse::<TimeRange>().is_err());
        assert_eq!(serde_json::to_string(&TimeRange::Quarter).unwrap(), "\"90d\"");
    }
}

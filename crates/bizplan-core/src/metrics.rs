//! Derived views over service output
//!
//! Pure functions computing the aggregate figures shown next to the
//! records: dashboard totals, validation scores, financial totals and
//! scenarios, project filtering and template category counts. Nothing here
//! touches a collection.

use bizplan_model::{
    FinancialModel, FrameworkId, ModelError, Project, ProjectStatus, Scenario, Template,
    TemplateCategory, ValidationRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Month labels of the revenue breakdown
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Validation score at or above which a project counts as well validated
pub const HIGH_VALIDATION_SCORE: u8 = 80;

/// Rounded mean, 0 for no values
fn rounded_mean<I>(values: I) -> u8
where
    I: IntoIterator<Item = u32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round().min(f64::from(u8::MAX)) as u8
}

/// Headline figures of the project dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Number of projects
    pub total_projects: usize,
    /// Projects not yet completed
    pub active_projects: usize,
    /// Mean completion percentage
    pub average_completion: u8,
    /// Sum of projected revenue, rounded
    pub total_projected_revenue: f64,
}

/// Dashboard figures for `projects`
///
/// An empty slice yields all zeros.
#[must_use]
pub fn dashboard(projects: &[Project]) -> DashboardMetrics {
    DashboardMetrics {
        total_projects: projects.len(),
        active_projects: projects
            .iter()
            .filter(|p| p.status != ProjectStatus::Completed)
            .count(),
        average_completion: average_completion(projects),
        total_projected_revenue: projects
            .iter()
            .map(|p| p.projected_revenue)
            .sum::<f64>()
            .round(),
    }
}

/// Mean completion percentage, rounded; 0 when there are no projects
#[must_use]
pub fn average_completion(projects: &[Project]) -> u8 {
    rounded_mean(projects.iter().map(|p| u32::from(p.completion_percentage)))
}

/// Score of one framework: rounded mean of its recorded section scores
///
/// A framework with no recorded sections scores 0.
#[must_use]
pub fn framework_score(record: &ValidationRecord, framework: FrameworkId) -> u8 {
    record
        .framework_scores(framework)
        .map_or(0, |scores| rounded_mean(scores.values().map(|s| u32::from(*s))))
}

/// Score of every framework, in catalog order
#[must_use]
pub fn framework_scores(record: &ValidationRecord) -> BTreeMap<FrameworkId, u8> {
    FrameworkId::ALL
        .into_iter()
        .map(|f| (f, framework_score(record, f)))
        .collect()
}

/// Overall validation score
///
/// Frameworks scoring 0 are left out of the mean rather than pulling it
/// down.
#[must_use]
pub fn overall_score(record: &ValidationRecord) -> u8 {
    rounded_mean(
        FrameworkId::ALL
            .into_iter()
            .map(|f| framework_score(record, f))
            .filter(|score| *score > 0)
            .map(u32::from),
    )
}

/// Totals of a financial model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTotals {
    /// Sum of revenue lines
    pub revenue: f64,
    /// Sum of expense lines
    pub expenses: f64,
    /// Revenue minus expenses
    pub profit: f64,
}

impl FinancialTotals {
    /// Profit as a rounded percentage of revenue; 0 without revenue
    #[must_use]
    pub fn margin(&self) -> i64 {
        if self.revenue > 0.0 {
            (self.profit / self.revenue * 100.0).round() as i64
        } else {
            0
        }
    }
}

/// Revenue, expense and profit totals of `model`
#[must_use]
pub fn financial_totals(model: &FinancialModel) -> FinancialTotals {
    let revenue: f64 = model.revenue.iter().map(|l| l.amount).sum();
    let expenses: f64 = model.expenses.iter().map(|l| l.amount).sum();
    FinancialTotals {
        revenue,
        expenses,
        profit: revenue - expenses,
    }
}

/// Totals of a model under one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    /// Scenario applied
    pub scenario: Scenario,
    /// Revenue scaled by the scenario multiplier, rounded
    pub revenue: f64,
    /// Expenses, unscaled
    pub expenses: f64,
    /// Scaled revenue minus expenses
    pub profit: f64,
}

/// Outcome of every scenario listed on `model`, in its order
#[must_use]
pub fn scenario_outcomes(model: &FinancialModel) -> Vec<ScenarioOutcome> {
    let totals = financial_totals(model);
    model
        .scenarios
        .iter()
        .map(|&scenario| {
            let revenue = (totals.revenue * scenario.multiplier()).round();
            ScenarioOutcome {
                scenario,
                revenue,
                expenses: totals.expenses,
                profit: revenue - totals.expenses,
            }
        })
        .collect()
}

/// Revenue and expenses for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyFigure {
    /// Month label
    pub month: &'static str,
    /// Seasonally adjusted revenue
    pub revenue: f64,
    /// Flat share of expenses
    pub expenses: f64,
}

/// Twelve-month breakdown of the yearly totals
///
/// Revenue follows a sine-shaped seasonality of ±20% around the monthly
/// mean; expenses are spread evenly. Both are rounded.
#[must_use]
pub fn monthly_breakdown(model: &FinancialModel) -> Vec<MonthlyFigure> {
    let totals = financial_totals(model);
    let base_revenue = totals.revenue / 12.0;
    let base_expenses = totals.expenses / 12.0;
    MONTHS
        .iter()
        .enumerate()
        .map(|(index, &month)| {
            let seasonality =
                (index as f64 / 12.0 * std::f64::consts::TAU).sin() * 0.2 + 1.0;
            MonthlyFigure {
                month,
                revenue: (base_revenue * seasonality).round(),
                expenses: base_expenses.round(),
            }
        })
        .collect()
}

/// Dashboard filter chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectFilter {
    /// Draft projects
    Draft,
    /// Projects in progress
    InProgress,
    /// Completed projects
    Completed,
    /// Validation score of at least [`HIGH_VALIDATION_SCORE`]
    HighScore,
}

impl ProjectFilter {
    /// All filters, in chip order
    pub const ALL: [ProjectFilter; 4] = [
        ProjectFilter::Draft,
        ProjectFilter::InProgress,
        ProjectFilter::Completed,
        ProjectFilter::HighScore,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectFilter::Draft => "draft",
            ProjectFilter::InProgress => "in-progress",
            ProjectFilter::Completed => "completed",
            ProjectFilter::HighScore => "high-score",
        }
    }

    /// Whether `project` passes this filter
    #[must_use]
    pub fn matches(self, project: &Project) -> bool {
        match self {
            ProjectFilter::Draft => project.status == ProjectStatus::Draft,
            ProjectFilter::InProgress => project.status == ProjectStatus::InProgress,
            ProjectFilter::Completed => project.status == ProjectStatus::Completed,
            ProjectFilter::HighScore => project.validation_score >= HIGH_VALIDATION_SCORE,
        }
    }
}

impl std::fmt::Display for ProjectFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectFilter {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                what: "project filter",
                value: s.to_string(),
            })
    }
}

/// Case-insensitive match of `term` against name and description
///
/// A blank term matches everything.
#[must_use]
pub fn project_matches(project: &Project, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    needle.is_empty()
        || project.name.to_lowercase().contains(&needle)
        || project.description.to_lowercase().contains(&needle)
}

/// Whether `project` passes every filter in `filters` and matches `term`
#[must_use]
pub fn project_selected(project: &Project, filters: &[ProjectFilter], term: &str) -> bool {
    filters.iter().all(|f| f.matches(project)) && project_matches(project, term)
}

/// Number of templates per category, including empty categories
#[must_use]
pub fn category_counts(templates: &[Template]) -> BTreeMap<TemplateCategory, usize> {
    let mut counts: BTreeMap<_, _> = TemplateCategory::ALL.into_iter().map(|c| (c, 0)).collect();
    for template in templates {
        *counts.entry(template.category).or_insert(0) += 1;
    }
    counts
}
